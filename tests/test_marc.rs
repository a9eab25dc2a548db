use procmarc::marc::{wrap_collection, MarcRecord, Subfields};

fn single(code: char, value: &str) -> Subfields {
    let mut subfields = Subfields::new();
    subfields.push(code, value);
    subfields
}

#[test]
fn test_field_order_is_schema_defined_not_insertion_order() {
    let mut forward = MarcRecord::new();
    forward.add_field("245", single('a', "A Title"));
    forward.add_field("773", single('w', "C88-01-23"));

    let mut reversed = MarcRecord::new();
    reversed.add_field("773", single('w', "C88-01-23"));
    reversed.add_field("245", single('a', "A Title"));

    assert_eq!(forward.to_xml(), reversed.to_xml());

    let xml = forward.to_xml();
    let title_at = xml.find("tag=\"245\"").unwrap();
    let host_at = xml.find("tag=\"773\"").unwrap();
    assert!(title_at < host_at);
}

#[test]
fn test_indicators_from_tag_key() {
    let mut record = MarcRecord::new();
    record.add_field("999C5", single('m', "some text"));
    record.add_field("773__", single('w', "C88-01-23"));

    let xml = record.to_xml();
    assert!(xml.contains("<datafield tag=\"999\" ind1=\"C\" ind2=\"5\">"));
    assert!(xml.contains("<datafield tag=\"773\" ind1=\"\" ind2=\"\">"));
}

#[test]
fn test_bare_tag_has_empty_indicators() {
    let mut record = MarcRecord::new();
    record.add_field("100", single('a', "Doe, John"));
    assert!(record
        .to_xml()
        .contains("<datafield tag=\"100\" ind1=\"\" ind2=\"\">"));
}

#[test]
fn test_repeatable_fields_render_in_list_order() {
    let mut record = MarcRecord::new();
    record.add_field("700", single('a', "First, A."));
    record.add_field("700", single('a', "Second, B."));

    let xml = record.to_xml();
    let first = xml.find("First, A.").unwrap();
    let second = xml.find("Second, B.").unwrap();
    assert!(first < second);
    assert_eq!(xml.matches("<datafield tag=\"700\"").count(), 2);
}

#[test]
fn test_repeated_subfield_values() {
    let mut subfields = Subfields::new();
    subfields.push('a', "Doe, John");
    subfields.push_all('v', ["CERN", "DESY"]);
    let mut record = MarcRecord::new();
    record.add_field("100", subfields);

    let xml = record.to_xml();
    assert!(xml.contains("<subfield code=\"v\">CERN</subfield>"));
    assert!(xml.contains("<subfield code=\"v\">DESY</subfield>"));
    assert!(xml.find("CERN").unwrap() < xml.find("DESY").unwrap());
}

#[test]
fn test_empty_subfields_are_omitted() {
    let mut subfields = Subfields::new();
    subfields.push('a', "Doe, John");
    subfields.push('v', "");
    let mut record = MarcRecord::new();
    record.add_field("100", subfields);
    record.add_field("520", Subfields::new());

    let xml = record.to_xml();
    assert!(!xml.contains("code=\"v\""));
    assert!(!xml.contains("tag=\"520\""));
}

#[test]
fn test_xml_escaping() {
    let mut record = MarcRecord::new();
    record.add_field("245", single('a', "Q < K & J > 0"));
    let xml = record.to_xml();
    assert!(xml.contains("<subfield code=\"a\">Q &lt; K &amp; J &gt; 0</subfield>"));
}

#[test]
fn test_subfield_code_order_digit_before_letter() {
    let mut subfields = Subfields::new();
    subfields.push('m', "misc");
    subfields.push('0', "12345");
    let mut record = MarcRecord::new();
    record.add_field("999C5", subfields);

    let xml = record.to_xml();
    assert!(xml.find("code=\"0\"").unwrap() < xml.find("code=\"m\"").unwrap());
}

#[test]
fn test_fft_sorts_after_numeric_tags() {
    let mut record = MarcRecord::new();
    record.add_field("FFT", single('a', "/path/to/file.pdf"));
    record.add_field("999C5", single('m', "misc"));

    let xml = record.to_xml();
    assert!(xml.find("tag=\"999\"").unwrap() < xml.find("tag=\"FFT\"").unwrap());
}

#[test]
fn test_wrap_collection() {
    let mut record = MarcRecord::new();
    record.add_field("245", single('a', "A Title"));
    let xml = record.to_xml();

    let wrapped = wrap_collection(&[xml.clone(), xml.clone()]);
    assert!(wrapped.starts_with("<collection>\n"));
    assert!(wrapped.ends_with("</collection>"));
    assert_eq!(wrapped.matches("<record>").count(), 2);
}

#[test]
fn test_serialization_is_deterministic() {
    let mut record = MarcRecord::new();
    record.add_field("773", single('w', "C88-01-23"));
    record.add_field("245", single('a', "A Title"));
    assert_eq!(record.to_xml(), record.to_xml());
}
