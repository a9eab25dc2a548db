use crate::marc::{MarcRecord, Subfields};
use crate::model::{CanonicalRecord, RawDocument, Reference};
use crate::normalize::{canonical_journal_title, normalize_author, title_case};

/// Merge a walked document and its cleaned references into one canonical
/// record.
///
/// A document whose extraction failed still yields a record carrying only
/// path, cnum and page locator; downstream stages tolerate the gaps.
pub fn build_canonical(document: RawDocument, references: Vec<Reference>) -> CanonicalRecord {
    let structure = document.structure.unwrap_or_default();
    let authors = structure
        .authors
        .iter()
        .filter_map(normalize_author)
        .collect();

    CanonicalRecord {
        cnum: document.cnum,
        fpage: document.fpage,
        proceedings: document.proceedings,
        title: structure.title,
        abstract_text: structure.abstract_text,
        authors,
        references,
        path: document.path,
    }
}

/// Map a canonical record onto the exchange tag/subfield structure.
pub fn to_marc(record: &CanonicalRecord, pubdate: &str) -> MarcRecord {
    let mut marc = MarcRecord::new();

    let mut authors = record.authors.iter();
    if let Some(first) = authors.next() {
        let mut subfields = Subfields::new();
        subfields.push_all('v', first.affiliations.iter().cloned());
        if first.name.is_empty() {
            // An affiliation without a named author must not appear under
            // the primary-author tag.
            marc.add_field("700", subfields);
        } else {
            subfields.push('a', &first.name);
            marc.add_field("100", subfields);
        }
    }
    for author in authors {
        let mut subfields = Subfields::new();
        subfields.push('a', &author.name);
        subfields.push_all('v', author.affiliations.iter().cloned());
        marc.add_field("700", subfields);
    }

    if let Some(title) = &record.title {
        let mut subfields = Subfields::new();
        subfields.push('a', title_case(title));
        marc.add_field("245", subfields);
    }
    if !pubdate.is_empty() {
        let mut subfields = Subfields::new();
        subfields.push('c', pubdate);
        marc.add_field("260", subfields);
    }
    if let Some(abstract_text) = &record.abstract_text {
        let mut subfields = Subfields::new();
        subfields.push('a', abstract_text);
        marc.add_field("520", subfields);
    }

    let mut host = Subfields::new();
    if let Some(fpage) = &record.fpage {
        host.push('c', fpage);
    }
    host.push('w', &record.cnum);
    marc.add_field("773", host);

    let collection_kind = if record.proceedings {
        "Proceedings"
    } else {
        "ConferencePaper"
    };
    for value in [collection_kind, "HEP"] {
        let mut subfields = Subfields::new();
        subfields.push('a', value);
        marc.add_field("980", subfields);
    }

    let mut fulltext = Subfields::new();
    fulltext.push('a', record.path.to_string_lossy());
    fulltext.push('d', "Fulltext");
    fulltext.push('t', "INSPIRE-PUBLIC");
    marc.add_field("FFT", fulltext);

    for reference in &record.references {
        marc.add_field("999C5", reference_subfields(reference));
    }

    marc
}

/// Subfields of one 999C5 reference occurrence.
fn reference_subfields(reference: &Reference) -> Subfields {
    let mut subfields = Subfields::new();

    if !reference.author.is_empty() {
        subfields.push('h', reference.author.join(", "));
    }
    if let Some(pubstring) = pubstring(reference) {
        subfields.push('s', pubstring);
    }
    subfields.push_all('m', reference.misc.iter().cloned());
    subfields.push_all('o', reference.linemarker.iter().cloned());
    subfields.push_all('r', reference.reportnumber.iter().cloned());
    subfields.push_all('v', reference.journal_volume.iter().cloned());
    subfields.push_all('y', reference.year.iter().cloned());
    if let Some(collaboration) = &reference.collaboration {
        subfields.push('c', collaboration);
    }
    subfields.push_all('t', reference.title.iter().cloned());
    subfields.push_all('0', reference.recids.iter().cloned());

    subfields
}

/// Publication string `<title>,<volume>,<page>` for a complete journal
/// triple, with the N.I.M. title canonicalized. `None` when a component is
/// missing.
pub fn pubstring(reference: &Reference) -> Option<String> {
    let title = canonical_journal_title(reference)?;
    let volume = reference.journal_volume.first()?;
    let page = reference.journal_page.first()?;
    Some(format!("{},{},{}", title, volume, page))
}
