use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Ordered subfield map for one datafield occurrence.
///
/// Codes are kept sorted and a code may carry several values (repeated
/// subfields). Empty values are dropped on insert so they never render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subfields {
    codes: BTreeMap<char, Vec<String>>,
}

impl Subfields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one value under `code`; empty values are ignored.
    pub fn push(&mut self, code: char, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        self.codes.entry(code).or_default().push(value);
    }

    /// Add every non-empty value of an iterator under `code`.
    pub fn push_all<I, S>(&mut self, code: char, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.push(code, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// One exchange record: a mapping from tag key to datafield occurrences.
///
/// A tag key is the 3-character tag optionally followed by indicator
/// characters ("773__", "999C5"); an underscore or missing position renders
/// as an empty indicator. Output order is the fixed lexicographic tag order
/// of the legacy schema, never insertion order.
#[derive(Debug, Clone, Default)]
pub struct MarcRecord {
    fields: BTreeMap<String, Vec<Subfields>>,
}

impl MarcRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence of a repeatable datafield under `tag`.
    ///
    /// Occurrences with no subfields at all are dropped.
    pub fn add_field(&mut self, tag: &str, subfields: Subfields) {
        if subfields.is_empty() {
            return;
        }
        self.fields
            .entry(tag.to_string())
            .or_default()
            .push(subfields);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the record as legacy MARCXML.
    ///
    /// Byte-deterministic: tags in sorted key order, subfield codes in sorted
    /// order, repeated occurrences and repeated subfield values in list
    /// order. Empty fields and subfields are omitted entirely.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<record>\n");
        for (key, occurrences) in &self.fields {
            let tag = &key[..key.len().min(3)];
            let ind1 = indicator(key, 3);
            let ind2 = indicator(key, 4);
            for subfields in occurrences {
                if subfields.is_empty() {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "    <datafield tag=\"{}\" ind1=\"{}\" ind2=\"{}\">",
                    tag, ind1, ind2
                );
                for (code, values) in &subfields.codes {
                    for value in values {
                        let _ = writeln!(
                            out,
                            "        <subfield code=\"{}\">{}</subfield>",
                            code,
                            escape_xml(value)
                        );
                    }
                }
                out.push_str("    </datafield>\n");
            }
        }
        out.push_str("</record>\n");
        out
    }
}

/// Indicator character at `position` of a tag key; `_` renders as empty.
fn indicator(key: &str, position: usize) -> String {
    match key.chars().nth(position) {
        Some('_') | None => String::new(),
        Some(c) => c.to_string(),
    }
}

/// Wrap serialized records in the root collection element.
pub fn wrap_collection(records: &[String]) -> String {
    let mut out = String::from("<collection>\n");
    for record in records {
        out.push_str(record);
    }
    out.push_str("</collection>");
    out
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
