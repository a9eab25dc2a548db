use serde::Deserialize;
use std::path::PathBuf;

/// Structured payload returned by the document-structure extractor.
///
/// Every key is optional: the service frequently recovers only a subset of
/// the metadata, and an empty payload is still a usable document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentStructure {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub authors: Vec<RawAuthor>,
}

/// Author entry as delivered by the structure extractor, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAuthor {
    pub name: Option<String>,
    #[serde(default)]
    pub affiliations: Vec<RawAffiliation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAffiliation {
    pub value: Option<String>,
}

/// A normalized author: display name "surname, given" plus affiliations.
///
/// The name may be empty when the extractor only recovered an affiliation;
/// such entries are kept (they still carry useful institutional data) but
/// must never land in the primary-author field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Author {
    pub name: String,
    pub affiliations: Vec<String>,
}

/// One citation as delivered by the reference-extraction service.
///
/// The service emits lists for almost everything because a single citation
/// line can mention several volumes, report numbers etc. `recids` is filled
/// locally by deduplication, never by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reference {
    #[serde(default)]
    pub author: Vec<String>,
    #[serde(default)]
    pub journal_title: Vec<String>,
    #[serde(default)]
    pub journal_volume: Vec<String>,
    #[serde(default)]
    pub journal_page: Vec<String>,
    #[serde(default)]
    pub misc: Vec<String>,
    #[serde(default)]
    pub reportnumber: Vec<String>,
    #[serde(default)]
    pub year: Vec<String>,
    #[serde(default)]
    pub collaboration: Option<String>,
    #[serde(default)]
    pub linemarker: Vec<String>,
    #[serde(default)]
    pub title: Vec<String>,
    #[serde(skip)]
    pub recids: Vec<String>,
}

/// One PDF file after the filesystem walk and filename classification.
///
/// `structure` is `None` when the extraction call failed; the document is
/// still carried through the pipeline as a partial record.
#[derive(Debug)]
pub struct RawDocument {
    pub path: PathBuf,
    pub cnum: String,
    pub fpage: Option<String>,
    pub proceedings: bool,
    pub structure: Option<DocumentStructure>,
}

/// The merged per-document record, one per successfully walked PDF.
#[derive(Debug)]
pub struct CanonicalRecord {
    pub cnum: String,
    pub fpage: Option<String>,
    pub proceedings: bool,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub authors: Vec<Author>,
    pub references: Vec<Reference>,
    pub path: PathBuf,
}
