use log::warn;

use crate::model::Reference;
use crate::normalize::canonical_journal_title;
use crate::services::CatalogSearch;

/// Resolve a cleaned reference to existing catalog identifiers.
///
/// Strategy order, stopping at the first non-empty result:
/// 1. complete journal triple (title, volume, page) as a structured query
///    with a wildcard page suffix;
/// 2. the first report number, queried directly.
///
/// Best-effort: connector failures degrade to an empty list and the
/// reference is emitted without a linking subfield.
pub fn resolve_reference(reference: &Reference, catalog: &dyn CatalogSearch) -> Vec<String> {
    if let Some(pattern) = pubstring_pattern(reference) {
        match catalog.search(&pattern) {
            Ok(ids) if !ids.is_empty() => return ids,
            Ok(_) => {}
            Err(e) => warn!("Catalog lookup failed for `{}`: {}", pattern, e),
        }
    }

    if let Some(reportnumber) = reference.reportnumber.first() {
        match catalog.search(reportnumber) {
            Ok(ids) => return ids,
            Err(e) => warn!("Catalog lookup failed for `{}`: {}", reportnumber, e),
        }
    }

    Vec::new()
}

/// Structured query for a complete journal triple, `None` otherwise.
pub fn pubstring_pattern(reference: &Reference) -> Option<String> {
    let title = canonical_journal_title(reference)?;
    let volume = reference.journal_volume.first()?;
    let page = reference.journal_page.first()?;
    Some(format!(
        "773__p:{} 773__v:{} 773__c:{}*",
        title, volume, page
    ))
}
