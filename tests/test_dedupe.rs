use std::cell::RefCell;

use procmarc::dedupe::{pubstring_pattern, resolve_reference};
use procmarc::model::Reference;
use procmarc::services::{CatalogSearch, ServiceError};

/// Catalog fake that records queries and replays canned answers.
struct FakeCatalog {
    queries: RefCell<Vec<String>>,
    answers: RefCell<Vec<Result<Vec<String>, ()>>>,
}

impl FakeCatalog {
    fn new(answers: Vec<Result<Vec<String>, ()>>) -> Self {
        Self {
            queries: RefCell::new(Vec::new()),
            answers: RefCell::new(answers),
        }
    }
}

impl CatalogSearch for FakeCatalog {
    fn search(&self, pattern: &str) -> Result<Vec<String>, ServiceError> {
        self.queries.borrow_mut().push(pattern.to_string());
        match self.answers.borrow_mut().remove(0) {
            Ok(ids) => Ok(ids),
            Err(()) => Err(ServiceError::Status(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            )),
        }
    }
}

fn journal_reference() -> Reference {
    Reference {
        journal_title: vec!["Phys. Rev. D".to_string()],
        journal_volume: vec!["96".to_string()],
        journal_page: vec!["123".to_string()],
        reportnumber: vec!["arXiv:1234.5678".to_string()],
        ..Default::default()
    }
}

#[test]
fn test_pubstring_pattern_shape() {
    assert_eq!(
        pubstring_pattern(&journal_reference()).as_deref(),
        Some("773__p:Phys.Rev.D 773__v:96 773__c:123*")
    );
}

#[test]
fn test_journal_triple_strategy_wins_when_it_answers() {
    let catalog = FakeCatalog::new(vec![Ok(vec!["111".to_string()])]);
    let ids = resolve_reference(&journal_reference(), &catalog);
    assert_eq!(ids, vec!["111".to_string()]);
    assert_eq!(catalog.queries.borrow().len(), 1);
    assert!(catalog.queries.borrow()[0].starts_with("773__p:"));
}

#[test]
fn test_report_number_fallback_on_empty_first_result() {
    let catalog = FakeCatalog::new(vec![Ok(Vec::new()), Ok(vec!["222".to_string()])]);
    let ids = resolve_reference(&journal_reference(), &catalog);
    assert_eq!(ids, vec!["222".to_string()]);
    let queries = catalog.queries.borrow();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1], "arXiv:1234.5678");
}

#[test]
fn test_report_number_used_directly_without_journal_triple() {
    let reference = Reference {
        reportnumber: vec!["arXiv:1234.5678".to_string()],
        ..Default::default()
    };
    let catalog = FakeCatalog::new(vec![Ok(vec!["333".to_string()])]);
    let ids = resolve_reference(&reference, &catalog);
    assert_eq!(ids, vec!["333".to_string()]);
    assert_eq!(catalog.queries.borrow()[0], "arXiv:1234.5678");
}

#[test]
fn test_connector_failure_degrades_to_empty() {
    let catalog = FakeCatalog::new(vec![Err(()), Err(())]);
    let ids = resolve_reference(&journal_reference(), &catalog);
    assert!(ids.is_empty());
}

#[test]
fn test_no_strategy_applicable_yields_empty_without_queries() {
    let reference = Reference::default();
    let catalog = FakeCatalog::new(Vec::new());
    let ids = resolve_reference(&reference, &catalog);
    assert!(ids.is_empty());
    assert!(catalog.queries.borrow().is_empty());
}
