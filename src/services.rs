use std::fs;
use std::path::Path;
use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;

use crate::model::{DocumentStructure, Reference};

/// Failure of a collaborator call. Callers degrade on every variant: a
/// failed extraction yields a partial record, a failed search an unlinked
/// reference. Nothing is retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service returned HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("could not read input file: {0}")]
    Io(#[from] std::io::Error),
}

/// Document-structure extraction service (title/authors/abstract from raw
/// PDF bytes).
pub trait StructureExtractor {
    fn extract(&self, pdf: &[u8]) -> Result<DocumentStructure, ServiceError>;
}

/// Reference extraction service (loosely structured citations from a PDF
/// file).
pub trait ReferenceExtractor {
    fn extract(&self, pdf_path: &Path) -> Result<Vec<Reference>, ServiceError>;
}

/// Catalog search: a query pattern in, an ordered list of record identifiers
/// out.
pub trait CatalogSearch {
    fn search(&self, pattern: &str) -> Result<Vec<String>, ServiceError>;
}

fn blocking_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_default()
}

/// HTTP client for the Grobid-style structure extractor.
pub struct GrobidClient {
    base_url: String,
    client: Client,
}

impl GrobidClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: blocking_client(),
        }
    }
}

impl StructureExtractor for GrobidClient {
    fn extract(&self, pdf: &[u8]) -> Result<DocumentStructure, ServiceError> {
        let url = format!(
            "{}/processFulltextDocument",
            self.base_url.trim_end_matches('/')
        );
        let response = self.client.post(&url).body(pdf.to_vec()).send()?;
        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status()));
        }
        let structure: DocumentStructure = serde_json::from_str(&response.text()?)?;
        Ok(structure)
    }
}

/// HTTP client for the reference-extraction service.
pub struct RefExtractClient {
    base_url: String,
    client: Client,
}

impl RefExtractClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: blocking_client(),
        }
    }
}

impl ReferenceExtractor for RefExtractClient {
    fn extract(&self, pdf_path: &Path) -> Result<Vec<Reference>, ServiceError> {
        let url = format!("{}/extract", self.base_url.trim_end_matches('/'));
        let pdf = fs::read(pdf_path)?;
        info!("Extracting references from {:?}", pdf_path);
        let response = self.client.post(&url).body(pdf).send()?;
        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status()));
        }
        let references: Vec<Reference> = serde_json::from_str(&response.text()?)?;
        Ok(references)
    }
}

/// HTTP client for the catalog search connector.
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: blocking_client(),
        }
    }
}

impl CatalogSearch for CatalogClient {
    fn search(&self, pattern: &str) -> Result<Vec<String>, ServiceError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        info!("Searching catalog for: {}", pattern);
        let response = self
            .client
            .get(&url)
            .query(&[("p", pattern), ("of", "id")])
            .send()?;
        if !response.status().is_success() {
            return Err(ServiceError::Status(response.status()));
        }
        let ids: Value = serde_json::from_str(&response.text()?)?;
        // The service answers with a JSON array of identifiers, numeric or
        // string-typed depending on its version.
        let ids = ids
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }
}
