use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::eligibility::{IndustryPack, Postcode};

/// Results-per-page assumed when applying the page bound to replayed
/// data; matches the live board's page size.
const RESULTS_PER_PAGE: usize = 20;

/// Raw job card as delivered by an acquisition backend. Only the body
/// text is guaranteed; the extracted fields depend on what the backend
/// could read off the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub body_text: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Failure to obtain listings. Per-query failures are isolated by the
/// pipeline; only failing to open a fixture at startup is fatal.
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("failed to read listing fixture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing fixture data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("listing backend unavailable: {0}")]
    Unavailable(String),
}

/// Acquisition boundary. Implementations own transport, pagination, and
/// retries; the pipeline only consumes the returned records and treats a
/// failed query as an empty sequence.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Finite, possibly empty sequence of raw cards for one
    /// (postcode, pack) query.
    async fn fetch_listings(
        &self,
        postcode: &Postcode,
        pack: IndustryPack,
    ) -> Result<Vec<RawListing>, AcquisitionError>;

    /// Attribution recorded in the output artifact's `source` field.
    fn source_name(&self) -> &str;
}

/// Replays recorded listings from a JSON document keyed by postcode and
/// pack label. Stands in for the live job-board backend in tests and
/// offline runs; postcodes or packs absent from the fixture simply yield
/// nothing.
pub struct FixtureSource {
    name: String,
    max_records: Option<usize>,
    listings: BTreeMap<String, BTreeMap<String, Vec<RawListing>>>,
}

impl FixtureSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, AcquisitionError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AcquisitionError> {
        let listings = serde_json::from_str(raw)?;
        Ok(Self {
            name: "Workforce Australia (replayed)".to_string(),
            max_records: None,
            listings,
        })
    }

    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Caps each replayed sequence at what `max_pages` result pages would
    /// have yielded on the live board.
    pub fn with_page_limit(mut self, max_pages: u32) -> Self {
        self.max_records = Some(max_pages as usize * RESULTS_PER_PAGE);
        self
    }
}

#[async_trait]
impl ListingSource for FixtureSource {
    async fn fetch_listings(
        &self,
        postcode: &Postcode,
        pack: IndustryPack,
    ) -> Result<Vec<RawListing>, AcquisitionError> {
        let mut records = self
            .listings
            .get(postcode.as_str())
            .and_then(|packs| packs.get(pack.label()))
            .cloned()
            .unwrap_or_default();
        if let Some(limit) = self.max_records {
            records.truncate(limit);
        }
        Ok(records)
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
