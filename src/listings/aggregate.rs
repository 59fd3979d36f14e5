use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use super::source::RawListing;

fn added_line_pattern() -> &'static Regex {
    static ADDED: OnceLock<Regex> = OnceLock::new();
    ADDED.get_or_init(|| Regex::new(r"(?i)Added [^\n]+").expect("age pattern compiles"))
}

fn ago_pattern() -> &'static Regex {
    static AGO: OnceLock<Regex> = OnceLock::new();
    AGO.get_or_init(|| Regex::new(r"(?i)\d+\s+(?:day|hour)s?\s+ago").expect("age pattern compiles"))
}

/// Accepted listing as it appears in the output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingItem {
    pub title: String,
    pub company: String,
    pub location: String,
    pub age: String,
    pub url: String,
}

impl ListingItem {
    /// Builds the artifact item from a raw card. Cards without a link
    /// have no identity to dedupe on and yield `None`.
    fn from_raw(raw: &RawListing) -> Option<Self> {
        let url = raw.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        Some(Self {
            title: non_empty_or(raw.title.as_deref(), "Job"),
            company: non_empty_or(raw.company.as_deref(), ""),
            location: non_empty_or(raw.location.as_deref(), ""),
            age: extract_age(&raw.body_text),
            url: url.to_string(),
        })
    }
}

/// Age label for the artifact: the card's "Added ..." line when present,
/// else a "<N> days/hours ago" fragment, else empty.
fn extract_age(body: &str) -> String {
    added_line_pattern()
        .find(body)
        .or_else(|| ago_pattern().find(body))
        .map(|found| found.as_str().trim().to_string())
        .unwrap_or_default()
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => fallback.to_string(),
    }
}

/// Per-POA aggregate exposed in the output artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoaResult {
    pub count: usize,
    pub items: Vec<ListingItem>,
}

impl PoaResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Collects recency-filtered listings for a single postal area,
/// deduplicating by canonical URL. Items keep first-seen order across
/// packs; the seen-URL set is local to this instance and dies with it.
#[derive(Debug, Default)]
pub struct PoaAggregator {
    seen: HashSet<String>,
    items: Vec<ListingItem>,
}

impl PoaAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers one raw card, returning whether it was accepted. The caller
    /// applies the recency filter before offering.
    pub fn offer(&mut self, raw: &RawListing) -> bool {
        let Some(item) = ListingItem::from_raw(raw) else {
            return false;
        };
        if !self.seen.insert(item.url.clone()) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn finish(self) -> PoaResult {
        PoaResult {
            count: self.items.len(),
            items: self.items,
        }
    }
}
