//! The output artifact written after a run, plus the human-readable
//! summary and CSV export consumed by downstream reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;

use crate::eligibility::Postcode;
use crate::listings::PoaResult;

/// Jobs artifact consumed by downstream reporting. Key spellings match
/// the published document format and must not drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobsArtifact {
    #[serde(rename = "generatedAtUTC")]
    pub generated_at_utc: DateTime<Utc>,
    #[serde(rename = "windowDays")]
    pub window_days: u32,
    pub source: String,
    #[serde(rename = "perPOA")]
    pub per_poa: BTreeMap<Postcode, PoaResult>,
}

impl JobsArtifact {
    /// A valid zero-result artifact, also used as the degraded-mode
    /// fallback when a full write fails.
    pub fn empty(window_days: u32, source: &str) -> Self {
        Self {
            generated_at_utc: Utc::now(),
            window_days,
            source: source.to_string(),
            per_poa: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, poa: Postcode, result: PoaResult) {
        self.per_poa.insert(poa, result);
    }

    pub fn total_jobs(&self) -> usize {
        self.per_poa.values().map(|result| result.count).sum()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Writes the artifact as pretty-printed JSON, creating the parent
/// directory on demand.
pub fn write_artifact<P: AsRef<Path>>(path: P, artifact: &JobsArtifact) -> Result<(), ReportError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(artifact)?;
    fs::write(path, json)?;
    Ok(())
}

/// Writes the artifact; if the write fails and nothing usable is on disk
/// yet, leaves a minimal valid empty-result document behind (best effort)
/// before surfacing the failure, so downstream consumers never read a
/// missing or truncated file.
pub fn write_artifact_or_fallback<P: AsRef<Path>>(
    path: P,
    artifact: &JobsArtifact,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    match write_artifact(path, artifact) {
        Ok(()) => Ok(()),
        Err(err) => {
            if !path.exists() {
                let empty = JobsArtifact::empty(artifact.window_days, &artifact.source);
                if let Err(fallback_err) = write_artifact(path, &empty) {
                    warn!(error = %fallback_err, "fallback empty artifact write failed");
                }
            }
            Err(err)
        }
    }
}

/// One `postcode,count` row per postal area, for spreadsheet consumers.
pub fn write_counts_csv<W: Write>(writer: W, artifact: &JobsArtifact) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["postcode", "count"])?;
    for (poa, result) in &artifact.per_poa {
        let count = result.count.to_string();
        csv_writer.write_record([poa.as_str(), count.as_str()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the artifact to stdout for quick inspection.
pub fn render_summary(artifact: &JobsArtifact, list_jobs: bool) {
    println!("462 eligibility run: {}", artifact.source);
    println!(
        "Generated {} (window {} days)",
        artifact.generated_at_utc.format("%Y-%m-%d %H:%M UTC"),
        artifact.window_days
    );
    println!("Postal areas covered: {}", artifact.per_poa.len());
    println!("Qualifying jobs: {}", artifact.total_jobs());

    let with_jobs: Vec<_> = artifact
        .per_poa
        .iter()
        .filter(|(_, result)| result.count > 0)
        .collect();
    if with_jobs.is_empty() {
        println!("\nNo postal area returned qualifying jobs.");
    } else {
        println!("\nJobs per postal area");
        for (poa, result) in &with_jobs {
            println!("- {}: {}", poa, result.count);
        }
    }

    if list_jobs {
        for (poa, result) in &artifact.per_poa {
            if result.items.is_empty() {
                continue;
            }
            println!("\n{poa}");
            for item in &result.items {
                let company = if item.company.is_empty() {
                    "unknown company"
                } else {
                    item.company.as_str()
                };
                println!("- {} | {} | {} | {}", item.title, company, item.age, item.url);
            }
        }
    }
}

/// Report-side failures. These never originate inside the core pipeline;
/// they belong to the output boundary.
#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
    Csv(csv::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Io(err) => write!(f, "failed to write report output: {err}"),
            ReportError::Serialize(err) => write!(f, "failed to serialise artifact: {err}"),
            ReportError::Csv(err) => write!(f, "failed to write counts CSV: {err}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io(err) => Some(err),
            ReportError::Serialize(err) => Some(err),
            ReportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
