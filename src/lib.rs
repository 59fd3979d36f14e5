//! Monitors an Australian job board for listings that qualify under the
//! 462 regional work scheme, producing a per-postal-area count and listing
//! of recent qualifying jobs.
//!
//! The eligibility rules live in a versioned JSON document; listing
//! acquisition sits behind the [`listings::ListingSource`] trait so the
//! pipeline runs identically against a live backend or replayed fixtures.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod listings;
pub mod pipeline;
pub mod report;
pub mod telemetry;
