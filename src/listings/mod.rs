//! The listing side of the pipeline: the acquisition boundary, the
//! recency filter applied to raw job cards, and per-POA aggregation.

mod aggregate;
mod recency;
mod source;

pub use aggregate::{ListingItem, PoaAggregator, PoaResult};
pub use recency::{RecencyFilter, DEFAULT_WINDOW_DAYS};
pub use source::{AcquisitionError, FixtureSource, ListingSource, RawListing};
