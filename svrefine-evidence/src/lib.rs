//! Split-read evidence aggregation for structural-variant calls.
//!
//! Given calls in genomic order and a sorted store of per-sample split-read evidence, this
//! crate rebuilds each call's start or end split-read sites: the per-position, per-sample
//! read counts found in a window around the breakpoint.
//!
//! The pieces, leaf first:
//!
//! - [`source`]: the [`EvidenceSource`] trait and an in-memory [`SortedEvidenceSource`]
//! - [`cache`]: [`CachingEvidenceFetcher`], which serves overlapping windows without
//!   re-querying ranges it already holds
//! - [`sites`]: [`compute_sites`], the run-length collapse of sorted evidence into sites
//! - [`aggregator`]: [`SplitReadEvidenceAggregator`], which ties them together for one
//!   breakpoint [`Orientation`]
//!
//! Run one aggregator per orientation. Each owns its cache and must see calls in
//! non-decreasing order of the breakpoint it queries.
pub mod aggregator;
pub mod cache;
pub mod config;
pub mod consts;
pub mod errors;
pub mod progress;
pub mod sites;
pub mod source;

// re-exports
pub use self::aggregator::{Orientation, SplitReadEvidenceAggregator};
pub use self::cache::CachingEvidenceFetcher;
pub use self::config::AggregatorConfig;
pub use self::errors::{AggregatorError, Result};
pub use self::progress::ProgressReporter;
pub use self::sites::compute_sites;
pub use self::source::{EvidenceSource, SortedEvidenceSource};
