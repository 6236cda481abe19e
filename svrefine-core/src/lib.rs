//! Core models shared by the svrefine crates.
//!
//! This crate defines the genomic coordinate system used throughout the workspace: 1-based
//! [`Position`](models::Position)s and inclusive [`GenomicInterval`](models::GenomicInterval)s
//! ordered by a [`SequenceDictionary`](models::SequenceDictionary), together with the
//! split-read evidence, site and structural-variant call records the refinement engine
//! consumes and produces.
//!
//! ```
//! use svrefine_core::models::{GenomicInterval, SequenceDictionary};
//!
//! let dictionary = SequenceDictionary::new(vec![("1".to_string(), 2000)]).unwrap();
//! let window = GenomicInterval::new("1", 20, 20)
//!     .unwrap()
//!     .expand_within_contig(50, &dictionary)
//!     .unwrap();
//!
//! assert_eq!((window.start, window.end), (1, 70));
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::{GenomeError, Result};
