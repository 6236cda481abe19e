use svrefine_core::GenomeError;
use svrefine_core::models::{GenomicInterval, Position};
use thiserror::Error;

/// Error type for evidence aggregation.
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// Split-read evidence handed to the summarizer was not in dictionary order.
    #[error("Evidence list is not dictionary sorted")]
    UnsortedEvidence,

    /// A fetch started before the previous one. The cache never rewinds.
    #[error("Evidence query at {requested} starts before the previous query at {previous}")]
    UnsortedQuery {
        previous: Position,
        requested: Position,
    },

    /// The evidence source failed; no retry is attempted.
    #[error("Evidence source query failed for {interval}: {source}")]
    SourceQuery {
        interval: GenomicInterval,
        #[source]
        source: anyhow::Error,
    },

    /// A malformed line in an evidence file.
    #[error("Error parsing split-read evidence line {line_number}: {line}")]
    EvidenceParseError { line_number: usize, line: String },

    #[error("Invalid aggregator config: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Genome(#[from] GenomeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for evidence aggregation.
pub type Result<T> = std::result::Result<T, AggregatorError>;
