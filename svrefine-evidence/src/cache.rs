//! Windowed evidence cache.
//!
//! Refinement walks calls in genomic order and queries a window around each breakpoint.
//! Neighbouring windows overlap heavily, so [`CachingEvidenceFetcher`] keeps the evidence it
//! has already pulled from the source and only asks the source for the part of each new
//! window lying past what it holds.
//!
//! The buffer is a plain `Vec` used as an arena with two cursors: `head`, the first record
//! not yet evicted, and the fetch frontier, the last base the buffer is known to cover. At
//! every point `buffer[head..]` is exactly what the source returns for
//! `[covered.start, covered.end]`, filtered by the fetcher's filter. Records the filter
//! rejects are never buffered.
use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;

use svrefine_core::models::{GenomicInterval, Position, SequenceDictionary, SplitReadEvidence};

use crate::errors::{AggregatorError, Result};
use crate::source::EvidenceSource;

/// Evicted records are compacted away once at least this many have accumulated.
const COMPACT_THRESHOLD: usize = 4096;

/// Decides which fetched records are kept in the buffer.
pub type EvidenceFilter = fn(&SplitReadEvidence) -> bool;

fn keep_all(_evidence: &SplitReadEvidence) -> bool {
    true
}

enum Extension {
    Hit,
    Extend(GenomicInterval),
    Reset,
}

///
/// Serves split-read evidence for a forward-only sequence of intervals.
///
/// Each [`fetch`](Self::fetch) returns the same records as querying the source directly and
/// applying the filter, but the source is only queried for ranges not already buffered. Interval starts must be
/// non-decreasing in dictionary order; a request that moves backwards fails with
/// [`AggregatorError::UnsortedQuery`].
///
pub struct CachingEvidenceFetcher<S: EvidenceSource> {
    source: S,
    dictionary: Arc<SequenceDictionary>,
    filter: EvidenceFilter,
    buffer: Vec<SplitReadEvidence>,
    head: usize,
    covered: Option<GenomicInterval>,
    last_start: Option<Position>,
    queries_issued: usize,
}

impl<S: EvidenceSource> CachingEvidenceFetcher<S> {
    /// A fetcher that buffers every record the source returns.
    pub fn new(source: S, dictionary: Arc<SequenceDictionary>) -> Self {
        CachingEvidenceFetcher::with_filter(source, dictionary, keep_all)
    }

    /// A fetcher that only buffers, and so only serves, records passing `filter`.
    pub fn with_filter(
        source: S,
        dictionary: Arc<SequenceDictionary>,
        filter: EvidenceFilter,
    ) -> Self {
        CachingEvidenceFetcher {
            source,
            dictionary,
            filter,
            buffer: Vec::new(),
            head: 0,
            covered: None,
            last_start: None,
            queries_issued: 0,
        }
    }

    ///
    /// Return the filtered evidence inside `interval`, sorted in dictionary order.
    ///
    /// The slice borrows the buffer and is valid until the next fetch.
    ///
    /// # Arguments
    /// - interval: the window to serve; its start must not precede the previous request's
    ///
    pub fn fetch(&mut self, interval: &GenomicInterval) -> Result<&[SplitReadEvidence]> {
        let requested = interval.start_position();
        match &self.last_start {
            Some(previous) => {
                if self.dictionary.compare(previous, &requested)? == Ordering::Greater {
                    return Err(AggregatorError::UnsortedQuery {
                        previous: previous.clone(),
                        requested,
                    });
                }
            }
            None => {
                self.dictionary.index_of(&interval.contig)?;
            }
        }

        match self.plan(interval) {
            Extension::Hit => {}
            Extension::Extend(gap) => {
                let filter = self.filter;
                let records = self.query_source(&gap)?;
                self.buffer.extend(records.into_iter().filter(|e| filter(e)));
                if let Some(covered) = self.covered.as_mut() {
                    covered.end = interval.end;
                }
            }
            Extension::Reset => {
                debug!("Resetting split-read evidence buffer at {}", interval);
                let filter = self.filter;
                let mut records = self.query_source(interval)?;
                records.retain(|e| filter(e));
                self.buffer = records;
                self.head = 0;
                self.covered = Some(interval.clone());
            }
        }

        self.evict_before(interval.start);

        self.last_start = Some(requested);

        let pending = &self.buffer[self.head..];
        let served = pending.partition_point(|r| r.position.position <= interval.end);
        Ok(&pending[..served])
    }

    fn plan(&self, interval: &GenomicInterval) -> Extension {
        match &self.covered {
            Some(covered)
                if covered.contig == interval.contig && covered.start <= interval.start =>
            {
                if interval.end <= covered.end {
                    Extension::Hit
                } else if interval.start <= covered.end.saturating_add(1) {
                    Extension::Extend(GenomicInterval {
                        contig: interval.contig.clone(),
                        start: covered.end + 1,
                        end: interval.end,
                    })
                } else {
                    Extension::Reset
                }
            }
            _ => Extension::Reset,
        }
    }

    fn query_source(&mut self, interval: &GenomicInterval) -> Result<Vec<SplitReadEvidence>> {
        debug!("Querying split-read evidence source for {}", interval);
        self.queries_issued += 1;
        self.source
            .query(interval)
            .map_err(|source| AggregatorError::SourceQuery {
                interval: interval.clone(),
                source,
            })
    }

    // nothing before `start` can be requested again
    fn evict_before(&mut self, start: u32) {
        while self.head < self.buffer.len() && self.buffer[self.head].position.position < start {
            self.head += 1;
        }
        if let Some(covered) = self.covered.as_mut() {
            covered.start = covered.start.max(start);
        }
        if self.head >= COMPACT_THRESHOLD && self.head * 2 >= self.buffer.len() {
            self.buffer.drain(..self.head);
            self.head = 0;
        }
    }

    /// Number of queries sent to the source so far.
    pub fn queries_issued(&self) -> usize {
        self.queries_issued
    }

    /// Number of records currently held and not yet evicted.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() - self.head
    }

    /// The range the buffer currently covers, if anything has been fetched.
    pub fn covered(&self) -> Option<&GenomicInterval> {
        self.covered.as_ref()
    }

    pub fn dictionary(&self) -> &SequenceDictionary {
        &self.dictionary
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
