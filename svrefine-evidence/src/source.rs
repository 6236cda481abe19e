//! Evidence sources: anything that can answer sorted range queries for split-read evidence.
use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap as HashMap;

use svrefine_core::models::{GenomicInterval, Position, SequenceDictionary, SplitReadEvidence};
use svrefine_core::utils::{get_dynamic_reader, is_header_line};

use crate::errors::{AggregatorError, Result};

///
/// A store of split-read evidence that can be queried by interval.
///
/// Implementations must return exactly the records whose position lies inside `interval`,
/// sorted in dictionary order. Records sharing a position keep their stored order.
///
pub trait EvidenceSource {
    fn query(&mut self, interval: &GenomicInterval) -> anyhow::Result<Vec<SplitReadEvidence>>;
}

impl<S: EvidenceSource + ?Sized> EvidenceSource for Box<S> {
    fn query(&mut self, interval: &GenomicInterval) -> anyhow::Result<Vec<SplitReadEvidence>> {
        (**self).query(interval)
    }
}

///
/// In-memory evidence store indexed per contig.
///
/// Each query is a pair of binary searches into the contig's position-sorted records. Every
/// interval queried is logged, which makes the store handy for checking how often a caller
/// goes back to the source.
///
#[derive(Debug, Clone, Default)]
pub struct SortedEvidenceSource {
    by_contig: HashMap<String, Vec<SplitReadEvidence>>,
    queries: Vec<GenomicInterval>,
}

impl SortedEvidenceSource {
    ///
    /// Build a store from records in any order.
    ///
    /// Records are stably sorted by coordinate, so records at the same position keep their
    /// relative input order. Every contig must be present in `dictionary`.
    ///
    pub fn from_records(
        records: Vec<SplitReadEvidence>,
        dictionary: &SequenceDictionary,
    ) -> Result<Self> {
        let mut by_contig: HashMap<String, Vec<SplitReadEvidence>> = HashMap::default();
        for record in records {
            dictionary.index_of(&record.position.contig)?;
            by_contig
                .entry(record.position.contig.clone())
                .or_default()
                .push(record);
        }
        for records in by_contig.values_mut() {
            records.sort_by_key(|r| r.position.position);
        }

        Ok(SortedEvidenceSource {
            by_contig,
            queries: Vec::new(),
        })
    }

    ///
    /// Read split-read evidence from a tab-separated file.
    ///
    /// Columns are `contig start strand count sample`, with a 0-based start and a `+`/`-`
    /// strand. Gzipped files are detected by extension.
    ///
    pub fn from_path(path: &Path, dictionary: &SequenceDictionary) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        let mut records = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if is_header_line(&line) {
                continue;
            }
            let record = parse_evidence_line(&line).ok_or_else(|| {
                AggregatorError::EvidenceParseError {
                    line_number: i + 1,
                    line: line.clone(),
                }
            })?;
            records.push(record);
        }

        SortedEvidenceSource::from_records(records, dictionary)
    }

    pub fn len(&self) -> usize {
        self.by_contig.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every interval queried so far, in order.
    pub fn queries(&self) -> &[GenomicInterval] {
        &self.queries
    }
}

impl EvidenceSource for SortedEvidenceSource {
    fn query(&mut self, interval: &GenomicInterval) -> anyhow::Result<Vec<SplitReadEvidence>> {
        self.queries.push(interval.clone());

        let Some(records) = self.by_contig.get(&interval.contig) else {
            return Ok(Vec::new());
        };
        let lo = records.partition_point(|r| r.position.position < interval.start);
        let hi = records.partition_point(|r| r.position.position <= interval.end);

        Ok(records[lo..hi.max(lo)].to_vec())
    }
}

fn parse_evidence_line(line: &str) -> Option<SplitReadEvidence> {
    let mut fields = line.split('\t');
    let contig = fields.next()?;
    let start = fields.next()?.parse::<u32>().ok()?;
    let strand = match fields.next()? {
        "+" => true,
        "-" => false,
        _ => return None,
    };
    let count = fields.next()?.parse::<u32>().ok()?;
    let sample = fields.next()?.trim_end();
    if sample.is_empty() {
        return None;
    }

    Some(SplitReadEvidence::new(
        sample,
        Position::new(contig, start.checked_add(1)?),
        strand,
        count,
    ))
}
