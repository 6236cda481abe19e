use fxhash::FxHashMap as HashMap;

use svrefine_core::models::{Position, SequenceDictionary, SplitReadEvidence, SplitReadSite};

use crate::errors::{AggregatorError, Result};

///
/// Collapse sorted split-read evidence into one [`SplitReadSite`] per position.
///
/// Only records on `strand` with a positive count contribute. If a sample appears more than
/// once at a position the last record wins. Positions with no contributing record produce no
/// site, so the output is strictly increasing in position.
///
/// # Arguments
/// - evidence: records in dictionary order
/// - strand: the strand a record must carry to count
/// - dictionary: the order `evidence` is checked against
///
pub fn compute_sites(
    evidence: &[SplitReadEvidence],
    strand: bool,
    dictionary: &SequenceDictionary,
) -> Result<Vec<SplitReadSite>> {
    if !dictionary.is_ordered(evidence.iter().map(|e| &e.position))? {
        return Err(AggregatorError::UnsortedEvidence);
    }

    let mut sites = Vec::new();
    let mut position: Option<&Position> = None;
    let mut sample_counts: HashMap<String, u32> = HashMap::default();

    for e in evidence {
        if position != Some(&e.position) {
            if let Some(p) = position {
                flush(&mut sites, p, &mut sample_counts);
            }
            position = Some(&e.position);
        }
        if e.strand == strand && e.count > 0 {
            sample_counts.insert(e.sample.clone(), e.count);
        }
    }
    if let Some(p) = position {
        flush(&mut sites, p, &mut sample_counts);
    }

    sites.shrink_to_fit();
    Ok(sites)
}

#[inline]
fn flush(
    sites: &mut Vec<SplitReadSite>,
    position: &Position,
    sample_counts: &mut HashMap<String, u32>,
) {
    if !sample_counts.is_empty() {
        sites.push(SplitReadSite::new(
            position.clone(),
            std::mem::take(sample_counts),
        ));
    }
}
