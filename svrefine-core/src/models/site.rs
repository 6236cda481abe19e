use fxhash::FxHashMap as HashMap;

use crate::models::Position;

///
/// Aggregated split-read support at exactly one position: sample name to read count.
///
/// Every count is positive; zero counts are dropped on construction.
///
#[derive(PartialEq, Eq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitReadSite {
    position: Position,
    sample_counts: HashMap<String, u32>,
}

impl SplitReadSite {
    pub fn new(position: Position, mut sample_counts: HashMap<String, u32>) -> Self {
        sample_counts.retain(|_, count| *count > 0);
        SplitReadSite {
            position,
            sample_counts,
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn sample_counts(&self) -> &HashMap<String, u32> {
        &self.sample_counts
    }

    /// Count for `sample`, or zero if the sample has no support here.
    pub fn count(&self, sample: &str) -> u32 {
        self.sample_counts.get(sample).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.sample_counts.is_empty()
    }
}
