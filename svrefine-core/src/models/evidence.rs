use crate::models::Position;

///
/// Number of split reads for one sample at one position supporting one breakpoint
/// orientation.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitReadEvidence {
    pub sample: String,
    pub position: Position,
    /// `true` for `+` in evidence files
    pub strand: bool,
    pub count: u32,
}

impl SplitReadEvidence {
    pub fn new(sample: impl Into<String>, position: Position, strand: bool, count: u32) -> Self {
        SplitReadEvidence {
            sample: sample.into(),
            position,
            strand,
            count,
        }
    }
}

///
/// A discordant read pair for one sample. Carried on calls unchanged.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscordantPairEvidence {
    pub sample: String,
    pub start: Position,
    pub end: Position,
    pub start_strand: bool,
    pub end_strand: bool,
}
