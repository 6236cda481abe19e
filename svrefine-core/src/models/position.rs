use std::fmt::{self, Display};

///
/// A single base on a contig. Coordinates are 1-based.
///
/// Positions on different contigs have no natural order of their own; compare them through a
/// [`SequenceDictionary`](crate::models::SequenceDictionary).
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub contig: String,
    pub position: u32,
}

impl Position {
    pub fn new(contig: impl Into<String>, position: u32) -> Self {
        Position {
            contig: contig.into(),
            position,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.position)
    }
}
