use std::fmt::{self, Display};

use crate::errors::{GenomeError, Result};
use crate::models::{Position, SequenceDictionary};

///
/// A closed range `[start, end]` on one contig, 1-based.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenomicInterval {
    pub contig: String,
    pub start: u32,
    pub end: u32,
}

impl GenomicInterval {
    ///
    /// Create a new interval, rejecting zero coordinates and `start > end`.
    ///
    pub fn new(contig: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        let contig = contig.into();
        if start == 0 || start > end {
            return Err(GenomeError::InvalidInterval { contig, start, end });
        }
        Ok(GenomicInterval { contig, start, end })
    }

    /// The single-base interval covering `position`.
    pub fn from_position(position: &Position) -> Self {
        GenomicInterval {
            contig: position.contig.clone(),
            start: position.position,
            end: position.position,
        }
    }

    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.contig.clone(), self.start)
    }

    #[inline]
    pub fn contains(&self, position: &Position) -> bool {
        position.contig == self.contig
            && self.start <= position.position
            && position.position <= self.end
    }

    ///
    /// Widen the interval by `window` bases on each side, clamped to `[1, contig length]`.
    ///
    /// Clamping is silent. The interval itself must already lie on a contig of the
    /// dictionary and within its bounds.
    ///
    pub fn expand_within_contig(
        &self,
        window: u32,
        dictionary: &SequenceDictionary,
    ) -> Result<GenomicInterval> {
        let length = dictionary.length_of(&self.contig)?;
        if self.end > length {
            return Err(GenomeError::InvalidInterval {
                contig: self.contig.clone(),
                start: self.start,
                end: self.end,
            });
        }

        Ok(GenomicInterval {
            contig: self.contig.clone(),
            start: self.start.saturating_sub(window).max(1),
            end: self.end.saturating_add(window).min(length),
        })
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.contig, self.start, self.end)
    }
}
