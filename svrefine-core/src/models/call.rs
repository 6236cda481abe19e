use std::fmt::{self, Display};
use std::str::FromStr;
use std::sync::Arc;

use fxhash::FxHashMap as HashMap;

use crate::models::{DiscordantPairEvidence, GenomicInterval, Position, SplitReadSite};

/// Algorithm name of calls made from read depth alone.
pub const DEPTH_ALGORITHM: &str = "depth";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SvType {
    Deletion,
    Duplication,
    Insertion,
    Inversion,
    Bnd,
    Cnv,
}

impl FromStr for SvType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEL" => Ok(SvType::Deletion),
            "DUP" => Ok(SvType::Duplication),
            "INS" => Ok(SvType::Insertion),
            "INV" => Ok(SvType::Inversion),
            "BND" => Ok(SvType::Bnd),
            "CNV" => Ok(SvType::Cnv),
            _ => Err(format!("Invalid SV type: {}", s)),
        }
    }
}

impl Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SvType::Deletion => "DEL",
            SvType::Duplication => "DUP",
            SvType::Insertion => "INS",
            SvType::Inversion => "INV",
            SvType::Bnd => "BND",
            SvType::Cnv => "CNV",
        };
        write!(f, "{}", s)
    }
}

/// One end of a call: where it is and which strand it joins.
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    pub position: Position,
    pub strand: bool,
}

impl Breakpoint {
    pub fn new(position: Position, strand: bool) -> Self {
        Breakpoint { position, strand }
    }
}

///
/// Per-sample copy-number state probabilities, indexed by copy number.
///
#[derive(PartialEq, Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyNumberDistribution {
    pub sample_probabilities: HashMap<String, Vec<f64>>,
}

#[derive(PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct CallCore {
    id: String,
    breakpoint_a: Breakpoint,
    breakpoint_b: Breakpoint,
    sv_type: SvType,
    length: Option<u32>,
    algorithms: Vec<String>,
}

///
/// A structural-variant call with its attached evidence.
///
/// Records are immutable. The `with_*` methods return a new record that shares every
/// untouched field with `self`; cloning a record is a handful of reference-count bumps.
///
#[derive(PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SvCallRecord {
    core: Arc<CallCore>,
    start_split_read_sites: Arc<[SplitReadSite]>,
    end_split_read_sites: Arc<[SplitReadSite]>,
    discordant_pairs: Arc<[DiscordantPairEvidence]>,
    copy_number_distribution: Option<Arc<CopyNumberDistribution>>,
}

impl SvCallRecord {
    ///
    /// Create a call with no attached evidence.
    ///
    pub fn new(
        id: impl Into<String>,
        breakpoint_a: Breakpoint,
        breakpoint_b: Breakpoint,
        sv_type: SvType,
        length: Option<u32>,
        algorithms: Vec<String>,
    ) -> Self {
        SvCallRecord {
            core: Arc::new(CallCore {
                id: id.into(),
                breakpoint_a,
                breakpoint_b,
                sv_type,
                length,
                algorithms,
            }),
            start_split_read_sites: Arc::from(Vec::new()),
            end_split_read_sites: Arc::from(Vec::new()),
            discordant_pairs: Arc::from(Vec::new()),
            copy_number_distribution: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.core.id
    }

    pub fn breakpoint_a(&self) -> &Breakpoint {
        &self.core.breakpoint_a
    }

    pub fn breakpoint_b(&self) -> &Breakpoint {
        &self.core.breakpoint_b
    }

    pub fn position_a(&self) -> &Position {
        &self.core.breakpoint_a.position
    }

    pub fn position_b(&self) -> &Position {
        &self.core.breakpoint_b.position
    }

    pub fn strand_a(&self) -> bool {
        self.core.breakpoint_a.strand
    }

    pub fn strand_b(&self) -> bool {
        self.core.breakpoint_b.strand
    }

    pub fn position_a_interval(&self) -> GenomicInterval {
        GenomicInterval::from_position(self.position_a())
    }

    pub fn position_b_interval(&self) -> GenomicInterval {
        GenomicInterval::from_position(self.position_b())
    }

    pub fn sv_type(&self) -> SvType {
        self.core.sv_type
    }

    pub fn length(&self) -> Option<u32> {
        self.core.length
    }

    pub fn algorithms(&self) -> &[String] {
        &self.core.algorithms
    }

    /// True when the call was made from read depth and nothing else.
    pub fn is_depth_only(&self) -> bool {
        matches!(self.core.algorithms.as_slice(), [only] if only == DEPTH_ALGORITHM)
    }

    pub fn start_split_read_sites(&self) -> &[SplitReadSite] {
        &self.start_split_read_sites
    }

    pub fn end_split_read_sites(&self) -> &[SplitReadSite] {
        &self.end_split_read_sites
    }

    pub fn discordant_pairs(&self) -> &[DiscordantPairEvidence] {
        &self.discordant_pairs
    }

    pub fn copy_number_distribution(&self) -> Option<&CopyNumberDistribution> {
        self.copy_number_distribution.as_deref()
    }

    pub fn with_start_split_read_sites(&self, sites: Vec<SplitReadSite>) -> Self {
        SvCallRecord {
            start_split_read_sites: Arc::from(sites),
            ..self.clone()
        }
    }

    pub fn with_end_split_read_sites(&self, sites: Vec<SplitReadSite>) -> Self {
        SvCallRecord {
            end_split_read_sites: Arc::from(sites),
            ..self.clone()
        }
    }

    pub fn with_discordant_pairs(&self, pairs: Vec<DiscordantPairEvidence>) -> Self {
        SvCallRecord {
            discordant_pairs: Arc::from(pairs),
            ..self.clone()
        }
    }

    pub fn with_copy_number_distribution(&self, distribution: CopyNumberDistribution) -> Self {
        SvCallRecord {
            copy_number_distribution: Some(Arc::new(distribution)),
            ..self.clone()
        }
    }
}
