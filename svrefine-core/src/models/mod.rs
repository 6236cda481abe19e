pub mod call;
pub mod dictionary;
pub mod evidence;
pub mod interval;
pub mod position;
pub mod site;

// re-export for cleaner imports
pub use self::call::{Breakpoint, CopyNumberDistribution, SvCallRecord, SvType, DEPTH_ALGORITHM};
pub use self::dictionary::SequenceDictionary;
pub use self::evidence::{DiscordantPairEvidence, SplitReadEvidence};
pub use self::interval::GenomicInterval;
pub use self::position::Position;
pub use self::site::SplitReadSite;
