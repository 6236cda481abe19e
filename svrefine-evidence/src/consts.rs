/// Bases added on each side of a breakpoint when querying split-read evidence.
pub const DEFAULT_SPLIT_READ_WINDOW: u32 = 50;

pub const START_SPLIT_READ_SITES: &str = "StartSplitReadSites";
pub const END_SPLIT_READ_SITES: &str = "EndSplitReadSites";
