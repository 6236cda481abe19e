//! Split-read refinement of structural-variant calls.
//!
//! A [`SplitReadEvidenceAggregator`] is configured for one breakpoint [`Orientation`]. For
//! each call it fetches the evidence in a window around that breakpoint through a cache that
//! only keeps records not carrying the orientation's own strand flag, collapses them into [`SplitReadSite`]s with
//! [`compute_sites`] and returns a copy of the call with the matching site list replaced.
use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use svrefine_core::models::{
    GenomicInterval, SequenceDictionary, SplitReadEvidence, SplitReadSite, SvCallRecord,
};

use crate::cache::{CachingEvidenceFetcher, EvidenceFilter};
use crate::config::AggregatorConfig;
use crate::consts::{END_SPLIT_READ_SITES, START_SPLIT_READ_SITES};
use crate::errors::Result;
use crate::progress::ProgressReporter;
use crate::sites::compute_sites;
use crate::source::EvidenceSource;

/// Which breakpoint of a call an aggregator refines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Breakpoint A; fills the start site list.
    Start,
    /// Breakpoint B; fills the end site list.
    End,
}

impl Orientation {
    pub fn name(&self) -> &'static str {
        match self {
            Orientation::Start => START_SPLIT_READ_SITES,
            Orientation::End => END_SPLIT_READ_SITES,
        }
    }

    /// The oriented breakpoint as a single-base interval.
    pub fn breakpoint_interval(&self, call: &SvCallRecord) -> GenomicInterval {
        match self {
            Orientation::Start => call.position_a_interval(),
            Orientation::End => call.position_b_interval(),
        }
    }

    /// Strand of the oriented breakpoint; evidence must match it to count toward a site.
    pub fn strand(&self, call: &SvCallRecord) -> bool {
        match self {
            Orientation::Start => call.strand_a(),
            Orientation::End => call.strand_b(),
        }
    }

    /// Keeps records whose strand flag differs from the orientation's own flag
    /// (`true` for start, `false` for end).
    pub fn evidence_filter(&self) -> EvidenceFilter {
        match self {
            Orientation::Start => |e: &SplitReadEvidence| !e.strand,
            Orientation::End => |e: &SplitReadEvidence| e.strand,
        }
    }

    fn assign(&self, call: &SvCallRecord, sites: Vec<SplitReadSite>) -> SvCallRecord {
        match self {
            Orientation::Start => call.with_start_split_read_sites(sites),
            Orientation::End => call.with_end_split_read_sites(sites),
        }
    }
}

///
/// Refines calls with split-read evidence around one of their breakpoints.
///
/// Calls must be presented in non-decreasing dictionary order of the breakpoint this
/// aggregator queries; the underlying [`CachingEvidenceFetcher`] rejects windows that move
/// backwards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use svrefine_core::models::{
///     Breakpoint, Position, SequenceDictionary, SplitReadEvidence, SvCallRecord, SvType,
/// };
/// use svrefine_evidence::{Orientation, SortedEvidenceSource, SplitReadEvidenceAggregator};
///
/// let dictionary = Arc::new(SequenceDictionary::new(vec![("1".to_string(), 2000)]).unwrap());
/// let source = SortedEvidenceSource::from_records(
///     vec![SplitReadEvidence::new("s1", Position::new("1", 1002), false, 4)],
///     &dictionary,
/// )
/// .unwrap();
///
/// let mut aggregator =
///     SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start);
///
/// let call = SvCallRecord::new(
///     "del_1",
///     Breakpoint::new(Position::new("1", 1000), false),
///     Breakpoint::new(Position::new("1", 1500), true),
///     SvType::Deletion,
///     Some(500),
///     vec!["manta".to_string()],
/// );
/// let refined = aggregator.refine(&call).unwrap();
///
/// assert_eq!(refined.start_split_read_sites().len(), 1);
/// assert_eq!(refined.start_split_read_sites()[0].count("s1"), 4);
/// ```
pub struct SplitReadEvidenceAggregator<S: EvidenceSource> {
    fetcher: CachingEvidenceFetcher<S>,
    dictionary: Arc<SequenceDictionary>,
    window: u32,
    orientation: Orientation,
    progress: Option<Box<dyn ProgressReporter>>,
}

impl<S: EvidenceSource> SplitReadEvidenceAggregator<S> {
    pub fn new(
        source: S,
        dictionary: Arc<SequenceDictionary>,
        window: u32,
        orientation: Orientation,
    ) -> Self {
        SplitReadEvidenceAggregator {
            fetcher: CachingEvidenceFetcher::with_filter(
                source,
                Arc::clone(&dictionary),
                orientation.evidence_filter(),
            ),
            dictionary,
            window,
            orientation,
            progress: None,
        }
    }

    pub fn from_config(
        source: S,
        dictionary: Arc<SequenceDictionary>,
        config: &AggregatorConfig,
    ) -> Self {
        SplitReadEvidenceAggregator::new(source, dictionary, config.window, config.orientation)
    }

    /// Attach a progress reporter, ticked once per refined call.
    pub fn with_progress(mut self, progress: Box<dyn ProgressReporter>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn name(&self) -> &'static str {
        self.orientation.name()
    }

    pub fn fetcher(&self) -> &CachingEvidenceFetcher<S> {
        &self.fetcher
    }

    /// The oriented breakpoint widened by the window, clamped to its contig.
    pub fn query_interval(&self, call: &SvCallRecord) -> Result<GenomicInterval> {
        let interval = self
            .orientation
            .breakpoint_interval(call)
            .expand_within_contig(self.window, &self.dictionary)?;
        Ok(interval)
    }

    /// Keeps records whose strand flag differs from the orientation's own flag. The fetcher
    /// applies this before buffering.
    #[inline]
    pub fn evidence_filter(&self, evidence: &SplitReadEvidence) -> bool {
        (self.orientation.evidence_filter())(evidence)
    }

    ///
    /// Return `call` with the oriented site list rebuilt from split-read evidence.
    ///
    /// Depth-only calls come back unchanged. Every field other than the oriented site list is
    /// shared with `call`.
    ///
    pub fn refine(&mut self, call: &SvCallRecord) -> Result<SvCallRecord> {
        let refined = if call.is_depth_only() {
            call.clone()
        } else {
            let interval = self.query_interval(call)?;
            let strand = self.orientation.strand(call);
            let evidence = self.fetcher.fetch(&interval)?;
            let sites = compute_sites(evidence, strand, &self.dictionary)?;
            self.orientation.assign(call, sites)
        };

        if let Some(progress) = &self.progress {
            progress.tick(call.position_b());
        }

        Ok(refined)
    }

    ///
    /// Refine every call in order, stopping at the first error.
    ///
    pub fn refine_all<I>(&mut self, calls: I) -> Result<Vec<SvCallRecord>>
    where
        I: IntoIterator<Item = SvCallRecord>,
    {
        let refined = calls
            .into_iter()
            .map(|call| self.refine(&call))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "{}: refined {} calls with {} evidence queries",
            self.name(),
            refined.len(),
            self.fetcher.queries_issued()
        );

        Ok(refined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use svrefine_core::models::{
        Breakpoint, CopyNumberDistribution, DiscordantPairEvidence, Position, SvType,
    };

    use crate::errors::AggregatorError;
    use crate::source::SortedEvidenceSource;

    #[fixture]
    fn dictionary() -> Arc<SequenceDictionary> {
        Arc::new(
            SequenceDictionary::new(vec![("1".to_string(), 2000), ("2".to_string(), 2000)])
                .unwrap(),
        )
    }

    #[fixture]
    fn source(dictionary: Arc<SequenceDictionary>) -> SortedEvidenceSource {
        let records = vec![
            SplitReadEvidence::new("s1", Position::new("1", 940), false, 9),
            SplitReadEvidence::new("s1", Position::new("1", 990), false, 3),
            SplitReadEvidence::new("s2", Position::new("1", 990), true, 5),
            SplitReadEvidence::new("s2", Position::new("1", 1000), false, 2),
            SplitReadEvidence::new("s1", Position::new("1", 1040), false, 1),
            SplitReadEvidence::new("s1", Position::new("1", 1500), true, 6),
            SplitReadEvidence::new("s2", Position::new("1", 1510), true, 0),
            SplitReadEvidence::new("s3", Position::new("1", 1520), false, 7),
        ];
        SortedEvidenceSource::from_records(records, &dictionary).unwrap()
    }

    fn call(
        id: &str,
        a: u32,
        strand_a: bool,
        b: u32,
        strand_b: bool,
        algorithms: &[&str],
    ) -> SvCallRecord {
        SvCallRecord::new(
            id,
            Breakpoint::new(Position::new("1", a), strand_a),
            Breakpoint::new(Position::new("1", b), strand_b),
            SvType::Deletion,
            Some(b - a),
            algorithms.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn positions(sites: &[SplitReadSite]) -> Vec<u32> {
        sites.iter().map(|s| s.position().position).collect()
    }

    #[derive(Clone, Default)]
    struct RecordingProgress(Rc<RefCell<Vec<Position>>>);

    impl ProgressReporter for RecordingProgress {
        fn tick(&self, position: &Position) {
            self.0.borrow_mut().push(position.clone());
        }
    }

    #[rstest]
    #[case(Orientation::Start, (950, 1050))]
    #[case(Orientation::End, (1450, 1550))]
    fn test_query_interval(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
        #[case] orientation: Orientation,
        #[case] expected: (u32, u32),
    ) {
        let aggregator = SplitReadEvidenceAggregator::new(source, dictionary, 50, orientation);
        let interval = aggregator
            .query_interval(&call("c", 1000, false, 1500, true, &["manta"]))
            .unwrap();

        assert_eq!((interval.start, interval.end), expected);
    }

    #[rstest]
    fn test_query_interval_clamps(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
    ) {
        let aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start);
        let interval = aggregator
            .query_interval(&call("c", 20, false, 1990, true, &["manta"]))
            .unwrap();

        assert_eq!((interval.start, interval.end), (1, 70));
    }

    #[rstest]
    #[case(Orientation::Start, true, false)]
    #[case(Orientation::Start, false, true)]
    #[case(Orientation::End, true, true)]
    #[case(Orientation::End, false, false)]
    fn test_evidence_filter(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
        #[case] orientation: Orientation,
        #[case] strand: bool,
        #[case] kept: bool,
    ) {
        let aggregator = SplitReadEvidenceAggregator::new(source, dictionary, 50, orientation);
        let evidence = SplitReadEvidence::new("s1", Position::new("1", 10), strand, 1);
        assert_eq!(aggregator.evidence_filter(&evidence), kept);
    }

    #[rstest]
    fn test_refine_start(dictionary: Arc<SequenceDictionary>, source: SortedEvidenceSource) {
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start);
        let input = call("c", 1000, false, 1500, true, &["manta"]);

        let refined = aggregator.refine(&input).unwrap();

        // strand=true records are dropped by the start filter; 940 is outside the window
        assert_eq!(positions(refined.start_split_read_sites()), vec![990, 1000, 1040]);
        let sites = refined.start_split_read_sites();
        assert_eq!(sites[0].count("s1"), 3);
        assert_eq!(sites[0].count("s2"), 0);
        assert_eq!(sites[1].count("s2"), 2);
        assert!(refined.end_split_read_sites().is_empty());
        assert_eq!(refined.id(), "c");
    }

    #[rstest]
    #[case(Orientation::Start, 3)]
    #[case(Orientation::End, 1)]
    fn test_fetcher_buffers_only_filtered_evidence(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
        #[case] orientation: Orientation,
        #[case] buffered: usize,
    ) {
        let mut aggregator = SplitReadEvidenceAggregator::new(source, dictionary, 50, orientation);
        // [950, 1050] holds four records, three of them on `-`
        let input = call("c", 1000, false, 1000, false, &["manta"]);

        aggregator.refine(&input).unwrap();

        assert_eq!(aggregator.fetcher().buffered_len(), buffered);
    }

    #[rstest]
    #[case(Orientation::Start, 1000, false)]
    #[case(Orientation::End, 1500, true)]
    fn test_orientation_selects_breakpoint(
        #[case] orientation: Orientation,
        #[case] position: u32,
        #[case] strand: bool,
    ) {
        let input = call("c", 1000, false, 1500, true, &["manta"]);

        let interval = orientation.breakpoint_interval(&input);
        assert_eq!((interval.start, interval.end), (position, position));
        assert_eq!(orientation.strand(&input), strand);
    }

    #[rstest]
    fn test_refine_end(dictionary: Arc<SequenceDictionary>, source: SortedEvidenceSource) {
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::End);
        let input = call("c", 1000, false, 1500, true, &["manta"]);

        let refined = aggregator.refine(&input).unwrap();

        // zero counts never make a site
        assert_eq!(positions(refined.end_split_read_sites()), vec![1500]);
        assert_eq!(refined.end_split_read_sites()[0].count("s1"), 6);
        assert!(refined.start_split_read_sites().is_empty());
    }

    #[rstest]
    fn test_refine_end_strand_mismatch_gives_no_sites(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
    ) {
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::End);
        let input = call("c", 1000, false, 1500, false, &["manta"]);

        let refined = aggregator.refine(&input).unwrap();
        assert!(refined.end_split_read_sites().is_empty());
    }

    #[rstest]
    fn test_refine_shares_untouched_fields(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
    ) {
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start);
        let input = call("c", 1000, false, 1500, true, &["manta"])
            .with_discordant_pairs(vec![DiscordantPairEvidence {
                sample: "s1".to_string(),
                start: Position::new("1", 995),
                end: Position::new("1", 1505),
                start_strand: true,
                end_strand: false,
            }])
            .with_copy_number_distribution(CopyNumberDistribution::default());

        let refined = aggregator.refine(&input).unwrap();

        assert_eq!(refined.discordant_pairs(), input.discordant_pairs());
        assert!(std::ptr::eq(
            refined.discordant_pairs().as_ptr(),
            input.discordant_pairs().as_ptr()
        ));
        assert!(std::ptr::eq(
            refined.copy_number_distribution().unwrap(),
            input.copy_number_distribution().unwrap()
        ));
        assert_eq!(refined.breakpoint_a(), input.breakpoint_a());
        assert_eq!(refined.breakpoint_b(), input.breakpoint_b());
        assert!(input.start_split_read_sites().is_empty());
    }

    #[rstest]
    #[case(Orientation::Start)]
    #[case(Orientation::End)]
    fn test_depth_only_is_identity(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
        #[case] orientation: Orientation,
    ) {
        let progress = RecordingProgress::default();
        let mut aggregator = SplitReadEvidenceAggregator::new(source, dictionary, 50, orientation)
            .with_progress(Box::new(progress.clone()));
        let input = call("cnv", 1000, false, 1500, true, &["depth"]);

        let refined = aggregator.refine(&input).unwrap();

        assert_eq!(refined, input);
        assert_eq!(aggregator.fetcher().queries_issued(), 0);
        assert_eq!(*progress.0.borrow(), vec![Position::new("1", 1500)]);
    }

    #[rstest]
    fn test_refine_all_reuses_fetched_evidence(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
    ) {
        let progress = RecordingProgress::default();
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start)
                .with_progress(Box::new(progress.clone()));
        let calls = vec![
            call("a", 990, false, 1500, true, &["manta"]),
            call("b", 1000, false, 1510, true, &["manta"]),
            call("c", 1010, false, 1520, true, &["depth"]),
            call("d", 1020, false, 1520, true, &["wham"]),
        ];

        let refined = aggregator.refine_all(calls).unwrap();

        assert_eq!(refined.len(), 4);
        assert_eq!(
            positions(refined[0].start_split_read_sites()),
            vec![940, 990, 1000, 1040]
        );
        assert_eq!(positions(refined[1].start_split_read_sites()), vec![990, 1000, 1040]);
        assert!(refined[2].start_split_read_sites().is_empty());
        assert_eq!(positions(refined[3].start_split_read_sites()), vec![990, 1000, 1040]);
        assert_eq!(
            aggregator.fetcher().source().queries(),
            &[
                GenomicInterval::new("1", 940, 1040).unwrap(),
                GenomicInterval::new("1", 1041, 1050).unwrap(),
                GenomicInterval::new("1", 1051, 1070).unwrap(),
            ]
        );
        assert_eq!(progress.0.borrow().len(), 4);
    }

    #[rstest]
    fn test_refine_out_of_order_fails(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
    ) {
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start);
        let calls = vec![
            call("a", 1500, false, 1600, true, &["manta"]),
            call("b", 1000, false, 1100, true, &["manta"]),
        ];

        let result = aggregator.refine_all(calls);
        assert!(matches!(result, Err(AggregatorError::UnsortedQuery { .. })));
    }

    #[rstest]
    fn test_refine_unknown_contig_fails(
        dictionary: Arc<SequenceDictionary>,
        source: SortedEvidenceSource,
    ) {
        let mut aggregator =
            SplitReadEvidenceAggregator::new(source, dictionary, 50, Orientation::Start);
        let input = SvCallRecord::new(
            "bnd",
            Breakpoint::new(Position::new("chrZ", 10), true),
            Breakpoint::new(Position::new("1", 10), false),
            SvType::Bnd,
            None,
            vec!["manta".to_string()],
        );

        assert!(matches!(
            aggregator.refine(&input),
            Err(AggregatorError::Genome(_))
        ));
    }

    #[rstest]
    fn test_from_config(dictionary: Arc<SequenceDictionary>, source: SortedEvidenceSource) {
        let config = AggregatorConfig::new(75, Orientation::End);
        let aggregator = SplitReadEvidenceAggregator::from_config(source, dictionary, &config);

        assert_eq!(aggregator.window(), 75);
        assert_eq!(aggregator.orientation(), Orientation::End);
        assert_eq!(aggregator.name(), "EndSplitReadSites");
    }
}
