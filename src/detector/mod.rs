//! Streaming active-region detection.
//!
//! The detector consumes per-read match, mismatch and indel observations in
//! non-decreasing position order and drives each position through
//! `Open -> Finalized -> Evicted`:
//!
//! 1. **Finalization** (`update_end_position`) freezes counts and classifies
//!    the position as polymorphic or not.
//! 2. **Clustering** merges polymorphic positions lying within
//!    `max_indel_size` of each other into one open active region, widened to
//!    cover supported deletions anchored inside it.
//! 3. **Closure** happens once no later position can join the region (or at
//!    end of input); every indel candidate anchored in a closed region is
//!    confirmed in the external store, and the region is returned from the
//!    `update_end_position` call that closed it.
//! 4. **Eviction** (`update_start_position`) releases records, retained
//!    regions and store candidates behind the retention horizon, keeping
//!    memory bounded by the window width.

mod config;
mod region;

pub use config::{
    ActiveRegionConfig, DEFAULT_MIN_ALT_FREQUENCY, DEFAULT_MIN_DEPTH, DEFAULT_MIN_INDEL_SUPPORT,
};
pub use region::{ActiveRegion, RegionState};

use crate::indel::{
    AlignId, IndelCandidateStore, IndelKey, IndelObservation, IndelStoreError, SampleId,
};
use crate::pileup::{PositionObservationWindow, WindowError};
use crate::reference::ReferenceSegment;
use crate::region::{IntervalSet, Pos, PosRange};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors reported by the active region detector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DetectorError {
    /// Thresholds rejected by [`ActiveRegionConfig::validate`].
    #[error("invalid detector configuration: {0}")]
    InvalidConfiguration(String),

    /// Retention horizon moved backwards.
    #[error("retention horizon regressed: {pos} < {horizon}")]
    HorizonRegression {
        /// Requested horizon.
        pos: Pos,
        /// Current horizon.
        horizon: Pos,
    },

    /// Ordering violation detected by the observation window.
    #[error("window error: {0}")]
    Window(#[from] WindowError),

    /// Failure reported by the indel candidate store.
    #[error("indel store error: {0}")]
    Store(#[from] IndelStoreError),
}

/// Classifies positions, forms active regions and confirms indel candidates.
///
/// Holds the reference and the indel store by reference; owns its
/// observation window and the set of closed active regions still inside the
/// retention horizon. Closed regions are handed to the caller, not queued.
#[derive(Debug)]
pub struct ActiveRegionDetector<'a, S: IndelCandidateStore> {
    reference: &'a ReferenceSegment,
    indel_store: &'a mut S,
    config: ActiveRegionConfig,
    window: PositionObservationWindow,
    active_regions: IntervalSet<()>,
    open_region: Option<ActiveRegion>,
    horizon: Option<Pos>,
}

impl<'a, S: IndelCandidateStore> ActiveRegionDetector<'a, S> {
    /// Create a detector with explicit thresholds.
    pub fn new(
        reference: &'a ReferenceSegment,
        indel_store: &'a mut S,
        config: ActiveRegionConfig,
    ) -> Result<Self, DetectorError> {
        config.validate()?;
        Ok(Self {
            reference,
            indel_store,
            config,
            window: PositionObservationWindow::new(),
            active_regions: IntervalSet::new(),
            open_region: None,
            horizon: None,
        })
    }

    /// Create a detector with default thresholds.
    pub fn with_max_indel_size(
        reference: &'a ReferenceSegment,
        indel_store: &'a mut S,
        max_indel_size: u32,
    ) -> Result<Self, DetectorError> {
        Self::new(reference, indel_store, ActiveRegionConfig::new(max_indel_size))
    }

    fn check_horizon(&self, pos: Pos) -> Result<(), DetectorError> {
        match self.horizon {
            Some(horizon) if pos < horizon => Err(WindowError::Evicted { pos, horizon }.into()),
            _ => Ok(()),
        }
    }

    /// Count a read matching the reference at `pos`.
    pub fn insert_match(&mut self, align_id: AlignId, pos: Pos) -> Result<(), DetectorError> {
        self.check_horizon(pos)?;
        trace!(align_id, pos, "match");
        self.window.insert_match(pos)?;
        Ok(())
    }

    /// Count a read reporting `base` at `pos`. A base equal to the reference
    /// is counted as a match.
    pub fn insert_mismatch(
        &mut self,
        align_id: AlignId,
        pos: Pos,
        base: u8,
    ) -> Result<(), DetectorError> {
        self.check_horizon(pos)?;
        if self.reference.base_at(pos) == Some(base.to_ascii_uppercase()) {
            return self.insert_match(align_id, pos);
        }
        trace!(align_id, pos, base = %char::from(base), "mismatch");
        self.window.insert_mismatch(pos, base)?;
        Ok(())
    }

    /// Record an indel observation for `sample_id` and forward it to the
    /// indel store.
    ///
    /// The window only records the key once the store has accepted the
    /// observation, so a rejected observation leaves no trace.
    pub fn insert_indel(
        &mut self,
        sample_id: SampleId,
        observation: &IndelObservation,
    ) -> Result<(), DetectorError> {
        let key = &observation.key;
        self.check_horizon(key.pos)?;
        self.window.ensure_open(key.pos)?;
        trace!(sample_id, key = %key, align_id = observation.data.align_id, "indel");
        self.indel_store.add_observation(sample_id, observation)?;
        self.window
            .insert_indel(key, observation.data.align_type.is_tier1())?;
        Ok(())
    }

    /// Finalize every position up to `pos`, extend or close active regions,
    /// and flush the open region when `is_last` is set.
    ///
    /// Returns the regions closed by this call, in closing order.
    pub fn update_end_position(
        &mut self,
        pos: Pos,
        is_last: bool,
    ) -> Result<Vec<ActiveRegion>, DetectorError> {
        let config = &self.config;
        let frozen = self
            .window
            .finalize(pos, |_, record| config.is_polymorphic(record))?;

        let mut closed = Vec::new();
        for site in frozen {
            if self.window.classification(site)? {
                let span = self.polymorphic_span(site);
                closed.extend(self.add_polymorphic_span(span)?);
            }
        }

        let max_gap = Pos::from(self.config.max_indel_size);
        let passed = self
            .open_region
            .as_ref()
            .is_some_and(|region| pos - region.range.last() > max_gap);
        if is_last || passed {
            closed.extend(self.close_open_region()?);
        }
        Ok(closed)
    }

    /// Advance the retention horizon to `pos`, evicting positions, closed
    /// regions and store candidates entirely behind it.
    ///
    /// Records and candidates of a still-open region are retained until it
    /// closes so that its indels can be confirmed.
    pub fn update_start_position(&mut self, pos: Pos) -> Result<(), DetectorError> {
        if let Some(horizon) = self.horizon.filter(|&horizon| pos < horizon) {
            return Err(DetectorError::HorizonRegression { pos, horizon });
        }
        let retain_from = self
            .open_region
            .as_ref()
            .map_or(pos, |region| region.range.begin.min(pos));
        let evicted = self.window.evict_before(retain_from)?;
        self.horizon = Some(pos);
        self.active_regions.remove_to_pos(pos - 1);
        self.indel_store.clear_to_pos(retain_from);
        if evicted > 0 {
            debug!(horizon = pos, evicted, retained = self.window.len(), "evicted positions");
        }
        Ok(())
    }

    /// Cached classification of a finalized position.
    pub fn is_polymorphic_site(&self, pos: Pos) -> Result<bool, DetectorError> {
        self.check_horizon(pos)?;
        Ok(self.window.classification(pos)?)
    }

    /// True if `pos` lies inside a closed active region still retained.
    pub fn is_in_active_region(&self, pos: Pos) -> bool {
        self.active_regions.contains_pos(pos)
    }

    /// Closed active regions still inside the retention horizon.
    pub fn active_regions(&self) -> Vec<PosRange> {
        self.active_regions.ranges()
    }

    /// Region currently accumulating polymorphic positions.
    pub fn open_region(&self) -> Option<&ActiveRegion> {
        self.open_region.as_ref()
    }

    /// Number of positions currently held in the observation window.
    pub fn retained_positions(&self) -> usize {
        self.window.len()
    }

    /// Current retention horizon.
    pub fn horizon(&self) -> Option<Pos> {
        self.horizon
    }

    /// Thresholds in use.
    pub fn config(&self) -> &ActiveRegionConfig {
        &self.config
    }

    /// Read access to the indel store.
    pub fn indel_store(&self) -> &S {
        &*self.indel_store
    }

    /// Span covered by a polymorphic position: the position itself, widened to
    /// the right edge of supported deletions anchored there.
    fn polymorphic_span(&self, pos: Pos) -> PosRange {
        let max_right = pos + Pos::from(self.config.max_indel_size);
        let indel_right = self
            .window
            .record(pos)
            .into_iter()
            .flat_map(|record| record.indels.iter())
            .filter(|evidence| evidence.support > 0)
            .map(|evidence| evidence.key.right_pos().min(max_right))
            .max()
            .unwrap_or(pos);
        let contig_end = self.reference.range().end;
        let end = indel_right.min(contig_end).max(pos + 1);
        PosRange::new(pos, end)
    }

    fn add_polymorphic_span(
        &mut self,
        span: PosRange,
    ) -> Result<Option<ActiveRegion>, DetectorError> {
        let max_gap = Pos::from(self.config.max_indel_size);
        if let Some(region) = self.open_region.as_mut() {
            if span.begin - region.range.last() <= max_gap {
                region.range = region.range.span(&span);
                return Ok(None);
            }
        }
        let closed = self.close_open_region()?;
        debug!(range = %span, "opened active region");
        self.open_region = Some(ActiveRegion::open(span));
        Ok(closed)
    }

    /// Confirm the open region's indels, then commit it as closed. On a store
    /// failure the region stays open and closing can be retried.
    fn close_open_region(&mut self) -> Result<Option<ActiveRegion>, DetectorError> {
        let Some(range) = self.open_region.as_ref().map(|region| region.range) else {
            return Ok(None);
        };

        let keys: Vec<IndelKey> = self
            .window
            .records_in(range)
            .flat_map(|(_, record)| record.indels.iter().map(|evidence| evidence.key.clone()))
            .collect();
        let mut confirmed = 0;
        for key in &keys {
            match self.indel_store.confirm(key) {
                Ok(()) => confirmed += 1,
                Err(IndelStoreError::NotFound(_)) => {
                    warn!(key = %key, range = %range, "indel candidate missing from store");
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.open_region = None;
        let region = ActiveRegion {
            range,
            state: RegionState::Closed,
            confirmed_indels: confirmed,
        };
        self.active_regions.add(range);
        debug!(
            range = %range,
            confirmed_indels = confirmed,
            "closed active region"
        );
        Ok(Some(region))
    }
}
