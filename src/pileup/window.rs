use std::collections::BTreeMap;
use std::ops::Bound;

use crate::indel::IndelKey;
use crate::pileup::PositionRecord;
use crate::region::{Pos, PosRange};
use thiserror::Error;

/// Caller errors detected by the observation window.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// Position lies before the retention horizon and is no longer held.
    #[error("position {pos} is before the retention horizon {horizon}")]
    Evicted {
        /// Requested position.
        pos: Pos,
        /// Current retention horizon.
        horizon: Pos,
    },

    /// Observation arrived for a position whose counts are already frozen.
    #[error("position {pos} was already finalized (last finalized {last_finalized})")]
    AlreadyFinalized {
        /// Requested position.
        pos: Pos,
        /// Most recently finalized position.
        last_finalized: Pos,
    },

    /// Finalization requested behind the previous finalization point.
    #[error("finalization out of order: {pos} < last finalized {last_finalized}")]
    OutOfOrder {
        /// Requested position.
        pos: Pos,
        /// Most recently finalized position.
        last_finalized: Pos,
    },

    /// Eviction would discard a position that has not been finalized.
    #[error("cannot evict open position {pos} (requested horizon {horizon})")]
    UnfinalizedEviction {
        /// First open position below the requested horizon.
        pos: Pos,
        /// Requested horizon.
        horizon: Pos,
    },

    /// Classification queried before the position was finalized.
    #[error("position {pos} has not been finalized")]
    NotFinalized {
        /// Requested position.
        pos: Pos,
    },
}

/// Sliding accumulator of per-position allele evidence.
///
/// Only counts are kept per position; read identities stay with the caller.
///
/// Records are created lazily on first observation, frozen in position order
/// by [`finalize`](Self::finalize), and dropped by
/// [`evict_before`](Self::evict_before). Memory is proportional to the number
/// of observed positions between the retention horizon and the scan front.
#[derive(Debug, Default)]
pub struct PositionObservationWindow {
    records: BTreeMap<Pos, PositionRecord>,
    horizon: Option<Pos>,
    last_finalized: Option<Pos>,
}

impl PositionObservationWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that observations at `pos` would be accepted, without creating
    /// a record.
    pub fn ensure_open(&self, pos: Pos) -> Result<(), WindowError> {
        if let Some(horizon) = self.horizon.filter(|&horizon| pos < horizon) {
            return Err(WindowError::Evicted { pos, horizon });
        }
        if let Some(last_finalized) = self.last_finalized.filter(|&last| pos <= last) {
            return Err(WindowError::AlreadyFinalized {
                pos,
                last_finalized,
            });
        }
        Ok(())
    }

    fn open_record(&mut self, pos: Pos) -> Result<&mut PositionRecord, WindowError> {
        self.ensure_open(pos)?;
        Ok(self.records.entry(pos).or_insert_with(PositionRecord::new))
    }

    /// Count a read matching the reference at `pos`.
    pub fn insert_match(&mut self, pos: Pos) -> Result<(), WindowError> {
        self.open_record(pos)?.observe_match();
        Ok(())
    }

    /// Count a read reporting `base` instead of the reference at `pos`.
    pub fn insert_mismatch(&mut self, pos: Pos, base: u8) -> Result<(), WindowError> {
        self.open_record(pos)?.observe_mismatch(base);
        Ok(())
    }

    /// Record an indel anchored at `key.pos`; `is_support` marks observations
    /// that count towards active-region evidence.
    pub fn insert_indel(&mut self, key: &IndelKey, is_support: bool) -> Result<(), WindowError> {
        self.open_record(key.pos)?.observe_indel(key, is_support);
        Ok(())
    }

    /// Freeze every open position at or before `pos`.
    ///
    /// `classify` runs exactly once per observed position, in position order,
    /// and its verdict is cached in the record. Positions never observed are
    /// finalized implicitly as empty. Returns the observed positions frozen
    /// by this call.
    pub fn finalize<F>(&mut self, pos: Pos, mut classify: F) -> Result<Vec<Pos>, WindowError>
    where
        F: FnMut(Pos, &PositionRecord) -> bool,
    {
        let lower = match self.last_finalized {
            Some(last_finalized) if pos < last_finalized => {
                return Err(WindowError::OutOfOrder {
                    pos,
                    last_finalized,
                })
            }
            Some(last_finalized) if pos == last_finalized => return Ok(Vec::new()),
            Some(last_finalized) => Bound::Excluded(last_finalized),
            None => Bound::Unbounded,
        };

        let mut frozen = Vec::new();
        for (&record_pos, record) in self.records.range_mut((lower, Bound::Included(pos))) {
            let polymorphic = classify(record_pos, record);
            record.freeze(polymorphic);
            frozen.push(record_pos);
        }
        self.last_finalized = Some(pos);
        Ok(frozen)
    }

    /// Release every record strictly before `pos` and return how many were
    /// dropped. A horizon at or behind the current one is a no-op.
    pub fn evict_before(&mut self, pos: Pos) -> Result<usize, WindowError> {
        if self.horizon.is_some_and(|horizon| pos <= horizon) {
            return Ok(0);
        }

        let open_from = match self.last_finalized {
            Some(last_finalized) if last_finalized >= pos => None,
            Some(last_finalized) => Some(Bound::Excluded(last_finalized)),
            None => Some(Bound::Unbounded),
        };
        if let Some(lower) = open_from {
            if let Some((&open_pos, _)) =
                self.records.range((lower, Bound::Excluded(pos))).next()
            {
                return Err(WindowError::UnfinalizedEviction {
                    pos: open_pos,
                    horizon: pos,
                });
            }
        }

        let retained = self.records.split_off(&pos);
        let evicted = self.records.len();
        self.records = retained;
        self.horizon = Some(pos);
        Ok(evicted)
    }

    /// Cached classification of a finalized position.
    ///
    /// Finalized positions that never received an observation are not
    /// polymorphic.
    pub fn classification(&self, pos: Pos) -> Result<bool, WindowError> {
        if let Some(horizon) = self.horizon.filter(|&horizon| pos < horizon) {
            return Err(WindowError::Evicted { pos, horizon });
        }
        match self.last_finalized {
            Some(last_finalized) if pos <= last_finalized => Ok(self
                .records
                .get(&pos)
                .and_then(PositionRecord::polymorphic)
                .unwrap_or(false)),
            _ => Err(WindowError::NotFinalized { pos }),
        }
    }

    /// Record held for `pos`, if any.
    pub fn record(&self, pos: Pos) -> Option<&PositionRecord> {
        self.records.get(&pos)
    }

    /// Records inside `range`, in position order.
    pub fn records_in(&self, range: PosRange) -> impl Iterator<Item = (Pos, &PositionRecord)> + '_ {
        self.records
            .range(range.begin..range.end.max(range.begin))
            .map(|(&pos, record)| (pos, record))
    }

    /// Number of positions currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no position is held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest position still retained, once eviction has started.
    pub fn horizon(&self) -> Option<Pos> {
        self.horizon
    }

    /// Most recently finalized position.
    pub fn last_finalized(&self) -> Option<Pos> {
        self.last_finalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt_heavy(_: Pos, record: &PositionRecord) -> bool {
        record.max_alt_frequency() > 0.2
    }

    #[test]
    fn finalize_freezes_prefix_in_order() {
        let mut window = PositionObservationWindow::new();
        window.insert_match(3).unwrap();
        window.insert_mismatch(3, b'T').unwrap();
        window.insert_match(5).unwrap();
        window.insert_match(9).unwrap();

        let mut seen = Vec::new();
        let frozen = window
            .finalize(5, |pos, record| {
                seen.push(pos);
                alt_heavy(pos, record)
            })
            .unwrap();
        assert_eq!(frozen, vec![3, 5]);
        assert_eq!(seen, vec![3, 5]);

        assert_eq!(window.classification(3), Ok(true));
        assert_eq!(window.classification(4), Ok(false));
        assert_eq!(window.classification(5), Ok(false));
        assert_eq!(
            window.classification(9),
            Err(WindowError::NotFinalized { pos: 9 })
        );
    }

    #[test]
    fn inserts_after_finalization_fail() {
        let mut window = PositionObservationWindow::new();
        window.insert_match(1).unwrap();
        window.finalize(2, alt_heavy).unwrap();

        assert_eq!(
            window.insert_match(1),
            Err(WindowError::AlreadyFinalized {
                pos: 1,
                last_finalized: 2
            })
        );
        assert!(window.insert_mismatch(2, b'A').is_err());
        assert!(window.insert_match(3).is_ok());
    }

    #[test]
    fn finalize_rejects_regression() {
        let mut window = PositionObservationWindow::new();
        window.finalize(10, alt_heavy).unwrap();
        assert_eq!(window.finalize(10, alt_heavy), Ok(Vec::new()));
        assert_eq!(
            window.finalize(9, alt_heavy),
            Err(WindowError::OutOfOrder {
                pos: 9,
                last_finalized: 10
            })
        );
    }

    #[test]
    fn eviction_releases_frozen_records() {
        let mut window = PositionObservationWindow::new();
        for pos in 0..10 {
            window.insert_match(pos).unwrap();
        }
        window.finalize(6, alt_heavy).unwrap();

        assert_eq!(window.evict_before(4), Ok(4));
        assert_eq!(window.len(), 6);
        assert_eq!(window.horizon(), Some(4));
        assert_eq!(window.evict_before(2), Ok(0));
        assert_eq!(
            window.classification(1),
            Err(WindowError::Evicted { pos: 1, horizon: 4 })
        );
        assert_eq!(
            window.insert_match(2),
            Err(WindowError::Evicted { pos: 2, horizon: 4 })
        );
    }

    #[test]
    fn eviction_refuses_open_records() {
        let mut window = PositionObservationWindow::new();
        window.insert_match(3).unwrap();
        window.insert_match(8).unwrap();
        window.finalize(4, alt_heavy).unwrap();

        assert_eq!(
            window.evict_before(9),
            Err(WindowError::UnfinalizedEviction { pos: 8, horizon: 9 })
        );
        assert_eq!(window.len(), 2);
        assert_eq!(window.evict_before(8), Ok(1));
    }

    #[test]
    fn ensure_open_does_not_create_records() {
        let mut window = PositionObservationWindow::new();
        assert_eq!(window.ensure_open(3), Ok(()));
        assert!(window.is_empty());

        window.finalize(4, alt_heavy).unwrap();
        assert_eq!(
            window.ensure_open(4),
            Err(WindowError::AlreadyFinalized {
                pos: 4,
                last_finalized: 4
            })
        );
        assert!(window.is_empty());
    }

    #[test]
    fn records_in_range() {
        let mut window = PositionObservationWindow::new();
        let key = IndelKey::deletion(6, 2);
        window.insert_match(5).unwrap();
        window.insert_indel(&key, true).unwrap();
        window.insert_match(7).unwrap();

        let positions: Vec<Pos> = window
            .records_in(PosRange::new(6, 8))
            .map(|(pos, _)| pos)
            .collect();
        assert_eq!(positions, vec![6, 7]);
        assert_eq!(window.records_in(PosRange::new(8, 6)).count(), 0);
        assert_eq!(window.record(6).map(|record| record.indels.len()), Some(1));
    }
}
