use std::fmt;

use crate::region::PosRange;

/// Whether an active region can still grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionState {
    /// Later polymorphic positions may still extend the region.
    Open,
    /// The scan has moved past the region; its indels are confirmed.
    Closed,
}

/// Cluster of polymorphic evidence warranting haplotype analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveRegion {
    /// Covered reference span.
    pub range: PosRange,
    /// Confirmation state.
    pub state: RegionState,
    /// Indel candidates confirmed when the region closed.
    pub confirmed_indels: usize,
}

impl ActiveRegion {
    pub(crate) fn open(range: PosRange) -> Self {
        Self {
            range,
            state: RegionState::Open,
            confirmed_indels: 0,
        }
    }

    /// True once the region is closed.
    pub fn is_closed(&self) -> bool {
        self.state == RegionState::Closed
    }
}

impl fmt::Display for ActiveRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            RegionState::Open => "open",
            RegionState::Closed => "closed",
        };
        write!(
            f,
            "{}\t{}\tconfirmed_indels={}",
            self.range, state, self.confirmed_indels
        )
    }
}
