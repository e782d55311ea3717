//! Per-position allele evidence accumulated over a bounded trailing window.

mod record;
mod window;

pub use record::{IndelEvidence, PositionRecord, PositionState};
pub use window::{PositionObservationWindow, WindowError};
