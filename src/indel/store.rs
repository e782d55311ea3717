use crate::indel::{IndelKey, IndelObservation, SampleId};
use crate::region::Pos;
use thiserror::Error;

/// Errors raised by an indel candidate store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndelStoreError {
    /// No candidate is stored under the requested key.
    #[error("indel candidate {0} not found")]
    NotFound(IndelKey),

    /// Observation refers to a sample that was never registered.
    #[error("sample {sample_id} is not registered (registered samples: {registered})")]
    UnknownSample {
        /// Sample identifier supplied by the caller.
        sample_id: SampleId,
        /// Number of samples registered so far.
        registered: usize,
    },
}

/// Owner of candidate indel records, as seen by the active region detector.
///
/// The detector forwards every indel observation it receives and flags
/// candidates it confirms inside closed active regions. Lookups never create
/// candidates implicitly.
pub trait IndelCandidateStore {
    /// Record a single read's observation of a candidate indel.
    fn add_observation(
        &mut self,
        sample_id: SampleId,
        observation: &IndelObservation,
    ) -> Result<(), IndelStoreError>;

    /// Mark the candidate under `key` as confirmed in an active region.
    fn confirm(&mut self, key: &IndelKey) -> Result<(), IndelStoreError>;

    /// Drop candidates whose reference span ends at or before `pos`. Called
    /// as the retention horizon advances.
    fn clear_to_pos(&mut self, pos: Pos);
}
