//! Candidate indel identities, per-read observations, and the store that owns
//! candidate records and their active-region confirmation flag.

mod buffer;
mod key;
mod store;

pub use buffer::{IndelBuffer, IndelCandidate, IndelSampleData};
pub use key::{
    AlignId, IndelAlignType, IndelKey, IndelKind, IndelObservation, IndelObservationData,
    SampleId,
};
pub use store::{IndelCandidateStore, IndelStoreError};
