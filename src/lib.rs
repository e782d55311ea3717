//! # Streaming Active-Region Detection
//!
//! Bounded-memory decision layer that sits inside a read-scanning loop of a
//! small-variant caller. While reads are scanned in genome-position order it
//!
//! 1. **Accumulates evidence**: per-position match, mismatch and indel counts
//!    in a sliding [`PositionObservationWindow`]
//! 2. **Classifies positions**: a finalized position is polymorphic when its
//!    alternate-base frequency or indel support crosses configured thresholds
//! 3. **Forms active regions**: nearby polymorphic positions are clustered in
//!    an [`IntervalSet`] of regions worth full haplotype analysis
//! 4. **Confirms indels**: candidates anchored inside closed regions are
//!    flagged in the external [`IndelCandidateStore`]
//!
//! Memory is proportional to the retention window, not to the contig length.
//!
//! ## Usage Example
//!
//! ```
//! use active_regions::{ActiveRegionDetector, IndelBuffer, ReferenceSegment};
//!
//! let reference = ReferenceSegment::new("chr1", 0, "TCTTT");
//! let mut store = IndelBuffer::new();
//! store.register_sample("sample");
//!
//! let mut detector = ActiveRegionDetector::with_max_indel_size(&reference, &mut store, 50)?;
//! for align_id in 0..50 {
//!     if align_id % 2 == 0 {
//!         detector.insert_mismatch(align_id, 2, b'A')?;
//!     } else {
//!         detector.insert_match(align_id, 2)?;
//!     }
//! }
//! detector.update_end_position(4, true)?;
//! assert!(detector.is_polymorphic_site(2)?);
//! assert!(detector.is_in_active_region(2));
//! # Ok::<(), active_regions::DetectorError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod detector;  // Polymorphism classification and active-region formation
pub mod indel;     // Indel candidate identities and store
pub mod pileup;    // Per-position observation window
pub mod reference; // Shared reference segment
pub mod region;    // Genomic ranges and interval sets

// Re-exports for convenience
pub use detector::{ActiveRegion, ActiveRegionConfig, ActiveRegionDetector, DetectorError, RegionState};
pub use indel::{
    AlignId, IndelAlignType, IndelBuffer, IndelCandidate, IndelCandidateStore, IndelKey,
    IndelKind, IndelObservation, IndelObservationData, IndelStoreError, SampleId,
};
pub use pileup::{PositionObservationWindow, PositionRecord, WindowError};
pub use reference::ReferenceSegment;
pub use region::{IntervalSet, Pos, PosRange};
