use std::fmt;

use crate::region::{Pos, PosRange};

/// Identifier of a read alignment supplied by the scanning loop.
pub type AlignId = u64;

/// Identifier of a sample registered with an indel store.
pub type SampleId = usize;

/// Shape of an indel relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndelKind {
    /// Bases inserted after the anchor; consumes no reference.
    Insertion,
    /// Reference bases removed starting at the anchor.
    Deletion,
    /// Reference bases replaced by a different inserted sequence.
    Swap,
}

/// Identity of a candidate indel.
///
/// Keys order by anchor position first, so a sorted store can be pruned from
/// the left as the scan advances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndelKey {
    /// Anchor position (first affected reference position).
    pub pos: Pos,
    /// Indel shape.
    pub kind: IndelKind,
    /// Number of reference bases removed (zero for insertions).
    pub length: u32,
    /// Inserted bases (empty for pure deletions).
    pub insert_seq: String,
}

impl IndelKey {
    /// Build a key from its raw parts.
    pub fn new(pos: Pos, kind: IndelKind, length: u32, insert_seq: impl Into<String>) -> Self {
        Self {
            pos,
            kind,
            length,
            insert_seq: insert_seq.into(),
        }
    }

    /// Insertion of `seq` at `pos`.
    pub fn insertion(pos: Pos, seq: impl Into<String>) -> Self {
        Self::new(pos, IndelKind::Insertion, 0, seq)
    }

    /// Deletion of `length` reference bases starting at `pos`.
    pub fn deletion(pos: Pos, length: u32) -> Self {
        Self::new(pos, IndelKind::Deletion, length, String::new())
    }

    /// Replacement of `length` reference bases at `pos` by `seq`.
    pub fn swap(pos: Pos, length: u32, seq: impl Into<String>) -> Self {
        Self::new(pos, IndelKind::Swap, length, seq)
    }

    /// Position just past the reference bases the indel consumes.
    pub fn right_pos(&self) -> Pos {
        match self.kind {
            IndelKind::Insertion => self.pos,
            IndelKind::Deletion | IndelKind::Swap => self.pos + Pos::from(self.length),
        }
    }

    /// Reference span touched by the indel; at least the anchor itself.
    pub fn reference_span(&self) -> PosRange {
        PosRange::new(self.pos, self.right_pos().max(self.pos + 1))
    }
}

impl fmt::Display for IndelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IndelKind::Insertion => write!(f, "{}:INS:{}", self.pos, self.insert_seq),
            IndelKind::Deletion => write!(f, "{}:DEL:{}", self.pos, self.length),
            IndelKind::Swap => write!(f, "{}:SWAP:{}:{}", self.pos, self.length, self.insert_seq),
        }
    }
}

/// How the read reporting an indel was aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndelAlignType {
    /// Primary genome alignment passing the strict filters.
    GenomeTier1Read,
    /// Genome alignment passing only the relaxed filters.
    GenomeTier2Read,
    /// Genome alignment below the mapping quality threshold.
    GenomeSubmapRead,
}

impl IndelAlignType {
    /// Observations of this type count as evidence for active regions.
    pub fn is_tier1(self) -> bool {
        matches!(self, IndelAlignType::GenomeTier1Read)
    }
}

/// Per-read details attached to an indel observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndelObservationData {
    /// Read alignment reporting the indel.
    pub align_id: AlignId,
    /// Alignment class of that read.
    pub align_type: IndelAlignType,
}

impl IndelObservationData {
    /// Tier-1 genome read observation.
    pub fn tier1(align_id: AlignId) -> Self {
        Self {
            align_id,
            align_type: IndelAlignType::GenomeTier1Read,
        }
    }
}

/// One read's report of a candidate indel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndelObservation {
    /// Candidate identity.
    pub key: IndelKey,
    /// Reporting read.
    pub data: IndelObservationData,
}

impl IndelObservation {
    /// Pair a key with its observation data.
    pub fn new(key: IndelKey, data: IndelObservationData) -> Self {
        Self { key, data }
    }
}
