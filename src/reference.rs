//! Read-only reference sequence shared across detectors.

use std::sync::Arc;

use crate::region::{Pos, PosRange};

/// Contiguous stretch of a reference contig.
///
/// Cloning is cheap; the sequence is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSegment {
    /// Contig/chromosome name.
    name: Arc<str>,
    /// Genome coordinate of the first base in `seq`.
    offset: Pos,
    /// Uppercase ASCII bases.
    seq: Arc<[u8]>,
}

impl ReferenceSegment {
    /// Wrap a reference sequence starting at `offset` on contig `name`.
    pub fn new(name: impl Into<Arc<str>>, offset: Pos, seq: impl AsRef<[u8]>) -> Self {
        let seq: Vec<u8> = seq.as_ref().to_ascii_uppercase();
        Self {
            name: name.into(),
            offset,
            seq: Arc::from(seq.into_boxed_slice()),
        }
    }

    /// Contig name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Covered genome range.
    pub fn range(&self) -> PosRange {
        PosRange::new(self.offset, self.offset + self.seq.len() as Pos)
    }

    /// Number of bases in the segment.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    /// True if the segment holds no bases.
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Reference base at genome coordinate `pos`.
    pub fn base_at(&self, pos: Pos) -> Option<u8> {
        let idx = usize::try_from(pos - self.offset).ok()?;
        self.seq.get(idx).copied()
    }

    /// Raw sequence.
    pub fn seq(&self) -> &[u8] {
        &self.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_lookup_respects_offset() {
        let reference = ReferenceSegment::new("chr1", 100, b"acgt");
        assert_eq!(reference.base_at(100), Some(b'A'));
        assert_eq!(reference.base_at(103), Some(b'T'));
        assert_eq!(reference.base_at(104), None);
        assert_eq!(reference.base_at(99), None);
        assert_eq!(reference.range(), PosRange::new(100, 104));
    }
}
