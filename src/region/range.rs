use std::fmt;

/// Genome coordinate (0-based).
///
/// Signed so that trailing horizons such as `pos - window` stay representable
/// near the start of a contig.
pub type Pos = i64;

/// Half-open genomic range `[begin, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PosRange {
    /// First covered position.
    pub begin: Pos,
    /// One past the last covered position.
    pub end: Pos,
}

impl PosRange {
    /// Construct a new range.
    pub fn new(begin: Pos, end: Pos) -> Self {
        Self { begin, end }
    }

    /// Single-position range `[pos, pos + 1)`.
    pub fn point(pos: Pos) -> Self {
        Self::new(pos, pos + 1)
    }

    /// Number of covered positions (zero for empty ranges).
    pub fn size(&self) -> u64 {
        (self.end - self.begin).max(0) as u64
    }

    /// True when the range covers no position.
    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    /// Last covered position.
    pub fn last(&self) -> Pos {
        self.end - 1
    }

    /// True if `pos` lies inside the range.
    pub fn is_pos_intersect(&self, pos: Pos) -> bool {
        self.begin <= pos && pos < self.end
    }

    /// True if the two ranges share at least one position.
    pub fn is_range_intersect(&self, other: &PosRange) -> bool {
        self.begin < other.end && other.begin < self.end
    }

    /// True if the two ranges overlap or abut without a gap.
    pub fn is_touching(&self, other: &PosRange) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }

    /// True if `other` lies entirely within this range.
    pub fn is_superset_of(&self, other: &PosRange) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Smallest range covering both inputs.
    pub fn span(&self, other: &PosRange) -> PosRange {
        PosRange::new(self.begin.min(other.begin), self.end.max(other.end))
    }
}

impl fmt::Display for PosRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.begin, self.end)
    }
}

impl From<std::ops::Range<Pos>> for PosRange {
    fn from(range: std::ops::Range<Pos>) -> Self {
        Self::new(range.start, range.end)
    }
}
