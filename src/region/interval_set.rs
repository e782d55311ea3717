use std::collections::BTreeMap;
use std::fmt;

use super::{Pos, PosRange};

#[derive(Debug, Clone, PartialEq)]
struct Entry<P> {
    end: Pos,
    payload: P,
}

/// Canonical set of non-overlapping genomic intervals with attached payloads.
///
/// Intervals carrying equal payloads are merged whenever they overlap or
/// touch, so the set always holds the maximal disjoint spans per payload.
/// Intervals with different payloads may abut but never overlap.
///
/// `IntervalSet<()>` is the plain region tracker; any `P: PartialEq` turns it
/// into a payload tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSet<P = ()> {
    /// Keyed by interval begin. Ends are strictly increasing with begins.
    regions: BTreeMap<Pos, Entry<P>>,
}

impl<P> Default for IntervalSet<P> {
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }
}

impl<P: PartialEq> IntervalSet<P> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `range` with `payload`, merging it with every stored interval that
    /// overlaps or touches it and carries an equal payload.
    ///
    /// Returns `false` without modifying the set if the range overlaps a
    /// stored interval with a different payload. Intervals with a different
    /// payload that merely touch the range are left distinct.
    pub fn add_region(&mut self, range: PosRange, payload: P) -> bool {
        if range.is_empty() {
            return true;
        }

        let mut mergeable = Vec::new();
        for (&begin, entry) in self.regions.range(..=range.end).rev() {
            if entry.end < range.begin {
                break;
            }
            let stored = PosRange::new(begin, entry.end);
            if entry.payload != payload {
                if stored.is_range_intersect(&range) {
                    return false;
                }
                continue;
            }
            mergeable.push(begin);
        }

        let mut merged = range;
        for begin in mergeable {
            if let Some(entry) = self.regions.remove(&begin) {
                merged = merged.span(&PosRange::new(begin, entry.end));
            }
        }

        self.regions.insert(
            merged.begin,
            Entry {
                end: merged.end,
                payload,
            },
        );
        true
    }

    /// Payload of the interval covering `pos`, if any.
    pub fn payload_at(&self, pos: Pos) -> Option<&P> {
        self.regions
            .range(..=pos)
            .next_back()
            .filter(|(_, entry)| pos < entry.end)
            .map(|(_, entry)| &entry.payload)
    }

    /// True if some stored interval covers `pos`.
    pub fn contains_pos(&self, pos: Pos) -> bool {
        self.payload_at(pos).is_some()
    }

    /// True if `range` overlaps any stored interval, even partially.
    pub fn intersects(&self, range: &PosRange) -> bool {
        if range.is_empty() {
            return false;
        }
        self.regions
            .range(..range.end)
            .next_back()
            .is_some_and(|(_, entry)| entry.end > range.begin)
    }

    /// Payload of the single stored interval fully containing `range`.
    pub fn subset_payload(&self, range: &PosRange) -> Option<&P> {
        if range.is_empty() {
            return None;
        }
        self.regions
            .range(..=range.begin)
            .next_back()
            .filter(|(_, entry)| range.end <= entry.end)
            .map(|(_, entry)| &entry.payload)
    }

    /// True if `range` lies entirely within one stored interval.
    pub fn is_subset(&self, range: &PosRange) -> bool {
        self.subset_payload(range).is_some()
    }
}

impl<P> IntervalSet<P> {
    /// Remove every interval whose last covered position is at or before
    /// `pos`. Intervals straddling `pos` are kept whole.
    pub fn remove_to_pos(&mut self, pos: Pos) {
        while let Some(entry) = self.regions.first_entry() {
            if entry.get().end - 1 > pos {
                break;
            }
            entry.remove();
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// True when no interval is stored.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Drop all intervals.
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Stored intervals in begin order.
    pub fn iter(&self) -> impl Iterator<Item = (PosRange, &P)> + '_ {
        self.regions
            .iter()
            .map(|(&begin, entry)| (PosRange::new(begin, entry.end), &entry.payload))
    }

    /// Stored ranges in begin order, without payloads.
    pub fn ranges(&self) -> Vec<PosRange> {
        self.iter().map(|(range, _)| range).collect()
    }
}

impl IntervalSet<()> {
    /// Add a payload-free range. Always succeeds.
    pub fn add(&mut self, range: PosRange) {
        self.add_region(range, ());
    }
}

impl<P> fmt::Display for IntervalSet<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (range, _) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}", range)?;
            first = false;
        }
        Ok(())
    }
}
