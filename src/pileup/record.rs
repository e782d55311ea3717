use crate::indel::IndelKey;

pub(crate) const NUM_BASES: usize = 4; // A, C, G, T

pub(crate) fn base_index(base: u8) -> Option<usize> {
    match base {
        b'A' | b'a' => Some(0),
        b'C' | b'c' => Some(1),
        b'G' | b'g' => Some(2),
        b'T' | b't' | b'U' | b'u' => Some(3),
        _ => None,
    }
}

/// Lifecycle of a position inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    /// Still accepting observations.
    Open,
    /// Counts frozen and classified.
    Finalized {
        /// Classification computed at finalization.
        polymorphic: bool,
    },
}

/// Indel evidence anchored at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndelEvidence {
    /// Candidate identity.
    pub key: IndelKey,
    /// Observations counting as active-region evidence.
    pub support: u32,
}

/// Aggregated allele evidence for one genome position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    /// Reads matching the reference.
    pub match_count: u32,
    /// Reads reporting each alternate base [A, C, G, T].
    pub mismatch_counts: [u32; NUM_BASES],
    /// Mismatching reads whose base is not one of A, C, G, T.
    pub ambiguous_count: u32,
    /// Indels anchored here, in first-seen order.
    pub indels: Vec<IndelEvidence>,
    state: PositionState,
}

impl PositionRecord {
    pub(crate) fn new() -> Self {
        Self {
            match_count: 0,
            mismatch_counts: [0; NUM_BASES],
            ambiguous_count: 0,
            indels: Vec::new(),
            state: PositionState::Open,
        }
    }

    pub(crate) fn observe_match(&mut self) {
        self.match_count += 1;
    }

    pub(crate) fn observe_mismatch(&mut self, base: u8) {
        match base_index(base) {
            Some(idx) => self.mismatch_counts[idx] += 1,
            None => self.ambiguous_count += 1,
        }
    }

    pub(crate) fn observe_indel(&mut self, key: &IndelKey, is_support: bool) {
        let increment = u32::from(is_support);
        match self.indels.iter_mut().find(|evidence| evidence.key == *key) {
            Some(evidence) => evidence.support += increment,
            None => self.indels.push(IndelEvidence {
                key: key.clone(),
                support: increment,
            }),
        }
    }

    pub(crate) fn freeze(&mut self, polymorphic: bool) {
        self.state = PositionState::Finalized { polymorphic };
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PositionState {
        self.state
    }

    /// Cached classification, once finalized.
    pub fn polymorphic(&self) -> Option<bool> {
        match self.state {
            PositionState::Open => None,
            PositionState::Finalized { polymorphic } => Some(polymorphic),
        }
    }

    /// Total reads aligned across the position (matches plus mismatches).
    pub fn depth(&self) -> u32 {
        self.match_count + self.mismatch_counts.iter().sum::<u32>() + self.ambiguous_count
    }

    /// Largest single alternate-base count and its base.
    pub fn max_mismatch(&self) -> Option<(u8, u32)> {
        const BASES: [u8; NUM_BASES] = [b'A', b'C', b'G', b'T'];
        self.mismatch_counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .max_by_key(|(_, count)| **count)
            .map(|(idx, &count)| (BASES[idx], count))
    }

    /// Frequency of the most common alternate base.
    pub fn max_alt_frequency(&self) -> f64 {
        let depth = self.depth();
        if depth == 0 {
            return 0.0;
        }
        self.max_mismatch()
            .map_or(0.0, |(_, count)| f64::from(count) / f64::from(depth))
    }

    /// Largest indel support count anchored here.
    pub fn max_indel_support(&self) -> u32 {
        self.indels.iter().map(|evidence| evidence.support).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_frequencies() {
        let mut record = PositionRecord::new();
        for _ in 0..6 {
            record.observe_match();
        }
        for _ in 0..3 {
            record.observe_mismatch(b'G');
        }
        record.observe_mismatch(b'c');
        record.observe_mismatch(b'N');

        assert_eq!(record.depth(), 11);
        assert_eq!(record.max_mismatch(), Some((b'G', 3)));
        assert!((record.max_alt_frequency() - 3.0 / 11.0).abs() < 1e-12);
        assert_eq!(record.polymorphic(), None);
    }

    #[test]
    fn indel_evidence_deduplicates_keys() {
        let mut record = PositionRecord::new();
        let key = IndelKey::insertion(4, "AG");
        record.observe_indel(&key, true);
        record.observe_indel(&key, true);
        record.observe_indel(&key, false);
        record.observe_indel(&IndelKey::deletion(4, 2), false);

        assert_eq!(record.indels.len(), 2);
        assert_eq!(record.max_indel_support(), 2);
    }

    #[test]
    fn empty_record_has_no_alt_frequency() {
        let record = PositionRecord::new();
        assert_eq!(record.depth(), 0);
        assert_eq!(record.max_alt_frequency(), 0.0);
        assert_eq!(record.max_mismatch(), None);
    }
}
