use std::collections::{BTreeMap, BTreeSet};

use crate::indel::{
    AlignId, IndelAlignType, IndelCandidateStore, IndelKey, IndelObservation, IndelStoreError,
    SampleId,
};
use crate::region::Pos;

/// Supporting alignments of one candidate within one sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndelSampleData {
    /// Tier-1 genome reads reporting the indel.
    pub tier1_align_ids: BTreeSet<AlignId>,
    /// Tier-2 genome reads reporting the indel.
    pub tier2_align_ids: BTreeSet<AlignId>,
    /// Reads below the mapping quality threshold reporting the indel.
    pub submap_count: u32,
}

impl IndelSampleData {
    fn observe(&mut self, align_id: AlignId, align_type: IndelAlignType) {
        match align_type {
            IndelAlignType::GenomeTier1Read => {
                self.tier1_align_ids.insert(align_id);
            }
            IndelAlignType::GenomeTier2Read => {
                self.tier2_align_ids.insert(align_id);
            }
            IndelAlignType::GenomeSubmapRead => self.submap_count += 1,
        }
    }
}

/// Candidate indel with its per-sample evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndelCandidate {
    sample_data: Vec<IndelSampleData>,
    /// Set once the candidate is anchored inside a closed active region.
    pub is_confirmed_in_active_region: bool,
}

impl IndelCandidate {
    fn new(sample_count: usize) -> Self {
        Self {
            sample_data: vec![IndelSampleData::default(); sample_count],
            is_confirmed_in_active_region: false,
        }
    }

    /// Evidence collected for `sample_id`.
    pub fn sample(&self, sample_id: SampleId) -> Option<&IndelSampleData> {
        self.sample_data.get(sample_id)
    }

    /// Distinct tier-1 reads supporting the candidate across all samples.
    pub fn tier1_support(&self) -> usize {
        self.sample_data
            .iter()
            .map(|data| data.tier1_align_ids.len())
            .sum()
    }
}

/// In-memory indel candidate store keyed by [`IndelKey`].
#[derive(Debug, Default)]
pub struct IndelBuffer {
    sample_labels: Vec<String>,
    candidates: BTreeMap<IndelKey, IndelCandidate>,
}

impl IndelBuffer {
    /// Create an empty store with no registered samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sample and return its identifier.
    ///
    /// Samples must be registered before any candidate is observed.
    pub fn register_sample(&mut self, label: impl Into<String>) -> SampleId {
        self.sample_labels.push(label.into());
        for candidate in self.candidates.values_mut() {
            candidate.sample_data.push(IndelSampleData::default());
        }
        self.sample_labels.len() - 1
    }

    /// Label given at registration.
    pub fn sample_label(&self, sample_id: SampleId) -> Option<&str> {
        self.sample_labels.get(sample_id).map(String::as_str)
    }

    /// Number of registered samples.
    pub fn sample_count(&self) -> usize {
        self.sample_labels.len()
    }

    /// Candidate stored under `key`.
    pub fn lookup(&self, key: &IndelKey) -> Result<&IndelCandidate, IndelStoreError> {
        self.candidates
            .get(key)
            .ok_or_else(|| IndelStoreError::NotFound(key.clone()))
    }

    /// Whether the candidate under `key` has been confirmed.
    pub fn is_confirmed(&self, key: &IndelKey) -> Result<bool, IndelStoreError> {
        self.lookup(key)
            .map(|candidate| candidate.is_confirmed_in_active_region)
    }

    /// All candidates in key order.
    pub fn candidates(&self) -> impl Iterator<Item = (&IndelKey, &IndelCandidate)> + '_ {
        self.candidates.iter()
    }

    /// Number of stored candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// True if no candidate is stored.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl IndelCandidateStore for IndelBuffer {
    fn add_observation(
        &mut self,
        sample_id: SampleId,
        observation: &IndelObservation,
    ) -> Result<(), IndelStoreError> {
        let sample_count = self.sample_labels.len();
        if sample_id >= sample_count {
            return Err(IndelStoreError::UnknownSample {
                sample_id,
                registered: sample_count,
            });
        }

        self.candidates
            .entry(observation.key.clone())
            .or_insert_with(|| IndelCandidate::new(sample_count))
            .sample_data[sample_id]
            .observe(observation.data.align_id, observation.data.align_type);
        Ok(())
    }

    fn confirm(&mut self, key: &IndelKey) -> Result<(), IndelStoreError> {
        let candidate = self
            .candidates
            .get_mut(key)
            .ok_or_else(|| IndelStoreError::NotFound(key.clone()))?;
        candidate.is_confirmed_in_active_region = true;
        Ok(())
    }

    fn clear_to_pos(&mut self, pos: Pos) {
        self.candidates
            .retain(|key, _| key.reference_span().end > pos);
    }
}
