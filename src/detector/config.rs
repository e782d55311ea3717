use crate::detector::DetectorError;
use crate::pileup::PositionRecord;

/// Minimum read depth for the SNV test.
pub const DEFAULT_MIN_DEPTH: u32 = 10;
/// Alternate-base frequency that must be exceeded for the SNV test.
pub const DEFAULT_MIN_ALT_FREQUENCY: f64 = 0.2;
/// Supporting tier-1 reads that make an indel anchor polymorphic.
pub const DEFAULT_MIN_INDEL_SUPPORT: u32 = 3;

/// Thresholds driving polymorphism classification and region clustering.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveRegionConfig {
    /// Largest indel considered; also the clustering distance between
    /// polymorphic positions of one active region.
    pub max_indel_size: u32,
    /// Minimum depth (matches plus mismatches) for the SNV test.
    pub min_depth: u32,
    /// Most frequent alternate base must exceed this fraction of depth.
    pub min_alt_frequency: f64,
    /// Indel support at or above this count marks the anchor polymorphic.
    pub min_indel_support: u32,
}

impl ActiveRegionConfig {
    /// Default thresholds for the given maximum indel size.
    pub fn new(max_indel_size: u32) -> Self {
        Self {
            max_indel_size,
            min_depth: DEFAULT_MIN_DEPTH,
            min_alt_frequency: DEFAULT_MIN_ALT_FREQUENCY,
            min_indel_support: DEFAULT_MIN_INDEL_SUPPORT,
        }
    }

    /// Set the SNV depth floor.
    pub fn with_min_depth(mut self, min_depth: u32) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Set the alternate-base frequency threshold.
    pub fn with_min_alt_frequency(mut self, min_alt_frequency: f64) -> Self {
        self.min_alt_frequency = min_alt_frequency;
        self
    }

    /// Set the indel support floor.
    pub fn with_min_indel_support(mut self, min_indel_support: u32) -> Self {
        self.min_indel_support = min_indel_support;
        self
    }

    /// Reject thresholds that would make every or no position polymorphic.
    pub fn validate(&self) -> Result<(), DetectorError> {
        if self.max_indel_size == 0 {
            return Err(DetectorError::InvalidConfiguration(
                "max indel size must be > 0".to_string(),
            ));
        }
        if self.min_depth == 0 {
            return Err(DetectorError::InvalidConfiguration(
                "min depth must be > 0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.min_alt_frequency) {
            return Err(DetectorError::InvalidConfiguration(format!(
                "min alt frequency {} outside [0, 1)",
                self.min_alt_frequency
            )));
        }
        if self.min_indel_support == 0 {
            return Err(DetectorError::InvalidConfiguration(
                "min indel support must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// SNV evidence: enough depth and a dominant alternate base.
    pub fn is_snv_evidence(&self, record: &PositionRecord) -> bool {
        record.depth() >= self.min_depth && record.max_alt_frequency() > self.min_alt_frequency
    }

    /// Indel evidence: some anchored indel has enough supporting reads.
    pub fn is_indel_evidence(&self, record: &PositionRecord) -> bool {
        record.max_indel_support() >= self.min_indel_support
    }

    /// Classification applied once per position at finalization.
    pub fn is_polymorphic(&self, record: &PositionRecord) -> bool {
        self.is_snv_evidence(record) || self.is_indel_evidence(record)
    }
}
