use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detector::DetectionError;
use crate::shared::constants::{
    DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_NEIGHBORS, DEFAULT_MIN_SIZE, DEFAULT_SCALE_FACTOR,
    FRONTAL_CASCADE_NAME, FRONTAL_CASCADE_URL, FULL_RANGE_CASCADE_NAME, FULL_RANGE_CASCADE_URL,
};

/// Which pretrained cascade the detector loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Frontal faces at close range (selfies, webcam captures).
    ShortRange,
    /// Frontal faces across the full depth of a scene.
    FullRange,
}

impl ModelVariant {
    pub fn cascade_name(&self) -> &'static str {
        match self {
            ModelVariant::ShortRange => FRONTAL_CASCADE_NAME,
            ModelVariant::FullRange => FULL_RANGE_CASCADE_NAME,
        }
    }

    pub fn cascade_url(&self) -> &'static str {
        match self {
            ModelVariant::ShortRange => FRONTAL_CASCADE_URL,
            ModelVariant::FullRange => FULL_RANGE_CASCADE_URL,
        }
    }
}

/// Immutable detection parameters, fixed at detector construction.
///
/// Changing any field means constructing a new detector; cached instances
/// are never mutated (see [`crate::detection::infrastructure::detector_cache`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum confidence threshold. The cascade backend reports only the
    /// sentinel score, so this field has no effect on its output; it is kept
    /// so the call contract stays stable across detection backends.
    pub min_confidence: f32,

    pub variant: ModelVariant,

    /// Geometric growth rate of the scan pyramid. Must be > 1.0; each level
    /// shrinks the image by this factor, growing the effective window.
    pub scale_factor: f32,

    /// Minimum raw hits per cluster for suppression to keep it.
    /// `0` disables grouping entirely: every raw hit is reported.
    pub min_neighbors: u32,

    /// Smallest face to report, as `(width, height)` in pixels.
    pub min_size: (u32, u32),
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            variant: ModelVariant::FullRange,
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_neighbors: DEFAULT_MIN_NEIGHBORS,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), DetectionError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(DetectionError::InvalidConfig {
                reason: format!("scale factor must be > 1.0, got {}", self.scale_factor),
            });
        }
        if self.min_size.0 == 0 || self.min_size.1 == 0 {
            return Err(DetectionError::InvalidConfig {
                reason: format!(
                    "minimum window size must be at least 1x1, got {}x{}",
                    self.min_size.0, self.min_size.1
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(DetectionError::InvalidConfig {
                reason: format!(
                    "minimum confidence must be between 0.0 and 1.0, got {}",
                    self.min_confidence
                ),
            });
        }
        Ok(())
    }

    /// Hashable identity of this configuration, with float fields taken
    /// bit-exact so equal configs always share one cached detector.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            min_confidence_bits: self.min_confidence.to_bits(),
            variant: self.variant,
            scale_factor_bits: self.scale_factor.to_bits(),
            min_neighbors: self.min_neighbors,
            min_size: self.min_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    min_confidence_bits: u32,
    variant: ModelVariant,
    scale_factor_bits: u32,
    min_neighbors: u32,
    min_size: (u32, u32),
}
