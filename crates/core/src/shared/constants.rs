/// Confidence placeholder attached to every detection: the classical cascade
/// emits no calibrated probability, so callers get a constant instead.
pub const SENTINEL_SCORE: f32 = 1.0;

pub const FRONTAL_CASCADE_NAME: &str = "frontal_default.cascade.json";
pub const FRONTAL_CASCADE_URL: &str =
    "https://github.com/neutrinographics/facemark/releases/download/v0.1.0/frontal_default.cascade.json";

pub const FULL_RANGE_CASCADE_NAME: &str = "full_range.cascade.json";
pub const FULL_RANGE_CASCADE_URL: &str =
    "https://github.com/neutrinographics/facemark/releases/download/v0.1.0/full_range.cascade.json";

pub const DEFAULT_SCALE_FACTOR: f32 = 1.1;
pub const DEFAULT_MIN_NEIGHBORS: u32 = 5;
pub const DEFAULT_MIN_SIZE: (u32, u32) = (40, 40);

/// Slider default carried over from the dashboard; inert for the cascade
/// backend (see `DetectorConfig::min_confidence`).
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.6;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
