use thiserror::Error;

use crate::shared::image::Image;
use crate::shared::region::FaceRegion;

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("invalid input image: {reason}")]
    InvalidImage { reason: String },

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("invalid detector configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Domain interface for face detection.
///
/// Implementations are stateless per call: the pretrained classifier is
/// read-only after construction, so one detector may be shared across
/// threads and invoked concurrently, hence `&self` and `Send + Sync`.
///
/// An image with no detectable faces yields `Ok(vec![])` — an empty
/// result is success, not an error.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &Image) -> Result<Vec<FaceRegion>, DetectionError>;
}
