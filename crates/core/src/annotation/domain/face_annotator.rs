use crate::shared::image::Image;
use crate::shared::region::FaceRegion;

/// Domain interface for rendering detection results onto an image.
///
/// Implementations return a new annotated copy; the input image is never
/// mutated, so callers can keep the original for display or re-annotation.
/// When `label` is given, every region carries that one caption (labels
/// identify the source image, not individual faces); otherwise regions are
/// numbered "Face 1", "Face 2", … in the order they arrive.
pub trait FaceAnnotator: Send + Sync {
    fn annotate(&self, image: &Image, regions: &[FaceRegion], label: Option<&str>) -> Image;
}
