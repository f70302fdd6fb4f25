use std::path::Path;

use crate::shared::image::Image;

/// Domain interface for decoding an image file into RGB pixels.
///
/// Decoding failures (unsupported format, truncated file) belong to this
/// boundary, not to the detection pipeline — by the time an [`Image`]
/// exists it is structurally valid.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Image, Box<dyn std::error::Error>>;
}
