use std::path::Path;

use crate::shared::image::Image;

/// Domain interface for encoding an image to a file.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, image: &Image) -> Result<(), Box<dyn std::error::Error>>;
}
