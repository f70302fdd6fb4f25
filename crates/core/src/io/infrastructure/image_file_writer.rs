use std::path::Path;

use crate::io::domain::image_writer::ImageWriter;
use crate::shared::image::Image;

/// Writes an image to a file using the `image` crate, with the format
/// inferred from the extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, image: &Image) -> Result<(), Box<dyn std::error::Error>> {
        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        image.to_rgb8().save(path)?;
        Ok(())
    }
}
