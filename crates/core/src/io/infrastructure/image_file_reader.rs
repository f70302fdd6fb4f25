use std::path::Path;

use crate::io::domain::image_reader::ImageReader;
use crate::shared::image::Image;

/// Decodes image files with the `image` crate, flattening any source
/// layout (RGBA, grayscale, palette) to 3-channel RGB.
///
/// An optional cap on the longest side downscales oversized inputs before
/// they reach the detector; scan cost grows with resolution, and a capped
/// image keeps worst-case latency bounded. The cap is a caller policy —
/// detection itself accepts any size.
pub struct ImageFileReader {
    max_dimension: Option<u32>,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self {
            max_dimension: None,
        }
    }

    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: Some(max_dimension),
        }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Image, Box<dyn std::error::Error>> {
        let decoded = image::open(path)?.to_rgb8();

        let rgb = match self.max_dimension {
            Some(cap) if decoded.width().max(decoded.height()) > cap => {
                let longest = decoded.width().max(decoded.height());
                let scale = f64::from(cap) / f64::from(longest);
                let w = ((f64::from(decoded.width()) * scale).round() as u32).max(1);
                let h = ((f64::from(decoded.height()) * scale).round() as u32).max(1);
                log::debug!(
                    "downscaling {}x{} to {w}x{h} (cap {cap})",
                    decoded.width(),
                    decoded.height()
                );
                image::imageops::resize(&decoded, w, h, image::imageops::FilterType::Triangle)
            }
            _ => decoded,
        };

        Ok(Image::from_rgb8(rgb))
    }
}
