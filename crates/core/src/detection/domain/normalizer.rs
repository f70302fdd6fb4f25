use crate::detection::domain::face_detector::DetectionError;
use crate::shared::image::{GrayImage, Image};

/// Converts an RGB image into the single-channel, contrast-normalized form
/// the window scanner operates on.
///
/// Cascade classifiers look at luminance texture, not color, and histogram
/// equalization compensates for exposure variance across uploads and webcam
/// frames. Rejects zero-dimension or non-3-channel input with
/// [`DetectionError::InvalidImage`]; any well-formed image normalizes.
pub fn normalize(image: &Image) -> Result<GrayImage, DetectionError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DetectionError::InvalidImage {
            reason: format!(
                "image dimensions must be at least 1x1, got {}x{}",
                image.width(),
                image.height()
            ),
        });
    }
    if image.channels() != 3 {
        return Err(DetectionError::InvalidImage {
            reason: format!("expected 3 channels, got {}", image.channels()),
        });
    }

    Ok(equalize(&to_luma(image)))
}

/// Rec. 601 luma weighting, integer arithmetic with rounding.
fn to_luma(image: &Image) -> GrayImage {
    let data = image
        .data()
        .chunks_exact(3)
        .map(|px| {
            let weighted =
                299 * u32::from(px[0]) + 587 * u32::from(px[1]) + 114 * u32::from(px[2]);
            ((weighted + 500) / 1000) as u8
        })
        .collect();
    GrayImage::new(data, image.width(), image.height())
}

/// Global histogram equalization: remaps intensities so their cumulative
/// distribution is approximately uniform over [0, 255].
///
/// A single-intensity image has nothing to spread and is returned unchanged.
fn equalize(gray: &GrayImage) -> GrayImage {
    let mut histogram = [0u64; 256];
    for &v in gray.data() {
        histogram[v as usize] += 1;
    }

    let total = gray.data().len() as u64;
    let cdf_min = histogram
        .iter()
        .find(|&&count| count > 0)
        .copied()
        .unwrap_or(0);
    if cdf_min == total {
        return gray.clone();
    }

    let denom = total - cdf_min;
    let mut lut = [0u8; 256];
    let mut cdf = 0u64;
    for (v, &count) in histogram.iter().enumerate() {
        cdf += count;
        if count > 0 {
            lut[v] = (((cdf - cdf_min) * 255 + denom / 2) / denom) as u8;
        }
    }

    let data = gray.data().iter().map(|&v| lut[v as usize]).collect();
    GrayImage::new(data, gray.width(), gray.height())
}
