use crate::shared::image::GrayImage;

/// Lazily yields progressively downscaled copies of a base image.
///
/// Levels run from `max_scale` down to `min_scale`, shrinking by
/// `scale_step` (< 1.0) each time. A fixed-size scan window over the
/// shrinking levels detects proportionally larger objects, which is the
/// whole point of the pyramid.
pub struct ImagePyramid {
    base: GrayImage,
    scale: f32,
    min_scale: f32,
    scale_step: f32,
}

impl ImagePyramid {
    pub fn new(base: GrayImage, scale_step: f32, max_scale: f32, min_scale: f32) -> Self {
        debug_assert!(scale_step > 0.0 && scale_step < 1.0);
        Self {
            base,
            scale: max_scale,
            min_scale,
            scale_step,
        }
    }

    /// Next pyramid level and its scale, or `None` once below the minimum.
    pub fn next_level(&mut self) -> Option<(GrayImage, f32)> {
        if self.scale < self.min_scale {
            return None;
        }

        let scale = self.scale;
        let width = ((self.base.width() as f32 * scale).round() as u32).max(1);
        let height = ((self.base.height() as f32 * scale).round() as u32).max(1);
        let level = resize_bilinear(&self.base, width, height);

        self.scale *= self.scale_step;
        Some((level, scale))
    }
}

/// Bilinear resampling with edge clamping.
pub fn resize_bilinear(src: &GrayImage, width: u32, height: u32) -> GrayImage {
    if src.width() == width && src.height() == height {
        return src.clone();
    }

    let x_ratio = f64::from(src.width()) / f64::from(width);
    let y_ratio = f64::from(src.height()) / f64::from(height);

    let mut data = Vec::with_capacity((width as usize) * (height as usize));
    for y in 0..height {
        let src_y = y_ratio * f64::from(y);
        let y0 = (src_y as u32).min(src.height() - 1);
        let y1 = (y0 + 1).min(src.height() - 1);
        let wy = src_y - f64::from(y0);

        for x in 0..width {
            let src_x = x_ratio * f64::from(x);
            let x0 = (src_x as u32).min(src.width() - 1);
            let x1 = (x0 + 1).min(src.width() - 1);
            let wx = src_x - f64::from(x0);

            let p00 = f64::from(src.pixel(x0, y0));
            let p10 = f64::from(src.pixel(x1, y0));
            let p01 = f64::from(src.pixel(x0, y1));
            let p11 = f64::from(src.pixel(x1, y1));

            let value = (1.0 - wy) * ((1.0 - wx) * p00 + wx * p10)
                + wy * ((1.0 - wx) * p01 + wx * p11);
            data.push(value.round() as u8);
        }
    }

    GrayImage::new(data, width, height)
}
