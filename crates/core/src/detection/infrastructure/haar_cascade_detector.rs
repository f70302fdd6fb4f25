use crate::detection::domain::detection_window::DetectionWindow;
use crate::detection::domain::detector_config::DetectorConfig;
use crate::detection::domain::face_detector::{DetectionError, FaceDetector};
use crate::detection::domain::normalizer::normalize;
use crate::detection::domain::window_grouper::group_windows;
use crate::detection::infrastructure::cascade_model::CascadeModel;
use crate::detection::infrastructure::image_pyramid::ImagePyramid;
use crate::detection::infrastructure::integral_image::IntegralImage;
use crate::shared::image::{GrayImage, Image};
use crate::shared::region::FaceRegion;

/// Sliding-window step at every pyramid level, in pixels.
const SLIDE_STEP: u32 = 2;

/// Classical cascade face detector: normalize, scan a pyramid of rescaled
/// copies with a fixed-size window, suppress duplicate hits.
///
/// The model and configuration are immutable after construction, so one
/// instance is safely shared across threads; `detect` carries no state
/// between calls. Note `min_confidence` never filters here — the cascade
/// only emits the sentinel score.
pub struct HaarCascadeDetector {
    model: CascadeModel,
    config: DetectorConfig,
}

impl HaarCascadeDetector {
    pub fn new(model: CascadeModel, config: DetectorConfig) -> Result<Self, DetectionError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Raw multi-scale scan: every window that passes the full cascade,
    /// mapped back to original coordinates, duplicates included.
    ///
    /// Pyramid levels whose mapped window would fall below the configured
    /// minimum size are never scanned, so undersized hits cannot occur.
    fn scan(&self, gray: &GrayImage) -> Vec<DetectionWindow> {
        let wnd_w = self.model.window_width();
        let wnd_h = self.model.window_height();
        let (min_w, min_h) = self.config.min_size;

        // Largest scale keeping the mapped window at or above min_size;
        // smallest scale at which the native window still fits the image.
        let max_scale = (wnd_w as f32 / min_w.max(wnd_w) as f32)
            .min(wnd_h as f32 / min_h.max(wnd_h) as f32);
        let min_scale =
            (wnd_w as f32 / gray.width() as f32).max(wnd_h as f32 / gray.height() as f32);
        if min_scale > max_scale {
            // Image too small to hold even the minimum face.
            return Vec::new();
        }

        let mut hits = Vec::new();
        let mut pyramid = ImagePyramid::new(
            gray.clone(),
            1.0 / self.config.scale_factor,
            max_scale,
            min_scale,
        );

        while let Some((level, scale)) = pyramid.next_level() {
            if level.width() < wnd_w || level.height() < wnd_h {
                continue;
            }

            let integral = IntegralImage::new(&level);
            let max_x = level.width() - wnd_w;
            let max_y = level.height() - wnd_h;

            for y in (0..=max_y).step_by(SLIDE_STEP as usize) {
                for x in (0..=max_x).step_by(SLIDE_STEP as usize) {
                    if self.model.eval_window(&integral, x, y) {
                        hits.push(map_to_original(
                            x,
                            y,
                            wnd_w,
                            wnd_h,
                            scale,
                            gray.width(),
                            gray.height(),
                        ));
                    }
                }
            }
        }

        hits
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect(&self, image: &Image) -> Result<Vec<FaceRegion>, DetectionError> {
        let gray = normalize(image)?;
        let hits = self.scan(&gray);
        log::debug!(
            "scan produced {} raw hits on {}x{} image",
            hits.len(),
            image.width(),
            image.height()
        );
        Ok(group_windows(
            &hits,
            self.config.min_neighbors,
            image.width(),
            image.height(),
        ))
    }
}

/// Maps a window hit at a pyramid level back into original-image
/// coordinates, clamping rounding spill at the far edges.
fn map_to_original(
    x: u32,
    y: u32,
    wnd_w: u32,
    wnd_h: u32,
    scale: f32,
    image_width: u32,
    image_height: u32,
) -> DetectionWindow {
    let width = ((wnd_w as f32 / scale + 0.5) as u32).min(image_width);
    let height = ((wnd_h as f32 / scale + 0.5) as u32).min(image_height);
    let x = ((x as f32 / scale + 0.5) as u32).min(image_width - width);
    let y = ((y as f32 / scale + 0.5) as u32).min(image_height - height);
    DetectionWindow::new(x, y, width, height)
}
