use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::annotation::domain::face_annotator::FaceAnnotator;
use crate::annotation::infrastructure::glyphs;
use crate::shared::image::Image;
use crate::shared::region::FaceRegion;

/// Accent used for both the box outline and the caption.
pub const ACCENT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Outline thickness in pixels, drawn inward from the region bounds.
const LINE_THICKNESS: u32 = 2;

/// Caption baseline sits this far above the region's top edge...
const CAPTION_OFFSET: i32 = 10;
/// ...but never higher than this floor, so top-edge detections keep
/// their caption on the canvas.
const MIN_CAPTION_BASELINE: i32 = 20;

const CAPTION_SCALE: u32 = 2;

/// Draws each face as an unfilled rectangle with a caption above its
/// top-left corner, onto a fresh copy of the input.
pub struct OutlineAnnotator;

impl OutlineAnnotator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OutlineAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceAnnotator for OutlineAnnotator {
    fn annotate(&self, image: &Image, regions: &[FaceRegion], label: Option<&str>) -> Image {
        let mut canvas = image.to_rgb8();

        for (index, region) in regions.iter().enumerate() {
            draw_outline(&mut canvas, region);

            let caption = match label {
                Some(text) => text.to_string(),
                None => format!("Face {}", index + 1),
            };
            let baseline = (region.y as i32 - CAPTION_OFFSET).max(MIN_CAPTION_BASELINE);
            let top = baseline - glyphs::text_height(CAPTION_SCALE) as i32;
            glyphs::draw_text(
                &mut canvas,
                &caption,
                region.x as i32,
                top,
                ACCENT_COLOR,
                CAPTION_SCALE,
            );
        }

        Image::from_rgb8(canvas)
    }
}

/// Nested hollow rectangles, shrinking inward, give a fixed-thickness
/// outline without painting outside the region bounds.
fn draw_outline(canvas: &mut image::RgbImage, region: &FaceRegion) {
    for inset in 0..LINE_THICKNESS {
        if region.width <= 2 * inset || region.height <= 2 * inset {
            break;
        }
        let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32)
            .of_size(region.width - 2 * inset, region.height - 2 * inset);
        draw_hollow_rect_mut(canvas, rect, ACCENT_COLOR);
    }
}
