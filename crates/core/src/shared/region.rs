use crate::shared::constants::SENTINEL_SCORE;

/// A detected face: an axis-aligned rectangle in original-image coordinates.
///
/// The classical cascade backend produces no calibrated probability, so
/// `score` always carries the sentinel value `1.0` — it marks "detected",
/// nothing more, and must not be compared across detections.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub score: f32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            score: SENTINEL_SCORE,
        }
    }

    /// One past the rightmost column covered by the region.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// One past the bottommost row covered by the region.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the region lies fully inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= width && self.bottom() <= height
    }

    pub fn iou(&self, other: &FaceRegion) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        let inter = ix2.saturating_sub(ix1) as f64 * iy2.saturating_sub(iy1) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width as f64 * self.height as f64;
        let area_b = other.width as f64 * other.height as f64;
        inter / (area_a + area_b - inter)
    }
}
