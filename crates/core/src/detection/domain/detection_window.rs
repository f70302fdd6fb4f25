/// A raw positive hit from the multi-scale window scan, mapped back to
/// original-image coordinates.
///
/// Carries no identity beyond its geometry; duplicates at adjacent scales
/// and positions are expected and resolved later by the grouper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetectionWindow {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DetectionWindow {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Positional-similarity predicate used for overlap clustering.
    ///
    /// Two windows are neighbors when all four edge offsets agree within
    /// `eps` of half their combined smaller extent. This is count-based
    /// clustering input, not an IOU threshold.
    pub fn is_neighbor(&self, other: &DetectionWindow, eps: f32) -> bool {
        let delta = f64::from(eps)
            * 0.5
            * f64::from(self.width.min(other.width) + self.height.min(other.height));

        let dx = (f64::from(self.x) - f64::from(other.x)).abs();
        let dy = (f64::from(self.y) - f64::from(other.y)).abs();
        let dr = (f64::from(self.x + self.width) - f64::from(other.x + other.width)).abs();
        let db = (f64::from(self.y + self.height) - f64::from(other.y + other.height)).abs();

        dx <= delta && dy <= delta && dr <= delta && db <= delta
    }
}
