use ndarray::Array2;

use crate::shared::image::GrayImage;

/// Summed-area table over a grayscale image.
///
/// Stored with one extra zero row/column so any rectangle sum is four
/// lookups, including rectangles touching the top or left edge. Sums are
/// `u64`: a full-white 4096x4096 image already overflows `u32`.
pub struct IntegralImage {
    sums: Array2<u64>,
}

impl IntegralImage {
    pub fn new(gray: &GrayImage) -> Self {
        let w = gray.width() as usize;
        let h = gray.height() as usize;
        let mut sums = Array2::zeros((h + 1, w + 1));

        for y in 0..h {
            let mut row_sum = 0u64;
            for x in 0..w {
                row_sum += u64::from(gray.pixel(x as u32, y as u32));
                sums[[y + 1, x + 1]] = sums[[y, x + 1]] + row_sum;
            }
        }

        Self { sums }
    }

    /// Sum of pixel values over the `width` x `height` rectangle whose
    /// top-left corner is `(x, y)`. The rectangle must lie inside the image.
    #[inline]
    pub fn rect_sum(&self, x: u32, y: u32, width: u32, height: u32) -> u64 {
        let x0 = x as usize;
        let y0 = y as usize;
        let x1 = (x + width) as usize;
        let y1 = (y + height) as usize;

        self.sums[[y1, x1]] + self.sums[[y0, x0]] - self.sums[[y1, x0]] - self.sums[[y0, x1]]
    }
}
