mod box_filter;
mod mitchell;

pub use box_filter::BoxFilter;
pub use mitchell::MitchellFilter;

use cgmath::Point2;

/// A pixel reconstruction filter: weights the contribution of a sample at
/// some offset from a pixel center toward that pixel's final color.
pub trait Filter: Send + Sync {
    fn eval_at(&self, p: Point2<f32>) -> f32;
    fn half_width(&self) -> f32;
    fn half_height(&self) -> f32;
}
