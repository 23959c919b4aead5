use cgmath::{Point2, Vector2};

use crate::{color::Rgb, filter::Filter, geometry::bounds::Bounds2};

/// Stores the pixel data for a subset of a larger `Film`. A `FilmTile` can be
/// merged into a `Film` to add its pixel contributions to the `Film`.
pub struct FilmTile {
    pub pixel_bounds: Bounds2<i32>,
    pub pixels: Vec<FilmTilePixel>,
}

impl FilmTile {
    pub fn new(pixel_bounds: Bounds2<i32>) -> Self {
        let pixels = vec![FilmTilePixel::default(); pixel_bounds.area().max(0) as usize];
        Self { pixel_bounds, pixels }
    }

    /// Add the radiance from a sample to every pixel in the tile whose
    /// reconstruction filter has nonzero support at `sample_film_point`.
    pub fn add_sample(
        &mut self,
        sample_film_point: &Point2<f32>,
        radiance: &Rgb,
        sample_weight: f32,
        filter: &dyn Filter,
    ) {
        if let Some(bounds) =
            self.pixel_bounds_for_sample_point(sample_film_point, filter.half_width(), filter.half_height())
        {
            for pixel_min_corner in bounds.range() {
                let sample_offset =
                    sample_film_point - Point2::new(pixel_min_corner.x as f32, pixel_min_corner.y as f32);
                let filter_weight = filter.eval_at(Point2::new(0.0, 0.0) + sample_offset);
                let index = self.pixel_index(&pixel_min_corner);
                self.pixels[index].filter_weight_sum += filter_weight;
                self.pixels[index].weighted_spectrum_sum += filter_weight * sample_weight * radiance;
                self.pixels[index].sample_count += 1;
                let luminance = radiance.r() * 0.2126 + radiance.g() * 0.7152 + radiance.b() * 0.0722;
                self.pixels[index].luminance_sum += luminance;
                self.pixels[index].luminance_sq_sum += luminance * luminance;
            }
        }
    }

    pub fn pixel_at(&self, pixel_min_corner: Point2<i32>) -> Option<&FilmTilePixel> {
        let index = self.pixel_index(&pixel_min_corner);
        self.pixels.get(index)
    }

    fn pixel_bounds_for_sample_point(
        &self,
        sample_point: &Point2<f32>,
        filter_half_width: f32,
        filter_half_height: f32,
    ) -> Option<Bounds2<i32>> {
        let shifted = sample_point - Vector2::new(0.5, 0.5);
        let min = Point2::new(
            (shifted.x - filter_half_width).ceil() as i32,
            (shifted.y - filter_half_height).ceil() as i32,
        );
        let max = Point2::new(
            (shifted.x + filter_half_width).floor() as i32 + 1,
            (shifted.y + filter_half_height).floor() as i32 + 1,
        );
        Bounds2::new(min, max).intersect(&self.pixel_bounds)
    }

    fn pixel_index(&self, p: &Point2<i32>) -> usize {
        let relative_p = Point2::new(p.x - self.pixel_bounds.min.x, p.y - self.pixel_bounds.min.y);
        (relative_p.y * self.pixel_bounds.diagonal().x + relative_p.x) as usize
    }
}

/// Per-pixel accumulator inside a tile. Tracks both the filtered radiance
/// reconstruction (`weighted_spectrum_sum` / `filter_weight_sum`) and raw
/// luminance moments used by the tiled driver's adaptive-AA variance
/// estimate.
#[derive(Debug, Clone, Copy)]
pub struct FilmTilePixel {
    pub weighted_spectrum_sum: Rgb,
    pub filter_weight_sum: f32,
    pub sample_count: u32,
    pub luminance_sum: f32,
    pub luminance_sq_sum: f32,
}

impl FilmTilePixel {
    /// An unbiased estimate of the variance of per-sample luminance at this
    /// pixel, or `0.0` if fewer than two samples have landed here.
    pub fn luminance_variance(&self) -> f32 {
        if self.sample_count < 2 {
            return 0.0;
        }
        let n = self.sample_count as f32;
        let mean = self.luminance_sum / n;
        ((self.luminance_sq_sum / n) - mean * mean).max(0.0)
    }
}

impl Default for FilmTilePixel {
    fn default() -> Self {
        Self {
            weighted_spectrum_sum: Rgb::from_rgba(0.0, 0.0, 0.0, 0.0),
            filter_weight_sum: 0.0,
            sample_count: 0,
            luminance_sum: 0.0,
            luminance_sq_sum: 0.0,
        }
    }
}
