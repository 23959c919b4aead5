mod tile;

use image::ImageBuffer;
pub use tile::{FilmTile, FilmTilePixel};

use crate::{
    color::{Rgb, Xyza},
    geometry::bounds::Bounds2,
};
use cgmath::{point2, Point2, Vector2};
use std::collections::HashMap;

/// Models the sensing device in a simulated camera: a 2D plane of pixels
/// that a tiled driver progressively accumulates samples into.
///
/// Besides the primary "combined" reconstruction buffer, a `Film` tracks a
/// per-pixel luminance-variance estimate used to decide which pixels need
/// more AA samples, an optional density-estimation buffer fed directly by
/// the photon mapper (bypassing the reconstruction filter, since photon
/// splatting uses its own kernel), and any number of named auxiliary
/// layers (e.g. a separate diffuse or specular accumulation for debugging).
pub struct Film {
    pub resolution: Vector2<usize>,
    pub pixel_bounds: Bounds2<i32>,
    pixels: Vec<FilmPixel>,
    density_estimate: Vec<Xyza>,
    layers: HashMap<String, Vec<Xyza>>,
}

impl Film {
    pub fn new(resolution: Vector2<usize>) -> Self {
        let pixel_bounds = Bounds2::new(Point2::new(0, 0), Point2::new(resolution.x as i32, resolution.y as i32));
        let n = resolution.x * resolution.y;
        Self {
            resolution,
            pixel_bounds,
            pixels: vec![FilmPixel::default(); n],
            density_estimate: vec![Xyza::transparent(); n],
            layers: HashMap::new(),
        }
    }

    pub fn add_layer(&mut self, name: &str) {
        let n = (self.resolution.x * self.resolution.y) as usize;
        self.layers.insert(name.to_string(), vec![Xyza::transparent(); n]);
    }

    pub fn add_layer_sample(&mut self, name: &str, pixel: Point2<i32>, radiance: Rgb) {
        if let Some(buf) = self.layers.get_mut(name) {
            let index = Self::index_for(&self.pixel_bounds, pixel);
            buf[index] += Xyza::from(radiance);
        }
    }

    /// Returns a bounding box, expanded by the reconstruction filter's
    /// support, that a sampler must generate film-space samples within so
    /// that edge pixels are not biased toward the interior.
    pub fn sample_bounds(&self, filter_half_width: f32, filter_half_height: f32) -> Bounds2<i32> {
        let top_left = Point2::new(self.pixel_bounds.min.x as f32 + 0.5, self.pixel_bounds.min.y as f32 + 0.5);
        let bottom_right = Point2::new(self.pixel_bounds.max.x as f32 - 0.5, self.pixel_bounds.max.y as f32 - 0.5);
        let min = Point2::new(
            (top_left.x - filter_half_width).floor() as i32,
            (top_left.y - filter_half_height).floor() as i32,
        );
        let max = Point2::new(
            (bottom_right.x + filter_half_width).ceil() as i32,
            (bottom_right.y + filter_half_height).ceil() as i32,
        );
        Bounds2::new(min, max)
    }

    pub fn tile(&self, sample_bounds: &Bounds2<i32>, filter_half_width: f32, filter_half_height: f32) -> Option<FilmTile> {
        self.pixel_bounds_for_sample_bounds(sample_bounds, filter_half_width, filter_half_height)
            .map(FilmTile::new)
    }

    pub fn merge_tile(&mut self, tile: &FilmTile) {
        for pixel_min_corner in tile.pixel_bounds.range() {
            if let Some(pixel) = tile.pixel_at(pixel_min_corner) {
                self.merge_pixel(pixel, &pixel_min_corner);
            }
        }
    }

    /// Splat a photon's contribution directly into the density-estimation
    /// buffer at the pixel a primary ray hit, bypassing the reconstruction
    /// filter entirely (used by SPPM's radiance evaluation pass).
    pub fn add_photon_contribution(&mut self, pixel: Point2<i32>, flux: Rgb) {
        let index = Self::index_for(&self.pixel_bounds, pixel);
        self.density_estimate[index] += Xyza::from(flux);
    }

    /// Per-pixel luminance variance of the combined buffer, used by the
    /// tiled driver to decide whether a pixel needs another AA pass.
    pub fn pixel_variance(&self, pixel: Point2<i32>) -> f32 {
        let index = Self::index_for(&self.pixel_bounds, pixel);
        self.pixels[index].running_variance
    }

    pub fn set_pixel_variance(&mut self, pixel: Point2<i32>, variance: f32) {
        let index = Self::index_for(&self.pixel_bounds, pixel);
        self.pixels[index].running_variance = variance;
    }

    pub fn write_image(&self) -> image::ImageBuffer<image::Rgba<u8>, std::vec::Vec<u8>> {
        ImageBuffer::from_fn(self.resolution.x as u32, self.resolution.y as u32, |x, y| {
            let index = self.pixel_index(&point2(x as i32, y as i32));
            let pixel = self.pixels[index];
            let mut color = if pixel.filter_weight_sum > 0.0 {
                (1.0 / pixel.filter_weight_sum) * Rgb::from(pixel.xyz)
            } else {
                Rgb::transparent()
            };
            let density = self.density_estimate[index];
            if !(density.x() == 0.0 && density.y() == 0.0 && density.z() == 0.0) {
                color += Rgb::from(density);
            }
            let output: image::Rgba<u8> = color.into();
            output
        })
    }

    fn pixel_bounds_for_sample_bounds(
        &self,
        sample_bounds: &Bounds2<i32>,
        filter_half_width: f32,
        filter_half_height: f32,
    ) -> Option<Bounds2<i32>> {
        let min = Point2::new(
            (sample_bounds.min.x as f32 - 0.5 - filter_half_width).ceil() as i32,
            (sample_bounds.min.y as f32 - 0.5 - filter_half_height).ceil() as i32,
        );
        let max = Point2::new(
            (sample_bounds.max.x as f32 - 0.5 + filter_half_width).floor() as i32 + 1,
            (sample_bounds.max.y as f32 - 0.5 + filter_half_height).floor() as i32 + 1,
        );
        Bounds2::new(min, max).intersect(&self.pixel_bounds)
    }

    fn merge_pixel(&mut self, pixel: &FilmTilePixel, pixel_min_corner: &Point2<i32>) {
        let index = self.pixel_index(pixel_min_corner);
        self.pixels[index].xyz += Xyza::from(pixel.weighted_spectrum_sum);
        self.pixels[index].filter_weight_sum += pixel.filter_weight_sum;
        self.pixels[index].running_variance = pixel.luminance_variance();
    }

    fn pixel_index(&self, p: &Point2<i32>) -> usize {
        Self::index_for(&self.pixel_bounds, *p)
    }

    fn index_for(bounds: &Bounds2<i32>, p: Point2<i32>) -> usize {
        let relative = Point2::new(p.x - bounds.min.x, p.y - bounds.min.y);
        (relative.y * bounds.diagonal().x + relative.x) as usize
    }
}

#[derive(Debug, Clone, Copy)]
struct FilmPixel {
    xyz: Xyza,
    filter_weight_sum: f32,
    running_variance: f32,
}

impl Default for FilmPixel {
    fn default() -> Self {
        Self {
            xyz: Xyza::transparent(),
            filter_weight_sum: 0.0,
            running_variance: f32::INFINITY,
        }
    }
}
