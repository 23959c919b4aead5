//! The tiled, adaptively-antialiased rendering loop: splits the film
//! into blocks via [`ImageSplitter`], renders each block in parallel with
//! rayon, and keeps spending samples on a pixel only as long as its
//! running luminance variance stays above a threshold, up to a hard cap.
//!
//! `SppmIntegrator` does not go through [`render`]: its multi-pass,
//! whole-image eye/photon loop doesn't fit the per-pixel, per-sample
//! shape this driver assumes. [`render_sppm`] drives it instead.

use crate::camera::{Camera, CameraSample};
use crate::color::Rgb;
use crate::film::Film;
use crate::filter::Filter;
use crate::geometry::Bounds2;
use crate::integrator::{SppmIntegrator, SurfaceIntegrator};
use crate::render_control::RenderControl;
use crate::sampling::low_discrepancy_sample;
use crate::scene::Scene;
use crate::splitter::{ImageSplitter, Region, TileOrder};
use cgmath::{Point2, Vector2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Tuning knobs for a single [`render`] call.
pub struct DriverSettings {
    pub block_size: i32,
    pub tile_order: TileOrder,
    /// Samples spent at every pixel before the variance check kicks in.
    pub min_samples: u32,
    /// Hard cap on samples spent at any one pixel.
    pub max_samples: u32,
    /// A pixel stops accumulating more samples once its running
    /// luminance variance, divided by the sample count, drops below
    /// this.
    pub variance_threshold: f32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self { block_size: 32, tile_order: TileOrder::CentreFirst, min_samples: 16, max_samples: 256, variance_threshold: 5e-4 }
    }
}

/// Render `scene` through `camera` with `integrator`, returning the
/// finished film. Tiles are pulled off `settings.tile_order`'s queue and
/// rendered independently in parallel; each pixel inside a tile is
/// sampled at least `min_samples` times and then, as long as its
/// estimated per-sample variance remains above `variance_threshold`, up
/// to `max_samples` times.
pub fn render(
    scene: &Scene,
    camera: &dyn Camera,
    integrator: &dyn SurfaceIntegrator,
    filter: &dyn Filter,
    resolution: Vector2<usize>,
    settings: &DriverSettings,
    control: &RenderControl,
    rng_seed: u64,
) -> Film {
    let mut film = Film::new(resolution);
    control.set_started();
    control.set_total_passes(1);
    control.set_current_pass(0);

    let mut splitter_rng = ChaCha8Rng::seed_from_u64(rng_seed);
    let splitter = ImageSplitter::new(
        resolution.x as i32,
        resolution.y as i32,
        0,
        0,
        settings.block_size,
        settings.tile_order,
        &mut splitter_rng,
    );

    let tiles: Vec<Option<crate::film::FilmTile>> = splitter
        .regions()
        .par_iter()
        .map(|region| {
            if control.aborted() {
                return None;
            }
            render_region(scene, camera, integrator, filter, &film, *region, settings, rng_seed)
        })
        .collect();

    for tile in tiles.into_iter().flatten() {
        film.merge_tile(&tile);
    }

    if control.aborted() {
        control.set_aborted();
    } else {
        control.set_finished();
    }
    film
}

fn render_region(
    scene: &Scene,
    camera: &dyn Camera,
    integrator: &dyn SurfaceIntegrator,
    filter: &dyn Filter,
    film: &Film,
    region: Region,
    settings: &DriverSettings,
    rng_seed: u64,
) -> Option<crate::film::FilmTile> {
    let sample_bounds = Bounds2::new(Point2::new(region.x, region.y), Point2::new(region.x + region.w, region.y + region.h));
    let mut tile = film.tile(&sample_bounds, filter.half_width(), filter.half_height())?;

    for pixel in sample_bounds.range() {
        let pixel_seed = rng_seed ^ ((pixel.x as u64) << 32 | pixel.y as u64).wrapping_mul(0x9E3779B97F4A7C15);
        let mut rng = ChaCha8Rng::seed_from_u64(pixel_seed);
        let mut luminance_sum = 0.0f32;
        let mut luminance_sq_sum = 0.0f32;

        for n in 0..settings.max_samples {
            if n >= settings.min_samples {
                let count = n as f32;
                let variance = (luminance_sq_sum / count - (luminance_sum / count).powi(2)).max(0.0);
                if variance / count < settings.variance_threshold {
                    break;
                }
            }

            let jitter_x = low_discrepancy_sample(&mut rng, 0, n) - 0.5;
            let jitter_y = low_discrepancy_sample(&mut rng, 1, n) - 0.5;
            let film_point = Point2::new(pixel.x as f32 + 0.5 + jitter_x, pixel.y as f32 + 0.5 + jitter_y);
            let sample = CameraSample::new(film_point, Point2::new(rng.gen(), rng.gen()), rng.gen());

            let (ray, weight) = camera.generate_ray(&sample);
            let (l, alpha) = integrator.li(&ray, scene, &mut rng, 0);
            let mut l = if l.has_nan() { Rgb::black() } else { l };
            l.set_a(alpha);

            let luminance = l.r() * 0.2126 + l.g() * 0.7152 + l.b() * 0.0722;
            luminance_sum += luminance;
            luminance_sq_sum += luminance * luminance;

            tile.add_sample(&film_point, &l, weight, filter);
        }
    }

    Some(tile)
}

/// Drive an [`SppmIntegrator`] through `eye_passes` rounds, each an eye
/// pass over every pixel followed by a photon pass, returning a film with
/// the final per-pixel radiance written directly (SPPM bypasses the
/// reconstruction filter: one visible point per pixel, not a filtered
/// sum of samples).
pub fn render_sppm(
    scene: &Scene,
    camera: &dyn Camera,
    sppm: &mut SppmIntegrator,
    eye_passes: u32,
    photons_per_pass: usize,
    control: &RenderControl,
    rng_seed: u64,
) -> Film {
    let resolution = sppm.resolution();
    let mut film = Film::new(resolution);
    control.set_started();
    control.set_total_passes(eye_passes as usize);

    for round in 0..eye_passes {
        if control.aborted() {
            break;
        }
        control.set_current_pass(round as usize);
        sppm.trace_eye_pass(scene, camera, rng_seed ^ round as u64);
        sppm.trace_photon_pass(scene, photons_per_pass, rng_seed ^ (round as u64).wrapping_mul(0x2545_F491_4F6C_DD1D));
        control.set_current_pass_percent((round + 1) as f32 / eye_passes as f32);
    }

    for y in 0..resolution.y {
        for x in 0..resolution.x {
            let l = sppm.pixel_radiance(x, y);
            film.add_photon_contribution(Point2::new(x as i32, y as i32), l);
        }
    }

    if control.aborted() {
        control.set_aborted();
    } else {
        control.set_finished();
    }
    film
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PinholeCamera;
    use crate::filter::BoxFilter;
    use crate::integrator::{DebugIntegrator, DebugMode};
    use crate::light::{Light, PointLight};
    use crate::material::MatteMaterial;
    use crate::primitive::{Primitive, PrimitiveAggregate};
    use crate::shape::{Shape, Sphere};
    use cgmath::{Deg, Matrix4, Point3};

    fn simple_scene() -> Scene {
        let sphere = Shape::Sphere(Sphere::new(Point3::new(0.0, 0.0, -3.0), 1.0));
        let primitive = Primitive::new(sphere, 0);
        let materials: Vec<Box<dyn crate::material::Material>> = vec![Box::new(MatteMaterial::new(Rgb::constant(0.8), 0.0))];
        let light = Light::Point(PointLight::new(Point3::new(2.0, 2.0, 0.0), Rgb::constant(40.0)));
        Scene::new(PrimitiveAggregate::linear(vec![primitive]), vec![light], materials)
    }

    #[test]
    fn renders_every_pixel_of_a_small_image() {
        let scene = simple_scene();
        let camera =
            PinholeCamera::new(Matrix4::from_translation(cgmath::vec3(0.0, 0.0, 0.0)), Deg(60.0).into(), Vector2::new(32, 24));
        let integrator = DebugIntegrator::new(DebugMode::Hits);
        let filter = BoxFilter::new(0.5, 0.5);
        let control = RenderControl::new();
        let settings = DriverSettings { min_samples: 1, max_samples: 1, ..Default::default() };

        let film = render(&scene, &camera, &integrator, &filter, Vector2::new(32, 24), &settings, &control, 7);

        assert!(control.finished());
        let image = film.write_image();
        assert_eq!(image.width(), 32);
        assert_eq!(image.height(), 24);
    }

    #[test]
    fn abort_flag_stops_the_render_early() {
        let scene = simple_scene();
        let camera =
            PinholeCamera::new(Matrix4::from_translation(cgmath::vec3(0.0, 0.0, 0.0)), Deg(60.0).into(), Vector2::new(16, 16));
        let integrator = DebugIntegrator::new(DebugMode::Hits);
        let filter = BoxFilter::new(0.5, 0.5);
        let control = RenderControl::new();
        control.set_started();
        control.set_aborted();
        let settings = DriverSettings::default();

        let _film = render(&scene, &camera, &integrator, &filter, Vector2::new(16, 16), &settings, &control, 3);
        assert!(control.aborted());
        assert!(!control.in_progress());
    }
}
