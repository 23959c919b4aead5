use crate::bsdf::BxdfType;
use crate::camera::{Camera, CameraSample};
use crate::color::Rgb;
use crate::interaction::{OffsetRayOrigin, SurfaceInteraction};
use crate::mc_core;
use crate::photon::Photon;
use crate::scene::Scene;
use crate::TransportMode;
use cgmath::{InnerSpace, Point2, Vector2, Vector3};
use rand::Rng;
use rayon::prelude::*;
use std::f32::consts::PI;

/// One pixel's persistent state across SPPM iterations: the visible
/// point found by the eye pass (if the corresponding camera ray found a
/// non-specular surface at all), the current search radius, accumulated
/// photon count, and accumulated indirect flux.
///
/// Unlike the other integrators, SPPM does not fit the single-sample
/// `SurfaceIntegrator::li` interface: its state must persist and shrink
/// across an entire sequence of photon passes, so the driver calls its
/// own pass methods directly instead.
#[derive(Clone)]
struct PixelState {
    visible_point: Option<VisiblePoint>,
    direct: Rgb,
    radius_sq: f32,
    photon_count: f32,
    tau: Rgb,
}

/// A visible point stores the material index rather than a `Bsdf`
/// directly: `Bsdf` borrows scratch state tied to the
/// `SurfaceInteraction` it was built from and isn't `Clone`, so it can't
/// be cached in a struct that outlives the eye pass. The photon pass
/// rebuilds it on demand from `material_index` and `interaction`.
#[derive(Clone)]
struct VisiblePoint {
    interaction: SurfaceInteraction,
    wo: Vector3<f32>,
    throughput: Rgb,
    material_index: usize,
}

impl Default for PixelState {
    fn default() -> Self {
        Self { visible_point: None, direct: Rgb::black(), radius_sq: 0.0, photon_count: 0.0, tau: Rgb::black() }
    }
}

/// Stochastic progressive photon mapping: alternates an eye pass (one
/// camera path per pixel, continued through specular bounces until a
/// diffuse hit or a miss) with a photon pass shot from the lights, each
/// photon splatted against every pixel whose visible point it lands
/// within. After each round the per-pixel radius shrinks following
/// Hachisuka et al.'s update rule, so the estimate converges to the
/// exact solution as the number of rounds grows.
pub struct SppmIntegrator {
    pixels: Vec<PixelState>,
    resolution: Vector2<usize>,
    total_photon_paths: usize,
    pub initial_radius: f32,
    pub alpha: f32,
    pub max_eye_depth: u32,
    pub max_photon_bounces: u32,
}

impl SppmIntegrator {
    pub fn new(resolution: Vector2<usize>, initial_radius: f32) -> Self {
        let pixels = vec![PixelState { radius_sq: initial_radius * initial_radius, ..Default::default() }; resolution.x * resolution.y];
        Self {
            pixels,
            resolution,
            total_photon_paths: 0,
            initial_radius,
            alpha: 0.7,
            max_eye_depth: 8,
            max_photon_bounces: 10,
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.resolution.x + x
    }

    /// Trace one camera ray per pixel through specular bounces, stopping
    /// at the first diffuse/glossy hit to record a visible point, or
    /// accumulating direct emission and direct light along the way.
    pub fn trace_eye_pass(&mut self, scene: &Scene, camera: &dyn Camera, rng_seed: u64) {
        use rand::SeedableRng;
        let resolution = self.resolution;
        let max_eye_depth = self.max_eye_depth;
        self.pixels.par_iter_mut().enumerate().for_each(|(i, pixel)| {
            let x = i % resolution.x;
            let y = i / resolution.x;
            let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(rng_seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));

            pixel.visible_point = None;
            pixel.direct = Rgb::black();

            let sample = CameraSample::at_pixel_center(Point2::new(x as i32, y as i32));
            let (mut ray, _) = camera.generate_ray(&sample);
            let mut throughput = Rgb::constant(1.0);

            for _ in 0..max_eye_depth {
                let (_, primitive, interaction) = match scene.ray_intersection(&ray) {
                    Some(h) => h,
                    None => break,
                };
                let material = scene.material(primitive.material_index);
                let bsdf = material.scattering_functions(&interaction, TransportMode::Radiance);
                let wo = -ray.direction;

                pixel.direct = pixel.direct + throughput * mc_core::emitted_radiance(scene, &primitive, &interaction, wo);
                if bsdf.is_empty() {
                    break;
                }
                pixel.direct = pixel.direct
                    + throughput * mc_core::estimate_all_direct_light(scene, &interaction, &bsdf, wo, material.is_flat(), &mut rng);

                let diffuse_or_glossy = bsdf.count_with_type(BxdfType::DIFFUSE | BxdfType::GLOSSY) > 0;
                if diffuse_or_glossy {
                    pixel.visible_point =
                        Some(VisiblePoint { interaction, wo, throughput, material_index: primitive.material_index });
                    break;
                }

                let specular_sample = bsdf.sample_f(&wo, rng.gen(), Point2::new(rng.gen(), rng.gen()), BxdfType::SPECULAR);
                let (wi, pdf, f, _) = match specular_sample {
                    Some(s) => s,
                    None => break,
                };
                if pdf == 0.0 || f.is_black() {
                    break;
                }
                let cos = wi.dot(interaction.shading_geometry.normal).abs();
                throughput = throughput * f * (cos / pdf);
                ray = interaction.spawn_ray(&wi);
            }
        });
    }

    /// Shoot `photon_count` photons from the lights (power-sampled the
    /// same way the photon prepass does), then for every pixel with a
    /// visible point, splat the photons that land within its current
    /// search radius and update that pixel's radius and accumulated flux
    /// following Hachisuka et al.'s progressive update rule.
    pub fn trace_photon_pass(&mut self, scene: &Scene, photon_count: usize, rng_seed: u64) {
        use crate::photon_prepass::shoot_one_photon_path;
        use rand::SeedableRng;

        if photon_count == 0 || scene.lights.is_empty() {
            return;
        }

        let max_bounces = self.max_photon_bounces;
        let photons: Vec<Photon> = (0..photon_count)
            .into_par_iter()
            .flat_map(|i| {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(rng_seed ^ (i as u64).wrapping_mul(0xD1B5_4A32_D192_ED03));
                let mut collected = Vec::new();
                shoot_one_photon_path(scene, &mut rng, max_bounces, &mut |photon: &Photon, _specular_seen| {
                    collected.push(*photon);
                });
                collected
            })
            .collect();

        let alpha = self.alpha;
        self.pixels.par_iter_mut().for_each(|pixel| {
            let vp = match &pixel.visible_point {
                Some(v) => v,
                None => return,
            };
            let material = scene.material(vp.material_index);
            let bsdf = material.scattering_functions(&vp.interaction, TransportMode::Radiance);

            let mut round_sum = Rgb::black();
            let mut round_count = 0.0_f32;
            for photon in &photons {
                let d2 = (photon.position - vp.interaction.point).magnitude2();
                if d2 > pixel.radius_sq {
                    continue;
                }
                let wi = -photon.direction;
                let f = bsdf.f(&vp.wo, &wi, BxdfType::DIFFUSE | BxdfType::GLOSSY | BxdfType::REFLECTION | BxdfType::TRANSMISSION);
                round_sum = round_sum + vp.throughput * f * photon.power;
                round_count += 1.0;
            }

            if pixel.photon_count + round_count > 0.0 {
                let new_n = pixel.photon_count + alpha * round_count;
                let ratio = new_n / (pixel.photon_count + round_count);
                pixel.tau = (pixel.tau + round_sum) * ratio;
                pixel.radius_sq *= ratio;
                pixel.photon_count = new_n;
            }
        });

        self.total_photon_paths += photon_count;
    }

    /// The converged radiance estimate for a pixel: direct light found
    /// by the eye pass plus the progressive photon density estimate
    /// `tau / (total_photon_paths * pi * r^2)`, accumulated across every
    /// photon pass run so far.
    pub fn pixel_radiance(&self, x: usize, y: usize) -> Rgb {
        let idx = self.index(x, y);
        let pixel = &self.pixels[idx];
        if self.total_photon_paths == 0 || pixel.radius_sq <= 0.0 {
            return pixel.direct;
        }
        let indirect = pixel.tau * (1.0 / (self.total_photon_paths as f32 * PI * pixel.radius_sq));
        pixel.direct + indirect
    }

    pub fn resolution(&self) -> Vector2<usize> {
        self.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PinholeCamera;
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
    fn radius_shrinks_and_flux_accumulates_over_rounds() {
        let scene = simple_scene();
        let camera = PinholeCamera::new(
            Matrix4::from_translation(cgmath::vec3(0.0, 0.0, 0.0)),
            Deg(60.0).into(),
            Vector2::new(16, 16),
        );
        let mut sppm = SppmIntegrator::new(Vector2::new(16, 16), 0.5);
        sppm.trace_eye_pass(&scene, &camera, 1);

        let has_visible_point = sppm.pixels.iter().any(|p| p.visible_point.is_some());
        assert!(has_visible_point);

        let radius_before = sppm.pixels[8 * 16 + 8].radius_sq;
        sppm.trace_photon_pass(&scene, 5000, 2);
        let radius_after = sppm.pixels[8 * 16 + 8].radius_sq;

        assert!(radius_after <= radius_before);
        assert_eq!(sppm.total_photon_paths, 5000);

        let center = sppm.pixel_radiance(8, 8);
        assert!(!center.has_nan());
    }
}
