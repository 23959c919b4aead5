use super::SurfaceIntegrator;
use crate::bsdf::BxdfType;
use crate::color::Rgb;
use crate::interaction::OffsetRayOrigin;
use crate::mc_core;
use crate::ray::Ray;
use crate::sampling::power_heuristic;
use crate::scene::Scene;
use crate::TransportMode;
use cgmath::{InnerSpace, Point2};
use rand::{Rng, RngCore};

/// A unidirectional Monte-Carlo path tracer: at every bounce, direct light
/// is sampled with MIS against the BSDF's own sampling strategy, and the
/// path continues by sampling a new direction from the BSDF. Russian
/// roulette caps expected path length once the throughput has decayed
/// past `roulette_min_bounces`.
pub struct PathTracingIntegrator {
    pub max_depth: u32,
    pub roulette_min_bounces: u32,
}

impl PathTracingIntegrator {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth, roulette_min_bounces: 3 }
    }
}

impl SurfaceIntegrator for PathTracingIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore, _depth: u32) -> (Rgb, f32) {
        let mut l = Rgb::black();
        let mut throughput = Rgb::constant(1.0);
        let mut ray = ray.clone();
        let mut specular_bounce = true;
        let mut prev_bsdf_pdf = 0.0f32;
        let mut alpha = 0.0f32;

        for bounce in 0..self.max_depth {
            let hit = scene.ray_intersection(&ray);
            let (_, primitive, interaction) = match hit {
                Some(h) => h,
                None => {
                    for light in scene.infinite_lights() {
                        l = l + throughput * light.le(&ray);
                    }
                    break;
                }
            };
            if bounce == 0 {
                alpha = 1.0;
            }

            let emitted = mc_core::emitted_radiance(scene, &primitive, &interaction, -ray.direction);
            if !emitted.is_black() {
                if specular_bounce {
                    l = l + throughput * emitted;
                } else if let Some(idx) = primitive.area_light_index {
                    let light_pdf = scene.lights[idx].pdf_li(&interaction, -ray.direction);
                    if light_pdf > 0.0 {
                        let weight = power_heuristic(1, prev_bsdf_pdf, 1, light_pdf);
                        l = l + throughput * emitted * weight;
                    } else {
                        l = l + throughput * emitted;
                    }
                }
            }

            let material = scene.material(primitive.material_index);
            let bsdf = material.scattering_functions(&interaction, TransportMode::Radiance);
            if bsdf.is_empty() {
                break;
            }
            let wo = -ray.direction;

            l = l + throughput * mc_core::estimate_all_direct_light(scene, &interaction, &bsdf, wo, material.is_flat(), rng);

            let sample = bsdf.sample_f(&wo, rng.gen(), Point2::new(rng.gen(), rng.gen()), BxdfType::ALL);
            let (wi, pdf, f, sampled_type) = match sample {
                Some(s) => s,
                None => break,
            };
            if pdf == 0.0 || f.is_black() {
                break;
            }

            let cos = if material.is_flat() { 1.0 } else { wi.dot(interaction.shading_geometry.normal).abs() };
            throughput = throughput * f * (cos / pdf);
            specular_bounce = sampled_type.contains(BxdfType::SPECULAR);
            prev_bsdf_pdf = pdf;

            if bounce >= self.roulette_min_bounces {
                let continue_prob = throughput.r().max(throughput.g()).max(throughput.b()).min(0.95);
                if rng.gen::<f32>() > continue_prob {
                    break;
                }
                throughput = throughput * (1.0 / continue_prob);
            }

            ray = interaction.spawn_ray(&wi);
        }

        (l, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{DiffuseAreaLight, Light};
    use crate::material::MatteMaterial;
    use crate::primitive::{Primitive, PrimitiveAggregate};
    use crate::scene::Scene;
    use crate::shape::{Plane, Shape, Sphere};
    use cgmath::{vec3, Point3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn closed_box_scene() -> Scene {
        let floor = Shape::Plane(Plane::new(Point3::new(0.0, 0.0, -1.0), vec3(0.0, 0.0, 1.0)));
        let ceiling_light_sphere = Shape::Sphere(Sphere::new(Point3::new(0.0, 0.0, 3.0), 0.3));
        let floor_primitive = Primitive::new(floor, 0);
        let light_primitive = Primitive::new(ceiling_light_sphere, 1).with_area_light(0);

        let materials: Vec<Box<dyn crate::material::Material>> =
            vec![Box::new(MatteMaterial::new(Rgb::constant(0.7), 0.0)), Box::new(MatteMaterial::new(Rgb::black(), 0.0))];
        let lights = vec![Light::Area(DiffuseAreaLight::new(ceiling_light_sphere, Rgb::constant(20.0), false))];

        Scene::new(PrimitiveAggregate::linear(vec![floor_primitive, light_primitive]), lights, materials)
    }

    #[test]
    fn energy_stays_non_negative_and_finite_over_many_paths() {
        let scene = closed_box_scene();
        let integrator = PathTracingIntegrator::new(5);
        let ray = Ray::new(Point3::new(0.0, 0.0, -0.5), vec3(0.0, 0.3, 1.0), f32::INFINITY);

        for seed in 0..64u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let (l, alpha) = integrator.li(&ray, &scene, &mut rng, 0);
            assert!(!l.has_nan(), "seed {seed} produced NaN: {l:?}");
            assert!(l.r() >= 0.0 && l.g() >= 0.0 && l.b() >= 0.0, "seed {seed} produced negative radiance: {l:?}");
            assert!(alpha == 0.0 || alpha == 1.0);
        }
    }

    #[test]
    fn a_miss_carries_no_radiance_and_zero_alpha() {
        let scene = closed_box_scene();
        let integrator = PathTracingIntegrator::new(5);
        let ray = Ray::new(Point3::new(0.0, 0.0, 100.0), vec3(0.0, 0.0, 1.0), f32::INFINITY);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (l, alpha) = integrator.li(&ray, &scene, &mut rng, 0);
        assert_eq!(alpha, 0.0);
        assert!(l.is_black());
    }
}
