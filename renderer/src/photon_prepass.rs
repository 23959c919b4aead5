//! Shoots photons from the scene's lights and records them into k-d
//! tree-backed photon maps, for later density estimation by
//! [`crate::integrator::PhotonMappingIntegrator`] or the photon pass of
//! [`crate::integrator::SppmIntegrator`].
//!
//! Lights are chosen per photon with probability proportional to their
//! total emitted power (via [`Pdf1D`]), so photons carry roughly equal
//! power regardless of which light emitted them. A path terminates by
//! Russian roulette weighted by the surface's reflectance at each
//! bounce, rather than at a fixed depth, so bright mirrors and glass
//! keep bouncing while dark diffuse surfaces absorb quickly.

use crate::bsdf::BxdfType;
use crate::color::Rgb;
use crate::interaction::OffsetRayOrigin;
use crate::photon::{Photon, PhotonMap};
use crate::sampling::Pdf1D;
use crate::scene::Scene;
use crate::TransportMode;
use cgmath::{InnerSpace, Point2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Photon counts and path length for the prepass. `caustic_photons` and
/// `diffuse_photons` are path counts, not deposit counts: a single path
/// that bounces several times may deposit several photons (or, for a
/// caustic path that never touches a non-specular surface, none at
/// all).
pub struct PhotonPrepassSettings {
    pub caustic_photons: usize,
    pub diffuse_photons: usize,
    pub max_bounces: u32,
}

impl Default for PhotonPrepassSettings {
    fn default() -> Self {
        Self { caustic_photons: 200_000, diffuse_photons: 200_000, max_bounces: 8 }
    }
}

/// Run the full prepass, returning `(caustic_map, diffuse_map)`, both
/// already built and ready for `PhotonMap::gather`.
pub fn run(scene: &Scene, settings: &PhotonPrepassSettings, rng_seed: u64) -> (PhotonMap, PhotonMap) {
    let caustic = shoot_many(scene, settings.caustic_photons, settings.max_bounces, rng_seed ^ 0xC045_7115, "caustic", |specular_seen| {
        specular_seen
    });
    let diffuse = shoot_many(scene, settings.diffuse_photons, settings.max_bounces, rng_seed ^ 0xD1FF_0591, "diffuse", |_| true);
    (caustic, diffuse)
}

fn shoot_many(
    scene: &Scene,
    n: usize,
    max_bounces: u32,
    seed: u64,
    name: &str,
    filter: impl Fn(bool) -> bool + Sync,
) -> PhotonMap {
    let mut map = PhotonMap::new(name);
    if n == 0 {
        return map;
    }
    let photons: Vec<Photon> = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed ^ (i as u64).wrapping_mul(0xA24B_AED4_963E_E407));
            let mut collected = Vec::new();
            shoot_one_photon_path(scene, &mut rng, max_bounces, &mut |photon, specular_seen| {
                if filter(specular_seen) {
                    collected.push(*photon);
                }
            });
            collected
        })
        .collect();
    map.append(photons, n);
    map.build();
    map
}

fn light_scalar_power(light: &crate::light::Light) -> f32 {
    let p = light.power();
    (p.r() + p.g() + p.b()) / 3.0
}

/// Trace a single photon path from a power-sampled light, invoking
/// `on_deposit` at every non-specular surface hit after the first
/// bounce (the first hit is skipped, since it's exactly what every
/// integrator's analytic direct-lighting term already accounts for).
/// The second callback argument is whether at least one specular bounce
/// happened before this deposit, so a caller can separate caustic
/// photons from the rest.
pub fn shoot_one_photon_path(scene: &Scene, rng: &mut impl Rng, max_bounces: u32, on_deposit: &mut impl FnMut(&Photon, bool)) {
    let light_power: Vec<f32> = scene.lights.iter().map(light_scalar_power).collect();
    if light_power.iter().sum::<f32>() <= 0.0 {
        return;
    }
    let dist = Pdf1D::new(&light_power);
    let (light_index, light_pdf) = dist.d_sample(rng.gen());
    if light_pdf <= 0.0 {
        return;
    }
    let light = &scene.lights[light_index];
    let (mut ray, _emission_normal) = light.sample_emission(
        [Point2::new(rng.gen(), rng.gen()), Point2::new(rng.gen(), rng.gen()), Point2::new(rng.gen(), rng.gen())],
        rng.gen(),
    );
    let mut power = light.power() * (1.0 / light_pdf);
    let mut specular_seen = false;

    for bounce in 0..max_bounces {
        let (_, primitive, interaction) = match scene.ray_intersection(&ray) {
            Some(h) => h,
            None => break,
        };
        let material = scene.material(primitive.material_index);
        let bsdf = material.scattering_functions(&interaction, TransportMode::Radiance);
        if bsdf.is_empty() {
            break;
        }
        let wo = -ray.direction;
        let has_non_specular = bsdf.count_with_type(BxdfType::DIFFUSE | BxdfType::GLOSSY) > 0;
        if has_non_specular && bounce > 0 {
            let photon = Photon::new(interaction.point, ray.direction, power);
            on_deposit(&photon, specular_seen);
        }

        let sample = bsdf.sample_f(&wo, rng.gen(), Point2::new(rng.gen(), rng.gen()), BxdfType::ALL);
        let (wi, pdf, f, sampled_type) = match sample {
            Some(s) => s,
            None => break,
        };
        if pdf == 0.0 || f.is_black() {
            break;
        }
        if sampled_type.contains(BxdfType::SPECULAR) {
            specular_seen = true;
        }

        let cos = wi.dot(interaction.shading_geometry.normal).abs();
        let scale = f * (cos / pdf);
        let continue_prob = ((scale.r() + scale.g() + scale.b()) / 3.0).min(0.95);
        if continue_prob <= 0.0 || rng.gen::<f32>() > continue_prob {
            break;
        }
        power = power * scale * (1.0 / continue_prob);
        ray = interaction.spawn_ray(&wi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::light::{DiffuseAreaLight, Light, PointLight};
    use crate::material::MatteMaterial;
    use crate::primitive::{Primitive, PrimitiveAggregate};
    use crate::shape::{Shape, Sphere};
    use cgmath::Point3;

    fn simple_scene() -> Scene {
        let sphere = Shape::Sphere(Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0));
        let primitive = Primitive::new(sphere, 0);
        let materials: Vec<Box<dyn crate::material::Material>> = vec![Box::new(MatteMaterial::new(Rgb::constant(0.8), 0.0))];
        let light = Light::Point(PointLight::new(Point3::new(0.0, 3.0, 0.0), Rgb::constant(50.0)));
        Scene::new(PrimitiveAggregate::linear(vec![primitive]), vec![light], materials)
    }

    #[test]
    fn diffuse_pass_deposits_photons_on_a_sphere() {
        let scene = simple_scene();
        let settings = PhotonPrepassSettings { caustic_photons: 0, diffuse_photons: 2000, max_bounces: 4 };
        let (caustic, diffuse) = run(&scene, &settings, 7);
        assert_eq!(caustic.num_photons(), 0);
        assert!(diffuse.num_photons() > 0);
    }

    #[test]
    fn caustic_pass_is_empty_with_no_specular_surfaces() {
        let scene = simple_scene();
        let settings = PhotonPrepassSettings { caustic_photons: 2000, diffuse_photons: 0, max_bounces: 4 };
        let (caustic, _diffuse) = run(&scene, &settings, 11);
        assert_eq!(caustic.num_photons(), 0);
    }

    #[test]
    fn no_lights_yields_empty_maps() {
        let sphere = Shape::Sphere(Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0));
        let primitive = Primitive::new(sphere, 0);
        let materials: Vec<Box<dyn crate::material::Material>> = vec![Box::new(MatteMaterial::new(Rgb::constant(0.8), 0.0))];
        let scene = Scene::new(PrimitiveAggregate::linear(vec![primitive]), vec![], materials);
        let (caustic, diffuse) = run(&scene, &PhotonPrepassSettings::default(), 3);
        assert_eq!(caustic.num_photons(), 0);
        assert_eq!(diffuse.num_photons(), 0);
    }

    #[test]
    fn caustic_photons_appear_behind_a_mirror() {
        use crate::material::MirrorMaterial;
        let floor = Shape::Plane(crate::shape::Plane::new(Point3::new(0.0, -1.0, 0.0), cgmath::vec3(0.0, 1.0, 0.0)));
        let mirror_sphere = Shape::Sphere(Sphere::new(Point3::new(0.0, 0.0, 0.0), 1.0));
        let primitives = vec![Primitive::new(mirror_sphere, 0), Primitive::new(floor, 1)];
        let materials: Vec<Box<dyn crate::material::Material>> = vec![
            Box::new(MirrorMaterial::new(Rgb::constant(0.95))),
            Box::new(MatteMaterial::new(Rgb::constant(0.6), 0.0)),
        ];
        let light = Light::Area(DiffuseAreaLight::new(
            Shape::Sphere(Sphere::new(Point3::new(0.0, 4.0, 0.0), 0.3)),
            Rgb::constant(30.0),
            true,
        ));
        let scene = Scene::new(PrimitiveAggregate::linear(primitives), vec![light], materials);
        let settings = PhotonPrepassSettings { caustic_photons: 4000, diffuse_photons: 0, max_bounces: 6 };
        let (caustic, _diffuse) = run(&scene, &settings, 21);
        assert!(caustic.num_photons() > 0);
    }
}
