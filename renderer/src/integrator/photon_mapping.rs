use super::SurfaceIntegrator;
use crate::bsdf::{Bsdf, BxdfType};
use crate::color::Rgb;
use crate::interaction::OffsetRayOrigin;
use crate::mc_core;
use crate::photon::PhotonMap;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::TransportMode;
use cgmath::{InnerSpace, Point2};
use rand::{Rng, RngCore};
use std::f32::consts::PI;

/// Estimates radiance from pre-shot photon maps (built by the photon
/// prepass) by density estimation: direct light and specular reflections
/// are still evaluated analytically, but diffuse indirect light and
/// caustics both come from nearby photons rather than further ray
/// bounces.
///
/// Indirect diffuse light is either read directly off the global photon
/// map (cheap, slightly blurry) or reconstructed with a one-bounce final
/// gather when `final_gather_samples > 0`, trading render time for a
/// sharper result.
pub struct PhotonMappingIntegrator {
    pub caustic_map: PhotonMap,
    pub global_map: PhotonMap,
    pub gather_photons: usize,
    pub max_gather_distance: f32,
    pub final_gather_samples: u32,
    pub max_specular_depth: u32,
}

impl PhotonMappingIntegrator {
    pub fn new(caustic_map: PhotonMap, global_map: PhotonMap, gather_photons: usize, max_gather_distance: f32) -> Self {
        Self {
            caustic_map,
            global_map,
            gather_photons,
            max_gather_distance,
            final_gather_samples: 0,
            max_specular_depth: 5,
        }
    }

    pub fn with_final_gather(mut self, samples: u32) -> Self {
        self.final_gather_samples = samples;
        self
    }

    /// Density estimate of outgoing radiance at a hit due to the photons
    /// recorded in `map`, reflected by the local BSDF's non-specular
    /// lobes only (specular lobes can never scatter a finite-power
    /// photon into a finite solid angle, so they're excluded).
    fn estimate_from_map(&self, map: &PhotonMap, hit_point: cgmath::Point3<f32>, bsdf: &Bsdf, wo: cgmath::Vector3<f32>) -> Rgb {
        if map.num_paths() == 0 {
            return Rgb::black();
        }
        let mut sq_radius = self.max_gather_distance * self.max_gather_distance;
        let found = map.gather(hit_point, self.gather_photons, &mut sq_radius);
        if found.is_empty() {
            return Rgb::black();
        }
        let mut sum = Rgb::black();
        for f in &found {
            let wi = -f.photon.direction;
            let contribution = bsdf.f(&wo, &wi, BxdfType::DIFFUSE | BxdfType::GLOSSY | BxdfType::REFLECTION | BxdfType::TRANSMISSION);
            sum = sum + contribution * f.photon.power;
        }
        sum * (1.0 / (map.num_paths() as f32 * PI * sq_radius))
    }

    /// Reconstruct indirect diffuse light by casting `final_gather_samples`
    /// cosine-weighted secondary rays and reading the global map's density
    /// estimate at whatever they hit, instead of reading it directly at
    /// the primary hit.
    fn final_gather(&self, scene: &Scene, hit: &crate::interaction::SurfaceInteraction, bsdf: &Bsdf, wo: cgmath::Vector3<f32>, rng: &mut impl Rng) -> Rgb {
        let n = hit.shading_geometry.normal;
        let mut sum = Rgb::black();
        let mut count = 0u32;
        for _ in 0..self.final_gather_samples {
            let u = Point2::new(rng.gen(), rng.gen());
            let sample = bsdf.sample_f(&wo, rng.gen(), u, BxdfType::ALL);
            let (wi, pdf, f, sampled_type) = match sample {
                Some(s) => s,
                None => continue,
            };
            if pdf == 0.0 || f.is_black() || sampled_type.contains(BxdfType::SPECULAR) {
                continue;
            }
            let ray = hit.spawn_ray(&wi);
            let secondary = match scene.ray_intersection(&ray) {
                Some(h) => h,
                None => continue,
            };
            let (_, s_primitive, s_hit) = secondary;
            let s_bsdf = scene
                .material(s_primitive.material_index)
                .scattering_functions(&s_hit, TransportMode::Radiance);
            let indirect = self.estimate_from_map(&self.global_map, s_hit.point, &s_bsdf, -wi);
            let cos = wi.dot(n).abs();
            sum = sum + f * indirect * (cos / pdf);
            count += 1;
        }
        if count == 0 {
            Rgb::black()
        } else {
            sum * (1.0 / count as f32)
        }
    }
}

impl SurfaceIntegrator for PhotonMappingIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore, _depth: u32) -> (Rgb, f32) {
        let (_, primitive, interaction) = match scene.ray_intersection(ray) {
            Some(h) => h,
            None => {
                let mut l = Rgb::black();
                for light in scene.infinite_lights() {
                    l = l + light.le(ray);
                }
                return (l, 0.0);
            }
        };

        let material = scene.material(primitive.material_index);
        let bsdf = material.scattering_functions(&interaction, TransportMode::Radiance);
        let wo = -ray.direction;

        let mut l = mc_core::emitted_radiance(scene, &primitive, &interaction, wo);
        if !bsdf.is_empty() {
            l = l + mc_core::estimate_all_direct_light(scene, &interaction, &bsdf, wo, material.is_flat(), rng);
            l = l + self.estimate_from_map(&self.caustic_map, interaction.point, &bsdf, wo);
            l = l + if self.final_gather_samples > 0 {
                self.final_gather(scene, &interaction, &bsdf, wo, rng)
            } else {
                self.estimate_from_map(&self.global_map, interaction.point, &bsdf, wo)
            };
            l = l + mc_core::specular_chain(scene, &interaction, &bsdf, wo, self.max_specular_depth, rng);
        }

        (l, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::{Light, PointLight};
    use crate::material::MatteMaterial;
    use crate::photon::Photon;
    use crate::primitive::{Primitive, PrimitiveAggregate};
    use crate::scene::Scene;
    use crate::shape::{Plane, Shape};
    use cgmath::{vec3, Point3};

    fn floor_scene() -> Scene {
        let plane = Shape::Plane(Plane::new(Point3::new(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0)));
        let primitive = Primitive::new(plane, 0);
        let materials: Vec<Box<dyn crate::material::Material>> = vec![Box::new(MatteMaterial::new(Rgb::constant(0.8), 0.0))];
        let light = Light::Point(PointLight::new(Point3::new(0.0, 0.0, 2.0), Rgb::constant(30.0)));
        Scene::new(PrimitiveAggregate::linear(vec![primitive]), vec![light], materials)
    }

    fn map_with_photons_near_origin(n: usize) -> PhotonMap {
        let mut map = PhotonMap::new("global");
        for i in 0..n {
            let angle = i as f32 * 0.37;
            let offset = vec3(angle.cos() * 0.05, angle.sin() * 0.05, 0.0);
            map.push(Photon::new(Point3::new(0.0, 0.0, 0.0) + offset, vec3(0.0, 0.0, -1.0), Rgb::constant(0.02)));
        }
        map.set_num_paths(n);
        map.build();
        map
    }

    #[test]
    fn a_dense_photon_cluster_brightens_the_surface_above_it() {
        let scene = floor_scene();
        let global_map = map_with_photons_near_origin(500);
        let integrator = PhotonMappingIntegrator::new(PhotonMap::new("caustic"), global_map, 50, 0.5);

        let ray_over_cluster = Ray::new(Point3::new(0.0, 0.0, 1.0), vec3(0.0, 0.0, -1.0), f32::INFINITY);
        let mut rng = rand::thread_rng();
        let (l_near, _) = integrator.li(&ray_over_cluster, &scene, &mut rng, 0);

        let ray_far_away = Ray::new(Point3::new(50.0, 50.0, 1.0), vec3(0.0, 0.0, -1.0), f32::INFINITY);
        let (l_far, _) = integrator.li(&ray_far_away, &scene, &mut rng, 0);

        assert!(l_near.r() > l_far.r(), "near = {}, far = {}", l_near.r(), l_far.r());
    }

    #[test]
    fn an_empty_photon_map_contributes_nothing() {
        let scene = floor_scene();
        let integrator = PhotonMappingIntegrator::new(PhotonMap::new("caustic"), PhotonMap::new("global"), 50, 0.5);
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), vec3(0.0, 0.0, -1.0), f32::INFINITY);
        let mut rng = rand::thread_rng();
        let (l, alpha) = integrator.li(&ray, &scene, &mut rng, 0);

        assert_eq!(alpha, 1.0);
        assert!(!l.has_nan());
        assert!(l.r() >= 0.0 && l.g() >= 0.0 && l.b() >= 0.0);
    }
}
