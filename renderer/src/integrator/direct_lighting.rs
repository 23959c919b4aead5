use super::SurfaceIntegrator;
use crate::color::Rgb;
use crate::mc_core;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::TransportMode;
use rand::RngCore;

/// Direct illumination at the first non-specular hit, plus perfect
/// mirror/glass reflections traced through as a specular chain. No
/// indirect diffuse bounce: a diffuse surface lit only by a light outside
/// its direct view is black under this integrator, by design.
pub struct DirectLightingIntegrator {
    pub max_specular_depth: u32,
    pub ambient_occlusion_samples: u32,
    pub ambient_occlusion_distance: f32,
    pub ambient_occlusion_color: Rgb,
}

impl DirectLightingIntegrator {
    pub fn new(max_specular_depth: u32) -> Self {
        Self {
            max_specular_depth,
            ambient_occlusion_samples: 0,
            ambient_occlusion_distance: 0.0,
            ambient_occlusion_color: Rgb::black(),
        }
    }

    pub fn with_ambient_occlusion(mut self, samples: u32, distance: f32, color: Rgb) -> Self {
        self.ambient_occlusion_samples = samples;
        self.ambient_occlusion_distance = distance;
        self.ambient_occlusion_color = color;
        self
    }
}

impl SurfaceIntegrator for DirectLightingIntegrator {
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
            if self.ambient_occlusion_samples > 0 {
                l = l
                    + mc_core::estimate_ambient_occlusion(
                        scene,
                        &interaction,
                        self.ambient_occlusion_color,
                        self.ambient_occlusion_distance,
                        self.ambient_occlusion_samples,
                        rng,
                    );
            }
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
    use crate::primitive::{Primitive, PrimitiveAggregate};
    use crate::scene::Scene;
    use crate::shape::{Plane, Shape};
    use cgmath::{vec3, Point3};

    fn lit_plane_scene() -> Scene {
        let plane = Shape::Plane(Plane::new(Point3::new(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0)));
        let primitive = Primitive::new(plane, 0);
        let materials: Vec<Box<dyn crate::material::Material>> = vec![Box::new(MatteMaterial::new(Rgb::constant(1.0), 0.0))];
        let light = Light::Point(PointLight::new(Point3::new(0.0, 0.0, 1.0), Rgb::constant(std::f32::consts::PI)));
        Scene::new(PrimitiveAggregate::linear(vec![primitive]), vec![light], materials)
    }

    #[test]
    fn a_point_light_straight_above_a_white_plane_returns_near_white() {
        let scene = lit_plane_scene();
        let integrator = DirectLightingIntegrator::new(0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), vec3(0.0, 0.0, -1.0), f32::INFINITY);
        let mut rng = rand::thread_rng();
        let (l, alpha) = integrator.li(&ray, &scene, &mut rng, 0);

        assert_eq!(alpha, 1.0);
        assert!((l.r() - 1.0).abs() < 1e-3, "r = {}", l.r());
        assert!((l.g() - 1.0).abs() < 1e-3, "g = {}", l.g());
        assert!((l.b() - 1.0).abs() < 1e-3, "b = {}", l.b());
    }

    #[test]
    fn a_miss_returns_black_and_zero_alpha() {
        let scene = lit_plane_scene();
        let integrator = DirectLightingIntegrator::new(0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), vec3(0.0, 0.0, 1.0), f32::INFINITY);
        let mut rng = rand::thread_rng();
        let (l, alpha) = integrator.li(&ray, &scene, &mut rng, 0);

        assert_eq!(alpha, 0.0);
        assert!(l.is_black());
    }
}
