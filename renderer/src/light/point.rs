use super::{LightFlags, VisibilityTester};
use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use crate::sampling::uniform_sample_sphere;
use cgmath::{InnerSpace, Point2, Point3, Vector3};
use std::f32::consts::PI;

/// A light source that emits the same amount of power in every direction
/// from a single point, with no physical extent.
pub struct PointLight {
    position: Point3<f32>,
    intensity: Rgb,
}

impl PointLight {
    pub fn new(position: Point3<f32>, intensity: Rgb) -> Self {
        Self { position, intensity }
    }

    pub fn sample_li(&self, interaction: &SurfaceInteraction) -> (Rgb, Vector3<f32>, f32, VisibilityTester) {
        let light_to_point = self.position - interaction.point;
        let li = self.intensity / light_to_point.magnitude2();
        let wi = light_to_point.normalize();
        let tester = VisibilityTester::new(Box::new(*interaction), self.position);
        (li, wi, 1.0, tester)
    }

    pub fn power(&self) -> Rgb {
        4.0 * PI * self.intensity
    }

    pub fn flags(&self) -> LightFlags {
        LightFlags::DELTA_POSITION
    }

    /// Emit a photon ray from the point uniformly over the sphere of
    /// directions. Returns the ray and the (meaningless, for a point
    /// light) emission normal, which callers use only to cosine-weight
    /// area lights.
    pub fn sample_emission(&self, u_dir: Point2<f32>) -> (Ray, Vector3<f32>) {
        let direction = uniform_sample_sphere(u_dir);
        (Ray::new(self.position, direction, f32::INFINITY), direction)
    }
}
