use super::{LightFlags, VisibilityTester};
use crate::bsdf::geometry::concentric_sample_disk;
use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use cgmath::{vec3, InnerSpace, Point2, Point3, Vector3};
use std::f32::consts::PI;

/// A uniform-radiance environment light representing a featureless sky,
/// contributing to every ray that escapes the scene without a hit.
pub struct ConstantInfiniteLight {
    radiance: Rgb,
    world_center: Point3<f32>,
    world_radius: f32,
}

impl ConstantInfiniteLight {
    pub fn new(radiance: Rgb) -> Self {
        Self { radiance, world_center: Point3::new(0.0, 0.0, 0.0), world_radius: 1.0 }
    }

    pub fn preprocess(&mut self, world_center: Point3<f32>, world_radius: f32) {
        self.world_center = world_center;
        self.world_radius = world_radius;
    }

    pub fn sample_li(&self, interaction: &SurfaceInteraction, u: Point2<f32>) -> (Rgb, Vector3<f32>, f32, VisibilityTester) {
        let wi = uniform_sample_sphere(u);
        let pdf = 1.0 / (4.0 * PI);
        let outside_point = interaction.point + wi * (2.0 * self.world_radius);
        let tester = VisibilityTester::new(Box::new(*interaction), outside_point);
        (self.radiance, wi, pdf, tester)
    }

    pub fn pdf_li(&self, _interaction: &SurfaceInteraction, _wi: Vector3<f32>) -> f32 {
        1.0 / (4.0 * PI)
    }

    pub fn le(&self, _ray: &Ray) -> Rgb {
        self.radiance
    }

    pub fn power(&self) -> Rgb {
        self.radiance * (4.0 * PI * PI * self.world_radius * self.world_radius)
    }

    pub fn flags(&self) -> LightFlags {
        LightFlags::INFINITE
    }

    /// Emit a photon ray from a disk spanning the scene's bounding
    /// sphere, perpendicular to a uniformly sampled direction, traveling
    /// toward the scene.
    pub fn sample_emission(&self, u_dir: Point2<f32>, u_disk: Point2<f32>) -> (Ray, Vector3<f32>) {
        let direction = uniform_sample_sphere(u_dir);
        let (tangent, bitangent) = orthonormal_basis(direction);
        let disk = concentric_sample_disk(u_disk);
        let origin = self.world_center - direction * self.world_radius
            + (tangent * disk.x + bitangent * disk.y) * self.world_radius;
        (Ray::new(origin, direction, f32::INFINITY), -direction)
    }
}

fn orthonormal_basis(n: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let a = if n.x.abs() > 0.9 { Vector3::new(0.0, 1.0, 0.0) } else { Vector3::new(1.0, 0.0, 0.0) };
    let tangent = n.cross(a).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}

fn uniform_sample_sphere(u: Point2<f32>) -> Vector3<f32> {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    vec3(r * phi.cos(), r * phi.sin(), z)
}
