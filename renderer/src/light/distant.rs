use super::{LightFlags, VisibilityTester};
use crate::bsdf::geometry::concentric_sample_disk;
use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use cgmath::{InnerSpace, Point2, Point3, Vector3};
use std::f32::consts::PI;

/// A light infinitely far away that illuminates every point in the scene
/// from the same direction with the same radiance, like sunlight.
pub struct DistantLight {
    direction_to_light: Vector3<f32>,
    radiance: Rgb,
    world_center: Point3<f32>,
    world_radius: f32,
}

impl DistantLight {
    pub fn new(direction_to_light: Vector3<f32>, radiance: Rgb) -> Self {
        Self {
            direction_to_light: direction_to_light.normalize(),
            radiance,
            world_center: Point3::new(0.0, 0.0, 0.0),
            world_radius: 1.0,
        }
    }

    pub fn preprocess(&mut self, world_center: Point3<f32>, world_radius: f32) {
        self.world_center = world_center;
        self.world_radius = world_radius;
    }

    pub fn sample_li(&self, interaction: &SurfaceInteraction) -> (Rgb, Vector3<f32>, f32, VisibilityTester) {
        let wi = self.direction_to_light;
        let outside_point = interaction.point + wi * (2.0 * self.world_radius);
        let tester = VisibilityTester::new(Box::new(*interaction), outside_point);
        (self.radiance, wi, 1.0, tester)
    }

    pub fn power(&self) -> Rgb {
        self.radiance * (PI * self.world_radius * self.world_radius)
    }

    pub fn flags(&self) -> LightFlags {
        LightFlags::DELTA_DIRECTION
    }

    /// Emit a photon ray from a disk perpendicular to the light's
    /// direction, sized to the scene's bounding sphere, traveling into
    /// the scene.
    pub fn sample_emission(&self, u_disk: Point2<f32>) -> (Ray, Vector3<f32>) {
        let (tangent, bitangent) = orthonormal_basis(self.direction_to_light);
        let disk = concentric_sample_disk(u_disk);
        let origin = self.world_center
            + self.direction_to_light * self.world_radius
            + (tangent * disk.x + bitangent * disk.y) * self.world_radius;
        let direction = -self.direction_to_light;
        (Ray::new(origin, direction, f32::INFINITY), direction)
    }
}

fn orthonormal_basis(n: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let a = if n.x.abs() > 0.9 { Vector3::new(0.0, 1.0, 0.0) } else { Vector3::new(1.0, 0.0, 0.0) };
    let tangent = n.cross(a).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}
