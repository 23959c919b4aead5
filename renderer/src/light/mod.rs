mod area;
mod distant;
mod infinite;
mod point;
mod visibility;

pub use area::DiffuseAreaLight;
pub use distant::DistantLight;
pub use infinite::ConstantInfiniteLight;
pub use point::PointLight;
pub use visibility::VisibilityTester;

use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use bitflags::bitflags;
use cgmath::{Point2, Point3, Vector3};

bitflags! {
    /// Describes how a light's position or direction is distributed, so
    /// integrators can tell delta lights (which can never be hit by a
    /// ray and need no MIS weighting) from area and infinite lights.
    pub struct LightFlags: u8 {
        const DELTA_POSITION = 0b0001;
        const DELTA_DIRECTION = 0b0010;
        const AREA = 0b0100;
        const INFINITE = 0b1000;
    }
}

impl LightFlags {
    pub fn is_delta(self) -> bool {
        self.contains(LightFlags::DELTA_POSITION) || self.contains(LightFlags::DELTA_DIRECTION)
    }
}

/// A source of illumination in the scene.
pub enum Light {
    Point(PointLight),
    Distant(DistantLight),
    Area(DiffuseAreaLight),
    Infinite(ConstantInfiniteLight),
}

impl Light {
    /// Sample an incident direction at `interaction.point`, returning the
    /// arriving radiance, the direction toward the light, its pdf with
    /// respect to solid angle, and a tester for whether the path between
    /// the two points is occluded.
    pub fn sample_li(
        &self,
        interaction: &SurfaceInteraction,
        u: Point2<f32>,
    ) -> (Rgb, Vector3<f32>, f32, VisibilityTester) {
        match self {
            Light::Point(l) => l.sample_li(interaction),
            Light::Distant(l) => l.sample_li(interaction),
            Light::Area(l) => l.sample_li(interaction, u),
            Light::Infinite(l) => l.sample_li(interaction, u),
        }
    }

    /// The light's pdf, with respect to solid angle at `interaction.point`,
    /// of having sampled direction `wi`. Delta lights always return `0.0`
    /// since they can't be hit by sampling a direction.
    pub fn pdf_li(&self, interaction: &SurfaceInteraction, wi: Vector3<f32>) -> f32 {
        match self {
            Light::Point(_) | Light::Distant(_) => 0.0,
            Light::Area(l) => l.pdf_li(interaction, wi),
            Light::Infinite(l) => l.pdf_li(interaction, wi),
        }
    }

    /// Radiance carried by a ray that escapes the scene without hitting
    /// anything, for an infinite light. Zero for every other light kind.
    pub fn le(&self, ray: &Ray) -> Rgb {
        match self {
            Light::Infinite(l) => l.le(ray),
            _ => Rgb::black(),
        }
    }

    pub fn power(&self) -> Rgb {
        match self {
            Light::Point(l) => l.power(),
            Light::Distant(l) => l.power(),
            Light::Area(l) => l.power(),
            Light::Infinite(l) => l.power(),
        }
    }

    pub fn flags(&self) -> LightFlags {
        match self {
            Light::Point(l) => l.flags(),
            Light::Distant(l) => l.flags(),
            Light::Area(l) => l.flags(),
            Light::Infinite(l) => l.flags(),
        }
    }

    /// Fit the light to the scene's bounding sphere. Only distant and
    /// infinite lights use this; every other variant is a no-op.
    pub fn preprocess(&mut self, world_center: Point3<f32>, world_radius: f32) {
        match self {
            Light::Distant(l) => l.preprocess(world_center, world_radius),
            Light::Infinite(l) => l.preprocess(world_center, world_radius),
            _ => {}
        }
    }

    /// Emit a photon ray leaving the light, for the photon prepass and
    /// progressive photon mapping's photon pass. Each variant samples its
    /// own emission distribution; `u` supplies up to three independent
    /// 2-D samples (only area lights use all three).
    pub fn sample_emission(&self, u: [Point2<f32>; 3], u_side: f32) -> (Ray, Vector3<f32>) {
        match self {
            Light::Point(l) => l.sample_emission(u[0]),
            Light::Distant(l) => l.sample_emission(u[0]),
            Light::Area(l) => l.sample_emission(u[0], u[1], u_side),
            Light::Infinite(l) => l.sample_emission(u[0], u[1]),
        }
    }
}
