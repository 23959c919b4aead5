mod plane;
mod sphere;
mod triangle;

pub use plane::Plane;
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use bvh::aabb::{Bounded, AABB};
use cgmath::{Point2, Point3, Vector3};

/// A piece of intersectable, sampleable geometry. Every variant is analytic
/// (no mesh import pipeline): the handful of primitives needed to build and
/// test complete scenes.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    Sphere(Sphere),
    Plane(Plane),
    Triangle(Triangle),
}

impl Shape {
    /// Returns the nearest intersection in `(0, ray.t_max)`, if any. `ray`
    /// and the returned interaction are both in world space. The
    /// interaction's `primitive_index` is left at `0` and must be filled in
    /// by the caller, which alone knows the primitive's index.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, SurfaceInteraction)> {
        match self {
            Shape::Sphere(s) => s.ray_intersection(ray),
            Shape::Plane(p) => p.ray_intersection(ray),
            Shape::Triangle(t) => t.ray_intersection(ray),
        }
    }

    pub fn area(&self) -> f32 {
        match self {
            Shape::Sphere(s) => s.area(),
            Shape::Plane(p) => p.area(),
            Shape::Triangle(t) => t.area(),
        }
    }

    /// Uniformly sample a point (and its outward normal) over the shape's
    /// surface area, used by area-light sampling.
    pub fn sample(&self, u: Point2<f32>) -> (Point3<f32>, Vector3<f32>) {
        match self {
            Shape::Sphere(s) => s.sample(u),
            Shape::Plane(p) => p.sample(u),
            Shape::Triangle(t) => t.sample(u),
        }
    }
}

impl Bounded for Shape {
    fn aabb(&self) -> AABB {
        match self {
            Shape::Sphere(s) => s.aabb(),
            Shape::Plane(p) => p.aabb(),
            Shape::Triangle(t) => t.aabb(),
        }
    }
}
