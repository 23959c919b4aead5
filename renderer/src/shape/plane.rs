use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use bvh::aabb::{Bounded, AABB};
use cgmath::{point2, vec3, InnerSpace, Point2, Point3, Vector3};

/// An infinite plane, used for ground planes and backdrops. Has no finite
/// surface area, so it is not a valid area-light emitter and its `sample`
/// falls back to returning its defining point.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub point: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Plane {
    pub fn new(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { point, normal: normal.normalize() }
    }

    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, SurfaceInteraction)> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-7 {
            return None;
        }
        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t <= 1e-4 || t >= ray.t_max {
            return None;
        }
        let point = ray.at_t(t);
        let (dpdu, dpdv) = tangents(self.normal);
        let error_bound = vec3(0.0, 0.0, 0.0);
        Some((
            t,
            SurfaceInteraction::new(point, error_bound, -ray.direction, point2(0.0, 0.0), dpdu, dpdv, 0),
        ))
    }

    pub fn area(&self) -> f32 {
        f32::INFINITY
    }

    pub fn sample(&self, _u: Point2<f32>) -> (Point3<f32>, Vector3<f32>) {
        (self.point, self.normal)
    }
}

fn tangents(normal: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let dpdu = if normal.x.abs() > normal.y.abs() {
        vec3(-normal.z, 0.0, normal.x).normalize()
    } else {
        vec3(0.0, normal.z, -normal.y).normalize()
    };
    let dpdv = normal.cross(dpdu);
    (dpdu, dpdv)
}

impl Bounded for Plane {
    fn aabb(&self) -> AABB {
        // An infinite plane has no useful finite bound; callers should keep
        // it out of a BVH and intersect it directly (as the `Vector`
        // aggregate does).
        AABB::with_bounds(
            bvh::Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
            bvh::Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        )
    }
}
