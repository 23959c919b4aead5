use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use bvh::aabb::{Bounded, AABB};
use cgmath::{point2, vec3, InnerSpace, Point2, Point3, Vector3};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, SurfaceInteraction)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let t0 = (-b - sqrt_d) / (2.0 * a);
        let t1 = (-b + sqrt_d) / (2.0 * a);
        let t = if t0 > 1e-4 {
            t0
        } else if t1 > 1e-4 && t1 < ray.t_max {
            t1
        } else {
            return None;
        };
        if t >= ray.t_max {
            return None;
        }

        let point = ray.at_t(t);
        let normal = (point - self.center) / self.radius;
        let (dpdu, dpdv) = tangents(normal);
        let error_bound = vec3(normal.x.abs(), normal.y.abs(), normal.z.abs()) * self.radius * 1e-4;
        let phi = normal.z.atan2(normal.x);
        let theta = (normal.y / self.radius).clamp(-1.0, 1.0).acos();
        let uv = point2(phi / (2.0 * PI), theta / PI);

        Some((
            t,
            SurfaceInteraction::new(point, error_bound, -ray.direction, uv, dpdu, dpdv, 0),
        ))
    }

    pub fn area(&self) -> f32 {
        4.0 * PI * self.radius * self.radius
    }

    pub fn sample(&self, u: Point2<f32>) -> (Point3<f32>, Vector3<f32>) {
        let z = 1.0 - 2.0 * u.x;
        let r = (1.0 - z * z).max(0.0).sqrt();
        let phi = 2.0 * PI * u.y;
        let normal = vec3(r * phi.cos(), r * phi.sin(), z);
        (self.center + normal * self.radius, normal)
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

impl Bounded for Sphere {
    fn aabb(&self) -> AABB {
        let r = self.radius;
        AABB::with_bounds(
            bvh::Point3::new(self.center.x - r, self.center.y - r, self.center.z - r),
            bvh::Point3::new(self.center.x + r, self.center.y + r, self.center.z + r),
        )
    }
}
