use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use bvh::aabb::{Bounded, AABB};
use cgmath::{point2, vec3, InnerSpace, Point3, Point2, Vector3};

/// A single triangle given as three world-space vertices, with optional
/// per-vertex shading normals for smooth (Phong-interpolated) shading.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub p0: Point3<f32>,
    pub p1: Point3<f32>,
    pub p2: Point3<f32>,
    pub shading_normals: Option<[Vector3<f32>; 3]>,
}

impl Triangle {
    pub fn new(p0: Point3<f32>, p1: Point3<f32>, p2: Point3<f32>) -> Self {
        Self { p0, p1, p2, shading_normals: None }
    }

    pub fn with_shading_normals(mut self, normals: [Vector3<f32>; 3]) -> Self {
        self.shading_normals = Some(normals);
        self
    }

    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, SurfaceInteraction)> {
        // Möller-Trumbore.
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        let pvec = ray.direction.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < 1e-8 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.p0;
        let u = tvec.dot(pvec) * inv_det;
        if u < 0.0 || u > 1.0 {
            return None;
        }
        let qvec = tvec.cross(e1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(qvec) * inv_det;
        if t <= 1e-4 || t >= ray.t_max {
            return None;
        }

        let geometric_normal = e1.cross(e2).normalize();
        let normal = match self.shading_normals {
            Some(ns) => (ns[0] * (1.0 - u - v) + ns[1] * u + ns[2] * v).normalize(),
            None => geometric_normal,
        };
        let point = ray.at_t(t);
        let dpdu = e1;
        let dpdv = normal.cross(dpdu);
        let error_bound = vec3(1.0, 1.0, 1.0) * 1e-5;

        Some((
            t,
            SurfaceInteraction::new(point, error_bound, -ray.direction, point2(u, v), dpdu, dpdv, 0),
        ))
    }

    pub fn area(&self) -> f32 {
        0.5 * (self.p1 - self.p0).cross(self.p2 - self.p0).magnitude()
    }

    pub fn sample(&self, u: Point2<f32>) -> (Point3<f32>, Vector3<f32>) {
        let su0 = u.x.sqrt();
        let b0 = 1.0 - su0;
        let b1 = u.y * su0;
        let point = self.p0 + (self.p1 - self.p0) * b1 + (self.p2 - self.p0) * (1.0 - b0 - b1);
        let normal = (self.p1 - self.p0).cross(self.p2 - self.p0).normalize();
        (point, normal)
    }
}

impl Bounded for Triangle {
    fn aabb(&self) -> AABB {
        let min = bvh::Point3::new(
            self.p0.x.min(self.p1.x).min(self.p2.x),
            self.p0.y.min(self.p1.y).min(self.p2.y),
            self.p0.z.min(self.p1.z).min(self.p2.z),
        );
        let max = bvh::Point3::new(
            self.p0.x.max(self.p1.x).max(self.p2.x),
            self.p0.y.max(self.p1.y).max(self.p2.y),
            self.p0.z.max(self.p1.z).max(self.p2.z),
        );
        AABB::with_bounds(min, max)
    }
}
