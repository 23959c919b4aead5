use crate::geometry::Transform;
use cgmath::{Matrix4, Point3, Vector3};

/// A ray, optionally carrying auxiliary rays used to estimate a texture
/// filter footprint at the hit point.
#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
    pub t_max: f32,
    pub differential: Option<RayDifferential>,
}

#[derive(Debug, Clone, Copy)]
pub struct RayDifferential {
    pub rx_origin: Point3<f32>,
    pub rx_direction: Vector3<f32>,
    pub ry_origin: Point3<f32>,
    pub ry_direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            t_max,
            differential: None,
        }
    }

    pub fn at_t(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    pub fn scale_differential(&mut self, scale: f32) {
        if let Some(diff) = &mut self.differential {
            diff.rx_origin = self.origin + (diff.rx_origin - self.origin) * scale;
            diff.ry_origin = self.origin + (diff.ry_origin - self.origin) * scale;
            diff.rx_direction = self.direction + (diff.rx_direction - self.direction) * scale;
            diff.ry_direction = self.direction + (diff.ry_direction - self.direction) * scale;
        }
    }
}

impl From<&Ray> for bvh::ray::Ray {
    fn from(ray: &Ray) -> Self {
        bvh::ray::Ray::new(
            bvh::Point3::new(ray.origin.x, ray.origin.y, ray.origin.z),
            bvh::Vector3::new(ray.direction.x, ray.direction.y, ray.direction.z),
        )
    }
}

impl Transform<Ray> for Matrix4<f32> {
    fn transform(&self, ray: &Ray) -> Ray {
        use cgmath::Transform as _;
        Ray {
            origin: self.transform_point(ray.origin),
            // Left unnormalized so a scaling transform correctly shrinks or
            // grows the ray's own parametric space.
            direction: self.transform_vector(ray.direction),
            t_max: ray.t_max,
            differential: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    #[test]
    fn at_t() {
        let ray = Ray::new(Point3::new(2.0, 3.0, 4.0), Vector3::new(1.0, 0.0, 0.0), f32::INFINITY);
        assert_eq!(ray.at_t(0.0), Point3::new(2.0, 3.0, 4.0));
        assert_eq!(ray.at_t(2.5), Point3::new(4.5, 3.0, 4.0));
    }

    #[test]
    fn translating() {
        let ray = Ray::new(Point3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 1.0, 0.0), f32::INFINITY);
        let t: Matrix4<f32> = Matrix4::from_translation(Vector3::new(3.0, 4.0, 5.0));
        let ray = t.transform(&ray);
        assert_eq!(ray.origin, Point3::new(4.0, 6.0, 8.0));
        assert_eq!(ray.direction, Vector3::new(0.0, 1.0, 0.0));
    }
}
