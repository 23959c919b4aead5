use super::{Bounds3, VolumeRegion};
use crate::color::Rgb;
use crate::ray::Ray;
use cgmath::{InnerSpace, Point3, Vector3};

/// A homogeneous participating medium: constant absorption, scattering,
/// emission, and phase asymmetry everywhere inside an axis-aligned box.
pub struct UniformVolumeRegion {
    sigma_a: Rgb,
    sigma_s: Rgb,
    emission: Rgb,
    asymmetry: f32,
    bounds: Bounds3,
}

impl UniformVolumeRegion {
    pub fn new(sigma_a: Rgb, sigma_s: Rgb, emission: Rgb, asymmetry: f32, bounds: Bounds3) -> Self {
        Self { sigma_a, sigma_s, emission, asymmetry, bounds }
    }
}

impl VolumeRegion for UniformVolumeRegion {
    fn sigma_a(&self, _p: Point3<f32>, _w: Vector3<f32>) -> Rgb {
        self.sigma_a
    }

    fn sigma_s(&self, _p: Point3<f32>, _w: Vector3<f32>) -> Rgb {
        self.sigma_s
    }

    fn emission(&self, _p: Point3<f32>, _w: Vector3<f32>) -> Rgb {
        self.emission
    }

    fn asymmetry(&self) -> f32 {
        self.asymmetry
    }

    /// Constant density means the integral over any sub-segment is just
    /// the segment length times `sigma_t`, so no stepping is needed.
    fn tau(&self, ray: &Ray, _step: f32, _offset: f32) -> Rgb {
        match self.cross_bound(ray) {
            None => Rgb::black(),
            Some((t0, t1)) => {
                let length = (t1 - t0) * ray.direction.magnitude();
                self.sigma_t(ray.origin, ray.direction) * length
            }
        }
    }

    fn bounds(&self) -> Bounds3 {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{point3, vec3};

    #[test]
    fn tau_scales_with_segment_length() {
        let region = UniformVolumeRegion::new(
            Rgb::constant(0.1),
            Rgb::constant(0.1),
            Rgb::black(),
            0.0,
            Bounds3::new(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0)),
        );
        let ray = Ray::new(point3(-5.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), f32::INFINITY);
        let tau = region.tau(&ray, 1.0, 0.0);
        assert!((tau.r() - 0.2 * 2.0).abs() < 1e-4);
    }

    #[test]
    fn tau_outside_bounds_is_zero() {
        let region = UniformVolumeRegion::new(
            Rgb::constant(0.1),
            Rgb::constant(0.1),
            Rgb::black(),
            0.0,
            Bounds3::new(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0)),
        );
        let ray = Ray::new(point3(-5.0, 5.0, 0.0), vec3(1.0, 0.0, 0.0), f32::INFINITY);
        assert_eq!(region.tau(&ray, 1.0, 0.0), Rgb::black());
    }
}
