mod integrator;
mod uniform;

pub use integrator::{EmissionVolumeIntegrator, SingleScatterVolumeIntegrator};
pub use uniform::UniformVolumeRegion;

use crate::color::Rgb;
use crate::ray::Ray;
use cgmath::{InnerSpace, Point3, Vector3};
use std::f32::consts::PI;

/// An axis-aligned box in world space, used only to bound a volume region.
#[derive(Debug, Clone, Copy)]
pub struct Bounds3 {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds3 {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Clip `ray` to the slab, returning the entry/exit parametric values
    /// intersected with `[0, ray.t_max]`, or `None` if the ray misses the
    /// box or the clipped interval is empty.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t0 = 0.0f32;
        let mut t1 = ray.t_max;
        for axis in 0..3 {
            let (origin, dir, lo, hi) = match axis {
                0 => (ray.origin.x, ray.direction.x, self.min.x, self.max.x),
                1 => (ray.origin.y, ray.direction.y, self.min.y, self.max.y),
                _ => (ray.origin.z, ray.direction.z, self.min.z, self.max.z),
            };
            let inv_dir = 1.0 / dir;
            let mut t_near = (lo - origin) * inv_dir;
            let mut t_far = (hi - origin) * inv_dir;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return None;
            }
        }
        Some((t0, t1))
    }
}

/// A participating medium: a region of space that absorbs, scatters, and
/// possibly emits light. Shared by the emission-only and single-scatter
/// integrators, and queried directly by surface integrators for
/// transmittance along a shadow or camera ray.
pub trait VolumeRegion: Send + Sync {
    /// Absorption coefficient at `p` along direction `w`.
    fn sigma_a(&self, p: Point3<f32>, w: Vector3<f32>) -> Rgb;

    /// Scattering coefficient at `p` along direction `w`.
    fn sigma_s(&self, p: Point3<f32>, w: Vector3<f32>) -> Rgb;

    /// Emitted radiance added at `p` along direction `w`.
    fn emission(&self, p: Point3<f32>, w: Vector3<f32>) -> Rgb;

    /// Extinction coefficient, `sigma_a + sigma_s`.
    fn sigma_t(&self, p: Point3<f32>, w: Vector3<f32>) -> Rgb {
        self.sigma_a(p, w) + self.sigma_s(p, w)
    }

    /// The Henyey-Greenstein asymmetry parameter, in `[-1, 1]`. `0.0` is
    /// isotropic scattering.
    fn asymmetry(&self) -> f32 {
        0.0
    }

    /// Phase function value for a ray arriving along `w_l` and leaving
    /// along `w_s`, both pointing away from the scattering point.
    fn phase(&self, w_l: Vector3<f32>, w_s: Vector3<f32>) -> f32 {
        henyey_greenstein(self.asymmetry(), w_l.dot(w_s))
    }

    /// Optical thickness `integral sigma_t ds` along the ray segment
    /// `[offset, offset + step]`, evaluated analytically or by stepping as
    /// the concrete region prefers.
    fn tau(&self, ray: &Ray, step: f32, offset: f32) -> Rgb;

    fn bounds(&self) -> Bounds3;

    /// Clip `ray` to this region's extent.
    fn cross_bound(&self, ray: &Ray) -> Option<(f32, f32)> {
        self.bounds().intersect_ray(ray)
    }
}

/// The Henyey-Greenstein phase function, normalized so its integral over
/// the sphere is `1`. `cos_theta` is the cosine of the angle between the
/// incoming and outgoing directions (both pointing away from the
/// scattering point).
pub fn henyey_greenstein(g: f32, cos_theta: f32) -> f32 {
    let k = 1.55 * g - 0.55 * g * g * g;
    let k_cos_theta = k * cos_theta;
    (1.0 / (4.0 * PI)) * (1.0 - k * k) / ((1.0 - k_cos_theta) * (1.0 - k_cos_theta))
}

pub(crate) fn exp_neg(c: Rgb) -> Rgb {
    Rgb::from_rgb((-c.r()).exp(), (-c.g()).exp(), (-c.b()).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{point3, vec3};

    #[test]
    fn isotropic_phase_is_uniform() {
        let forward = henyey_greenstein(0.0, 1.0);
        let backward = henyey_greenstein(0.0, -1.0);
        assert!((forward - backward).abs() < 1e-6);
        assert!((forward - 1.0 / (4.0 * PI)).abs() < 1e-6);
    }

    #[test]
    fn forward_scattering_favors_continuing_direction() {
        let forward = henyey_greenstein(0.8, 1.0);
        let backward = henyey_greenstein(0.8, -1.0);
        assert!(forward > backward);
    }

    #[test]
    fn bounds_clip_ray_to_box() {
        let bounds = Bounds3::new(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0));
        let ray = Ray::new(point3(-5.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), f32::INFINITY);
        let (t0, t1) = bounds.intersect_ray(&ray).unwrap();
        assert!((t0 - 4.0).abs() < 1e-5);
        assert!((t1 - 6.0).abs() < 1e-5);
    }

    #[test]
    fn bounds_miss_returns_none() {
        let bounds = Bounds3::new(point3(-1.0, -1.0, -1.0), point3(1.0, 1.0, 1.0));
        let ray = Ray::new(point3(-5.0, 5.0, 0.0), vec3(1.0, 0.0, 0.0), f32::INFINITY);
        assert!(bounds.intersect_ray(&ray).is_none());
    }
}
