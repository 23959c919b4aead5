mod faure;
mod halton;
mod mis;
mod pdf1d;

pub use halton::{low_discrepancy_sample, van_der_corput, Halton};
pub use mis::power_heuristic;
pub use pdf1d::Pdf1D;

pub use crate::bsdf::geometry::{concentric_sample_disk, cosine_sample_hemisphere};

use cgmath::{vec3, InnerSpace, Point2, Vector3};
use std::f32::consts::PI;

/// Uniformly sample a direction over the full sphere, used by infinite
/// lights and by the photon prepass when shooting photons from a light
/// with no better importance-sampling strategy.
pub fn uniform_sample_sphere(u: Point2<f32>) -> Vector3<f32> {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    vec3(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_sphere_pdf() -> f32 {
    1.0 / (4.0 * PI)
}

/// Uniformly sample a direction over the hemisphere around `(0, 0, 1)`,
/// used where a cosine-weighted distribution isn't appropriate (e.g.
/// ambient occlusion rays that should not double-weight by cosine).
pub fn uniform_sample_hemisphere(u: Point2<f32>) -> Vector3<f32> {
    let z = u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    vec3(r * phi.cos(), r * phi.sin(), z)
}

pub fn uniform_hemisphere_pdf() -> f32 {
    1.0 / (2.0 * PI)
}
