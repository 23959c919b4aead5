//! Geometric helpers for shading-space BxDF math. All functions here assume
//! their vector arguments are already expressed in the local shading
//! coordinate system, where the z axis is the shading normal.

use cgmath::{vec3, InnerSpace, Vector3};

pub fn cos_theta(w: &Vector3<f32>) -> f32 {
    w.z
}

pub fn cos2_theta(w: &Vector3<f32>) -> f32 {
    w.z * w.z
}

pub fn abs_cos_theta(w: &Vector3<f32>) -> f32 {
    w.z.abs()
}

pub fn sin2_theta(w: &Vector3<f32>) -> f32 {
    (1.0 - cos2_theta(w)).max(0.0)
}

pub fn sin_theta(w: &Vector3<f32>) -> f32 {
    sin2_theta(w).sqrt()
}

pub fn tan_theta(w: &Vector3<f32>) -> f32 {
    sin_theta(w) / cos_theta(w)
}

pub fn tan2_theta(w: &Vector3<f32>) -> f32 {
    sin2_theta(w) / cos2_theta(w)
}

pub fn cos_phi(w: &Vector3<f32>) -> f32 {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        1.0
    } else {
        (w.x / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn sin_phi(w: &Vector3<f32>) -> f32 {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        0.0
    } else {
        (w.y / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn same_hemisphere(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
    a.z * b.z > 0.0
}

/// Reflect `w` about the shading normal (the z axis).
pub fn reflect(w: &Vector3<f32>) -> Vector3<f32> {
    vec3(-w.x, -w.y, w.z)
}

/// Compute the refracted direction for an incident direction `wi`, or
/// `None` if total internal reflection occurs.
///
/// `n` must lie in the same hemisphere as `wi`. `eta` is the ratio of the
/// incident medium's IOR to the transmitted medium's IOR.
pub fn refract(wi: &Vector3<f32>, n: &Vector3<f32>, eta: f32) -> Option<Vector3<f32>> {
    let cos_theta_i = n.dot(*wi);
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = eta * eta * sin2_theta_i;
    if sin2_theta_t >= 1.0 {
        return None;
    }
    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(eta * -1.0 * wi + (eta * cos_theta_i - cos_theta_t) * n)
}

/// Flip `v` so that it lies in the same hemisphere as `n`.
pub fn face_forward(v: Vector3<f32>, n: Vector3<f32>) -> Vector3<f32> {
    if v.dot(n) < 0.0 {
        -v
    } else {
        v
    }
}

/// Sample a direction from a cosine-weighted distribution over the
/// hemisphere around the z axis, via Malley's concentric-disk method.
pub fn cosine_sample_hemisphere(u: cgmath::Point2<f32>) -> Vector3<f32> {
    let d = concentric_sample_disk(u);
    let z = (1.0 - d.x * d.x - d.y * d.y).max(0.0).sqrt();
    vec3(d.x, d.y, z)
}

pub fn cosine_hemisphere_pdf(cos_theta: f32) -> f32 {
    cos_theta * std::f32::consts::FRAC_1_PI
}

pub fn concentric_sample_disk(u: cgmath::Point2<f32>) -> cgmath::Point2<f32> {
    use std::f32::consts::FRAC_PI_4;
    use std::f32::consts::FRAC_PI_2;
    let offset = cgmath::Point2::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0);
    if offset.x == 0.0 && offset.y == 0.0 {
        return cgmath::Point2::new(0.0, 0.0);
    }
    let (theta, r) = if offset.x.abs() > offset.y.abs() {
        (FRAC_PI_4 * (offset.y / offset.x), offset.x)
    } else {
        (FRAC_PI_2 - FRAC_PI_4 * (offset.x / offset.y), offset.y)
    };
    cgmath::Point2::new(r * theta.cos(), r * theta.sin())
}
