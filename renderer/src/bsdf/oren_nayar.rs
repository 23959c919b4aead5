use super::geometry::{abs_cos_theta, cos_phi, sin_phi, sin_theta, tan_theta};
use super::{Bxdf, BxdfType};
use crate::color::Rgb;
use cgmath::Vector3;
use std::f32::consts::FRAC_1_PI;

/// A microfacet-derived diffuse BRDF that accounts for the roughness of a
/// surface made up of perfectly-diffuse microfacets, reproducing retro-
/// reflective darkening near grazing angles that Lambertian shading misses.
pub struct OrenNayarReflection {
    r: Rgb,
    a: f32,
    b: f32,
}

impl OrenNayarReflection {
    /// `sigma` is the standard deviation, in degrees, of the microfacet
    /// orientation angle.
    pub fn new(r: Rgb, sigma_degrees: f32) -> Self {
        let sigma = sigma_degrees.to_radians();
        let sigma2 = sigma * sigma;
        let a = 1.0 - (sigma2 / (2.0 * (sigma2 + 0.33)));
        let b = 0.45 * sigma2 / (sigma2 + 0.09);
        Self { r, a, b }
    }
}

impl Bxdf for OrenNayarReflection {
    fn bxdf_type(&self) -> BxdfType {
        BxdfType::DIFFUSE | BxdfType::REFLECTION
    }

    fn f(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> Rgb {
        let sin_theta_i = sin_theta(wi);
        let sin_theta_o = sin_theta(wo);

        let max_cos = if sin_theta_i > 1e-4 && sin_theta_o > 1e-4 {
            let sin_phi_i = sin_phi(wi);
            let cos_phi_i = cos_phi(wi);
            let sin_phi_o = sin_phi(wo);
            let cos_phi_o = cos_phi(wo);
            (cos_phi_i * cos_phi_o + sin_phi_i * sin_phi_o).max(0.0)
        } else {
            0.0
        };

        let (sin_alpha, tan_beta) = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            (sin_theta_o, sin_theta_i / abs_cos_theta(wi))
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta(wo))
        };

        self.r * FRAC_1_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn reduces_to_roughly_lambertian_at_zero_roughness() {
        let on = OrenNayarReflection::new(Rgb::constant(1.0), 0.0);
        let wo = vec3(0.0, 0.0, 1.0);
        let wi = vec3(0.0, 0.0, 1.0);
        let f = on.f(&wo, &wi);
        assert!((f.r() - FRAC_1_PI).abs() < 1e-3);
    }
}
