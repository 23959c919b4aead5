use super::fresnel::Fresnel;
use super::geometry::{abs_cos_theta, cos2_theta, cos_phi, same_hemisphere, sin2_theta, sin_phi, tan2_theta};
use super::{Bxdf, BxdfType};
use crate::color::Rgb;
use cgmath::{vec3, InnerSpace, Point2, Vector3};

/// Trowbridge-Reitz (GGX) microfacet distribution, used by the glossy BRDF
/// lobe. `alpha_x`/`alpha_y` control roughness along each shading-tangent
/// axis; equal values give an isotropic lobe.
pub struct TrowbridgeReitzDistribution {
    alpha_x: f32,
    alpha_y: f32,
}

impl TrowbridgeReitzDistribution {
    pub fn new(alpha_x: f32, alpha_y: f32) -> Self {
        Self {
            alpha_x: alpha_x.max(1e-3),
            alpha_y: alpha_y.max(1e-3),
        }
    }

    pub fn roughness_to_alpha(roughness: f32) -> f32 {
        let roughness = roughness.max(1e-3);
        let x = roughness.ln();
        1.62142
            + 0.819_955 * x
            + 0.1734 * x * x
            + 0.017_120_1 * x * x * x
            + 0.000_640_711 * x * x * x * x
    }

    fn d(&self, wh: &Vector3<f32>) -> f32 {
        let tan2 = tan2_theta(wh);
        if tan2.is_infinite() {
            return 0.0;
        }
        let cos4 = cos2_theta(wh) * cos2_theta(wh);
        let e = (cos_phi(wh) * cos_phi(wh) / (self.alpha_x * self.alpha_x)
            + sin_phi(wh) * sin_phi(wh) / (self.alpha_y * self.alpha_y))
            * tan2;
        1.0 / (std::f32::consts::PI * self.alpha_x * self.alpha_y * cos4 * (1.0 + e) * (1.0 + e))
    }

    fn lambda(&self, w: &Vector3<f32>) -> f32 {
        let abs_tan_theta = tan2_theta(w).sqrt().abs();
        if abs_tan_theta.is_infinite() {
            return 0.0;
        }
        let alpha = (cos_phi(w) * cos_phi(w) * self.alpha_x * self.alpha_x
            + sin_phi(w) * sin_phi(w) * self.alpha_y * self.alpha_y)
            .sqrt();
        let a = 1.0 / (alpha * abs_tan_theta);
        if a >= 1.6 {
            0.0
        } else {
            (1.0 - 1.259 * a + 0.396 * a * a) / (3.535 * a + 2.181 * a * a)
        }
    }

    fn g(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> f32 {
        1.0 / (1.0 + self.lambda(wo) + self.lambda(wi))
    }

    /// Sample a microfacet normal distributed according to `D`, via the
    /// standard (non visible-normal) Trowbridge-Reitz sampling scheme.
    fn sample_wh(&self, u: Point2<f32>) -> Vector3<f32> {
        let phi = 2.0 * std::f32::consts::PI * u.x;
        let (alpha, phi) = if (self.alpha_x - self.alpha_y).abs() < 1e-6 {
            (self.alpha_x, phi)
        } else {
            let phi = phi
                + (self.alpha_y / self.alpha_x * phi.tan())
                    .atan()
                    .copysign(phi - std::f32::consts::FRAC_PI_2);
            (self.alpha_x, phi)
        };
        let tan_theta2 = alpha * alpha * u.y / (1.0 - u.y).max(1e-7);
        let cos_theta = 1.0 / (1.0 + tan_theta2).sqrt();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        vec3(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
    }

    fn pdf(&self, wh: &Vector3<f32>) -> f32 {
        self.d(wh) * abs_cos_theta(wh)
    }
}

/// A glossy, physically based microfacet reflection BRDF (Cook-Torrance
/// form, Trowbridge-Reitz distribution with a Smith masking-shadowing
/// term), used where the spec calls for a "glossy" material branch.
pub struct MicrofacetReflection {
    r: Rgb,
    distribution: TrowbridgeReitzDistribution,
    fresnel: Fresnel,
}

impl MicrofacetReflection {
    pub fn new(r: Rgb, distribution: TrowbridgeReitzDistribution, fresnel: Fresnel) -> Self {
        Self { r, distribution, fresnel }
    }
}

impl Bxdf for MicrofacetReflection {
    fn bxdf_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::GLOSSY
    }

    fn f(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> Rgb {
        let cos_theta_o = abs_cos_theta(wo);
        let cos_theta_i = abs_cos_theta(wi);
        if cos_theta_i == 0.0 || cos_theta_o == 0.0 || !same_hemisphere(wo, wi) {
            return Rgb::black();
        }
        let mut wh = wi + wo;
        if wh.x == 0.0 && wh.y == 0.0 && wh.z == 0.0 {
            return Rgb::black();
        }
        wh = wh.normalize();
        let f = self.fresnel.evaluate(wi.dot(wh));
        self.r * self.distribution.d(&wh) * self.distribution.g(wo, wi) * f
            / (4.0 * cos_theta_i * cos_theta_o)
    }

    fn sample_f(&self, wo: &Vector3<f32>, sample: Point2<f32>, _sampled_type: BxdfType) -> (Vector3<f32>, f32, Rgb) {
        if wo.z == 0.0 {
            return (vec3(0.0, 0.0, 1.0), 0.0, Rgb::black());
        }
        let wh = self.distribution.sample_wh(sample);
        let wi = 2.0 * wo.dot(wh) * wh - wo;
        if !same_hemisphere(wo, &wi) {
            return (wi, 0.0, Rgb::black());
        }
        let pdf = self.distribution.pdf(&wh) / (4.0 * wo.dot(wh));
        (wi, pdf, self.f(wo, &wi))
    }

    fn pdf(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> f32 {
        if !same_hemisphere(wo, wi) {
            return 0.0;
        }
        let wh = (wo + wi).normalize();
        self.distribution.pdf(&wh) / (4.0 * wo.dot(wh))
    }
}
