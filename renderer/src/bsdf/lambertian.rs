use super::{Bxdf, BxdfType};
use crate::color::Rgb;
use cgmath::Vector3;
use std::f32::consts::FRAC_1_PI;

/// A BRDF modelling reflection off a perfectly diffuse (Lambertian)
/// surface: incident light scatters equally in every outgoing direction.
pub struct LambertianReflection {
    r: Rgb,
}

impl LambertianReflection {
    pub fn new(r: Rgb) -> Self {
        Self { r }
    }
}

impl Bxdf for LambertianReflection {
    fn bxdf_type(&self) -> BxdfType {
        BxdfType::DIFFUSE | BxdfType::REFLECTION
    }

    fn f(&self, _wo: &Vector3<f32>, _wi: &Vector3<f32>) -> Rgb {
        self.r * FRAC_1_PI
    }

    fn rho_hd(&self, _wo: &Vector3<f32>, _samples: &[cgmath::Point2<f32>]) -> Rgb {
        self.r
    }

    fn rho_hh(&self, _samples1: &[cgmath::Point2<f32>], _samples2: &[cgmath::Point2<f32>]) -> Rgb {
        self.r
    }
}

/// A BTDF modelling transmission through a perfectly diffuse surface.
pub struct LambertianTransmission {
    t: Rgb,
}

impl LambertianTransmission {
    pub fn new(t: Rgb) -> Self {
        Self { t }
    }
}

impl Bxdf for LambertianTransmission {
    fn bxdf_type(&self) -> BxdfType {
        BxdfType::DIFFUSE | BxdfType::TRANSMISSION
    }

    fn f(&self, _wo: &Vector3<f32>, _wi: &Vector3<f32>) -> Rgb {
        self.t * FRAC_1_PI
    }

    fn sample_f(
        &self,
        wo: &Vector3<f32>,
        sample: cgmath::Point2<f32>,
        _sampled_type: BxdfType,
    ) -> (Vector3<f32>, f32, Rgb) {
        use super::geometry::cosine_sample_hemisphere;
        let mut wi = cosine_sample_hemisphere(sample);
        // Transmission puts wi on the opposite side of wo.
        if wo.z > 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi);
        (wi, pdf, self.f(wo, &wi))
    }

    fn pdf(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> f32 {
        use super::geometry::{abs_cos_theta, cosine_hemisphere_pdf, same_hemisphere};
        if !same_hemisphere(wo, wi) {
            cosine_hemisphere_pdf(abs_cos_theta(wi))
        } else {
            0.0
        }
    }

    fn rho_hd(&self, _wo: &Vector3<f32>, _samples: &[cgmath::Point2<f32>]) -> Rgb {
        self.t
    }

    fn rho_hh(&self, _samples1: &[cgmath::Point2<f32>], _samples2: &[cgmath::Point2<f32>]) -> Rgb {
        self.t
    }
}
