use crate::color::Rgb;
use bitflags::bitflags;
use cgmath::{Point2, Vector3};

bitflags! {
    /// Describes which of a BxDF's lobes are being queried or sampled.
    pub struct BxdfType: u8 {
        const REFLECTION = 0b0000_0001;
        const TRANSMISSION = 0b0000_0010;
        const DIFFUSE = 0b0000_0100;
        const GLOSSY = 0b0000_1000;
        const SPECULAR = 0b0001_0000;
        const ALL = Self::DIFFUSE.bits
            | Self::GLOSSY.bits
            | Self::SPECULAR.bits
            | Self::REFLECTION.bits
            | Self::TRANSMISSION.bits;
    }
}

/// A bidirectional reflectance/transmittance distribution function, or some
/// combination of the two. Vectors passed to every method here are already
/// in the local shading coordinate system (z axis = shading normal).
pub trait Bxdf: Send + Sync {
    fn bxdf_type(&self) -> BxdfType;

    fn has_type(&self, t: BxdfType) -> bool {
        self.bxdf_type() & t == self.bxdf_type()
    }

    /// The spectrum of light scattered toward `wo` due to light arriving
    /// from `wi`. Not meaningful for purely specular lobes — use
    /// `sample_f` for those.
    fn f(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> Rgb;

    /// Sample an incident direction given an outgoing direction, returning
    /// `(wi, pdf, f)`. The default implementation cosine-samples the
    /// hemisphere on the same side as `wo`, which is correct for any
    /// non-specular reflective lobe; specular and transmissive lobes
    /// override this.
    fn sample_f(
        &self,
        wo: &Vector3<f32>,
        sample: Point2<f32>,
        _sampled_type: BxdfType,
    ) -> (Vector3<f32>, f32, Rgb) {
        use super::geometry::{cosine_hemisphere_pdf, cosine_sample_hemisphere};
        let mut wi = cosine_sample_hemisphere(sample);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi);
        (wi, pdf, self.f(wo, &wi))
    }

    /// The probability density of `sample_f` having produced `wi` given
    /// `wo`. The default matches the default `sample_f`'s cosine-weighted
    /// hemisphere sampling.
    fn pdf(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> f32 {
        use super::geometry::{abs_cos_theta, cosine_hemisphere_pdf, same_hemisphere};
        if same_hemisphere(wo, wi) {
            cosine_hemisphere_pdf(abs_cos_theta(wi))
        } else {
            0.0
        }
    }

    /// Hemispherical-directional reflectance: total reflection toward `wo`
    /// under constant illumination, estimated via the given samples.
    fn rho_hd(&self, wo: &Vector3<f32>, samples: &[Point2<f32>]) -> Rgb {
        use super::geometry::abs_cos_theta;
        let mut sum = Rgb::black();
        for &u in samples {
            let (wi, pdf, f) = self.sample_f(wo, u, BxdfType::ALL);
            if pdf > 0.0 {
                sum += f * abs_cos_theta(&wi) / pdf;
            }
        }
        sum / samples.len().max(1) as f32
    }

    /// Hemispherical-hemispherical reflectance: fraction of incident light
    /// reflected under fully uniform illumination from every direction.
    fn rho_hh(&self, samples1: &[Point2<f32>], samples2: &[Point2<f32>]) -> Rgb {
        use super::geometry::{abs_cos_theta, cosine_sample_hemisphere};
        let mut sum = Rgb::black();
        for (&u1, &u2) in samples1.iter().zip(samples2) {
            let wo = cosine_sample_hemisphere(u1);
            let (wi, pdf, f) = self.sample_f(&wo, u2, BxdfType::ALL);
            if pdf > 0.0 {
                sum += f * abs_cos_theta(&wi) * abs_cos_theta(&wo) / pdf;
            }
        }
        sum / (std::f32::consts::PI * samples1.len().max(1) as f32)
    }
}
