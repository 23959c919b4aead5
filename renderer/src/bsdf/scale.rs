use super::{Bxdf, BxdfType};
use crate::color::Rgb;
use cgmath::{Point2, Vector3};

/// Wraps another `Bxdf`, scaling everything it returns. Used by materials
/// that mix several lobes (e.g. a fraction specular, a fraction diffuse)
/// without each lobe needing to know about the mix weight.
pub struct ScaledBxdf {
    bxdf: Box<dyn Bxdf>,
    scale: Rgb,
}

impl ScaledBxdf {
    pub fn new(bxdf: Box<dyn Bxdf>, scale: Rgb) -> Self {
        Self { bxdf, scale }
    }
}

impl Bxdf for ScaledBxdf {
    fn bxdf_type(&self) -> BxdfType {
        self.bxdf.bxdf_type()
    }

    fn f(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> Rgb {
        self.scale * self.bxdf.f(wo, wi)
    }

    fn sample_f(&self, wo: &Vector3<f32>, sample: Point2<f32>, sampled_type: BxdfType) -> (Vector3<f32>, f32, Rgb) {
        let (wi, pdf, f) = self.bxdf.sample_f(wo, sample, sampled_type);
        (wi, pdf, self.scale * f)
    }

    fn pdf(&self, wo: &Vector3<f32>, wi: &Vector3<f32>) -> f32 {
        self.bxdf.pdf(wo, wi)
    }

    fn rho_hd(&self, wo: &Vector3<f32>, samples: &[Point2<f32>]) -> Rgb {
        self.scale * self.bxdf.rho_hd(wo, samples)
    }

    fn rho_hh(&self, samples1: &[Point2<f32>], samples2: &[Point2<f32>]) -> Rgb {
        self.scale * self.bxdf.rho_hh(samples1, samples2)
    }
}
