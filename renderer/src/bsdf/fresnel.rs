use super::geometry::{abs_cos_theta, cos_theta, face_forward, reflect, refract};
use super::{Bxdf, BxdfType};
use crate::color::Rgb;
use crate::TransportMode;
use cgmath::{vec3, Point2, Vector3};

/// The Fresnel behaviour at the boundary between two media.
pub enum Fresnel {
    Dielectric { eta_i: f32, eta_t: f32 },
    Conductor { eta_i: Rgb, eta_t: Rgb, k: Rgb },
}

impl Fresnel {
    pub fn evaluate(&self, cos_theta_i: f32) -> Rgb {
        match self {
            Fresnel::Dielectric { eta_i, eta_t } => {
                Rgb::constant(fresnel_dielectric(cos_theta_i, *eta_i, *eta_t))
            }
            Fresnel::Conductor { eta_i, eta_t, k } => fresnel_conductor(cos_theta_i, eta_i, eta_t, k),
        }
    }
}

pub fn fresnel_dielectric(cos_theta_i: f32, eta_i: f32, eta_t: f32) -> f32 {
    let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);
    let entering = cos_theta_i > 0.0;
    let (eta_i, eta_t) = if entering { (eta_i, eta_t) } else { (eta_t, eta_i) };
    let cos_theta_i = cos_theta_i.abs();

    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;
    if sin_theta_t >= 1.0 {
        return 1.0;
    }
    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();

    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t)) / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t)) / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

fn fresnel_conductor(cos_theta_i: f32, eta_i: &Rgb, eta_t: &Rgb, k: &Rgb) -> Rgb {
    let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);
    let eta = eta_t / eta_i;
    let eta_k = k / eta_i;

    let cos_theta_i2 = cos_theta_i * cos_theta_i;
    let sin_theta_i2 = 1.0 - cos_theta_i2;
    let eta2 = eta * eta;
    let eta_k2 = eta_k * eta_k;

    let t0 = eta2 - eta_k2 - Rgb::constant(sin_theta_i2);
    let a2_plus_b2 = (t0 * t0 + 4.0 * eta2 * eta_k2).sqrt();
    let t1 = a2_plus_b2 + Rgb::constant(cos_theta_i2);
    let a = (0.5 * (a2_plus_b2 + t0)).sqrt();
    let t2 = Rgb::constant(2.0 * cos_theta_i) * a;
    let rs = (t1 - t2) / (t1 + t2);

    let sin_theta_i4 = sin_theta_i2 * sin_theta_i2;
    let t3 = (cos_theta_i2 * a2_plus_b2) + Rgb::constant(sin_theta_i4);
    let t4 = t2 * sin_theta_i2;
    let rp = rs * (t3 - t4) / (t3 + t4);

    0.5 * (rp + rs)
}

/// A perfectly specular mirror BRDF.
pub struct SpecularReflection {
    r: Rgb,
    fresnel: Fresnel,
}

impl SpecularReflection {
    pub fn dielectric(r: Rgb, eta_i: f32, eta_t: f32) -> Self {
        Self { r, fresnel: Fresnel::Dielectric { eta_i, eta_t } }
    }

    pub fn conductor(r: Rgb, eta_i: Rgb, eta_t: Rgb, k: Rgb) -> Self {
        Self { r, fresnel: Fresnel::Conductor { eta_i, eta_t, k } }
    }
}

impl Bxdf for SpecularReflection {
    fn bxdf_type(&self) -> BxdfType {
        BxdfType::REFLECTION | BxdfType::SPECULAR
    }

    fn f(&self, _wo: &Vector3<f32>, _wi: &Vector3<f32>) -> Rgb {
        Rgb::black()
    }

    fn sample_f(&self, wo: &Vector3<f32>, _sample: Point2<f32>, _sampled_type: BxdfType) -> (Vector3<f32>, f32, Rgb) {
        let wi = reflect(wo);
        let pdf = 1.0;
        let f = self.fresnel.evaluate(cos_theta(&wi)) * self.r / abs_cos_theta(&wi);
        (wi, pdf, f)
    }

    fn pdf(&self, _wo: &Vector3<f32>, _wi: &Vector3<f32>) -> f32 {
        0.0
    }
}

/// A perfectly specular dielectric BTDF (clear glass, water, etc.).
pub struct SpecularTransmission {
    eta_above: f32,
    eta_below: f32,
    t: Rgb,
    transport_mode: TransportMode,
    fresnel: Fresnel,
}

impl SpecularTransmission {
    pub fn new(eta_above: f32, eta_below: f32, t: Rgb, transport_mode: TransportMode) -> Self {
        Self {
            eta_above,
            eta_below,
            t,
            transport_mode,
            fresnel: Fresnel::Dielectric { eta_i: eta_above, eta_t: eta_below },
        }
    }
}

impl Bxdf for SpecularTransmission {
    fn bxdf_type(&self) -> BxdfType {
        BxdfType::TRANSMISSION | BxdfType::SPECULAR
    }

    fn f(&self, _wo: &Vector3<f32>, _wi: &Vector3<f32>) -> Rgb {
        Rgb::black()
    }

    fn sample_f(&self, wo: &Vector3<f32>, _sample: Point2<f32>, _sampled_type: BxdfType) -> (Vector3<f32>, f32, Rgb) {
        let entering = cos_theta(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.eta_above, self.eta_below)
        } else {
            (self.eta_below, self.eta_above)
        };

        match refract(wo, &face_forward(vec3(0.0, 0.0, 1.0), *wo), eta_i / eta_t) {
            Some(wi) => {
                let pdf = 1.0;
                let mut ft = self.t * (Rgb::constant(1.0) - self.fresnel.evaluate(cos_theta(&wi)));
                if self.transport_mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                (wi, pdf, ft / abs_cos_theta(&wi))
            }
            None => (reflect(wo), 1.0, Rgb::black()),
        }
    }

    fn pdf(&self, _wo: &Vector3<f32>, _wi: &Vector3<f32>) -> f32 {
        0.0
    }
}
