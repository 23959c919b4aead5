mod bxdf;
mod dispersive;
mod fresnel;
pub mod geometry;
mod lambertian;
mod microfacet;
mod oren_nayar;
mod scale;

pub use bxdf::{Bxdf, BxdfType};
pub use dispersive::DispersiveSpecularTransmission;
pub use fresnel::{Fresnel, SpecularReflection, SpecularTransmission};
pub use lambertian::{LambertianReflection, LambertianTransmission};
pub use microfacet::{MicrofacetReflection, TrowbridgeReitzDistribution};
pub use oren_nayar::OrenNayarReflection;
pub use scale::ScaledBxdf;

use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use cgmath::{vec3, InnerSpace, Point2, Vector3};

/// The bidirectional scattering distribution function at a point on a
/// surface: an ordered collection of BxDF lobes evaluated in a local
/// shading coordinate frame built from the (possibly bump-perturbed)
/// shading geometry.
pub struct Bsdf {
    bxdfs: Vec<Box<dyn Bxdf>>,
    original_normal: Vector3<f32>,
    shading_normal: Vector3<f32>,
    shading_primary_tangent: Vector3<f32>,
    shading_secondary_tangent: Vector3<f32>,
}

impl Bsdf {
    pub fn new(interaction: &SurfaceInteraction) -> Self {
        let shading_primary_tangent = interaction.shading_geometry.dpdu.normalize();
        Self {
            bxdfs: vec![],
            original_normal: interaction.original_geometry.normal,
            shading_normal: interaction.shading_geometry.normal,
            shading_primary_tangent,
            shading_secondary_tangent: interaction.shading_geometry.normal.cross(shading_primary_tangent),
        }
    }

    pub fn add(&mut self, bxdf: Box<dyn Bxdf>) -> &mut Self {
        self.bxdfs.push(bxdf);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bxdfs.is_empty()
    }

    pub fn count_with_type(&self, ty: BxdfType) -> usize {
        self.bxdfs.iter().filter(|b| b.has_type(ty)).count()
    }

    pub fn transform_world_to_local(&self, v: &Vector3<f32>) -> Vector3<f32> {
        vec3(
            v.dot(self.shading_primary_tangent),
            v.dot(self.shading_secondary_tangent),
            v.dot(self.shading_normal),
        )
    }

    pub fn transform_local_to_world(&self, v: &Vector3<f32>) -> Vector3<f32> {
        vec3(
            self.shading_primary_tangent.x * v.x + self.shading_secondary_tangent.x * v.y + self.shading_normal.x * v.z,
            self.shading_primary_tangent.y * v.x + self.shading_secondary_tangent.y * v.y + self.shading_normal.y * v.z,
            self.shading_primary_tangent.z * v.x + self.shading_secondary_tangent.z * v.y + self.shading_normal.z * v.z,
        )
    }

    fn reflect_or_transmit(&self, wo_world: &Vector3<f32>, wi_world: &Vector3<f32>) -> BxdfType {
        if wi_world.dot(self.original_normal) * wo_world.dot(self.original_normal) > 0.0 {
            BxdfType::REFLECTION
        } else {
            BxdfType::TRANSMISSION
        }
    }

    pub fn f(&self, wo_world: &Vector3<f32>, wi_world: &Vector3<f32>, flags: BxdfType) -> Rgb {
        let wo = self.transform_world_to_local(wo_world);
        let wi = self.transform_world_to_local(wi_world);
        if wo.z == 0.0 {
            return Rgb::black();
        }
        let type_to_eval = flags | self.reflect_or_transmit(wo_world, wi_world);
        self.bxdfs
            .iter()
            .filter(|b| b.has_type(type_to_eval))
            .fold(Rgb::black(), |acc, b| acc + b.f(&wo, &wi))
    }

    /// Sample one of the BxDFs matching `flags` uniformly at random, draw an
    /// incident direction from it, and return `(wi_world, pdf, f, sampled_type)`
    /// averaged/summed over every matching lobe as pbrt-style aggregate BSDF
    /// sampling does.
    pub fn sample_f(
        &self,
        wo_world: &Vector3<f32>,
        u_lobe: f32,
        u_dir: Point2<f32>,
        flags: BxdfType,
    ) -> Option<(Vector3<f32>, f32, Rgb, BxdfType)> {
        let matching: Vec<&Box<dyn Bxdf>> = self.bxdfs.iter().filter(|b| b.has_type(flags)).collect();
        if matching.is_empty() {
            return None;
        }
        let count = matching.len();
        let index = ((u_lobe * count as f32) as usize).min(count - 1);
        let chosen = matching[index];

        let wo = self.transform_world_to_local(wo_world);
        if wo.z == 0.0 {
            return None;
        }
        let (wi, mut pdf, mut f) = chosen.sample_f(&wo, u_dir, flags);
        if pdf == 0.0 {
            return None;
        }
        let sampled_type = chosen.bxdf_type();
        let wi_world = self.transform_local_to_world(&wi);

        if !sampled_type.contains(BxdfType::SPECULAR) && count > 1 {
            for &other in &matching {
                if !std::ptr::eq(other.as_ref(), chosen.as_ref()) {
                    pdf += other.pdf(&wo, &wi);
                }
            }
            pdf /= count as f32;

            f = Rgb::black();
            let type_to_eval = flags | self.reflect_or_transmit(wo_world, &wi_world);
            for b in &matching {
                if b.has_type(type_to_eval) {
                    f += b.f(&wo, &wi);
                }
            }
        }

        Some((wi_world, pdf, f, sampled_type))
    }

    pub fn pdf(&self, wo_world: &Vector3<f32>, wi_world: &Vector3<f32>, flags: BxdfType) -> f32 {
        let matching: Vec<&Box<dyn Bxdf>> = self.bxdfs.iter().filter(|b| b.has_type(flags)).collect();
        if matching.is_empty() {
            return 0.0;
        }
        let wo = self.transform_world_to_local(wo_world);
        let wi = self.transform_world_to_local(wi_world);
        let sum: f32 = matching.iter().map(|b| b.pdf(&wo, &wi)).sum();
        sum / matching.len() as f32
    }

    pub fn rho_hd(&self, wo_world: &Vector3<f32>, samples: &[Point2<f32>], flags: BxdfType) -> Rgb {
        let wo = self.transform_world_to_local(wo_world);
        self.bxdfs
            .iter()
            .filter(|b| b.has_type(flags))
            .fold(Rgb::black(), |acc, b| acc + b.rho_hd(&wo, samples))
    }

    /// Wrap every lobe in a `ScaledBxdf`, attenuating everything this
    /// `Bsdf` returns by `scale`. Used by materials that compose another
    /// material's `Bsdf` wholesale (e.g. a painted-on mask).
    pub fn scaled(mut self, scale: Rgb) -> Self {
        self.bxdfs = self
            .bxdfs
            .into_iter()
            .map(|b| Box::new(ScaledBxdf::new(b, scale)) as Box<dyn Bxdf>)
            .collect();
        self
    }
}
