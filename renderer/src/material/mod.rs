use crate::bsdf::{
    Bsdf, DispersiveSpecularTransmission, Fresnel, LambertianReflection, MicrofacetReflection,
    OrenNayarReflection, SpecularReflection, SpecularTransmission, TrowbridgeReitzDistribution,
};
use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::TransportMode;

/// Describes the material properties of a surface. For any given point on a
/// surface, a material can return a bidirectional scattering distribution
/// function (BSDF) for that point.
///
/// The three flag methods let the recursive Monte-Carlo core decide which
/// branch to take (direct lighting with MIS, dispersion, glossy, mirror,
/// or plain diffuse) without downcasting the material.
pub trait Material: Send + Sync {
    /// Determine the reflective properties at the given surface interaction
    /// point and return the bidirectional scattering distribution function
    /// (BSDF) for that point.
    fn scattering_functions(&self, interaction: &SurfaceInteraction, transport_mode: TransportMode) -> Bsdf;

    /// Whether this material's transmissive lobe disperses by wavelength
    /// (prism/rainbow effects), requiring the caller to carry a hero
    /// wavelength through the recursive trace.
    fn is_dispersive(&self) -> bool {
        false
    }

    /// Whether light can pass through this material at all.
    fn is_transmissive(&self) -> bool {
        false
    }

    /// Whether the surface convention is inverted and the usual cosine
    /// falloff term should be skipped, e.g. a hair or leaf material.
    fn is_flat(&self) -> bool {
        false
    }
}

/// A purely diffuse surface. `sigma == 0.0` collapses to an exact
/// Lambertian lobe; any other value uses the rougher Oren-Nayar model.
pub struct MatteMaterial {
    kd: Rgb,
    sigma: f32,
}

impl MatteMaterial {
    pub fn new(kd: Rgb, sigma: f32) -> Self {
        Self { kd, sigma }
    }
}

impl Material for MatteMaterial {
    fn scattering_functions(&self, interaction: &SurfaceInteraction, _transport_mode: TransportMode) -> Bsdf {
        let mut bsdf = Bsdf::new(interaction);
        if self.sigma == 0.0 {
            bsdf.add(Box::new(LambertianReflection::new(self.kd)));
        } else {
            bsdf.add(Box::new(OrenNayarReflection::new(self.kd, self.sigma)));
        }
        bsdf
    }
}

/// A perfect mirror.
pub struct MirrorMaterial {
    kr: Rgb,
}

impl MirrorMaterial {
    pub fn new(kr: Rgb) -> Self {
        Self { kr }
    }
}

impl Material for MirrorMaterial {
    fn scattering_functions(&self, interaction: &SurfaceInteraction, _transport_mode: TransportMode) -> Bsdf {
        let mut bsdf = Bsdf::new(interaction);
        if !self.kr.is_black() {
            bsdf.add(Box::new(SpecularReflection::dielectric(self.kr, 1.0, 1.5)));
        }
        bsdf
    }
}

/// Smooth, clear dielectric glass: pure Fresnel-weighted reflection and
/// refraction, no roughness. Set `cauchy_b` to `0.0` to disable dispersion.
pub struct GlassMaterial {
    kr: Rgb,
    kt: Rgb,
    eta: f32,
    cauchy_b: f32,
}

impl GlassMaterial {
    pub fn new(kr: Rgb, kt: Rgb, eta: f32) -> Self {
        Self { kr, kt, eta, cauchy_b: 0.0 }
    }

    pub fn with_dispersion(mut self, cauchy_b: f32) -> Self {
        self.cauchy_b = cauchy_b;
        self
    }
}

impl Material for GlassMaterial {
    fn scattering_functions(&self, interaction: &SurfaceInteraction, transport_mode: TransportMode) -> Bsdf {
        let mut bsdf = Bsdf::new(interaction);
        if self.kr.is_black() && self.kt.is_black() {
            return bsdf;
        }
        if !self.kr.is_black() {
            bsdf.add(Box::new(SpecularReflection::dielectric(self.kr, 1.0, self.eta)));
        }
        if !self.kt.is_black() {
            if self.cauchy_b > 0.0 {
                let cauchy_a = self.eta - self.cauchy_b / (0.5893 * 0.5893);
                bsdf.add(Box::new(DispersiveSpecularTransmission::new(cauchy_a, self.cauchy_b, self.kt)));
            } else {
                bsdf.add(Box::new(SpecularTransmission::new(1.0, self.eta, self.kt, transport_mode)));
            }
        }
        bsdf
    }

    fn is_dispersive(&self) -> bool {
        self.cauchy_b > 0.0
    }

    fn is_transmissive(&self) -> bool {
        !self.kt.is_black()
    }
}

/// A diffuse base coated with a glossy microfacet specular lobe, the
/// generic "plastic" look: matte color showing through a rough clearcoat.
pub struct PlasticMaterial {
    kd: Rgb,
    ks: Rgb,
    roughness: f32,
    remap_roughness: bool,
}

impl PlasticMaterial {
    pub fn new(kd: Rgb, ks: Rgb, roughness: f32, remap_roughness: bool) -> Self {
        Self { kd, ks, roughness, remap_roughness }
    }
}

impl Material for PlasticMaterial {
    fn scattering_functions(&self, interaction: &SurfaceInteraction, _transport_mode: TransportMode) -> Bsdf {
        let mut bsdf = Bsdf::new(interaction);
        if !self.kd.is_black() {
            bsdf.add(Box::new(LambertianReflection::new(self.kd)));
        }
        if !self.ks.is_black() {
            let rough = if self.remap_roughness {
                TrowbridgeReitzDistribution::roughness_to_alpha(self.roughness)
            } else {
                self.roughness
            };
            let distribution = TrowbridgeReitzDistribution::new(rough, rough);
            let fresnel = Fresnel::Dielectric { eta_i: 1.0, eta_t: 1.5 };
            bsdf.add(Box::new(MicrofacetReflection::new(self.ks, distribution, fresnel)));
        }
        bsdf
    }
}

/// A rough metal: a single microfacet lobe with a conductor Fresnel term,
/// tinted and attenuated by the complex index of refraction `(eta, k)`.
pub struct MetalMaterial {
    eta: Rgb,
    k: Rgb,
    roughness: f32,
    remap_roughness: bool,
}

impl MetalMaterial {
    pub fn new(eta: Rgb, k: Rgb, roughness: f32, remap_roughness: bool) -> Self {
        Self { eta, k, roughness, remap_roughness }
    }
}

impl Material for MetalMaterial {
    fn scattering_functions(&self, interaction: &SurfaceInteraction, _transport_mode: TransportMode) -> Bsdf {
        let mut bsdf = Bsdf::new(interaction);
        let rough = if self.remap_roughness {
            TrowbridgeReitzDistribution::roughness_to_alpha(self.roughness)
        } else {
            self.roughness
        };
        let distribution = TrowbridgeReitzDistribution::new(rough, rough);
        let fresnel = Fresnel::Conductor { eta_i: Rgb::constant(1.0), eta_t: self.eta, k: self.k };
        bsdf.add(Box::new(MicrofacetReflection::new(Rgb::constant(1.0), distribution, fresnel)));
        bsdf
    }
}

/// Wraps another material and attenuates everything its `Bsdf` returns,
/// used for painted-on textures and masks without every `Bxdf` needing to
/// know about the attenuation.
pub struct ScaledMaterial {
    inner: Box<dyn Material>,
    scale: Rgb,
}

impl ScaledMaterial {
    pub fn new(inner: Box<dyn Material>, scale: Rgb) -> Self {
        Self { inner, scale }
    }
}

impl Material for ScaledMaterial {
    fn scattering_functions(&self, interaction: &SurfaceInteraction, transport_mode: TransportMode) -> Bsdf {
        let inner = self.inner.scattering_functions(interaction, transport_mode);
        inner.scaled(self.scale)
    }

    fn is_dispersive(&self) -> bool {
        self.inner.is_dispersive()
    }

    fn is_transmissive(&self) -> bool {
        self.inner.is_transmissive()
    }

    fn is_flat(&self) -> bool {
        self.inner.is_flat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::SurfaceGeometry;
    use cgmath::{point2, vec3, Point3};

    fn flat_interaction() -> SurfaceInteraction {
        SurfaceInteraction::new(
            Point3::new(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            point2(0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            0,
        )
    }

    #[test]
    fn matte_material_adds_a_single_lobe() {
        let m = MatteMaterial::new(Rgb::constant(0.5), 0.0);
        let bsdf = m.scattering_functions(&flat_interaction(), TransportMode::Radiance);
        assert!(!bsdf.is_empty());
    }

    #[test]
    fn black_reflectance_mirror_has_no_lobes() {
        let m = MirrorMaterial::new(Rgb::black());
        let bsdf = m.scattering_functions(&flat_interaction(), TransportMode::Radiance);
        assert!(bsdf.is_empty());
    }

    #[test]
    fn glass_with_dispersion_reports_dispersive() {
        let m = GlassMaterial::new(Rgb::constant(0.1), Rgb::constant(0.9), 1.5).with_dispersion(0.008);
        assert!(m.is_dispersive());
        assert!(m.is_transmissive());
    }
}
