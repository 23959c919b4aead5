use crate::interaction::OffsetRayOrigin;
use crate::scene::Scene;
use cgmath::Point3;

/// A deferred shadow-ray test between a reference point and a light sample,
/// built by `Light::sample_li` and resolved later so an integrator can
/// evaluate `f * li` before paying for the occlusion trace.
pub struct VisibilityTester {
    reference: Box<dyn OffsetRayOrigin>,
    light_point: Point3<f32>,
}

impl VisibilityTester {
    pub fn new(reference: Box<dyn OffsetRayOrigin>, light_point: Point3<f32>) -> Self {
        Self { reference, light_point }
    }

    /// Trace a shadow ray between the reference and the light point, and
    /// return `true` if there is an unoccluded path between the two.
    ///
    /// Ignores any scattering medium the ray passes through; volumetric
    /// beam transmittance is handled separately by the volume integrator.
    pub fn unoccluded(&self, scene: &Scene) -> bool {
        let ray = self.reference.spawn_shadow_ray_to_point(&self.light_point);
        !scene.is_occluded(&ray)
    }
}
