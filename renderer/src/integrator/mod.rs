mod bidirectional;
mod debug;
mod direct_lighting;
mod path;
mod photon_mapping;
mod sppm;

pub use bidirectional::BidirectionalIntegrator;
pub use debug::{DebugIntegrator, DebugMode};
pub use direct_lighting::DirectLightingIntegrator;
pub use path::PathTracingIntegrator;
pub use photon_mapping::PhotonMappingIntegrator;
pub use sppm::SppmIntegrator;

use crate::color::Rgb;
use crate::ray::Ray;
use crate::scene::Scene;
use rand::RngCore;

/// A surface-only lighting model evaluated once per camera sample: given
/// a ray, trace it through the scene and return the radiance carried back
/// along it, together with the sample's opacity (`0.0` for rays that
/// escape the scene entirely, `1.0` otherwise) so the film can composite
/// against a background.
///
/// `SppmIntegrator` does not implement this trait. Stochastic progressive
/// photon mapping needs per-pixel state that survives across an entire
/// sequence of eye and photon passes, which doesn't fit a stateless
/// per-sample call; the tiled driver drives it directly through its own
/// `trace_eye_pass`/`trace_photon_pass` methods instead.
pub trait SurfaceIntegrator: Send + Sync {
    fn li(&self, ray: &Ray, scene: &Scene, rng: &mut dyn RngCore, depth: u32) -> (Rgb, f32);
}
