use super::SurfaceIntegrator;
use crate::color::Rgb;
use crate::ray::Ray;
use crate::scene::Scene;
use cgmath::InnerSpace;
use rand::RngCore;

/// What a `DebugIntegrator` visualizes at the first hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugMode {
    /// Shading normal, remapped from `[-1, 1]` to `[0, 1]`.
    ShadingNormal,
    /// A flat, unlit color per hit primitive's material index, so
    /// adjoining surfaces with different materials are easy to tell
    /// apart at a glance.
    MaterialIndex,
    /// Ray intersection count as a heatmap is not carried by this
    /// integrator alone; `Hits` just reports whether anything was hit.
    Hits,
}

/// A non-physical integrator for visualizing scene and sampling setup
/// without paying for lighting: shading normals, per-material flat
/// colors, or simple hit/miss. Never recurses.
pub struct DebugIntegrator {
    pub mode: DebugMode,
}

impl DebugIntegrator {
    pub fn new(mode: DebugMode) -> Self {
        Self { mode }
    }
}

impl SurfaceIntegrator for DebugIntegrator {
    fn li(&self, ray: &Ray, scene: &Scene, _rng: &mut dyn RngCore, _depth: u32) -> (Rgb, f32) {
        let hit = match scene.ray_intersection(ray) {
            Some(h) => h,
            None => return (Rgb::black(), 0.0),
        };
        let (_, primitive, interaction) = hit;
        let color = match self.mode {
            DebugMode::ShadingNormal => {
                let n = interaction.shading_geometry.normal.normalize();
                Rgb::from_rgb(n.x * 0.5 + 0.5, n.y * 0.5 + 0.5, n.z * 0.5 + 0.5)
            }
            DebugMode::MaterialIndex => material_index_color(primitive.material_index),
            DebugMode::Hits => Rgb::constant(1.0),
        };
        (color, 1.0)
    }
}

/// A cheap, deterministic hash-to-hue so a material index always maps to
/// the same color across a render, without a real palette table.
fn material_index_color(index: usize) -> Rgb {
    let h = (index.wrapping_mul(2654435761) >> 8) as u32;
    let r = (h & 0xff) as f32 / 255.0;
    let g = ((h >> 8) & 0xff) as f32 / 255.0;
    let b = ((h >> 16) & 0xff) as f32 / 255.0;
    Rgb::from_rgb(r, g, b)
}
