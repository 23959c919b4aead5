use super::{exp_neg, VolumeRegion};
use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::light::LightFlags;
use crate::ray::Ray;
use crate::scene::Scene;
use cgmath::{vec3, EuclideanSpace, InnerSpace, Point2};
use rand::Rng;

/// A step point along a ray through a volume region, used as the shadow-ray
/// origin when sampling direct light at that point. Carries no surface
/// normal, since a volume has none; its offset is always zero.
fn step_interaction(point: cgmath::Point3<f32>, neg_ray_direction: cgmath::Vector3<f32>) -> SurfaceInteraction {
    SurfaceInteraction::new(
        point,
        vec3(0.0, 0.0, 0.0),
        neg_ray_direction,
        Point2::origin(),
        vec3(1.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        usize::MAX,
    )
}

/// Steps a ray through a volume region in `N` uniform intervals and
/// accumulates `transmittance * emission * step`, with no in-scattered
/// light from other sources. The cheapest of the volume integrators.
pub struct EmissionVolumeIntegrator {
    pub step_size: f32,
}

impl EmissionVolumeIntegrator {
    pub fn new(step_size: f32) -> Self {
        Self { step_size }
    }

    pub fn transmittance(&self, region: &dyn VolumeRegion, ray: &Ray) -> Rgb {
        exp_neg(region.tau(ray, self.step_size, 0.5))
    }

    /// Returns emitted radiance along the clipped segment and an alpha
    /// of `1.0` when the ray entered the region at all, `0.0` otherwise.
    pub fn integrate(&self, region: &dyn VolumeRegion, ray: &Ray, rng: &mut impl Rng) -> (Rgb, f32) {
        let Some((t0, t1)) = region.cross_bound(ray) else {
            return (Rgb::black(), 0.0);
        };
        let length = t1 - t0;
        if length <= 0.0 {
            return (Rgb::black(), 0.0);
        }
        let dir_length = ray.direction.magnitude();
        let n_steps = (length / self.step_size).ceil().max(1.0) as u32;
        let step = length / n_steps as f32;
        let offset: f32 = rng.gen();
        let mut t = t0 + offset * step;
        let mut lv = Rgb::black();
        let mut tr = Rgb::constant(1.0);
        for _ in 0..n_steps {
            let p = ray.at_t(t);
            let w = -ray.direction;
            let step_tau = region.sigma_t(p, w) * (step * dir_length);
            tr = tr * exp_neg(step_tau);
            lv = lv + tr * region.emission(p, w) * step;
            t += step;
        }
        (lv, 1.0)
    }
}

/// Like [`EmissionVolumeIntegrator`], but also gathers direct illumination
/// at every step: Dirac lights contribute `transmittance * L` when
/// unoccluded, area lights contribute an average over `n_area_samples`
/// cosine-weighted samples.
pub struct SingleScatterVolumeIntegrator {
    pub step_size: f32,
    /// When set, doubles the step size in regions where the accumulated
    /// density over a `step_size / 10` lookahead changes little, halving
    /// the step where it changes quickly.
    pub adaptive: bool,
    /// Reserved for a future attenuation-grid precomputation pass; unused
    /// until that optimization is implemented.
    pub optimize: bool,
    pub n_area_samples: u32,
}

impl SingleScatterVolumeIntegrator {
    pub fn new(step_size: f32) -> Self {
        Self { step_size, adaptive: false, optimize: false, n_area_samples: 4 }
    }

    pub fn transmittance(&self, region: &dyn VolumeRegion, ray: &Ray) -> Rgb {
        exp_neg(region.tau(ray, self.step_size, 0.5))
    }

    pub fn integrate(&self, scene: &Scene, region: &dyn VolumeRegion, ray: &Ray, rng: &mut impl Rng) -> (Rgb, f32) {
        let Some((t0, t1)) = region.cross_bound(ray) else {
            return (Rgb::black(), 0.0);
        };
        let length = t1 - t0;
        if length <= 0.0 {
            return (Rgb::black(), 0.0);
        }

        let adaptive_step_size = self.step_size * 100.0;
        let dir_length = ray.direction.magnitude();
        let offset: f32 = rng.gen();
        let mut t = t0 + offset * self.step_size;
        let mut lv = Rgb::black();
        let mut tr = Rgb::constant(1.0);
        let mut prev_density = 0.0f32;

        while t < t1 {
            let p = ray.at_t(t);
            let w = -ray.direction;
            let density = region.sigma_t(p, w).r();

            let step = if self.adaptive {
                let lookahead = self.step_size / 10.0;
                let ahead_density = region.sigma_t(ray.at_t((t + lookahead).min(t1)), w).r();
                if (ahead_density - density).abs() < 1e-3 * prev_density.max(1.0) {
                    adaptive_step_size
                } else {
                    self.step_size
                }
            } else {
                self.step_size
            };
            prev_density = density;

            let step_tau = region.sigma_t(p, w) * (step * dir_length);
            tr = tr * exp_neg(step_tau);

            lv = lv + tr * region.emission(p, w) * step;
            lv = lv + tr * self.in_scatter(scene, region, p, w, rng) * step;

            t += step;
        }

        (lv, 1.0)
    }

    /// Sum direct illumination arriving at a scattering point `p`,
    /// weighted by the medium's phase function and scattering
    /// coefficient, from every light in the scene.
    fn in_scatter(
        &self,
        scene: &Scene,
        region: &dyn VolumeRegion,
        p: cgmath::Point3<f32>,
        w_o: cgmath::Vector3<f32>,
        rng: &mut impl Rng,
    ) -> Rgb {
        let mut l = Rgb::black();
        let sigma_s = region.sigma_s(p, w_o);
        if sigma_s.is_black() {
            return l;
        }

        for light in &scene.lights {
            let interaction = step_interaction(p, w_o);
            if light.flags().is_delta() {
                let u = Point2::new(rng.gen(), rng.gen());
                let (li, wi, pdf, vis) = light.sample_li(&interaction, u);
                if pdf > 0.0 && !li.is_black() && vis.unoccluded(scene) {
                    let phase = region.phase(w_o, wi);
                    l = l + sigma_s * li * (phase / pdf);
                }
            } else if light.flags().contains(LightFlags::AREA) {
                let mut sum = Rgb::black();
                for _ in 0..self.n_area_samples {
                    let u = Point2::new(rng.gen(), rng.gen());
                    let (li, wi, pdf, vis) = light.sample_li(&interaction, u);
                    if pdf > 0.0 && !li.is_black() && vis.unoccluded(scene) {
                        let phase = region.phase(w_o, wi);
                        sum = sum + li * (phase / pdf);
                    }
                }
                l = l + sigma_s * sum * (1.0 / self.n_area_samples as f32);
            }
        }

        l
    }
}
