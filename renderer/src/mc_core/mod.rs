//! The Monte-Carlo surface core shared by every surface integrator: direct
//! lighting with multiple importance sampling, and ambient occlusion. Path
//! tracing, photon density estimation, and bidirectional connections are
//! built on top of these primitives rather than duplicating them.

use crate::bsdf::{Bsdf, BxdfType};
use crate::color::Rgb;
use crate::interaction::{OffsetRayOrigin, SurfaceInteraction};
use crate::light::{Light, LightFlags};
use crate::primitive::Primitive;
use crate::sampling::{cosine_sample_hemisphere, power_heuristic};
use crate::scene::Scene;
use crate::TransportMode;
use cgmath::{InnerSpace, Point2, Vector3};
use rand::Rng;

/// Sum direct lighting contributions from every light in the scene, each
/// weighted by MIS against the material's own sampling strategy for
/// non-delta lights.
pub fn estimate_all_direct_light(
    scene: &Scene,
    interaction: &SurfaceInteraction,
    bsdf: &Bsdf,
    wo: Vector3<f32>,
    is_flat: bool,
    rng: &mut impl Rng,
) -> Rgb {
    let mut l = Rgb::black();
    for light in &scene.lights {
        l = l + estimate_direct_light(scene, interaction, bsdf, wo, is_flat, light, rng);
    }
    l
}

/// Estimate direct lighting from a single, uniformly chosen light, scaled
/// by the light count so the result remains an unbiased estimator of the
/// full sum.
pub fn estimate_one_direct_light(
    scene: &Scene,
    interaction: &SurfaceInteraction,
    bsdf: &Bsdf,
    wo: Vector3<f32>,
    is_flat: bool,
    rng: &mut impl Rng,
) -> Rgb {
    let n = scene.lights.len();
    if n == 0 {
        return Rgb::black();
    }
    let index = (rng.gen::<f32>() * n as f32) as usize;
    let index = index.min(n - 1);
    let light = &scene.lights[index];
    estimate_direct_light(scene, interaction, bsdf, wo, is_flat, light, rng) * n as f32
}

/// Estimate direct lighting from a single light, combining a light-sampling
/// strategy with a BSDF-sampling strategy via the power heuristic. Delta
/// lights skip the BSDF-sampling strategy entirely, since they can never be
/// hit by sampling an outgoing direction.
fn estimate_direct_light(
    scene: &Scene,
    interaction: &SurfaceInteraction,
    bsdf: &Bsdf,
    wo: Vector3<f32>,
    is_flat: bool,
    light: &Light,
    rng: &mut impl Rng,
) -> Rgb {
    let mut l = Rgb::black();
    let n = interaction.shading_geometry.normal;
    let is_delta = light.flags().is_delta();

    // Light-sampling strategy.
    let u_light = Point2::new(rng.gen(), rng.gen());
    let (li, wi, light_pdf, visibility) = light.sample_li(interaction, u_light);
    if light_pdf > 0.0 && !li.is_black() {
        let f = bsdf.f(&wo, &wi, BxdfType::ALL) * cosine_factor(n, wi, is_flat);
        if !f.is_black() && visibility.unoccluded(scene) {
            if is_delta {
                l = l + f * li / light_pdf;
            } else {
                let scattering_pdf = bsdf.pdf(&wo, &wi, BxdfType::ALL);
                let weight = power_heuristic(1, light_pdf, 1, scattering_pdf);
                l = l + f * li * (weight / light_pdf);
            }
        }
    }

    // BSDF-sampling strategy, skipped for delta lights since a sampled
    // direction can never land on one.
    if !is_delta {
        if let Some((wi, scattering_pdf, f, sampled_type)) =
            bsdf.sample_f(&wo, rng.gen(), Point2::new(rng.gen(), rng.gen()), BxdfType::ALL)
        {
            let f = f * cosine_factor(n, wi, is_flat);
            if !f.is_black() && scattering_pdf > 0.0 {
                let light_pdf = light.pdf_li(interaction, wi);
                if light_pdf > 0.0 {
                    let weight = if sampled_type.contains(BxdfType::SPECULAR) {
                        1.0
                    } else {
                        power_heuristic(1, scattering_pdf, 1, light_pdf)
                    };
                    let li = light_along_ray(scene, interaction, wi, light);
                    if !li.is_black() {
                        l = l + f * li * (weight / scattering_pdf);
                    }
                }
            }
        }
    }

    l
}

fn cosine_factor(n: Vector3<f32>, wi: Vector3<f32>, is_flat: bool) -> f32 {
    if is_flat {
        1.0
    } else {
        wi.dot(n).abs()
    }
}

/// Radiance arriving from `light` along direction `wi`, used by the
/// BSDF-sampling strategy to find out what the light actually contributes
/// once a direction has been sampled. Only meaningful for area and
/// infinite lights, which can be intersected; delta lights never reach
/// this path.
fn light_along_ray(scene: &Scene, interaction: &SurfaceInteraction, wi: Vector3<f32>, light: &Light) -> Rgb {
    use crate::interaction::OffsetRayOrigin;
    let ray = interaction.spawn_ray(&wi);
    let flags = light.flags();
    if flags.contains(LightFlags::AREA) {
        match scene.ray_intersection(&ray) {
            Some((_, primitive, hit)) => match primitive.area_light_index {
                Some(idx) if std::ptr::eq(&scene.lights[idx], light) => area_light_radiance(light, &hit, -wi),
                _ => Rgb::black(),
            },
            None => Rgb::black(),
        }
    } else if flags.contains(LightFlags::INFINITE) {
        if scene.is_occluded(&ray) {
            Rgb::black()
        } else {
            light.le(&ray)
        }
    } else {
        Rgb::black()
    }
}

fn area_light_radiance(light: &Light, hit: &SurfaceInteraction, w: Vector3<f32>) -> Rgb {
    match light {
        Light::Area(area) => area.l(hit.shading_geometry.normal, w),
        _ => Rgb::black(),
    }
}

/// Radiance emitted by `primitive` toward `w`, if it is an area light;
/// black otherwise. Used by every integrator that hits a light directly
/// (a camera ray, or the last vertex of a path) and needs to add its
/// emission once, without double-counting what `estimate_direct_light`
/// already gathered via light sampling.
pub fn emitted_radiance(scene: &Scene, primitive: &Primitive, hit: &SurfaceInteraction, w: Vector3<f32>) -> Rgb {
    match primitive.area_light_index {
        Some(idx) => area_light_radiance(&scene.lights[idx], hit, w),
        None => Rgb::black(),
    }
}

/// Follow a chain of purely specular bounces (mirrors, smooth glass)
/// starting at `hit`, adding direct light and emission at each bounce
/// weighted by the accumulated specular throughput, until a non-specular
/// lobe is sampled, the ray escapes, or `max_depth` is reached.
///
/// This gives integrators that do not themselves walk a full stochastic
/// path (direct lighting, photon density estimates) perfect mirror and
/// glass reflections without duplicating a general path tracer.
pub fn specular_chain(
    scene: &Scene,
    hit: &SurfaceInteraction,
    bsdf: &Bsdf,
    wo: Vector3<f32>,
    max_depth: u32,
    rng: &mut impl Rng,
) -> Rgb {
    let mut l = Rgb::black();
    let mut throughput = Rgb::constant(1.0);
    let mut interaction = *hit;
    let mut owned_bsdf: Option<Bsdf> = None;
    let mut wo = wo;

    for bounce in 0..max_depth {
        let current_bsdf = if bounce == 0 { bsdf } else { owned_bsdf.as_ref().unwrap() };
        let ty = BxdfType::REFLECTION | BxdfType::TRANSMISSION | BxdfType::SPECULAR;
        let sample = match current_bsdf.sample_f(&wo, rng.gen(), Point2::new(rng.gen(), rng.gen()), ty) {
            Some(s) => s,
            None => break,
        };
        let (wi, pdf, f, _sampled_type) = sample;
        if pdf == 0.0 || f.is_black() {
            break;
        }
        let cos = wi.dot(interaction.shading_geometry.normal).abs();
        throughput = throughput * f * (cos / pdf);
        if throughput.is_black() {
            break;
        }

        let ray = interaction.spawn_ray(&wi);
        let (_, primitive, next_hit) = match scene.ray_intersection(&ray) {
            Some(h) => h,
            None => {
                for light in scene.infinite_lights() {
                    l = l + throughput * light.le(&ray);
                }
                break;
            }
        };

        let next_bsdf = scene.material(primitive.material_index).scattering_functions(&next_hit, TransportMode::Radiance);
        l = l + throughput * emitted_radiance(scene, &primitive, &next_hit, -wi);
        l = l + throughput
            * estimate_all_direct_light(
                scene,
                &next_hit,
                &next_bsdf,
                -wi,
                scene.material(primitive.material_index).is_flat(),
                rng,
            );

        interaction = next_hit;
        owned_bsdf = Some(next_bsdf);
        wo = -wi;
    }

    l
}

/// Estimate ambient occlusion at a surface point: `n` cosine-weighted
/// hemisphere samples out to `distance`, averaging `ao_color` scaled by
/// visibility and the spec's `surface_colour` weighting term.
pub fn estimate_ambient_occlusion(
    scene: &Scene,
    interaction: &SurfaceInteraction,
    ao_color: Rgb,
    distance: f32,
    samples: u32,
    rng: &mut impl Rng,
) -> Rgb {
    use crate::interaction::OffsetRayOrigin;

    if samples == 0 {
        return Rgb::black();
    }
    let n = interaction.shading_geometry.normal;
    let mut sum = Rgb::black();
    for _ in 0..samples {
        let u = Point2::new(rng.gen(), rng.gen());
        let local = cosine_sample_hemisphere(u);
        let world = to_world(n, local);
        let mut ray = interaction.spawn_ray(&world);
        ray.t_max = distance;
        if !scene.is_occluded(&ray) {
            sum = sum + ao_color * world.dot(n).abs();
        }
    }
    sum * (1.0 / samples as f32)
}

/// Build an arbitrary orthonormal frame around `n` and transform a locally
/// sampled direction (z-up) into world space.
fn to_world(n: Vector3<f32>, local: Vector3<f32>) -> Vector3<f32> {
    let a = if n.x.abs() > 0.9 { Vector3::unit_y() } else { Vector3::unit_x() };
    let tangent = n.cross(a).normalize();
    let bitangent = n.cross(tangent);
    tangent * local.x + bitangent * local.y + n * local.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::light::PointLight;
    use crate::primitive::PrimitiveAggregate;
    use cgmath::{point2, point3, vec3, Point3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_interaction() -> SurfaceInteraction {
        SurfaceInteraction::new(
            point3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 0.0, 1.0),
            point2(0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            0,
        )
    }

    #[test]
    fn unoccluded_point_light_contributes_direct_light() {
        let interaction = flat_interaction();
        let bsdf = crate::material::MatteMaterial::new(Rgb::constant(0.8), 0.0)
            .scattering_functions(&interaction, crate::TransportMode::Radiance);

        let light = Light::Point(PointLight::new(Point3::new(0.0, 0.0, 2.0), Rgb::constant(4.0)));
        let scene = Scene::new(PrimitiveAggregate::linear(vec![]), vec![light], vec![]);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let l = estimate_all_direct_light(&scene, &interaction, &bsdf, vec3(0.0, 0.0, 1.0), false, &mut rng);
        assert!(!l.is_black());
    }
}
