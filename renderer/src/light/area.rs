use super::{LightFlags, VisibilityTester};
use crate::bsdf::geometry::cosine_sample_hemisphere;
use crate::color::Rgb;
use crate::interaction::SurfaceInteraction;
use crate::ray::Ray;
use crate::shape::Shape;
use cgmath::{InnerSpace, Point2, Vector3};

/// A light defined by a shape with uniform emitted radiance over its
/// surface, the area-light case paired with a primitive via
/// `Primitive::area_light_index`.
pub struct DiffuseAreaLight {
    shape: Shape,
    radiance: Rgb,
    two_sided: bool,
}

impl DiffuseAreaLight {
    pub fn new(shape: Shape, radiance: Rgb, two_sided: bool) -> Self {
        Self { shape, radiance, two_sided }
    }

    /// The emitted radiance leaving the light toward a direction `w` at a
    /// point with outward normal `n`.
    pub fn l(&self, n: Vector3<f32>, w: Vector3<f32>) -> Rgb {
        if self.two_sided || n.dot(w) > 0.0 {
            self.radiance
        } else {
            Rgb::black()
        }
    }

    pub fn sample_li(&self, interaction: &SurfaceInteraction, u: Point2<f32>) -> (Rgb, Vector3<f32>, f32, VisibilityTester) {
        let (p, n) = self.shape.sample(u);
        let to_light = p - interaction.point;
        if to_light.magnitude2() < 1e-12 {
            return (Rgb::black(), Vector3::new(0.0, 1.0, 0.0), 0.0, VisibilityTester::new(Box::new(*interaction), p));
        }
        let dist2 = to_light.magnitude2();
        let wi = to_light.normalize();
        let cos_at_light = n.dot(-wi);
        let pdf = if cos_at_light.abs() > 1e-6 {
            dist2 / (cos_at_light.abs() * self.shape.area())
        } else {
            0.0
        };
        let li = self.l(n, -wi);
        let tester = VisibilityTester::new(Box::new(*interaction), p);
        (li, wi, pdf, tester)
    }

    pub fn pdf_li(&self, interaction: &SurfaceInteraction, wi: Vector3<f32>) -> f32 {
        let ray = Ray::new(interaction.point, wi, f32::INFINITY);
        match self.shape.ray_intersection(&ray) {
            Some((t, si)) => {
                let dist2 = (t * wi).magnitude2();
                let cos_at_light = si.original_geometry.normal.dot(-wi).abs();
                if cos_at_light < 1e-6 {
                    0.0
                } else {
                    dist2 / (cos_at_light * self.shape.area())
                }
            }
            None => 0.0,
        }
    }

    pub fn power(&self) -> Rgb {
        let scale = if self.two_sided { 2.0 } else { 1.0 };
        self.radiance * (scale * std::f32::consts::PI * self.shape.area())
    }

    pub fn flags(&self) -> LightFlags {
        LightFlags::AREA
    }

    /// Emit a photon ray from a point sampled uniformly over the shape's
    /// area, traveling in a direction cosine-weighted about the outward
    /// normal there (or its opposite, for a two-sided light, chosen with
    /// equal probability).
    pub fn sample_emission(&self, u_pos: Point2<f32>, u_dir: Point2<f32>, u_side: f32) -> (Ray, Vector3<f32>) {
        let (p, n) = self.shape.sample(u_pos);
        let n = if self.two_sided && u_side < 0.5 { -n } else { n };
        let local_dir = cosine_sample_hemisphere(u_dir);
        let (tangent, bitangent) = orthonormal_basis(n);
        let direction = (tangent * local_dir.x + bitangent * local_dir.y + n * local_dir.z).normalize();
        (Ray::new(p, direction, f32::INFINITY), n)
    }
}

fn orthonormal_basis(n: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let a = if n.x.abs() > 0.9 { Vector3::new(0.0, 1.0, 0.0) } else { Vector3::new(1.0, 0.0, 0.0) };
    let tangent = n.cross(a).normalize();
    let bitangent = n.cross(tangent);
    (tangent, bitangent)
}
