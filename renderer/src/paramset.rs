//! Typed, named parameter lists and the builder functions that turn them
//! into concrete materials, shapes, lights, and cameras.
//!
//! This is the seam between a scene description format and the renderer's
//! own types: a loader (the command-line front end, say) parses its input
//! format into [`ParamSet`]s keyed by an object's type name, and the
//! `make_*` functions here do the dispatch and validation. Parsing of any
//! particular description format (TOML, say) stays outside this crate;
//! `ParamSet` only knows about its own typed values.

use crate::camera::{Camera, PinholeCamera, ThinLensCamera};
use crate::color::Rgb;
use crate::light::{ConstantInfiniteLight, DistantLight, Light, PointLight};
use crate::material::{GlassMaterial, Material, MatteMaterial, MetalMaterial, MirrorMaterial, PlasticMaterial};
use crate::shape::{Plane, Shape, Sphere, Triangle};
use crate::{RenderError, RenderResult};
use cgmath::{Deg, Matrix4, Point3, Vector2, Vector3};
use std::collections::HashMap;

/// One named parameter's value. Distinct point/vector/color variants (all
/// backed by three floats) exist so a type mismatch between, say, a point
/// and a color is caught at construction time rather than silently
/// misinterpreting components.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Int(i64),
    Bool(bool),
    String(String),
    Point3(Point3<f32>),
    Vector3(Vector3<f32>),
    Rgb(Rgb),
}

impl ParamValue {
    fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Float(_) => "float",
            ParamValue::Int(_) => "int",
            ParamValue::Bool(_) => "bool",
            ParamValue::String(_) => "string",
            ParamValue::Point3(_) => "point3",
            ParamValue::Vector3(_) => "vector3",
            ParamValue::Rgb(_) => "rgb",
        }
    }
}

/// A named bag of parameters for constructing one scene object. Mirrors
/// pbrt's parameter-list convention: every lookup either returns a
/// caller-supplied default (`find_*`) or fails loudly when the parameter is
/// mandatory (`require_*`).
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    values: HashMap<String, ParamValue>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    fn require<'a, T>(&'a self, name: &str, expected: &'static str, extract: impl Fn(&'a ParamValue) -> Option<T>) -> RenderResult<T> {
        match self.get(name) {
            Some(v) => extract(v).ok_or_else(|| RenderError::ParamTypeMismatch {
                name: name.to_string(),
                expected,
                found: v.type_name(),
            }),
            None => Err(RenderError::MissingParameter(name.to_string())),
        }
    }

    fn find<'a, T>(&'a self, name: &str, default: T, extract: impl Fn(&'a ParamValue) -> Option<T>) -> T {
        self.get(name).and_then(extract).unwrap_or(default)
    }

    pub fn require_float(&self, name: &str) -> RenderResult<f32> {
        self.require(name, "float", |v| match v {
            ParamValue::Float(x) => Some(*x),
            _ => None,
        })
    }

    pub fn find_float(&self, name: &str, default: f32) -> f32 {
        self.find(name, default, |v| match v {
            ParamValue::Float(x) => Some(*x),
            _ => None,
        })
    }

    pub fn require_bool(&self, name: &str) -> RenderResult<bool> {
        self.require(name, "bool", |v| match v {
            ParamValue::Bool(x) => Some(*x),
            _ => None,
        })
    }

    pub fn find_bool(&self, name: &str, default: bool) -> bool {
        self.find(name, default, |v| match v {
            ParamValue::Bool(x) => Some(*x),
            _ => None,
        })
    }

    pub fn require_string(&self, name: &str) -> RenderResult<String> {
        self.require(name, "string", |v| match v {
            ParamValue::String(x) => Some(x.clone()),
            _ => None,
        })
    }

    pub fn find_string(&self, name: &str, default: &str) -> String {
        self.find(name, default.to_string(), |v| match v {
            ParamValue::String(x) => Some(x.clone()),
            _ => None,
        })
    }

    pub fn require_point3(&self, name: &str) -> RenderResult<Point3<f32>> {
        self.require(name, "point3", |v| match v {
            ParamValue::Point3(x) => Some(*x),
            _ => None,
        })
    }

    pub fn find_point3(&self, name: &str, default: Point3<f32>) -> Point3<f32> {
        self.find(name, default, |v| match v {
            ParamValue::Point3(x) => Some(*x),
            _ => None,
        })
    }

    pub fn require_vector3(&self, name: &str) -> RenderResult<Vector3<f32>> {
        self.require(name, "vector3", |v| match v {
            ParamValue::Vector3(x) => Some(*x),
            _ => None,
        })
    }

    pub fn find_vector3(&self, name: &str, default: Vector3<f32>) -> Vector3<f32> {
        self.find(name, default, |v| match v {
            ParamValue::Vector3(x) => Some(*x),
            _ => None,
        })
    }

    pub fn require_rgb(&self, name: &str) -> RenderResult<Rgb> {
        self.require(name, "rgb", |v| match v {
            ParamValue::Rgb(x) => Some(*x),
            _ => None,
        })
    }

    pub fn find_rgb(&self, name: &str, default: Rgb) -> Rgb {
        self.find(name, default, |v| match v {
            ParamValue::Rgb(x) => Some(*x),
            _ => None,
        })
    }
}

/// Build a [`Material`] from a type name (`"matte"`, `"mirror"`, `"glass"`,
/// `"plastic"`, or `"metal"`) and its parameters.
pub fn make_material(type_name: &str, params: &ParamSet) -> RenderResult<Box<dyn Material>> {
    match type_name {
        "matte" => {
            let kd = params.find_rgb("kd", Rgb::constant(0.5));
            let sigma = params.find_float("sigma", 0.0);
            Ok(Box::new(MatteMaterial::new(kd, sigma)))
        }
        "mirror" => {
            let kr = params.find_rgb("kr", Rgb::constant(0.9));
            Ok(Box::new(MirrorMaterial::new(kr)))
        }
        "glass" => {
            let kr = params.find_rgb("kr", Rgb::constant(1.0));
            let kt = params.find_rgb("kt", Rgb::constant(1.0));
            let eta = params.find_float("eta", 1.5);
            let glass = GlassMaterial::new(kr, kt, eta);
            let glass = match params.get("cauchyb") {
                Some(_) => glass.with_dispersion(params.find_float("cauchyb", 0.0)),
                None => glass,
            };
            Ok(Box::new(glass))
        }
        "plastic" => {
            let kd = params.find_rgb("kd", Rgb::constant(0.5));
            let ks = params.find_rgb("ks", Rgb::constant(0.25));
            let roughness = params.find_float("roughness", 0.1);
            let remap_roughness = params.find_bool("remaproughness", true);
            Ok(Box::new(PlasticMaterial::new(kd, ks, roughness, remap_roughness)))
        }
        "metal" => {
            let eta = params.find_rgb("eta", Rgb::constant(0.2));
            let k = params.find_rgb("k", Rgb::constant(3.0));
            let roughness = params.find_float("roughness", 0.1);
            let remap_roughness = params.find_bool("remaproughness", true);
            Ok(Box::new(MetalMaterial::new(eta, k, roughness, remap_roughness)))
        }
        other => Err(RenderError::UnknownMaterial(other.to_string())),
    }
}

/// Build a [`Shape`] from a type name (`"sphere"`, `"plane"`, or
/// `"triangle"`) and its parameters. Area lights attach to a shape
/// directly (see [`crate::light::DiffuseAreaLight::new`]) rather than
/// going through [`make_light`], since they need one already constructed.
pub fn make_shape(type_name: &str, params: &ParamSet) -> RenderResult<Shape> {
    match type_name {
        "sphere" => {
            let center = params.find_point3("center", Point3::new(0.0, 0.0, 0.0));
            let radius = params.require_float("radius")?;
            Ok(Shape::Sphere(Sphere::new(center, radius)))
        }
        "plane" => {
            let point = params.find_point3("point", Point3::new(0.0, 0.0, 0.0));
            let normal = params.find_vector3("normal", Vector3::new(0.0, 1.0, 0.0));
            Ok(Shape::Plane(Plane::new(point, normal)))
        }
        "triangle" => {
            let p0 = params.require_point3("p0")?;
            let p1 = params.require_point3("p1")?;
            let p2 = params.require_point3("p2")?;
            Ok(Shape::Triangle(Triangle::new(p0, p1, p2)))
        }
        other => Err(RenderError::UnknownShape(other.to_string())),
    }
}

/// Build a delta or infinite [`Light`] from a type name (`"point"`,
/// `"distant"`, or `"infinite"`) and its parameters.
pub fn make_light(type_name: &str, params: &ParamSet) -> RenderResult<Light> {
    match type_name {
        "point" => {
            let position = params.find_point3("position", Point3::new(0.0, 0.0, 0.0));
            let intensity = params.find_rgb("intensity", Rgb::constant(1.0));
            Ok(Light::Point(PointLight::new(position, intensity)))
        }
        "distant" => {
            let direction_to_light = params.find_vector3("from", Vector3::new(0.0, 1.0, 0.0));
            let radiance = params.find_rgb("l", Rgb::constant(1.0));
            Ok(Light::Distant(DistantLight::new(direction_to_light, radiance)))
        }
        "infinite" => {
            let radiance = params.find_rgb("l", Rgb::constant(1.0));
            Ok(Light::Infinite(ConstantInfiniteLight::new(radiance)))
        }
        other => Err(RenderError::UnknownLight(other.to_string())),
    }
}

/// Build a [`Camera`] from a type name (`"pinhole"` or `"thinlens"`), its
/// parameters, and the camera-to-world transform and film resolution,
/// which come from the scene description's top-level setup rather than
/// the camera's own parameter block.
pub fn make_camera(
    type_name: &str,
    params: &ParamSet,
    camera_to_world: Matrix4<f32>,
    resolution: Vector2<usize>,
) -> RenderResult<Box<dyn Camera>> {
    let fov = params.find_float("fov", 60.0);
    match type_name {
        "pinhole" => Ok(Box::new(PinholeCamera::new(camera_to_world, Deg(fov).into(), resolution))),
        "thinlens" => {
            let lens_radius = params.find_float("lensradius", 0.0);
            let focal_distance = params.find_float("focaldistance", 1e6);
            Ok(Box::new(ThinLensCamera::new(camera_to_world, Deg(fov).into(), resolution, lens_radius, focal_distance)))
        }
        other => Err(RenderError::UnknownCamera(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_parameter_is_reported_by_name() {
        let params = ParamSet::new();
        match make_shape("sphere", &params) {
            Err(RenderError::MissingParameter(name)) => assert_eq!(name, "radius"),
            other => panic!("expected MissingParameter(\"radius\"), got {other:?}"),
        }
    }

    #[test]
    fn wrong_value_type_is_reported_with_both_type_names() {
        let mut params = ParamSet::new();
        params.set("radius", ParamValue::String("big".to_string()));
        match make_shape("sphere", &params) {
            Err(RenderError::ParamTypeMismatch { name, expected, found }) => {
                assert_eq!(name, "radius");
                assert_eq!(expected, "float");
                assert_eq!(found, "string");
            }
            other => panic!("expected ParamTypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn unknown_material_name_is_rejected() {
        let params = ParamSet::new();
        match make_material("holographic", &params) {
            Err(RenderError::UnknownMaterial(name)) => assert_eq!(name, "holographic"),
            other => panic!("expected UnknownMaterial, got {other:?}"),
        }
    }

    #[test]
    fn matte_material_builds_with_defaults() {
        let params = ParamSet::new();
        assert!(make_material("matte", &params).is_ok());
    }

    #[test]
    fn sphere_builds_with_explicit_radius() {
        let mut params = ParamSet::new();
        params.set("radius", ParamValue::Float(2.5));
        assert!(make_shape("sphere", &params).is_ok());
    }

    #[test]
    fn point_light_builds_with_defaults() {
        let params = ParamSet::new();
        assert!(make_light("point", &params).is_ok());
    }

    #[test]
    fn pinhole_camera_builds_with_defaults() {
        let params = ParamSet::new();
        let camera = make_camera("pinhole", &params, Matrix4::from_translation(cgmath::vec3(0.0, 0.0, 0.0)), Vector2::new(16, 16));
        assert!(camera.is_ok());
    }

    #[test]
    fn unknown_camera_name_is_rejected() {
        let params = ParamSet::new();
        match make_camera("fisheye", &params, Matrix4::from_translation(cgmath::vec3(0.0, 0.0, 0.0)), Vector2::new(4, 4)) {
            Err(RenderError::UnknownCamera(name)) => assert_eq!(name, "fisheye"),
            other => panic!("expected UnknownCamera, got {other:?}"),
        }
    }
}
