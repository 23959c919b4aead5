mod error;

use cgmath::{vec3, InnerSpace, Matrix4, Point3, Vector2, Vector3, Vector4};
use clap::{App, Arg};
use error::{Error, Result};
use log::info;
use renderer::camera::Camera;
use renderer::color::Rgb;
use renderer::driver::{self, DriverSettings};
use renderer::filter::MitchellFilter;
use renderer::integrator::{
    BidirectionalIntegrator, DebugIntegrator, DebugMode, DirectLightingIntegrator, PathTracingIntegrator, PhotonMappingIntegrator,
    SppmIntegrator, SurfaceIntegrator,
};
use renderer::paramset::{make_camera, make_light, make_material, make_shape, ParamSet, ParamValue};
use renderer::photon_prepass::{self, PhotonPrepassSettings};
use renderer::primitive::{Primitive, PrimitiveAggregate};
use renderer::render_control::RenderControl;
use renderer::scene::Scene;
use serde::Deserialize;
use snafu::ResultExt;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct SceneFile {
    image: ImageConfig,
    camera: ObjectConfig,
    #[serde(default)]
    materials: Vec<NamedObjectConfig>,
    #[serde(default)]
    shapes: Vec<ShapeConfig>,
    #[serde(default)]
    lights: Vec<ObjectConfig>,
    integrator: ObjectConfig,
    #[serde(default)]
    sampling: SamplingConfig,
}

#[derive(Debug, Deserialize)]
struct ImageConfig {
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize, Default)]
struct SamplingConfig {
    #[serde(default = "default_min_samples")]
    min_samples: u32,
    #[serde(default = "default_max_samples")]
    max_samples: u32,
    #[serde(default = "default_variance_threshold")]
    variance_threshold: f32,
}

fn default_min_samples() -> u32 {
    16
}
fn default_max_samples() -> u32 {
    128
}
fn default_variance_threshold() -> f32 {
    5e-4
}

#[derive(Debug, Deserialize)]
struct ObjectConfig {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(flatten)]
    params: HashMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct NamedObjectConfig {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(flatten)]
    params: HashMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct ShapeConfig {
    material: String,
    #[serde(default)]
    emit: Option<[f32; 3]>,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(flatten)]
    params: HashMap<String, toml::Value>,
}

/// Names whose array-of-three-floats value is a point rather than a
/// direction or a color. Everything else falls back to a vector, unless
/// it matches one of the reflectance/emission names below.
const POINT_KEYS: &[&str] = &["center", "point", "position", "p0", "p1", "p2", "eye", "look_at"];
const COLOR_KEYS: &[&str] = &["kd", "ks", "kr", "kt", "eta", "k", "intensity", "l"];

fn toml_value_to_param(key: &str, value: &toml::Value) -> Option<ParamValue> {
    match value {
        toml::Value::Float(f) => Some(ParamValue::Float(*f as f32)),
        toml::Value::Integer(i) => Some(ParamValue::Int(*i)),
        toml::Value::Boolean(b) => Some(ParamValue::Bool(*b)),
        toml::Value::String(s) => Some(ParamValue::String(s.clone())),
        toml::Value::Array(arr) if arr.len() == 3 => {
            let components: Option<Vec<f32>> = arr
                .iter()
                .map(|v| match v {
                    toml::Value::Float(f) => Some(*f as f32),
                    toml::Value::Integer(i) => Some(*i as f32),
                    _ => None,
                })
                .collect();
            let components = components?;
            let (x, y, z) = (components[0], components[1], components[2]);
            if POINT_KEYS.contains(&key) {
                Some(ParamValue::Point3(Point3::new(x, y, z)))
            } else if COLOR_KEYS.contains(&key) {
                Some(ParamValue::Rgb(Rgb::from_rgb(x, y, z)))
            } else {
                Some(ParamValue::Vector3(Vector3::new(x, y, z)))
            }
        }
        _ => None,
    }
}

fn config_to_paramset(params: &HashMap<String, toml::Value>) -> ParamSet {
    let mut set = ParamSet::new();
    for (key, value) in params {
        if let Some(param) = toml_value_to_param(key, value) {
            set.set(key.clone(), param);
        }
    }
    set
}

/// Build a camera-to-world transform that looks from `eye` toward
/// `look_at`, with `up` as the rough up direction. The renderer's pinhole
/// and thin-lens cameras both generate camera-space rays pointed down
/// +z, so the forward basis vector (not -z, as in a typical right-handed
/// view matrix) is the look direction.
fn look_at_camera_to_world(eye: Point3<f32>, look_at: Point3<f32>, up: Vector3<f32>) -> Matrix4<f32> {
    let forward = (look_at - eye).normalize();
    let right = up.normalize().cross(forward).normalize();
    let true_up = forward.cross(right);
    Matrix4::from_cols(
        Vector4::new(right.x, right.y, right.z, 0.0),
        Vector4::new(true_up.x, true_up.y, true_up.z, 0.0),
        Vector4::new(forward.x, forward.y, forward.z, 0.0),
        Vector4::new(eye.x, eye.y, eye.z, 1.0),
    )
}

fn build_camera(config: &ObjectConfig, resolution: Vector2<usize>) -> Result<Box<dyn Camera>> {
    let eye = config
        .params
        .get("eye")
        .and_then(|v| toml_value_to_param("eye", v))
        .and_then(|v| match v {
            ParamValue::Point3(p) => Some(p),
            _ => None,
        })
        .unwrap_or(Point3::new(0.0, 0.0, 0.0));
    let look_at = config
        .params
        .get("look_at")
        .and_then(|v| toml_value_to_param("look_at", v))
        .and_then(|v| match v {
            ParamValue::Point3(p) => Some(p),
            _ => None,
        })
        .unwrap_or(Point3::new(0.0, 0.0, 1.0));
    let up = config
        .params
        .get("up")
        .and_then(|v| toml_value_to_param("up", v))
        .and_then(|v| match v {
            ParamValue::Vector3(v) => Some(v),
            _ => None,
        })
        .unwrap_or(vec3(0.0, 1.0, 0.0));

    let camera_to_world = look_at_camera_to_world(eye, look_at, up);
    let params = config_to_paramset(&config.params);
    Ok(make_camera(&config.type_name, &params, camera_to_world, resolution)?)
}

fn build_scene(file: &SceneFile) -> Result<Scene> {
    let mut material_names = HashMap::new();
    let mut materials = Vec::new();
    for m in &file.materials {
        let params = config_to_paramset(&m.params);
        materials.push(make_material(&m.type_name, &params)?);
        material_names.insert(m.name.clone(), materials.len() - 1);
    }

    let mut lights = Vec::new();
    for l in &file.lights {
        let params = config_to_paramset(&l.params);
        lights.push(make_light(&l.type_name, &params)?);
    }

    let mut primitives = Vec::new();
    for s in &file.shapes {
        let material_index = *material_names.get(&s.material).ok_or_else(|| Error::BuildScene {
            source: renderer::RenderError::UnknownMaterial(s.material.clone()),
        })?;
        let params = config_to_paramset(&s.params);
        let shape = make_shape(&s.type_name, &params)?;
        let mut primitive = Primitive::new(shape, material_index);

        if let Some(emit) = s.emit {
            let radiance = Rgb::from_rgb(emit[0], emit[1], emit[2]);
            let light = renderer::light::Light::Area(renderer::light::DiffuseAreaLight::new(shape, radiance, true));
            lights.push(light);
            primitive = primitive.with_area_light(lights.len() - 1);
        }

        primitives.push(primitive);
    }

    if lights.is_empty() {
        return Err(Error::NoLights);
    }

    let mut scene = Scene::new(PrimitiveAggregate::bvh(primitives), lights, materials);
    scene.preprocess_lights();
    Ok(scene)
}

enum Integrator {
    Stateless(Box<dyn SurfaceIntegrator>),
    Sppm(SppmIntegrator),
}

fn build_integrator(config: &ObjectConfig, scene: &Scene, resolution: Vector2<usize>) -> Result<Integrator> {
    let params = config_to_paramset(&config.params);
    match config.type_name.as_str() {
        "direct" => Ok(Integrator::Stateless(Box::new(DirectLightingIntegrator::new(
            params.find_float("max_specular_depth", 5.0) as u32,
        )))),
        "path" => Ok(Integrator::Stateless(Box::new(PathTracingIntegrator::new(params.find_float("max_depth", 8.0) as u32)))),
        "bidirectional" => Ok(Integrator::Stateless(Box::new(BidirectionalIntegrator::new(
            params.find_float("max_eye_depth", 6.0) as u32,
            params.find_float("max_light_depth", 6.0) as u32,
        )))),
        "photon_mapping" => {
            let settings = PhotonPrepassSettings {
                caustic_photons: params.find_float("caustic_photons", 200_000.0) as usize,
                diffuse_photons: params.find_float("diffuse_photons", 200_000.0) as usize,
                max_bounces: params.find_float("max_bounces", 8.0) as u32,
            };
            info!("shooting photon prepass: {} caustic, {} diffuse", settings.caustic_photons, settings.diffuse_photons);
            let (caustic_map, global_map) = photon_prepass::run(scene, &settings, 0xC0FF_EE00);
            let gather_photons = params.find_float("gather_photons", 100.0) as usize;
            let max_gather_distance = params.find_float("max_gather_distance", 0.5);
            Ok(Integrator::Stateless(Box::new(PhotonMappingIntegrator::new(
                caustic_map,
                global_map,
                gather_photons,
                max_gather_distance,
            ))))
        }
        "sppm" => {
            let initial_radius = params.find_float("initial_radius", 0.5);
            Ok(Integrator::Sppm(SppmIntegrator::new(resolution, initial_radius)))
        }
        "debug" => {
            let mode = match params.find_string("mode", "hits").as_str() {
                "shading_normal" => DebugMode::ShadingNormal,
                "material_index" => DebugMode::MaterialIndex,
                _ => DebugMode::Hits,
            };
            Ok(Integrator::Stateless(Box::new(DebugIntegrator::new(mode))))
        }
        other => Err(Error::UnknownIntegrator { name: other.to_string() }),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = App::new("Renderer")
        .arg(Arg::with_name("SCENE").help("Path to a TOML scene description").required(true).index(1))
        .arg(Arg::with_name("OUTPUT").help("Where to write the rendered PNG").required(true).index(2))
        .arg(
            Arg::with_name("eye_passes")
                .long("eye-passes")
                .help("Number of eye/photon rounds to run for an sppm integrator")
                .default_value("8"),
        )
        .arg(
            Arg::with_name("photons_per_pass")
                .long("photons-per-pass")
                .help("Photons shot per round for an sppm integrator")
                .default_value("100000"),
        )
        .get_matches();

    let scene_path = matches.value_of("SCENE").unwrap();
    let output_path = matches.value_of("OUTPUT").unwrap();
    let eye_passes: u32 = matches.value_of("eye_passes").unwrap().parse().unwrap_or(8);
    let photons_per_pass: usize = matches.value_of("photons_per_pass").unwrap().parse().unwrap_or(100_000);

    let content = std::fs::read_to_string(scene_path).context(error::ReadSceneFile { path: scene_path.to_string() })?;
    let file: SceneFile = toml::from_str(&content).context(error::ParseSceneFile { path: scene_path.to_string() })?;

    let resolution = Vector2::new(file.image.width, file.image.height);
    let scene = build_scene(&file)?;
    let camera = build_camera(&file.camera, resolution)?;
    let integrator = build_integrator(&file.integrator, &scene, resolution)?;
    let control = RenderControl::new();

    let film = match integrator {
        Integrator::Stateless(integrator) => {
            let filter = MitchellFilter::new(2.0, 2.0, 1.0 / 3.0, 1.0 / 3.0);
            let settings = DriverSettings {
                min_samples: file.sampling.min_samples,
                max_samples: file.sampling.max_samples,
                variance_threshold: file.sampling.variance_threshold,
                ..Default::default()
            };
            driver::render(&scene, camera.as_ref(), integrator.as_ref(), &filter, resolution, &settings, &control, 0x5EED)
        }
        Integrator::Sppm(mut sppm) => {
            driver::render_sppm(&scene, camera.as_ref(), &mut sppm, eye_passes, photons_per_pass, &control, 0x5EED)
        }
    };

    let image = film.write_image();
    image.save(output_path).context(error::SaveImage { path: output_path.to_string() })?;
    Ok(())
}
