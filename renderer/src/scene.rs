use crate::{
    interaction::SurfaceInteraction,
    light::Light,
    material::Material,
    primitive::{Primitive, PrimitiveAggregate},
    ray::Ray,
};

/// Everything an integrator needs to trace a ray: the geometric aggregate,
/// the light sources, and the materials primitives point into by index.
///
/// Materials and lights are stored by index rather than threaded through
/// with lifetime parameters, so a `Scene` can be built once and shared
/// immutably across rayon worker threads for the whole render.
pub struct Scene {
    pub primitives: PrimitiveAggregate,
    pub lights: Vec<Light>,
    pub materials: Vec<Box<dyn Material>>,
    /// Indices into `lights` of the lights flagged `INFINITE`, kept
    /// separate so integrators can always add their contribution even
    /// when a ray escapes the scene without hitting any primitive.
    infinite_light_indices: Vec<usize>,
}

impl Scene {
    pub fn new(primitives: PrimitiveAggregate, lights: Vec<Light>, materials: Vec<Box<dyn Material>>) -> Self {
        let infinite_light_indices = lights
            .iter()
            .enumerate()
            .filter(|(_, l)| l.flags().contains(crate::light::LightFlags::INFINITE))
            .map(|(i, _)| i)
            .collect();
        Self { primitives, lights, materials, infinite_light_indices }
    }

    /// Find the first primitive the ray intersects. Return the parametric
    /// value at the intersection, the primitive it hit, and a description
    /// of the primitive-ray interaction.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, Primitive, SurfaceInteraction)> {
        self.primitives.ray_intersection(ray)
    }

    /// Whether anything lies between the ray's origin and `ray.t_max`,
    /// without needing to know which primitive or at what distance.
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        self.primitives.is_occluded(ray)
    }

    pub fn material(&self, index: usize) -> &dyn Material {
        self.materials[index].as_ref()
    }

    pub fn infinite_lights(&self) -> impl Iterator<Item = &Light> {
        self.infinite_light_indices.iter().map(move |&i| &self.lights[i])
    }

    /// Run each light's `preprocess` (e.g. distant and infinite lights
    /// fitting their world radius to the scene bounds). Must be called once
    /// before rendering begins.
    pub fn preprocess_lights(&mut self) {
        let (center, radius) = self.primitives.world_bound();
        for light in &mut self.lights {
            light.preprocess(center, radius);
        }
    }
}
