mod aggregate;

pub use aggregate::PrimitiveAggregate;

use crate::shape::Shape;
use bvh::{aabb::Bounded, bounding_hierarchy::BHShape};

/// Pairs a shape with the index of its material (and, if it emits light,
/// the index of the area light that wraps it) in the owning `Scene`.
/// Primitives are looked up by index rather than by reference so that a
/// `Scene` can be shared immutably across rayon worker threads without
/// lifetime parameters threading through every integrator and BSDF call.
#[derive(Debug, Clone, Copy)]
pub struct Primitive {
    pub shape: Shape,
    pub material_index: usize,
    pub area_light_index: Option<usize>,
    bvh_node_index: usize,
}

impl Primitive {
    pub fn new(shape: Shape, material_index: usize) -> Self {
        Self { shape, material_index, area_light_index: None, bvh_node_index: 0 }
    }

    pub fn with_area_light(mut self, area_light_index: usize) -> Self {
        self.area_light_index = Some(area_light_index);
        self
    }
}

impl Bounded for Primitive {
    fn aabb(&self) -> bvh::aabb::AABB {
        self.shape.aabb()
    }
}

impl BHShape for Primitive {
    fn set_bh_node_index(&mut self, index: usize) {
        self.bvh_node_index = index;
    }

    fn bh_node_index(&self) -> usize {
        self.bvh_node_index
    }
}
