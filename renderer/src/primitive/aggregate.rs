use super::Primitive;
use crate::interaction::SurfaceInteraction;
use crate::number;
use crate::ray::Ray;
use bvh::bvh::BVH;

/// An aggregate of primitives that a ray can be intersected against. Small
/// scenes (and unit tests) use a linear `Vector` scan; anything large goes
/// through a `bvh`-crate bounding volume hierarchy.
pub enum PrimitiveAggregate {
    Vector(Vec<Primitive>),
    Bvh(Vec<Primitive>, BVH),
}

impl PrimitiveAggregate {
    pub fn linear(primitives: Vec<Primitive>) -> Self {
        Self::Vector(primitives)
    }

    pub fn bvh(mut primitives: Vec<Primitive>) -> Self {
        let bvh = BVH::build(&mut primitives);
        Self::Bvh(primitives, bvh)
    }

    /// Find the first primitive the ray intersects, returning the
    /// parametric hit distance, the primitive itself (with its
    /// `primitive_index` field in the returned interaction filled in), and
    /// the surface interaction.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<(f32, Primitive, SurfaceInteraction)> {
        match self {
            PrimitiveAggregate::Vector(ps) => ps
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.shape.ray_intersection(ray).map(|(t, mut si)| {
                    si.primitive_index = i;
                    (t, *p, si)
                }))
                .min_by(|(t1, _, _), (t2, _, _)| number::total_cmp(t1, t2)),
            PrimitiveAggregate::Bvh(ps, bvh) => {
                let hit_candidates = bvh.traverse(&ray.into(), ps);
                hit_candidates
                    .iter()
                    .filter_map(|&p| {
                        let index = ps.iter().position(|q| std::ptr::eq(q, p)).unwrap_or(0);
                        p.shape.ray_intersection(ray).map(|(t, mut si)| {
                            si.primitive_index = index;
                            (t, *p, si)
                        })
                    })
                    .min_by(|(t1, _, _), (t2, _, _)| number::total_cmp(t1, t2))
            }
        }
    }

    /// A ray-vs-scene test that returns as soon as any occluder is found,
    /// used by shadow rays where only occlusion, not the nearest hit,
    /// matters.
    pub fn is_occluded(&self, ray: &Ray) -> bool {
        match self {
            PrimitiveAggregate::Vector(ps) => ps.iter().any(|p| p.shape.ray_intersection(ray).is_some()),
            PrimitiveAggregate::Bvh(ps, bvh) => {
                let candidates = bvh.traverse(&ray.into(), ps);
                candidates.iter().any(|p| p.shape.ray_intersection(ray).is_some())
            }
        }
    }

    pub fn primitives(&self) -> &[Primitive] {
        match self {
            PrimitiveAggregate::Vector(ps) => ps,
            PrimitiveAggregate::Bvh(ps, _) => ps,
        }
    }

    /// A bounding sphere (center, radius) enclosing every finite-extent
    /// primitive, used to set infinite lights' world radius during
    /// preprocessing. Primitives with an unbounded `AABB` (e.g. an infinite
    /// plane) are skipped.
    pub fn world_bound(&self) -> (cgmath::Point3<f32>, f32) {
        use bvh::aabb::Bounded;
        use cgmath::{EuclideanSpace, InnerSpace, Point3};

        let mut min = Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in self.primitives() {
            let aabb = p.shape.aabb();
            if !aabb.min.x.is_finite() || !aabb.max.x.is_finite() {
                continue;
            }
            min.x = min.x.min(aabb.min.x);
            min.y = min.y.min(aabb.min.y);
            min.z = min.z.min(aabb.min.z);
            max.x = max.x.max(aabb.max.x);
            max.y = max.y.max(aabb.max.y);
            max.z = max.z.max(aabb.max.z);
        }
        if !min.x.is_finite() {
            return (Point3::origin(), 1.0);
        }
        let center = Point3::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0, (min.z + max.z) / 2.0);
        let radius = (max - center).magnitude();
        (center, radius)
    }
}
