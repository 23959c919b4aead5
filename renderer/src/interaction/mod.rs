mod offset;

pub use offset::OffsetRayOrigin;

use cgmath::{Point2, Point3, Vector3};

/// A point at which a ray intersects a surface, together with enough local
/// differential geometry to build a shading frame and spawn new rays
/// without immediately re-intersecting the same surface.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceInteraction {
    pub point: Point3<f32>,
    pub point_error_bound: Vector3<f32>,
    pub neg_ray_direction: Vector3<f32>,
    pub uv: Point2<f32>,
    pub original_geometry: SurfaceGeometry,
    pub shading_geometry: SurfaceGeometry,
    /// Index into the scene's primitive list of the primitive that was hit.
    pub primitive_index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SurfaceGeometry {
    pub normal: Vector3<f32>,
    pub dpdu: Vector3<f32>,
    pub dpdv: Vector3<f32>,
}

impl SurfaceInteraction {
    pub fn new(
        point: Point3<f32>,
        point_error_bound: Vector3<f32>,
        neg_ray_direction: Vector3<f32>,
        uv: Point2<f32>,
        dpdu: Vector3<f32>,
        dpdv: Vector3<f32>,
        primitive_index: usize,
    ) -> Self {
        use cgmath::InnerSpace;
        let normal = dpdu.cross(dpdv).normalize();
        Self {
            point,
            point_error_bound,
            neg_ray_direction,
            uv,
            original_geometry: SurfaceGeometry { normal, dpdu, dpdv },
            shading_geometry: SurfaceGeometry { normal, dpdu, dpdv },
            primitive_index,
        }
    }
}
