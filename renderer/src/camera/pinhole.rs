use super::{Camera, CameraSample};
use crate::geometry::Transform as _;
use crate::ray::{Ray, RayDifferential};
use cgmath::{vec3, InnerSpace, Matrix4, Point2, Point3, Rad, Vector2, Vector3};

/// A camera with an infinitesimal aperture: every ray originates at the
/// camera-space origin and passes through exactly one point on the
/// screen, giving perfectly sharp images with no depth of field.
pub struct PinholeCamera {
    camera_to_world: Matrix4<f32>,
    screen_min: Point2<f32>,
    screen_extent: Vector2<f32>,
    resolution: Vector2<f32>,
}

impl PinholeCamera {
    /// `fov_y` is the full vertical field of view; the horizontal extent
    /// follows from `resolution`'s aspect ratio.
    pub fn new(camera_to_world: Matrix4<f32>, fov_y: Rad<f32>, resolution: Vector2<usize>) -> Self {
        let aspect = resolution.x as f32 / resolution.y as f32;
        let half_height = (fov_y.0 / 2.0).tan();
        let half_width = half_height * aspect;
        Self {
            camera_to_world,
            screen_min: Point2::new(-half_width, -half_height),
            screen_extent: Vector2::new(2.0 * half_width, 2.0 * half_height),
            resolution: Vector2::new(resolution.x as f32, resolution.y as f32),
        }
    }

    pub(super) fn direction_for_film_point(&self, film_point: Point2<f32>) -> Vector3<f32> {
        let sx = self.screen_min.x + (film_point.x / self.resolution.x) * self.screen_extent.x;
        // Raster y grows downward, screen y grows upward.
        let sy = self.screen_min.y + ((self.resolution.y - film_point.y) / self.resolution.y) * self.screen_extent.y;
        vec3(sx, sy, 1.0).normalize()
    }

    pub(super) fn generate_camera_space_ray(&self, sample: &CameraSample) -> Ray {
        let direction = self.direction_for_film_point(sample.film_point);
        Ray::new(Point3::new(0.0, 0.0, 0.0), direction, f32::INFINITY)
    }

    pub(super) fn camera_to_world(&self) -> &Matrix4<f32> {
        &self.camera_to_world
    }
}

impl Camera for PinholeCamera {
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, f32) {
        let camera_ray = self.generate_camera_space_ray(sample);
        (self.camera_to_world.transform(&camera_ray), 1.0)
    }

    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Option<RayDifferential>, f32) {
        let camera_ray = self.generate_camera_space_ray(sample);
        let dx_direction = self.direction_for_film_point(Point2::new(sample.film_point.x + 1.0, sample.film_point.y));
        let dy_direction = self.direction_for_film_point(Point2::new(sample.film_point.x, sample.film_point.y + 1.0));

        let mut world_ray = self.camera_to_world.transform(&camera_ray);
        use cgmath::Transform as CgTransform;
        let differential = RayDifferential {
            rx_origin: world_ray.origin,
            rx_direction: self.camera_to_world.transform_vector(dx_direction),
            ry_origin: world_ray.origin,
            ry_direction: self.camera_to_world.transform_vector(dy_direction),
        };
        world_ray.differential = Some(differential);
        (world_ray, Some(differential), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, SquareMatrix};

    #[test]
    fn center_pixel_looks_down_the_z_axis() {
        let camera = PinholeCamera::new(Matrix4::identity(), Rad::from(Deg(90.0)), Vector2::new(100, 100));
        let sample = CameraSample::at_pixel_center(Point2::new(50, 50));
        let (ray, _) = camera.generate_ray(&sample);
        assert!(ray.direction.x.abs() < 0.02);
        assert!(ray.direction.y.abs() < 0.02);
        assert!(ray.direction.z > 0.99);
    }

    #[test]
    fn wider_fov_spreads_edge_rays_further() {
        let narrow = PinholeCamera::new(Matrix4::identity(), Rad::from(Deg(40.0)), Vector2::new(100, 100));
        let wide = PinholeCamera::new(Matrix4::identity(), Rad::from(Deg(120.0)), Vector2::new(100, 100));
        let sample = CameraSample::at_pixel_center(Point2::new(99, 50));
        let (narrow_ray, _) = narrow.generate_ray(&sample);
        let (wide_ray, _) = wide.generate_ray(&sample);
        assert!(wide_ray.direction.x > narrow_ray.direction.x);
    }
}
