use super::{Camera, CameraSample, PinholeCamera};
use crate::bsdf::geometry::concentric_sample_disk;
use crate::geometry::Transform as _;
use crate::ray::{Ray, RayDifferential};
use cgmath::{point2, InnerSpace, Matrix4, Point2, Point3, Rad, Transform as _, Vector2};

/// A camera with a finite circular aperture: rays originate from a point
/// sampled on the lens and are bent to converge on the point that a
/// pinhole ray would have hit at `focal_distance`, producing depth of
/// field that blurs everything away from the focal plane.
pub struct ThinLensCamera {
    pinhole: PinholeCamera,
    lens_radius: f32,
    focal_distance: f32,
}

impl ThinLensCamera {
    pub fn new(camera_to_world: Matrix4<f32>, fov_y: Rad<f32>, resolution: Vector2<usize>, lens_radius: f32, focal_distance: f32) -> Self {
        Self {
            pinhole: PinholeCamera::new(camera_to_world, fov_y, resolution),
            lens_radius,
            focal_distance,
        }
    }

    fn generate_camera_space_ray(&self, sample: &CameraSample) -> Ray {
        let direction = self.pinhole.direction_for_film_point(sample.film_point);
        if self.lens_radius <= 0.0 {
            return Ray::new(Point3::new(0.0, 0.0, 0.0), direction, f32::INFINITY);
        }

        let disk = concentric_sample_disk(point2(sample.lens_point.x, sample.lens_point.y));
        let lens_x = disk.x * self.lens_radius;
        let lens_y = disk.y * self.lens_radius;

        let focus_t = self.focal_distance / direction.z;
        let focus_point = Point3::new(0.0, 0.0, 0.0) + direction * focus_t;

        let origin = Point3::new(lens_x, lens_y, 0.0);
        let new_direction = (focus_point - origin).normalize();
        Ray::new(origin, new_direction, f32::INFINITY)
    }
}

impl Camera for ThinLensCamera {
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, f32) {
        let camera_ray = self.generate_camera_space_ray(sample);
        (self.pinhole.camera_to_world().transform(&camera_ray), 1.0)
    }

    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Option<RayDifferential>, f32) {
        let camera_ray = self.generate_camera_space_ray(sample);
        let dx_sample = CameraSample { film_point: Point2::new(sample.film_point.x + 1.0, sample.film_point.y), ..*sample };
        let dy_sample = CameraSample { film_point: Point2::new(sample.film_point.x, sample.film_point.y + 1.0), ..*sample };
        let dx_ray = self.generate_camera_space_ray(&dx_sample);
        let dy_ray = self.generate_camera_space_ray(&dy_sample);

        let camera_to_world = self.pinhole.camera_to_world();
        let mut world_ray = camera_to_world.transform(&camera_ray);
        let differential = RayDifferential {
            rx_origin: camera_to_world.transform_point(dx_ray.origin),
            rx_direction: camera_to_world.transform_vector(dx_ray.direction),
            ry_origin: camera_to_world.transform_point(dy_ray.origin),
            ry_direction: camera_to_world.transform_vector(dy_ray.direction),
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
    fn zero_aperture_matches_pinhole_direction() {
        let camera = ThinLensCamera::new(Matrix4::identity(), Rad::from(Deg(60.0)), Vector2::new(64, 64), 0.0, 5.0);
        let sample = CameraSample::new(Point2::new(32.0, 32.0), Point2::new(0.5, 0.5), 0.0);
        let (ray, _) = camera.generate_ray(&sample);
        assert!(ray.origin.x.abs() < 1e-5 && ray.origin.y.abs() < 1e-5);
    }

    #[test]
    fn nonzero_aperture_offsets_origin() {
        let camera = ThinLensCamera::new(Matrix4::identity(), Rad::from(Deg(60.0)), Vector2::new(64, 64), 0.5, 5.0);
        let sample = CameraSample::new(Point2::new(32.0, 32.0), Point2::new(1.0, 0.5), 0.0);
        let (ray, _) = camera.generate_ray(&sample);
        assert!(ray.origin.x.abs() > 1e-3 || ray.origin.y.abs() > 1e-3);
    }
}
