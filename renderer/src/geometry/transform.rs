/// Applies a transformation (e.g. a `cgmath::Matrix4<f32>`) to geometric
/// values that are not themselves transformable through `cgmath`'s own
/// traits, such as rays.
pub trait Transform<T> {
    fn transform(&self, value: &T) -> T;
}
