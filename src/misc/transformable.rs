use nalgebra::{Matrix3, Point2, Vector3};

use super::FloatingPoint;

/// Geometry that can be mapped by a transform of type `M`,
/// typically `&Matrix3<T>` holding a 2D affine transform in homogeneous form.
pub trait Transformable<M>: Clone {
    fn transform(&mut self, transform: M);

    fn transformed(&self, transform: M) -> Self {
        let mut clone = self.clone();
        clone.transform(transform);
        clone
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for Point2<T> {
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        let v = transform * Vector3::new(self.x, self.y, T::one());
        *self = Point2::new(v.x / v.z, v.y / v.z);
    }
}
