use nalgebra::{Point2, Vector2};

use super::FloatingPoint;

/// An infinite line in 2D space, given by a point on it and a direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Line<T: FloatingPoint> {
    origin: Point2<T>,
    direction: Vector2<T>,
}

impl<T: FloatingPoint> Line<T> {
    pub fn new(origin: Point2<T>, direction: Vector2<T>) -> Self {
        Self { origin, direction }
    }

    pub fn origin(&self) -> &Point2<T> {
        &self.origin
    }

    pub fn direction(&self) -> &Vector2<T> {
        &self.direction
    }

    /// Find the intersection point of two lines.
    /// Returns `None` if the lines are parallel or too close to parallel
    /// for the intersection to be reliable.
    pub fn intersection(&self, other: &Line<T>) -> Option<Point2<T>> {
        let eps = T::distance_epsilon();
        let rotated = rotate90(&other.direction);
        let den = self.direction.dot(&rotated);
        if den.abs() < eps {
            return None;
        }
        let num = (other.origin - self.origin).dot(&rotated);
        if den.abs() < eps * num.abs() {
            return None;
        }
        let k = num / den;
        Some(self.origin + self.direction * k)
    }
}

/// Rotate a vector by 90 degrees counter-clockwise.
pub fn rotate90<T: FloatingPoint>(v: &Vector2<T>) -> Vector2<T> {
    Vector2::new(-v.y, v.x)
}

/// Unit vector in the direction of `v`, or zero if `v` is too short to have one.
pub fn direction<T: FloatingPoint>(v: &Vector2<T>) -> Vector2<T> {
    let d = v.norm();
    if d > T::distance_epsilon() {
        v / d
    } else {
        Vector2::zeros()
    }
}

/// Convert polar coordinates around the origin into a vector.
pub fn radial_to_cartesian<T: FloatingPoint>(radius: T, angle: T) -> Vector2<T> {
    Vector2::new(angle.cos(), angle.sin()) * radius
}

/// Check if two points coincide within `T::distance_epsilon()` on both axes.
pub fn is_coincident<T: FloatingPoint>(p: &Point2<T>, q: &Point2<T>) -> bool {
    let eps = T::distance_epsilon();
    (p.x - q.x).abs() <= eps && (p.y - q.y).abs() <= eps
}
