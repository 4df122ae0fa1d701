use nalgebra::{Point2, Vector2};
use simba::scalar::SupersetOf;

use crate::misc::FloatingPoint;

/// An axis-aligned rectangle in 2D space.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T: FloatingPoint> {
    min: Point2<T>,
    max: Point2<T>,
}

impl<T: FloatingPoint> BoundingBox<T> {
    /// Create a new bounding box from two corner points in any order.
    pub fn new(a: Point2<T>, b: Point2<T>) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create a degenerate bounding box enclosing a single point.
    pub fn from_point(p: Point2<T>) -> Self {
        Self { min: p, max: p }
    }

    /// Create a new bounding box from point iterator.
    /// Returns `None` if the iterator is empty.
    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use shapemorph::prelude::BoundingBox;
    ///
    /// let bb = BoundingBox::new_with_points([
    ///     Point2::new(1., -2.),
    ///     Point2::new(-1., 0.5),
    ///     Point2::new(0., 3.),
    /// ]).unwrap();
    /// assert_eq!(bb.min(), &Point2::new(-1., -2.));
    /// assert_eq!(bb.max(), &Point2::new(1., 3.));
    /// ```
    pub fn new_with_points<I: IntoIterator<Item = Point2<T>>>(iter: I) -> Option<Self> {
        let mut iter = iter.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), |bb, p| bb.union_point(&p)))
    }

    pub fn min(&self) -> &Point2<T> {
        &self.min
    }

    pub fn max(&self) -> &Point2<T> {
        &self.max
    }

    pub fn left(&self) -> T {
        self.min.x
    }

    pub fn top(&self) -> T {
        self.min.y
    }

    pub fn right(&self) -> T {
        self.max.x
    }

    pub fn bottom(&self) -> T {
        self.max.y
    }

    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2<T> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector2<T> {
        self.max - self.min
    }

    /// Smallest bounding box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Smallest bounding box containing this box and a point.
    pub fn union_point(&self, p: &Point2<T>) -> Self {
        self.union(&Self::from_point(*p))
    }

    /// Check if the bounding box contains a point.
    /// # Examples
    /// ```
    /// use nalgebra::Point2;
    /// use shapemorph::prelude::BoundingBox;
    /// let bb = BoundingBox::new(Point2::new(0., 0.), Point2::new(1., 1.));
    /// assert!(bb.contains(&Point2::new(0.5, 0.5)));
    /// assert!(bb.contains(&Point2::new(0., 1.0)));
    /// assert!(!bb.contains(&Point2::new(-1e-8, 0.5)));
    /// ```
    pub fn contains(&self, point: &Point2<T>) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
    }

    /// Cast the bounding box to another floating point type
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> BoundingBox<F> {
        BoundingBox {
            min: self.min.cast(),
            max: self.max.cast(),
        }
    }
}
