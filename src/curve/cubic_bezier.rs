use std::ops::{Add, Div, Mul};

use nalgebra::{Matrix3, Point2, Vector2};
use simba::scalar::SupersetOf;

use crate::{
    bounding_box::BoundingBox,
    misc::{is_coincident, is_convex, FloatingPoint, Invertible, Transformable},
};

/// A cubic Bezier curve segment in 2D space.
/// The curve starts at `anchor0`, ends at `anchor1`,
/// and is shaped by `control0` and `control1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBezier<T: FloatingPoint> {
    anchor0: Point2<T>,
    control0: Point2<T>,
    control1: Point2<T>,
    anchor1: Point2<T>,
}

impl<T: FloatingPoint> CubicBezier<T> {
    pub fn new(
        anchor0: Point2<T>,
        control0: Point2<T>,
        control1: Point2<T>,
        anchor1: Point2<T>,
    ) -> Self {
        Self {
            anchor0,
            control0,
            control1,
            anchor1,
        }
    }

    /// Create a straight line segment from `p0` to `p1`,
    /// with control points placed at one third and two thirds of the way.
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let line = CubicBezier::straight_line(Point2::new(0., 0.), Point2::new(3., 0.));
    /// assert_relative_eq!(line.control0(), &Point2::new(1., 0.));
    /// assert_relative_eq!(line.point_at(0.5), Point2::new(1.5, 0.));
    /// ```
    pub fn straight_line(p0: Point2<T>, p1: Point2<T>) -> Self {
        let third = T::one() / T::from_usize(3).unwrap();
        Self::new(
            p0,
            p0 + (p1 - p0) * third,
            p0 + (p1 - p0) * (third + third),
            p1,
        )
    }

    /// Create a curve approximating the circular arc around `center`
    /// that goes from `p0` to `p1`.
    /// The arc turns in the direction of the smaller angle between the two points.
    /// Nearly coincident directions fall back to a straight line.
    pub fn circular_arc(center: Point2<T>, p0: Point2<T>, p1: Point2<T>) -> Self {
        let v0 = p0 - center;
        let v1 = p1 - center;
        let rotated_v0 = Vector2::new(-v0.y, v0.x);
        let rotated_v1 = Vector2::new(-v1.y, v1.x);
        let clockwise = rotated_v0.dot(&v1) >= T::zero();

        let len0 = v0.norm();
        let len1 = v1.norm();
        let cosa = v0.dot(&v1) / (len0 * len1);
        if cosa > T::from_f64(0.999).unwrap() {
            return Self::straight_line(p0, p1);
        }

        let one = T::one();
        let two = T::from_usize(2).unwrap();
        let k = len0 * T::from_usize(4).unwrap() / T::from_usize(3).unwrap()
            * ((two * (one - cosa)).sqrt() - (one - cosa * cosa).sqrt())
            / (one - cosa);
        let k = if clockwise { k } else { -k };

        Self::new(
            p0,
            p0 + rotated_v0 / len0 * k,
            p1 - rotated_v1 / len1 * k,
            p1,
        )
    }

    /// Create a degenerate curve with all four points at `p`.
    pub fn empty(p: Point2<T>) -> Self {
        Self::new(p, p, p, p)
    }

    /// Linearly interpolate every point of two curves.
    pub fn interpolate(start: &Self, end: &Self, t: T) -> Self {
        let lerp = |a: &Point2<T>, b: &Point2<T>| a + (b - a) * t;
        Self::new(
            lerp(&start.anchor0, &end.anchor0),
            lerp(&start.control0, &end.control0),
            lerp(&start.control1, &end.control1),
            lerp(&start.anchor1, &end.anchor1),
        )
    }

    pub fn anchor0(&self) -> &Point2<T> {
        &self.anchor0
    }

    pub fn control0(&self) -> &Point2<T> {
        &self.control0
    }

    pub fn control1(&self) -> &Point2<T> {
        &self.control1
    }

    pub fn anchor1(&self) -> &Point2<T> {
        &self.anchor1
    }

    /// Get the four points in order: anchor0, control0, control1, anchor1.
    pub fn points(&self) -> [Point2<T>; 4] {
        [self.anchor0, self.control0, self.control1, self.anchor1]
    }

    /// Replace the end anchor, keeping the other points.
    pub fn with_anchor1(mut self, anchor1: Point2<T>) -> Self {
        self.anchor1 = anchor1;
        self
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: T) -> Point2<T> {
        let u = T::one() - t;
        let three = T::from_usize(3).unwrap();
        let coords = self.anchor0.coords * (u * u * u)
            + self.control0.coords * (three * t * u * u)
            + self.control1.coords * (three * t * t * u)
            + self.anchor1.coords * (t * t * t);
        coords.into()
    }

    /// Compute the first derivative of the curve at parameter `t`.
    pub fn derivative_at(&self, t: T) -> Vector2<T> {
        let u = T::one() - t;
        let three = T::from_usize(3).unwrap();
        let six = T::from_usize(6).unwrap();
        (self.control0 - self.anchor0) * (three * u * u)
            + (self.control1 - self.control0) * (six * u * t)
            + (self.anchor1 - self.control1) * (three * t * t)
    }

    /// Check if both anchors coincide within `T::distance_epsilon()` on both axes.
    pub fn is_zero_length(&self) -> bool {
        let eps = T::distance_epsilon();
        (self.anchor0.x - self.anchor1.x).abs() < eps
            && (self.anchor0.y - self.anchor1.y).abs() < eps
    }

    /// Check if the turn from this curve's chord into `next`'s chord is convex.
    pub fn convex_to(&self, next: &Self) -> bool {
        is_convex(&self.anchor0, &self.anchor1, &next.anchor1)
    }

    /// Check if `next` starts where this curve ends.
    pub fn connects_to(&self, next: &Self) -> bool {
        is_coincident(&self.anchor1, &next.anchor0)
    }

    /// Split the curve at parameter `t` into two curves
    /// that together trace exactly the same path.
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use nalgebra::Point2;
    /// use approx::assert_relative_eq;
    ///
    /// let cubic = CubicBezier::new(
    ///     Point2::new(0., 0.),
    ///     Point2::new(0., 1.),
    ///     Point2::new(1., 1.),
    ///     Point2::new(1., 0.),
    /// );
    /// let (head, tail) = cubic.split(0.25);
    /// assert_relative_eq!(head.anchor1(), tail.anchor0());
    /// assert_relative_eq!(head.point_at(0.5), cubic.point_at(0.125), epsilon = 1e-12);
    /// assert_relative_eq!(tail.point_at(0.5), cubic.point_at(0.625), epsilon = 1e-12);
    /// ```
    pub fn split(&self, t: T) -> (Self, Self) {
        let u = T::one() - t;
        let two = T::from_usize(2).unwrap();
        let mid = self.point_at(t);
        let head = Self::new(
            self.anchor0,
            (self.anchor0.coords * u + self.control0.coords * t).into(),
            (self.anchor0.coords * (u * u)
                + self.control0.coords * (two * u * t)
                + self.control1.coords * (t * t))
                .into(),
            mid,
        );
        let tail = Self::new(
            mid,
            (self.control0.coords * (u * u)
                + self.control1.coords * (two * u * t)
                + self.anchor1.coords * (t * t))
                .into(),
            (self.control1.coords * u + self.anchor1.coords * t).into(),
            self.anchor1,
        );
        (head, tail)
    }

    /// Get the same curve traversed from `anchor1` to `anchor0`.
    pub fn reversed(&self) -> Self {
        Self::new(self.anchor1, self.control1, self.control0, self.anchor0)
    }

    /// Compute the bounding box of the curve.
    /// With `approximate` set, the box of the four points is returned,
    /// which always contains the curve but may be larger than it.
    /// Otherwise the extrema of the curve are found by solving its derivative.
    pub fn calculate_bounds(&self, approximate: bool) -> BoundingBox<T> {
        if self.is_zero_length() {
            return BoundingBox::from_point(self.anchor0);
        }

        let anchors = BoundingBox::new(self.anchor0, self.anchor1);
        if approximate {
            return anchors
                .union_point(&self.control0)
                .union_point(&self.control1);
        }

        (0..2)
            .flat_map(|axis| self.extremum_parameters(axis))
            .fold(anchors, |bb, t| bb.union_point(&self.point_at(t)))
    }

    /// Parameters in `[0, 1]` where the derivative along `axis` vanishes.
    fn extremum_parameters(&self, axis: usize) -> Vec<T> {
        let (p0, c0, c1, p1) = (
            self.anchor0[axis],
            self.control0[axis],
            self.control1[axis],
            self.anchor1[axis],
        );
        let two = T::from_usize(2).unwrap();
        let three = T::from_usize(3).unwrap();
        let four = T::from_usize(4).unwrap();

        // derivative divided by 3, as a quadratic in t
        let a = -p0 + three * c0 - three * c1 + p1;
        let b = two * p0 - four * c0 + two * c1;
        let c = -p0 + c0;

        let candidates = if a.abs() < T::distance_epsilon() {
            if b != T::zero() {
                vec![-c / b]
            } else {
                vec![]
            }
        } else {
            let discriminant = b * b - four * a * c;
            if discriminant >= T::zero() {
                let sq = discriminant.sqrt();
                vec![(-b + sq) / (two * a), (-b - sq) / (two * a)]
            } else {
                vec![]
            }
        };

        candidates
            .into_iter()
            .filter(|t| T::zero() <= *t && *t <= T::one())
            .collect()
    }

    /// Map every point of the curve through `f`.
    pub fn map_points<F: Fn(&Point2<T>) -> Point2<T>>(&self, f: F) -> Self {
        Self::new(
            f(&self.anchor0),
            f(&self.control0),
            f(&self.control1),
            f(&self.anchor1),
        )
    }

    /// Cast the curve to another floating point type.
    pub fn cast<F: FloatingPoint + SupersetOf<T>>(&self) -> CubicBezier<F> {
        CubicBezier {
            anchor0: self.anchor0.cast(),
            control0: self.control0.cast(),
            control1: self.control1.cast(),
            anchor1: self.anchor1.cast(),
        }
    }
}

impl<T: FloatingPoint> Add for CubicBezier<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            (self.anchor0.coords + rhs.anchor0.coords).into(),
            (self.control0.coords + rhs.control0.coords).into(),
            (self.control1.coords + rhs.control1.coords).into(),
            (self.anchor1.coords + rhs.anchor1.coords).into(),
        )
    }
}

impl<T: FloatingPoint> Mul<T> for CubicBezier<T> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self::Output {
        self.map_points(|p| p * rhs)
    }
}

impl<T: FloatingPoint> Div<T> for CubicBezier<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self::Output {
        self.map_points(|p| p / rhs)
    }
}

impl<T: FloatingPoint> Invertible for CubicBezier<T> {
    fn invert(&mut self) {
        *self = self.reversed();
    }
}

impl<'a, T: FloatingPoint> Transformable<&'a Matrix3<T>> for CubicBezier<T> {
    fn transform(&mut self, transform: &'a Matrix3<T>) {
        *self = self.map_points(|p| p.transformed(transform));
    }
}
