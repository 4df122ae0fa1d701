use nalgebra::{Point2, Vector2};

use crate::{
    curve::{CornerRounding, CubicBezier},
    misc::{direction, rotate90, FloatingPoint, Line},
};

/// The rounding of a single polygon vertex `p1`, between its neighbors `p0` and `p2`.
///
/// The corner is replaced by a circular arc of the rounding radius, optionally extended
/// into the adjacent sides by two flanking curves when the rounding has smoothing.
/// How far the rounding may cut into each side is decided by the polygon,
/// which knows the budgets of both corners sharing a side.
#[derive(Clone, Debug)]
pub(crate) struct RoundedCorner<T: FloatingPoint> {
    p0: Point2<T>,
    p1: Point2<T>,
    p2: Point2<T>,
    d1: Vector2<T>,
    d2: Vector2<T>,
    radius: T,
    smoothing: T,
    expected_round_cut: T,
}

impl<T: FloatingPoint> RoundedCorner<T> {
    pub fn new(p0: Point2<T>, p1: Point2<T>, p2: Point2<T>, rounding: &CornerRounding<T>) -> Self {
        let v01 = p0 - p1;
        let v21 = p2 - p1;
        let d01 = v01.norm();
        let d21 = v21.norm();

        if d01 > T::zero() && d21 > T::zero() {
            let d1 = v01 / d01;
            let d2 = v21 / d21;
            let cos = d1.dot(&d2);
            let sin = (T::one() - cos * cos).max(T::zero()).sqrt();
            let expected_round_cut = if sin > T::from_f64(1e-3).unwrap() {
                rounding.radius() * (cos + T::one()) / sin
            } else {
                T::zero()
            };
            Self {
                p0,
                p1,
                p2,
                d1,
                d2,
                radius: rounding.radius(),
                smoothing: rounding.smoothing(),
                expected_round_cut,
            }
        } else {
            // coincident neighbors leave no room to round
            Self {
                p0,
                p1,
                p2,
                d1: Vector2::zeros(),
                d2: Vector2::zeros(),
                radius: T::zero(),
                smoothing: T::zero(),
                expected_round_cut: T::zero(),
            }
        }
    }

    /// Distance along each side the circular arc needs, ignoring smoothing.
    pub fn expected_round_cut(&self) -> T {
        self.expected_round_cut
    }

    /// Distance along each side the full rounding needs, including smoothing.
    pub fn expected_cut(&self) -> T {
        (T::one() + self.smoothing) * self.expected_round_cut
    }

    /// Build the cubics of the rounded corner, given the distance it may cut into
    /// the incoming side (`allowed_cut0`) and the outgoing side (`allowed_cut1`).
    /// Returns a single zero-length cubic at the vertex if there is nothing to round.
    pub fn cubics(&self, allowed_cut0: T, allowed_cut1: T) -> Vec<CubicBezier<T>> {
        let eps = T::distance_epsilon();
        let allowed_cut = allowed_cut0.min(allowed_cut1);
        if self.expected_round_cut < eps || allowed_cut < eps || self.radius < eps {
            return vec![CubicBezier::straight_line(self.p1, self.p1)];
        }

        let actual_round_cut = allowed_cut.min(self.expected_round_cut);
        let actual_smoothing0 = self.actual_smoothing(allowed_cut0);
        let actual_smoothing1 = self.actual_smoothing(allowed_cut1);

        let actual_radius = self.radius * actual_round_cut / self.expected_round_cut;
        let center_distance =
            (actual_radius * actual_radius + actual_round_cut * actual_round_cut).sqrt();
        let center = self.p1 + direction(&((self.d1 + self.d2) * T::half())) * center_distance;

        let circle_intersection0 = self.p1 + self.d1 * actual_round_cut;
        let circle_intersection2 = self.p1 + self.d2 * actual_round_cut;

        let flanking0 = Flanking {
            round_cut: actual_round_cut,
            smoothing: actual_smoothing0,
            corner: self.p1,
            side_start: self.p0,
            circle_intersection: circle_intersection0,
            other_circle_intersection: circle_intersection2,
            circle_center: center,
            radius: actual_radius,
        }
        .curve();
        let flanking2 = Flanking {
            round_cut: actual_round_cut,
            smoothing: actual_smoothing1,
            corner: self.p1,
            side_start: self.p2,
            circle_intersection: circle_intersection2,
            other_circle_intersection: circle_intersection0,
            circle_center: center,
            radius: actual_radius,
        }
        .curve()
        .reversed();

        vec![
            flanking0,
            CubicBezier::circular_arc(center, *flanking0.anchor1(), *flanking2.anchor0()),
            flanking2,
        ]
    }

    /// Smoothing that fits into `allowed_cut`: the full value when the whole cut is
    /// available, scaled down when only part of the smoothing region fits, none otherwise.
    fn actual_smoothing(&self, allowed_cut: T) -> T {
        let expected_cut = self.expected_cut();
        if allowed_cut > expected_cut {
            self.smoothing
        } else if allowed_cut > self.expected_round_cut {
            self.smoothing * (allowed_cut - self.expected_round_cut)
                / (expected_cut - self.expected_round_cut)
        } else {
            T::zero()
        }
    }
}

/// Inputs of the curve that blends one side of a corner into its circular arc.
struct Flanking<T: FloatingPoint> {
    round_cut: T,
    smoothing: T,
    corner: Point2<T>,
    side_start: Point2<T>,
    circle_intersection: Point2<T>,
    other_circle_intersection: Point2<T>,
    circle_center: Point2<T>,
    radius: T,
}

impl<T: FloatingPoint> Flanking<T> {
    fn curve(&self) -> CubicBezier<T> {
        let side_direction = direction(&(self.side_start - self.corner));
        let curve_start =
            self.corner + side_direction * self.round_cut * (T::one() + self.smoothing);

        // slide the arc end towards the arc's middle as smoothing grows
        let middle = nalgebra::center(&self.circle_intersection, &self.other_circle_intersection);
        let p = self.circle_intersection + (middle - self.circle_intersection) * self.smoothing;
        let curve_end = self.circle_center + direction(&(p - self.circle_center)) * self.radius;

        let circle_tangent = rotate90(&(curve_end - self.circle_center));
        let anchor_end = Line::new(self.side_start, side_direction)
            .intersection(&Line::new(curve_end, circle_tangent))
            .unwrap_or(self.circle_intersection);
        let anchor_start: Point2<T> =
            ((curve_start.coords + anchor_end.coords * T::from_usize(2).unwrap())
                / T::from_usize(3).unwrap())
            .into();

        CubicBezier::new(curve_start, anchor_start, anchor_end, curve_end)
    }
}
