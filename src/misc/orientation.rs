use nalgebra::Point2;
use num_traits::NumCast;
use robust::{orient2d, Coord};

use super::FloatingPoint;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    Collinear,
}

/// Robust orientation test for three points.
pub fn orientation<T: FloatingPoint>(p: &Point2<T>, q: &Point2<T>, r: &Point2<T>) -> Orientation {
    let coord = |pt: &Point2<T>| Coord {
        x: <f64 as NumCast>::from(pt.x).unwrap(),
        y: <f64 as NumCast>::from(pt.y).unwrap(),
    };
    let orientation = orient2d(coord(p), coord(q), coord(r));

    if orientation < 0. {
        Orientation::Clockwise
    } else if orientation > 0. {
        Orientation::CounterClockwise
    } else {
        Orientation::Collinear
    }
}

/// Check if the turn `previous -> current -> next` bends the outline outward,
/// i.e. `current` is a convex vertex of a counter-clockwise outline.
pub fn is_convex<T: FloatingPoint>(
    previous: &Point2<T>,
    current: &Point2<T>,
    next: &Point2<T>,
) -> bool {
    orientation(previous, current, next) == Orientation::CounterClockwise
}
