use super::FloatingPoint;

/// Modulo that is never negative.
/// A negative input is shifted by `modulo`, so a value just below zero lands just below
/// `modulo`, or on `modulo` itself once rounded, never on zero.
/// ```
/// use shapemorph::prelude::*;
/// use approx::assert_relative_eq;
/// assert_relative_eq!(positive_modulo(-0.25, 1.), 0.75);
/// assert_relative_eq!(positive_modulo(1.25, 1.), 0.25);
/// ```
pub fn positive_modulo<T: FloatingPoint>(num: T, modulo: T) -> T {
    let m = num % modulo;
    if m < T::zero() {
        m + modulo
    } else {
        m
    }
}

/// Shortest distance between two progress values on the unit cycle.
pub fn progress_distance<T: FloatingPoint>(p1: T, p2: T) -> T {
    let d = (p1 - p2).abs();
    d.min(T::one() - d)
}

/// Check if `progress` lies on the cyclic interval that starts at `from` and ends at `to`.
/// When `to < from` the interval wraps around 1.
pub fn is_progress_in_range<T: FloatingPoint>(progress: T, from: T, to: T) -> bool {
    if to >= from {
        from <= progress && progress <= to
    } else {
        progress >= from || progress <= to
    }
}
