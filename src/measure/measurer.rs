use anyhow::ensure;
use gauss_quad::GaussLegendre;

use crate::{curve::CubicBezier, misc::FloatingPoint};

/// Measures how much of the outline a cubic covers, and locates the point of a cubic
/// at a given measure. Progress along a polygon outline is proportional to this measure.
pub trait Measurer<T: FloatingPoint> {
    /// Measure of the whole cubic, never negative.
    fn measure_cubic(&self, cubic: &CubicBezier<T>) -> T;

    /// Find the curve parameter `t` in `[0, 1]` where the measure from the start
    /// of the cubic reaches `m`.
    fn find_cubic_cut_point(&self, cubic: &CubicBezier<T>, m: T) -> T;
}

/// Approximate arc length measurer that samples a few chords of each cubic.
/// Cheap, and accurate enough to drive morphing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LengthMeasurer;

impl LengthMeasurer {
    const SEGMENTS: usize = 3;

    /// Walk the chords of the cubic until `threshold` is used up.
    /// Returns the parameter reached and the length walked,
    /// or `(1, total length)` if the cubic is shorter than the threshold.
    fn closest_progress_to<T: FloatingPoint>(cubic: &CubicBezier<T>, threshold: Option<T>) -> (T, T) {
        let segments = T::from_usize(Self::SEGMENTS).unwrap();
        let mut total = T::zero();
        let mut remainder = threshold;
        let mut prev = *cubic.anchor0();

        for i in 1..=Self::SEGMENTS {
            let progress = T::from_usize(i).unwrap() / segments;
            let point = cubic.point_at(progress);
            let segment = (point - prev).norm();

            if let Some(remainder) = remainder.as_mut() {
                if *remainder <= T::zero() {
                    let t = (progress - T::one() / segments).max(T::zero());
                    return (t, threshold.unwrap_or(total));
                }
                if segment > T::zero() && segment >= *remainder {
                    let t = progress - (T::one() - *remainder / segment) / segments;
                    return (t.clamp(T::zero(), T::one()), threshold.unwrap_or(total));
                }
                *remainder -= segment;
            }

            total += segment;
            prev = point;
        }

        (T::one(), total)
    }
}

impl<T: FloatingPoint> Measurer<T> for LengthMeasurer {
    fn measure_cubic(&self, cubic: &CubicBezier<T>) -> T {
        Self::closest_progress_to(cubic, None).1
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn find_cubic_cut_point(&self, cubic: &CubicBezier<T>, m: T) -> T {
        // also rejects NaN
        if !(m > T::zero()) {
            return T::zero();
        }
        Self::closest_progress_to(cubic, Some(m)).0
    }
}

/// Precise arc length measurer integrating the speed of the cubic
/// by Gauss-Legendre quadrature, locating cut points by bisection.
pub struct GaussLegendreMeasurer {
    gauss: GaussLegendre,
    max_iterations: usize,
}

impl GaussLegendreMeasurer {
    const MAX_ITERATIONS: usize = 64;

    /// Create a measurer using a quadrature of the given degree.
    /// # Failures
    /// - if the degree is lower than 2
    pub fn try_new(degree: usize) -> anyhow::Result<Self> {
        ensure!(
            degree >= 2,
            "Gauss-Legendre quadrature degree must be at least 2, got {}",
            degree
        );
        Ok(Self {
            gauss: GaussLegendre::new(degree).expect("degree validated above"),
            max_iterations: Self::MAX_ITERATIONS,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Arc length of the cubic between parameters 0 and `t`.
    fn length_until<T: FloatingPoint>(&self, cubic: &CubicBezier<T>, t: T) -> T {
        if t <= T::zero() {
            return T::zero();
        }
        let right = t.min(T::one()).to_f64().unwrap();
        let sum = self.gauss.integrate(0., right, |x| {
            let x = T::from_f64(x).unwrap();
            cubic.derivative_at(x).norm().to_f64().unwrap()
        });
        T::from_f64(sum).unwrap()
    }
}

impl Default for GaussLegendreMeasurer {
    fn default() -> Self {
        Self {
            gauss: GaussLegendre::new(16).expect("16 is a valid degree"),
            max_iterations: Self::MAX_ITERATIONS,
        }
    }
}

impl<T: FloatingPoint> Measurer<T> for GaussLegendreMeasurer {
    fn measure_cubic(&self, cubic: &CubicBezier<T>) -> T {
        self.length_until(cubic, T::one())
    }

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn find_cubic_cut_point(&self, cubic: &CubicBezier<T>, m: T) -> T {
        if !(m > T::zero()) {
            return T::zero();
        }
        let total = self.measure_cubic(cubic);
        if m >= total {
            return T::one();
        }

        let tolerance = T::from_f64(1e-9).unwrap() * total.max(T::one());
        let mut start = T::zero();
        let mut end = T::one();

        // binary search
        for _ in 0..self.max_iterations {
            let middle = (start + end) * T::half();
            let length = self.length_until(cubic, middle);
            if (length - m).abs() <= tolerance {
                return middle;
            }
            if length > m {
                end = middle;
            } else {
                start = middle;
            }
        }

        (start + end) * T::half()
    }
}
