use anyhow::ensure;

use crate::misc::{is_progress_in_range, positive_modulo, progress_distance, FloatingPoint};

/// Piecewise linear, cyclic mapping between two progress spaces.
///
/// The mapping is defined by pairs of progress values `(source, target)`.
/// Between two consecutive pairs, values are mapped linearly, wrapping around 1 when needed.
/// Both sequences must increase monotonically, except for at most one wrap around 1.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleMapper<T: FloatingPoint> {
    source_values: Vec<T>,
    target_values: Vec<T>,
}

impl<T: FloatingPoint> DoubleMapper<T> {
    /// Create a mapper from `(source, target)` pairs.
    /// # Failures
    /// - if fewer than two pairs are given
    /// - if a value lies outside `[0, 1)`
    /// - if a sequence repeats a value, cyclically within `T::distance_epsilon()`
    /// - if a sequence wraps around 1 more than once
    /// # Example
    /// ```
    /// use shapemorph::prelude::*;
    /// use approx::assert_relative_eq;
    ///
    /// let mapper = DoubleMapper::try_new(&[(0., 0.), (0.5, 0.25)]).unwrap();
    /// assert_relative_eq!(mapper.map(0.25).unwrap(), 0.125);
    /// assert_relative_eq!(mapper.map_back(0.125).unwrap(), 0.25);
    /// ```
    pub fn try_new(mappings: &[(T, T)]) -> anyhow::Result<Self> {
        let (source_values, target_values): (Vec<_>, Vec<_>) = mappings.iter().copied().unzip();
        validate_progress(&source_values)?;
        validate_progress(&target_values)?;
        Ok(Self {
            source_values,
            target_values,
        })
    }

    /// The mapper sending every value to itself.
    pub fn identity() -> Self {
        Self {
            source_values: vec![T::zero(), T::half()],
            target_values: vec![T::zero(), T::half()],
        }
    }

    pub fn source_values(&self) -> &[T] {
        &self.source_values
    }

    pub fn target_values(&self) -> &[T] {
        &self.target_values
    }

    /// Map a source progress in `[0, 1]` to the target space.
    pub fn map(&self, x: T) -> anyhow::Result<T> {
        linear_map(&self.source_values, &self.target_values, x)
    }

    /// Map a target progress in `[0, 1]` back to the source space.
    pub fn map_back(&self, x: T) -> anyhow::Result<T> {
        linear_map(&self.target_values, &self.source_values, x)
    }
}

fn validate_progress<T: FloatingPoint>(values: &[T]) -> anyhow::Result<()> {
    let Some(last) = values.last() else {
        anyhow::bail!("DoubleMapper needs at least one value");
    };

    let mut prev = *last;
    let mut wraps = 0;
    for &curr in values {
        ensure!(
            T::zero() <= curr && curr < T::one(),
            "Progress outside of range: {:?}",
            values
        );
        ensure!(
            progress_distance(curr, prev) > T::distance_epsilon(),
            "Progress repeats a value: {:?}",
            values
        );
        if curr < prev {
            wraps += 1;
            ensure!(wraps <= 1, "Progress wraps more than once: {:?}", values);
        }
        prev = curr;
    }
    Ok(())
}

fn linear_map<T: FloatingPoint>(x_values: &[T], y_values: &[T], x: T) -> anyhow::Result<T> {
    ensure!(
        T::zero() <= x && x <= T::one(),
        "Invalid progress: {:?}",
        x
    );
    let n = x_values.len();
    let start = (0..n)
        .find(|i| is_progress_in_range(x, x_values[*i], x_values[(*i + 1) % n]))
        .ok_or_else(|| anyhow::anyhow!("No segment contains progress {:?}", x))?;
    let end = (start + 1) % n;

    let one = T::one();
    let size_x = positive_modulo(x_values[end] - x_values[start], one);
    let size_y = positive_modulo(y_values[end] - y_values[start], one);
    let position = if size_x < T::from_f64(0.001).unwrap() {
        T::half()
    } else {
        positive_modulo(x - x_values[start], one) / size_x
    };
    Ok(positive_modulo(y_values[start] + size_y * position, one))
}
