use crate::misc::FloatingPoint;

/// Describes how a polygon vertex is rounded.
///
/// `radius` is the radius of the circular arc that replaces the corner,
/// `smoothing` in `[0, 1]` blends the arc into the adjacent edges with flanking curves:
/// 0 gives a pure circular arc, 1 uses as much of the edges as possible.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CornerRounding<T: FloatingPoint> {
    radius: T,
    smoothing: T,
}

impl<T: FloatingPoint> CornerRounding<T> {
    pub fn new(radius: T, smoothing: T) -> Self {
        Self { radius, smoothing }
    }

    /// A circular rounding without smoothing.
    pub fn from_radius(radius: T) -> Self {
        Self::new(radius, T::zero())
    }

    /// A sharp corner.
    pub fn unrounded() -> Self {
        Self::new(T::zero(), T::zero())
    }

    pub fn radius(&self) -> T {
        self.radius
    }

    pub fn smoothing(&self) -> T {
        self.smoothing
    }

    pub fn with_radius(mut self, radius: T) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_smoothing(mut self, smoothing: T) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl<T: FloatingPoint> Default for CornerRounding<T> {
    fn default() -> Self {
        Self::unrounded()
    }
}
