use nalgebra::RealField;
use num_traits::ToPrimitive;

/// Distance under which two coordinates are considered coincident.
pub const DISTANCE_EPSILON: f64 = 1e-4;

/// Tolerance used when comparing outline progress values while matching curves.
pub const ANGLE_EPSILON: f64 = 1e-4;

/// Trait for floating point types (f32, f64)
/// Mainly used to identify the type of the field in nalgebra
pub trait FloatingPoint: RealField + ToPrimitive + Copy {
    fn distance_epsilon() -> Self {
        Self::from_f64(DISTANCE_EPSILON).unwrap()
    }

    fn angle_epsilon() -> Self {
        Self::from_f64(ANGLE_EPSILON).unwrap()
    }

    fn half() -> Self {
        Self::from_f64(0.5).unwrap()
    }
}

impl FloatingPoint for f32 {}
impl FloatingPoint for f64 {}
