pub mod corner_rounding;
pub mod cubic_bezier;
pub use corner_rounding::*;
pub use cubic_bezier::*;
