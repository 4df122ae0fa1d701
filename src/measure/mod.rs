pub mod measured_polygon;
pub mod measurer;

pub use measured_polygon::*;
pub use measurer::*;
