pub mod floating_point;
pub mod invertible;
pub mod line;
pub mod orientation;
pub mod progress;
pub mod transformable;

pub use floating_point::*;
pub use invertible::*;
pub use line::*;
pub use orientation::*;
pub use progress::*;
pub use transformable::*;
