pub mod polygon_option;
mod rounded_corner;
pub mod rounded_polygon;
mod shapes;

pub use polygon_option::*;
pub(crate) use rounded_corner::*;
pub use rounded_polygon::*;

#[cfg(test)]
mod tests;
