#![allow(clippy::needless_range_loop)]

mod bounding_box;
mod curve;
mod feature;
mod mapping;
mod measure;
mod misc;
mod morph;
mod polygon;
mod sink;

pub mod prelude {
    pub use crate::bounding_box::*;
    pub use crate::curve::*;
    pub use crate::feature::*;
    pub use crate::mapping::*;
    pub use crate::measure::*;
    pub use crate::misc::*;
    pub use crate::morph::*;
    pub use crate::polygon::*;
    pub use crate::sink::*;
}
