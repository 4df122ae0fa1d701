pub mod double_mapper;
pub mod feature_mapping;

pub use double_mapper::*;
pub use feature_mapping::*;
