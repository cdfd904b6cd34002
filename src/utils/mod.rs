pub mod curve;
pub mod frame;

pub use curve::*;
pub use frame::*;
