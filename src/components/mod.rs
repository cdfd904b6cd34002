pub mod hull;
pub mod module;
pub mod vessel;

pub use hull::*;
pub use module::*;
pub use vessel::*;
