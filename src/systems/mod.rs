pub mod helm;
pub mod propulsion;
pub mod ship;
pub mod turret;
pub mod wind;

pub use helm::*;
pub use propulsion::*;
pub use ship::*;
pub use turret::*;
pub use wind::*;
