//! Sailing-vessel simulation core: wind-driven propulsion, rudder dynamics,
//! cannon aiming, and deck walkability, packaged as a Bevy plugin.
//!
//! The crate owns no rendering, input capture, or UI. The host game fills
//! [`systems::helm::HelmInputBuffer`] with commands each frame, reads the
//! [`resources::Wind`] resource (or overwrites it to inject its own weather),
//! and consumes [`events::CannonFired`] to spawn projectiles. Position and
//! velocity are authoritative on the avian2d rigid body; this crate only
//! applies forces and velocity edits in a fixed per-tick order.

pub mod components;
pub mod events;
pub mod plugins;
pub mod resources;
pub mod systems;
pub mod utils;
