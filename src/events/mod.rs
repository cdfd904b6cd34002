use bevy::prelude::*;

/// Event emitted for every cannon shot. The host consumes these to
/// instantiate projectiles; with no consumer registered, shots are logged
/// no-ops and the simulation carries on.
#[derive(Event, Debug, Clone, Copy)]
pub struct CannonFired {
    /// The firing vessel.
    pub vessel: Entity,
    /// Muzzle position in world space, one barrel length off the mount.
    pub position: Vec2,
    /// Firing angle in world radians.
    pub angle: f32,
    /// Initial projectile speed: base speed plus inherited vessel speed.
    pub speed: f32,
}

/// Event emitted when a vessel with furled sails drops below the stop
/// threshold and has its velocity zeroed.
#[derive(Event, Debug, Clone, Copy)]
pub struct VesselStopped {
    pub vessel: Entity,
}
