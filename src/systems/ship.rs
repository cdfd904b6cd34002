use avian2d::prelude::*;
use bevy::prelude::*;

use crate::components::{Hull, ModuleRack, Vessel};

/// Spawns a vessel with the standard hull and loadout at the given position.
///
/// The entity carries everything the simulation needs: the avian rigid body
/// (authoritative position/velocity), the hull footprint, and the module
/// rack. Despawning the entity releases the modules and the physics body.
pub fn spawn_vessel(commands: &mut Commands, position: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Vessel"),
            Vessel::default(),
            Hull::standard(),
            ModuleRack::standard_loadout(),
            Transform::from_translation(position.extend(0.0)),
            RigidBody::Dynamic,
            // Hull-sized box for mass and world collision; deck walkability
            // uses the hull outline, not this collider.
            Collider::rectangle(210.0, 60.0),
            LinearVelocity(Vec2::ZERO),
            AngularVelocity(0.0),
            ExternalForce::default(),
            // Angular water resistance; linear drag is applied explicitly by
            // the propulsion system.
            AngularDamping(2.0),
        ))
        .id()
}
