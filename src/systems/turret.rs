//! Per-tick module updates, cannon aiming, and firing.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::components::{ModuleKind, ModuleRack, Vessel};
use crate::events::CannonFired;
use crate::resources::CannonConfig;
use crate::systems::helm::HelmInputBuffer;
use crate::utils::frame::{heading_of, local_to_world, world_to_local};

/// Steps every mounted module: turret convergence and reload countdowns for
/// cannons, rudder mirroring for the wheel.
pub fn module_update_system(
    config: Res<CannonConfig>,
    time: Res<Time>,
    mut query: Query<(&Vessel, &mut ModuleRack)>,
) {
    let dt = time.delta_secs();
    for (vessel, mut rack) in &mut query {
        for (_, module) in rack.iter_mut() {
            module.update(dt, vessel.rudder_angle, &config);
        }
    }
}

/// System that fires all loaded cannons when a fire order is buffered,
/// optionally aiming them at a world target first.
///
/// Each shot emits a [`CannonFired`] event carrying the muzzle position
/// (one barrel length off the mount along the firing angle) and a
/// projectile speed that inherits a fraction of the vessel's own speed.
/// Unloaded cannons simply do not fire; an order with no loaded cannon at
/// all is a logged no-op.
pub fn cannon_fire_system(
    input: Res<HelmInputBuffer>,
    config: Res<CannonConfig>,
    mut events: EventWriter<CannonFired>,
    mut query: Query<(Entity, &Transform, &LinearVelocity, &mut ModuleRack), With<Vessel>>,
) {
    if !input.fire {
        return;
    }

    for (entity, transform, lin_vel, mut rack) in &mut query {
        let heading = heading_of(transform);
        let position = transform.translation.truncate();

        if let Some(world_target) = input.aim_target {
            let local_target = world_to_local(world_target, position, heading);
            for (_, module) in rack.iter_mut() {
                if let ModuleKind::Cannon(cannon) = &mut module.kind {
                    cannon.aim_at(module.position, module.base_rotation, local_target);
                }
            }
        }

        let mut fired = 0;
        let mut held = 0;
        for (_, module) in rack.iter_mut() {
            let base_rotation = module.base_rotation;
            let mount = module.position;
            let ModuleKind::Cannon(cannon) = &mut module.kind else {
                continue;
            };
            if !cannon.try_fire(config.reload_time) {
                held += 1;
                continue;
            }

            // The muzzle points 180 degrees from the mount's rest axis.
            let firing_angle =
                heading + (base_rotation + cannon.turret_angle).to_radians() + std::f32::consts::PI;
            let mount_world = local_to_world(mount, position, heading);
            let spawn = mount_world + Vec2::from_angle(firing_angle) * config.barrel_length;
            let speed = config.projectile_speed + lin_vel.0.length() * config.speed_inheritance;

            events.send(CannonFired {
                vessel: entity,
                position: spawn,
                angle: firing_angle,
                speed,
            });
            fired += 1;
        }

        if fired > 0 {
            info!("broadside: {fired} cannon(s) fired");
        } else if held > 0 {
            debug!("fire order held: no cannon loaded");
        }
    }
}
