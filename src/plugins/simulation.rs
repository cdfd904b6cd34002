use avian2d::prelude::*;
use bevy::prelude::*;

use crate::components::{Hull, ModuleRack, Vessel};
use crate::events::{CannonFired, VesselStopped};
use crate::resources::{CannonConfig, VesselPhysicsConfig, Wind, WindConfig};
use crate::systems::helm::{consume_helm_input, helm_system, HelmInputBuffer};
use crate::systems::propulsion::propulsion_system;
use crate::systems::turret::{cannon_fire_system, module_update_system};
use crate::systems::wind::wind_system;

/// The vessel simulation: physics, wind, helm, propulsion, and armament.
///
/// Systems run in `FixedUpdate` in a fixed order (wind, then forces, then
/// module state) so every tick reads a consistent world. Avian integrates
/// the rigid bodies afterwards in its own schedule.
pub struct VesselSimPlugin;

impl Plugin for VesselSimPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .insert_resource(Gravity(Vec2::ZERO))
            .init_resource::<Wind>()
            .init_resource::<WindConfig>()
            .init_resource::<VesselPhysicsConfig>()
            .init_resource::<CannonConfig>()
            .init_resource::<HelmInputBuffer>()
            .add_event::<CannonFired>()
            .add_event::<VesselStopped>()
            .register_type::<Vessel>()
            .register_type::<Hull>()
            .register_type::<ModuleRack>()
            .add_systems(
                FixedUpdate,
                (
                    wind_system,
                    helm_system,
                    propulsion_system,
                    module_update_system,
                    cannon_fire_system,
                    consume_helm_input,
                )
                    .chain(),
            );
    }
}
