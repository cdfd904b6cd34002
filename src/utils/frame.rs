//! Coordinate frame conversion between world space and vessel-local space.
//!
//! Local frame convention: +X is the bow axis, +Y is port. Conversions are
//! always recomputed from the current heading, never incrementally updated,
//! so repeated round trips accumulate no error.

use bevy::prelude::*;

/// Converts a world-space point into the vessel's local frame.
pub fn world_to_local(world_point: Vec2, vessel_position: Vec2, heading: f32) -> Vec2 {
    Vec2::from_angle(-heading).rotate(world_point - vessel_position)
}

/// Converts a vessel-local point back into world space.
pub fn local_to_world(local_point: Vec2, vessel_position: Vec2, heading: f32) -> Vec2 {
    Vec2::from_angle(heading).rotate(local_point) + vessel_position
}

/// Extracts the heading angle (Z rotation, radians) from a physics transform.
///
/// At heading 0 the bow points along world +X.
pub fn heading_of(transform: &Transform) -> f32 {
    let forward = (transform.rotation * Vec3::X).truncate();
    forward.y.atan2(forward.x)
}

/// Wraps an angle in degrees into (-180, 180].
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation in degrees taking `from` onto `to`.
pub fn shortest_arc_degrees(from: f32, to: f32) -> f32 {
    wrap_degrees(to - from)
}
