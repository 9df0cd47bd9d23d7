//! Axis-aligned body movement against the voxel grid.

pub mod body;
pub mod collision;
pub mod friction;

pub use body::{Body, MovementMode};
pub use collision::{Correction, SolidQuery};

use glam::Vec3;

/// Downward acceleration for walking bodies, in world units per second squared.
pub const GRAVITY: f32 = 24.0;
/// Fastest a walking body may fall.
pub const TERMINAL_VELOCITY: f32 = 60.0;

/// Advance a body by `dt` seconds: gravity (walking only), integration,
/// collision resolution, then friction. Returns the collision corrections.
pub fn step<Q: SolidQuery + ?Sized>(body: &mut Body, world: &Q, dt: f32) -> Vec<Correction> {
    if body.mode == MovementMode::Walking {
        body.velocity.z = (body.velocity.z - GRAVITY * dt).max(-TERMINAL_VELOCITY);
    }
    body.position += body.velocity * dt;
    body.grounded = false;
    let corrections = collision::resolve(body, world);
    friction::apply_friction(body, dt);
    corrections
}

/// Apply an instantaneous velocity change, e.g. a jump or input impulse.
pub fn apply_impulse(body: &mut Body, delta_v: Vec3) {
    body.velocity += delta_v;
}
