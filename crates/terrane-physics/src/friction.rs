use terrane_core::math::smoothstep;

use crate::body::{Body, MovementMode};

/// Deceleration in world units per second squared.
pub const WALK_FRICTION: f32 = 12.0;
pub const FLY_FRICTION: f32 = 6.0;

/// Speed below which the friction direction ramps smoothly through zero.
const SIGN_RAMP: f32 = 0.05;

/// Sign of `v`, eased across [-SIGN_RAMP, SIGN_RAMP] so tiny velocities feel
/// proportionally less friction.
pub fn smooth_sign(v: f32) -> f32 {
    smoothstep(-SIGN_RAMP, SIGN_RAMP, v) * 2.0 - 1.0
}

/// Slow one velocity component by `rate * dt`, stopping at zero rather than
/// reversing.
pub fn decay(v: f32, rate: f32, dt: f32) -> f32 {
    let next = v - smooth_sign(v) * rate * dt;
    if next * v <= 0.0 {
        0.0
    } else {
        next
    }
}

/// Walking bodies lose horizontal speed; flying bodies lose speed on every axis.
pub fn apply_friction(body: &mut Body, dt: f32) {
    match body.mode {
        MovementMode::Walking => {
            body.velocity.x = decay(body.velocity.x, WALK_FRICTION, dt);
            body.velocity.y = decay(body.velocity.y, WALK_FRICTION, dt);
        }
        MovementMode::Flying => {
            body.velocity.x = decay(body.velocity.x, FLY_FRICTION, dt);
            body.velocity.y = decay(body.velocity.y, FLY_FRICTION, dt);
            body.velocity.z = decay(body.velocity.z, FLY_FRICTION, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_smooth_sign() {
        assert_eq!(smooth_sign(1.0), 1.0);
        assert_eq!(smooth_sign(-1.0), -1.0);
        assert_eq!(smooth_sign(0.0), 0.0);
        let small = smooth_sign(0.01);
        assert!(small > 0.0 && small < 1.0);
    }

    #[test]
    fn test_decay_never_flips_sign() {
        assert_eq!(decay(0.1, 100.0, 1.0), 0.0);
        assert_eq!(decay(-0.1, 100.0, 1.0), 0.0);
        assert_eq!(decay(0.0, 100.0, 1.0), 0.0);
        let v = decay(5.0, 12.0, 0.1);
        assert!((v - 3.8).abs() < 1e-5);
    }

    #[test]
    fn test_walking_keeps_vertical_velocity() {
        let mut body = Body::player(Vec3::ZERO);
        body.velocity = Vec3::new(4.0, -4.0, -9.0);
        apply_friction(&mut body, 0.1);
        assert!(body.velocity.x > 0.0 && body.velocity.x < 4.0);
        assert!(body.velocity.y < 0.0 && body.velocity.y > -4.0);
        assert_eq!(body.velocity.z, -9.0);
    }

    #[test]
    fn test_flying_slows_every_axis() {
        let mut body = Body::player(Vec3::ZERO);
        body.mode = MovementMode::Flying;
        body.velocity = Vec3::new(1.0, 1.0, 1.0);
        apply_friction(&mut body, 0.05);
        assert!(body.velocity.z < 1.0);

        for _ in 0..100 {
            apply_friction(&mut body, 0.05);
        }
        assert_eq!(body.velocity, Vec3::ZERO);
    }
}
