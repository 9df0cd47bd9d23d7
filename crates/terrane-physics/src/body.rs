use glam::Vec3;

/// How a body moves between collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementMode {
    /// Gravity applies; friction only slows horizontal motion.
    #[default]
    Walking,
    /// No gravity; friction slows all three axes.
    Flying,
}

/// Half extents of the default player volume (0.6 x 0.6 x 1.8).
pub const PLAYER_HALF_EXTENTS: Vec3 = Vec3::new(0.3, 0.3, 0.9);

/// Axis-aligned box moving through the voxel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Center of the box in world units.
    pub position: Vec3,
    pub half_extents: Vec3,
    pub velocity: Vec3,
    pub mode: MovementMode,
    /// Set when the last collision pass pushed the body up out of the ground.
    pub grounded: bool,
}

impl Body {
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            position,
            half_extents,
            velocity: Vec3::ZERO,
            mode: MovementMode::Walking,
            grounded: false,
        }
    }

    /// A player-sized walking body.
    pub fn player(position: Vec3) -> Self {
        Self::new(position, PLAYER_HALF_EXTENTS)
    }

    pub fn min(&self) -> Vec3 {
        self.position - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.position + self.half_extents
    }

    /// Position of the feet (bottom face center).
    pub fn feet(&self) -> Vec3 {
        self.position - Vec3::Z * self.half_extents.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_bounds() {
        let body = Body::player(Vec3::new(1.0, 2.0, 3.0));
        assert!(body.min().abs_diff_eq(Vec3::new(0.7, 1.7, 2.1), 1e-6));
        assert!(body.max().abs_diff_eq(Vec3::new(1.3, 2.3, 3.9), 1e-6));
        assert!(body.feet().abs_diff_eq(Vec3::new(1.0, 2.0, 2.1), 1e-6));
        assert_eq!(body.mode, MovementMode::Walking);
        assert!(!body.grounded);
    }
}
