//! Sample-point collision between a `Body` and the voxel grid.
//!
//! The body is tested at 26 points on its surface: the 6 face centers, the 12
//! edge midpoints and the 8 corners, always in that order. Each point found
//! inside a solid voxel pushes the body out immediately, so later samples see
//! the corrected position.

use glam::{IVec3, Vec3};
use terrane_world::World;

use crate::body::Body;

/// Read access to voxel solidity.
pub trait SolidQuery {
    fn is_solid(&self, cell: IVec3) -> bool;
}

impl SolidQuery for World {
    fn is_solid(&self, cell: IVec3) -> bool {
        self.is_solid_at(cell)
    }
}

/// Extra distance added to every push so the body ends strictly outside.
pub const SKIN: f32 = 1e-3;

/// Face sample directions.
pub const FACE_SAMPLES: [IVec3; 6] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

/// Edge sample directions: every pair of axes.
pub const EDGE_SAMPLES: [IVec3; 12] = [
    IVec3::new(1, 1, 0),
    IVec3::new(1, -1, 0),
    IVec3::new(-1, 1, 0),
    IVec3::new(-1, -1, 0),
    IVec3::new(1, 0, 1),
    IVec3::new(1, 0, -1),
    IVec3::new(-1, 0, 1),
    IVec3::new(-1, 0, -1),
    IVec3::new(0, 1, 1),
    IVec3::new(0, 1, -1),
    IVec3::new(0, -1, 1),
    IVec3::new(0, -1, -1),
];

/// Corner sample directions.
pub const CORNER_SAMPLES: [IVec3; 8] = [
    IVec3::new(1, 1, 1),
    IVec3::new(1, 1, -1),
    IVec3::new(1, -1, 1),
    IVec3::new(1, -1, -1),
    IVec3::new(-1, 1, 1),
    IVec3::new(-1, 1, -1),
    IVec3::new(-1, -1, 1),
    IVec3::new(-1, -1, -1),
];

/// One positional correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correction {
    /// Sample direction that hit a solid voxel.
    pub sample: IVec3,
    /// Axis pushed along (0 = x, 1 = y, 2 = z).
    pub axis: usize,
    /// Signed distance the body moved.
    pub push: f32,
}

/// Resolve all overlaps in face, edge, corner order. Returns the corrections applied.
pub fn resolve<Q: SolidQuery + ?Sized>(body: &mut Body, world: &Q) -> Vec<Correction> {
    let mut corrections = Vec::new();
    let samples = FACE_SAMPLES
        .iter()
        .chain(EDGE_SAMPLES.iter())
        .chain(CORNER_SAMPLES.iter());
    for &sample in samples {
        if let Some(correction) = resolve_sample(body, world, sample) {
            corrections.push(correction);
        }
    }
    if !corrections.is_empty() {
        log::trace!(
            "{} collision corrections, body now at {}",
            corrections.len(),
            body.position
        );
    }
    corrections
}

fn resolve_sample<Q: SolidQuery + ?Sized>(
    body: &mut Body,
    world: &Q,
    sample: IVec3,
) -> Option<Correction> {
    let point = body.position + sample.as_vec3() * body.half_extents;
    let cell = point.floor().as_ivec3();
    if !world.is_solid(cell) {
        return None;
    }

    // Smallest penetration among the axes this sample involves.
    let (axis, depth, outward) = (0..3)
        .filter(|&axis| sample[axis] != 0)
        .map(|axis| {
            let (depth, outward) = penetration(point[axis], cell[axis], sample[axis]);
            (axis, depth, outward)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let push = outward * (depth + SKIN);
    body.position[axis] += push;
    body.velocity[axis] = 0.0;
    if axis == 2 && push > 0.0 {
        body.grounded = true;
    }
    Some(Correction { sample, axis, push })
}

/// Depth of `coord` inside voxel `cell` measured from the face the sample
/// entered through, plus the direction that leads back out.
fn penetration(coord: f32, cell: i32, sign: i32) -> (f32, f32) {
    if sign > 0 {
        (coord - cell as f32, -1.0)
    } else {
        (cell as f32 + 1.0 - coord, 1.0)
    }
}

/// Whether the body's box overlaps any solid voxel.
pub fn overlaps_solid<Q: SolidQuery + ?Sized>(body: &Body, world: &Q) -> bool {
    let min = body.min();
    let max = body.max();
    let lo = min.floor().as_ivec3();
    let hi = (max - Vec3::splat(1e-6)).floor().as_ivec3();
    for z in lo.z..=hi.z {
        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                if world.is_solid(IVec3::new(x, y, z)) {
                    return true;
                }
            }
        }
    }
    false
}
