use crate::constants::{CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::types::{ChunkCoords, WorldCoord};
use glam::{IVec2, IVec3, UVec3, Vec2, Vec3};

/// Convert a world-space block coordinate to its containing chunk.
pub fn world_to_chunk(world: WorldCoord) -> ChunkCoords {
    IVec2::new(
        world.x.div_euclid(CHUNK_WIDTH as i32),
        world.y.div_euclid(CHUNK_DEPTH as i32),
    )
}

/// Convert a world-space block coordinate to its local offset within a chunk.
///
/// Returns `None` when the vertical coordinate falls outside the chunk height.
pub fn world_to_local(world: WorldCoord) -> Option<UVec3> {
    if world.z < 0 || world.z >= CHUNK_HEIGHT as i32 {
        return None;
    }
    Some(UVec3::new(
        world.x.rem_euclid(CHUNK_WIDTH as i32) as u32,
        world.y.rem_euclid(CHUNK_DEPTH as i32) as u32,
        world.z as u32,
    ))
}

/// Convert a chunk coordinate and local offset back to world-space.
pub fn chunk_local_to_world(chunk: ChunkCoords, local: UVec3) -> WorldCoord {
    IVec3::new(
        chunk.x * CHUNK_WIDTH as i32 + local.x as i32,
        chunk.y * CHUNK_DEPTH as i32 + local.y as i32,
        local.z as i32,
    )
}

/// World-space minimum corner of a chunk's bounding box.
pub fn chunk_origin(chunk: ChunkCoords) -> Vec3 {
    Vec3::new(
        (chunk.x * CHUNK_WIDTH as i32) as f32,
        (chunk.y * CHUNK_DEPTH as i32) as f32,
        0.0,
    )
}

/// Horizontal center of a chunk in world units.
pub fn chunk_center(chunk: ChunkCoords) -> Vec2 {
    let origin = chunk_origin(chunk);
    Vec2::new(
        origin.x + CHUNK_WIDTH as f32 * 0.5,
        origin.y + CHUNK_DEPTH as f32 * 0.5,
    )
}

/// Chunk containing a continuous world position.
pub fn position_to_chunk(position: Vec3) -> ChunkCoords {
    world_to_chunk(position.floor().as_ivec3())
}

/// Squared horizontal distance from a world position to a chunk's center.
pub fn chunk_distance_sq(chunk: ChunkCoords, position: Vec3) -> f32 {
    chunk_center(chunk).distance_squared(position.truncate())
}

/// Largest number of chunk centers within `range` of any single observer.
///
/// Observer offsets are sampled on a half-unit grid over one quarter of a
/// chunk; the lattice is symmetric about the chunk center, so that quarter
/// covers every position.
pub fn max_chunks_in_range(range: f32) -> usize {
    let reach = (range / CHUNK_WIDTH as f32).ceil() as i32 + 1;
    let range_sq = range * range;
    let steps = CHUNK_WIDTH as i32;
    let mut most = 0;
    for sy in 0..=steps {
        for sx in 0..=steps {
            let observer = Vec2::new(sx as f32 * 0.5, sy as f32 * 0.5);
            let mut count = 0;
            for cy in -reach..=reach {
                for cx in -reach..=reach {
                    if chunk_center(IVec2::new(cx, cy)).distance_squared(observer) <= range_sq {
                        count += 1;
                    }
                }
            }
            most = most.max(count);
        }
    }
    most
}

/// Hermite smoothstep on [edge0, edge1].
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
