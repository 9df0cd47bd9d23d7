use glam::{IVec3, UVec3, Vec3};
use terrane_core::constants::MAX_RAY_STEPS;
use terrane_core::direction::Face;
use terrane_core::math::{world_to_chunk, world_to_local};
use terrane_core::types::{Block, ChunkCoords};

use crate::block_info::BlockInfo;
use crate::World;

/// First solid block struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The solid block.
    pub block: IVec3,
    /// The last non-solid cell before the hit; where a placed block would go.
    pub previous: IVec3,
    /// Face of `block` the ray entered through. `None` when the ray starts inside it.
    pub face: Option<Face>,
    /// Distance along the ray to the entry point.
    pub distance: f32,
}

impl World {
    /// Chunk and local offset of a world block, if that chunk is active.
    pub fn world_to_local(&self, pos: IVec3) -> Option<(ChunkCoords, UVec3)> {
        let local = world_to_local(pos)?;
        let coords = world_to_chunk(pos);
        self.chunk_map.contains(&coords).then_some((coords, local))
    }

    /// Cursor to a world block; null outside active chunks or the vertical range.
    pub fn block_at(&self, pos: IVec3) -> BlockInfo {
        BlockInfo::at(&self.chunk_map, pos)
    }

    /// Block value at a world position, if loaded.
    pub fn block(&self, pos: IVec3) -> Option<Block> {
        self.block_at(pos).block(&self.chunk_map)
    }

    pub fn is_solid_at(&self, pos: IVec3) -> bool {
        self.block_at(pos).is_solid(&self.chunk_map)
    }

    pub fn is_opaque_at(&self, pos: IVec3) -> bool {
        self.block_at(pos).is_opaque(&self.chunk_map)
    }

    pub fn light_at(&self, pos: IVec3) -> u8 {
        self.block_at(pos).light(&self.chunk_map)
    }

    /// Walk the voxel grid from `origin` along `direction` and report the first
    /// solid block within `max_distance`. Unloaded space is treated as empty.
    /// The walk visits at most `MAX_RAY_STEPS` cells.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let origin_arr = origin.to_array();
        let dir_arr = dir.to_array();

        let mut cell = origin.floor().as_ivec3().to_array();
        let mut step = [0i32; 3];
        let mut t_max = [f32::INFINITY; 3];
        let mut t_delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            let d = dir_arr[axis];
            if d > 0.0 {
                step[axis] = 1;
                t_delta[axis] = 1.0 / d;
                t_max[axis] = (cell[axis] as f32 + 1.0 - origin_arr[axis]) / d;
            } else if d < 0.0 {
                step[axis] = -1;
                t_delta[axis] = -1.0 / d;
                t_max[axis] = (origin_arr[axis] - cell[axis] as f32) / -d;
            }
        }

        let mut previous = IVec3::from_array(cell);
        let mut face = None;
        let mut distance = 0.0;
        for _ in 0..MAX_RAY_STEPS {
            let current = IVec3::from_array(cell);
            if self.is_solid_at(current) {
                return Some(RayHit {
                    block: current,
                    previous,
                    face,
                    distance,
                });
            }
            previous = current;

            let axis = if t_max[0] < t_max[1] && t_max[0] < t_max[2] {
                0
            } else if t_max[1] < t_max[2] {
                1
            } else {
                2
            };
            distance = t_max[axis];
            if distance > max_distance {
                return None;
            }
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];
            face = Some(entry_face(axis, step[axis]));
        }
        None
    }

    /// Distance to the first solid block along a ray, or `max_distance` if none.
    pub fn raycast_distance(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> f32 {
        self.raycast(origin, direction, max_distance)
            .map_or(max_distance, |hit| hit.distance)
    }
}

/// Face a ray crosses when it steps into a cell along `axis` in direction `step`.
fn entry_face(axis: usize, step: i32) -> Face {
    match (axis, step > 0) {
        (0, true) => Face::West,
        (0, false) => Face::East,
        (1, true) => Face::South,
        (1, false) => Face::North,
        (_, true) => Face::Bottom,
        (_, false) => Face::Top,
    }
}
