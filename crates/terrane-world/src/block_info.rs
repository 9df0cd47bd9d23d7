use glam::IVec3;
use terrane_core::addressing::{pack, unpack};
use terrane_core::constants::*;
use terrane_core::direction::{Cardinal, Face, ALL_FACES};
use terrane_core::math::{chunk_local_to_world, world_to_chunk, world_to_local};
use terrane_core::types::{Block, ChunkCoords};

use crate::chunk_map::ChunkMap;

/// Lightweight cursor naming one block: an owning chunk plus a packed index.
///
/// A cursor with no chunk is the null cursor. A cursor whose chunk has since
/// been evicted resolves to nothing and behaves like null for every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockInfo {
    chunk: Option<ChunkCoords>,
    index: usize,
}

impl BlockInfo {
    pub const NULL: BlockInfo = BlockInfo {
        chunk: None,
        index: 0,
    };

    pub fn new(chunk: ChunkCoords, index: usize) -> Self {
        debug_assert!(index < BLOCKS_PER_CHUNK);
        Self {
            chunk: Some(chunk),
            index,
        }
    }

    /// Cursor for a world block coordinate, or null when its chunk is not active
    /// or the height is out of range.
    pub fn at(map: &ChunkMap, world: IVec3) -> Self {
        let Some(local) = world_to_local(world) else {
            return Self::NULL;
        };
        let chunk = world_to_chunk(world);
        if !map.contains(&chunk) {
            return Self::NULL;
        }
        Self::new(chunk, pack(local.x, local.y, local.z))
    }

    pub fn is_null(&self) -> bool {
        self.chunk.is_none()
    }

    pub fn chunk(&self) -> Option<ChunkCoords> {
        self.chunk
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Local (x, y, z) within the owning chunk.
    pub fn local(&self) -> (u32, u32, u32) {
        unpack(self.index)
    }

    /// World block coordinate, if the cursor is non-null.
    pub fn world_coord(&self) -> Option<IVec3> {
        let chunk = self.chunk?;
        let (x, y, z) = unpack(self.index);
        Some(chunk_local_to_world(chunk, glam::UVec3::new(x, y, z)))
    }

    /// Current block value, or `None` for null or evicted cursors.
    pub fn block(&self, map: &ChunkMap) -> Option<Block> {
        let chunk = self.chunk?;
        map.get(&chunk).map(|c| c.block(self.index))
    }

    pub fn block_mut<'a>(&self, map: &'a mut ChunkMap) -> Option<&'a mut Block> {
        let chunk = self.chunk?;
        map.get_mut(&chunk).map(|c| c.block_mut(self.index))
    }

    pub fn is_opaque(&self, map: &ChunkMap) -> bool {
        self.block(map).is_some_and(|b| b.flags.is_opaque())
    }

    pub fn is_solid(&self, map: &ChunkMap) -> bool {
        self.block(map).is_some_and(|b| b.flags.is_solid())
    }

    pub fn is_sky(&self, map: &ChunkMap) -> bool {
        self.block(map).is_some_and(|b| b.flags.is_sky())
    }

    pub fn is_dirty(&self, map: &ChunkMap) -> bool {
        self.block(map).is_some_and(|b| b.flags.is_dirty())
    }

    /// Light level; 0 for null cursors.
    pub fn light(&self, map: &ChunkMap) -> u8 {
        self.block(map).map_or(0, |b| b.flags.light())
    }

    /// The face-adjacent block. Lateral steps off the chunk edge follow the
    /// chunk's neighbor link and yield null when no neighbor is linked. Steps
    /// above the top or below the bottom layer always yield null.
    pub fn neighbor(&self, map: &ChunkMap, face: Face) -> BlockInfo {
        let Some(coords) = self.chunk else {
            return Self::NULL;
        };
        let (x, y, z) = unpack(self.index);
        match face {
            Face::East if x < X_MASK => Self::new(coords, self.index + 1),
            Face::East => Self::across(map, coords, Cardinal::East, pack(0, y, z)),
            Face::West if x > 0 => Self::new(coords, self.index - 1),
            Face::West => Self::across(map, coords, Cardinal::West, pack(X_MASK, y, z)),
            Face::North if y < Y_MASK => Self::new(coords, self.index + STRIDE_Y),
            Face::North => Self::across(map, coords, Cardinal::North, pack(x, 0, z)),
            Face::South if y > 0 => Self::new(coords, self.index - STRIDE_Y),
            Face::South => Self::across(map, coords, Cardinal::South, pack(x, Y_MASK, z)),
            Face::Top if z < Z_MASK => Self::new(coords, self.index + STRIDE_Z),
            Face::Bottom if z > 0 => Self::new(coords, self.index - STRIDE_Z),
            Face::Top | Face::Bottom => Self::NULL,
        }
    }

    /// All six face neighbors in `ALL_FACES` order.
    pub fn neighbors(&self, map: &ChunkMap) -> [BlockInfo; 6] {
        ALL_FACES.map(|face| self.neighbor(map, face))
    }

    fn across(map: &ChunkMap, coords: ChunkCoords, dir: Cardinal, index: usize) -> BlockInfo {
        match map.linked(&coords, dir) {
            Some(neighbor) => Self::new(neighbor, index),
            None => Self::NULL,
        }
    }
}
