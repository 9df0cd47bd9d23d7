//! Breadth-first light propagation over the active chunk graph.
//!
//! Every block carries a 4-bit light level. A non-opaque block settles at the
//! largest of its own emission, full sky light when the column above it is
//! open, and one less than its brightest face neighbor. Opaque blocks only
//! carry their own emission. Blocks whose inputs may have changed are queued
//! with their dirty bit set; draining the queue recomputes each one and
//! re-queues the neighbors of any block whose level moved.

use std::collections::VecDeque;

use terrane_core::addressing::{pack, unpack};
use terrane_core::constants::*;
use terrane_core::direction::SPILL_FACES;
use terrane_core::types::{Block, ChunkCoords};
use terrane_core::BlockTable;

use crate::block_info::BlockInfo;
use crate::chunk_map::ChunkMap;

/// Pending light work for the whole world.
#[derive(Debug, Default)]
pub struct LightEngine {
    queue: VecDeque<BlockInfo>,
}

impl LightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued blocks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue a block for recomputation. Null cursors, evicted chunks and blocks
    /// that are already queued are skipped. Returns whether it was queued.
    pub fn push(&mut self, map: &mut ChunkMap, info: BlockInfo) -> bool {
        let Some(block) = info.block_mut(map) else {
            return false;
        };
        if block.flags.is_dirty() {
            return false;
        }
        block.flags.set_dirty(true);
        self.queue.push_back(info);
        true
    }

    /// Light a freshly activated chunk.
    ///
    /// Resets every level in the chunk, lights open sky columns, then queues the
    /// dark non-opaque blocks next to sky (including those across linked
    /// borders), every block that already carries light or emits it, and the
    /// chunk's non-opaque border blocks so they pick up light from neighbors
    /// that were active first.
    pub fn seed_chunk(&mut self, map: &mut ChunkMap, table: &BlockTable, coords: ChunkCoords) {
        let Some(chunk) = map.get_mut(&coords) else {
            return;
        };

        for block in chunk.blocks_mut() {
            block.flags.set_light(0);
            block.flags.set_sky(false);
            block.flags.set_dirty(false);
        }

        for y in 0..CHUNK_DEPTH {
            for x in 0..CHUNK_WIDTH {
                for z in (0..CHUNK_HEIGHT).rev() {
                    let block = chunk.block_mut(pack(x, y, z));
                    if block.flags.is_opaque() {
                        break;
                    }
                    block.flags.set_sky(true);
                    block.flags.set_light(SKY_LIGHT);
                }
            }
        }

        let seeds = Self::collect_seeds(map, table, coords);
        log::trace!(
            "seeding light for chunk ({}, {}): {} candidates",
            coords.x,
            coords.y,
            seeds.len()
        );
        for info in seeds {
            self.push(map, info);
        }
    }

    fn collect_seeds(map: &ChunkMap, table: &BlockTable, coords: ChunkCoords) -> Vec<BlockInfo> {
        let Some(chunk) = map.get(&coords) else {
            return Vec::new();
        };
        let mut seeds = Vec::new();
        for (index, block) in chunk.blocks().iter().enumerate() {
            let info = BlockInfo::new(coords, index);

            if block.flags.is_sky() {
                for face in SPILL_FACES {
                    let neighbor = info.neighbor(map, face);
                    let spills = neighbor
                        .block(map)
                        .is_some_and(|b| !b.flags.is_opaque() && !b.flags.is_sky());
                    if spills {
                        seeds.push(neighbor);
                    }
                }
            }

            if block.flags.light() > 0 || table.emission(block.type_id) > 0 {
                seeds.push(info);
            }

            let (x, y, _) = unpack(index);
            let on_border = x == 0 || x == X_MASK || y == 0 || y == Y_MASK;
            if on_border && !block.flags.is_opaque() {
                seeds.push(info);
            }
        }
        seeds
    }

    /// Queue the work caused by replacing the block at `info`.
    ///
    /// Sky exposure of the whole column is refreshed first; the edited block, its
    /// six neighbors and every column block whose exposure flipped are queued.
    pub fn mark_edit(&mut self, map: &mut ChunkMap, info: BlockInfo) {
        let Some(coords) = info.chunk() else {
            return;
        };
        let (x, y, _) = info.local();
        let flipped = Self::refresh_column(map, coords, x, y);

        self.push(map, info);
        for neighbor in info.neighbors(map) {
            self.push(map, neighbor);
        }
        for index in flipped {
            self.push(map, BlockInfo::new(coords, index));
        }
    }

    /// Recompute sky bits for one column top-down. Returns the indices that changed.
    fn refresh_column(map: &mut ChunkMap, coords: ChunkCoords, x: u32, y: u32) -> Vec<usize> {
        let Some(chunk) = map.get_mut(&coords) else {
            return Vec::new();
        };
        let mut open = true;
        let mut flipped = Vec::new();
        for z in (0..CHUNK_HEIGHT).rev() {
            let index = pack(x, y, z);
            let block = chunk.block_mut(index);
            if block.flags.is_opaque() {
                open = false;
            }
            if block.flags.is_sky() != open {
                block.flags.set_sky(open);
                flipped.push(index);
            }
        }
        flipped
    }

    /// Process the queue until it is empty. Returns the number of blocks recomputed.
    pub fn drain(&mut self, map: &mut ChunkMap, table: &BlockTable) -> usize {
        let mut processed = 0;
        while let Some(info) = self.queue.pop_front() {
            let Some(block) = info.block_mut(map) else {
                continue;
            };
            block.flags.set_dirty(false);
            let block = *block;
            processed += 1;

            let ideal = Self::ideal_light(map, table, info, block);
            if ideal == block.flags.light() {
                continue;
            }
            if let Some(stored) = info.block_mut(map) {
                stored.flags.set_light(ideal);
            }

            let owner = info.chunk();
            if let Some(chunk) = owner.and_then(|c| map.get_mut(&c)) {
                chunk.mark_mesh_dirty();
            }
            for neighbor in info.neighbors(map) {
                let Some(neighbor_block) = neighbor.block(map) else {
                    continue;
                };
                if neighbor.chunk() != owner {
                    if let Some(chunk) = neighbor.chunk().and_then(|c| map.get_mut(&c)) {
                        chunk.mark_mesh_dirty();
                    }
                }
                if !neighbor_block.flags.is_opaque() {
                    self.push(map, neighbor);
                }
            }
        }
        if processed > 0 {
            log::trace!("light drain recomputed {processed} blocks");
        }
        processed
    }

    /// Light a block should hold given its neighbors. Opaque blocks only keep
    /// their own emission, so light never passes through walls.
    fn ideal_light(map: &ChunkMap, table: &BlockTable, info: BlockInfo, block: Block) -> u8 {
        let emission = table.emission(block.type_id).min(MAX_LIGHT);
        if block.flags.is_opaque() {
            return emission;
        }
        let mut ideal = emission;
        if block.flags.is_sky() {
            ideal = ideal.max(SKY_LIGHT);
        }
        for neighbor in info.neighbors(map) {
            ideal = ideal.max(neighbor.light(map).saturating_sub(1));
        }
        ideal.min(MAX_LIGHT)
    }
}
