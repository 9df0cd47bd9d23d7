use glam::Vec3;
use terrane_core::constants::*;
use terrane_core::direction::Cardinal;
use terrane_core::math::chunk_origin;
use terrane_core::types::{Block, ChunkCoords};

use crate::mesh::MeshHandle;

/// One active 16x16x128 column of blocks plus its streaming and meshing state.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Chunk coordinate in chunk-space.
    coords: ChunkCoords,
    /// Exactly `BLOCKS_PER_CHUNK` blocks, indexed by `addressing::pack`.
    blocks: Box<[Block]>,
    /// Coordinates of the active lateral neighbors, indexed by `Cardinal::index`.
    neighbors: [Option<ChunkCoords>; 4],
    /// Geometry must be rebuilt before the next draw.
    mesh_dirty: bool,
    /// Renderer-side mesh, if one has been uploaded.
    mesh: Option<MeshHandle>,
    vertex_count: usize,
}

impl Chunk {
    /// Wrap generated or decoded block data. `blocks` must hold one full chunk.
    pub fn from_blocks(coords: ChunkCoords, blocks: Vec<Block>) -> Self {
        debug_assert_eq!(blocks.len(), BLOCKS_PER_CHUNK);
        Self {
            coords,
            blocks: blocks.into_boxed_slice(),
            neighbors: [None; 4],
            mesh_dirty: true,
            mesh: None,
            vertex_count: 0,
        }
    }

    /// A chunk with every block set to `block`.
    pub fn filled(coords: ChunkCoords, block: Block) -> Self {
        Self::from_blocks(coords, vec![block; BLOCKS_PER_CHUNK])
    }

    pub fn coords(&self) -> ChunkCoords {
        self.coords
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Block at a packed index. Panics if the index is out of range.
    pub fn block(&self, index: usize) -> Block {
        self.blocks[index]
    }

    pub fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    /// World-space axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let min = chunk_origin(self.coords);
        let size = Vec3::new(
            CHUNK_WIDTH as f32,
            CHUNK_DEPTH as f32,
            CHUNK_HEIGHT as f32,
        );
        (min, min + size)
    }

    /// Active neighbor in a lateral direction, if linked.
    pub fn neighbor(&self, dir: Cardinal) -> Option<ChunkCoords> {
        self.neighbors[dir.index()]
    }

    pub fn neighbors(&self) -> [Option<ChunkCoords>; 4] {
        self.neighbors
    }

    /// Links are maintained by `ChunkMap` so both sides stay symmetric.
    pub(crate) fn set_neighbor(&mut self, dir: Cardinal, coords: Option<ChunkCoords>) {
        self.neighbors[dir.index()] = coords;
    }

    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    pub fn mark_mesh_dirty(&mut self) {
        self.mesh_dirty = true;
    }

    pub(crate) fn clear_mesh_dirty(&mut self) {
        self.mesh_dirty = false;
    }

    pub fn mesh_handle(&self) -> Option<MeshHandle> {
        self.mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub(crate) fn set_mesh(&mut self, mesh: Option<MeshHandle>, vertex_count: usize) {
        self.mesh = mesh;
        self.vertex_count = vertex_count;
    }

    /// Detach the mesh handle so the caller can destroy it.
    pub(crate) fn take_mesh(&mut self) -> Option<MeshHandle> {
        self.vertex_count = 0;
        self.mesh.take()
    }
}
