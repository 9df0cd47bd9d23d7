//! Single source of truth for shared constants.
//! Chunk dimensions are compile-time powers of two; the persistence header
//! records them so saves from an incompatible build are rejected.

/// Bits used for the local X coordinate (east-west).
pub const BITS_X: u32 = 4;

/// Bits used for the local Y coordinate (north-south).
pub const BITS_Y: u32 = 4;

/// Bits used for the local Z coordinate (vertical).
pub const BITS_Z: u32 = 7;

/// Chunk extent along X in blocks.
pub const CHUNK_WIDTH: u32 = 1 << BITS_X;

/// Chunk extent along Y in blocks.
pub const CHUNK_DEPTH: u32 = 1 << BITS_Y;

/// Chunk extent along Z in blocks. Chunks are never stacked vertically.
pub const CHUNK_HEIGHT: u32 = 1 << BITS_Z;

/// Mask selecting X after shifting.
pub const X_MASK: u32 = CHUNK_WIDTH - 1;

/// Mask selecting Y after shifting.
pub const Y_MASK: u32 = CHUNK_DEPTH - 1;

/// Mask selecting Z after shifting.
pub const Z_MASK: u32 = CHUNK_HEIGHT - 1;

/// Index stride between two blocks adjacent along Y.
pub const STRIDE_Y: usize = CHUNK_WIDTH as usize;

/// Index stride between two blocks adjacent along Z.
pub const STRIDE_Z: usize = (CHUNK_WIDTH * CHUNK_DEPTH) as usize;

/// Total blocks per chunk (16 * 16 * 128).
pub const BLOCKS_PER_CHUNK: usize = (CHUNK_WIDTH * CHUNK_DEPTH * CHUNK_HEIGHT) as usize;

/// Highest representable light level (4-bit nibble).
pub const MAX_LIGHT: u8 = 15;

/// Light level assigned to sky-exposed blocks.
pub const SKY_LIGHT: u8 = 15;

/// Type id reserved for air.
pub const AIR_ID: u8 = 0;

/// Default horizontal distance (world units) within which chunks are kept active.
pub const DEFAULT_MAX_RANGE: f32 = 96.0;

/// Default hard cap on active chunks. Reaching it forces an eviction.
pub const DEFAULT_HARD_CAP: usize = 160;

/// Default soft target for active chunks, below the hard cap.
pub const DEFAULT_SOFT_TARGET: usize = 128;

/// Default water level for procedural terrain (world Z).
pub const DEFAULT_SEA_LEVEL: u32 = 48;

/// Upper bound on voxel steps for any raycast against the grid.
pub const MAX_RAY_STEPS: u32 = 512;

/// Tiles per row in the block texture atlas.
pub const ATLAS_TILES_PER_ROW: u16 = 16;
