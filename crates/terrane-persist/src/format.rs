use terrane_core::constants::{BLOCKS_PER_CHUNK, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};
use terrane_core::types::ChunkCoords;

/// Size of the dimension header in bytes: width, depth, height.
pub const HEADER_SIZE: usize = 3;

/// Longest run a single (type, run) pair can describe.
pub const MAX_RUN: usize = u8::MAX as usize;

/// Bytes per run pair.
pub const PAIR_SIZE: usize = 2;

/// Blocks a save file must describe.
pub const CHUNK_BLOCK_COUNT: usize = BLOCKS_PER_CHUNK;

/// File extension of chunk saves.
pub const SAVE_EXTENSION: &str = "chunk";

/// Header the running build writes and expects.
pub const fn build_header() -> [u8; HEADER_SIZE] {
    [CHUNK_WIDTH as u8, CHUNK_DEPTH as u8, CHUNK_HEIGHT as u8]
}

/// File name of the save for a chunk coordinate, e.g. `Chunk_at_(3,-2).chunk`.
pub fn chunk_file_name(coords: ChunkCoords) -> String {
    format!("Chunk_at_({},{}).{}", coords.x, coords.y, SAVE_EXTENSION)
}
