use terrane_core::types::Block;

use crate::format::*;
use crate::rle;

/// Serialize a chunk's blocks into the save binary format.
///
/// Layout: 3-byte dimension header + `(type, run)` pairs in block-index order.
/// Only block types are written; light and flags are rebuilt on load.
pub fn encode_chunk(blocks: &[Block]) -> Vec<u8> {
    // Terrain is dominated by long runs of air and stone, so a small guess suffices.
    let mut output = Vec::with_capacity(HEADER_SIZE + 512);
    output.extend_from_slice(&build_header());
    rle::encode_runs(blocks.iter().map(|b| b.type_id), &mut output);
    output
}
