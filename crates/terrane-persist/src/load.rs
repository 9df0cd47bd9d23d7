use terrane_core::types::Block;
use terrane_core::BlockTable;

use crate::compat;
use crate::error::PersistError;
use crate::format::*;
use crate::rle;

/// Parse a chunk save back into blocks.
///
/// Each block's flag byte is re-derived from the type table's default, so
/// runtime light values are not restored.
pub fn decode_chunk(bytes: &[u8], table: &BlockTable) -> Result<Vec<Block>, PersistError> {
    compat::validate_header(bytes)?;

    let mut blocks = Vec::with_capacity(CHUNK_BLOCK_COUNT);
    rle::expand_runs(&bytes[HEADER_SIZE..], CHUNK_BLOCK_COUNT, |ty| {
        blocks.push(table.block(ty));
    })?;

    Ok(blocks)
}
