use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use terrane_core::types::{Block, ChunkCoords};
use terrane_core::BlockTable;

use crate::error::PersistError;
use crate::format::chunk_file_name;
use crate::load::decode_chunk;
use crate::save::encode_chunk;

/// Directory of per-chunk save files, one file per chunk coordinate.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    dir: PathBuf,
}

impl ChunkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the save file for a chunk.
    pub fn path_for(&self, coords: ChunkCoords) -> PathBuf {
        self.dir.join(chunk_file_name(coords))
    }

    /// Whether a save exists for a chunk.
    pub fn exists(&self, coords: ChunkCoords) -> bool {
        self.path_for(coords).is_file()
    }

    /// Encode and write a chunk. The file is written to a temporary path and
    /// renamed so a crash never leaves a half-written save behind.
    pub fn save(&self, coords: ChunkCoords, blocks: &[Block]) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(coords);
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, encode_chunk(blocks))?;
        fs::rename(&tmp_path, &path)?;
        log::debug!("Saved chunk ({}, {}) to {}", coords.x, coords.y, path.display());
        Ok(())
    }

    /// Read and decode a chunk. `Ok(None)` means no save exists.
    pub fn load(
        &self,
        coords: ChunkCoords,
        table: &BlockTable,
    ) -> Result<Option<Vec<Block>>, PersistError> {
        let path = self.path_for(coords);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode_chunk(&bytes, table).map(Some)
    }
}
