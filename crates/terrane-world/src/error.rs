use glam::IVec3;
use terrane_core::types::ChunkCoords;
use terrane_core::ConfigError;
use terrane_persist::PersistError;
use thiserror::Error;

/// Errors surfaced by world operations.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("chunk ({}, {}) is not loaded", .0.x, .0.y)]
    ChunkNotLoaded(ChunkCoords),

    #[error("position {0} is outside the vertical range of the world")]
    OutOfBounds(IVec3),

    #[error("position {0} is already occupied by a solid block")]
    Occupied(IVec3),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
