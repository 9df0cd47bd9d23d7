//! Shared vocabulary of the Terrane voxel layer: chunk dimensions, block
//! addressing, the two-byte `Block`, block type definitions and coordinate math.

pub mod addressing;
pub mod block;
pub mod constants;
pub mod direction;
pub mod error;
pub mod math;
pub mod types;

pub use block::{BlockDef, BlockTable};
pub use error::ConfigError;
pub use types::{Block, ChunkCoords, LightFlags, WorldCoord};
