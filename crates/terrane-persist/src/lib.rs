//! Chunk persistence: a 3-byte dimension header followed by run-length
//! encoded block types, one file per chunk.

pub mod compat;
pub mod error;
pub mod format;
pub mod load;
pub mod rle;
pub mod save;
pub mod store;

pub use error::PersistError;
pub use load::decode_chunk;
pub use save::encode_chunk;
pub use store::ChunkStore;
