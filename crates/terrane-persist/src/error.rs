/// Errors that can occur while encoding, decoding or storing chunk saves.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("file too small ({0} bytes, minimum {1})")]
    FileTooSmall(usize, usize),

    #[error(
        "chunk dimensions {actual:?} do not match this build ({expected:?})"
    )]
    DimensionMismatch {
        expected: [u8; 3],
        actual: [u8; 3],
    },

    #[error("run data has odd length {0}; expected (type, run) pairs")]
    TruncatedRun(usize),

    #[error("zero-length run at byte offset {0}")]
    EmptyRun(usize),

    #[error("runs cover {actual} blocks, expected {expected}")]
    BlockCountMismatch { expected: usize, actual: usize },

    #[error("chunk I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
