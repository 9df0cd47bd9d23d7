use thiserror::Error;

/// Errors raised while loading configuration data (block tables, world settings).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse RON: {0}")]
    Parse(String),

    #[error("block id {0} is defined more than once")]
    DuplicateBlockId(u8),

    #[error("block id 0 must be defined as non-opaque, non-solid, non-emissive air")]
    InvalidAir,

    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}
