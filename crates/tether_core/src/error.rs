//! Error types shared across the tether crates

use thiserror::Error;

/// Errors surfaced to the component host
///
/// Precondition violations are caller ordering bugs; they are returned
/// immediately and never recovered internally.
#[derive(Error, Debug)]
pub enum TetherError {
    /// An anchor owner is not attached to an overlay host
    #[error("control `{0}` is not attached to an overlay host")]
    UnresolvedHost(String),

    /// A behavior operation needs an attached node
    #[error("behavior `{0}` is not attached to a node")]
    NotAttached(&'static str),

    /// A ghost proxy must start at unit scale
    #[error("proxy node `{name}` must start at unit scale, found ({x}, {y}, {z})")]
    NonUnitScale { name: String, x: f32, y: f32, z: f32 },

    /// Selector syntax the query utility does not handle
    #[error("unsupported selector: `{0}`")]
    UnsupportedSelector(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tether operations
pub type Result<T> = std::result::Result<T, TetherError>;
