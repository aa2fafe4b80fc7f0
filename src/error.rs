use thiserror::Error;

/// Errors surfaced by engine construction and initialization. Stepping
/// never fails.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("agent {index} has a non-finite position or velocity")]
    InvalidAgent { index: usize },
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("failed to parse engine config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
