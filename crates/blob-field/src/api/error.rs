use thiserror::Error;

/// Errors surfaced by the blob field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The drawing surface is missing or unusable. The loop must not start.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("invalid field config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse field config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// A surface rejected a fill. Only the affected blob is skipped.
    #[error("draw failed: {0}")]
    Draw(String),
}
