use thiserror::Error;

/// Failures while reading records or dashboard responses.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing diagram type tag")]
    MissingType,
    #[error("unknown diagram type `{0}`")]
    UnknownType(String),
    #[error("invalid {kind} record: {source}")]
    Record {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of a single export run. Each run is independent; nothing is retried.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("surface has no usable intrinsic size")]
    UnresolvedSize,
    #[error("export scale must be a positive finite number, got {0}")]
    InvalidScale(f32),
    #[error("malformed surface markup: {0}")]
    Markup(String),
    #[error("failed to decode serialized surface: {0}")]
    Decode(String),
    #[error("failed to allocate a {width}x{height} bitmap")]
    Allocation { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    Encode(String),
    #[error("rasterization task did not complete: {0}")]
    Task(String),
    #[error("no clipboard image API is available: {0}")]
    ClipboardUnavailable(String),
    #[error("clipboard rejected the image: {0}")]
    ClipboardWrite(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
