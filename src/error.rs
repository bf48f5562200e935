//! Error types for SRT packing and unpacking.

use crate::types::VertexProperty;
use thiserror::Error;

/// Result type alias using SrtError.
pub type Result<T> = std::result::Result<T, SrtError>;

/// Main error type for SRT conversion operations.
#[derive(Error, Debug)]
pub enum SrtError {
    /// A semantic channel name was not recognized by the registry.
    ///
    /// Fatal: indicates a schema version mismatch between the file and this
    /// library. The whole asset conversion should be aborted.
    #[error("unknown semantic channel: {0}")]
    UnknownSemanticChannel(String),

    /// A resolved-active channel has no source values, or the source array
    /// length does not match the vertex count.
    ///
    /// Recoverable: callers may substitute a zero-filled array and retry.
    /// The buffer writer itself never substitutes defaults.
    #[error("missing channel data for {property:?}: expected {expected} values, got {actual}")]
    MissingChannelData {
        property: VertexProperty,
        expected: usize,
        actual: usize,
    },

    /// The resolved channel set would exceed the fixed declaration capacity.
    ///
    /// Fatal: indicates a corrupt or unsupported geometry-class combination.
    #[error("vertex declaration overflow: {entries} entries (capacity {capacity})")]
    LayoutOverflow { entries: usize, capacity: usize },

    /// Failed to parse or serialize JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An SRT document did not have the structure this library expects.
    #[error("import error: {0}")]
    Import(String),

    /// A draw call could not be exported.
    #[error("export error: {0}")]
    Export(String),

    /// An error that occurred while converting a specific draw call.
    #[error("draw call {index}: {source}")]
    DrawCall {
        index: usize,
        #[source]
        source: Box<SrtError>,
    },
}

impl SrtError {
    /// Attach a draw-call index to this error.
    pub fn for_draw_call(self, index: usize) -> Self {
        SrtError::DrawCall {
            index,
            source: Box::new(self),
        }
    }
}
