use thiserror::Error;

/// Failure modes of a workflow import. Every variant is recoverable: the
/// editor keeps its current graph and shows the message to the user.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Rejected on the file name alone, before any content is read.
    #[error("wrong format: `{file_name}` must be a .json file")]
    WrongFileType { file_name: String },

    #[error("JSON read error: {0}")]
    ParseError(#[source] serde_json::Error),

    #[error("invalid workflow format: {reason}")]
    InvalidSchema { reason: String },

    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned by graph store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("unknown action type `{0}`")]
    UnknownActionType(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("edge not found: {0}")]
    EdgeNotFound(String),

    /// Infinite or NaN coordinates, e.g. a drop projected through a zero zoom.
    #[error("invalid position ({x}, {y})")]
    InvalidPosition { x: f64, y: f64 },
}
