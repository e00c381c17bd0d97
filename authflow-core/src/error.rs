use thiserror::Error;

/// Failures of editor-side graph mutation and snapshot serialization.
/// Extraction and generation have no error path.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Edge would connect node '{0}' to itself")]
    SelfLoop(String),

    #[error("Edge {from} -> {to} already exists")]
    DuplicateEdge { from: String, to: String },

    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
