use crate::io::xer::XerError;

/// Errors surfaced by the workflow engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Xer(#[from] XerError),

    #[error("Cycle detected in dependencies: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
