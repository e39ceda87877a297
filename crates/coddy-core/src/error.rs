use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoddyError {
    #[error("not initialized: run 'coddy init'")]
    NotInitialized,

    #[error("roadmap not found: {}", .0.display())]
    RoadmapNotFound(PathBuf),

    /// A phase or task index did not address an existing task. Indicates the
    /// caller's view of the roadmap is out of sync with the document.
    #[error("task index out of range: phase {phase}, task {task}")]
    IndexOutOfRange { phase: usize, task: usize },

    #[error("unknown subscription tier '{0}'")]
    InvalidTier(String),

    #[error("unknown feature '{0}'")]
    InvalidFeature(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoddyError>;
