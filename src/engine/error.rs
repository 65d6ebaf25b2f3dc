use crate::ops::store_ops::StoreError;
use crate::transport::{Collection, TransportError};

/// Error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("name cannot be empty")]
    EmptyName,
    #[error("no current project")]
    NoCurrentProject,
    #[error("column {0} is a default column and cannot be deleted")]
    DefaultColumnProtected(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("column {column} does not belong to project {project}")]
    ColumnProjectMismatch { column: String, project: String },
    #[error("{collection} request rejected: {message}")]
    Rejected {
        collection: Collection,
        message: String,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("could not decode {collection} records: {source}")]
    Decode {
        collection: Collection,
        source: serde_json::Error,
    },
}

impl EngineError {
    /// True for errors raised before any remote call was made
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::EmptyTitle
                | EngineError::EmptyName
                | EngineError::NoCurrentProject
                | EngineError::DefaultColumnProtected(_)
                | EngineError::TaskNotFound(_)
                | EngineError::ColumnNotFound(_)
                | EngineError::ColumnProjectMismatch { .. }
        )
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::TaskNotFound(id) => EngineError::TaskNotFound(id),
            StoreError::ColumnNotFound(id) => EngineError::ColumnNotFound(id),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// One failed step of a multi-step mutation
#[derive(Debug)]
pub struct StepFailure {
    /// What the step was acting on (a column or task id)
    pub target: String,
    pub error: EngineError,
}

/// Outcome of a mutation whose steps may partially fail. Failed steps are
/// not rolled back.
#[derive(Debug, Default)]
pub struct MutationReport {
    pub failures: Vec<StepFailure>,
}

impl MutationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn push(&mut self, target: impl Into<String>, error: EngineError) {
        self.failures.push(StepFailure {
            target: target.into(),
            error,
        });
    }
}
