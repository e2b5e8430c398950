//! Error types for module loading and calculator execution.

use calculators::{CalcError, FieldError};
use result_cache::CacheError;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed cause reported by a module source.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors from resolving a module.
///
/// `Clone` because a single failed load is reported to every caller that
/// was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum LoaderError {
    /// The identifier is not in the registry; nothing was loaded
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// The module source failed. Not cached: the next resolve retries.
    #[error("Failed to load module '{id}': {source}")]
    ModuleLoad {
        id: String,
        source: Arc<dyn StdError + Send + Sync>,
    },
}

impl LoaderError {
    pub fn module_load(id: impl Into<String>, cause: BoxError) -> Self {
        Self::ModuleLoad {
            id: id.into(),
            source: Arc::from(cause),
        }
    }

    /// Identifier the error refers to.
    pub fn id(&self) -> &str {
        match self {
            Self::UnknownModule(id) | Self::ModuleLoad { id, .. } => id,
        }
    }
}

/// Result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors from running a calculator through the runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    /// `validate` rejected the inputs; `compute` was not called
    #[error("Invalid inputs for '{id}': {}", .errors.iter().map(|e| format!("{} {}", e.field, e.message)).collect::<Vec<_>>().join(", "))]
    Validation { id: String, errors: Vec<FieldError> },

    #[error("Calculation failed: {0}")]
    Compute(#[from] CalcError),

    #[error(transparent)]
    Key(#[from] CacheError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
