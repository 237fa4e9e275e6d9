//! Error types for the symbol engine
//!
//! Lookups that find nothing are not errors, and duplicate declarations are
//! reported through [`AddOutcome`](crate::symbol::AddOutcome). What remains
//! here are engine defects, malformed input that cannot be placed in the tree,
//! and persistence failures.

use crate::SymbolId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for symbol tree operations
#[derive(Error, Debug)]
pub enum SymbolError {
    /// The tree reached a state it must never be in. Indicates a bug in the engine.
    #[error("Internal symbol tree invariant violated: {reason}")]
    InvariantViolation { reason: String },

    #[error(
        "Declaration '{name}' has {lists} template parameter list(s) but {templates} templated name component(s)"
    )]
    TemplateListMismatch {
        name: String,
        templates: usize,
        lists: usize,
    },

    #[error("Symbol {id} does not belong to this tree")]
    UnknownSymbol { id: SymbolId },

    #[error("Linking {below} below {above} would make the sibling chain a loop")]
    SiblingCycle { above: SymbolId, below: SymbolId },

    /// Snapshot errors
    #[error("Failed to persist symbol snapshot to '{path}': {source}")]
    Persistence {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to load symbol snapshot from '{path}': {source}")]
    Load {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl SymbolError {
    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }

    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::InvariantViolation { .. } => "INVARIANT_VIOLATION",
            Self::TemplateListMismatch { .. } => "TEMPLATE_LIST_MISMATCH",
            Self::UnknownSymbol { .. } => "UNKNOWN_SYMBOL",
            Self::SiblingCycle { .. } => "SIBLING_CYCLE",
            Self::Persistence { .. } => "PERSISTENCE_ERROR",
            Self::Load { .. } => "LOAD_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::InvariantViolation { .. } => vec![
                "Discard the persisted snapshot and rebuild all documents",
                "Please report this with the debug_lookup output attached",
            ],
            Self::TemplateListMismatch { .. } => vec![
                "Give each templated name component its own template<...> header",
                "A declaration may carry one extra header for the declared template itself",
            ],
            Self::Load { .. } => vec![
                "The snapshot may be from an older version; rebuild all documents",
                "Check that the snapshot path is readable",
            ],
            Self::Persistence { .. } => vec![
                "Check disk space and permissions in the snapshot directory",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for symbol operations
pub type SymbolResult<T> = Result<T, SymbolError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Attach the snapshot path that was being written
    fn persisting(self, path: &std::path::Path) -> Result<T, SymbolError>;

    /// Attach the snapshot path that was being read
    fn loading(self, path: &std::path::Path) -> Result<T, SymbolError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn persisting(self, path: &std::path::Path) -> Result<T, SymbolError> {
        self.map_err(|e| SymbolError::Persistence {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    fn loading(self, path: &std::path::Path) -> Result<T, SymbolError> {
        self.map_err(|e| SymbolError::Load {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }
}
