//! Error types for document construction, loading and name resolution.
//!
//! Absence is not an error: lookups that find nothing return `Ok(None)` or an
//! empty vector.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the dependency graph and its resolvers.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// An import could not be located in any include directory.
    #[error("File not found in include path: {0}")]
    NotFound(String),

    /// A singular query matched more than one candidate.
    #[error("More than one type found for '{name}' ({count} candidates)")]
    AmbiguousName { name: String, count: usize },

    /// An entity was attached under an owner that cannot hold it.
    #[error("Invalid scope for item '{item}' ({name})")]
    InvalidScope { item: &'static str, name: String },

    /// An include directory could not be inspected.
    #[error("Invalid directory {}: {source}", path.display())]
    InvalidIncludeDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An include directory path exists but is not a directory.
    #[error("Path {} isn't a directory", .0.display())]
    NotADirectory(PathBuf),

    /// Raw schema text needs parsing but no parser was configured.
    #[error("No schema parser configured to load {0}")]
    MissingParser(String),

    /// The external parser rejected a file.
    #[error("Error parsing file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// IO error during read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    /// Create a not-found error for an import path.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create an ambiguity error for a query.
    pub fn ambiguous(name: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousName {
            name: name.into(),
            count,
        }
    }

    /// Create an invalid scope error for an item.
    pub fn invalid_scope(item: &'static str, name: impl Into<String>) -> Self {
        Self::InvalidScope {
            item,
            name: name.into(),
        }
    }

    /// Returns true for [`SchemaError::AmbiguousName`].
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::AmbiguousName { .. })
    }

    /// Returns true for [`SchemaError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;
