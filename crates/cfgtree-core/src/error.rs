//! Error types for cfgtree core
//!
//! Provides error handling for:
//! - Paths that are not indexed
//! - Index records that no longer match the document
//! - Failing instructions inside a change set
//! - Parse, edit-file and render failures bubbling up from `change_me`

use crate::resolve::ResolveError;
use cfgtree_model::{Action, ChangesError, ParseError};
use std::io;

/// Main tree error type
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Path is not in the index
    #[error("path not found: {path}")]
    PathNotFound { path: String },

    /// Indexed node is no longer present in its parent sequence
    #[error("node to delete not found: {path}")]
    DeleteNotFound { path: String },

    /// Instruction action cannot be executed
    #[error("unsupported action '{action}' at instruction {index}")]
    UnsupportedAction { index: usize, action: Action },

    /// Index record does not replay against the document
    #[error("inconsistent index at {path}: {detail}")]
    InconsistentIndex {
        path: String,
        #[source]
        detail: ResolveError,
    },

    /// An instruction of a change set failed
    #[error("change {index} ({path}) failed: {source}")]
    Change {
        /// Position of the instruction in the list
        index: usize,
        /// Path the instruction targeted
        path: String,
        /// The underlying error
        source: Box<TreeError>,
    },

    /// Payload could not be parsed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Edit instructions could not be loaded
    #[error("edit instructions: {0}")]
    Changes(#[from] ChangesError),

    /// Rendering to the sink failed
    #[error("render failed: {0}")]
    Render(#[from] io::Error),
}

impl TreeError {
    /// Wrap an error as the failure of instruction `index`
    #[inline]
    pub fn in_change(index: usize, path: impl Into<String>, error: impl Into<Box<TreeError>>) -> Self {
        Self::Change {
            index,
            path: path.into(),
            source: error.into(),
        }
    }

    /// Innermost error, unwrapping change-set context
    #[must_use]
    pub fn root(&self) -> &TreeError {
        match self {
            Self::Change { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if error is a missing path
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            Self::PathNotFound { .. } | Self::DeleteNotFound { .. }
        )
    }
}

/// Result alias for tree operations
pub type TreeResult<T> = Result<T, TreeError>;
