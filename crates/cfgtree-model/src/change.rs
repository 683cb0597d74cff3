//! Edit instructions
//!
//! A [`Change`] names an [`Action`], a target path and the directives the
//! action carries. A list of changes is applied as one change set.

use crate::directive::Directive;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Edit action
///
/// Deserializes from either a lowercase name (`"insert"`) or the numeric
/// code used by older edit files (`1`). Anything unrecognised becomes
/// [`Action::Unknown`], which change sets reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "ActionRepr", into = "String")]
pub enum Action {
    /// Uninitialized or unrecognised action
    #[default]
    Unknown,

    /// Insert directives before the target
    Insert,

    /// Append directives to the target's block
    Append,

    /// Update the target (reserved)
    Update,

    /// Delete the target and its children
    Delete,
}

impl Action {
    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Insert => "insert",
            Self::Append => "append",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Numeric code
    #[inline]
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Insert => 1,
            Self::Append => 2,
            Self::Update => 3,
            Self::Delete => 4,
        }
    }

    fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Insert,
            2 => Self::Append,
            3 => Self::Update,
            4 => Self::Delete,
            _ => Self::Unknown,
        }
    }

    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "insert" => Self::Insert,
            "append" => Self::Append,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Unknown,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ActionRepr {
    Code(i64),
    Name(String),
}

impl From<ActionRepr> for Action {
    fn from(repr: ActionRepr) -> Self {
        match repr {
            ActionRepr::Code(code) => Self::from_code(code),
            ActionRepr::Name(name) => Self::from_name(&name),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

/// One edit instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// What to do
    #[serde(alias = "Act")]
    pub action: Action,

    /// Target path
    #[serde(alias = "Path")]
    pub path: String,

    /// Directives to insert or append
    #[serde(default, alias = "Directives")]
    pub directives: Vec<Directive>,
}

impl Change {
    /// Insert `directives` before `path`
    #[must_use]
    pub fn insert(path: impl Into<String>, directives: Vec<Directive>) -> Self {
        Self {
            action: Action::Insert,
            path: path.into(),
            directives,
        }
    }

    /// Append `directives` to the block at `path`
    #[must_use]
    pub fn append(path: impl Into<String>, directives: Vec<Directive>) -> Self {
        Self {
            action: Action::Append,
            path: path.into(),
            directives,
        }
    }

    /// Delete the directive at `path`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            action: Action::Delete,
            path: path.into(),
            directives: Vec::new(),
        }
    }
}

/// Errors loading edit instructions
#[derive(Debug, thiserror::Error)]
pub enum ChangesError {
    #[error("can't open file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json decode fail: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a JSON array of changes
///
/// # Errors
/// Returns error if the input is not a valid change list
pub fn changes_load<R: Read>(reader: R) -> Result<Vec<Change>, ChangesError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Decode a JSON array of changes from a file
///
/// # Errors
/// Returns error if the file can't be read or decoded
pub fn changes_from_file(path: impl AsRef<Path>) -> Result<Vec<Change>, ChangesError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ChangesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    changes_load(BufReader::new(file))
}
