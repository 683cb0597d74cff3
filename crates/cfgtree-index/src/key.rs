//! Name keys
//!
//! Each level of a path is the *name key* of a directive: its name, or, for
//! directives that commonly repeat as siblings, its name and arguments.

use crate::path::escape_segment;
use cfgtree_model::Directive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Directives keyed by name and arguments unless configured otherwise
pub const DEFAULT_KEYED: &[&str] = &[
    "location",
    "upstream",
    "map",
    "geo",
    "split_clients",
    "limit_except",
    "if",
];

/// Rules for computing name keys
///
/// Directives whose name is in `keyed` and that carry arguments are keyed as
/// `name arg1 arg2...`; everything else is keyed by name alone. The
/// computed key is escaped, so it is directly usable as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPolicy {
    keyed: BTreeSet<String>,
}

impl KeyPolicy {
    /// Policy keying the given directives by name and arguments
    #[must_use]
    pub fn new<I, S>(keyed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyed: keyed.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy keying every directive by name alone
    #[inline]
    #[must_use]
    pub fn names_only() -> Self {
        Self {
            keyed: BTreeSet::new(),
        }
    }

    /// True when `name` is keyed with its arguments
    #[inline]
    #[must_use]
    pub fn is_keyed(&self, name: &str) -> bool {
        self.keyed.contains(name)
    }

    /// Escaped path segment for `directive`
    #[must_use]
    pub fn key(&self, directive: &Directive) -> String {
        if self.is_keyed(&directive.directive) && !directive.args.is_empty() {
            let raw = format!("{} {}", directive.directive, directive.args.join(" "));
            escape_segment(&raw).into_owned()
        } else {
            escape_segment(&directive.directive).into_owned()
        }
    }
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_KEYED.iter().copied())
    }
}
