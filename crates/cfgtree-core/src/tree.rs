//! Editable configuration tree
//!
//! [`ConfigTree`] owns a payload and the path index over it. Every mutation
//! follows the same steps: look the path up, replay its record, edit the
//! document, then reindex the affected subtree so the index always matches
//! what a fresh build would produce.

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::matcher::Matcher;
use crate::resolve::{self, ResolveError};
use cfgtree_index::{path, PathIndex, WalkBack};
use cfgtree_model::{names, render, Action, Change, Directive, Payload};
use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};
use tracing::{debug, info};

/// Result of [`ConfigTree::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    /// Arguments joined with `-`
    Args(String),

    /// Node without arguments
    Node(&'a Directive),
}

impl Display for Value<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Args(args) => f.write_str(args),
            Self::Node(node) => write!(f, "{node}"),
        }
    }
}

/// Payload plus its path index
#[derive(Debug)]
pub struct ConfigTree {
    payload: Payload,
    index: PathIndex,
    config: TreeConfig,
}

impl ConfigTree {
    /// Build a tree with default configuration
    #[must_use]
    pub fn new(payload: Payload) -> Self {
        Self::with_config(payload, TreeConfig::default())
    }

    /// Build a tree, indexing the payload eagerly
    #[must_use]
    pub fn with_config(payload: Payload, config: TreeConfig) -> Self {
        let index = PathIndex::build(&payload, config.key_policy());
        info!(
            units = payload.config.len(),
            paths = index.len(),
            "config tree built"
        );
        Self {
            payload,
            index,
            config,
        }
    }

    /// Underlying document
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Take the document back
    #[inline]
    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// Path index
    #[inline]
    #[must_use]
    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Reindex everything from unit 0
    pub fn rebuild(&mut self) {
        self.index.rebuild(&self.payload);
    }

    /// Location record for `path`
    ///
    /// # Errors
    /// Returns [`TreeError::PathNotFound`] if the path is not indexed.
    pub fn lookup(&self, path: &str) -> TreeResult<&WalkBack> {
        self.index.get(path).ok_or_else(|| TreeError::PathNotFound {
            path: path.to_string(),
        })
    }

    /// Node at `path`
    ///
    /// # Errors
    /// Returns [`TreeError::PathNotFound`] if the path is not indexed.
    pub fn node(&self, path: &str) -> TreeResult<&Directive> {
        let record = self.lookup(path)?;
        resolve::node(&self.payload, record).map_err(|detail| inconsistent(path, detail))
    }

    /// Arguments at `path` joined with `-`, or the node when it has none
    ///
    /// # Errors
    /// Returns [`TreeError::PathNotFound`] if the path is not indexed.
    pub fn get(&self, path: &str) -> TreeResult<Value<'_>> {
        let node = self.node(path)?;
        if node.args.is_empty() {
            Ok(Value::Node(node))
        } else {
            Ok(Value::Args(node.joined_args("-")))
        }
    }

    /// Insert `nodes` before the node at `path`, in order
    ///
    /// The node at `path` keeps its path; the inserted nodes become
    /// addressable under the same parent.
    ///
    /// # Errors
    /// Returns [`TreeError::PathNotFound`] if the path is not indexed.
    pub fn insert(&mut self, path: &str, nodes: Vec<Directive>) -> TreeResult<()> {
        let record = self.lookup(path)?.clone();
        if nodes.is_empty() {
            return Ok(());
        }

        resolve::node(&self.payload, &record).map_err(|detail| inconsistent(path, detail))?;
        debug!(path, at = %record, nodes = %names(&nodes), "insert");

        let sequence = resolve::sequence_mut(&mut self.payload, &record)
            .map_err(|detail| inconsistent(path, detail))?;
        sequence.splice(record.offset..record.offset, nodes);

        self.refresh(parent_of(path), record.unit());
        Ok(())
    }

    /// Append `nodes` to the children of the node at `path`
    ///
    /// A simple directive becomes a block directive.
    ///
    /// # Errors
    /// Returns [`TreeError::PathNotFound`] if the path is not indexed.
    pub fn append(&mut self, path: &str, nodes: Vec<Directive>) -> TreeResult<()> {
        let record = self.lookup(path)?.clone();
        if nodes.is_empty() {
            return Ok(());
        }

        debug!(path, at = %record, nodes = %names(&nodes), "append");
        let target = resolve::node_mut(&mut self.payload, &record)
            .map_err(|detail| inconsistent(path, detail))?;
        target.children_mut().extend(nodes);

        self.refresh(path, record.unit());
        Ok(())
    }

    /// Remove the node at `path` and its subtree
    ///
    /// A same-keyed sibling that the removed node shadowed takes over `path`
    /// afterwards, so `path` may still resolve.
    ///
    /// # Errors
    /// Returns [`TreeError::PathNotFound`] if the path is not indexed and
    /// [`TreeError::DeleteNotFound`] if the indexed node is gone.
    pub fn delete(&mut self, path: &str) -> TreeResult<()> {
        let record = self.lookup(path)?.clone();

        let sequence = resolve::sequence_mut(&mut self.payload, &record)
            .map_err(|detail| inconsistent(path, detail))?;
        let Some(at) = resolve::slot(sequence, record.node) else {
            return Err(TreeError::DeleteNotFound {
                path: path.to_string(),
            });
        };
        let removed = sequence.remove(at);
        debug!(path, at, node = %removed, "delete");

        self.refresh(parent_of(path), record.unit());
        Ok(())
    }

    /// Append clones of `nodes` to every node under `prefix` that `matcher`
    /// accepts
    ///
    /// `prefix` is a string prefix over indexed paths. Every match is
    /// resolved before anything changes. Returns the number of distinct
    /// nodes matched.
    ///
    /// # Errors
    /// Returns [`TreeError::InconsistentIndex`] if a visited record does
    /// not replay.
    pub fn apply<M>(&mut self, prefix: &str, matcher: &M, nodes: &[Directive]) -> TreeResult<usize>
    where
        M: Matcher + ?Sized,
    {
        let mut matched: Vec<(String, WalkBack)> = Vec::new();
        let mut seen = HashSet::new();
        let mut failure = None;

        // a unit included twice reaches the same node under two paths
        self.index.walk_prefix(prefix, |path, record| {
            if failure.is_some() || seen.contains(&record.node) {
                return false;
            }
            match resolve::node(&self.payload, record) {
                Ok(node) if matcher.matches(node) => {
                    seen.insert(record.node);
                    matched.push((path.to_string(), record.clone()));
                    true
                }
                Ok(_) => false,
                Err(detail) => {
                    failure = Some(inconsistent(path, detail));
                    false
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }
        debug!(prefix, matched = matched.len(), nodes = %names(nodes), "apply");
        if nodes.is_empty() || matched.is_empty() {
            return Ok(matched.len());
        }

        // appending never shifts an offset, so every record stays valid
        for (path, record) in &matched {
            let target = resolve::node_mut(&mut self.payload, record)
                .map_err(|detail| inconsistent(path, detail))?;
            target.children_mut().extend(nodes.iter().cloned());
        }

        let mut touched: Vec<(&str, Option<usize>)> = Vec::with_capacity(matched.len());
        for (path, record) in &matched {
            if !matched.iter().any(|(other, _)| path::is_below(path, other)) {
                touched.push((path.as_str(), record.unit()));
            }
        }
        for (path, unit) in touched {
            if self.refresh(path, unit) {
                break;
            }
        }

        Ok(matched.len())
    }

    /// Run `changes` in order, stopping at the first failure
    ///
    /// Changes that succeeded before the failure stay applied. Returns the
    /// number of changes applied.
    ///
    /// # Errors
    /// Returns [`TreeError::Change`] carrying the failing instruction's
    /// position, path and cause.
    pub fn change_set<I>(&mut self, changes: I) -> TreeResult<usize>
    where
        I: IntoIterator<Item = Change>,
    {
        let mut applied = 0;
        for (index, change) in changes.into_iter().enumerate() {
            let Change {
                action,
                path,
                directives,
            } = change;
            info!(index, %action, path = %path, nodes = %names(&directives), "applying change");

            let result = match action {
                Action::Insert => self.insert(&path, directives),
                Action::Append => self.append(&path, directives),
                Action::Delete => self.delete(&path),
                Action::Update | Action::Unknown => {
                    Err(TreeError::UnsupportedAction { index, action })
                }
            };
            result.map_err(|err| TreeError::in_change(index, path, err))?;
            applied += 1;
        }

        info!(applied, "change set applied");
        if self.config.dump_after_change {
            for (path, summary) in self.dump() {
                debug!(path = %path, summary = %summary, "tree");
            }
        }
        Ok(applied)
    }

    /// Every indexed path with a summary of its location and node, sorted
    #[must_use]
    pub fn dump(&self) -> Vec<(String, String)> {
        self.index
            .iter()
            .map(|(path, record)| {
                let node = resolve::node(&self.payload, record)
                    .map_or_else(|err| format!("<{err}>"), Directive::summary);
                (path.to_string(), format!("{record} {node}"))
            })
            .collect()
    }

    /// Print the included-file table and every indexed path
    ///
    /// # Errors
    /// Returns error if writing to `out` fails.
    pub fn show_tree<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if !self.payload.config.is_empty() {
            writeln!(out, "\nincluded files:")?;
            for (i, file) in self.payload.config.iter().enumerate() {
                writeln!(out, "{i:2}: {}", file.file)?;
            }
            writeln!(out)?;
        }
        for (path, summary) in self.dump() {
            writeln!(out, "K: {path:<60} -- V: {summary}")?;
        }
        Ok(())
    }

    /// Render the document as configuration text
    ///
    /// # Errors
    /// Returns error if writing to `out` fails.
    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        render(&self.payload, out)
    }

    /// Reindex below `path` after the sequence it owns changed in `unit`
    ///
    /// Returns true when the whole index was rebuilt.
    fn refresh(&mut self, path: &str, unit: Option<usize>) -> bool {
        let shared = unit.is_some_and(|u| self.payload.include_chains(u) > 1);
        if shared || path.is_empty() {
            debug!(path, ?unit, "rebuilding index");
            self.index.rebuild(&self.payload);
            return true;
        }
        self.index.reindex(&self.payload, path);
        false
    }
}

fn parent_of(path: &str) -> &str {
    path::parent(path).unwrap_or_default()
}

fn inconsistent(path: &str, detail: ResolveError) -> TreeError {
    TreeError::InconsistentIndex {
        path: path.to_string(),
        detail,
    }
}
