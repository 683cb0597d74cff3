//! Path index with radix tree
//!
//! Provides [`PathIndex`], mapping path strings to [`WalkBack`] records using
//! radix_trie for prefix walks and subtree pruning.

use crate::key::KeyPolicy;
use crate::path;
use crate::record::WalkBack;
use cfgtree_model::{Directive, Payload};
use radix_trie::{Trie, TrieCommon};
use tracing::{debug, warn};

/// Path index over a payload
///
/// We use radix_trie for:
/// - Exact path lookups
/// - Ordered walks over every path sharing a string prefix
/// - Dropping a whole subtree before it is re-injected
///
/// Paths collide when sibling directives share a name key. The last one
/// visited in traversal order wins; the others stay in the document but are
/// not addressable.
#[derive(Debug)]
pub struct PathIndex {
    /// Radix trie mapping path -> location record
    trie: Trie<String, WalkBack>,

    /// Rules for computing path segments
    policy: KeyPolicy,
}

impl PathIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new(policy: KeyPolicy) -> Self {
        Self {
            trie: Trie::new(),
            policy,
        }
    }

    /// Index every directive reachable from unit 0
    #[must_use]
    pub fn build(payload: &Payload, policy: KeyPolicy) -> Self {
        let mut index = Self::new(policy);
        index.rebuild(payload);
        index
    }

    /// Key policy in use
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &KeyPolicy {
        &self.policy
    }

    /// Path segment for `directive` under this index's policy
    #[inline]
    #[must_use]
    pub fn key(&self, directive: &Directive) -> String {
        self.policy.key(directive)
    }

    /// Drop every entry and index the payload from scratch
    pub fn rebuild(&mut self, payload: &Payload) {
        self.trie = Trie::new();
        if let Some(root) = payload.config.first() {
            self.inject(payload, "", &[0], &root.parsed);
        }
        debug!(entries = self.trie.len(), "index rebuilt");
    }

    /// Lookup record by exact path
    #[inline]
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&WalkBack> {
        self.trie.get(path)
    }

    /// Check if path is indexed
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Store a record, replacing any previous one
    pub fn put(&mut self, path: impl Into<String>, record: WalkBack) -> Option<WalkBack> {
        self.trie.insert(path.into(), record)
    }

    /// Remove a single entry
    pub fn delete(&mut self, path: &str) -> Option<WalkBack> {
        self.trie.remove(path)
    }

    /// Remove every entry strictly below `prefix`
    ///
    /// Returns number of entries removed.
    pub fn prune(&mut self, prefix: &str) -> usize {
        if prefix.is_empty() {
            let count = self.trie.len();
            self.trie = Trie::new();
            debug!(path = prefix, count, "pruned");
            return count;
        }

        let below: Vec<String> = self
            .with_prefix(prefix)
            .into_iter()
            .filter(|(key, _)| path::is_below(key, prefix))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &below {
            self.trie.remove(key.as_str());
        }

        debug!(path = prefix, count = below.len(), "pruned");
        below.len()
    }

    /// Visit every path starting with `prefix`, in lexicographic order
    ///
    /// The prefix is a plain string prefix: `/http/se` visits both
    /// `/http/sendfile` and `/http/server`. `visit` returns whether the entry
    /// matched; the number of matches is returned.
    pub fn walk_prefix<F>(&self, prefix: &str, mut visit: F) -> usize
    where
        F: FnMut(&str, &WalkBack) -> bool,
    {
        let mut matched = 0;
        for (path, record) in self.with_prefix(prefix) {
            if visit(path, record) {
                matched += 1;
            }
        }
        matched
    }

    /// All entries, sorted by path
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, &WalkBack)> {
        self.with_prefix("")
            .into_iter()
            .map(|(path, record)| (path.as_str(), record))
            .collect()
    }

    /// Sorted entry iterator
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WalkBack)> {
        self.entries().into_iter()
    }

    /// All indexed paths, sorted
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        self.iter().map(|(path, _)| path).collect()
    }

    /// Get total entry count
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Check if index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index `sequence` below `parent`
    ///
    /// `ancestors` is the chain addressing `sequence` itself. Comments are
    /// skipped; an include is transparent and indexes the units it names at
    /// the include's own depth.
    pub fn inject(
        &mut self,
        payload: &Payload,
        parent: &str,
        ancestors: &[usize],
        sequence: &[Directive],
    ) {
        let mut stack: Vec<usize> = ancestors.first().copied().into_iter().collect();
        self.inject_with(payload, parent, ancestors, sequence, &mut stack);
    }

    fn inject_with(
        &mut self,
        payload: &Payload,
        parent: &str,
        ancestors: &[usize],
        sequence: &[Directive],
        stack: &mut Vec<usize>,
    ) {
        debug!(path = parent, ?ancestors, len = sequence.len(), "inject");

        for (offset, directive) in sequence.iter().enumerate() {
            if directive.is_comment() {
                continue;
            }

            if directive.is_include() {
                for &unit in &directive.includes {
                    let Some(file) = payload.config.get(unit) else {
                        warn!(unit, path = parent, "include names a missing unit, skipping");
                        continue;
                    };
                    if stack.contains(&unit) {
                        warn!(unit, file = %file.file, path = parent, "include cycle, skipping");
                        continue;
                    }
                    stack.push(unit);
                    self.inject_with(payload, parent, &[unit], &file.parsed, stack);
                    stack.pop();
                }
                continue;
            }

            let here = path::join(parent, &self.policy.key(directive));
            self.trie.insert(
                here.clone(),
                WalkBack::new(ancestors.to_vec(), offset, directive.id()),
            );

            if let Some(children) = &directive.block {
                let mut chain = Vec::with_capacity(ancestors.len() + 1);
                chain.extend_from_slice(ancestors);
                chain.push(offset);
                self.inject_with(payload, &here, &chain, children, stack);
            }
        }
    }

    /// Child chains of every block directive whose path is exactly `path`
    ///
    /// Walks the document one segment at a time from unit 0, expanding
    /// includes, and returns the chains in traversal order. Simple
    /// directives have no children and are not reported.
    #[must_use]
    pub fn locate(&self, payload: &Payload, path: &str) -> Vec<Vec<usize>> {
        let mut frontier: Vec<Vec<usize>> = vec![vec![0]];

        for segment in path::segments(path) {
            let mut next = Vec::new();
            for chain in &frontier {
                if let Some(sequence) = payload.sequence(chain) {
                    let mut stack: Vec<usize> = chain.first().copied().into_iter().collect();
                    self.matching(payload, chain, sequence, segment, &mut next, &mut stack);
                }
            }
            frontier = next;
        }

        frontier.retain(|chain| payload.sequence(chain).is_some());
        frontier
    }

    fn matching(
        &self,
        payload: &Payload,
        chain: &[usize],
        sequence: &[Directive],
        segment: &str,
        out: &mut Vec<Vec<usize>>,
        stack: &mut Vec<usize>,
    ) {
        for (offset, directive) in sequence.iter().enumerate() {
            if directive.is_comment() {
                continue;
            }

            if directive.is_include() {
                for &unit in &directive.includes {
                    let Some(file) = payload.config.get(unit) else {
                        continue;
                    };
                    if stack.contains(&unit) {
                        continue;
                    }
                    stack.push(unit);
                    self.matching(payload, &[unit], &file.parsed, segment, out, stack);
                    stack.pop();
                }
                continue;
            }

            if self.policy.key(directive) == segment {
                let mut found = chain.to_vec();
                found.push(offset);
                out.push(found);
            }
        }
    }

    /// Bring every entry below `path` back in line with the payload
    ///
    /// The root path rebuilds everything. Otherwise the subtree is pruned
    /// and the children of every directive at `path` are injected again in
    /// traversal order, so collisions resolve as a fresh build would.
    pub fn reindex(&mut self, payload: &Payload, path: &str) {
        if path.is_empty() {
            self.rebuild(payload);
            return;
        }

        let owners = self.locate(payload, path);
        let pruned = self.prune(path);
        debug!(path, owners = owners.len(), pruned, "reindex");

        for chain in owners {
            if let Some(children) = payload.sequence(&chain) {
                self.inject(payload, path, &chain, children);
            }
        }
    }

    fn with_prefix(&self, prefix: &str) -> Vec<(&String, &WalkBack)> {
        let mut found: Vec<(&String, &WalkBack)> = if prefix.is_empty() {
            self.trie.iter().collect()
        } else {
            match self.trie.get_raw_descendant(prefix) {
                // Raw descendants may include keys sharing only part of the prefix
                Some(subtrie) => subtrie
                    .iter()
                    .filter(|(path, _)| path.starts_with(prefix))
                    .collect(),
                None => Vec::new(),
            }
        };
        found.sort_by(|a, b| a.0.cmp(b.0));
        found
    }
}

impl Default for PathIndex {
    fn default() -> Self {
        Self::new(KeyPolicy::default())
    }
}
