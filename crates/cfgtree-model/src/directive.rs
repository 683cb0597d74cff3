//! Directive nodes
//!
//! Provides [`Directive`], one entry of a parsed configuration tree, and
//! [`NodeId`], the identity a directive keeps for as long as it lives.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Directive name used for comment nodes
pub const COMMENT: &str = "#";

/// Directive name used for file inclusion
pub const INCLUDE: &str = "include";

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a directive node
///
/// Positions shift whenever siblings are inserted or removed, so the id is
/// the only thing that says "this is still the same node". It is never
/// serialized: every deserialized or cloned directive gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a new id
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One directive of a configuration tree
///
/// Field names follow the crossplane JSON payload format so parser output
/// can be deserialized directly.
///
/// # Structure
/// - `directive`: the directive name (`server`, `listen`, `#`, `include`...)
/// - `args`: ordered argument list
/// - `includes`: for `include` directives, indices of the configuration
///   units pulled in at this point
/// - `block`: `None` for a simple directive, `Some` (possibly empty) for a
///   block directive
///
/// Equality is structural and ignores [`NodeId`].
#[derive(Debug, Serialize, Deserialize)]
pub struct Directive {
    #[serde(skip, default = "NodeId::next")]
    id: NodeId,

    /// Directive name
    pub directive: String,

    /// Source line (0 when unknown)
    #[serde(default)]
    pub line: usize,

    /// Arguments
    #[serde(default)]
    pub args: Vec<String>,

    /// Included configuration units, by index into the payload
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<usize>,

    /// Child directives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Vec<Directive>>,

    /// Comment text for `#` nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Directive {
    /// Create a simple directive
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: NodeId::next(),
            directive: name.into(),
            line: 0,
            args: args.into_iter().map(Into::into).collect(),
            includes: Vec::new(),
            block: None,
            comment: None,
        }
    }

    /// Create a block directive with the given children
    #[must_use]
    pub fn block<I, S>(name: impl Into<String>, args: I, children: Vec<Directive>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, args).with_block(children)
    }

    /// Create an `include` directive resolved to the given units
    #[must_use]
    pub fn include<I, S>(args: I, units: Vec<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut directive = Self::new(INCLUDE, args);
        directive.includes = units;
        directive
    }

    /// Create a comment node
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        let mut directive = Self::new(COMMENT, Vec::<String>::new());
        directive.comment = Some(text.into());
        directive
    }

    /// Replace the child block
    #[inline]
    #[must_use]
    pub fn with_block(mut self, children: Vec<Directive>) -> Self {
        self.block = Some(children);
        self
    }

    /// Set the source line
    #[inline]
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    /// Node identity
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Directive name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.directive
    }

    /// True for `#` nodes
    #[inline]
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.directive == COMMENT
    }

    /// True for `include` nodes
    #[inline]
    #[must_use]
    pub fn is_include(&self) -> bool {
        self.directive == INCLUDE
    }

    /// True when the directive carries a (possibly empty) block
    #[inline]
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.block.is_some()
    }

    /// Children, empty for simple directives
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Directive] {
        self.block.as_deref().unwrap_or(&[])
    }

    /// Mutable child block, turning a simple directive into a block one
    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<Directive> {
        self.block.get_or_insert_with(Vec::new)
    }

    /// Arguments joined with `sep`
    #[inline]
    #[must_use]
    pub fn joined_args(&self, sep: &str) -> String {
        self.args.join(sep)
    }

    /// Find the first child with the given name and return its arguments
    #[must_use]
    pub fn child_args(&self, name: &str) -> Option<&[String]> {
        self.children()
            .iter()
            .find(|child| child.directive == name)
            .map(|child| child.args.as_slice())
    }

    /// Short human-readable form: name and arguments
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_comment() {
            return format!("#{}", self.comment.as_deref().unwrap_or_default());
        }
        if self.args.is_empty() {
            self.directive.clone()
        } else {
            format!("{} {}", self.directive, self.args.join(" "))
        }
    }
}

/// A clone is a new node: the copy gets fresh ids throughout its subtree.
impl Clone for Directive {
    fn clone(&self) -> Self {
        Self {
            id: NodeId::next(),
            directive: self.directive.clone(),
            line: self.line,
            args: self.args.clone(),
            includes: self.includes.clone(),
            block: self.block.clone(),
            comment: self.comment.clone(),
        }
    }
}

impl PartialEq for Directive {
    fn eq(&self, other: &Self) -> bool {
        self.directive == other.directive
            && self.line == other.line
            && self.args == other.args
            && self.includes == other.includes
            && self.block == other.block
            && self.comment == other.comment
    }
}

impl Eq for Directive {}

impl Display for Directive {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Comma separated directive names, for log lines
#[must_use]
pub fn names(directives: &[Directive]) -> String {
    directives
        .iter()
        .map(Directive::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_unique() {
        let a = Directive::new("listen", ["80"]);
        let b = Directive::new("listen", ["80"]);

        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
    }

    #[test]
    fn clone_allocates_fresh_ids_in_subtree() {
        let original = Directive::block("server", Vec::<String>::new(), vec![Directive::new("listen", ["80"])]);
        let copy = original.clone();

        assert_eq!(original, copy);
        assert_ne!(original.id(), copy.id());
        assert_ne!(original.children()[0].id(), copy.children()[0].id());
    }

    #[test]
    fn deserialized_nodes_get_ids() {
        let json = r#"[{"directive":"listen","line":3,"args":["80"]},{"directive":"listen","line":4,"args":["443"]}]"#;
        let nodes: Vec<Directive> = serde_json::from_str(json).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_ne!(nodes[0].id(), nodes[1].id());
        assert_eq!(nodes[1].line, 4);
        assert!(!nodes[0].is_block());
    }

    #[test]
    fn serialization_omits_empty_optional_fields() {
        let leaf = Directive::new("listen", ["80"]);
        let json = serde_json::to_string(&leaf).unwrap();

        assert_eq!(json, r#"{"directive":"listen","line":0,"args":["80"]}"#);
    }

    #[test]
    fn children_mut_promotes_leaf_to_block() {
        let mut leaf = Directive::new("location", ["/"]);
        assert!(leaf.children().is_empty());

        leaf.children_mut().push(Directive::new("root", ["/srv"]));

        assert!(leaf.is_block());
        assert_eq!(leaf.child_args("root"), Some(&["/srv".to_string()][..]));
    }

    #[test]
    fn summary_forms() {
        assert_eq!(Directive::new("server", Vec::<String>::new()).summary(), "server");
        assert_eq!(Directive::new("listen", ["80", "ssl"]).summary(), "listen 80 ssl");
        assert_eq!(Directive::comment(" note").summary(), "# note");
        assert_eq!(names(&[Directive::new("a", ["1"]), Directive::new("b", ["2"])]), "a, b");
    }
}
