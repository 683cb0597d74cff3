//! Node predicates for [`ConfigTree::apply`](crate::ConfigTree::apply)

use cfgtree_model::Directive;

/// Decides whether `apply` touches a node
///
/// Implemented by closures taking `&Directive` and by the [`Match`]
/// combinators.
pub trait Matcher {
    /// True if `directive` matches
    fn matches(&self, directive: &Directive) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Directive) -> bool,
{
    #[inline]
    fn matches(&self, directive: &Directive) -> bool {
        self(directive)
    }
}

/// Composable matcher
///
/// # Example
///
/// ```rust
/// use cfgtree_core::{Match, Matcher};
/// use cfgtree_model::Directive;
///
/// let api = Match::named("location").and(Match::with_args(["/api"]));
///
/// assert!(api.matches(&Directive::block("location", ["/api"], vec![])));
/// assert!(!api.matches(&Directive::block("location", ["/"], vec![])));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Match {
    /// Every node
    Any,

    /// Nodes with this name
    Name(String),

    /// Nodes with exactly these arguments
    Args(Vec<String>),

    /// Nodes with a direct child of this name and arguments
    Child { name: String, args: Vec<String> },

    /// Every inner matcher holds
    All(Vec<Match>),

    /// At least one inner matcher holds
    AnyOf(Vec<Match>),

    /// Inner matcher does not hold
    Not(Box<Match>),
}

impl Match {
    /// Match every node
    #[inline]
    #[must_use]
    pub fn any() -> Self {
        Self::Any
    }

    /// Match by name
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Match by exact argument list
    #[must_use]
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Args(args.into_iter().map(Into::into).collect())
    }

    /// Match nodes holding a child `name args...`
    ///
    /// Selects e.g. the `server` block whose `server_name` is a given host.
    #[must_use]
    pub fn containing<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Child {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Both matchers hold
    #[must_use]
    pub fn and(self, other: Match) -> Self {
        match self {
            Self::All(mut all) => {
                all.push(other);
                Self::All(all)
            }
            this => Self::All(vec![this, other]),
        }
    }

    /// Either matcher holds
    #[must_use]
    pub fn or(self, other: Match) -> Self {
        match self {
            Self::AnyOf(mut any) => {
                any.push(other);
                Self::AnyOf(any)
            }
            this => Self::AnyOf(vec![this, other]),
        }
    }

    /// Negation
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl Matcher for Match {
    fn matches(&self, directive: &Directive) -> bool {
        match self {
            Self::Any => true,
            Self::Name(name) => directive.directive == *name,
            Self::Args(args) => directive.args == *args,
            Self::Child { name, args } => directive
                .children()
                .iter()
                .any(|child| child.directive == *name && child.args == *args),
            Self::All(all) => all.iter().all(|m| m.matches(directive)),
            Self::AnyOf(any) => any.iter().any(|m| m.matches(directive)),
            Self::Not(inner) => !inner.matches(directive),
        }
    }
}
