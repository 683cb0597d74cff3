//! cfgtree Core
//!
//! Path-addressed editing of parsed configuration trees.
//!
//! # Overview
//!
//! - [`ConfigTree`]: a payload plus its path index; lookups, insert, append,
//!   delete and predicate-driven apply, each followed by an exact reindex
//! - [`SharedTree`]: the same behind a read-write lock
//! - [`change_me`]: parse, apply an edit file, render
//!
//! # Example
//!
//! ```rust
//! use cfgtree_core::{ConfigTree, Value};
//! use cfgtree_model::{Change, Directive, Payload};
//!
//! let payload = Payload::single(
//!     "nginx.conf",
//!     vec![Directive::block("server", Vec::<String>::new(), vec![Directive::new("listen", ["80"])])],
//! );
//! let mut tree = ConfigTree::new(payload);
//!
//! tree.change_set(vec![
//!     Change::append("/server", vec![Directive::new("proxy_pass", ["backend"])]),
//!     Change::delete("/server/listen"),
//! ])
//! .unwrap();
//!
//! assert_eq!(tree.get("/server/proxy_pass").unwrap(), Value::Args("backend".into()));
//! assert!(tree.lookup("/server/listen").is_err());
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod edit;
pub mod error;
pub mod matcher;
pub mod resolve;
pub mod shared;
pub mod tree;

// Re-exports
pub use config::{ConfigError, TreeConfig};
pub use edit::change_me;
pub use error::{TreeError, TreeResult};
pub use matcher::{Match, Matcher};
pub use resolve::ResolveError;
pub use shared::SharedTree;
pub use tree::{ConfigTree, Value};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for tree editing
    pub use crate::{ConfigTree, Match, Matcher, SharedTree, TreeConfig, TreeError, Value};
    pub use cfgtree_index::{path, KeyPolicy, WalkBack};
    pub use cfgtree_model::{Action, Change, Directive, Payload};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
