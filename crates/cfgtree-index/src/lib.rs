//! cfgtree Path Index
//!
//! Path strings over directive trees with radix tree index.
//!
//! # Overview
//!
//! The index provides:
//! - **Paths**: `/`-separated, escaped name keys, one per nesting level
//! - **KeyPolicy**: which directives are keyed by name and arguments
//! - **WalkBack**: positional record replayed against the payload
//! - **PathIndex**: exact lookups, ordered prefix walks, subtree reindexing
//!
//! # Example
//!
//! ```rust
//! use cfgtree_index::{KeyPolicy, PathIndex};
//! use cfgtree_model::{Directive, Payload};
//!
//! let payload = Payload::single(
//!     "nginx.conf",
//!     vec![Directive::block("location", ["/api"], vec![Directive::new("proxy_pass", ["http://b"])])],
//! );
//!
//! let index = PathIndex::build(&payload, KeyPolicy::default());
//! assert_eq!(index.paths(), vec!["/location %2Fapi", "/location %2Fapi/proxy_pass"]);
//! ```

#![warn(missing_docs)]

pub mod index;
pub mod key;
pub mod path;
pub mod record;

// Re-exports
pub use index::PathIndex;
pub use key::{KeyPolicy, DEFAULT_KEYED};
pub use record::WalkBack;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for index operations
    pub use crate::{path, KeyPolicy, PathIndex, WalkBack};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
