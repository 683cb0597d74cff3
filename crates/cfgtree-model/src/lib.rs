//! cfgtree Document Model
//!
//! Parsed configuration trees, edit instructions, and the narrow parser and
//! renderer interfaces around them.
//!
//! # Core Concepts
//!
//! - [`Directive`]: one node of the tree (name, arguments, optional block)
//! - [`ConfigFile`]: one parsed source file, a root directive sequence
//! - [`Payload`]: every parsed file of one configuration, entry file first
//! - [`Change`]: one edit instruction (insert, append, delete)
//!
//! # Example
//!
//! ```rust
//! use cfgtree_model::{render_to_string, Directive, Payload};
//!
//! let payload = Payload::single(
//!     "nginx.conf",
//!     vec![Directive::block("server", Vec::<String>::new(), vec![Directive::new("listen", ["80"])])],
//! );
//!
//! assert_eq!(render_to_string(&payload), "server {\n    listen 80;\n}\n");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod change;
mod directive;
mod parse;
mod payload;
mod render;

// Re-exports
pub use change::{changes_from_file, changes_load, Action, Change, ChangesError};
pub use directive::{names, Directive, NodeId, COMMENT, INCLUDE};
pub use parse::{JsonPayloadParser, ParseError, ParseOptions, PayloadParser};
pub use payload::{ConfigFile, ErrorEntry, Payload, Status};
pub use render::{render, render_file, render_to_string};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
