//! Payload parsers
//!
//! Text parsing of configuration files happens outside this workspace; what
//! arrives here is the parser's JSON payload. [`PayloadParser`] is the seam,
//! [`JsonPayloadParser`] the implementation that reads such payloads and
//! applies [`ParseOptions`] to them.

use crate::directive::Directive;
use crate::payload::{Payload, Status};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options controlling what a parse keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Directive names to drop (with their blocks)
    pub ignore: Vec<String>,

    /// Accept payloads that report parse errors
    pub catch_errors: bool,

    /// Keep only the entry file, dropping included units
    pub single_file: bool,

    /// Keep comment nodes
    pub comments: bool,
}

impl ParseOptions {
    /// Default options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With directives to ignore
    #[inline]
    #[must_use]
    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = names.into_iter().map(Into::into).collect();
        self
    }

    /// With error tolerance
    #[inline]
    #[must_use]
    pub fn with_catch_errors(mut self, catch: bool) -> Self {
        self.catch_errors = catch;
        self
    }

    /// With single-file mode
    #[inline]
    #[must_use]
    pub fn with_single_file(mut self, single: bool) -> Self {
        self.single_file = single;
        self
    }

    /// With comment retention
    #[inline]
    #[must_use]
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Apply the options to an already parsed payload
    ///
    /// # Errors
    /// Returns [`ParseError::Failed`] when the payload reports errors and
    /// `catch_errors` is off.
    pub fn apply(&self, mut payload: Payload, path: &Path) -> Result<Payload, ParseError> {
        if payload.status == Status::Failed && !self.catch_errors {
            let errors = payload.errors.iter().map(|e| e.error.clone()).collect();
            return Err(ParseError::Failed {
                path: path.to_path_buf(),
                errors,
            });
        }

        if self.single_file {
            payload.config.truncate(1);
        }

        for file in &mut payload.config {
            self.filter(&mut file.parsed);
        }

        Ok(payload)
    }

    fn filter(&self, sequence: &mut Vec<Directive>) {
        sequence.retain(|d| {
            if d.is_comment() {
                return self.comments;
            }
            !self.ignore.iter().any(|name| name == &d.directive)
        });

        for directive in sequence.iter_mut() {
            if self.single_file && directive.is_include() {
                directive.includes.clear();
            }
            if let Some(children) = directive.block.as_mut() {
                self.filter(children);
            }
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            ignore: Vec::new(),
            catch_errors: false,
            single_file: false,
            comments: true,
        }
    }
}

/// Parse error types
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("parsing file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid payload {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload {} reports {} parse error(s): {}", .path.display(), .errors.len(), .errors.join("; "))]
    Failed { path: PathBuf, errors: Vec<String> },

    #[error("payload {} has no configuration files", .path.display())]
    Empty { path: PathBuf },
}

/// Source of parsed payloads
pub trait PayloadParser {
    /// Parse the configuration rooted at `path`
    ///
    /// # Errors
    /// Returns error if the configuration can't be read or parsed
    fn parse(&self, path: &Path, options: &ParseOptions) -> Result<Payload, ParseError>;
}

/// Reads parser payloads serialized as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayloadParser;

impl JsonPayloadParser {
    /// Create new parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a payload from a JSON string
    ///
    /// # Errors
    /// Returns error if the JSON is invalid or rejected by `options`
    pub fn parse_str(&self, json: &str, options: &ParseOptions) -> Result<Payload, ParseError> {
        let path = PathBuf::from("<string>");
        let payload: Payload = serde_json::from_str(json).map_err(|source| ParseError::Json {
            path: path.clone(),
            source,
        })?;
        finish(payload, &path, options)
    }
}

impl PayloadParser for JsonPayloadParser {
    fn parse(&self, path: &Path, options: &ParseOptions) -> Result<Payload, ParseError> {
        debug!(path = %path.display(), ?options, "loading payload");
        let file = File::open(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let payload: Payload =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ParseError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        finish(payload, path, options)
    }
}

fn finish(payload: Payload, path: &Path, options: &ParseOptions) -> Result<Payload, ParseError> {
    if payload.config.is_empty() {
        return Err(ParseError::Empty {
            path: path.to_path_buf(),
        });
    }
    options.apply(payload, path)
}
