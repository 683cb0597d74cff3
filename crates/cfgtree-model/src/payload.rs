//! Parsed configuration payloads
//!
//! A [`Payload`] is the whole document: an ordered list of [`ConfigFile`]s,
//! each holding the root directive sequence of one source file. File 0 is
//! the entry point; the others are only reachable through `include`.

use crate::directive::Directive;
use serde::{Deserialize, Serialize};

/// Parse status reported by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Parsed cleanly
    #[default]
    Ok,

    /// Parsed with errors
    Failed,
}

/// One error reported by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// File the error belongs to (payload-level errors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Line number, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Error message
    pub error: String,
}

/// One parsed configuration unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Source file name
    pub file: String,

    /// Parse status of this file
    #[serde(default)]
    pub status: Status,

    /// Parse errors of this file
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,

    /// Root directive sequence
    #[serde(default)]
    pub parsed: Vec<Directive>,
}

impl ConfigFile {
    /// Create a cleanly parsed unit
    #[inline]
    #[must_use]
    pub fn new(file: impl Into<String>, parsed: Vec<Directive>) -> Self {
        Self {
            file: file.into(),
            status: Status::Ok,
            errors: Vec::new(),
            parsed,
        }
    }
}

/// The document model: every parsed unit of one configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Payload {
    /// Overall parse status
    #[serde(default)]
    pub status: Status,

    /// Payload-level errors
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,

    /// Parsed units, entry point first
    #[serde(default)]
    pub config: Vec<ConfigFile>,
}

impl Payload {
    /// Create a payload from parsed units
    #[inline]
    #[must_use]
    pub fn new(config: Vec<ConfigFile>) -> Self {
        Self {
            status: Status::Ok,
            errors: Vec::new(),
            config,
        }
    }

    /// Single-unit payload
    #[inline]
    #[must_use]
    pub fn single(file: impl Into<String>, parsed: Vec<Directive>) -> Self {
        Self::new(vec![ConfigFile::new(file, parsed)])
    }

    /// Directive sequence reached by replaying `chain`
    ///
    /// The first element selects a unit, each following element selects a
    /// directive in the current sequence and descends into its block.
    /// Returns `None` when the chain is empty, out of range, or descends
    /// into a simple directive.
    #[must_use]
    pub fn sequence(&self, chain: &[usize]) -> Option<&[Directive]> {
        let (unit, rest) = chain.split_first()?;
        let mut current = self.config.get(*unit)?.parsed.as_slice();
        for &offset in rest {
            current = current.get(offset)?.block.as_deref()?;
        }
        Some(current)
    }

    /// Mutable variant of [`Payload::sequence`]
    pub fn sequence_mut(&mut self, chain: &[usize]) -> Option<&mut Vec<Directive>> {
        let (unit, rest) = chain.split_first()?;
        let mut current = &mut self.config.get_mut(*unit)?.parsed;
        for &offset in rest {
            current = current.get_mut(offset)?.block.as_mut()?;
        }
        Some(current)
    }

    /// Number of `include` directives, across all units, that pull in `unit`
    #[must_use]
    pub fn include_sites(&self, unit: usize) -> usize {
        self.config
            .iter()
            .map(|f| sites_in(&f.parsed, unit))
            .sum()
    }

    /// Number of distinct include chains from unit 0 that reach `unit`
    ///
    /// Counts transitively: a unit included once from a unit that is itself
    /// included twice is reachable through two chains. Chains that revisit a
    /// unit are not counted, matching how cycles are cut when indexing.
    #[must_use]
    pub fn include_chains(&self, unit: usize) -> usize {
        fn chains(payload: &Payload, unit: usize, stack: &mut Vec<usize>) -> usize {
            if unit == 0 {
                return 1;
            }
            if stack.contains(&unit) {
                return 0;
            }
            stack.push(unit);
            let total = payload
                .config
                .iter()
                .enumerate()
                .map(|(from, f)| {
                    let sites = sites_in(&f.parsed, unit);
                    if sites == 0 {
                        0
                    } else {
                        sites.saturating_mul(chains(payload, from, stack))
                    }
                })
                .fold(0usize, usize::saturating_add);
            stack.pop();
            total
        }

        chains(self, unit, &mut Vec::new())
    }

    /// Total number of directives, comments included
    #[must_use]
    pub fn directive_count(&self) -> usize {
        fn count(sequence: &[Directive]) -> usize {
            sequence.iter().map(|d| 1 + count(d.children())).sum()
        }

        self.config.iter().map(|f| count(&f.parsed)).sum()
    }
}

fn sites_in(sequence: &[Directive], unit: usize) -> usize {
    sequence
        .iter()
        .map(|d| {
            let here = if d.is_include() {
                d.includes.iter().filter(|&&u| u == unit).count()
            } else {
                0
            };
            here + sites_in(d.children(), unit)
        })
        .sum()
}
