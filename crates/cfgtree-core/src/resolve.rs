//! Location resolver
//!
//! Replays a [`WalkBack`] against the payload. The record's `ancestors`
//! lead to the sequence that holds the node; `offset` selects it and the
//! stored [`NodeId`] confirms it is still the node that was indexed.

use cfgtree_index::WalkBack;
use cfgtree_model::{Directive, NodeId, Payload};

/// Record replay failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Chain leaves the document or descends into a simple directive
    #[error("chain {chain:?} does not address a directive sequence")]
    BrokenChain { chain: Vec<usize> },

    /// Offset past the end of the sequence
    #[error("offset {offset} out of range for sequence of {len}")]
    OutOfRange { offset: usize, len: usize },

    /// Slot holds a different node
    #[error("expected node {expected}, found {found}")]
    IdentityMismatch { expected: NodeId, found: NodeId },
}

/// Sequence holding the record's node
///
/// # Errors
/// Returns [`ResolveError::BrokenChain`] if the chain does not replay.
pub fn sequence<'a>(payload: &'a Payload, record: &WalkBack) -> Result<&'a [Directive], ResolveError> {
    payload
        .sequence(&record.ancestors)
        .ok_or_else(|| ResolveError::BrokenChain {
            chain: record.ancestors.clone(),
        })
}

/// Mutable sequence holding the record's node
///
/// # Errors
/// Returns [`ResolveError::BrokenChain`] if the chain does not replay.
pub fn sequence_mut<'a>(
    payload: &'a mut Payload,
    record: &WalkBack,
) -> Result<&'a mut Vec<Directive>, ResolveError> {
    payload
        .sequence_mut(&record.ancestors)
        .ok_or_else(|| ResolveError::BrokenChain {
            chain: record.ancestors.clone(),
        })
}

/// The record's node, identity checked
///
/// # Errors
/// Returns error if the chain breaks, the offset is out of range, or the
/// slot holds another node.
pub fn node<'a>(payload: &'a Payload, record: &WalkBack) -> Result<&'a Directive, ResolveError> {
    let seq = sequence(payload, record)?;
    check(seq, record)?;
    Ok(&seq[record.offset])
}

/// Mutable variant of [`node`]
///
/// # Errors
/// Same as [`node`].
pub fn node_mut<'a>(
    payload: &'a mut Payload,
    record: &WalkBack,
) -> Result<&'a mut Directive, ResolveError> {
    let seq = sequence_mut(payload, record)?;
    check(seq, record)?;
    Ok(&mut seq[record.offset])
}

/// Offset of the node carrying `id`
#[must_use]
pub fn slot(sequence: &[Directive], id: NodeId) -> Option<usize> {
    sequence.iter().position(|d| d.id() == id)
}

fn check(sequence: &[Directive], record: &WalkBack) -> Result<(), ResolveError> {
    let found = sequence.get(record.offset).ok_or(ResolveError::OutOfRange {
        offset: record.offset,
        len: sequence.len(),
    })?;
    if found.id() != record.node {
        return Err(ResolveError::IdentityMismatch {
            expected: record.node,
            found: found.id(),
        });
    }
    Ok(())
}
