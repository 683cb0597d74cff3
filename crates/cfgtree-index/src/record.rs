//! Location records

use cfgtree_model::NodeId;
use std::fmt::{self, Display, Formatter};

/// Ties a path to the position of its directive in the payload
///
/// Addressing is positional: replaying `ancestors` from the payload root
/// yields the sequence holding the directive, and `offset` selects it.
/// `node` is the directive's identity when it was indexed; it is checked,
/// never followed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WalkBack {
    /// Unit index, then block offsets down to the enclosing sequence
    pub ancestors: Vec<usize>,

    /// Offset of the directive within that sequence
    pub offset: usize,

    /// Identity of the indexed directive
    pub node: NodeId,
}

impl WalkBack {
    /// Create new record
    #[inline]
    #[must_use]
    pub fn new(ancestors: Vec<usize>, offset: usize, node: NodeId) -> Self {
        Self {
            ancestors,
            offset,
            node,
        }
    }

    /// Configuration unit the directive physically lives in
    #[inline]
    #[must_use]
    pub fn unit(&self) -> Option<usize> {
        self.ancestors.first().copied()
    }

    /// Chain addressing the directive's own block
    #[inline]
    #[must_use]
    pub fn child_chain(&self) -> Vec<usize> {
        let mut chain = Vec::with_capacity(self.ancestors.len() + 1);
        chain.extend_from_slice(&self.ancestors);
        chain.push(self.offset);
        chain
    }
}

impl Display for WalkBack {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.ancestors, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_chain_extends_ancestors() {
        let record = WalkBack::new(vec![0, 2], 5, NodeId::next());

        assert_eq!(record.child_chain(), vec![0, 2, 5]);
        assert_eq!(record.unit(), Some(0));
        assert_eq!(record.to_string(), "[0, 2]:5");
    }
}
