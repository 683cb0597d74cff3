//! Lock-protected tree for concurrent callers

use crate::error::TreeResult;
use crate::tree::ConfigTree;
use cfgtree_model::Change;
use parking_lot::RwLock;
use std::sync::Arc;

/// [`ConfigTree`] behind a read-write lock
///
/// Change sets hold the write lock for the whole list, so concurrent change
/// sets are serialised in lock acquisition order and never interleave.
/// Cloning shares the same tree.
#[derive(Debug, Clone)]
pub struct SharedTree {
    inner: Arc<RwLock<ConfigTree>>,
}

impl SharedTree {
    /// Wrap a tree
    #[must_use]
    pub fn new(tree: ConfigTree) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Run a change set under the write lock
    ///
    /// # Errors
    /// Same as [`ConfigTree::change_set`].
    pub fn change_set<I>(&self, changes: I) -> TreeResult<usize>
    where
        I: IntoIterator<Item = Change>,
    {
        self.inner.write().change_set(changes)
    }

    /// Read access under the read lock
    pub fn read<R>(&self, f: impl FnOnce(&ConfigTree) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Exclusive access under the write lock
    pub fn write<R>(&self, f: impl FnOnce(&mut ConfigTree) -> R) -> R {
        f(&mut *self.inner.write())
    }

    /// Unwrap the tree if this is the last handle
    ///
    /// # Errors
    /// Returns `self` when other handles are still alive.
    pub fn into_inner(self) -> Result<ConfigTree, Self> {
        Arc::try_unwrap(self.inner)
            .map(RwLock::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<ConfigTree> for SharedTree {
    fn from(tree: ConfigTree) -> Self {
        Self::new(tree)
    }
}
