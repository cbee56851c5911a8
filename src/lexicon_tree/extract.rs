use alloc::vec::Vec;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::LexiconTree;
use crate::error::TreeError;
use crate::lexicon::Lexicon;
use crate::raw::{NodeIndex, RawAvlTree};

/// Stack of pending ancestors. A full tree is at most 20 levels deep.
type Path = SmallVec<[NodeIndex; 24]>;

impl<L: Lexicon + ?Sized> LexiconTree<'_, L> {
    /// Returns every stored value, ordered by term.
    ///
    /// The list is a snapshot; later changes to the tree do not affect it.
    /// This is what an owning dictionary writes out when it flushes.
    #[must_use]
    pub fn create_sorted_list(&self) -> Vec<u32> {
        store_sorted(&self.raw, self.raw.root())
    }

    /// Returns the values of the subtree rooted at `index`, ordered by term.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidIndex`] if `index` does not name a live node.
    pub fn create_sorted_list_from(&self, index: NodeIndex) -> Result<Vec<u32>, TreeError> {
        self.raw.try_node(index)?;
        Ok(store_sorted(&self.raw, Some(index)))
    }

    /// Number of nodes in the subtree rooted at `index`, `index` included.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidIndex`] if `index` does not name a live node.
    pub fn size_of_subtree(&self, index: NodeIndex) -> Result<usize, TreeError> {
        self.raw.try_node(index)?;
        Ok(self.raw.subtree_size(Some(index)))
    }

    /// Iterates over the stored values in term order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexicon_tree::LexiconTree;
    ///
    /// let terms = vec!["b", "c", "a"];
    /// let mut tree = LexiconTree::new(&terms);
    /// for value in 0..3 {
    ///     tree.insert(value).unwrap();
    /// }
    /// assert!(tree.iter().eq([2, 0, 1]));
    /// ```
    #[must_use]
    pub fn iter(&self) -> Values<'_> {
        let mut values = Values {
            raw: &self.raw,
            path: Path::new(),
            remaining: self.raw.len(),
        };
        values.push_left_spine(self.raw.root());
        values
    }
}

impl<'t, L: Lexicon + ?Sized> IntoIterator for &'t LexiconTree<'_, L> {
    type Item = u32;
    type IntoIter = Values<'t>;

    fn into_iter(self) -> Values<'t> {
        self.iter()
    }
}

// Sizes the buffer in one walk, fills it in a second.
fn store_sorted(raw: &RawAvlTree, root: Option<NodeIndex>) -> Vec<u32> {
    let mut list = Vec::with_capacity(raw.subtree_size(root));
    store_subtree(raw, root, &mut list);
    debug_assert_eq!(list.len(), list.capacity());
    list
}

fn store_subtree(raw: &RawAvlTree, index: Option<NodeIndex>, list: &mut Vec<u32>) {
    if let Some(index) = index {
        let node = raw.node(index);
        store_subtree(raw, node.left(), list);
        list.push(node.value());
        store_subtree(raw, node.right(), list);
    }
}

/// An in-order iterator over the values of a [`LexiconTree`].
///
/// This `struct` is created by [`LexiconTree::iter`].
#[derive(Clone)]
pub struct Values<'t> {
    raw: &'t RawAvlTree,
    path: Path,
    remaining: usize,
}

impl Values<'_> {
    fn push_left_spine(&mut self, mut current: Option<NodeIndex>) {
        while let Some(index) = current {
            self.path.push(index);
            current = self.raw.node(index).left();
        }
    }
}

impl Iterator for Values<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let index = self.path.pop()?;
        let node = self.raw.node(index);
        self.push_left_spine(node.right());
        self.remaining -= 1;
        Some(node.value())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Values<'_> {}

impl FusedIterator for Values<'_> {}
