use core::fmt;

use crate::error::TreeError;
use crate::lexicon::Lexicon;
use crate::raw::{MAX_NODE_COUNT, NodeIndex, RawAvlTree, TreeNode};

mod extract;

pub use extract::Values;

/// A height-balanced search tree over the terms of a [`Lexicon`].
///
/// Each node stores one 32-bit value, typically the lexicon's id for a term.
/// Nodes live in a preallocated arena and link to each other with 16-bit
/// slot numbers, so a node costs 12 bytes no matter how long its term is.
/// The price is a hard ceiling of [`MAX_NODE_COUNT`] nodes per tree.
///
/// The tree borrows its lexicon and never stores or copies a term. All
/// ordering decisions go through [`Lexicon::compare`].
///
/// # Examples
///
/// ```
/// use lexicon_tree::LexiconTree;
///
/// let terms = vec!["pear", "apple", "fig"];
/// let mut tree = LexiconTree::new(&terms);
/// for value in 0..3 {
///     tree.insert(value).unwrap();
/// }
///
/// assert!(tree.contains("fig"));
/// assert_eq!(tree.create_sorted_list(), [1, 2, 0]);
///
/// tree.delete("apple").unwrap();
/// assert_eq!(tree.create_sorted_list(), [2, 0]);
/// ```
pub struct LexiconTree<'a, L: Lexicon + ?Sized> {
    lexicon: &'a L,
    raw: RawAvlTree,
}

impl<'a, L: Lexicon + ?Sized> LexiconTree<'a, L> {
    /// Creates an empty tree ordering values by their terms in `lexicon`.
    ///
    /// The tree can hold [`MAX_NODE_COUNT`] nodes, all preallocated.
    #[must_use]
    pub fn new(lexicon: &'a L) -> Self {
        Self::with_capacity(lexicon, MAX_NODE_COUNT)
    }

    /// Creates an empty tree that holds at most `capacity` nodes.
    ///
    /// `capacity` is clamped to [`MAX_NODE_COUNT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use lexicon_tree::{LexiconTree, MAX_NODE_COUNT};
    ///
    /// let terms = vec!["a"];
    /// assert_eq!(LexiconTree::with_capacity(&terms, 64).capacity(), 64);
    /// assert_eq!(LexiconTree::with_capacity(&terms, 1 << 20).capacity(), MAX_NODE_COUNT);
    /// ```
    #[must_use]
    pub fn with_capacity(lexicon: &'a L, capacity: usize) -> Self {
        Self {
            lexicon,
            raw: RawAvlTree::with_capacity(capacity),
        }
    }

    /// The lexicon this tree resolves terms through.
    #[must_use]
    pub fn lexicon(&self) -> &'a L {
        self.lexicon
    }

    /// Number of values in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The most values this tree can hold.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// How many more values fit before [`TreeError::CapacityExceeded`].
    #[must_use]
    pub const fn free_slots(&self) -> usize {
        self.raw.free_slots()
    }

    /// Height of the whole tree; 0 when empty.
    #[must_use]
    pub fn height(&self) -> i16 {
        self.raw.height_of(self.raw.root())
    }

    /// Index of the root node.
    #[must_use]
    pub const fn root(&self) -> Option<NodeIndex> {
        self.raw.root()
    }

    /// Reads the node at `index`.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidIndex`] if `index` is the empty sentinel, past the
    /// end of the arena, or a released slot.
    pub fn node(&self, index: NodeIndex) -> Result<&TreeNode, TreeError> {
        self.raw.try_node(index)
    }

    /// Cached height of the subtree rooted at `index`.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidIndex`] as for [`node`](Self::node).
    pub fn node_height(&self, index: NodeIndex) -> Result<i16, TreeError> {
        self.raw.try_node(index).map(TreeNode::height)
    }

    /// Finds the node holding the value whose term is `term`.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if no stored value resolves to `term`.
    pub fn find_node(&self, term: &str) -> Result<&TreeNode, TreeError> {
        self.node_number(term).map(|index| self.raw.node(index))
    }

    /// Finds the index of the node holding the value whose term is `term`.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if no stored value resolves to `term`.
    pub fn node_number(&self, term: &str) -> Result<NodeIndex, TreeError> {
        let lexicon = self.lexicon;
        self.raw.search(|value| lexicon.compare(term, value)).ok_or(TreeError::KeyNotFound)
    }

    /// Returns `true` if some stored value resolves to `term`.
    #[must_use]
    pub fn contains(&self, term: &str) -> bool {
        self.node_number(term).is_ok()
    }

    /// Inserts `value`, ordered by its term in the lexicon, and returns the
    /// index of the new node.
    ///
    /// # Errors
    ///
    /// - [`TreeError::DuplicateKey`] if a stored value already resolves to
    ///   the same term. The stored value is kept.
    /// - [`TreeError::CapacityExceeded`] if the tree is full.
    ///
    /// The tree is unchanged on error.
    ///
    /// # Panics
    ///
    /// Panics if the lexicon panics resolving `value`, e.g. a slice lexicon
    /// given a value past its end.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexicon_tree::{LexiconTree, TreeError};
    ///
    /// let terms = vec!["cat", "dog", "cat"];
    /// let mut tree = LexiconTree::new(&terms);
    /// tree.insert(0).unwrap();
    /// tree.insert(1).unwrap();
    /// assert_eq!(tree.insert(2), Err(TreeError::DuplicateKey { value: 2 }));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, value: u32) -> Result<NodeIndex, TreeError> {
        let lexicon = self.lexicon;
        let term = lexicon.term(value);
        self.raw.insert(value, |stored| lexicon.compare(term, stored))
    }

    /// Removes the value whose term is `term` and returns it.
    ///
    /// # Errors
    ///
    /// [`TreeError::KeyNotFound`] if no stored value resolves to `term`; the
    /// tree is unchanged.
    pub fn delete(&mut self, term: &str) -> Result<u32, TreeError> {
        let index = self.node_number(term)?;
        self.raw.remove(index)
    }

    /// Removes the node at `index` and returns the value it held.
    ///
    /// If the node has two children, its in-order successor's value moves
    /// into `index` and the successor's slot is released instead, so the
    /// successor's old index becomes invalid while `index` stays live.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidIndex`] if `index` does not name a live node; the
    /// tree is unchanged.
    pub fn delete_at(&mut self, index: NodeIndex) -> Result<u32, TreeError> {
        self.raw.remove(index)
    }

    /// Removes every value, releasing the whole arena at once.
    pub fn clear(&mut self) {
        self.raw.clear();
    }
}

impl<L: Lexicon + ?Sized> Clone for LexiconTree<'_, L> {
    fn clone(&self) -> Self {
        Self {
            lexicon: self.lexicon,
            raw: self.raw.clone(),
        }
    }
}

impl<L: Lexicon + ?Sized> fmt::Debug for LexiconTree<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
