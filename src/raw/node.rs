use super::index::{EMPTY_NODE, NodeIndex};

/// One node of the tree as stored in the arena.
///
/// The record carries a 32-bit value and structural links only; the term a
/// value stands for lives in the owning [`Lexicon`](crate::Lexicon).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TreeNode {
    value: u32,
    // Zero marks a slot that sits on the free list.
    height: i16,
    left: u16,
    right: u16,
    parent: u16,
}

impl TreeNode {
    /// A fresh leaf: height 1, no children, no parent.
    pub(crate) const fn leaf(value: u32) -> Self {
        Self {
            value,
            height: 1,
            left: EMPTY_NODE,
            right: EMPTY_NODE,
            parent: EMPTY_NODE,
        }
    }

    pub(crate) const fn released() -> Self {
        Self {
            value: 0,
            height: 0,
            left: EMPTY_NODE,
            right: EMPTY_NODE,
            parent: EMPTY_NODE,
        }
    }

    /// The stored value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Height of the subtree rooted here; a leaf has height 1.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i16 {
        self.height
    }

    /// The left child, if any.
    #[inline]
    #[must_use]
    pub const fn left(&self) -> Option<NodeIndex> {
        NodeIndex::from_link(self.left)
    }

    /// The right child, if any.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> Option<NodeIndex> {
        NodeIndex::from_link(self.right)
    }

    /// The parent, or `None` for the root.
    #[inline]
    #[must_use]
    pub const fn parent(&self) -> Option<NodeIndex> {
        NodeIndex::from_link(self.parent)
    }

    #[inline]
    pub(crate) const fn is_live(&self) -> bool {
        self.height > 0
    }

    pub(crate) fn set_value(&mut self, value: u32) {
        self.value = value;
    }

    pub(crate) fn set_height(&mut self, height: i16) {
        self.height = height;
    }

    pub(crate) fn set_left(&mut self, left: Option<NodeIndex>) {
        self.left = NodeIndex::to_link(left);
    }

    pub(crate) fn set_right(&mut self, right: Option<NodeIndex>) {
        self.right = NodeIndex::to_link(right);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeIndex>) {
        self.parent = NodeIndex::to_link(parent);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    // value + height + three links, no padding.
    assert_eq_size!(TreeNode, [u8; 12]);

    #[test]
    fn leaf_has_no_links() {
        let node = TreeNode::leaf(7);
        assert_eq!(node.value(), 7);
        assert_eq!(node.height(), 1);
        assert!(node.is_live());
        assert_eq!(node.left(), None);
        assert_eq!(node.right(), None);
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn released_is_not_live() {
        assert!(!TreeNode::released().is_live());
    }

    #[test]
    fn links_round_trip() {
        let mut node = TreeNode::leaf(1);
        node.set_left(Some(NodeIndex::new(0)));
        node.set_right(Some(NodeIndex::new(3)));
        node.set_parent(Some(NodeIndex::new(2)));
        assert_eq!(node.left(), Some(NodeIndex::new(0)));
        assert_eq!(node.right(), Some(NodeIndex::new(3)));
        assert_eq!(node.parent(), Some(NodeIndex::new(2)));

        node.set_left(None);
        assert_eq!(node.left(), None);
    }
}
