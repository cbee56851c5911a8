use core::cmp::Ordering;

use tracing::{debug, trace};

use super::arena::NodeArena;
use super::index::NodeIndex;
use super::node::TreeNode;
use crate::error::TreeError;

/// The height-balanced engine backing `LexiconTree`.
///
/// The engine never sees keys. Every search takes a probe closure that is
/// called with a stored value and returns how the sought key orders against
/// that value's key.
#[derive(Clone)]
pub(crate) struct RawAvlTree {
    /// Arena storing all tree nodes.
    nodes: NodeArena,
    /// Slot of the root node, if the tree is non-empty.
    root: Option<NodeIndex>,
}

/// Where a descent for a key stopped.
enum Descent {
    /// A node with an equal key exists.
    Found(NodeIndex),
    /// The key belongs under `parent` on the given side (`None` for an empty tree).
    Vacant { parent: Option<NodeIndex>, side: Ordering },
}

impl RawAvlTree {
    /// Creates an empty tree that holds at most `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            root: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn free_slots(&self) -> usize {
        self.nodes.free_slots()
    }

    pub(crate) const fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Drops every node at once.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Bounds-checked node access for caller-supplied indices.
    pub(crate) fn try_node(&self, index: NodeIndex) -> Result<&TreeNode, TreeError> {
        self.nodes.try_get(index)
    }

    /// Node access for indices taken from live links.
    #[inline]
    pub(crate) fn node(&self, index: NodeIndex) -> &TreeNode {
        self.nodes.get(index)
    }

    /// Height of an optional subtree; an absent child counts as 0.
    #[inline]
    pub(crate) fn height_of(&self, index: Option<NodeIndex>) -> i16 {
        index.map_or(0, |index| self.nodes.get(index).height())
    }

    /// Searches for the node whose key `probe` reports as equal.
    pub(crate) fn search<F>(&self, probe: F) -> Option<NodeIndex>
    where
        F: FnMut(u32) -> Ordering,
    {
        match self.descend(probe) {
            Descent::Found(index) => Some(index),
            Descent::Vacant { .. } => None,
        }
    }

    fn descend<F>(&self, mut probe: F) -> Descent
    where
        F: FnMut(u32) -> Ordering,
    {
        let mut parent = None;
        let mut side = Ordering::Equal;
        let mut current = self.root;

        while let Some(index) = current {
            let node = self.nodes.get(index);
            side = probe(node.value());
            parent = Some(index);
            current = match side {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Descent::Found(index),
            };
        }

        Descent::Vacant { parent, side }
    }

    /// Inserts `value`, using `probe` to order the new value's key against
    /// stored values. Fails without touching the tree if an equal key is
    /// present or the arena is full.
    pub(crate) fn insert<F>(&mut self, value: u32, probe: F) -> Result<NodeIndex, TreeError>
    where
        F: FnMut(u32) -> Ordering,
    {
        let (parent, side) = match self.descend(probe) {
            Descent::Found(existing) => {
                trace!(value, existing = existing.get(), "insert refused: duplicate key");
                return Err(TreeError::DuplicateKey { value });
            }
            Descent::Vacant { parent, side } => (parent, side),
        };

        let index = self.nodes.alloc(value).inspect_err(|_| {
            debug!(value, capacity = self.nodes.capacity(), "insert refused: tree is full");
        })?;

        match parent {
            None => self.root = Some(index),
            Some(parent) => {
                self.nodes.get_mut(index).set_parent(Some(parent));
                let parent = self.nodes.get_mut(parent);
                if side == Ordering::Less {
                    parent.set_left(Some(index));
                } else {
                    parent.set_right(Some(index));
                }
            }
        }
        trace!(value, index = index.get(), "inserted");

        self.rebalance_from(parent);
        Ok(index)
    }

    /// Unlinks the node at `index` and returns the value it held.
    ///
    /// A node with two children takes over its in-order successor's value and
    /// the successor's slot is the one released.
    pub(crate) fn remove(&mut self, index: NodeIndex) -> Result<u32, TreeError> {
        let index = self.nodes.check(index)?;
        let node = *self.nodes.get(index);
        let removed = node.value();

        let target = match (node.left(), node.right()) {
            (Some(_), Some(right)) => {
                let successor = self.min_of(right);
                let successor_value = self.nodes.get(successor).value();
                self.nodes.get_mut(index).set_value(successor_value);
                successor
            }
            _ => index,
        };

        let target_node = *self.nodes.get(target);
        let child = target_node.left().or(target_node.right());
        let parent = target_node.parent();

        if let Some(child) = child {
            self.nodes.get_mut(child).set_parent(parent);
        }
        self.replace_child(parent, target, child);
        self.nodes.release(target);
        trace!(value = removed, index = index.get(), released = target.get(), "removed");

        self.rebalance_from(parent);
        Ok(removed)
    }

    /// Leftmost node of the subtree rooted at `index`.
    fn min_of(&self, mut index: NodeIndex) -> NodeIndex {
        while let Some(left) = self.nodes.get(index).left() {
            index = left;
        }
        index
    }

    /// Points `parent`'s link to `old` at `new` instead; a `None` parent
    /// means `old` was the root.
    fn replace_child(&mut self, parent: Option<NodeIndex>, old: NodeIndex, new: Option<NodeIndex>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let parent = self.nodes.get_mut(parent);
                if parent.left() == Some(old) {
                    parent.set_left(new);
                } else {
                    debug_assert_eq!(parent.right(), Some(old), "`replace_child()` - broken parent link");
                    parent.set_right(new);
                }
            }
        }
    }

    fn update_height(&mut self, index: NodeIndex) {
        let node = self.nodes.get(index);
        let height = 1 + self.height_of(node.left()).max(self.height_of(node.right()));
        self.nodes.get_mut(index).set_height(height);
    }

    /// Left height minus right height.
    fn balance_factor(&self, index: NodeIndex) -> i16 {
        let node = self.nodes.get(index);
        self.height_of(node.left()) - self.height_of(node.right())
    }

    /// Lifts `child` into `parent`'s place. A left child makes this a right
    /// rotation and vice versa.
    fn rotate(&mut self, parent: NodeIndex, child: NodeIndex) {
        let grandparent = self.nodes.get(parent).parent();

        if self.nodes.get(parent).left() == Some(child) {
            let inner = self.nodes.get(child).right();
            self.nodes.get_mut(parent).set_left(inner);
            if let Some(inner) = inner {
                self.nodes.get_mut(inner).set_parent(Some(parent));
            }
            self.nodes.get_mut(child).set_right(Some(parent));
        } else {
            debug_assert_eq!(self.nodes.get(parent).right(), Some(child), "`rotate()` - not a child");
            let inner = self.nodes.get(child).left();
            self.nodes.get_mut(parent).set_right(inner);
            if let Some(inner) = inner {
                self.nodes.get_mut(inner).set_parent(Some(parent));
            }
            self.nodes.get_mut(child).set_left(Some(parent));
        }

        self.nodes.get_mut(parent).set_parent(Some(child));
        self.nodes.get_mut(child).set_parent(grandparent);
        self.replace_child(grandparent, parent, Some(child));

        self.update_height(parent);
        self.update_height(child);
        trace!(parent = parent.get(), child = child.get(), "rotated");
    }

    /// Restores heights and balance at `index` and returns the root of the
    /// (possibly rotated) subtree that now stands in its place.
    fn rebalance_node(&mut self, index: NodeIndex) -> NodeIndex {
        self.update_height(index);
        let balance = self.balance_factor(index);
        if balance.abs() <= 1 {
            return index;
        }

        let left_heavy = balance > 1;
        let node = *self.nodes.get(index);
        let heavy = if left_heavy { node.left() } else { node.right() };
        let Some(heavy) = heavy else {
            debug_assert!(false, "`rebalance_node()` - heavy side has no child");
            return index;
        };

        // A child leaning the other way needs a double rotation.
        let child_balance = self.balance_factor(heavy);
        let zigzag = if left_heavy { child_balance < 0 } else { child_balance > 0 };
        let pivot = if zigzag {
            let heavy_node = self.nodes.get(heavy);
            let grandchild = if left_heavy { heavy_node.right() } else { heavy_node.left() };
            match grandchild {
                Some(grandchild) => {
                    self.rotate(heavy, grandchild);
                    grandchild
                }
                None => heavy,
            }
        } else {
            heavy
        };

        self.rotate(index, pivot);
        pivot
    }

    /// Walks from `start` to the root, fixing heights and rotating wherever
    /// the balance factor leaves `-1..=1`.
    fn rebalance_from(&mut self, start: Option<NodeIndex>) {
        let mut current = start;
        while let Some(index) = current {
            let top = self.rebalance_node(index);
            current = self.nodes.get(top).parent();
        }
    }

    /// Number of nodes in the subtree rooted at `index`.
    pub(crate) fn subtree_size(&self, index: Option<NodeIndex>) -> usize {
        match index {
            None => 0,
            Some(index) => {
                let node = self.nodes.get(index);
                1 + self.subtree_size(node.left()) + self.subtree_size(node.right())
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    use crate::raw::MAX_NODE_COUNT;

    impl RawAvlTree {
        /// Validates all AVL invariants. Panics with a descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert!(self.nodes.is_empty(), "Empty tree should have no live nodes");
                return;
            };
            assert_eq!(self.node(root).parent(), None, "Root must have no parent");

            let mut seen = Vec::new();
            self.validate_node(root, None, None, &mut seen);

            assert_eq!(seen.len(), self.len(), "Reachable nodes must equal live nodes");
            let live: Vec<NodeIndex> = self.nodes.live().map(|(index, _)| index).collect();
            seen.sort();
            assert_eq!(seen, live, "Reachable slots must be exactly the live slots");
        }

        fn validate_node(&self, index: NodeIndex, low: Option<u32>, high: Option<u32>, seen: &mut Vec<NodeIndex>) -> i16 {
            seen.push(index);
            let node = self.node(index);
            let value = node.value();
            if let Some(low) = low {
                assert!(value > low, "Node {index} value {value} must exceed {low}");
            }
            if let Some(high) = high {
                assert!(value < high, "Node {index} value {value} must be below {high}");
            }

            let mut child_height = |child: Option<NodeIndex>, low, high| match child {
                None => 0,
                Some(child) => {
                    assert_eq!(self.node(child).parent(), Some(index), "Child {child} must point back to {index}");
                    self.validate_node(child, low, high, seen)
                }
            };
            let left = child_height(node.left(), low, Some(value));
            let right = child_height(node.right(), Some(value), high);

            assert_eq!(node.height(), 1 + left.max(right), "Node {index} has a stale height");
            assert!((left - right).abs() <= 1, "Node {index} is unbalanced ({left} vs {right})");
            node.height()
        }

        fn in_order(&self) -> Vec<u32> {
            fn walk(tree: &RawAvlTree, index: Option<NodeIndex>, out: &mut Vec<u32>) {
                if let Some(index) = index {
                    let node = tree.node(index);
                    walk(tree, node.left(), out);
                    out.push(node.value());
                    walk(tree, node.right(), out);
                }
            }
            let mut out = Vec::new();
            walk(self, self.root, &mut out);
            out
        }
    }

    // Values order by themselves.
    fn insert(tree: &mut RawAvlTree, value: u32) -> Result<NodeIndex, TreeError> {
        tree.insert(value, |stored| value.cmp(&stored))
    }

    fn remove(tree: &mut RawAvlTree, value: u32) -> Result<u32, TreeError> {
        let index = tree.search(|stored| value.cmp(&stored)).ok_or(TreeError::KeyNotFound)?;
        tree.remove(index)
    }

    fn tree_of(values: &[u32]) -> RawAvlTree {
        let mut tree = RawAvlTree::with_capacity(MAX_NODE_COUNT);
        for &value in values {
            insert(&mut tree, value).unwrap();
            tree.validate_invariants();
        }
        tree
    }

    fn root_value(tree: &RawAvlTree) -> u32 {
        tree.node(tree.root().unwrap()).value()
    }

    #[test]
    fn empty_tree() {
        let tree = RawAvlTree::with_capacity(16);
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.height_of(None), 0);
        assert_eq!(tree.search(|_| Ordering::Equal), None);
        assert_eq!(tree.subtree_size(None), 0);
    }

    #[test]
    fn single_rotations() {
        // Right-right case rotates left.
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(root_value(&tree), 2);
        assert_eq!(tree.height_of(tree.root()), 2);

        // Left-left case rotates right.
        let tree = tree_of(&[3, 2, 1]);
        assert_eq!(root_value(&tree), 2);
    }

    #[test]
    fn double_rotations() {
        // Left-right case.
        let tree = tree_of(&[3, 1, 2]);
        assert_eq!(root_value(&tree), 2);
        assert_eq!(tree.in_order(), [1, 2, 3]);

        // Right-left case.
        let tree = tree_of(&[1, 3, 2]);
        assert_eq!(root_value(&tree), 2);
        assert_eq!(tree.in_order(), [1, 2, 3]);
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let values: Vec<u32> = (1..=31).collect();
        let tree = tree_of(&values);
        assert_eq!(tree.in_order(), values);
        // 31 nodes fill a perfect tree of height 5.
        assert_eq!(tree.height_of(tree.root()), 5);
    }

    #[test]
    fn duplicate_leaves_tree_unchanged() {
        let mut tree = tree_of(&[5, 3, 8]);
        let before = tree.in_order();
        assert_eq!(insert(&mut tree, 3), Err(TreeError::DuplicateKey { value: 3 }));
        assert_eq!(tree.in_order(), before);
        assert_eq!(tree.len(), 3);
        tree.validate_invariants();
    }

    #[test]
    fn capacity_is_enforced() {
        let mut tree = RawAvlTree::with_capacity(4);
        for value in 0..4 {
            insert(&mut tree, value).unwrap();
        }
        assert_eq!(insert(&mut tree, 4), Err(TreeError::CapacityExceeded { capacity: 4 }));
        // A duplicate is still reported as such when full.
        assert_eq!(insert(&mut tree, 2), Err(TreeError::DuplicateKey { value: 2 }));
        tree.validate_invariants();

        remove(&mut tree, 0).unwrap();
        insert(&mut tree, 4).unwrap();
        tree.validate_invariants();
    }

    #[test]
    fn remove_leaf_and_single_child() {
        let mut tree = tree_of(&[2, 1, 3, 4]);
        assert_eq!(remove(&mut tree, 1), Ok(1));
        tree.validate_invariants();
        assert_eq!(remove(&mut tree, 3), Ok(3));
        tree.validate_invariants();
        assert_eq!(tree.in_order(), [2, 4]);
    }

    #[test]
    fn remove_two_children_moves_successor_value() {
        let mut tree = tree_of(&[4, 2, 6, 1, 3, 5, 7]);
        let root = tree.root().unwrap();
        let successor = tree.search(|stored| 5u32.cmp(&stored)).unwrap();

        assert_eq!(tree.remove(root), Ok(4));
        tree.validate_invariants();
        assert_eq!(tree.node(root).value(), 5);
        assert!(tree.try_node(successor).is_err());
        assert_eq!(tree.in_order(), [1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn remove_root_until_empty() {
        let mut tree = tree_of(&[1, 2, 3, 4, 5, 6, 7, 8]);
        while let Some(root) = tree.root() {
            tree.remove(root).unwrap();
            tree.validate_invariants();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.free_slots(), MAX_NODE_COUNT);
    }

    #[test]
    fn remove_rebalances_deep_tree() {
        let mut tree = tree_of(&[8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1]);
        let height = tree.height_of(tree.root());
        assert_eq!(remove(&mut tree, 12), Ok(12));
        tree.validate_invariants();
        assert!(tree.height_of(tree.root()) <= height);
    }

    #[test]
    fn remove_invalid_index() {
        let mut tree = tree_of(&[1, 2]);
        assert!(matches!(tree.remove(NodeIndex::new(99)), Err(TreeError::InvalidIndex { .. })));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn clear_resets() {
        let mut tree = tree_of(&[1, 2, 3]);
        tree.clear();
        tree.validate_invariants();
        assert_eq!(tree.root(), None);
        insert(&mut tree, 9).unwrap();
        tree.validate_invariants();
    }

    #[test]
    fn subtree_sizes() {
        let tree = tree_of(&(1..=10).collect::<Vec<_>>());
        assert_eq!(tree.subtree_size(tree.root()), 10);
        let left = tree.node(tree.root().unwrap()).left();
        assert_eq!(tree.subtree_size(left), tree.in_order().iter().filter(|&&v| v < root_value(&tree)).count());
    }

    proptest! {
        #[test]
        fn ops_match_btreeset(operations in prop::collection::vec((any::<bool>(), 0u32..200), 0..600)) {
            let mut tree = RawAvlTree::with_capacity(MAX_NODE_COUNT);
            let mut model = BTreeSet::new();

            for (is_insert, value) in operations {
                if is_insert {
                    let result = insert(&mut tree, value);
                    prop_assert_eq!(result.is_ok(), model.insert(value));
                } else {
                    let result = remove(&mut tree, value);
                    prop_assert_eq!(result.is_ok(), model.remove(&value));
                    if let Ok(removed) = result {
                        prop_assert_eq!(removed, value);
                    }
                }
                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.free_slots(), MAX_NODE_COUNT - model.len());
            }

            prop_assert_eq!(tree.in_order(), model.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn height_is_logarithmic(values in prop::collection::btree_set(any::<u32>(), 1..2000)) {
            let mut tree = RawAvlTree::with_capacity(MAX_NODE_COUNT);
            for &value in &values {
                insert(&mut tree, value).unwrap();
            }
            // The sparsest AVL tree of a given height bounds the height from above.
            let height = tree.height_of(tree.root()) as usize;
            prop_assert!(values.len() >= min_nodes(height));
        }
    }

    /// Fewest nodes an AVL tree of `height` can have.
    fn min_nodes(height: usize) -> usize {
        let (mut shorter, mut taller) = (0, 1);
        if height == 0 {
            return 0;
        }
        for _ in 1..height {
            (shorter, taller) = (taller, 1 + taller + shorter);
        }
        taller
    }

    #[test]
    fn min_nodes_matches_known_values() {
        assert_eq!([0, 1, 2, 3, 4, 5].map(min_nodes), [0, 1, 2, 4, 7, 12]);
    }
}
