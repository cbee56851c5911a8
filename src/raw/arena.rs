use alloc::vec::Vec;

use super::index::{EMPTY_NODE, MAX_NODE_COUNT, NodeIndex};
use super::node::TreeNode;
use crate::error::{IndexFault, TreeError};

/// Flat node storage with a stack of recycled slots.
///
/// Every slot below `slots.len()` is either live or on `free`, never both.
#[derive(Clone)]
pub(crate) struct NodeArena {
    slots: Vec<TreeNode>,
    free: Vec<NodeIndex>,
    ceiling: usize,
}

impl NodeArena {
    /// Creates an arena holding at most `ceiling` live nodes, preallocating
    /// all of them. The ceiling is clamped to [`MAX_NODE_COUNT`].
    pub(crate) fn with_capacity(ceiling: usize) -> Self {
        let ceiling = ceiling.min(MAX_NODE_COUNT);
        Self {
            slots: Vec::with_capacity(ceiling),
            free: Vec::new(),
            ceiling,
        }
    }

    pub(crate) const fn capacity(&self) -> usize {
        self.ceiling
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots that can still be allocated before the ceiling is reached.
    pub(crate) const fn free_slots(&self) -> usize {
        self.ceiling - self.len()
    }

    /// Hands out a slot holding a fresh leaf for `value`.
    pub(crate) fn alloc(&mut self, value: u32) -> Result<NodeIndex, TreeError> {
        if let Some(index) = self.free.pop() {
            // Reuse a free slot.
            self.slots[index.to_usize()] = TreeNode::leaf(value);
            return Ok(index);
        }

        if self.slots.len() >= self.ceiling {
            return Err(TreeError::CapacityExceeded { capacity: self.ceiling });
        }

        // `ceiling <= MAX_NODE_COUNT`, so the new slot number is below `EMPTY_NODE`.
        #[allow(clippy::cast_possible_truncation)]
        let index = NodeIndex::new(self.slots.len() as u16);
        self.slots.push(TreeNode::leaf(value));
        Ok(index)
    }

    /// Returns a live slot to the free list.
    pub(crate) fn release(&mut self, index: NodeIndex) {
        let slot = &mut self.slots[index.to_usize()];
        debug_assert!(slot.is_live(), "`NodeArena::release()` - slot {index} is already free!");
        *slot = TreeNode::released();
        self.free.push(index);
    }

    /// Checks that `index` names a live slot.
    pub(crate) fn check(&self, index: NodeIndex) -> Result<NodeIndex, TreeError> {
        let fault = if index.get() == EMPTY_NODE {
            IndexFault::Empty
        } else {
            match self.slots.get(index.to_usize()) {
                None => IndexFault::OutOfRange,
                Some(node) if !node.is_live() => IndexFault::Released,
                Some(_) => return Ok(index),
            }
        };
        Err(TreeError::InvalidIndex {
            index: index.get(),
            fault,
        })
    }

    /// Bounds-checked access for indices that come from outside the tree.
    pub(crate) fn try_get(&self, index: NodeIndex) -> Result<&TreeNode, TreeError> {
        self.check(index).map(|index| self.get(index))
    }

    /// Access for indices read from live links.
    #[inline]
    pub(crate) fn get(&self, index: NodeIndex) -> &TreeNode {
        let node = &self.slots[index.to_usize()];
        debug_assert!(node.is_live(), "`NodeArena::get()` - slot {index} is free!");
        node
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, index: NodeIndex) -> &mut TreeNode {
        let node = &mut self.slots[index.to_usize()];
        debug_assert!(node.is_live(), "`NodeArena::get_mut()` - slot {index} is free!");
        node
    }

    /// Releases every slot at once. Preallocated storage is kept.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    /// Iterates over `(index, node)` for every live slot, in slot order.
    pub(crate) fn live(&self) -> impl Iterator<Item = (NodeIndex, &TreeNode)> {
        self.slots.iter().enumerate().filter(|(_, node)| node.is_live()).map(|(i, node)| {
            #[allow(clippy::cast_possible_truncation)]
            let index = NodeIndex::new(i as u16);
            (index, node)
        })
    }

    #[cfg(test)]
    pub(crate) fn free_list(&self) -> &[NodeIndex] {
        &self.free
    }

    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }
}
