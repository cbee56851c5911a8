mod arena;
mod index;
mod node;
mod raw_avl_tree;

pub use index::{EMPTY_NODE, MAX_NODE_COUNT, NodeIndex};
pub use node::TreeNode;
pub(crate) use raw_avl_tree::RawAvlTree;
