//! A compact, height-balanced term dictionary tree for index construction.
//!
//! While an index is being built, the lexicon has to keep every distinct term
//! in sorted order so it can be flushed to disk. This crate provides
//! [`LexiconTree`], an AVL tree that stores one 32-bit value per term and
//! links nodes with 16-bit arena indices instead of pointers:
//!
//! - [`insert`](LexiconTree::insert) / [`delete`](LexiconTree::delete) - O(log n), rebalancing on the way up
//! - [`find_node`](LexiconTree::find_node) / [`node_number`](LexiconTree::node_number) - O(log n) lookup by term
//! - [`create_sorted_list`](LexiconTree::create_sorted_list) - all values in term order, for flushing
//!
//! # Example
//!
//! ```
//! use lexicon_tree::{LexiconTree, TreeError};
//!
//! // The lexicon owns the terms; the tree only stores their ids.
//! let terms = vec!["retrieval", "index", "query", "posting"];
//! let mut tree = LexiconTree::new(&terms);
//! for id in 0..4 {
//!     tree.insert(id).unwrap();
//! }
//!
//! assert_eq!(tree.find_node("query").unwrap().value(), 2);
//! assert_eq!(tree.delete("missing"), Err(TreeError::KeyNotFound));
//!
//! // Flush order: index, posting, query, retrieval.
//! assert_eq!(tree.create_sorted_list(), [1, 3, 2, 0]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **12 bytes per node** - Value, height and three 16-bit links
//! - **Bounded** - At most [`MAX_NODE_COUNT`] nodes; inserting past that fails instead of growing
//! - **Key-agnostic** - Terms stay in the caller's [`Lexicon`]; the tree never copies them
//!
//! The tree is a single-writer structure with no internal synchronization.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod error;
mod lexicon;
mod raw;

pub mod lexicon_tree;

pub use error::{IndexFault, TreeError};
pub use lexicon::Lexicon;
pub use lexicon_tree::LexiconTree;
pub use raw::{EMPTY_NODE, MAX_NODE_COUNT, NodeIndex, TreeNode};
