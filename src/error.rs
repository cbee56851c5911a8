use core::fmt;

/// Why a node index was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexFault {
    /// The index was the [`EMPTY_NODE`](crate::EMPTY_NODE) sentinel.
    Empty,
    /// The index lies past the last slot the arena has handed out.
    OutOfRange,
    /// The slot exists but is currently on the free list.
    Released,
}

impl fmt::Display for IndexFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexFault::Empty => f.write_str("empty node sentinel"),
            IndexFault::OutOfRange => f.write_str("out of range"),
            IndexFault::Released => f.write_str("released slot"),
        }
    }
}

/// Errors returned by [`LexiconTree`](crate::LexiconTree) operations.
///
/// A failed operation leaves the tree exactly as it was.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Every slot below the tree's ceiling is live.
    #[error("tree is full ({capacity} nodes)")]
    CapacityExceeded {
        /// The ceiling that was hit.
        capacity: usize,
    },
    /// The inserted value resolves to a term that is already stored.
    #[error("term of value {value} is already in the tree")]
    DuplicateKey {
        /// The value that was being inserted.
        value: u32,
    },
    /// No stored value resolves to the requested term.
    #[error("term not found")]
    KeyNotFound,
    /// A node index did not name a live slot. Seeing this from a correct
    /// caller means the tree is corrupt.
    #[error("invalid node index {index}: {fault}")]
    InvalidIndex {
        /// The raw index that was rejected.
        index: u16,
        /// What was wrong with it.
        fault: IndexFault,
    },
}
