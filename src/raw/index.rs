use core::fmt;

/// Maximum number of live nodes a tree can hold.
///
/// Indices are 16 bits wide; keeping well below `u16::MAX` leaves room for
/// the [`EMPTY_NODE`] sentinel.
pub const MAX_NODE_COUNT: usize = 16382;

/// Raw link value meaning "no node here".
///
/// This is one past the highest slot number, so it never aliases slot 0 or
/// any other real slot.
#[allow(clippy::cast_possible_truncation)]
pub const EMPTY_NODE: u16 = MAX_NODE_COUNT as u16;

/// The number of a slot in a tree's node arena.
///
/// Indices stay valid across rebalancing. They are invalidated when the node
/// they name is deleted; see [`LexiconTree::delete_at`](crate::LexiconTree::delete_at)
/// for the one case where deleting a different term frees a slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeIndex(u16);

impl NodeIndex {
    /// Wraps a raw slot number. The number is checked when it is used.
    #[inline]
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw slot number.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Decodes a stored link, mapping the sentinel to `None`.
    #[inline]
    pub(crate) const fn from_link(link: u16) -> Option<Self> {
        if link == EMPTY_NODE { None } else { Some(Self(link)) }
    }

    /// Encodes an optional index as a stored link.
    #[inline]
    pub(crate) const fn to_link(index: Option<Self>) -> u16 {
        match index {
            Some(index) => index.0,
            None => EMPTY_NODE,
        }
    }

    #[inline]
    pub(crate) const fn to_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u16> for NodeIndex {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<NodeIndex> for u16 {
    fn from(index: NodeIndex) -> Self {
        index.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
