use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// The dictionary that owns the terms a [`LexiconTree`](crate::LexiconTree) orders.
///
/// The tree only stores 32-bit values. Whenever it needs to compare, it asks
/// the lexicon for the term a value stands for. Terms compare byte-wise.
///
/// # Examples
///
/// ```
/// use core::cmp::Ordering;
/// use lexicon_tree::Lexicon;
///
/// let terms = vec!["apple", "banana"];
/// assert_eq!(terms.term(1), "banana");
/// assert_eq!(terms.compare("apple", 1), Ordering::Less);
/// ```
pub trait Lexicon {
    /// Returns the term stored under `value`.
    ///
    /// The tree only calls this with values it was given through
    /// [`LexiconTree::insert`](crate::LexiconTree::insert), and expects the
    /// answer for a given value not to change while the value is in the tree.
    fn term(&self, value: u32) -> &str;

    /// Orders `term` against the term stored under `value`.
    fn compare(&self, term: &str, value: u32) -> Ordering {
        term.as_bytes().cmp(self.term(value).as_bytes())
    }
}

impl<L: Lexicon + ?Sized> Lexicon for &L {
    fn term(&self, value: u32) -> &str {
        (**self).term(value)
    }

    fn compare(&self, term: &str, value: u32) -> Ordering {
        (**self).compare(term, value)
    }
}

/// Values are positions in the slice.
///
/// # Panics
///
/// Panics if `value` is not a position in the slice.
impl Lexicon for [String] {
    fn term(&self, value: u32) -> &str {
        &self[value as usize]
    }
}

impl Lexicon for [&str] {
    fn term(&self, value: u32) -> &str {
        self[value as usize]
    }
}

impl Lexicon for Vec<String> {
    fn term(&self, value: u32) -> &str {
        self.as_slice().term(value)
    }
}

impl Lexicon for Vec<&str> {
    fn term(&self, value: u32) -> &str {
        self.as_slice().term(value)
    }
}
