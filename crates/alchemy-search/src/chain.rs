//! Persistent singly-linked chains.
//!
//! Search branches share their history: pushing onto a chain allocates one
//! link and leaves the original untouched, so sibling branches never copy
//! their common prefix.

use std::rc::Rc;

/// An immutable, structurally shared list. Newest element first.
#[derive(Debug)]
pub struct Chain<T> {
    head: Option<Rc<Link<T>>>,
}

#[derive(Debug)]
struct Link<T> {
    value: T,
    len: usize,
    next: Chain<T>,
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
        }
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Chain<T> {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Returns a new chain with `value` in front of `self`.
    #[must_use]
    pub fn push(&self, value: T) -> Self {
        Self {
            head: Some(Rc::new(Link {
                value,
                len: self.len() + 1,
                next: self.clone(),
            })),
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |link| link.len)
    }

    /// Whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Most recently pushed element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.head.as_ref().map(|link| &link.value)
    }

    /// Iterates newest to oldest.
    pub fn iter(&self) -> ChainIter<'_, T> {
        ChainIter {
            next: self.head.as_deref(),
        }
    }
}

impl<T: PartialEq> Chain<T> {
    /// Whether any element equals `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl<T: Clone> Chain<T> {
    /// Collects the chain oldest-first (insertion order).
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out: Vec<T> = self.iter().cloned().collect();
        out.reverse();
        out
    }
}

/// Iterator over a [`Chain`], newest first.
pub struct ChainIter<'a, T> {
    next: Option<&'a Link<T>>,
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.next.head.as_deref();
        Some(&link.value)
    }
}

impl<'a, T> IntoIterator for &'a Chain<T> {
    type Item = &'a T;
    type IntoIter = ChainIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> FromIterator<T> for Chain<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |chain, value| chain.push(value))
    }
}
