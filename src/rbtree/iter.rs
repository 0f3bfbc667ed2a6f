use alloc::vec;
use core::fmt;
use core::iter::FusedIterator;

use super::{Position, RbTree};
use crate::raw::{Node, NodeArena, NodeHandle, RawRbTree, SlabArena};

/// An iterator over all values of an [`RbTree`], in ascending key order.
///
/// This `struct` is created by the [`iter`](RbTree::iter) method on [`RbTree`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T, A = SlabArena<Node<T>>>
where
    A: NodeArena<Node<T>>,
{
    raw: &'a RawRbTree<T, A>,
    front: Option<NodeHandle>,
    back: Option<NodeHandle>,
    remaining: usize,
}

impl<'a, T, A: NodeArena<Node<T>>> Iter<'a, T, A> {
    pub(super) fn new(raw: &'a RawRbTree<T, A>) -> Self {
        Self {
            raw,
            front: raw.leftmost(),
            back: raw.rightmost(),
            remaining: raw.len(),
        }
    }
}

impl<'a, T, A: NodeArena<Node<T>>> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front?;
        self.front = self.raw.successor(handle);
        self.remaining -= 1;
        Some(self.raw.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, A: NodeArena<Node<T>>> DoubleEndedIterator for Iter<'a, T, A> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back?;
        self.back = self.raw.predecessor(handle);
        self.remaining -= 1;
        Some(self.raw.value(handle))
    }
}

impl<T, A: NodeArena<Node<T>>> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: NodeArena<Node<T>>> FusedIterator for Iter<'_, T, A> {}

impl<T, A: NodeArena<Node<T>>> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: fmt::Debug, A: NodeArena<Node<T>>> fmt::Debug for Iter<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An iterator over a half-open position range `[first, last)` of an [`RbTree`].
///
/// This `struct` is created by [`RbTree::range`] and [`RbTree::iter_between`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T, A = SlabArena<Node<T>>>
where
    A: NodeArena<Node<T>>,
{
    raw: &'a RawRbTree<T, A>,
    front: Position,
    back: Position,
}

impl<'a, T, A: NodeArena<Node<T>>> Range<'a, T, A> {
    pub(super) fn new(raw: &'a RawRbTree<T, A>, front: Position, back: Position) -> Self {
        Self { raw, front, back }
    }

    /// The position the next call to `next` would yield, or the exclusive end if exhausted.
    pub fn front(&self) -> Position {
        self.front
    }
}

impl<'a, T, A: NodeArena<Node<T>>> Iterator for Range<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let handle = self.front.0?;
        self.front = Position(self.raw.successor(handle));
        Some(self.raw.value(handle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == self.back { (0, Some(0)) } else { (1, Some(self.raw.len())) }
    }
}

impl<'a, T, A: NodeArena<Node<T>>> DoubleEndedIterator for Range<'a, T, A> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let handle = match self.back.0 {
            None => self.raw.rightmost(),
            Some(handle) => self.raw.predecessor(handle),
        }?;
        self.back = Position(Some(handle));
        Some(self.raw.value(handle))
    }
}

impl<T, A: NodeArena<Node<T>>> FusedIterator for Range<'_, T, A> {}

impl<T, A: NodeArena<Node<T>>> Clone for Range<'_, T, A> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: fmt::Debug, A: NodeArena<Node<T>>> fmt::Debug for Range<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the values of an [`RbTree`], in ascending key order.
///
/// The tree is drained into a buffer up front, so the arena has every node back before the
/// first value is yielded.
pub struct IntoIter<T> {
    inner: vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<T, X, C, A: NodeArena<Node<T>>> IntoIterator for RbTree<T, X, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T, X, C, A: NodeArena<Node<T>>> IntoIterator for &'a RbTree<T, X, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}
