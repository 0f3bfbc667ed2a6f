use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::ops::RangeBounds;

use crate::policy::{Compare, Identity, Natural};
use crate::rbtree::{IntoIter, Iter, Range};
use crate::RbTree;

/// An ordered set of unique values backed by an [`RbTree`].
///
/// Values are their own keys and are ordered by `C` (ascending [`Ord`] by default).
///
/// # Examples
///
/// ```
/// use rb_index::RbSet;
///
/// let mut books = RbSet::new();
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
///
/// assert!(!books.insert("The Odyssey"));
/// assert!(books.remove(&"The Odyssey"));
/// assert_eq!(books.first(), Some(&"A Dance With Dragons"));
/// ```
pub struct RbSet<T, C = Natural> {
    tree: RbTree<T, Identity, C>,
}

impl<T: Ord> RbSet<T> {
    /// Makes a new, empty set ordered by `T: Ord`.
    #[must_use]
    pub const fn new() -> Self {
        Self { tree: RbTree::new() }
    }
}

impl<T, C> RbSet<T, C> {
    /// Makes a new, empty set ordered by `compare`.
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::with_comparator(compare),
        }
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator that visits the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Returns a reference to the first element in the set, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns a reference to the last element in the set, if any.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Removes the first element from the set and returns it, if any.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    /// Removes the last element from the set and returns it, if any.
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    /// The underlying tree.
    pub const fn as_tree(&self) -> &RbTree<T, Identity, C> {
        &self.tree
    }
}

impl<T, C: Compare<T>> RbSet<T, C> {
    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. An equal value already present is kept
    /// and `value` is dropped.
    pub fn insert(&mut self, value: T) -> bool {
        self.tree.insert_unique(value).1
    }

    /// Adds a value to the set, replacing the existing equal value, if any, and returning it.
    pub fn replace(&mut self, value: T) -> Option<T> {
        let at = self.tree.lower_bound(&value);
        match self.tree.get(at) {
            Some(existing) if !self.tree.key_comp().less(&value, existing) => {
                self.tree.get_mut(at).map(|slot| core::mem::replace(slot, value))
            }
            _ => {
                self.tree.insert_unique_hint(at, value);
                None
            }
        }
    }

    /// Returns `true` if the set contains an element equal to `value`.
    ///
    /// The value may be any borrowed form of the set's element type, but the ordering on
    /// the borrowed form *must* match the ordering on the element type.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.contains(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.find(value))
    }

    /// Removes the element equal to `value`. Returns whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.take(value).is_some()
    }

    /// Removes and returns the element equal to `value`, if any.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let at = self.tree.find(value);
        (!at.is_end()).then(|| self.tree.erase(at))
    }

    /// The smallest element not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.lower_bound(value))
    }

    /// The smallest element greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.upper_bound(value))
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the set.
    ///
    /// # Panics
    /// Panics if range `start > end`, or if `start == end` and both bounds are excluded.
    pub fn range<R: RangeBounds<T>>(&self, range: R) -> Range<'_, T> {
        self.tree.range(range)
    }

    /// Retains only the elements specified by the predicate.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let mut at = self.tree.begin();
        while let Some(next) = self.tree.next(at) {
            if self.tree.get(at).is_some_and(|value| !keep(value)) {
                self.tree.erase(at);
            }
            at = next;
        }
    }
}

impl<T: Clone, C: Clone> Clone for RbSet<T, C> {
    fn clone(&self) -> Self {
        Self { tree: self.tree.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for RbSet<T, C> {
    fn default() -> Self {
        Self {
            tree: RbTree::default(),
        }
    }
}

impl<T: PartialEq, C> PartialEq for RbSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<T: Eq, C> Eq for RbSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for RbSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<T: Ord, C> Ord for RbSet<T, C> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<T: Hash, C> Hash for RbSet<T, C> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<T, C: Compare<T>> Extend<T> for RbSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend_unique(iter);
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for RbSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbSet<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T, C> IntoIterator for RbSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.tree.into_iter()
    }
}

impl<'a, T, C> IntoIterator for &'a RbSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
