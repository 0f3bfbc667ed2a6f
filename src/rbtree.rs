use core::borrow::Borrow;
use core::cmp::Ordering;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Bound, RangeBounds};

use crate::error::{AllocError, InsertError};
use crate::policy::{Compare, Identity, KeyOf, Natural};
use crate::raw::{Node, NodeArena, NodeHandle, RawRbTree, Side, SlabArena};

mod iter;
mod verify;

pub use iter::{IntoIter, Iter, Range};

/// A place in an [`RbTree`]: either a value-bearing node or the one-past-the-end position.
///
/// Positions compare by node identity. They stay valid across insertions and across erasure
/// of *other* nodes; using a position after its node was erased is a logic error (it may
/// panic or observe an unrelated value that reused the slot).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Position(Option<NodeHandle>);

impl Position {
    /// One past the last value, in every tree.
    pub const END: Self = Self(None);

    /// Returns `true` for the end position.
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }

    /// The arena handle of the node, if this is not the end position.
    #[must_use]
    pub const fn handle(self) -> Option<NodeHandle> {
        self.0
    }
}

/// A red-black ordered index.
///
/// Values of type `T` are ordered by the key `X` projects out of them, under the strict weak
/// order `C`. Nodes live in the arena `A`. Equal keys are allowed or rejected per call:
/// [`insert_equal`](Self::insert_equal) keeps duplicates (after existing equal keys),
/// [`insert_unique`](Self::insert_unique) refuses them.
///
/// Lookups, insertions and erasures are O(log n). Navigation between positions uses only the
/// tree's parent/child links.
///
/// # Examples
///
/// ```
/// use rb_index::RbTree;
///
/// let mut tree = RbTree::new();
/// for key in [10, 20, 30, 40, 50, 25] {
///     tree.insert_unique(key);
/// }
/// assert!(tree.iter().copied().eq([10, 20, 25, 30, 40, 50]));
///
/// let at = tree.find(&30);
/// assert_eq!(tree.erase(at), 30);
/// assert!(tree.find(&30).is_end());
/// assert!(tree.check_invariants().is_ok());
/// ```
pub struct RbTree<T, X = Identity, C = Natural, A = SlabArena<Node<T>>>
where
    A: NodeArena<Node<T>>,
{
    raw: RawRbTree<T, A>,
    key_of: X,
    compare: C,
}

impl<T> RbTree<T> {
    /// Creates an empty set-like tree ordered by `T: Ord`.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_parts(Identity, Natural, SlabArena::new())
    }
}

impl<T, C> RbTree<T, Identity, C> {
    /// Creates an empty set-like tree ordered by `compare`.
    pub const fn with_comparator(compare: C) -> Self {
        Self::with_parts(Identity, compare, SlabArena::new())
    }
}

impl<T, X, C> RbTree<T, X, C> {
    /// Creates an empty tree with explicit key-extraction and ordering policies.
    pub const fn with_policies(key_of: X, compare: C) -> Self {
        Self::with_parts(key_of, compare, SlabArena::new())
    }
}

impl<T, A: NodeArena<Node<T>>> RbTree<T, Identity, Natural, A> {
    /// Creates an empty set-like tree storing its nodes in `arena`.
    pub const fn with_arena(arena: A) -> Self {
        Self::with_parts(Identity, Natural, arena)
    }
}

impl<T, X, C, A: NodeArena<Node<T>>> RbTree<T, X, C, A> {
    /// Creates an empty tree from all three collaborators.
    pub const fn with_parts(key_of: X, compare: C, arena: A) -> Self {
        Self {
            raw: RawRbTree::new(arena),
            key_of,
            compare,
        }
    }

    /// Returns the number of values in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the tree holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// The most values any tree can hold, bounded by the handle space.
    #[must_use]
    pub const fn max_len(&self) -> usize {
        NodeHandle::MAX
    }

    /// The key-extraction policy.
    pub const fn key_of(&self) -> &X {
        &self.key_of
    }

    /// The ordering policy.
    pub const fn key_comp(&self) -> &C {
        &self.compare
    }

    /// The node arena.
    pub const fn arena(&self) -> &A {
        self.raw.arena()
    }

    /// Position of the smallest value, or [`Position::END`] when empty.
    #[must_use]
    pub const fn begin(&self) -> Position {
        Position(self.raw.leftmost())
    }

    /// The one-past-the-end position.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// The position after `position`, or `None` when stepping past the end.
    #[must_use]
    pub fn next(&self, position: Position) -> Option<Position> {
        position.0.map(|handle| Position(self.raw.successor(handle)))
    }

    /// The position before `position`, or `None` when stepping before the first value.
    ///
    /// Stepping back from the end lands on the largest value.
    #[must_use]
    pub fn prev(&self, position: Position) -> Option<Position> {
        let handle = match position.0 {
            None => self.raw.rightmost(),
            Some(handle) => self.raw.predecessor(handle),
        };
        handle.map(|handle| Position(Some(handle)))
    }

    /// The value at `position`, or `None` for the end position.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&T> {
        position.0.map(|handle| self.raw.value(handle))
    }

    pub(crate) fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        position.0.map(|handle| self.raw.value_mut(handle))
    }

    /// The smallest value.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(self.begin())
    }

    /// The largest value.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.rightmost().map(|handle| self.raw.value(handle))
    }

    /// Iterates over all values in ascending key order.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(&self.raw)
    }

    /// Iterates over the half-open position range `[first, last)`.
    ///
    /// `first` must not come after `last`.
    pub fn iter_between(&self, first: Position, last: Position) -> Range<'_, T, A> {
        Range::new(&self.raw, first, last)
    }

    /// Removes and returns the value at `position`.
    ///
    /// # Panics
    /// Panics if `position` is the end position.
    pub fn erase(&mut self, position: Position) -> T {
        let handle = position.0.expect("`RbTree::erase()` - cannot erase the end position!");
        self.raw.remove(handle)
    }

    /// Removes every value in `[first, last)` and returns how many were removed.
    ///
    /// # Panics
    /// Panics if `first` comes after `last`. The order is only discovered while walking, so
    /// by then every value from `first` to the maximum has already been removed.
    pub fn erase_range(&mut self, first: Position, last: Position) -> usize {
        if first == self.begin() && last.is_end() {
            let removed = self.len();
            self.clear();
            return removed;
        }

        let mut removed = 0;
        let mut current = first;
        while current != last {
            let handle = current.0.expect("`RbTree::erase_range()` - `first` is after `last`!");
            current = Position(self.raw.successor(handle));
            self.raw.remove(handle);
            removed += 1;
        }
        removed
    }

    /// Removes and returns the smallest value.
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.leftmost().map(|handle| self.raw.remove(handle))
    }

    /// Removes and returns the largest value.
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.rightmost().map(|handle| self.raw.remove(handle))
    }

    /// Removes every value, returning all nodes to the arena.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Exchanges the contents (values, policies and arenas) of two trees.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(self, other);
    }

    /// Deep-copies the tree into `arena`, cloning each value with `clone_value`.
    ///
    /// The copy has the same shape and colors as `self`.
    ///
    /// # Errors
    /// If the arena runs out or `clone_value` fails, every node copied so far is destroyed
    /// and returned to `arena` before the error is returned.
    pub fn try_clone_in<E, F>(&self, arena: A, clone_value: F) -> Result<Self, InsertError<E>>
    where
        X: Clone,
        C: Clone,
        F: FnMut(&T) -> Result<T, E>,
    {
        Ok(Self {
            raw: self.raw.try_clone_in(arena, clone_value)?,
            key_of: self.key_of.clone(),
            compare: self.compare.clone(),
        })
    }

    /// [`try_clone_in`](Self::try_clone_in) with a default-constructed arena.
    ///
    /// # Errors
    /// See [`try_clone_in`](Self::try_clone_in).
    pub fn try_clone_with<E, F>(&self, clone_value: F) -> Result<Self, InsertError<E>>
    where
        X: Clone,
        C: Clone,
        A: Default,
        F: FnMut(&T) -> Result<T, E>,
    {
        self.try_clone_in(A::default(), clone_value)
    }
}

impl<T, X, C, A> RbTree<T, X, C, A>
where
    X: KeyOf<T>,
    C: Compare<X::Key>,
    A: NodeArena<Node<T>>,
{
    #[inline]
    fn key(&self, handle: NodeHandle) -> &X::Key {
        self.key_of.key_of(self.raw.value(handle))
    }

    #[inline]
    fn less(&self, a: &X::Key, b: &X::Key) -> bool {
        self.compare.less(a, b)
    }

    // ─── Slot selection ──────────────────────────────────────────────────────

    /// The empty slot after every key not greater than `key`.
    fn equal_slot(&self, key: &X::Key) -> (Option<NodeHandle>, Side) {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            parent = Some(handle);
            side = if self.less(key, self.key(handle)) { Side::Left } else { Side::Right };
            current = self.raw.child(handle, side);
        }
        (parent, side)
    }

    /// Like [`equal_slot`](Self::equal_slot), but reports the node holding `key` if there is one.
    fn unique_slot(&self, key: &X::Key) -> Result<(Option<NodeHandle>, Side), NodeHandle> {
        let (parent, side) = self.equal_slot(key);
        // Everything not greater than `key` sits before the slot, so only its in-order
        // predecessor can be equal to `key`.
        let before = match (parent, side) {
            (None, _) => None,
            (Some(parent), Side::Right) => Some(parent),
            (Some(parent), Side::Left) => self.raw.predecessor(parent),
        };
        match before {
            Some(before) if !self.less(self.key(before), key) => Err(before),
            _ => Ok((parent, side)),
        }
    }

    /// The empty slot between two in-order neighbours `before` and `after`.
    fn slot_between(&self, before: NodeHandle, after: NodeHandle) -> (Option<NodeHandle>, Side) {
        if self.raw.child(before, Side::Right).is_none() {
            (Some(before), Side::Right)
        } else {
            (Some(after), Side::Left)
        }
    }

    /// A slot right before `hint` (or after the maximum for the end hint), if `key` fits there.
    fn equal_hint_slot(&self, hint: Position, key: &X::Key) -> Option<(Option<NodeHandle>, Side)> {
        match hint.0 {
            None => {
                let last = self.raw.rightmost()?;
                (!self.less(key, self.key(last))).then_some((Some(last), Side::Right))
            }
            Some(at) => {
                if self.less(self.key(at), key) {
                    return None;
                }
                match self.raw.predecessor(at) {
                    None => Some((Some(at), Side::Left)),
                    Some(before) if !self.less(key, self.key(before)) => Some(self.slot_between(before, at)),
                    Some(_) => None,
                }
            }
        }
    }

    fn unique_hint_slot(&self, hint: Position, key: &X::Key) -> Option<(Option<NodeHandle>, Side)> {
        match hint.0 {
            None => {
                let last = self.raw.rightmost()?;
                self.less(self.key(last), key).then_some((Some(last), Side::Right))
            }
            Some(at) => {
                if !self.less(key, self.key(at)) {
                    return None;
                }
                match self.raw.predecessor(at) {
                    None => Some((Some(at), Side::Left)),
                    Some(before) if self.less(self.key(before), key) => Some(self.slot_between(before, at)),
                    Some(_) => None,
                }
            }
        }
    }

    fn attach(&mut self, value: T, parent: Option<NodeHandle>, side: Side) -> Result<Position, AllocError> {
        let handle = self.raw.create(value)?;
        self.raw.link(handle, parent, side);
        Ok(Position(Some(handle)))
    }

    // ─── Insertion ───────────────────────────────────────────────────────────

    /// Inserts `value`, keeping any existing equal keys; the new value goes after them.
    ///
    /// # Panics
    /// Panics if the arena cannot provide a node.
    pub fn insert_equal(&mut self, value: T) -> Position {
        self.try_insert_equal(value)
            .expect("`RbTree::insert_equal()` - node arena exhausted!")
    }

    /// Inserts `value` unless its key is already present.
    ///
    /// Returns the position of the new value and `true`, or the position of the existing
    /// equal key and `false` (in which case `value` is dropped and the tree is unchanged).
    ///
    /// # Panics
    /// Panics if the arena cannot provide a node.
    pub fn insert_unique(&mut self, value: T) -> (Position, bool) {
        self.try_insert_unique(value)
            .expect("`RbTree::insert_unique()` - node arena exhausted!")
    }

    /// Fallible [`insert_equal`](Self::insert_equal).
    ///
    /// # Errors
    /// Returns [`AllocError`] if the arena is exhausted; the tree is unchanged.
    pub fn try_insert_equal(&mut self, value: T) -> Result<Position, AllocError> {
        let (parent, side) = self.equal_slot(self.key_of.key_of(&value));
        self.attach(value, parent, side)
    }

    /// Fallible [`insert_unique`](Self::insert_unique). A duplicate key never allocates.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the arena is exhausted; the tree is unchanged.
    pub fn try_insert_unique(&mut self, value: T) -> Result<(Position, bool), AllocError> {
        match self.unique_slot(self.key_of.key_of(&value)) {
            Err(existing) => Ok((Position(Some(existing)), false)),
            Ok((parent, side)) => Ok((self.attach(value, parent, side)?, true)),
        }
    }

    /// Inserts a value built by `make` once a node has been reserved, keeping duplicates.
    ///
    /// # Errors
    /// On [`InsertError::Alloc`] `make` is never called. On [`InsertError::Construct`] the
    /// reserved node has already been returned to the arena. Either way the tree is unchanged.
    pub fn try_insert_equal_with<E, F>(&mut self, make: F) -> Result<Position, InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let handle = self.raw.try_create_with(make)?;
        let (parent, side) = self.equal_slot(self.key(handle));
        self.raw.link(handle, parent, side);
        Ok(Position(Some(handle)))
    }

    /// Inserts a value built by `make` unless its key is already present.
    ///
    /// The value has to exist before its key can be checked, so a duplicate is built, then
    /// destroyed and its node released.
    ///
    /// # Errors
    /// See [`try_insert_equal_with`](Self::try_insert_equal_with).
    pub fn try_insert_unique_with<E, F>(&mut self, make: F) -> Result<(Position, bool), InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let handle = self.raw.try_create_with(make)?;
        match self.unique_slot(self.key(handle)) {
            Err(existing) => {
                self.raw.discard(handle);
                Ok((Position(Some(existing)), false))
            }
            Ok((parent, side)) => {
                self.raw.link(handle, parent, side);
                Ok((Position(Some(handle)), true))
            }
        }
    }

    /// Inserts `value` keeping duplicates, trying the slot just before `hint` first.
    ///
    /// Takes O(1) amortized time when `value` belongs immediately before `hint`, and falls
    /// back to a full descent otherwise.
    ///
    /// # Panics
    /// Panics if the arena cannot provide a node.
    pub fn insert_equal_hint(&mut self, hint: Position, value: T) -> Position {
        let key = self.key_of.key_of(&value);
        let (parent, side) = self.equal_hint_slot(hint, key).unwrap_or_else(|| self.equal_slot(key));
        self.attach(value, parent, side)
            .expect("`RbTree::insert_equal_hint()` - node arena exhausted!")
    }

    /// Inserts `value` unless its key is present, trying the slot just before `hint` first.
    ///
    /// Returns the position of the value holding the key afterwards, whether it was just
    /// inserted or already there.
    ///
    /// # Panics
    /// Panics if the arena cannot provide a node.
    pub fn insert_unique_hint(&mut self, hint: Position, value: T) -> Position {
        let key = self.key_of.key_of(&value);
        let slot = match self.unique_hint_slot(hint, key) {
            Some(slot) => Ok(slot),
            None => self.unique_slot(key),
        };
        match slot {
            Err(existing) => Position(Some(existing)),
            Ok((parent, side)) => self
                .attach(value, parent, side)
                .expect("`RbTree::insert_unique_hint()` - node arena exhausted!"),
        }
    }

    /// Inserts every value from `iter`, keeping duplicates.
    pub fn extend_equal<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert_equal(value);
        }
    }

    /// Inserts every value from `iter` whose key is not yet present.
    pub fn extend_unique<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert_unique(value);
        }
    }

    // ─── Lookup ──────────────────────────────────────────────────────────────
    //
    // Lookups accept any borrowed form `Q` of the key, as `BTreeMap` does. `Q` must order
    // the same way under `C` as the stored key it borrows from.

    /// Position of the first value whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut bound = None;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            if self.compare.less(self.key(handle).borrow(), key) {
                current = self.raw.child(handle, Side::Right);
            } else {
                bound = Some(handle);
                current = self.raw.child(handle, Side::Left);
            }
        }
        Position(bound)
    }

    /// Position of the first value whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut bound = None;
        let mut current = self.raw.root();
        while let Some(handle) = current {
            if self.compare.less(key, self.key(handle).borrow()) {
                bound = Some(handle);
                current = self.raw.child(handle, Side::Left);
            } else {
                current = self.raw.child(handle, Side::Right);
            }
        }
        Position(bound)
    }

    /// Position of the first value whose key equals `key`, or the end position.
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        match self.lower_bound(key).0 {
            Some(handle) if !self.compare.less(key, self.key(handle).borrow()) => Position(Some(handle)),
            _ => Position::END,
        }
    }

    /// Returns `true` if some value has a key equal to `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        !self.find(key).is_end()
    }

    /// The half-open position range holding exactly the values whose key equals `key`.
    pub fn equal_range<Q>(&self, key: &Q) -> (Position, Position)
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Number of values whose key equals `key`. O(log n + k).
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let (first, last) = self.equal_range(key);
        self.iter_between(first, last).count()
    }

    /// Removes every value whose key equals `key` and returns how many were removed.
    pub fn erase_key<Q>(&mut self, key: &Q) -> usize
    where
        X::Key: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let (first, last) = self.equal_range(key);
        self.erase_range(first, last)
    }

    /// Iterates over the values whose keys fall in `range`.
    ///
    /// # Panics
    /// Panics if the start of `range` sorts after its end, or if both bounds are excluded
    /// and equal.
    pub fn range<R>(&self, range: R) -> Range<'_, T, A>
    where
        R: RangeBounds<X::Key>,
    {
        let (start, end) = (range.start_bound(), range.end_bound());
        if let (Bound::Included(s) | Bound::Excluded(s), Bound::Included(e) | Bound::Excluded(e)) = (start, end) {
            assert!(!self.less(e, s), "`RbTree::range()` - range start is greater than range end!");
            assert!(
                !(matches!((start, end), (Bound::Excluded(_), Bound::Excluded(_))) && !self.less(s, e)),
                "`RbTree::range()` - range start and end are equal and excluded!"
            );
        }

        let first = match start {
            Bound::Included(key) => self.lower_bound(key),
            Bound::Excluded(key) => self.upper_bound(key),
            Bound::Unbounded => self.begin(),
        };
        let last = match end {
            Bound::Included(key) => self.upper_bound(key),
            Bound::Excluded(key) => self.lower_bound(key),
            Bound::Unbounded => Position::END,
        };
        self.iter_between(first, last)
    }
}

impl<T, X, C, A> Clone for RbTree<T, X, C, A>
where
    T: Clone,
    X: Clone,
    C: Clone,
    A: NodeArena<Node<T>> + Default,
{
    fn clone(&self) -> Self {
        match self.try_clone_with(|value| Ok::<_, Infallible>(value.clone())) {
            Ok(copy) => copy,
            Err(InsertError::Alloc(_)) => panic!("`RbTree::clone()` - node arena exhausted!"),
            Err(InsertError::Construct(never)) => match never {},
        }
    }
}

impl<T, X, C, A> Default for RbTree<T, X, C, A>
where
    X: Default,
    C: Default,
    A: NodeArena<Node<T>> + Default,
{
    fn default() -> Self {
        Self::with_parts(X::default(), C::default(), A::default())
    }
}

impl<T: fmt::Debug, X, C, A: NodeArena<Node<T>>> fmt::Debug for RbTree<T, X, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, X, C, A: NodeArena<Node<T>>> PartialEq for RbTree<T, X, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, X, C, A: NodeArena<Node<T>>> Eq for RbTree<T, X, C, A> {}

impl<T: PartialOrd, X, C, A: NodeArena<Node<T>>> PartialOrd for RbTree<T, X, C, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, X, C, A: NodeArena<Node<T>>> Ord for RbTree<T, X, C, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, X, C, A: NodeArena<Node<T>>> Hash for RbTree<T, X, C, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T, X, C, A> Extend<T> for RbTree<T, X, C, A>
where
    X: KeyOf<T>,
    C: Compare<X::Key>,
    A: NodeArena<Node<T>>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_equal(iter);
    }
}

impl<T, X, C, A> FromIterator<T> for RbTree<T, X, C, A>
where
    X: KeyOf<T> + Default,
    C: Compare<X::Key> + Default,
    A: NodeArena<Node<T>> + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend_equal(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbTree<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}
