use core::borrow::Borrow;
use core::fmt;
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops::{Index, RangeBounds};

use crate::policy::{Compare, First, Natural};
use crate::rbtree::{self, IntoIter};
use crate::RbTree;

/// An ordered map with unique keys backed by an [`RbTree`] of `(K, V)` pairs.
///
/// Entries are ordered by their key under `C` (ascending [`Ord`] by default).
///
/// # Examples
///
/// ```
/// use rb_index::RbMap;
///
/// let mut scores = RbMap::new();
/// scores.insert("Alice", 100);
/// scores.insert("Bob", 85);
/// assert_eq!(scores.insert("Bob", 90), Some(85));
///
/// *scores.get_or_insert_default("Carol") += 92;
/// assert_eq!(scores["Carol"], 92);
/// assert_eq!(scores.get("Bob"), Some(&90));
/// assert_eq!(scores.keys().copied().collect::<Vec<_>>(), ["Alice", "Bob", "Carol"]);
/// ```
pub struct RbMap<K, V, C = Natural> {
    tree: RbTree<(K, V), First, C>,
}

/// An iterator over the entries of an [`RbMap`], sorted by key.
///
/// This `struct` is created by the [`iter`](RbMap::iter) method on [`RbMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: rbtree::Iter<'a, (K, V)>,
}

/// An iterator over a sub-range of entries of an [`RbMap`].
///
/// This `struct` is created by the [`range`](RbMap::range) method on [`RbMap`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V> {
    inner: rbtree::Range<'a, (K, V)>,
}

impl<K: Ord, V> RbMap<K, V> {
    /// Makes a new, empty map ordered by `K: Ord`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tree: RbTree::with_policies(First, Natural),
        }
    }
}

impl<K, V, C> RbMap<K, V, C> {
    /// Makes a new, empty map ordered by `compare`.
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            tree: RbTree::with_policies(First, compare),
        }
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Clears the map, removing all entries.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.tree.iter() }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.tree.iter().map(|(key, _)| key)
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.tree.iter().map(|(_, value)| value)
    }

    /// Returns the first key-value pair in the map.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|(key, value)| (key, value))
    }

    /// Returns the last key-value pair in the map.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|(key, value)| (key, value))
    }

    /// Removes and returns the first entry in the map.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.tree.pop_first()
    }

    /// Removes and returns the last entry in the map.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.tree.pop_last()
    }

    /// The underlying tree.
    pub const fn as_tree(&self) -> &RbTree<(K, V), First, C> {
        &self.tree
    }
}

impl<K, V, C: Compare<K>> RbMap<K, V, C> {
    /// Inserts a key-value pair into the map.
    ///
    /// If the map already had this key, the value is updated and the old value returned; the
    /// stored key is not replaced.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let at = self.tree.lower_bound(&key);
        match self.tree.get(at) {
            Some((existing, _)) if !self.tree.key_comp().less(&key, existing) => {
                self.tree.get_mut(at).map(|entry| core::mem::replace(&mut entry.1, value))
            }
            _ => {
                self.tree.insert_unique_hint(at, (key, value));
                None
            }
        }
    }

    /// Returns a mutable reference to the value for `key`, inserting `V::default()` first if
    /// the key is absent.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let at = self.tree.lower_bound(&key);
        let at = match self.tree.get(at) {
            Some((existing, _)) if !self.tree.key_comp().less(&key, existing) => at,
            _ => self.tree.insert_unique_hint(at, (key, V::default())),
        };
        match self.tree.get_mut(at) {
            Some(entry) => &mut entry.1,
            None => unreachable!("`RbMap::get_or_insert_default()` - entry vanished after insertion!"),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering on the
    /// borrowed form *must* match the ordering on the key type.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.find(key)).map(|(key, value)| (key, value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let at = self.tree.find(key);
        self.tree.get_mut(at).map(|entry| &mut entry.1)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.contains(key)
    }

    /// Removes a key from the map, returning the value at the key if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if it was present.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let at = self.tree.find(key);
        (!at.is_end()).then(|| self.tree.erase(at))
    }

    /// The first entry whose key is not less than `key`.
    pub fn lower_bound<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.lower_bound(key)).map(|(key, value)| (key, value))
    }

    /// The first entry whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.get(self.tree.upper_bound(key)).map(|(key, value)| (key, value))
    }

    /// Constructs a double-ended iterator over a sub-range of entries in the map.
    ///
    /// # Panics
    /// Panics if range `start > end`, or if `start == end` and both bounds are excluded.
    pub fn range<R: RangeBounds<K>>(&self, range: R) -> Range<'_, K, V> {
        Range {
            inner: self.tree.range(range),
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V> DoubleEndedIterator for Range<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, Q, V, C> Index<&Q> for RbMap<K, V, C>
where
    K: Borrow<Q>,
    C: Compare<K> + Compare<Q>,
    Q: ?Sized,
{
    type Output = V;

    /// # Panics
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("`RbMap::index()` - key not found!")
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RbMap<K, V, C> {
    fn clone(&self) -> Self {
        Self { tree: self.tree.clone() }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RbMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RbMap<K, V, C> {
    fn default() -> Self {
        Self {
            tree: RbTree::default(),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RbMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for RbMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RbMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        self.tree.partial_cmp(&other.tree)
    }
}

impl<K: Ord, V: Ord, C> Ord for RbMap<K, V, C> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.tree.cmp(&other.tree)
    }
}

impl<K: Hash, V: Hash, C> Hash for RbMap<K, V, C> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.tree.hash(state);
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for RbMap<K, V, C> {
    /// Inserts every pair, later values replacing earlier ones for equal keys.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RbMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V, C> IntoIterator for RbMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<(K, V)>;

    fn into_iter(self) -> IntoIter<(K, V)> {
        self.tree.into_iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a RbMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::borrow::ToOwned;
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[test]
    fn insert_updates_value_in_place() {
        let mut map = RbMap::new();
        assert_eq!(map.insert(2, "two"), None);
        assert_eq!(map.insert(1, "one"), None);
        assert_eq!(map.insert(2, "deux"), Some("two"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&2), Some(&"deux"));
        map.as_tree().check_invariants_strict().unwrap();
    }

    #[test]
    fn default_entries() {
        let mut map: RbMap<&str, u32> = RbMap::new();
        for word in ["a", "b", "a", "c", "a"] {
            *map.get_or_insert_default(word) += 1;
        }
        assert_eq!(map.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), [("a", 3), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn bounds_and_ranges() {
        let map: RbMap<i32, char> = [(1, 'a'), (3, 'c'), (5, 'e')].into();
        assert_eq!(map.lower_bound(&2), Some((&3, &'c')));
        assert_eq!(map.upper_bound(&3), Some((&5, &'e')));
        assert_eq!(map.upper_bound(&5), None);
        assert_eq!(map.range(2..).map(|(k, _)| *k).collect::<Vec<_>>(), [3, 5]);
        assert_eq!(map.values().rev().copied().collect::<Vec<_>>(), ['e', 'c', 'a']);
    }

    #[test]
    #[should_panic(expected = "`RbMap::index()` - key not found!")]
    fn index_missing_key_panics() {
        let map: RbMap<i32, i32> = RbMap::new();
        let _ = map[&1];
    }

    #[test]
    fn owned_keys_accept_borrowed_lookups() {
        let mut map: RbMap<String, u32> = RbMap::new();
        map.insert("beta".to_owned(), 2);
        map.insert("alpha".to_owned(), 1);
        assert_eq!(map.get("alpha"), Some(&1));
        assert_eq!(map["beta"], 2);
        assert!(map.contains_key("beta"));
        assert_eq!(map.lower_bound("b").map(|(k, _)| k.as_str()), Some("beta"));
        if let Some(value) = map.get_mut("alpha") {
            *value += 10;
        }
        assert_eq!(map.remove_entry("alpha"), Some(("alpha".to_owned(), 11)));
        assert_eq!(map.remove("gamma"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn iterators_clone_and_debug() {
        let map: RbMap<i32, char> = [(1, 'a'), (2, 'b'), (3, 'c')].into();
        let mut iter = map.iter();
        iter.next();
        assert_eq!(format!("{:?}", iter.clone()), "[(2, 'b'), (3, 'c')]");
        assert_eq!(iter.count(), 2);

        let range = map.range(..3);
        assert_eq!(format!("{range:?}"), "[(1, 'a'), (2, 'b')]");
        assert!(range.clone().eq(range));
    }
}
