//! Key extraction and ordering policies.
//!
//! An [`RbTree`](crate::RbTree) never compares stored values directly. It projects each
//! value to a key with a [`KeyOf`] policy and orders keys with a [`Compare`] policy, so the
//! same tree serves set-like storage ([`Identity`]) and map-like storage ([`First`]).

use core::cmp::Ordering;

/// Projects a stored value onto the key it is ordered by.
pub trait KeyOf<T> {
    /// The ordering key.
    type Key: ?Sized;

    /// Borrows the key of `value`.
    fn key_of<'a>(&self, value: &'a T) -> &'a Self::Key;
}

/// A strict weak order over keys.
///
/// `less` must be irreflexive and transitive, and incomparability must be transitive.
/// Keys `a` and `b` are considered equal when neither is less than the other.
pub trait Compare<K: ?Sized> {
    /// Returns `true` if `a` sorts strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;

    /// Three-way comparison derived from [`less`](Self::less).
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if self.less(a, b) {
            Ordering::Less
        } else if self.less(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The whole value is the key. Used for set-like trees.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Identity;

impl<T> KeyOf<T> for Identity {
    type Key = T;

    #[inline]
    fn key_of<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

/// The first element of a `(K, V)` pair is the key. Used for map-like trees.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct First;

impl<K, V> KeyOf<(K, V)> for First {
    type Key = K;

    #[inline]
    fn key_of<'a>(&self, value: &'a (K, V)) -> &'a K {
        &value.0
    }
}

/// Ascending order from [`Ord`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Descending order from [`Ord`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Reverse;

impl<K: Ord + ?Sized> Compare<K> for Reverse {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        b < a
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        self(a, b)
    }
}
