use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable address of one node slot inside a [`NodeArena`](crate::NodeArena).
///
/// Handles are one-based internally so that `Option<NodeHandle>` is the same size as
/// `NodeHandle` itself. Tree links (`parent`, `left`, `right`) are stored as
/// `Option<NodeHandle>`, with `None` playing the role of the empty child slot.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeHandle(NonZero<RawHandle>);

impl NodeHandle {
    /// The largest index a handle can address.
    pub const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// Builds the handle for slot `index`.
    ///
    /// # Panics
    /// Panics if `index > NodeHandle::MAX`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`NodeHandle::from_index()` - `index` > `NodeHandle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    /// Returns the slot index this handle addresses.
    #[inline]
    #[must_use]
    pub const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_index())
    }
}
