use alloc::vec::Vec;

use log::{trace, warn};

use super::handle::NodeHandle;
use crate::error::AllocError;

/// Storage contract the tree consumes for its nodes.
///
/// A node's life goes through four steps, always in this order:
/// [`allocate_node`](Self::allocate_node) reserves a slot,
/// [`construct_value`](Self::construct_value) moves the payload in,
/// [`destroy_value`](Self::destroy_value) moves it back out, and
/// [`deallocate_node`](Self::deallocate_node) returns the slot to the pool.
/// A reserved slot may be deallocated without ever being constructed; this is how the tree
/// backs out of an insertion whose value failed to build.
pub trait NodeArena<N> {
    /// Reserves storage for one node.
    ///
    /// # Errors
    /// Returns [`AllocError`] when no more nodes can be handed out.
    fn allocate_node(&mut self) -> Result<NodeHandle, AllocError>;

    /// Returns a reserved (not constructed) slot to the pool.
    ///
    /// Must be called exactly once per successful `allocate_node`.
    fn deallocate_node(&mut self, handle: NodeHandle);

    /// Moves `value` into a reserved slot.
    fn construct_value(&mut self, handle: NodeHandle, value: N);

    /// Moves the value out of a constructed slot, leaving it reserved.
    fn destroy_value(&mut self, handle: NodeHandle) -> N;

    /// Borrows a constructed node.
    fn node(&self, handle: NodeHandle) -> &N;

    /// Mutably borrows a constructed node.
    fn node_mut(&mut self, handle: NodeHandle) -> &mut N;

    /// Number of slots currently allocated (reserved or constructed).
    fn live(&self) -> usize;
}

#[derive(Debug)]
enum Slot<N> {
    Vacant,
    Reserved,
    Occupied(N),
}

/// The default [`NodeArena`]: a growable slab with a LIFO free list.
///
/// Freed slots are recycled before the slab grows. An optional limit caps how many nodes may
/// be allocated at once, which makes allocation failure observable.
#[derive(Debug)]
pub struct SlabArena<N> {
    slots: Vec<Slot<N>>,
    free: Vec<NodeHandle>,
    limit: usize,
}

impl<N> SlabArena<N> {
    /// Creates an empty arena bounded only by [`NodeHandle::MAX`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            limit: NodeHandle::MAX,
        }
    }

    /// Creates an empty arena with room for `capacity` nodes before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            limit: NodeHandle::MAX,
        }
    }

    /// Creates an empty arena that refuses to hold more than `limit` nodes at once.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            limit: limit.min(NodeHandle::MAX),
        }
    }

    /// Number of slots the arena can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Maximum number of simultaneously allocated nodes.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    const fn allocated(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    fn slot_mut(&mut self, handle: NodeHandle) -> &mut Slot<N> {
        self.slots
            .get_mut(handle.to_index())
            .expect("`SlabArena` - `handle` is out of bounds!")
    }
}

impl<N> Default for SlabArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeArena<N> for SlabArena<N> {
    fn allocate_node(&mut self) -> Result<NodeHandle, AllocError> {
        if self.allocated() >= self.limit {
            warn!("node arena exhausted at {} nodes", self.limit);
            return Err(AllocError);
        }

        if let Some(handle) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[handle.to_index()] = Slot::Reserved;
            trace!("reused node slot {handle:?}");
            Ok(handle)
        } else {
            if self.slots.len() > NodeHandle::MAX {
                warn!("node arena ran out of addressable handles");
                return Err(AllocError);
            }
            self.slots.push(Slot::Reserved);
            let handle = NodeHandle::from_index(self.slots.len() - 1);
            trace!("allocated node slot {handle:?}");
            Ok(handle)
        }
    }

    fn deallocate_node(&mut self, handle: NodeHandle) {
        let slot = self.slot_mut(handle);
        assert!(
            matches!(slot, Slot::Reserved),
            "`SlabArena::deallocate_node()` - `handle` is not a reserved slot!"
        );
        *slot = Slot::Vacant;
        self.free.push(handle);
        trace!("released node slot {handle:?}");
    }

    fn construct_value(&mut self, handle: NodeHandle, value: N) {
        let slot = self.slot_mut(handle);
        assert!(
            matches!(slot, Slot::Reserved),
            "`SlabArena::construct_value()` - `handle` is not a reserved slot!"
        );
        *slot = Slot::Occupied(value);
    }

    fn destroy_value(&mut self, handle: NodeHandle) -> N {
        match core::mem::replace(self.slot_mut(handle), Slot::Reserved) {
            Slot::Occupied(value) => value,
            _ => panic!("`SlabArena::destroy_value()` - `handle` holds no value!"),
        }
    }

    #[inline]
    fn node(&self, handle: NodeHandle) -> &N {
        match self.slots.get(handle.to_index()) {
            Some(Slot::Occupied(value)) => value,
            _ => panic!("`SlabArena::node()` - `handle` is invalid!"),
        }
    }

    #[inline]
    fn node_mut(&mut self, handle: NodeHandle) -> &mut N {
        match self.slots.get_mut(handle.to_index()) {
            Some(Slot::Occupied(value)) => value,
            _ => panic!("`SlabArena::node_mut()` - `handle` is invalid!"),
        }
    }

    fn live(&self) -> usize {
        self.allocated()
    }
}
