use alloc::vec::Vec;
use core::marker::PhantomData;

use log::debug;
use smallvec::{SmallVec, smallvec};

use super::arena::NodeArena;
use super::handle::NodeHandle;
use super::node::{Color, Node, Side};
use crate::error::{AllocError, InsertError, InvariantViolation};

/// Explicit work stack for whole-tree walks; deep enough for any balanced tree of `u32` size.
type Stack<E> = SmallVec<[E; 64]>;

/// The link-level red-black tree backing `RbTree`.
///
/// Knows nothing about keys or ordering: callers choose the slot a new node hangs from, and
/// this layer keeps colors, links, the cached extrema and the length consistent.
pub(crate) struct RawRbTree<T, A: NodeArena<Node<T>>> {
    /// Arena storing all tree nodes.
    arena: A,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<NodeHandle>,
    /// Minimum node, the first position of forward iteration.
    leftmost: Option<NodeHandle>,
    /// Maximum node, the target of stepping back from the end position.
    rightmost: Option<NodeHandle>,
    /// Number of value-bearing nodes in the tree.
    len: usize,
    marker: PhantomData<T>,
}

impl<T, A: NodeArena<Node<T>>> RawRbTree<T, A> {
    /// Creates a new, empty tree storing its nodes in `arena`.
    pub(crate) const fn new(arena: A) -> Self {
        Self {
            arena,
            root: None,
            leftmost: None,
            rightmost: None,
            len: 0,
            marker: PhantomData,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn root(&self) -> Option<NodeHandle> {
        self.root
    }

    pub(crate) const fn leftmost(&self) -> Option<NodeHandle> {
        self.leftmost
    }

    pub(crate) const fn rightmost(&self) -> Option<NodeHandle> {
        self.rightmost
    }

    pub(crate) const fn arena(&self) -> &A {
        &self.arena
    }

    #[inline]
    pub(crate) fn node(&self, handle: NodeHandle) -> &Node<T> {
        self.arena.node(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: NodeHandle) -> &mut Node<T> {
        self.arena.node_mut(handle)
    }

    #[inline]
    pub(crate) fn value(&self, handle: NodeHandle) -> &T {
        self.node(handle).value()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: NodeHandle) -> &mut T {
        self.node_mut(handle).value_mut()
    }

    #[inline]
    pub(crate) fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.node(handle).parent()
    }

    #[inline]
    pub(crate) fn child(&self, handle: NodeHandle, side: Side) -> Option<NodeHandle> {
        self.node(handle).child(side)
    }

    /// Empty slots count as black.
    #[inline]
    fn is_red(&self, handle: Option<NodeHandle>) -> bool {
        handle.is_some_and(|h| self.node(h).color() == Color::Red)
    }

    #[inline]
    fn set_color(&mut self, handle: NodeHandle, color: Color) {
        self.node_mut(handle).set_color(color);
    }

    fn set_child(&mut self, parent: NodeHandle, side: Side, child: Option<NodeHandle>) {
        self.node_mut(parent).set_child(side, child);
        if let Some(child) = child {
            self.node_mut(child).set_parent(Some(parent));
        }
    }

    /// Which side of `parent` the node `child` hangs from.
    fn side_of(&self, parent: NodeHandle, child: NodeHandle) -> Side {
        if self.child(parent, Side::Left) == Some(child) { Side::Left } else { Side::Right }
    }

    /// Points whatever referenced `old` (a parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeHandle>, old: NodeHandle, new: Option<NodeHandle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.node_mut(parent).set_child(side, new);
            }
        }
        if let Some(new) = new {
            self.node_mut(new).set_parent(parent);
        }
    }

    /// Descends from `handle` along `side` until there is no further child.
    pub(crate) fn extreme(&self, mut handle: NodeHandle, side: Side) -> NodeHandle {
        while let Some(next) = self.child(handle, side) {
            handle = next;
        }
        handle
    }

    /// The in-order neighbour of `handle` in direction `side`, using structural links only.
    fn neighbor(&self, handle: NodeHandle, side: Side) -> Option<NodeHandle> {
        if let Some(child) = self.child(handle, side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut current = handle;
        let mut parent = self.parent(current);
        while let Some(p) = parent {
            if self.child(p, side) != Some(current) {
                break;
            }
            current = p;
            parent = self.parent(p);
        }
        parent
    }

    /// In-order successor; `None` means the end position.
    pub(crate) fn successor(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.neighbor(handle, Side::Right)
    }

    /// In-order predecessor; `None` means `handle` is the minimum.
    pub(crate) fn predecessor(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.neighbor(handle, Side::Left)
    }

    /// Single rotation moving `x` down towards `dir`; its child on the opposite side takes
    /// its place. `Side::Left` is a left rotation.
    pub(crate) fn rotate(&mut self, x: NodeHandle, dir: Side) {
        let other = dir.opposite();
        let y = self.child(x, other).expect("`RawRbTree::rotate()` - pivot has no child to promote!");

        let inner = self.child(y, dir);
        self.node_mut(x).set_child(other, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(x));
        }

        let parent = self.parent(x);
        self.replace_child(parent, x, Some(y));
        self.set_child(y, dir, Some(x));
    }

    // ─── Node lifecycle ──────────────────────────────────────────────────────

    /// Reserves a node and moves `value` into it. The node is not linked.
    pub(crate) fn create(&mut self, value: T) -> Result<NodeHandle, AllocError> {
        let handle = self.arena.allocate_node()?;
        self.arena.construct_value(handle, Node::new(value));
        Ok(handle)
    }

    /// Reserves a node, then builds its value with `make`. If `make` fails the node goes
    /// straight back to the arena and the tree is untouched.
    pub(crate) fn try_create_with<E, F>(&mut self, make: F) -> Result<NodeHandle, InsertError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let handle = self.arena.allocate_node()?;
        match make() {
            Ok(value) => {
                self.arena.construct_value(handle, Node::new(value));
                Ok(handle)
            }
            Err(err) => {
                debug!("value construction failed; releasing reserved node {handle:?}");
                self.arena.deallocate_node(handle);
                Err(InsertError::Construct(err))
            }
        }
    }

    /// Destroys and frees a node that was created but never linked.
    pub(crate) fn discard(&mut self, handle: NodeHandle) -> T {
        let node = self.arena.destroy_value(handle);
        self.arena.deallocate_node(handle);
        node.into_value()
    }

    // ─── Insertion ───────────────────────────────────────────────────────────

    /// Hangs the unlinked node `handle` from `parent` on `side` (or makes it the root), then
    /// restores the red-black rules.
    pub(crate) fn link(&mut self, handle: NodeHandle, parent: Option<NodeHandle>, side: Side) {
        match parent {
            None => {
                debug_assert!(self.root.is_none(), "`RawRbTree::link()` - root slot is occupied!");
                self.root = Some(handle);
                self.leftmost = Some(handle);
                self.rightmost = Some(handle);
            }
            Some(parent) => {
                debug_assert!(
                    self.child(parent, side).is_none(),
                    "`RawRbTree::link()` - child slot is occupied!"
                );
                self.set_child(parent, side, Some(handle));
                // A new extremum can only appear directly below the old one.
                match side {
                    Side::Left if self.leftmost == Some(parent) => self.leftmost = Some(handle),
                    Side::Right if self.rightmost == Some(parent) => self.rightmost = Some(handle),
                    _ => {}
                }
            }
        }

        self.len += 1;
        self.insert_rebalance(handle);
    }

    fn insert_rebalance(&mut self, mut x: NodeHandle) {
        while let Some(parent) = self.parent(x) {
            if !self.is_red(Some(parent)) {
                break;
            }
            let grandparent = self
                .parent(parent)
                .expect("`RawRbTree::insert_rebalance()` - red node without a parent!");
            let parent_side = self.side_of(grandparent, parent);
            let uncle = self.child(grandparent, parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.is_red(Some(u))) {
                // Push the violation two levels up.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                x = grandparent;
                continue;
            }

            let mut parent = parent;
            if self.side_of(parent, x) != parent_side {
                // Zig-zag: turn the inner grandchild into an outer one.
                self.rotate(parent, parent_side);
                parent = x;
            }
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, parent_side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    // ─── Deletion ────────────────────────────────────────────────────────────

    /// Unlinks `z`, rebalances, and returns its value after freeing the node.
    pub(crate) fn remove(&mut self, z: NodeHandle) -> T {
        if self.leftmost == Some(z) {
            self.leftmost = self.successor(z);
        }
        if self.rightmost == Some(z) {
            self.rightmost = self.predecessor(z);
        }

        let left = self.child(z, Side::Left);
        let right = self.child(z, Side::Right);

        // The color that physically leaves its position, and the slot that inherits it.
        let removed_color;
        let x;
        let x_parent;
        let x_side;

        if let (Some(left), Some(right)) = (left, right) {
            let y = self.extreme(right, Side::Left);
            removed_color = self.node(y).color();
            x = self.child(y, Side::Right);

            if self.parent(y) == Some(z) {
                x_parent = Some(y);
                x_side = Some(Side::Right);
            } else {
                x_parent = self.parent(y);
                x_side = Some(Side::Left);
                self.replace_child(x_parent, y, x);
                self.set_child(y, Side::Right, Some(right));
            }

            let z_parent = self.parent(z);
            self.replace_child(z_parent, z, Some(y));
            self.set_child(y, Side::Left, Some(left));
            let z_color = self.node(z).color();
            self.set_color(y, z_color);
        } else {
            removed_color = self.node(z).color();
            x = left.or(right);
            x_parent = self.parent(z);
            x_side = x_parent.map(|p| self.side_of(p, z));
            self.replace_child(x_parent, z, x);
        }

        if removed_color == Color::Black {
            self.erase_rebalance(x, x_parent, x_side);
        }

        self.len -= 1;
        self.discard(z)
    }

    /// Repairs a missing black on the path through slot `x` (`side` of `parent`).
    fn erase_rebalance(&mut self, mut x: Option<NodeHandle>, mut parent: Option<NodeHandle>, mut side: Option<Side>) {
        while let (Some(p), Some(s)) = (parent, side) {
            if self.is_red(x) {
                break;
            }
            let other = s.opposite();
            let mut sibling = self
                .child(p, other)
                .expect("`RawRbTree::erase_rebalance()` - black deficit without a sibling!");

            if self.is_red(Some(sibling)) {
                self.set_color(sibling, Color::Black);
                self.set_color(p, Color::Red);
                self.rotate(p, s);
                sibling = self
                    .child(p, other)
                    .expect("`RawRbTree::erase_rebalance()` - black deficit without a sibling!");
            }

            let near = self.child(sibling, s);
            let far = self.child(sibling, other);
            if !self.is_red(near) && !self.is_red(far) {
                self.set_color(sibling, Color::Red);
                x = Some(p);
                parent = self.parent(p);
                side = parent.map(|pp| self.side_of(pp, p));
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    self.set_color(near, Color::Black);
                }
                self.set_color(sibling, Color::Red);
                self.rotate(sibling, other);
                sibling = self
                    .child(p, other)
                    .expect("`RawRbTree::erase_rebalance()` - black deficit without a sibling!");
            }

            let parent_color = self.node(p).color();
            self.set_color(sibling, parent_color);
            self.set_color(p, Color::Black);
            if let Some(far) = self.child(sibling, other) {
                self.set_color(far, Color::Black);
            }
            self.rotate(p, s);
            x = self.root;
            break;
        }

        if let Some(x) = x {
            self.set_color(x, Color::Black);
        }
    }

    // ─── Whole-tree operations ───────────────────────────────────────────────

    /// Destroys every node. Uses an explicit stack so skewed inputs cannot overflow.
    pub(crate) fn clear(&mut self) {
        let Some(root) = self.root.take() else {
            return;
        };

        let mut stack: Stack<NodeHandle> = smallvec![root];
        while let Some(handle) = stack.pop() {
            let node = self.arena.destroy_value(handle);
            self.arena.deallocate_node(handle);
            stack.extend(node.child(Side::Left));
            stack.extend(node.child(Side::Right));
        }

        self.leftmost = None;
        self.rightmost = None;
        self.len = 0;
    }

    /// Moves every value out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.leftmost;
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }

        self.root = None;
        self.leftmost = None;
        self.rightmost = None;
        self.len = 0;

        order.into_iter().map(|handle| self.discard(handle)).collect()
    }

    /// Deep-copies the tree into `arena`, preserving shape and colors.
    ///
    /// On failure every node copied so far is destroyed and returned to `arena` before the
    /// error is surfaced.
    pub(crate) fn try_clone_in<E, F>(&self, arena: A, mut clone_value: F) -> Result<Self, InsertError<E>>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        let mut copy = Self::new(arena);
        let Some(root) = self.root else {
            return Ok(copy);
        };

        let mut created: Vec<NodeHandle> = Vec::with_capacity(self.len);
        let mut stack: Stack<(NodeHandle, Option<NodeHandle>, Side)> = smallvec![(root, None, Side::Left)];

        while let Some((source, copy_parent, side)) = stack.pop() {
            let node = self.node(source);
            let handle = match copy.try_create_with(|| clone_value(node.value())) {
                Ok(handle) => handle,
                Err(err) => {
                    debug!("tree copy failed after {} of {} nodes; rolling back", created.len(), self.len);
                    copy.root = None;
                    for handle in created {
                        copy.discard(handle);
                    }
                    return Err(err);
                }
            };
            created.push(handle);

            copy.set_color(handle, node.color());
            match copy_parent {
                None => copy.root = Some(handle),
                Some(parent) => copy.set_child(parent, side, Some(handle)),
            }
            for side in [Side::Right, Side::Left] {
                if let Some(child) = node.child(side) {
                    stack.push((child, Some(handle), side));
                }
            }
        }

        copy.leftmost = copy.root.map(|root| copy.extreme(root, Side::Left));
        copy.rightmost = copy.root.map(|root| copy.extreme(root, Side::Right));
        copy.len = self.len;
        Ok(copy)
    }

    // ─── Verification ────────────────────────────────────────────────────────

    /// Checks the color rules, parent links, cached extrema and length.
    pub(crate) fn check_structure(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            if self.len != 0 {
                return Err(InvariantViolation::LengthMismatch {
                    stored: self.len,
                    reachable: 0,
                });
            }
            if self.leftmost.is_some() {
                return Err(InvariantViolation::StaleLeftmost);
            }
            if self.rightmost.is_some() {
                return Err(InvariantViolation::StaleRightmost);
            }
            return Ok(());
        };

        if self.is_red(Some(root)) {
            return Err(InvariantViolation::RedRoot);
        }
        if self.parent(root).is_some() {
            return Err(InvariantViolation::BrokenParentLink { node: root.to_index() });
        }

        let mut reachable = 0;
        let mut black_height = None;
        let mut stack: Stack<NodeHandle> = smallvec![root];
        while let Some(handle) = stack.pop() {
            reachable += 1;
            let red = self.is_red(Some(handle));

            for side in [Side::Left, Side::Right] {
                match self.child(handle, side) {
                    Some(child) => {
                        if self.parent(child) != Some(handle) {
                            return Err(InvariantViolation::BrokenParentLink { node: child.to_index() });
                        }
                        if red && self.is_red(Some(child)) {
                            return Err(InvariantViolation::RedRedEdge {
                                parent: handle.to_index(),
                                child: child.to_index(),
                            });
                        }
                        stack.push(child);
                    }
                    None => {
                        let found = self.blacks_to_root(handle);
                        match black_height {
                            None => black_height = Some(found),
                            Some(expected) if expected != found => {
                                return Err(InvariantViolation::BlackHeightMismatch { expected, found });
                            }
                            Some(_) => {}
                        }
                    }
                }
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::LengthMismatch {
                stored: self.len,
                reachable,
            });
        }
        if self.leftmost != Some(self.extreme(root, Side::Left)) {
            return Err(InvariantViolation::StaleLeftmost);
        }
        if self.rightmost != Some(self.extreme(root, Side::Right)) {
            return Err(InvariantViolation::StaleRightmost);
        }
        Ok(())
    }

    fn blacks_to_root(&self, mut handle: NodeHandle) -> usize {
        let mut count = 0;
        loop {
            if !self.is_red(Some(handle)) {
                count += 1;
            }
            match self.parent(handle) {
                Some(parent) => handle = parent,
                None => return count,
            }
        }
    }
}

impl<T, A: NodeArena<Node<T>>> Drop for RawRbTree<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}
