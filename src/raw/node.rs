use super::handle::NodeHandle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which child slot of a node. Rebalancing is written once per case and mirrored through this.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One value-bearing node of an [`RbTree`](crate::RbTree), as stored in its arena.
///
/// The fields are private; custom [`NodeArena`](crate::NodeArena) implementations
/// only ever move nodes in and out.
#[derive(Debug)]
pub struct Node<T> {
    color: Color,
    parent: Option<NodeHandle>,
    children: [Option<NodeHandle>; 2],
    value: T,
}

impl<T> Node<T> {
    /// A freshly inserted node: red, unlinked.
    pub(crate) const fn new(value: T) -> Self {
        Self {
            color: Color::Red,
            parent: None,
            children: [None, None],
            value,
        }
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<NodeHandle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<NodeHandle> {
        self.children[side as usize]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeHandle>) {
        self.children[side as usize] = child;
    }

    #[inline]
    pub(crate) const fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_red_and_detached() {
        let node = Node::new(5);
        assert_eq!(node.color(), Color::Red);
        assert_eq!(node.parent(), None);
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.child(Side::Right), None);
        assert_eq!(node.into_value(), 5);
    }

    #[test]
    fn children_are_indexed_by_side() {
        let mut node = Node::new('x');
        node.set_color(Color::Black);
        node.set_child(Side::Right, Some(NodeHandle::from_index(3)));
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(node.child(Side::Right), Some(NodeHandle::from_index(3)));
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(node.color(), Color::Black);
    }
}
