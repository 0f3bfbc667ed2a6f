//! Error types surfaced by fallible tree operations.

use core::fmt;

/// The node arena could not hand out another node.
///
/// Returned when a [`SlabArena`](crate::SlabArena) reaches its configured limit or
/// runs out of addressable handles. The tree is left exactly as it was before the call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("node arena exhausted")
    }
}

impl core::error::Error for AllocError {}

/// Failure of an insertion whose value is built by a fallible closure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InsertError<E> {
    /// No node storage was available; the constructor was never called.
    Alloc(AllocError),
    /// The constructor failed; the reserved node was returned to the arena.
    Construct(E),
}

impl<E> From<AllocError> for InsertError<E> {
    fn from(err: AllocError) -> Self {
        InsertError::Alloc(err)
    }
}

impl<E: fmt::Display> fmt::Display for InsertError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::Alloc(err) => err.fmt(f),
            InsertError::Construct(err) => write!(f, "value construction failed: {err}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for InsertError<E> {}

/// A structural rule of the red-black tree found broken by
/// [`RbTree::check_invariants`](crate::RbTree::check_invariants).
///
/// Any of these indicates a bug in the tree itself (or a comparator that is not a strict
/// weak order), never a user-recoverable condition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedRedEdge { parent: usize, child: usize },
    /// Two descending paths from the root cross a different number of black nodes.
    BlackHeightMismatch { expected: usize, found: usize },
    /// A child does not point back at its parent.
    BrokenParentLink { node: usize },
    /// In-order traversal produced a key that sorts before (or, in strict mode, equal to)
    /// its predecessor.
    OutOfOrder { position: usize },
    /// The cached leftmost node is not the true minimum.
    StaleLeftmost,
    /// The cached rightmost node is not the true maximum.
    StaleRightmost,
    /// The stored length disagrees with the number of reachable nodes.
    LengthMismatch { stored: usize, reachable: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::RedRoot => f.write_str("root node is red"),
            InvariantViolation::RedRedEdge { parent, child } => {
                write!(f, "red node #{parent} has red child #{child}")
            }
            InvariantViolation::BlackHeightMismatch { expected, found } => {
                write!(f, "black height mismatch: expected {expected}, found {found}")
            }
            InvariantViolation::BrokenParentLink { node } => {
                write!(f, "node #{node} does not point back at its parent")
            }
            InvariantViolation::OutOfOrder { position } => {
                write!(f, "in-order traversal out of order at position {position}")
            }
            InvariantViolation::StaleLeftmost => f.write_str("cached leftmost node is not the minimum"),
            InvariantViolation::StaleRightmost => f.write_str("cached rightmost node is not the maximum"),
            InvariantViolation::LengthMismatch { stored, reachable } => {
                write!(f, "stored length {stored} but {reachable} nodes reachable")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        assert_eq!(AllocError.to_string(), "node arena exhausted");
        assert_eq!(InsertError::<&str>::Construct("boom").to_string(), "value construction failed: boom");
        assert_eq!(InsertError::<&str>::from(AllocError).to_string(), "node arena exhausted");
        assert_eq!(
            InvariantViolation::LengthMismatch { stored: 3, reachable: 2 }.to_string(),
            "stored length 3 but 2 nodes reachable"
        );
    }
}
