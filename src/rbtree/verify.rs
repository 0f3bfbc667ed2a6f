use super::RbTree;
use crate::error::InvariantViolation;
use crate::policy::{Compare, KeyOf};
use crate::raw::{Node, NodeArena};

impl<T, X, C, A> RbTree<T, X, C, A>
where
    X: KeyOf<T>,
    C: Compare<X::Key>,
    A: NodeArena<Node<T>>,
{
    /// Walks the whole tree and checks every structural rule: the root is black, no red node
    /// has a red child, every root-to-empty-slot path has the same number of black nodes,
    /// parent links agree with child links, the cached minimum and maximum are correct, the
    /// length matches the reachable node count, and keys never decrease in order.
    ///
    /// This is a debugging aid for tests: it takes O(n log n) time and uses no recursion.
    ///
    /// # Errors
    /// Returns the first broken rule found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.check(false)
    }

    /// [`check_invariants`](Self::check_invariants), additionally requiring keys to be
    /// strictly increasing, as they are when only [`insert_unique`](Self::insert_unique) is used.
    ///
    /// # Errors
    /// Returns the first broken rule found.
    pub fn check_invariants_strict(&self) -> Result<(), InvariantViolation> {
        self.check(true)
    }

    fn check(&self, strict: bool) -> Result<(), InvariantViolation> {
        self.raw.check_structure()?;

        let mut previous: Option<&X::Key> = None;
        for (position, value) in self.iter().enumerate() {
            let key = self.key_of.key_of(value);
            if let Some(previous) = previous {
                let out_of_order = if strict {
                    !self.compare.less(previous, key)
                } else {
                    self.compare.less(key, previous)
                };
                if out_of_order {
                    return Err(InvariantViolation::OutOfOrder { position });
                }
            }
            previous = Some(key);
        }
        Ok(())
    }
}
