use std::cell::Cell;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rb_index::{
    AllocError, First, Identity, InsertError, Natural, Node, NodeArena, NodeHandle, Position, RbTree, Reverse,
    SlabArena,
};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a narrow range so duplicates are common.
fn key_strategy() -> impl Strategy<Value = i32> {
    -300i32..300i32
}

/// Expands a multiset model into the sorted sequence the tree should hold.
fn flatten(model: &BTreeMap<i32, usize>) -> Vec<i32> {
    model.iter().flat_map(|(&k, &n)| std::iter::repeat_n(k, n)).collect()
}

fn take_one(model: &mut BTreeMap<i32, usize>, key: i32) {
    if let Some(n) = model.get_mut(&key) {
        *n -= 1;
        if *n == 0 {
            model.remove(&key);
        }
    }
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    InsertEqual(i32),
    InsertUnique(i32),
    InsertEqualHinted(i32),
    InsertUniqueHinted(i32),
    Erase(i32),
    EraseKey(i32),
    PopFirst,
    PopLast,
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        4 => key_strategy().prop_map(TreeOp::InsertEqual),
        4 => key_strategy().prop_map(TreeOp::InsertUnique),
        2 => key_strategy().prop_map(TreeOp::InsertEqualHinted),
        2 => key_strategy().prop_map(TreeOp::InsertUniqueHinted),
        3 => key_strategy().prop_map(TreeOp::Erase),
        1 => key_strategy().prop_map(TreeOp::EraseKey),
        1 => Just(TreeOp::PopFirst),
        1 => Just(TreeOp::PopLast),
    ]
}

// ─── Multiset behavior ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random insert/erase sequences against a counted `BTreeMap` and checks
    /// the red-black rules after every step.
    #[test]
    fn tree_ops_match_multiset(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut tree: RbTree<i32> = RbTree::new();
        let mut model: BTreeMap<i32, usize> = BTreeMap::new();

        for op in &ops {
            match *op {
                TreeOp::InsertEqual(k) => {
                    let at = tree.insert_equal(k);
                    prop_assert_eq!(tree.get(at), Some(&k));
                    // A new equal key lands after the existing ones.
                    prop_assert_eq!(tree.next(at), Some(tree.upper_bound(&k)));
                    *model.entry(k).or_default() += 1;
                }
                TreeOp::InsertUnique(k) => {
                    let (at, inserted) = tree.insert_unique(k);
                    prop_assert_eq!(tree.get(at), Some(&k));
                    prop_assert_eq!(inserted, !model.contains_key(&k), "insert_unique({})", k);
                    model.entry(k).or_insert(1);
                }
                TreeOp::InsertEqualHinted(k) => {
                    let hint = tree.lower_bound(&k);
                    let at = tree.insert_equal_hint(hint, k);
                    prop_assert_eq!(tree.get(at), Some(&k));
                    *model.entry(k).or_default() += 1;
                }
                TreeOp::InsertUniqueHinted(k) => {
                    let hint = tree.upper_bound(&k);
                    let at = tree.insert_unique_hint(hint, k);
                    prop_assert_eq!(tree.get(at), Some(&k));
                    model.entry(k).or_insert(1);
                }
                TreeOp::Erase(k) => {
                    let at = tree.find(&k);
                    prop_assert_eq!(at.is_end(), !model.contains_key(&k), "find({})", k);
                    if !at.is_end() {
                        prop_assert_eq!(tree.erase(at), k);
                        take_one(&mut model, k);
                    }
                }
                TreeOp::EraseKey(k) => {
                    prop_assert_eq!(tree.erase_key(&k), model.remove(&k).unwrap_or(0), "erase_key({})", k);
                }
                TreeOp::PopFirst => {
                    let expected = model.keys().next().copied();
                    prop_assert_eq!(tree.pop_first(), expected);
                    if let Some(k) = expected {
                        take_one(&mut model, k);
                    }
                }
                TreeOp::PopLast => {
                    let expected = model.keys().next_back().copied();
                    prop_assert_eq!(tree.pop_last(), expected);
                    if let Some(k) = expected {
                        take_one(&mut model, k);
                    }
                }
            }
            prop_assert_eq!(tree.len(), model.values().sum::<usize>(), "len mismatch after {:?}", op);
            prop_assert_eq!(tree.arena().live(), tree.len(), "leaked nodes after {:?}", op);
        }

        prop_assert_eq!(tree.check_invariants(), Ok(()));
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), flatten(&model));
        prop_assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), flatten(&model).into_iter().rev().collect::<Vec<_>>());
    }

    /// Every stored key's `equal_range` brackets exactly its copies.
    #[test]
    fn equal_range_matches_counts(keys in proptest::collection::vec(key_strategy(), TEST_SIZE)) {
        let tree: RbTree<i32> = keys.iter().copied().collect();
        let mut model: BTreeMap<i32, usize> = BTreeMap::new();
        for &k in &keys {
            *model.entry(k).or_default() += 1;
        }

        for (&k, &n) in &model {
            let (first, last) = tree.equal_range(&k);
            prop_assert_eq!(tree.count(&k), n);
            prop_assert!(tree.iter_between(first, last).all(|&v| v == k));
            prop_assert_eq!(tree.get(last), model.range(k + 1..).next().map(|(k, _)| k));
        }
        prop_assert_eq!(tree.check_invariants(), Ok(()));
    }

    /// Walking positions forward and backward visits the same sequence as `iter`.
    #[test]
    fn positions_agree_with_iter(keys in proptest::collection::vec(key_strategy(), 0..TEST_SIZE)) {
        let tree: RbTree<i32> = keys.into_iter().collect();

        let mut forward = Vec::new();
        let mut at = tree.begin();
        while let Some(value) = tree.get(at) {
            forward.push(*value);
            at = tree.next(at).unwrap();
        }
        prop_assert!(at.is_end());
        prop_assert_eq!(&forward, &tree.iter().copied().collect::<Vec<_>>());

        let mut backward = Vec::new();
        let mut at = tree.end();
        while let Some(prev) = tree.prev(at) {
            backward.push(*tree.get(prev).unwrap());
            at = prev;
        }
        prop_assert_eq!(at, tree.begin());
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    /// Interleaving `next` and `next_back` on a range yields each value once.
    #[test]
    fn range_interleaved_ends(
        keys in proptest::collection::vec(key_strategy(), TEST_SIZE),
        lo in key_strategy(),
        hi in key_strategy(),
        pattern in proptest::collection::vec(any::<bool>(), 0..64),
    ) {
        let tree: RbTree<i32> = keys.into_iter().collect();
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let expected: Vec<i32> = tree.iter().copied().filter(|v| (lo..=hi).contains(v)).collect();
        let mut range = tree.range(lo..=hi);
        let mut front = Vec::new();
        let mut back = Vec::new();
        for from_front in pattern.into_iter().chain(std::iter::repeat(true)) {
            let item = if from_front { range.next() } else { range.next_back() };
            match item {
                Some(v) if from_front => front.push(*v),
                Some(v) => back.push(*v),
                None => break,
            }
        }
        prop_assert_eq!(range.next(), None);
        prop_assert_eq!(range.next_back(), None);
        back.reverse();
        front.extend(back);
        prop_assert_eq!(front, expected);
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn ascending_unique_inserts_then_erase() {
    let mut tree = RbTree::new();
    for key in [10, 20, 30, 40, 50, 25] {
        assert!(tree.insert_unique(key).1);
    }
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 20, 25, 30, 40, 50]);
    assert_eq!(tree.check_invariants_strict(), Ok(()));

    let at = tree.find(&30);
    assert_eq!(tree.erase(at), 30);
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 20, 25, 40, 50]);
    assert_eq!(tree.check_invariants_strict(), Ok(()));
}

#[test]
fn positions_survive_unrelated_changes() {
    let mut tree: RbTree<i32> = (0..100).collect();
    let kept = tree.find(&50);
    for key in (0..100).filter(|k| k % 2 == 1) {
        let at = tree.find(&key);
        tree.erase(at);
    }
    tree.extend_equal(200..300);
    assert_eq!(tree.get(kept), Some(&50));
    assert_eq!(tree.next(kept).and_then(|p| tree.get(p)), Some(&52));
}

#[test]
fn empty_tree_edges() {
    let mut tree: RbTree<i32> = RbTree::new();
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.prev(tree.end()), None);
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
    assert_eq!(tree.pop_first(), None);
    assert_eq!(tree.erase_key(&1), 0);
    assert_eq!(tree.erase_range(Position::END, Position::END), 0);
    assert_eq!(tree.iter().next(), None);
    assert_eq!(tree.range(..).next_back(), None);
    assert_eq!(tree.check_invariants_strict(), Ok(()));
}

#[test]
fn multimap_with_reverse_order() {
    let mut tree = RbTree::with_policies(First, Reverse);
    tree.insert_equal((1, "one"));
    tree.insert_equal((3, "three"));
    tree.insert_equal((2, "two"));
    tree.insert_equal((3, "drei"));

    let keys: Vec<_> = tree.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [3, 3, 2, 1]);
    let (first, last) = tree.equal_range(&3);
    let threes: Vec<_> = tree.iter_between(first, last).map(|(_, v)| *v).collect();
    assert_eq!(threes, ["three", "drei"]);
    // Bounds follow the tree's own order.
    assert_eq!(tree.range(&2..=&1).count(), 2);
}

#[test]
fn owned_keys_found_by_borrowed_form() {
    let mut tree: RbTree<String> = ["kiwi", "apple", "kiwi", "plum"].into_iter().map(str::to_owned).collect();
    assert_eq!(tree.count("kiwi"), 2);
    assert!(tree.contains("plum"));
    assert_eq!(tree.get(tree.lower_bound("b")).map(String::as_str), Some("kiwi"));
    assert_eq!(tree.erase_key("kiwi"), 2);
    assert!(tree.find("kiwi").is_end());
    assert_eq!(tree.len(), 2);
}

#[test]
fn inverted_erase_range_stops_at_the_maximum() {
    let mut tree: RbTree<i32> = (0..10).collect();
    let (first, last) = (tree.find(&5), tree.find(&2));
    let outcome = catch_unwind(AssertUnwindSafe(|| tree.erase_range(first, last)));
    assert!(outcome.is_err());
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
    assert_eq!(tree.check_invariants_strict(), Ok(()));
}

// ─── Fallible paths ──────────────────────────────────────────────────────────

#[test]
fn bounded_arena_surfaces_alloc_errors() {
    let mut tree = RbTree::with_arena(SlabArena::with_limit(3));
    for key in [2, 1, 3] {
        assert_eq!(tree.try_insert_unique(key).map(|(_, inserted)| inserted), Ok(true));
    }
    assert_eq!(tree.try_insert_unique(4), Err(AllocError));
    assert_eq!(tree.try_insert_equal(4), Err(AllocError));
    assert_eq!(tree.try_insert_equal_with(|| Ok::<_, ()>(4)), Err(InsertError::Alloc(AllocError)));
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);

    // Freed nodes are handed out again.
    tree.pop_first();
    assert!(tree.try_insert_equal(0).is_ok());
    assert_eq!(tree.arena().live(), 3);
    assert_eq!(tree.check_invariants_strict(), Ok(()));
}

#[test]
fn failed_construction_returns_the_node() {
    let mut tree: RbTree<String> = RbTree::new();
    tree.insert_unique("b".to_owned());
    let result = tree.try_insert_unique_with(|| "x".parse::<u8>().map(|n| n.to_string()));
    assert!(matches!(result, Err(InsertError::Construct(_))));
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.arena().live(), 1);
}

#[test]
fn clone_rollback_leaves_source_untouched() {
    let tree: RbTree<i32> = (0..64).collect();

    let mut budget = 40;
    let copy = tree.try_clone_with(|value| {
        if budget == 0 {
            return Err("out of budget");
        }
        budget -= 1;
        Ok(*value)
    });
    assert_eq!(copy.err(), Some(InsertError::Construct("out of budget")));

    let copy = tree.try_clone_in(SlabArena::with_limit(10), |value| Ok::<_, ()>(*value));
    assert_eq!(copy.err(), Some(InsertError::Alloc(AllocError)));

    let copy = tree.clone();
    assert_eq!(copy, tree);
    assert_eq!(copy.check_invariants_strict(), Ok(()));
    assert_eq!(tree.arena().live(), 64);
}

// ─── Custom arenas ───────────────────────────────────────────────────────────

/// Allocation and release counts, shared by every clone.
#[derive(Clone, Default)]
struct Traffic {
    allocations: Rc<Cell<usize>>,
    releases: Rc<Cell<usize>>,
}

/// Wraps a [`SlabArena`] and counts every allocation and release.
struct CountingArena<N> {
    inner: SlabArena<N>,
    traffic: Traffic,
}

impl<N> CountingArena<N> {
    fn new(inner: SlabArena<N>, traffic: Traffic) -> Self {
        Self { inner, traffic }
    }
}

impl<N> Default for CountingArena<N> {
    fn default() -> Self {
        Self::new(SlabArena::new(), Traffic::default())
    }
}

impl<N> NodeArena<N> for CountingArena<N> {
    fn allocate_node(&mut self) -> Result<NodeHandle, AllocError> {
        let handle = self.inner.allocate_node()?;
        self.traffic.allocations.set(self.traffic.allocations.get() + 1);
        Ok(handle)
    }

    fn deallocate_node(&mut self, handle: NodeHandle) {
        self.traffic.releases.set(self.traffic.releases.get() + 1);
        self.inner.deallocate_node(handle);
    }

    fn construct_value(&mut self, handle: NodeHandle, value: N) {
        self.inner.construct_value(handle, value);
    }

    fn destroy_value(&mut self, handle: NodeHandle) -> N {
        self.inner.destroy_value(handle)
    }

    fn node(&self, handle: NodeHandle) -> &N {
        self.inner.node(handle)
    }

    fn node_mut(&mut self, handle: NodeHandle) -> &mut N {
        self.inner.node_mut(handle)
    }

    fn live(&self) -> usize {
        self.inner.live()
    }
}

#[test]
fn custom_arena_sees_balanced_traffic() {
    let traffic = Traffic::default();
    let mut tree: RbTree<u32, _, _, CountingArena<Node<u32>>> =
        RbTree::with_parts(Identity, Natural, CountingArena::new(SlabArena::new(), traffic.clone()));
    tree.extend_unique([5, 1, 4, 1, 5, 9, 2, 6]);
    assert_eq!(traffic.allocations.get(), 6);
    tree.erase_key(&4);
    assert_eq!(traffic.releases.get(), 1);
    tree.clear();
    assert_eq!(traffic.releases.get(), 6);
    assert_eq!(tree.arena().live(), 0);
}

#[test]
fn failed_clone_releases_every_copied_node() {
    let mut source: RbTree<u32, _, _, CountingArena<Node<u32>>> =
        RbTree::with_parts(Identity, Natural, CountingArena::default());
    source.extend_unique(0..64);

    let traffic = Traffic::default();
    let mut budget = 40;
    let copy = source.try_clone_in(CountingArena::new(SlabArena::new(), traffic.clone()), |value| {
        if budget == 0 {
            return Err("out of budget");
        }
        budget -= 1;
        Ok(*value)
    });
    assert_eq!(copy.err(), Some(InsertError::Construct("out of budget")));
    assert_eq!(traffic.allocations.get(), 41);
    assert_eq!(traffic.releases.get(), 41);

    let traffic = Traffic::default();
    let copy = source.try_clone_in(CountingArena::new(SlabArena::with_limit(10), traffic.clone()), |value| {
        Ok::<_, ()>(*value)
    });
    assert_eq!(copy.err(), Some(InsertError::Alloc(AllocError)));
    assert_eq!(traffic.allocations.get(), 10);
    assert_eq!(traffic.releases.get(), 10);

    assert_eq!(source.len(), 64);
    assert_eq!(source.arena().live(), 64);
    assert_eq!(source.check_invariants_strict(), Ok(()));
}
