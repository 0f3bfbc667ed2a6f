//! Arena-backed red-black ordered indexes for Rust.
//!
//! This crate provides [`RbTree`], a generic red-black tree that stores values of type `T`,
//! orders them by a key extracted through a [`KeyOf`] policy under a [`Compare`] policy, and
//! keeps its nodes in a [`NodeArena`]. Equal keys are allowed or rejected per insertion
//! ([`insert_equal`](RbTree::insert_equal) / [`insert_unique`](RbTree::insert_unique)), so
//! the one engine backs sets, multisets, maps and multimaps.
//!
//! [`RbSet`] and [`RbMap`] are thin unique-key adaptors in the style of `BTreeSet` and
//! `BTreeMap`.
//!
//! # Example
//!
//! ```
//! use rb_index::{First, Natural, RbTree};
//!
//! // A multimap: entries ordered by the first tuple field, duplicates kept in insertion order.
//! let mut log = RbTree::with_policies(First, Natural);
//! log.insert_equal((3, "c"));
//! log.insert_equal((1, "a"));
//! log.insert_equal((3, "d"));
//!
//! assert_eq!(log.count(&3), 2);
//! let (first, last) = log.equal_range(&3);
//! let entries: Vec<_> = log.iter_between(first, last).map(|(_, v)| *v).collect();
//! assert_eq!(entries, ["c", "d"]);
//!
//! // Positions stay valid while other entries come and go.
//! let at = log.find(&1);
//! log.insert_unique((2, "b"));
//! assert_eq!(log.get(at), Some(&(1, "a")));
//! assert!(log.check_invariants().is_ok());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Pluggable storage** - Nodes live in any [`NodeArena`]; [`SlabArena`] is the default and
//!   can be bounded to make allocation failure observable through the `try_*` entry points
//! - **Stable positions** - A [`Position`] survives insertions and erasure of other values
//! - **Self-checking** - [`check_invariants`](RbTree::check_invariants) verifies every
//!   red-black rule without recursion
//!
//! # Implementation
//!
//! Nodes refer to each other through 32-bit [`NodeHandle`]s into the arena. The tree keeps
//! its root, minimum and maximum in plain fields rather than a header node, and every
//! rebalancing step is written once for one side and mirrored by flipping it.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod policy;
pub mod rb_map;
pub mod rb_set;
pub mod rbtree;

pub use error::{AllocError, InsertError, InvariantViolation};
pub use policy::{Compare, First, Identity, KeyOf, Natural, Reverse};
pub use raw::{Node, NodeArena, NodeHandle, SlabArena};
pub use rb_map::RbMap;
pub use rb_set::RbSet;
pub use rbtree::{Position, RbTree};
