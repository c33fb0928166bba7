//! Order-statistic AVL tree for Rust.
//!
//! This crate provides [`OSAvlSet`], a set of `i64` keys stored in a height-balanced binary
//! search tree whose nodes also track the size of their subtree. That extra bookkeeping
//! answers two questions in O(log n):
//!
//! - [`rank`](OSAvlSet::rank) - how many keys are `<= x`
//! - [`count_in_range`](OSAvlSet::count_in_range) - how many keys fall in `a..=b`
//!
//! # Example
//!
//! ```
//! use osavl_tree::OSAvlSet;
//!
//! let mut set = OSAvlSet::new();
//! for key in [10, 5, 15] {
//!     set.insert(key).unwrap();
//! }
//!
//! assert_eq!(set.rank(10), 2); // 5 and 10
//! assert_eq!(set.rank(16), 3);
//! assert_eq!(set.count_in_range(6, 15), 2);
//!
//! // Walk the structure directly.
//! let mut nav = set.navigator();
//! assert_eq!(nav.key(), Ok(10));
//! assert!(nav.go_right());
//! assert_eq!(nav.key(), Ok(15));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Stable handles** - Nodes live in a single arena and never move or get recycled
//! - **`tracing`** (optional) - Emits `trace`/`debug` events for insertion and every rotation
//!
//! # Implementation
//!
//! Nodes are stored in one growable arena and refer to each other by [`Handle`], never by
//! pointer, so parent links cost nothing in terms of ownership. A permanent sentinel node
//! sits above the root; the root is simply the sentinel's left child, which lets rotations
//! at the top of the tree use the same re-linking code as rotations anywhere else.
//!
//! Keys cannot be removed.

#![no_std]
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

pub mod command;
pub mod navigator;
pub mod osavl_set;

pub use error::{Error, Result};
pub use navigator::Navigator;
pub use osavl_set::{BreadthFirst, NodeInfo, OSAvlSet};
pub use raw::Handle;
