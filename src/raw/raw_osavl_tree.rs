use core::cmp::max;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;
use crate::error::{Error, Result};
use crate::navigator::Navigator;

/// The AVL tree backing `OSAvlSet`.
///
/// Slot zero of the arena is a sentinel whose left child is the real root. Because the
/// root always has a parent, rotations and attachments at the top of the tree go through
/// the same `replace_child` path as everywhere else.
#[derive(Clone)]
pub(crate) struct RawOSAvlTree {
    /// Arena storing the sentinel followed by every inserted node.
    nodes: Arena<Node>,
    /// Number of key-bearing nodes.
    len: usize,
}

impl RawOSAvlTree {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new tree with room for `capacity` keys.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.saturating_add(1));
        let sentinel = nodes.alloc(Node::sentinel());
        debug_assert_eq!(sentinel, Handle::SENTINEL);
        Self { nodes, len: 0 }
    }

    /// Returns the number of keys in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of keys the tree can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().saturating_sub(1)
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Returns the real root, if the tree is non-empty.
    pub(crate) fn root(&self) -> Option<Handle> {
        self.nodes.get(Handle::SENTINEL).left
    }

    // ─── Node storage ───────────────────────────────────────────────────────────

    /// Returns `true` if `handle` names an allocated, key-bearing node.
    pub(crate) fn is_active(&self, handle: Handle) -> bool {
        self.nodes.try_get(handle).is_some_and(Node::is_active)
    }

    /// Returns the node behind `handle` if it is active.
    pub(crate) fn node(&self, handle: Handle) -> Option<&Node> {
        self.nodes.try_get(handle).filter(|node| node.is_active())
    }

    pub(crate) fn key_of(&self, handle: Option<Handle>) -> i64 {
        handle.and_then(|h| self.node(h)).map_or(0, Node::key)
    }

    pub(crate) fn height_of(&self, handle: Option<Handle>) -> u32 {
        handle.and_then(|h| self.node(h)).map_or(0, Node::height)
    }

    pub(crate) fn subtree_size_of(&self, handle: Option<Handle>) -> usize {
        handle.and_then(|h| self.node(h)).map_or(0, Node::subtree_size)
    }

    pub(crate) fn left_of(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.left)
    }

    pub(crate) fn right_of(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.right)
    }

    /// Returns the parent of `handle`, hiding the sentinel above the real root.
    pub(crate) fn parent_of(&self, handle: Handle) -> Option<Handle> {
        self.node(handle).and_then(|node| node.parent).filter(|parent| !parent.is_sentinel())
    }

    /// Points whichever child slot of `parent` holds `old_child` at `new_child` instead.
    ///
    /// `parent` may be the sentinel.
    pub(crate) fn replace_child(&mut self, old_child: Handle, new_child: Handle, parent: Handle) -> Result<()> {
        if !parent.is_sentinel() && !self.is_active(parent) {
            return Err(Error::structure("replace_child: parent is inactive"));
        }
        let parent = self.nodes.get_mut(parent);
        if parent.left == Some(old_child) {
            parent.left = Some(new_child);
        } else if parent.right == Some(old_child) {
            parent.right = Some(new_child);
        } else {
            return Err(Error::structure("replace_child: parent does not own the child"));
        }
        Ok(())
    }

    // ─── Balance / rotation ─────────────────────────────────────────────────────

    /// Recomputes height and subtree size of `handle` from its children.
    pub(crate) fn refresh(&mut self, handle: Handle) {
        let Some(node) = self.node(handle) else {
            return;
        };
        let (left, right) = (node.left, node.right);
        let height = max(self.height_of(left), self.height_of(right)) + 1;
        let subtree_size = self.subtree_size_of(left) + self.subtree_size_of(right) + 1;
        self.nodes.get_mut(handle).set_metadata(height, subtree_size);
    }

    /// Height of the left subtree minus height of the right subtree.
    pub(crate) fn balance_factor(&self, handle: Handle) -> i64 {
        let Some(node) = self.node(handle) else {
            return 0;
        };
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    /// Promotes the left child `a` of `b`, returning `a` as the new local root.
    ///
    /// ```text
    ///         b            a
    ///        / \          / \
    ///       a   z  =>    x   b
    ///      / \              / \
    ///     x   c            c   z
    /// ```
    pub(crate) fn rotate_right(&mut self, b: Handle) -> Result<Handle> {
        if !self.is_active(b) {
            return Err(Error::structure("rotate_right: local root is inactive"));
        }
        let a = self
            .left_of(b)
            .filter(|&a| self.is_active(a))
            .ok_or(Error::structure("rotate_right: left child of local root is inactive"))?;
        let grandparent = self.nodes.get(b).parent.ok_or(Error::structure("rotate_right: local root has no parent"))?;
        let c = self.nodes.get(a).right;

        #[cfg(feature = "tracing")]
        tracing::trace!(?b, ?a, ?c, ?grandparent, "rotate_right");

        // Hook `a` into the grandparent first so a mismatch leaves the tree untouched.
        self.replace_child(b, a, grandparent)?;

        let node_a = self.nodes.get_mut(a);
        node_a.right = Some(b);
        node_a.parent = Some(grandparent);

        let node_b = self.nodes.get_mut(b);
        node_b.left = c;
        node_b.parent = Some(a);

        if let Some(c) = c {
            self.nodes.get_mut(c).parent = Some(b);
        }

        // `b` is now below `a`.
        self.refresh(b);
        self.refresh(a);

        Ok(a)
    }

    /// Mirror image of [`rotate_right`](Self::rotate_right): promotes the right child `b` of `a`.
    pub(crate) fn rotate_left(&mut self, a: Handle) -> Result<Handle> {
        if !self.is_active(a) {
            return Err(Error::structure("rotate_left: local root is inactive"));
        }
        let b = self
            .right_of(a)
            .filter(|&b| self.is_active(b))
            .ok_or(Error::structure("rotate_left: right child of local root is inactive"))?;
        let grandparent = self.nodes.get(a).parent.ok_or(Error::structure("rotate_left: local root has no parent"))?;
        let c = self.nodes.get(b).left;

        #[cfg(feature = "tracing")]
        tracing::trace!(?a, ?b, ?c, ?grandparent, "rotate_left");

        self.replace_child(a, b, grandparent)?;

        let node_b = self.nodes.get_mut(b);
        node_b.left = Some(a);
        node_b.parent = Some(grandparent);

        let node_a = self.nodes.get_mut(a);
        node_a.right = c;
        node_a.parent = Some(b);

        if let Some(c) = c {
            self.nodes.get_mut(c).parent = Some(a);
        }

        self.refresh(a);
        self.refresh(b);

        Ok(b)
    }

    /// Refreshes `handle` after `inserted_key` landed somewhere below it and applies at most
    /// one of the four AVL repairs. Returns whichever node now roots this subtree.
    pub(crate) fn rebalance_after_insert(&mut self, handle: Handle, inserted_key: i64) -> Result<Handle> {
        if !self.is_active(handle) {
            return Err(Error::structure("rebalance_after_insert: node is not key-bearing"));
        }

        self.refresh(handle);
        let balance = self.balance_factor(handle);

        if balance > 1 {
            let left = self.left_of(handle).ok_or(Error::structure("rebalance_after_insert: left-heavy node has no left child"))?;
            if inserted_key < self.key_of(Some(left)) {
                #[cfg(feature = "tracing")]
                tracing::debug!(?handle, balance, "rebalance LL");
                self.rotate_right(handle)
            } else {
                #[cfg(feature = "tracing")]
                tracing::debug!(?handle, balance, "rebalance LR");
                self.rotate_left(left)?;
                self.rotate_right(handle)
            }
        } else if balance < -1 {
            let right = self.right_of(handle).ok_or(Error::structure("rebalance_after_insert: right-heavy node has no right child"))?;
            if inserted_key > self.key_of(Some(right)) {
                #[cfg(feature = "tracing")]
                tracing::debug!(?handle, balance, "rebalance RR");
                self.rotate_left(handle)
            } else {
                #[cfg(feature = "tracing")]
                tracing::debug!(?handle, balance, "rebalance RL");
                self.rotate_right(right)?;
                self.rotate_left(handle)
            }
        } else {
            Ok(handle)
        }
    }

    // ─── Insertion ──────────────────────────────────────────────────────────────

    /// Inserts `key`, returning `false` if it was already present.
    pub(crate) fn insert(&mut self, key: i64) -> Result<bool> {
        let (stop, found) = {
            let nav = Navigator::seek(self, key);
            (nav.handle(), nav.key() == Ok(key))
        };

        let Some(parent) = stop else {
            if self.len != 0 {
                return Err(Error::structure("insert: descent left a non-empty tree"));
            }
            let root = self.nodes.alloc(Node::leaf(key, Handle::SENTINEL));
            self.nodes.get_mut(Handle::SENTINEL).left = Some(root);
            self.len += 1;

            #[cfg(feature = "tracing")]
            tracing::trace!(key, ?root, "insert: created root");
            return Ok(true);
        };

        if found {
            #[cfg(feature = "tracing")]
            tracing::trace!(key, "insert: key already present");
            return Ok(false);
        }

        let _child = self.attach(parent, key)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(key, ?parent, child = ?_child, "insert: attached");

        // Only the ancestors of the new leaf changed shape.
        let mut current = Some(parent);
        while let Some(handle) = current.filter(|h| !h.is_sentinel()) {
            let local_root = self.rebalance_after_insert(handle, key)?;
            current = self.nodes.get(local_root).parent;
        }

        debug_assert_eq!(self.nodes.len(), self.len + 1);
        Ok(true)
    }

    /// Hangs a new leaf for `key` below `parent` on the side `key` orders into.
    fn attach(&mut self, parent: Handle, key: i64) -> Result<Handle> {
        let go_left = key < self.key_of(Some(parent));
        let slot = if go_left { self.left_of(parent) } else { self.right_of(parent) };
        if slot.is_some() {
            return Err(Error::structure("attach: target child slot is occupied"));
        }

        let child = self.nodes.alloc(Node::leaf(key, parent));
        let node = self.nodes.get_mut(parent);
        if go_left {
            node.left = Some(child);
        } else {
            node.right = Some(child);
        }
        self.len += 1;
        self.refresh(parent);

        Ok(child)
    }

    // ─── Queries ────────────────────────────────────────────────────────────────

    /// Counts keys `<= x`.
    ///
    /// Whenever a node qualifies its whole left subtree does too, so each level adds a
    /// cached subtree size instead of visiting the matches.
    pub(crate) fn rank(&self, x: i64) -> usize {
        let mut count = 0;
        let mut current = self.root();
        while let Some(node) = current.and_then(|h| self.node(h)) {
            if node.key() > x {
                current = node.left;
            } else {
                count += 1 + self.subtree_size_of(node.left);
                current = node.right;
            }
        }
        count
    }

    /// `rank(b) - rank(a - 1)`, or 0 for an inverted range.
    pub(crate) fn count_in_range(&self, a: i64, b: i64) -> usize {
        if a > b {
            return 0;
        }
        let below = a.checked_sub(1).map_or(0, |a| self.rank(a));
        self.rank(b) - below
    }
}

#[cfg(test)]
impl RawOSAvlTree {
    /// Recomputes every cached field from scratch and checks it against the tree.
    pub(crate) fn validate_invariants(&self) {
        let sentinel = self.nodes.get(Handle::SENTINEL);
        assert!(!sentinel.is_active(), "sentinel must not be key-bearing");
        assert_eq!(sentinel.right, None, "sentinel only anchors through its left slot");
        if let Some(root) = self.root() {
            assert_eq!(self.nodes.get(root).parent, Some(Handle::SENTINEL), "root must hang off the sentinel");
        }
        let (_, size) = self.validate_subtree(self.root(), None, None);
        assert_eq!(size, self.len, "len disagrees with the node count");
        assert_eq!(self.nodes.len(), self.len + 1, "every allocated slot must be reachable");
    }

    fn validate_subtree(&self, handle: Option<Handle>, lower: Option<i64>, upper: Option<i64>) -> (u32, usize) {
        let Some(handle) = handle else {
            return (0, 0);
        };
        let node = self.node(handle).expect("child handle must be active");
        let key = node.key();
        assert!(lower.is_none_or(|lower| key > lower), "key {key} breaks the search order");
        assert!(upper.is_none_or(|upper| key < upper), "key {key} breaks the search order");

        for child in [node.left, node.right].into_iter().flatten() {
            assert_eq!(self.nodes.get(child).parent, Some(handle), "child of {key} has a stale parent link");
        }

        let (left_height, left_size) = self.validate_subtree(node.left, lower, Some(key));
        let (right_height, right_size) = self.validate_subtree(node.right, Some(key), upper);

        assert!(left_height.abs_diff(right_height) <= 1, "node {key} is out of balance");
        let height = max(left_height, right_height) + 1;
        let size = left_size + right_size + 1;
        assert_eq!(node.height(), height, "cached height of {key} is stale");
        assert_eq!(node.subtree_size(), size, "cached subtree size of {key} is stale");

        (height, size)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeSet;
    use proptest::prelude::*;

    fn tree_of(keys: &[i64]) -> RawOSAvlTree {
        let mut tree = RawOSAvlTree::new();
        for &key in keys {
            tree.insert(key).unwrap();
            tree.validate_invariants();
        }
        tree
    }

    fn root_key(tree: &RawOSAvlTree) -> i64 {
        tree.key_of(tree.root())
    }

    #[test]
    fn empty_tree() {
        let tree = RawOSAvlTree::new();
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.root(), None);
        assert_eq!(tree.rank(0), 0);
        assert_eq!(tree.rank(i64::MAX), 0);
        assert_eq!(tree.count_in_range(0, 10), 0);
    }

    #[test]
    fn neutral_accessors_for_absent_nodes() {
        let tree = tree_of(&[1]);
        for handle in [None, Some(Handle::SENTINEL), Some(Handle::from_index(42))] {
            assert_eq!(tree.key_of(handle), 0);
            assert_eq!(tree.height_of(handle), 0);
            assert_eq!(tree.subtree_size_of(handle), 0);
        }
        assert!(!tree.is_active(Handle::SENTINEL));
        assert!(!tree.is_active(Handle::from_index(42)));
        assert!(tree.is_active(Handle::from_index(1)));
        assert_eq!(tree.balance_factor(Handle::SENTINEL), 0);
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut tree = tree_of(&[10, 20, 30]);
        assert_eq!(tree.insert(20), Ok(false));
        tree.validate_invariants();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.nodes.len(), 4);
    }

    #[test]
    fn single_rotation_cases() {
        // RR: ascending keys promote the middle one.
        let tree = tree_of(&[1, 2, 3]);
        assert_eq!(root_key(&tree), 2);

        // LL: descending keys do the same from the other side.
        let tree = tree_of(&[3, 2, 1]);
        assert_eq!(root_key(&tree), 2);
    }

    #[test]
    fn double_rotation_cases() {
        // LR: the inserted key falls right of the heavy child's key.
        let tree = tree_of(&[30, 10, 20]);
        assert_eq!(root_key(&tree), 20);
        assert_eq!(tree.key_of(tree.left_of(tree.root().unwrap())), 10);

        // RL: the mirror.
        let tree = tree_of(&[10, 30, 20]);
        assert_eq!(root_key(&tree), 20);
        assert_eq!(tree.key_of(tree.right_of(tree.root().unwrap())), 30);
    }

    #[test]
    fn rotation_below_the_root_rewires_the_grandparent() {
        let tree = tree_of(&[50, 25, 75, 10, 5]);
        let root = tree.root().unwrap();
        assert_eq!(root_key(&tree), 50);
        let left = tree.left_of(root);
        assert_eq!(tree.key_of(left), 10);
        assert_eq!(tree.parent_of(left.unwrap()), Some(root));
        assert_eq!(tree.subtree_size_of(left), 3);
    }

    #[test]
    fn rank_counts_keys_at_or_below() {
        let tree = tree_of(&[10, 5, 15]);
        assert_eq!(tree.rank(4), 0);
        assert_eq!(tree.rank(5), 1);
        assert_eq!(tree.rank(10), 2);
        assert_eq!(tree.rank(16), 3);
    }

    #[test]
    fn count_in_range_scenario() {
        let mut tree = tree_of(&[10, 20]);
        assert_eq!(tree.count_in_range(8, 31), 2);
        assert_eq!(tree.count_in_range(6, 9), 0);

        tree.insert(30).unwrap();
        tree.insert(40).unwrap();
        assert_eq!(tree.count_in_range(15, 40), 3);
        assert_eq!(tree.count_in_range(40, 15), 0);
    }

    #[test]
    fn count_in_range_at_integer_limits() {
        let tree = tree_of(&[i64::MIN, 0, i64::MAX]);
        assert_eq!(tree.count_in_range(i64::MIN, i64::MAX), 3);
        assert_eq!(tree.count_in_range(i64::MIN, i64::MIN), 1);
        assert_eq!(tree.count_in_range(i64::MAX, i64::MAX), 1);
        assert_eq!(tree.rank(i64::MAX), 3);
    }

    #[test]
    fn rotations_reject_missing_nodes() {
        let mut tree = tree_of(&[10, 20]);
        let root = tree.root().unwrap();

        assert_eq!(tree.rotate_right(Handle::SENTINEL), Err(Error::structure("rotate_right: local root is inactive")));
        assert_eq!(tree.rotate_left(Handle::from_index(9)), Err(Error::structure("rotate_left: local root is inactive")));
        assert_eq!(tree.rotate_right(root), Err(Error::structure("rotate_right: left child of local root is inactive")));
        let leaf = tree.right_of(root).unwrap();
        assert_eq!(tree.rotate_left(leaf), Err(Error::structure("rotate_left: right child of local root is inactive")));
        assert!(tree.rebalance_after_insert(Handle::SENTINEL, 0).is_err());
        tree.validate_invariants();
    }

    #[test]
    fn replace_child_requires_ownership() {
        let mut tree = tree_of(&[10, 5, 15]);
        let root = tree.root().unwrap();
        let left = tree.left_of(root).unwrap();
        let right = tree.right_of(root).unwrap();

        assert_eq!(
            tree.replace_child(right, left, left),
            Err(Error::structure("replace_child: parent does not own the child"))
        );
        assert_eq!(
            tree.replace_child(left, right, Handle::from_index(77)),
            Err(Error::structure("replace_child: parent is inactive"))
        );
        tree.validate_invariants();
    }

    #[test]
    fn manual_rotation_round_trip() {
        let mut tree = tree_of(&[20, 10, 30]);
        let root = tree.root().unwrap();

        let new_root = tree.rotate_right(root).unwrap();
        assert_eq!(tree.root(), Some(new_root));
        assert_eq!(tree.key_of(Some(new_root)), 10);
        assert_eq!(tree.height_of(Some(new_root)), 3);
        assert_eq!(tree.subtree_size_of(Some(new_root)), 3);
        assert_eq!(tree.balance_factor(new_root), -2);

        let back = tree.rotate_left(new_root).unwrap();
        assert_eq!(back, root);
        tree.validate_invariants();
    }

    #[test]
    fn with_capacity_reserves_key_slots() {
        let mut tree = RawOSAvlTree::with_capacity(32);
        assert!(tree.capacity() >= 32);
        tree.reserve(100);
        assert!(tree.capacity() >= 100);
        tree.validate_invariants();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_inserts(keys in prop::collection::vec(-500i64..500, 0..400)) {
            let mut tree = RawOSAvlTree::new();
            let mut model = BTreeSet::new();

            for key in keys {
                prop_assert_eq!(tree.insert(key), Ok(model.insert(key)));
                tree.validate_invariants();
            }
            prop_assert_eq!(tree.len(), model.len());
        }

        #[test]
        fn height_stays_logarithmic(count in 1usize..2000) {
            let mut tree = RawOSAvlTree::new();
            for key in 0..count as i64 {
                tree.insert(key).unwrap();
            }
            let height = tree.height_of(tree.root());

            // The sparsest AVL tree of height h holds fib-like N(h) = N(h-1) + N(h-2) + 1 nodes.
            let (mut sparsest, mut previous) = (1usize, 0usize);
            for _ in 1..height {
                (sparsest, previous) = (sparsest + previous + 1, sparsest);
            }
            prop_assert!(count >= sparsest, "height {} is too tall for {} keys", height, count);
        }

        #[test]
        fn rank_matches_model(keys in prop::collection::vec(-300i64..300, 0..300), probes in prop::collection::vec(-350i64..350, 1..50)) {
            let mut tree = RawOSAvlTree::new();
            let mut model = BTreeSet::new();
            for key in keys {
                tree.insert(key).unwrap();
                model.insert(key);
            }

            for x in probes {
                prop_assert_eq!(tree.rank(x), model.range(..=x).count(), "rank({})", x);
            }
        }
    }
}
