use core::fmt;

use crate::error::Result;
use crate::navigator::Navigator;
use crate::raw::{Handle, RawOSAvlTree};

mod capacity;
mod dump;
mod order_statistic;

pub use dump::{BreadthFirst, NodeInfo};

/// An ordered set of `i64` keys kept in a height-balanced (AVL) tree.
///
/// Every node caches the size of its subtree, which turns [`rank`](OSAvlSet::rank) and
/// [`count_in_range`](OSAvlSet::count_in_range) into single root-to-leaf walks.
///
/// Keys cannot be removed. Each inserted key receives a [`Handle`] that stays valid for
/// the life of the set and can be used with [`navigator_at`](OSAvlSet::navigator_at).
///
/// # Examples
///
/// ```
/// use osavl_tree::OSAvlSet;
///
/// let mut set = OSAvlSet::new();
/// set.insert(10).unwrap();
/// set.insert(20).unwrap();
///
/// assert_eq!(set.count_in_range(8, 31), 2);
/// assert_eq!(set.count_in_range(6, 9), 0);
///
/// set.insert(30).unwrap();
/// set.insert(40).unwrap();
/// assert_eq!(set.count_in_range(15, 40), 3);
/// ```
#[derive(Clone)]
pub struct OSAvlSet {
    tree: RawOSAvlTree,
}

impl OSAvlSet {
    /// Makes a new, empty `OSAvlSet`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: RawOSAvlTree::new(),
        }
    }

    /// Builds a set from `keys`, stopping at the first structural error.
    ///
    /// # Errors
    ///
    /// Propagates any [`Error::InvalidStructure`](crate::Error::InvalidStructure) raised by
    /// [`insert`](OSAvlSet::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter([3, 1, 2, 3]).unwrap();
    /// assert_eq!(set.len(), 3);
    /// ```
    pub fn try_from_iter<I: IntoIterator<Item = i64>>(keys: I) -> Result<Self> {
        let mut set = Self::new();
        set.try_extend(keys)?;
        Ok(set)
    }

    /// Inserts every key from `keys`, stopping at the first structural error.
    ///
    /// # Errors
    ///
    /// Propagates any [`Error::InvalidStructure`](crate::Error::InvalidStructure) raised by
    /// [`insert`](OSAvlSet::insert).
    pub fn try_extend<I: IntoIterator<Item = i64>>(&mut self, keys: I) -> Result<()> {
        for key in keys {
            self.insert(key)?;
        }
        Ok(())
    }

    /// Adds a key to the set.
    ///
    /// Returns whether the key was newly inserted. Inserting a key that is already
    /// present leaves the set untouched and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidStructure`](crate::Error::InvalidStructure) if rebalancing finds the
    /// tree's links inconsistent. This indicates a bug, not a recoverable condition.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let mut set = OSAvlSet::new();
    /// assert_eq!(set.insert(2), Ok(true));
    /// assert_eq!(set.insert(2), Ok(false));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: i64) -> Result<bool> {
        self.tree.insert(key)
    }

    /// Returns `true` if the set contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter([1, 2, 3]).unwrap();
    /// assert!(set.contains(1));
    /// assert!(!set.contains(4));
    /// ```
    #[must_use]
    pub fn contains(&self, key: i64) -> bool {
        Navigator::seek(&self.tree, key).key() == Ok(key)
    }

    /// Returns the number of keys in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the set contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single key.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter(1..=7).unwrap();
    /// assert_eq!(set.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> u32 {
        self.tree.height_of(self.tree.root())
    }

    /// Returns a navigator positioned at the root.
    ///
    /// On an empty set the navigator is not positioned on any node.
    #[must_use]
    pub fn navigator(&self) -> Navigator<'_> {
        Navigator::at_root(&self.tree)
    }

    /// Returns a navigator positioned on the node named by `handle`.
    ///
    /// If `handle` does not name a node of this set the navigator starts out invalid.
    #[must_use]
    pub fn navigator_at(&self, handle: Handle) -> Navigator<'_> {
        Navigator::at(&self.tree, handle)
    }
}

impl Default for OSAvlSet {
    /// Creates an empty `OSAvlSet`.
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OSAvlSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OSAvlSet")
            .field("len", &self.len())
            .field("tree", &format_args!("{self}"))
            .finish()
    }
}
