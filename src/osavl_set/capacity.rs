use super::OSAvlSet;
use crate::raw::RawOSAvlTree;

impl OSAvlSet {
    /// Creates an empty set with room for at least `capacity` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::with_capacity(16);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 16);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OSAvlSet {
            tree: RawOSAvlTree::with_capacity(capacity),
        }
    }

    /// Returns how many keys the set can hold before it reallocates.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Reserves room for at least `additional` more keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let mut set = OSAvlSet::new();
    /// set.reserve(100);
    /// assert!(set.capacity() >= 100);
    /// ```
    pub fn reserve(&mut self, additional: usize) {
        self.tree.reserve(additional);
    }
}
