use super::OSAvlSet;

impl OSAvlSet {
    /// Returns the number of keys less than or equal to `x`.
    ///
    /// # Complexity
    ///
    /// O(log n), independent of how many keys qualify.
    ///
    /// # Examples
    ///
    /// ```
    /// use osavl_tree::OSAvlSet;
    ///
    /// let set = OSAvlSet::try_from_iter([10, 5, 15]).unwrap();
    /// assert_eq!(set.rank(4), 0);
    /// assert_eq!(set.rank(10), 2);
    /// assert_eq!(set.rank(16), 3);
    /// ```
    #[must_use]
    pub fn rank(&self, x: i64) -> usize {
        self.tree.rank(x)
    }

    /// Returns `rank(b) - rank(a - 1)`: the number of keys `k` with `a <= k <= b`.
    ///
    /// An inverted range (`a > b`) is empty and yields 0 without touching the tree.
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
    /// let set = OSAvlSet::try_from_iter([10, 20, 30, 40]).unwrap();
    /// assert_eq!(set.count_in_range(15, 40), 3);
    /// assert_eq!(set.count_in_range(20, 30), 2);
    /// assert_eq!(set.count_in_range(31, 39), 0);
    /// assert_eq!(set.count_in_range(40, 10), 0);
    /// ```
    #[must_use]
    pub fn count_in_range(&self, a: i64, b: i64) -> usize {
        self.tree.count_in_range(a, b)
    }
}
