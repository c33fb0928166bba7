//! A read-only cursor over the nodes of an [`OSAvlSet`](crate::OSAvlSet).

use core::cmp::Ordering;
use core::fmt;

use crate::error::{Error, Result};
use crate::raw::{Handle, RawOSAvlTree};

/// A cursor that walks an [`OSAvlSet`](crate::OSAvlSet) one edge at a time.
///
/// Movement methods return `false` and leave the navigator where it was when the
/// target does not exist. Accessors fail with [`Error::InvalidNavigation`] when the
/// navigator is not positioned on a live node, which only happens for a navigator
/// created over an empty set.
///
/// The navigator borrows the set, so the set cannot be mutated while one is alive.
///
/// # Examples
///
/// ```
/// use osavl_tree::OSAvlSet;
///
/// let set = OSAvlSet::try_from_iter([10, 5, 15]).unwrap();
/// let mut nav = set.navigator();
///
/// assert_eq!(nav.key(), Ok(10));
/// assert!(nav.go_left());
/// assert_eq!(nav.key(), Ok(5));
/// assert!(!nav.go_left());
/// assert!(nav.go_parent());
/// assert_eq!(nav.subtree_size(), Ok(3));
/// ```
#[derive(Clone)]
pub struct Navigator<'a> {
    tree: &'a RawOSAvlTree,
    current: Option<Handle>,
    previous: Option<Handle>,
}

impl<'a> Navigator<'a> {
    /// Positions a navigator at the real root (or nowhere, for an empty tree).
    pub(crate) fn at_root(tree: &'a RawOSAvlTree) -> Self {
        Self {
            tree,
            current: tree.root(),
            previous: None,
        }
    }

    pub(crate) fn at(tree: &'a RawOSAvlTree, handle: Handle) -> Self {
        Self {
            tree,
            current: Some(handle).filter(|&h| tree.is_active(h)),
            previous: None,
        }
    }

    /// Descends from the root towards `key`, stopping on the node holding it or on the
    /// last node visited before an absent child slot.
    pub(crate) fn seek(tree: &'a RawOSAvlTree, key: i64) -> Self {
        let mut nav = Self::at_root(tree);
        while let Ok(current) = nav.key() {
            let moved = match key.cmp(&current) {
                Ordering::Equal => break,
                Ordering::Less => nav.go_left(),
                Ordering::Greater => nav.go_right(),
            };
            if !moved {
                break;
            }
        }
        nav
    }

    fn move_to(&mut self, target: Option<Handle>) -> bool {
        match target.filter(|&h| self.tree.is_active(h)) {
            Some(target) => {
                self.previous = self.current;
                self.current = Some(target);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the navigator is positioned on a live node.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.current.is_some_and(|h| self.tree.is_active(h))
    }

    /// The handle of the current node, if any.
    #[must_use]
    pub fn handle(&self) -> Option<Handle> {
        self.current.filter(|&h| self.tree.is_active(h))
    }

    /// The handle the navigator occupied before its last successful move.
    #[must_use]
    pub fn previous(&self) -> Option<Handle> {
        self.previous
    }

    #[must_use]
    pub fn has_left(&self) -> bool {
        self.handle().is_some_and(|h| self.tree.left_of(h).is_some())
    }

    #[must_use]
    pub fn has_right(&self) -> bool {
        self.handle().is_some_and(|h| self.tree.right_of(h).is_some())
    }

    /// Returns `true` unless the navigator is on the root (or nowhere).
    #[must_use]
    pub fn has_parent(&self) -> bool {
        self.handle().is_some_and(|h| self.tree.parent_of(h).is_some())
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.handle().is_some() && self.handle() == self.tree.root()
    }

    pub fn go_left(&mut self) -> bool {
        let target = self.handle().and_then(|h| self.tree.left_of(h));
        self.move_to(target)
    }

    pub fn go_right(&mut self) -> bool {
        let target = self.handle().and_then(|h| self.tree.right_of(h));
        self.move_to(target)
    }

    /// Moves up one level. Fails on the root: the anchor above it is not a key-bearing node.
    pub fn go_parent(&mut self) -> bool {
        let target = self.handle().and_then(|h| self.tree.parent_of(h));
        self.move_to(target)
    }

    pub fn go_root(&mut self) -> bool {
        let target = self.tree.root();
        self.move_to(target)
    }

    /// Jumps straight to `handle`, which must name a live node of the same set.
    pub fn jump_to(&mut self, handle: Handle) -> bool {
        self.move_to(Some(handle))
    }

    fn live(&self, accessor: &'static str) -> Result<Handle> {
        self.handle().ok_or(Error::navigation(accessor))
    }

    /// # Errors
    ///
    /// [`Error::InvalidNavigation`] if the navigator is not on a live node.
    pub fn key(&self) -> Result<i64> {
        let handle = self.live("Navigator::key")?;
        Ok(self.tree.key_of(Some(handle)))
    }

    /// # Errors
    ///
    /// [`Error::InvalidNavigation`] if the navigator is not on a live node.
    pub fn height(&self) -> Result<u32> {
        let handle = self.live("Navigator::height")?;
        Ok(self.tree.height_of(Some(handle)))
    }

    /// # Errors
    ///
    /// [`Error::InvalidNavigation`] if the navigator is not on a live node.
    pub fn subtree_size(&self) -> Result<usize> {
        let handle = self.live("Navigator::subtree_size")?;
        Ok(self.tree.subtree_size_of(Some(handle)))
    }

    /// Returns the parent's handle, or `None` when positioned on the root.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNavigation`] if the navigator is not on a live node.
    pub fn parent(&self) -> Result<Option<Handle>> {
        let handle = self.live("Navigator::parent")?;
        Ok(self.tree.parent_of(handle))
    }
}

impl fmt::Debug for Navigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .finish_non_exhaustive()
    }
}
