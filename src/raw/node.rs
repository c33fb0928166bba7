use super::handle::Handle;

/// One slot of the arena.
///
/// The sentinel occupies slot zero with `active == false`; every other slot holds a key.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    key: i64,
    // Longest path to a leaf, counting this node. Leaves have height 1.
    height: u32,
    // Live nodes in this subtree, including this one.
    subtree_size: usize,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // `Some(Handle::SENTINEL)` for the real root, `None` only for the sentinel itself.
    pub(crate) parent: Option<Handle>,
    active: bool,
}

impl Node {
    /// Creates a fresh leaf hanging below `parent`.
    pub(crate) const fn leaf(key: i64, parent: Handle) -> Self {
        Self {
            key,
            height: 1,
            subtree_size: 1,
            left: None,
            right: None,
            parent: Some(parent),
            active: true,
        }
    }

    /// Creates the anchor node. It carries no key and never takes part in balancing.
    pub(crate) const fn sentinel() -> Self {
        Self {
            key: 0,
            height: 0,
            subtree_size: 0,
            left: None,
            right: None,
            parent: None,
            active: false,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> i64 {
        self.key
    }

    #[inline]
    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) const fn subtree_size(&self) -> usize {
        self.subtree_size
    }

    #[inline]
    pub(crate) const fn is_active(&self) -> bool {
        self.active
    }

    /// Overwrites the cached metadata. Callers compute both values from the children.
    pub(crate) fn set_metadata(&mut self, height: u32, subtree_size: usize) {
        self.height = height;
        self.subtree_size = subtree_size;
    }
}
