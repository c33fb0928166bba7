use core::fmt;
use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A stable reference to a node slot inside an [`OSAvlSet`](crate::OSAvlSet).
///
/// Handles are never reused: once a key is inserted its handle keeps naming the
/// same node for the lifetime of the set, even as rotations move the node around.
/// `Option<Handle>` is the same size as `Handle` and is used for absent children.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// The anchor slot whose left child is the real root.
    pub(crate) const SENTINEL: Self = Self::from_index(0);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        let raw = (index + 1) as RawHandle;
        match NonZero::new(raw) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// Returns the arena slot this handle names.
    #[must_use]
    pub const fn index(self) -> usize {
        self.to_index()
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.to_index() == 0
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            f.write_str("Handle(sentinel)")
        } else {
            write!(f, "Handle({})", self.to_index())
        }
    }
}
