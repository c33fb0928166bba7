use alloc::vec::Vec;

use super::handle::Handle;

/// Append-only slot storage. Handles stay valid for the life of the arena and are never recycled.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<T>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX + 1
        );
        self.slots.push(element);
        Handle::from_index(self.slots.len() - 1)
    }

    /// Returns the element behind `handle`, or `None` if the handle was never allocated here.
    #[inline]
    pub(crate) fn try_get(&self, handle: Handle) -> Option<&T> {
        self.slots.get(handle.to_index())
    }

    #[inline]
    pub(crate) fn try_get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots.get_mut(handle.to_index())
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.try_get(handle).expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.try_get_mut(handle).expect("`Arena::get_mut()` - `handle` is invalid!")
    }
}
