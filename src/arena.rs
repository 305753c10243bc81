//! Slab-backed node storage addressed by XOR-able handles.
//!
//! A handle is a slab key plus one, so [`BOUNDARY`] (0) never names a live
//! node and can stand for "no neighbor" at either end of the chain.

use std::ops::{Index, IndexMut};

use slab::Slab;

/// Handle standing for the missing neighbor past either end of the chain.
pub(crate) const BOUNDARY: usize = 0;

pub(crate) struct XorNode<T> {
    pub(crate) payload: T,
    /// `handle(prev) ^ handle(next)`.
    pub(crate) link: usize,
}

pub(crate) struct Arena<T> {
    slab: Slab<XorNode<T>>,
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slab: Slab::with_capacity(capacity),
        }
    }

    /// Stores a new node and returns its handle.
    pub(crate) fn alloc(&mut self, payload: T, link: usize) -> usize {
        self.slab.insert(XorNode { payload, link }) + 1
    }

    /// Frees the slot behind `handle`. The slot may be handed out again by a
    /// later [`alloc`](Self::alloc).
    pub(crate) fn release(&mut self, handle: usize) -> T {
        debug_assert_ne!(handle, BOUNDARY);
        self.slab.remove(handle - 1).payload
    }

    #[cfg(any(test, feature = "strict_assertions"))]
    pub(crate) fn contains(&self, handle: usize) -> bool {
        handle != BOUNDARY && self.slab.contains(handle - 1)
    }

    #[cfg(any(test, feature = "strict_assertions"))]
    pub(crate) fn len(&self) -> usize {
        self.slab.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slab.capacity()
    }
}

impl<T> Index<usize> for Arena<T> {
    type Output = XorNode<T>;

    fn index(&self, handle: usize) -> &Self::Output {
        debug_assert_ne!(handle, BOUNDARY);
        &self.slab[handle - 1]
    }
}

impl<T> IndexMut<usize> for Arena<T> {
    fn index_mut(&mut self, handle: usize) -> &mut Self::Output {
        debug_assert_ne!(handle, BOUNDARY);
        &mut self.slab[handle - 1]
    }
}
