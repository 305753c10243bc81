//! A positional sequence whose nodes keep a single link word each: the XOR
//! of their neighbors' handles.
//!
//! Walking the chain only needs the handle of the node just left behind:
//! `next = link ^ prev`. Starting at either end with the boundary handle (0)
//! as `prev` walks the whole chain in that direction.
//!
//! ```
//! use xor_sequence::{Error, XorSequence};
//!
//! let mut seq = XorSequence::new();
//! seq.push_back(1);
//! seq.push_back(2);
//! seq.push_front(0);
//! seq.insert(9, 2).unwrap();
//! assert_eq!(Ok(&9), seq.at(2));
//! assert_eq!(Ok(2), seq.pop_back());
//! assert_eq!(Err(Error::OutOfRange { index: 5, size: 3 }), seq.erase(5));
//! ```

mod arena;
mod error;

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use tracing::{debug, trace};

use crate::arena::{Arena, BOUNDARY};
pub use crate::error::{Error, Result};

#[inline(always)]
fn xor_next_handle(link: usize, other: usize) -> usize {
    link ^ other
}

/// Swaps the neighbor `old` for `new` in the link of `handle`.
#[inline(always)]
fn relink<T>(nodes: &mut Arena<T>, handle: usize, old: usize, new: usize) {
    let link = xor_next_handle(nodes[handle].link, old);
    nodes[handle].link = xor_next_handle(link, new);
}

fn rejected(op: &'static str, err: Error) -> Error {
    debug!(op, %err, "xor sequence operation rejected");
    err
}

/// Bidirectional sequence storing one XOR-ed link per node.
///
/// Elements are reached by position; indexed access walks the chain from the
/// front and costs O(index).
pub struct XorSequence<T> {
    size: usize,
    start: usize,
    end: usize,
    nodes: Arena<T>,
}

impl<T> Default for XorSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> XorSequence<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty sequence with room for `capacity` nodes before the
    /// node storage has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            size: 0,
            start: BOUNDARY,
            end: BOUNDARY,
            nodes: Arena::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of nodes the sequence can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub fn front(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(rejected("front", Error::EmptyContainer));
        }
        Ok(&self.nodes[self.start].payload)
    }

    pub fn back(&self) -> Result<&T> {
        if self.is_empty() {
            return Err(rejected("back", Error::EmptyContainer));
        }
        Ok(&self.nodes[self.end].payload)
    }

    pub fn front_mut(&mut self) -> Result<&mut T> {
        if self.is_empty() {
            return Err(rejected("front_mut", Error::EmptyContainer));
        }
        Ok(&mut self.nodes[self.start].payload)
    }

    pub fn back_mut(&mut self) -> Result<&mut T> {
        if self.is_empty() {
            return Err(rejected("back_mut", Error::EmptyContainer));
        }
        Ok(&mut self.nodes[self.end].payload)
    }

    /// Returns the element at `index`, counting from the front.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.check_index("at", index)?;
        let (_, curr) = self.walk(self.start, index);
        Ok(&self.nodes[curr].payload)
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        self.check_index("at_mut", index)?;
        let (_, curr) = self.walk(self.start, index);
        Ok(&mut self.nodes[curr].payload)
    }

    /// Pushes onto the `near` end. `far` only changes when the sequence was
    /// empty.
    fn push_end(far: &mut usize, near: &mut usize, nodes: &mut Arena<T>, value: T) {
        if *near == BOUNDARY {
            debug_assert_eq!(*far, BOUNDARY);
            let node = nodes.alloc(value, BOUNDARY);
            *far = node;
            *near = node;
        } else {
            // the new end has a single neighbor, so its link is that handle
            let node = nodes.alloc(value, *near);
            relink(nodes, *near, BOUNDARY, node);
            *near = node;
        }
    }

    pub fn push_back(&mut self, value: T) {
        Self::push_end(&mut self.start, &mut self.end, &mut self.nodes, value);
        self.size += 1;
        self.check();
    }

    pub fn push_front(&mut self, value: T) {
        Self::push_end(&mut self.end, &mut self.start, &mut self.nodes, value);
        self.size += 1;
        self.check();
    }

    /// Inserts `value` so that it ends up at `index`. `index == len()`
    /// appends.
    pub fn insert(&mut self, value: T, index: usize) -> Result<()> {
        if index > self.size {
            return Err(rejected(
                "insert",
                Error::OutOfRange {
                    index,
                    size: self.size,
                },
            ));
        }
        if index == 0 {
            self.push_front(value);
            return Ok(());
        }
        if index == self.size {
            self.push_back(value);
            return Ok(());
        }

        let (prev, curr) = self.walk(self.start, index);
        let node = self.nodes.alloc(value, xor_next_handle(prev, curr));
        relink(&mut self.nodes, prev, curr, node);
        relink(&mut self.nodes, curr, prev, node);
        self.size += 1;

        trace!(index, len = self.size, "spliced node into xor sequence");
        self.check();
        Ok(())
    }

    /// Pops from the `near` end.
    fn pop_end(near: &mut usize, far: &mut usize, nodes: &mut Arena<T>) -> Option<T> {
        if *near == BOUNDARY {
            debug_assert_eq!(*far, BOUNDARY);
            return None;
        }
        let old = *near;
        // an end node's link is the handle of its only neighbor
        let neighbor = nodes[old].link;
        if neighbor == BOUNDARY {
            debug_assert_eq!(*far, old);
            *far = BOUNDARY;
        } else {
            relink(nodes, neighbor, old, BOUNDARY);
        }
        *near = neighbor;
        Some(nodes.release(old))
    }

    pub fn pop_front(&mut self) -> Result<T> {
        let Some(value) = Self::pop_end(&mut self.start, &mut self.end, &mut self.nodes) else {
            return Err(rejected("pop_front", Error::EmptyContainer));
        };
        self.shrink();
        Ok(value)
    }

    pub fn pop_back(&mut self) -> Result<T> {
        let Some(value) = Self::pop_end(&mut self.end, &mut self.start, &mut self.nodes) else {
            return Err(rejected("pop_back", Error::EmptyContainer));
        };
        self.shrink();
        Ok(value)
    }

    /// Removes and returns the element at `index`.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        self.check_index("erase", index)?;
        if index == 0 {
            return self.pop_front();
        }
        if index == self.size - 1 {
            return self.pop_back();
        }

        let (prev, curr) = self.walk(self.start, index);
        let (_, next) = self.step(prev, curr);
        relink(&mut self.nodes, prev, curr, next);
        relink(&mut self.nodes, next, curr, prev);
        let value = self.nodes.release(curr);
        self.shrink();

        trace!(index, len = self.size, "unlinked node from xor sequence");
        Ok(value)
    }

    /// Drops every element, one node at a time from the back.
    pub fn clear(&mut self) {
        let removed = self.size;
        while Self::pop_end(&mut self.end, &mut self.start, &mut self.nodes).is_some() {
            self.size -= 1;
        }
        self.start = BOUNDARY;
        self.end = BOUNDARY;

        if removed > 0 {
            trace!(removed, "cleared xor sequence");
        }
        self.check();
    }

    fn check_index(&self, op: &'static str, index: usize) -> Result<()> {
        if index >= self.size {
            return Err(rejected(
                op,
                Error::OutOfRange {
                    index,
                    size: self.size,
                },
            ));
        }
        Ok(())
    }

    fn shrink(&mut self) {
        self.size -= 1;
        if self.size == 0 {
            self.start = BOUNDARY;
            self.end = BOUNDARY;
        }
        self.check();
    }

    /// Takes `steps` steps from the `from` end and returns `(prev, curr)`,
    /// where `prev` is [`BOUNDARY`] if no step was taken.
    fn walk(&self, from: usize, steps: usize) -> (usize, usize) {
        let mut prev = BOUNDARY;
        let mut curr = from;
        for _ in 0..steps {
            (prev, curr) = self.step(prev, curr);
        }
        (prev, curr)
    }

    /// Moves one node on from `curr`, having arrived from `prev`.
    #[inline]
    fn step(&self, prev: usize, curr: usize) -> (usize, usize) {
        (curr, xor_next_handle(self.nodes[curr].link, prev))
    }

    #[inline]
    fn check(&self) {
        #[cfg(any(test, feature = "strict_assertions"))]
        self.assert_invariants();
    }

    #[cfg(any(test, feature = "strict_assertions"))]
    fn assert_invariants(&self) {
        use std::collections::HashSet;

        assert_eq!(self.size == 0, self.start == BOUNDARY);
        assert_eq!(self.size == 0, self.end == BOUNDARY);
        assert_eq!(self.size, self.nodes.len(), "unreachable nodes in arena");
        if self.size == 1 {
            assert_eq!(self.start, self.end);
            assert_eq!(BOUNDARY, self.nodes[self.start].link);
        }

        for (from, to) in [(self.start, self.end), (self.end, self.start)] {
            let mut seen = HashSet::with_capacity(self.size);
            let mut prev = BOUNDARY;
            let mut curr = from;
            while curr != BOUNDARY {
                assert!(self.nodes.contains(curr), "dangling handle {curr}");
                assert!(seen.insert(curr), "cycle through handle {curr}");
                (prev, curr) = self.step(prev, curr);
            }
            assert_eq!(self.size, seen.len());
            assert_eq!(to, prev);
        }
    }
}

impl<T> Drop for XorSequence<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Index<usize> for XorSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for XorSequence<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for XorSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut prev = BOUNDARY;
        let mut curr = self.start;
        while curr != BOUNDARY {
            list.entry(&self.nodes[curr].payload);
            (prev, curr) = self.step(prev, curr);
        }
        list.finish()
    }
}
