//! Slab allocator for index tree nodes.
//!
//! Values live in a contiguous vector of slots. Removing a value turns its slot
//! into a freelist link, and the next insert reuses the most recently freed
//! slot, so handles stay stable for as long as the value is alive.

use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};

use super::entry::Entry;
use super::index_types::SlabIndex;

/// Initial number of slots to reserve.
const INITIAL_SLOTS: usize = 64;

/// Arena of `T` values addressed by `SlabIndex`.
pub struct Slab<T> {
    /// Slot storage, occupied or vacant.
    entries: Vec<Entry<T>>,

    /// Logical element count (occupied slots only).
    len: usize,

    /// Head of the freelist; equals `entries.len()` when no slot is free.
    next: usize,
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slab<T> {
    /// Creates a new empty slab with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_SLOTS)
    }

    /// Creates a new slab with room for `capacity` values before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            len: 0,
            next: 0,
        }
    }

    /// Inserts a value, returning its stable index.
    pub fn insert(&mut self, value: T) -> SlabIndex {
        let key = self.next;
        if key == self.entries.len() {
            self.entries.push(Entry::Occupied(value));
            self.next = self.entries.len();
        } else {
            // Reusing a vacant slot from the freelist
            let next_free = match self.entries[key] {
                Entry::Vacant(next) => next,
                Entry::Occupied(_) => unreachable!("freelist head points at an occupied slot"),
            };
            self.entries[key] = Entry::Occupied(value);
            self.next = next_free;
        }
        self.len += 1;
        SlabIndex::new(key)
    }

    /// Gets a reference to the value at `index`.
    pub fn get(&self, index: SlabIndex) -> Option<&T> {
        match self.entries.get(index.get()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Gets a mutable reference to the value at `index`.
    pub fn get_mut(&mut self, index: SlabIndex) -> Option<&mut T> {
        match self.entries.get_mut(index.get()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Removes the value at `index` if it exists, returning it.
    ///
    /// The freed slot becomes the new freelist head.
    pub fn try_remove(&mut self, index: SlabIndex) -> Option<T> {
        let slot = index.get();
        let entry = self.entries.get_mut(slot)?;
        if matches!(entry, Entry::Vacant(_)) {
            return None;
        }
        match mem::replace(entry, Entry::Vacant(self.next)) {
            Entry::Occupied(value) => {
                self.len -= 1;
                self.next = slot;
                Some(value)
            }
            Entry::Vacant(_) => unreachable!(),
        }
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the slab is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value and forgets all slots.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.len = 0;
        self.next = 0;
    }

    /// Returns an iterator over occupied entries in slot order.
    pub fn iter(&self) -> SlabIter<'_, T> {
        SlabIter {
            entries: self.entries.iter().enumerate(),
        }
    }
}

impl<T> Index<SlabIndex> for Slab<T> {
    type Output = T;

    fn index(&self, index: SlabIndex) -> &Self::Output {
        self.get(index).expect("invalid slab index")
    }
}

impl<T> IndexMut<SlabIndex> for Slab<T> {
    fn index_mut(&mut self, index: SlabIndex) -> &mut Self::Output {
        self.get_mut(index).expect("invalid slab index")
    }
}

impl<T> fmt::Debug for Slab<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slab")
            .field("len", &self.len)
            .field("next", &self.next)
            .field("slots", &self.entries.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Slab Iterator
// ---------------------------------------------------------------------------

/// Iterator over occupied entries in a Slab.
pub struct SlabIter<'a, T> {
    entries: std::iter::Enumerate<std::slice::Iter<'a, Entry<T>>>,
}

impl<'a, T> Iterator for SlabIter<'a, T> {
    type Item = (SlabIndex, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, entry) in self.entries.by_ref() {
            if let Entry::Occupied(value) = entry {
                return Some((SlabIndex::new(idx), value));
            }
        }
        None
    }
}

impl<'a, T> IntoIterator for &'a Slab<T> {
    type Item = (SlabIndex, &'a T);
    type IntoIter = SlabIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
