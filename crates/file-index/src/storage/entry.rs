//! Slot representation for the node arena.

/// A single arena slot.
#[derive(Debug, Clone)]
pub enum Entry<T> {
    /// Slot is free; stores the index of the next free slot in the freelist.
    Vacant(usize),
    /// Slot holds a live value.
    Occupied(T),
}
