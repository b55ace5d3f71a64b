//! Storage layer for the file index.
//!
//! Tree nodes live in a slab arena and refer to each other by compact
//! handles, so no node is ever owned through a raw pointer.

mod entry;
mod index_types;
mod slab;

pub use index_types::{OptionSlabIndex, SlabIndex};
pub use slab::{Slab, SlabIter};
