//! Handle types for addressing arena slots.

/// A compact 32-bit handle into the node arena.
///
/// `u32::MAX` is reserved as the `OptionSlabIndex` "none" sentinel, which caps
/// the arena at a little over four billion records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SlabIndex(u32);

impl SlabIndex {
    /// Creates a new SlabIndex from a usize.
    ///
    /// # Panics
    /// Panics if `index >= u32::MAX` (reserved for the none sentinel).
    #[inline]
    pub fn new(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "slab index must be less than u32::MAX"
        );
        Self(index as u32)
    }

    /// Returns the index as a usize.
    #[inline]
    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

/// An optional slab index using `u32::MAX` as the none sentinel.
///
/// Fits in 4 bytes where `Option<SlabIndex>` would need 8, which keeps the
/// left/right links of every tree node small.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct OptionSlabIndex(u32);

impl OptionSlabIndex {
    /// Creates a None value.
    #[inline]
    pub fn none() -> Self {
        Self(u32::MAX)
    }

    /// Creates a Some value from a SlabIndex.
    #[inline]
    pub fn some(index: SlabIndex) -> Self {
        Self(index.0)
    }

    /// Creates from an `Option<SlabIndex>`.
    #[inline]
    pub fn from_option(index: Option<SlabIndex>) -> Self {
        index.map_or(Self::none(), Self::some)
    }

    /// Converts to an `Option<SlabIndex>`.
    #[inline]
    pub fn to_option(self) -> Option<SlabIndex> {
        if self.0 == u32::MAX {
            None
        } else {
            Some(SlabIndex(self.0))
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for OptionSlabIndex {
    fn default() -> Self {
        Self::none()
    }
}

impl From<Option<SlabIndex>> for OptionSlabIndex {
    fn from(index: Option<SlabIndex>) -> Self {
        Self::from_option(index)
    }
}
