//! Byte-cost model and block configuration.

use crate::error::ArenaError;

/// How a slice's storage is laid out, which determines its byte cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceLayout {
    /// One array per nesting level, as in a managed heap: a slice of depth
    /// `k` at coordinate `a` is an array of `a + 1` references to slices
    /// of depth `k - 1`, bottoming out in element arrays.
    Nested,
    /// One contiguous allocation per slice.
    Flat,
}

/// Per-allocation byte costs used to plan blocks.
///
/// Every array (a slice, or one nesting level of a nested slice) costs
/// `array_header_bytes` plus its payload, rounded up to `granularity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostModel {
    /// Fixed cost of every array.
    pub array_header_bytes: u64,
    /// Size of one reference inside a nested array.
    pub reference_bytes: u64,
    /// Size of one stored element.
    pub element_bytes: u64,
    /// Cost of the block's slot pointing at each slice.
    pub slot_bytes: u64,
    /// Fixed cost of the block itself.
    pub block_overhead_bytes: u64,
    /// Allocation rounding unit.
    pub granularity: u64,
    /// Slice storage layout.
    pub layout: SliceLayout,
}

impl CostModel {
    /// Default array header, as on a 64-bit managed heap.
    pub const DEFAULT_ARRAY_HEADER_BYTES: u64 = 16;

    /// Default reference size (compressed pointers).
    pub const DEFAULT_REFERENCE_BYTES: u64 = 4;

    /// Default fixed block cost.
    pub const DEFAULT_BLOCK_OVERHEAD_BYTES: u64 = 16;

    /// Default allocation granularity.
    pub const DEFAULT_GRANULARITY: u64 = 8;

    /// Managed-heap style costs for elements of `element_bytes` each.
    pub fn nested(element_bytes: u64) -> Self {
        Self {
            array_header_bytes: Self::DEFAULT_ARRAY_HEADER_BYTES,
            reference_bytes: Self::DEFAULT_REFERENCE_BYTES,
            element_bytes,
            slot_bytes: Self::DEFAULT_REFERENCE_BYTES,
            block_overhead_bytes: Self::DEFAULT_BLOCK_OVERHEAD_BYTES,
            granularity: Self::DEFAULT_GRANULARITY,
            layout: SliceLayout::Nested,
        }
    }

    /// Costs of this crate's own flat slice storage for elements of type `T`.
    pub fn flat<T>() -> Self {
        let word = std::mem::size_of::<usize>() as u64;
        Self {
            // Vec header of the slice.
            array_header_bytes: 3 * word,
            reference_bytes: word,
            element_bytes: (std::mem::size_of::<T>() as u64).max(1),
            slot_bytes: word,
            block_overhead_bytes: 3 * word,
            granularity: word,
            layout: SliceLayout::Flat,
        }
    }

    /// Round `bytes` up to the allocation granularity.
    pub fn round(&self, bytes: u64) -> u64 {
        bytes.div_ceil(self.granularity).saturating_mul(self.granularity)
    }

    /// Check that planning with this model terminates and is meaningful.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.granularity == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "granularity must be at least 1".into(),
            });
        }
        if self.element_bytes == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "element_bytes must be at least 1".into(),
            });
        }
        if self.layout == SliceLayout::Nested && self.reference_bytes == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "nested layout needs a non-zero reference size".into(),
            });
        }
        Ok(())
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::nested(8)
    }
}

/// Configuration for block planning and allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockConfig {
    /// Byte-cost model.
    pub cost: CostModel,
    /// Smallest acceptable block length along axis 0.
    ///
    /// Default: 2. Plans shorter than this fail with
    /// [`ArenaError::CapacityExceeded`].
    pub min_length: u32,
}

impl BlockConfig {
    /// Default minimum block length.
    pub const DEFAULT_MIN_LENGTH: u32 = 2;

    /// Configuration with the given cost model and default minimum length.
    pub fn new(cost: CostModel) -> Self {
        Self {
            cost,
            min_length: Self::DEFAULT_MIN_LENGTH,
        }
    }

    /// Validate every field.
    pub fn validate(&self) -> Result<(), ArenaError> {
        self.cost.validate()?;
        if self.min_length == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "min_length must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self::new(CostModel::default())
    }
}
