//! Interval block property collectors and filters on `testkeys` suffixes
//! (e.g. `key@5`).

use crate::config::BLOCK_PROPERTY_NAME;
use crate::interval::{
    BlockIntervalCollector, BlockIntervalFilter, BlockPropertyFilter, BlockPropertyFilterMask,
    DataBlockIntervalCollector, Interval,
};
use crate::{testkeys, InternalKey, Result};
use tracing::{debug, trace};

/// Construct a block property collector over key suffixes.
pub fn new_block_property_collector() -> BlockIntervalCollector {
    BlockIntervalCollector::new(
        BLOCK_PROPERTY_NAME,
        Box::new(SuffixIntervalCollector::new()),
        None,
    )
}

/// Construct a filter that excludes blocks holding only suffixed keys whose
/// suffixes all fall outside `[filter_min, filter_max)`.
///
/// Only data derived from keys is used. Iteration is deterministic for
/// unsuffixed keys and for keys with suffixes inside the range; whether a
/// key with a suffix outside the range is visited depends on which other
/// keys share its block.
pub fn new_block_property_filter(filter_min: u64, filter_max: u64) -> BlockIntervalFilter {
    BlockIntervalFilter::new(BLOCK_PROPERTY_NAME, filter_min, filter_max)
}

/// Construct a [`MaskingFilter`] initially matching every block.
pub fn new_masking_filter() -> MaskingFilter {
    MaskingFilter {
        filter: new_block_property_filter(0, u64::MAX),
    }
}

/// Masks point keys carrying suffixes (e.g. `@4`) that are covered by range
/// keys carrying suffixes. Each [`set_suffix`](BlockPropertyFilterMask::set_suffix)
/// retargets the wrapped interval filter at `[ts, MAX)`.
#[derive(Debug, Clone)]
pub struct MaskingFilter {
    filter: BlockIntervalFilter,
}

impl MaskingFilter {
    /// Interval currently queried by the wrapped filter
    pub fn interval(&self) -> Interval {
        self.filter.interval()
    }
}

impl BlockPropertyFilter for MaskingFilter {
    fn name(&self) -> &str {
        self.filter.name()
    }

    fn intersects(&self, prop: &[u8]) -> Result<bool> {
        self.filter.intersects(prop)
    }
}

impl BlockPropertyFilterMask for MaskingFilter {
    fn set_suffix(&mut self, suffix: &[u8]) -> Result<()> {
        let ts = testkeys::parse_suffix(suffix)?;
        debug!(ts, "masking blocks below timestamp");
        // [MAX, MAX) would be empty and mask every block
        self.filter.set_interval(ts.min(u64::MAX - 1), u64::MAX);
        Ok(())
    }
}

/// Timestamps observed in the current data block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuffixIntervalState {
    /// No key added since the last block boundary
    #[default]
    Empty,
    /// Only suffixed keys seen; covers `[lower, upper)`
    Bounded { lower: u64, upper: u64 },
    /// An unsuffixed key was seen; the block matches every timestamp
    Unbounded,
}

/// Maintains an interval over the timestamps in the suffixes of the keys
/// of one data block.
///
/// An unsuffixed key has no version constraint, so it widens the block's
/// interval to everything; a filter must never skip a block holding one.
#[derive(Debug, Default)]
pub struct SuffixIntervalCollector {
    state: SuffixIntervalState,
}

impl SuffixIntervalCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the block under construction
    pub fn state(&self) -> SuffixIntervalState {
        self.state
    }
}

impl DataBlockIntervalCollector for SuffixIntervalCollector {
    fn add(&mut self, key: &InternalKey, _value: &[u8]) -> Result<()> {
        let user_key = &key.user_key[..];
        let i = testkeys::split(user_key);
        if i == user_key.len() {
            self.state = SuffixIntervalState::Unbounded;
            return Ok(());
        }
        let ts = testkeys::parse_suffix(&user_key[i..])?;

        // [MAX, MAX) would be empty: keep u64::MAX inside the interval by
        // starting it one lower.
        let (ts_lower, ts_upper) = match ts.checked_add(1) {
            Some(upper) => (ts, upper),
            None => (u64::MAX - 1, u64::MAX),
        };
        self.state = match self.state {
            SuffixIntervalState::Empty => SuffixIntervalState::Bounded {
                lower: ts_lower,
                upper: ts_upper,
            },
            SuffixIntervalState::Bounded { lower, upper } => SuffixIntervalState::Bounded {
                lower: lower.min(ts_lower),
                upper: upper.max(ts_upper),
            },
            SuffixIntervalState::Unbounded => SuffixIntervalState::Unbounded,
        };
        Ok(())
    }

    fn finish_data_block(&mut self) -> Result<(u64, u64)> {
        let bounds = match std::mem::take(&mut self.state) {
            SuffixIntervalState::Empty => (0, 0),
            SuffixIntervalState::Bounded { lower, upper } => (lower, upper),
            SuffixIntervalState::Unbounded => (0, u64::MAX),
        };
        trace!(lower = bounds.0, upper = bounds.1, "suffix interval for data block");
        Ok(bounds)
    }
}
