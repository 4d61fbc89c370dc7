//! Interval block property filtering

use super::Interval;
use crate::Result;
use tracing::warn;

/// Decides, from a block's encoded property, whether the block may contain
/// keys of interest. `false` lets the caller skip the block.
pub trait BlockPropertyFilter {
    /// Name of the property this filter reads
    fn name(&self) -> &str;

    /// Check if the block described by `prop` may hold matching keys
    fn intersects(&self, prop: &[u8]) -> Result<bool>;
}

/// A filter whose query can be retargeted at a suffix, used to mask point
/// keys covered by a range key.
pub trait BlockPropertyFilterMask: BlockPropertyFilter {
    /// Reconfigure the filter from a range key's suffix
    fn set_suffix(&mut self, suffix: &[u8]) -> Result<()>;
}

/// Filters blocks whose interval property misses the query interval
#[derive(Debug, Clone)]
pub struct BlockIntervalFilter {
    name: String,
    filter: Interval,
}

impl BlockIntervalFilter {
    /// Create a filter matching blocks that intersect `[lower, upper)`
    pub fn new(name: impl Into<String>, lower: u64, upper: u64) -> Self {
        Self {
            name: name.into(),
            filter: Interval::new(lower, upper),
        }
    }

    /// Replace the query interval
    pub fn set_interval(&mut self, lower: u64, upper: u64) {
        self.filter = Interval::new(lower, upper);
    }

    /// Current query interval
    pub fn interval(&self) -> Interval {
        self.filter
    }
}

impl BlockPropertyFilter for BlockIntervalFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn intersects(&self, prop: &[u8]) -> Result<bool> {
        let interval = Interval::decode(prop).map_err(|e| {
            warn!(property = %self.name, error = %e, "undecodable block property");
            e
        })?;
        Ok(interval.intersects(&self.filter))
    }
}
