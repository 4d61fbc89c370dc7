//! Interval block properties
//!
//! A block's property is the half-open interval `[lower, upper)` of some
//! `u64` attribute of its keys. Collectors build the interval while a block
//! is written; filters decode it while scanning and decide whether the block
//! can be skipped.

mod collector;
mod filter;

pub use collector::{BlockIntervalCollector, BlockPropertyCollector, DataBlockIntervalCollector};
pub use filter::{BlockIntervalFilter, BlockPropertyFilter, BlockPropertyFilterMask};

use crate::{BlockPropError, Result};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open interval `[lower, upper)`. Empty when `lower >= upper`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub lower: u64,
    pub upper: u64,
}

impl Interval {
    /// Interval covering every representable value
    pub const UNBOUNDED: Interval = Interval {
        lower: 0,
        upper: u64::MAX,
    };

    /// Create a new interval
    pub fn new(lower: u64, upper: u64) -> Self {
        Self { lower, upper }
    }

    /// Check if the interval contains no values
    pub fn is_empty(&self) -> bool {
        self.lower >= self.upper
    }

    /// Smallest interval containing both. Empty intervals are ignored.
    pub fn union(self, other: Interval) -> Interval {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Check if the two intervals share at least one value
    pub fn intersects(&self, other: &Interval) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.lower < other.upper && self.upper > other.lower
    }

    /// Append the property encoding: nothing for an empty interval, else
    /// `uvarint(lower) ++ uvarint(upper - lower)`.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        if self.is_empty() {
            return;
        }
        put_uvarint(buf, self.lower);
        put_uvarint(buf, self.upper - self.lower);
    }

    /// Decode a property produced by [`Interval::encode`]
    pub fn decode(mut data: &[u8]) -> Result<Interval> {
        if data.is_empty() {
            return Ok(Interval::default());
        }
        let lower = get_uvarint(&mut data)?;
        let delta = get_uvarint(&mut data)?;
        if data.has_remaining() {
            return Err(BlockPropError::Corruption(format!(
                "{} trailing bytes after interval",
                data.remaining()
            )));
        }
        let upper = lower.checked_add(delta).ok_or_else(|| {
            BlockPropError::Corruption(format!("interval [{}, {}+{}) overflows", lower, lower, delta))
        })?;
        Ok(Interval { lower, upper })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

pub(crate) fn put_uvarint<B: BufMut>(buf: &mut B, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub(crate) fn get_uvarint(data: &mut &[u8]) -> Result<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;
    loop {
        if !data.has_remaining() {
            return Err(BlockPropError::Corruption("truncated uvarint".into()));
        }
        let byte = data.get_u8();
        if shift == 63 && byte > 1 {
            return Err(BlockPropError::Corruption("uvarint overflows u64".into()));
        }
        result |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}
