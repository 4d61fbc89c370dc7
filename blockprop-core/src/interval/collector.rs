//! Interval block property collection

use super::Interval;
use crate::{InternalKey, Result};
use tracing::trace;

/// Accumulates a `[lower, upper)` interval over the keys of one data block.
///
/// `add` is called once per key written to the block; `finish_data_block`
/// is called once when the block is complete and must leave the collector
/// ready for the next block.
pub trait DataBlockIntervalCollector {
    /// Add a key/value pair to the current block
    fn add(&mut self, key: &InternalKey, value: &[u8]) -> Result<()>;

    /// Return the interval of the current block and reset for the next one
    fn finish_data_block(&mut self) -> Result<(u64, u64)>;
}

/// Collects one named property per data block, index block and table.
pub trait BlockPropertyCollector {
    /// Property name, shared by the write and read paths
    fn name(&self) -> &str;

    /// Add a key/value pair to the current data block
    fn add(&mut self, key: &InternalKey, value: &[u8]) -> Result<()>;

    /// Append the encoded property of the finished data block to `buf`
    fn finish_data_block(&mut self, buf: &mut Vec<u8>) -> Result<()>;

    /// Fold the last finished data block into the pending index block
    fn add_prev_data_block_to_index_block(&mut self);

    /// Append the encoded property of the pending index block to `buf`
    fn finish_index_block(&mut self, buf: &mut Vec<u8>) -> Result<()>;

    /// Append the encoded property of the whole table to `buf`
    fn finish_table(&mut self, buf: &mut Vec<u8>) -> Result<()>;
}

/// Adapts [`DataBlockIntervalCollector`]s to [`BlockPropertyCollector`].
///
/// Point keys go to the point collector. Range keys go to the range
/// collector when one is configured; range keys live outside data blocks,
/// so their interval only contributes to the table property.
pub struct BlockIntervalCollector {
    name: String,
    points: Box<dyn DataBlockIntervalCollector>,
    ranges: Option<Box<dyn DataBlockIntervalCollector>>,

    data_block: Interval,
    index_block: Interval,
    table: Interval,
}

impl BlockIntervalCollector {
    /// Create a new collector publishing under `name`
    pub fn new(
        name: impl Into<String>,
        points: Box<dyn DataBlockIntervalCollector>,
        ranges: Option<Box<dyn DataBlockIntervalCollector>>,
    ) -> Self {
        Self {
            name: name.into(),
            points,
            ranges,
            data_block: Interval::default(),
            index_block: Interval::default(),
            table: Interval::default(),
        }
    }
}

impl BlockPropertyCollector for BlockIntervalCollector {
    fn name(&self) -> &str {
        &self.name
    }

    fn add(&mut self, key: &InternalKey, value: &[u8]) -> Result<()> {
        if key.kind()?.is_range_key() {
            return match self.ranges.as_mut() {
                Some(ranges) => ranges.add(key, value),
                None => Ok(()),
            };
        }
        self.points.add(key, value)
    }

    fn finish_data_block(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        let (lower, upper) = self.points.finish_data_block()?;
        self.data_block = Interval::new(lower, upper);
        self.table = self.table.union(self.data_block);
        trace!(property = %self.name, interval = %self.data_block, "finished data block");
        self.data_block.encode(buf);
        Ok(())
    }

    fn add_prev_data_block_to_index_block(&mut self) {
        self.index_block = self.index_block.union(self.data_block);
        self.data_block = Interval::default();
    }

    fn finish_index_block(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        self.index_block.encode(buf);
        self.index_block = Interval::default();
        Ok(())
    }

    fn finish_table(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        if let Some(ranges) = self.ranges.as_mut() {
            let (lower, upper) = ranges.finish_data_block()?;
            self.table = self.table.union(Interval::new(lower, upper));
        }
        self.table.encode(buf);
        Ok(())
    }
}
