//! Blockprop Core - block property collection and filtering over key suffixes
//!
//! Keys in the `testkeys` convention carry an optional MVCC-like suffix that
//! encodes a logical timestamp (e.g. `key@5`). This crate summarizes, per
//! data block, the half-open interval `[lower, upper)` of timestamps seen in
//! that block, and uses those intervals to skip blocks during scans that are
//! restricted to a timestamp range.
//!
//! # Architecture
//!
//! - **Suffix collector**: accumulates the timestamp interval of one data block
//! - **Interval framework**: encodes intervals as block properties and tests
//!   them against a query interval
//! - **Masking filter**: retargets an interval filter to `[ts, MAX)` so range
//!   keys can mask the point keys they cover
//! - **Property sets**: several named properties per block, filtered together

pub mod base;
pub mod blockprop;
pub mod interval;
pub mod properties;
pub mod testkeys;

mod error;

pub use base::{InternalKey, InternalKeyKind, SeqNum, MAX_SEQ_NUM};
pub use blockprop::{
    new_block_property_collector, new_block_property_filter, new_masking_filter, MaskingFilter,
    SuffixIntervalCollector, SuffixIntervalState,
};
pub use error::{BlockPropError, Result};
pub use interval::{
    BlockIntervalCollector, BlockIntervalFilter, BlockPropertyCollector, BlockPropertyFilter,
    BlockPropertyFilterMask, DataBlockIntervalCollector, Interval,
};
pub use properties::{decode_block_properties, BlockPropertiesEncoder, BlockPropertiesFilterer};

/// Blockprop version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed configuration values
pub mod config {
    /// Name under which the suffix interval is stored as a block property.
    /// Must match exactly between the write and read paths.
    pub const BLOCK_PROPERTY_NAME: &str = "pebble.internal.testkeys.suffixes";

    /// Byte separating a user key from its timestamp suffix
    pub const SUFFIX_DELIMITER: u8 = b'@';

    /// Maximum number of block property collectors per table
    pub const MAX_PROPERTY_COLLECTORS: usize = u8::MAX as usize;
}
