//! Per-block property sets
//!
//! A table may run several block property collectors. Each is given a
//! short ID, and a block's property set concatenates
//! `short_id ++ uvarint(len) ++ value` for every collector, in increasing
//! short ID order.

use crate::config::MAX_PROPERTY_COLLECTORS;
use crate::interval::{get_uvarint, put_uvarint, BlockPropertyFilter};
use crate::{BlockPropError, Result};
use bytes::Buf;
use std::collections::HashMap;
use tracing::debug;

/// Builds the property set of one block
#[derive(Debug, Default)]
pub struct BlockPropertiesEncoder {
    buf: Vec<u8>,
    last_short_id: Option<u8>,
}

impl BlockPropertiesEncoder {
    /// Create an empty encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the value of the collector with `short_id`
    pub fn add(&mut self, short_id: u8, value: &[u8]) -> Result<()> {
        if usize::from(short_id) >= MAX_PROPERTY_COLLECTORS {
            return Err(BlockPropError::InvalidProperty(format!(
                "short ID {} out of range",
                short_id
            )));
        }
        if let Some(last) = self.last_short_id {
            if short_id <= last {
                return Err(BlockPropError::InvalidProperty(format!(
                    "short ID {} added after {}",
                    short_id, last
                )));
            }
        }
        self.buf.push(short_id);
        put_uvarint(&mut self.buf, value.len() as u64);
        self.buf.extend_from_slice(value);
        self.last_short_id = Some(short_id);
        Ok(())
    }

    /// Return the encoded set and reset for the next block
    pub fn finish(&mut self) -> Vec<u8> {
        self.last_short_id = None;
        std::mem::take(&mut self.buf)
    }
}

/// Decode a block property set into `(short_id, value)` pairs
pub fn decode_block_properties(mut data: &[u8]) -> Result<Vec<(u8, &[u8])>> {
    let mut props = Vec::new();
    while data.has_remaining() {
        let short_id = data.get_u8();
        let len = get_uvarint(&mut data)? as usize;
        if len > data.len() {
            return Err(BlockPropError::Corruption(format!(
                "property {} claims {} bytes, {} left",
                short_id,
                len,
                data.len()
            )));
        }
        let (value, rest) = data.split_at(len);
        props.push((short_id, value));
        data = rest;
    }
    Ok(props)
}

/// Applies a set of block property filters to the blocks of one table
pub struct BlockPropertiesFilterer<'a> {
    filters: Vec<(u8, &'a dyn BlockPropertyFilter)>,
}

impl<'a> BlockPropertiesFilterer<'a> {
    /// Bind `filters` to a table whose collectors are listed by name in
    /// `short_ids`. Filters on properties the table never collected cannot
    /// exclude anything and are dropped; `None` means no filter applies.
    pub fn new(
        filters: &[&'a dyn BlockPropertyFilter],
        short_ids: &HashMap<String, u8>,
    ) -> Option<Self> {
        let mut bound: Vec<(u8, &'a dyn BlockPropertyFilter)> = Vec::new();
        for &filter in filters {
            match short_ids.get(filter.name()) {
                Some(&id) => bound.push((id, filter)),
                None => debug!(property = filter.name(), "table lacks property, filter ignored"),
            }
        }
        if bound.is_empty() {
            return None;
        }
        bound.sort_by_key(|(id, _)| *id);
        Some(Self { filters: bound })
    }

    /// Check if a block with property set `block_props` must be read.
    /// A property absent from the block is passed to its filter as empty.
    pub fn intersects(&self, block_props: &[u8]) -> Result<bool> {
        let props = decode_block_properties(block_props)?;
        for (id, filter) in &self.filters {
            let value = props
                .iter()
                .find(|(pid, _)| pid == id)
                .map(|(_, v)| *v)
                .unwrap_or(&[]);
            if !filter.intersects(value)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
