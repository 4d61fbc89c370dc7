//! Internal keys: a user key plus a trailer packing sequence number and kind

use crate::{BlockPropError, Result};
use bytes::Bytes;
use std::fmt;

/// Sequence number assigned to every write
pub type SeqNum = u64;

/// Largest sequence number that fits in a trailer (56 bits)
pub const MAX_SEQ_NUM: SeqNum = (1 << 56) - 1;

/// Kind of record an internal key identifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum InternalKeyKind {
    Delete = 0,
    Set = 1,
    Merge = 2,
    SingleDelete = 7,
    RangeDelete = 15,
    RangeKeyDelete = 19,
    RangeKeyUnset = 20,
    RangeKeySet = 21,
}

impl InternalKeyKind {
    /// Range key records may carry several suffixes and are collected
    /// separately from point keys.
    pub fn is_range_key(self) -> bool {
        matches!(
            self,
            InternalKeyKind::RangeKeyDelete
                | InternalKeyKind::RangeKeyUnset
                | InternalKeyKind::RangeKeySet
        )
    }
}

impl TryFrom<u8> for InternalKeyKind {
    type Error = BlockPropError;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => InternalKeyKind::Delete,
            1 => InternalKeyKind::Set,
            2 => InternalKeyKind::Merge,
            7 => InternalKeyKind::SingleDelete,
            15 => InternalKeyKind::RangeDelete,
            19 => InternalKeyKind::RangeKeyDelete,
            20 => InternalKeyKind::RangeKeyUnset,
            21 => InternalKeyKind::RangeKeySet,
            other => return Err(BlockPropError::InvalidKeyKind(other)),
        })
    }
}

/// Key as stored in a data block
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InternalKey {
    /// User-visible key, possibly carrying a timestamp suffix
    pub user_key: Bytes,
    /// `seq_num << 8 | kind`
    pub trailer: u64,
}

impl InternalKey {
    /// Create a new internal key. `seq_num` must not exceed [`MAX_SEQ_NUM`].
    pub fn new(user_key: impl Into<Bytes>, seq_num: SeqNum, kind: InternalKeyKind) -> Self {
        debug_assert!(seq_num <= MAX_SEQ_NUM, "sequence number {} overflows trailer", seq_num);
        Self {
            user_key: user_key.into(),
            trailer: (seq_num << 8) | kind as u64,
        }
    }

    /// Sequence number component of the trailer
    pub fn seq_num(&self) -> SeqNum {
        self.trailer >> 8
    }

    /// Kind component of the trailer
    pub fn kind(&self) -> Result<InternalKeyKind> {
        InternalKeyKind::try_from((self.trailer & 0xff) as u8)
    }
}

impl fmt::Display for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{},{}",
            String::from_utf8_lossy(&self.user_key),
            self.seq_num(),
            self.trailer & 0xff
        )
    }
}
