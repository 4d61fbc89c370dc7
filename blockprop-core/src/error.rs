//! Error types for block property collection and filtering

use thiserror::Error;

/// Result type alias for blockprop operations
pub type Result<T> = std::result::Result<T, BlockPropError>;

/// Blockprop error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockPropError {
    /// Key suffix does not follow the `@<timestamp>` encoding
    #[error("invalid suffix {suffix:?}: {reason}")]
    SuffixParse { suffix: String, reason: String },

    /// Encoded block property could not be decoded
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// Unknown internal key kind byte
    #[error("Invalid key kind: {0}")]
    InvalidKeyKind(u8),

    /// Misuse of the block property framework
    #[error("Invalid property: {0}")]
    InvalidProperty(String),
}

impl BlockPropError {
    pub(crate) fn suffix_parse(suffix: &[u8], reason: impl Into<String>) -> Self {
        BlockPropError::SuffixParse {
            suffix: String::from_utf8_lossy(suffix).into_owned(),
            reason: reason.into(),
        }
    }

    /// Check if error comes from a malformed key suffix
    pub fn is_suffix_parse(&self) -> bool {
        matches!(self, BlockPropError::SuffixParse { .. })
    }

    /// Check if error indicates corruption
    pub fn is_corruption(&self) -> bool {
        matches!(self, BlockPropError::Corruption(_))
    }
}
