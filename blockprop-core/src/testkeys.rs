//! Keys with MVCC-like timestamp suffixes, e.g. `foo@123`
//!
//! A user key is split at its last `@` into a prefix and a suffix. Keys
//! without an `@` are unsuffixed and sort before every suffixed version of
//! the same prefix; suffixed versions sort newest first.

use crate::config::SUFFIX_DELIMITER;
use crate::{BlockPropError, Result};
use std::cmp::Ordering;

/// Index at which the suffix of `user_key` begins, or `user_key.len()` if
/// the key has no suffix.
pub fn split(user_key: &[u8]) -> usize {
    user_key
        .iter()
        .rposition(|&b| b == SUFFIX_DELIMITER)
        .unwrap_or(user_key.len())
}

/// Parse a suffix (with or without its leading `@`) into a timestamp
pub fn parse_suffix(suffix: &[u8]) -> Result<u64> {
    let digits = suffix.strip_prefix(&[SUFFIX_DELIMITER]).unwrap_or(suffix);
    if digits.is_empty() {
        return Err(BlockPropError::suffix_parse(suffix, "empty timestamp"));
    }
    let mut ts: u64 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return Err(BlockPropError::suffix_parse(suffix, "not a decimal timestamp"));
        }
        ts = ts
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
            .ok_or_else(|| BlockPropError::suffix_parse(suffix, "timestamp overflows u64"))?;
    }
    Ok(ts)
}

/// Encode a timestamp as a suffix
pub fn suffix(ts: u64) -> Vec<u8> {
    format!("@{}", ts).into_bytes()
}

/// Append the suffix for `ts` to `key`
pub fn with_suffix(key: &[u8], ts: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + 21);
    out.extend_from_slice(key);
    out.extend_from_slice(&suffix(ts));
    out
}

/// Order keys by prefix, then unsuffixed first, then by descending timestamp
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
    let (ai, bi) = (split(a), split(b));
    match a[..ai].cmp(&b[..bi]) {
        Ordering::Equal => {}
        other => return other,
    }
    let (asuf, bsuf) = (&a[ai..], &b[bi..]);
    match (asuf.is_empty(), bsuf.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match (parse_suffix(asuf), parse_suffix(bsuf)) {
            (Ok(at), Ok(bt)) => bt.cmp(&at),
            _ => asuf.cmp(bsuf),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split(b"foo@12"), 3);
        assert_eq!(split(b"foo"), 3);
        assert_eq!(split(b"a@b@7"), 3);
        assert_eq!(split(b""), 0);
    }

    #[test]
    fn test_parse_suffix() {
        assert_eq!(parse_suffix(b"@5").unwrap(), 5);
        assert_eq!(parse_suffix(b"123").unwrap(), 123);
        assert_eq!(parse_suffix(b"@18446744073709551615").unwrap(), u64::MAX);

        let bad_suffixes: [&[u8]; 6] = [b"@", b"", b"@-1", b"@1x", b"@18446744073709551616", b"@ 3"];
        for bad in bad_suffixes {
            let err = parse_suffix(bad).unwrap_err();
            assert!(err.is_suffix_parse(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix(b"apple", 7), b"apple@7".to_vec());
        assert_eq!(parse_suffix(&suffix(991)).unwrap(), 991);
    }

    #[test]
    fn test_compare() {
        let mut keys: Vec<Vec<u8>> = vec![
            b"b@1".to_vec(),
            b"a@3".to_vec(),
            b"a".to_vec(),
            b"a@10".to_vec(),
            b"b".to_vec(),
        ];
        keys.sort_by(|a, b| compare(a, b));
        let expected: Vec<Vec<u8>> = vec![
            b"a".to_vec(),
            b"a@10".to_vec(),
            b"a@3".to_vec(),
            b"b".to_vec(),
            b"b@1".to_vec(),
        ];
        assert_eq!(keys, expected);
    }
}
