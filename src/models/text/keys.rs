// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Codec for the login text data segment: NUL-terminated `Key=Value` ASCII
//! strings concatenated in submission order and zero-padded to a 4-byte
//! boundary (RFC 3720 §5.1).
//!
//! Negotiation semantics are order-independent, but the encoder preserves
//! submission order so captured traffic stays deterministic to read.

use crate::{error::ProbeError, models::common::pad4};

/// Upper bound for a single key or value, in bytes.
pub const KEY_VALUE_MAX: usize = 255;

/// One negotiation pair. Construction validates what the wire format cannot
/// carry, so an existing pair always encodes cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    key: String,
    value: String,
}

impl KeyValuePair {
    /// Build a pair, rejecting anything the text format cannot represent:
    /// empty or `=`-bearing keys, embedded NULs, non-ASCII bytes, and
    /// oversized fields.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self, ProbeError> {
        let key = key.into();
        let value = value.into();

        if key.is_empty() {
            return Err(ProbeError::ProtocolParseFailure(
                "negotiation key must not be empty".to_string(),
            ));
        }
        if key.contains('=') {
            return Err(ProbeError::ProtocolParseFailure(format!(
                "negotiation key {key:?} must not contain '='"
            )));
        }
        for (what, s) in [("key", &key), ("value", &value)] {
            if !s.is_ascii() {
                return Err(ProbeError::ProtocolParseFailure(format!(
                    "negotiation {what} {s:?} must be ASCII"
                )));
            }
            if s.contains('\0') {
                return Err(ProbeError::ProtocolParseFailure(format!(
                    "negotiation {what} {s:?} must not contain NUL"
                )));
            }
            if s.len() > KEY_VALUE_MAX {
                return Err(ProbeError::EncodingOverflow {
                    needed: s.len(),
                    capacity: KEY_VALUE_MAX,
                });
            }
        }

        Ok(Self { key, value })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Bytes this pair occupies on the wire: `key` + `=` + `value` + NUL.
    pub fn wire_len(&self) -> usize {
        self.key.len() + 1 + self.value.len() + 1
    }
}

/// Encode pairs into a text data segment.
///
/// Fails with [`ProbeError::EncodingOverflow`] when the concatenated
/// pre-padding length would exceed `capacity`; the capacity check runs
/// before any byte is produced, so no partial pair is ever written.
pub fn encode_kv_segment(
    pairs: &[KeyValuePair],
    capacity: usize,
) -> Result<Vec<u8>, ProbeError> {
    let needed: usize = pairs.iter().map(KeyValuePair::wire_len).sum();
    if needed > capacity {
        return Err(ProbeError::EncodingOverflow { needed, capacity });
    }

    let padded = pad4(needed);
    let mut buf = Vec::new();
    buf.try_reserve_exact(padded)?;
    for pair in pairs {
        buf.extend_from_slice(pair.key.as_bytes());
        buf.push(b'=');
        buf.extend_from_slice(pair.value.as_bytes());
        buf.push(0);
    }
    buf.resize(padded, 0);

    Ok(buf)
}

/// Decode a text data segment back into its ordered pair list.
///
/// Trailing zero padding is ignored; an entry without `=` or with non-ASCII
/// content is a [`ProbeError::ProtocolParseFailure`].
pub fn decode_kv_segment(buf: &[u8]) -> Result<Vec<KeyValuePair>, ProbeError> {
    let mut pairs = Vec::new();
    for entry in buf.split(|&b| b == 0).filter(|s| !s.is_empty()) {
        let text = std::str::from_utf8(entry).map_err(|_| {
            ProbeError::ProtocolParseFailure("text segment entry is not valid ASCII".to_string())
        })?;
        let (key, value) = text.split_once('=').ok_or_else(|| {
            ProbeError::ProtocolParseFailure(format!("text segment entry {text:?} lacks '='"))
        })?;
        pairs.push(KeyValuePair::new(key, value)?);
    }
    Ok(pairs)
}
