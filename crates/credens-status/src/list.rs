//! # Status List — Fixed-Capacity Atomic Bitstring
//!
//! One bit per credential, addressed by the integer index embedded in the
//! credential's status reference. Bits are packed LSB-first: bit `i`
//! lives in byte `i / 8` at position `i % 8` of the published bitstring.
//!
//! ## Concurrency
//!
//! Bits are stored in `AtomicU64` words. Reads and writes of distinct
//! indices never interfere; writes to the same index are serialized by
//! the atomic read-modify-write, giving last-writer-wins semantics with
//! no lock. `snapshot()` reads each word atomically, so a snapshot taken
//! during concurrent writes reflects each bit's value at some point
//! during the call.
//!
//! ## Capacity
//!
//! `bit_len` is fixed at creation and must be a positive multiple of 8
//! (the published encoding is byte-packed). Setting or getting an index
//! at or beyond `bit_len` is a fatal input error, never a silent no-op.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoded::EncodedList;

/// Default capacity of a status list, matching the ecosystem-standard
/// minimum bitstring length of 131,072 entries (16 KiB packed).
pub const DEFAULT_BIT_LENGTH: usize = 131_072;

/// What a set bit in a list means for the credentials it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPurpose {
    /// A set bit permanently revokes the credential.
    Revocation,
    /// A set bit suspends the credential until cleared.
    Suspension,
}

impl StatusPurpose {
    /// Returns the purpose identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revocation => "revocation",
            Self::Suspension => "suspension",
        }
    }
}

impl std::fmt::Display for StatusPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from status list construction and bit operations.
#[derive(Error, Debug)]
pub enum StatusListError {
    /// Capacity must be a positive multiple of 8.
    #[error("invalid status list capacity {0}: must be a positive multiple of 8")]
    InvalidCapacity(usize),

    /// The index is outside the list's fixed capacity.
    #[error("status list index {index} out of bounds for capacity {bit_len}")]
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// The list's fixed bit length.
        bit_len: usize,
    },

    /// Compressing the bitstring for publication failed.
    #[error("status list compression failed: {0}")]
    Compress(String),

    /// The encoded form could not be decoded.
    #[error("status list decoding failed: {0}")]
    Decode(String),

    /// The decoded bitstring length disagrees with the declared capacity.
    #[error("encoded list decodes to {actual} bits but declares {declared}")]
    LengthMismatch {
        /// Bits actually present after decoding.
        actual: usize,
        /// Bits declared in the envelope.
        declared: usize,
    },
}

/// A fixed-capacity bitstring status list.
pub struct StatusList {
    id: String,
    purpose: StatusPurpose,
    bit_len: usize,
    words: Box<[AtomicU64]>,
}

impl StatusList {
    /// Create an all-zero status list with the given fixed capacity.
    pub fn new(
        id: impl Into<String>,
        purpose: StatusPurpose,
        bit_len: usize,
    ) -> Result<Self, StatusListError> {
        if bit_len == 0 || bit_len % 8 != 0 {
            return Err(StatusListError::InvalidCapacity(bit_len));
        }
        let word_count = bit_len.div_ceil(64);
        let words = (0..word_count).map(|_| AtomicU64::new(0)).collect();
        Ok(Self {
            id: id.into(),
            purpose,
            bit_len,
            words,
        })
    }

    /// Reconstruct a list from its packed LSB-first byte form.
    pub fn from_bytes(
        id: impl Into<String>,
        purpose: StatusPurpose,
        bytes: &[u8],
    ) -> Result<Self, StatusListError> {
        let bit_len = bytes.len() * 8;
        let list = Self::new(id, purpose, bit_len)?;
        for (w, chunk) in list.words.iter().zip(bytes.chunks(8)) {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            w.store(u64::from_le_bytes(buf), Ordering::Relaxed);
        }
        Ok(list)
    }

    /// The list identifier the credential status references point at.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// What a set bit in this list means.
    pub fn purpose(&self) -> StatusPurpose {
        self.purpose
    }

    /// The fixed capacity in bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Read the bit at `index`.
    pub fn get(&self, index: usize) -> Result<bool, StatusListError> {
        let (word, mask) = self.locate(index)?;
        Ok(self.words[word].load(Ordering::SeqCst) & mask != 0)
    }

    /// Set or clear the bit at `index`.
    ///
    /// Concurrent writes to distinct indices never interfere; concurrent
    /// writes to the same index resolve last-writer-wins.
    pub fn set(&self, index: usize, value: bool) -> Result<(), StatusListError> {
        let (word, mask) = self.locate(index)?;
        if value {
            self.words[word].fetch_or(mask, Ordering::SeqCst);
        } else {
            self.words[word].fetch_and(!mask, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Snapshot the packed LSB-first bytes of the bitstring.
    pub fn snapshot(&self) -> Vec<u8> {
        let byte_len = self.bit_len / 8;
        let mut out = Vec::with_capacity(byte_len);
        for w in self.words.iter() {
            out.extend_from_slice(&w.load(Ordering::SeqCst).to_le_bytes());
        }
        out.truncate(byte_len);
        out
    }

    /// Compress the current bitstring into its published form.
    pub fn to_encoded(&self) -> Result<EncodedList, StatusListError> {
        EncodedList::encode(&self.snapshot())
    }

    /// Rebuild a list from its published form.
    pub fn from_encoded(
        id: impl Into<String>,
        purpose: StatusPurpose,
        encoded: &EncodedList,
    ) -> Result<Self, StatusListError> {
        Self::from_bytes(id, purpose, &encoded.decode()?)
    }

    /// Indices of all currently-set bits, for diagnostics and audits.
    pub fn set_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        for (wi, w) in self.words.iter().enumerate() {
            let mut bits = w.load(Ordering::SeqCst);
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                let index = wi * 64 + bit;
                if index < self.bit_len {
                    out.push(index);
                }
                bits &= bits - 1;
            }
        }
        out
    }

    fn locate(&self, index: usize) -> Result<(usize, u64), StatusListError> {
        if index >= self.bit_len {
            return Err(StatusListError::OutOfBounds {
                index,
                bit_len: self.bit_len,
            });
        }
        Ok((index / 64, 1u64 << (index % 64)))
    }
}

impl Clone for StatusList {
    fn clone(&self) -> Self {
        let words = self
            .words
            .iter()
            .map(|w| AtomicU64::new(w.load(Ordering::SeqCst)))
            .collect();
        Self {
            id: self.id.clone(),
            purpose: self.purpose,
            bit_len: self.bit_len,
            words,
        }
    }
}

impl std::fmt::Debug for StatusList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusList")
            .field("id", &self.id)
            .field("purpose", &self.purpose)
            .field("bit_len", &self.bit_len)
            .field("set_bits", &self.set_indices().len())
            .finish()
    }
}

/// Serde envelope for the published form of a status list.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusListEnvelope {
    id: String,
    status_purpose: StatusPurpose,
    bit_length: usize,
    encoded_list: EncodedList,
}

impl Serialize for StatusList {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self
            .to_encoded()
            .map_err(serde::ser::Error::custom)?;
        StatusListEnvelope {
            id: self.id.clone(),
            status_purpose: self.purpose,
            bit_length: self.bit_len,
            encoded_list: encoded,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatusList {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let envelope = StatusListEnvelope::deserialize(deserializer)?;
        let list = StatusList::from_encoded(
            envelope.id,
            envelope.status_purpose,
            &envelope.encoded_list,
        )
        .map_err(serde::de::Error::custom)?;
        if list.bit_len() != envelope.bit_length {
            return Err(serde::de::Error::custom(StatusListError::LengthMismatch {
                actual: list.bit_len(),
                declared: envelope.bit_length,
            }));
        }
        Ok(list)
    }
}
