//! # Encoded List — Published Bitstring Form
//!
//! The wire form of a status list bitstring: the packed bytes run through
//! gzip and the result is base64url-encoded without padding. A sparse
//! 131,072-entry list compresses to a few hundred bytes, small enough to
//! embed in a JSON document or fetch on every verification.

use std::io::{Read, Write};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::list::StatusListError;

/// A gzip-compressed, base64url-encoded (unpadded) status list bitstring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedList(String);

impl EncodedList {
    /// Compress and encode packed bitstring bytes.
    pub fn encode(bytes: &[u8]) -> Result<Self, StatusListError> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(bytes)
            .map_err(|e| StatusListError::Compress(e.to_string()))?;
        let compressed = encoder
            .finish()
            .map_err(|e| StatusListError::Compress(e.to_string()))?;
        Ok(Self(URL_SAFE_NO_PAD.encode(compressed)))
    }

    /// Decode and decompress back to packed bitstring bytes.
    pub fn decode(&self) -> Result<Vec<u8>, StatusListError> {
        let compressed = URL_SAFE_NO_PAD
            .decode(&self.0)
            .map_err(|e| StatusListError::Decode(format!("base64: {e}")))?;
        let mut decoder = GzDecoder::new(compressed.as_slice());
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| StatusListError::Decode(format!("gzip: {e}")))?;
        Ok(out)
    }

    /// The encoded string as published.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<EncodedList> for String {
    fn from(encoded: EncodedList) -> Self {
        encoded.0
    }
}

impl From<String> for EncodedList {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for EncodedList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
