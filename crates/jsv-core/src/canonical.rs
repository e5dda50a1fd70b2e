//! # Canonical Serialization: Value Equality by Bytes
//!
//! This module defines `CanonicalBytes`, the JCS (RFC 8785) rendering of a
//! JSON value. Two values are *equal by value* exactly when their canonical
//! bytes are equal:
//!
//! - object keys are sorted, so `{"a":1,"b":2}` equals `{"b":2,"a":1}`;
//! - numbers use the ECMAScript shortest form, so `1` equals `1.0`;
//! - separators are compact, so formatting never matters.
//!
//! `enum` membership and `uniqueItems` both go through this module. The
//! bytes are `Hash + Eq`, which lets `uniqueItems` keep a seen-set.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced by JCS canonicalization.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - Serialization uses sorted keys with compact separators (RFC 8785).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if JCS
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let s = serde_jcs::to_string(obj)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
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

/// Compare two JSON values by value.
///
/// Structurally identical values short-circuit without serializing.
pub fn values_equal(a: &Value, b: &Value) -> Result<bool, CanonicalizationError> {
    if a == b {
        return Ok(true);
    }
    // Differing kinds other than number/number can never be equal.
    if std::mem::discriminant(a) != std::mem::discriminant(b) {
        return Ok(false);
    }
    Ok(CanonicalBytes::new(a)? == CanonicalBytes::new(b)?)
}
