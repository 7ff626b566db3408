//! # Canonical Structural Signatures
//!
//! Defines [`StructuralSignature`], the equality key used to detect that two
//! sub-trees of an input document describe the same thing, independently of
//! object key order.
//!
//! The resolver uses it to avoid counting a child twice when an upstream
//! producer reports the same child list under two conventions (for example
//! `enfants` and `situation.enfants`).
//!
//! ## Canonical Form
//!
//! Serialization uses `serde_jcs` (RFC 8785, JSON Canonicalization Scheme):
//! sorted keys, compact separators, and ECMAScript number formatting, so
//! `7` and `7.0` produce the same signature. Unlike digest canonicalization,
//! floats are accepted: a signature is an equality key, not a commitment.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Key-order-independent structural signature of a JSON value.
///
/// Two values have equal signatures if and only if they are structurally
/// equal after canonicalization. The signature is cheap to hash and can be
/// stored in a `HashSet` for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralSignature(String);

impl StructuralSignature {
    /// Compute the signature of any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::SerializationFailed` if the value
    /// cannot be represented as JSON.
    pub fn of(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::of_value(&value)
    }

    /// Compute the signature of an already-parsed JSON value.
    pub fn of_value(value: &Value) -> Result<Self, CanonicalizationError> {
        Ok(Self(serde_jcs::to_string(value)?))
    }

    /// The canonical JSON text backing this signature.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructuralSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Reversing insertion order of object keys never changes the signature.
        #[test]
        fn signature_independent_of_insertion_order(
            entries in prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 0..8)
        ) {
            let forward: serde_json::Map<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(*v)))
                .collect();
            let backward: serde_json::Map<String, Value> = entries
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), Value::from(*v)))
                .collect();
            prop_assert_eq!(
                StructuralSignature::of_value(&Value::Object(forward)).unwrap(),
                StructuralSignature::of_value(&Value::Object(backward)).unwrap()
            );
        }
    }
}
