//! # Value Kind: Single Source of Truth
//!
//! Defines the `ValueKind` enum naming the runtime kinds a JSON instance can
//! have. This is the ONE definition used by the built-in type predicates and
//! by the `actual` field of `type` violations. Every `match` on it is
//! exhaustive; adding a kind forces every consumer to handle it.
//!
//! `integer` and `number` are distinct kinds: a number stored as an integer
//! reports `integer`, anything else `number`. As a *predicate*, `number`
//! accepts both.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The runtime kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Associative mapping.
    Object,
    /// Ordered sequence.
    Array,
    /// UTF-8 string.
    String,
    /// Number stored as a signed or unsigned integer.
    Integer,
    /// Any number, including floats.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
}

/// Total number of value kinds.
pub const VALUE_KIND_COUNT: usize = 7;

impl ValueKind {
    /// Returns all kinds in canonical order.
    pub fn all_kinds() -> &'static [ValueKind] {
        &[
            Self::Object,
            Self::Array,
            Self::String,
            Self::Integer,
            Self::Number,
            Self::Boolean,
            Self::Null,
        ]
    }

    /// Observe the kind of a value. Integral numbers report `Integer`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
        }
    }

    /// Whether `value` satisfies this kind when used as a type name.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Null => value.is_null(),
        }
    }

    /// Returns the type name used in schemas for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(ValueKind::all_kinds().len(), VALUE_KIND_COUNT);
    }

    #[test]
    fn test_of_observes_integers_separately() {
        assert_eq!(ValueKind::of(&json!(1)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(-7)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!(1.0)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
        assert_eq!(ValueKind::of(&json!([])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
    }

    #[test]
    fn test_number_accepts_integers() {
        assert!(ValueKind::Number.matches(&json!(3)));
        assert!(ValueKind::Number.matches(&json!(3.25)));
        assert!(ValueKind::Integer.matches(&json!(3)));
        assert!(!ValueKind::Integer.matches(&json!(3.25)));
        assert!(!ValueKind::Integer.matches(&json!("3")));
    }

    #[test]
    fn test_object_and_array_are_disjoint() {
        assert!(ValueKind::Object.matches(&json!({"a": 1})));
        assert!(!ValueKind::Object.matches(&json!([1])));
        assert!(ValueKind::Array.matches(&json!([1])));
        assert!(!ValueKind::Array.matches(&json!({"0": 1})));
    }

    #[test]
    fn test_every_kind_matches_its_own_observation() {
        let samples = [
            json!({}),
            json!([]),
            json!("s"),
            json!(1),
            json!(1.5),
            json!(false),
            json!(null),
        ];
        for sample in &samples {
            let kind = ValueKind::of(sample);
            assert!(kind.matches(sample), "{kind} does not match {sample}");
        }
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for kind in ValueKind::all_kinds() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
