//! # Violations
//!
//! A violation is one recorded non-conformance between an instance and its
//! schema: where it happened (an [`InstancePath`]), what rule failed (a
//! [`ViolationCode`]), and code-specific context. Violations are soft: they
//! never interrupt traversal.

use std::fmt;

use jsv_core::InstancePath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Symbolic code of a violation. Serialized with the wire names used in
/// violation lists (`"required"`, `"value-not-in-enum"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationCode {
    /// Instance kind does not satisfy the declared type.
    #[serde(rename = "type")]
    Type,
    /// A required property is absent.
    #[serde(rename = "required")]
    Required,
    /// An object schema was applied to something that is not a mapping.
    #[serde(rename = "objects-must-be-maps")]
    ObjectsMustBeMaps,
    /// Keys outside the property table while `additionalProperties: false`.
    #[serde(rename = "additional-properties-not-allowed")]
    AdditionalPropertiesNotAllowed,
    /// Array shorter than `minItems`.
    #[serde(rename = "minItems")]
    MinItems,
    /// Array longer than `maxItems`.
    #[serde(rename = "maxItems")]
    MaxItems,
    /// Repeated element under `uniqueItems`.
    #[serde(rename = "uniqueItems")]
    UniqueItems,
    /// No candidate of a union type accepted the instance.
    #[serde(rename = "matches-no-type-in-union")]
    MatchesNoTypeInUnion,
    /// Instance is not one of the `enum` members.
    #[serde(rename = "value-not-in-enum")]
    ValueNotInEnum,
    /// Instance > `maximum`.
    #[serde(rename = "value-greater-than-maximum")]
    ValueGreaterThanMaximum,
    /// Instance < `minimum`.
    #[serde(rename = "value-lower-than-minimum")]
    ValueLowerThanMinimum,
    /// Instance >= `maximum` with `exclusiveMaximum`.
    #[serde(rename = "value-greater-or-equal-than-maximum")]
    ValueGreaterOrEqualThanMaximum,
    /// Instance <= `minimum` with `exclusiveMinimum`.
    #[serde(rename = "value-lower-or-equal-than-minimum")]
    ValueLowerOrEqualThanMinimum,
    /// Instance is not a multiple of `divisibleBy`.
    #[serde(rename = "value-not-divisible-by")]
    ValueNotDivisibleBy,
    /// String longer than `maxLength`.
    #[serde(rename = "max-length-exceeded")]
    MaxLengthExceeded,
    /// String shorter than `minLength`.
    #[serde(rename = "min-length-not-reached")]
    MinLengthNotReached,
    /// No substring matches `pattern`.
    #[serde(rename = "pattern-not-matched")]
    PatternNotMatched,
}

impl ViolationCode {
    /// Returns all codes in declaration order.
    pub fn all_codes() -> &'static [ViolationCode] {
        &[
            Self::Type,
            Self::Required,
            Self::ObjectsMustBeMaps,
            Self::AdditionalPropertiesNotAllowed,
            Self::MinItems,
            Self::MaxItems,
            Self::UniqueItems,
            Self::MatchesNoTypeInUnion,
            Self::ValueNotInEnum,
            Self::ValueGreaterThanMaximum,
            Self::ValueLowerThanMinimum,
            Self::ValueGreaterOrEqualThanMaximum,
            Self::ValueLowerOrEqualThanMinimum,
            Self::ValueNotDivisibleBy,
            Self::MaxLengthExceeded,
            Self::MinLengthNotReached,
            Self::PatternNotMatched,
        ]
    }

    /// The wire name of this code. Must match the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Required => "required",
            Self::ObjectsMustBeMaps => "objects-must-be-maps",
            Self::AdditionalPropertiesNotAllowed => "additional-properties-not-allowed",
            Self::MinItems => "minItems",
            Self::MaxItems => "maxItems",
            Self::UniqueItems => "uniqueItems",
            Self::MatchesNoTypeInUnion => "matches-no-type-in-union",
            Self::ValueNotInEnum => "value-not-in-enum",
            Self::ValueGreaterThanMaximum => "value-greater-than-maximum",
            Self::ValueLowerThanMinimum => "value-lower-than-minimum",
            Self::ValueGreaterOrEqualThanMaximum => "value-greater-or-equal-than-maximum",
            Self::ValueLowerOrEqualThanMinimum => "value-lower-or-equal-than-minimum",
            Self::ValueNotDivisibleBy => "value-not-divisible-by",
            Self::MaxLengthExceeded => "max-length-exceeded",
            Self::MinLengthNotReached => "min-length-not-reached",
            Self::PatternNotMatched => "pattern-not-matched",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Location in the instance, from the root.
    pub path: InstancePath,
    /// What rule failed.
    #[serde(rename = "error")]
    pub code: ViolationCode,
    /// Code-specific context (expected vs actual, offending keys, ...).
    pub data: Value,
    /// Property that caused the violation when it is not the one at `path`
    /// (e.g. the property whose `requires` names a missing sibling).
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Violation {
    /// Render as a JSON value without going through a serializer.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert(
            "path".to_string(),
            Value::Array(
                self.path
                    .segments()
                    .iter()
                    .map(|s| match s {
                        jsv_core::PathSegment::Index(i) => Value::from(*i),
                        jsv_core::PathSegment::Key(k) => Value::String(k.clone()),
                    })
                    .collect(),
            ),
        );
        out.insert("error".to_string(), Value::String(self.code.as_str().to_string()));
        out.insert("data".to_string(), self.data.clone());
        if let Some(reference) = &self.reference {
            out.insert("ref".to_string(), Value::String(reference.clone()));
        }
        Value::Object(out)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.path, self.code)?;
        if !self.data.is_null() {
            write!(f, " {}", self.data)?;
        }
        if let Some(reference) = &self.reference {
            write!(f, " (from '{reference}')")?;
        }
        Ok(())
    }
}

/// Ordered collection of violations from one validation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Render the whole list as a JSON array.
    pub fn to_json(&self) -> Value {
        Value::Array(self.violations.iter().map(Violation::to_json).collect())
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self { violations }
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Violation {
        Violation {
            path: InstancePath::root().child("lines").child(0usize),
            code: ViolationCode::Required,
            data: json!({"required-by": "street"}),
            reference: Some("street".to_string()),
        }
    }

    #[test]
    fn test_serde_format_matches_as_str() {
        for code in ViolationCode::all_codes() {
            let json = serde_json::to_string(code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_to_json_matches_serde() {
        let v = sample();
        assert_eq!(v.to_json(), serde_json::to_value(&v).unwrap());
        assert_eq!(
            v.to_json(),
            json!({
                "path": ["lines", 0],
                "error": "required",
                "data": {"required-by": "street"},
                "ref": "street"
            })
        );
    }

    #[test]
    fn test_ref_omitted_when_absent() {
        let mut v = sample();
        v.reference = None;
        let json = serde_json::to_value(&v).unwrap();
        assert!(json.get("ref").is_none());
        assert!(v.to_json().get("ref").is_none());
    }

    #[test]
    fn test_violation_display_format() {
        let display = sample().to_string();
        assert!(display.contains("/lines/0"));
        assert!(display.contains("required"));
        assert!(display.contains("(from 'street')"));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            path: InstancePath::root(),
            code: ViolationCode::Type,
            data: json!({"expected": "object", "actual": "string"}),
            reference: None,
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn test_violations_collection() {
        let list = Violations::from(vec![sample(), sample()]);
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        assert_eq!(list.to_json().as_array().map(Vec::len), Some(2));
        assert_eq!(list.to_string().lines().count(), 2);
        assert!(Violations::default().is_empty());
    }
}
