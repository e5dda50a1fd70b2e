//! Typed access to schema keywords.
//!
//! A keyword holding the wrong JSON kind (`"maxLength": "ten"`) makes the
//! schema unusable, so every accessor here fails with
//! [`ValidationError::MalformedSchema`] instead of guessing.

use jsv_core::InstancePath;
use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::validate::ValidationError;

pub(crate) type Node = Map<String, Value>;

/// Truthiness as the schema language sees it: only `null` and `false` are
/// falsy.
pub(crate) fn truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Whether a schema node demands presence of its value.
///
/// `required` wins whenever it is present; otherwise the node is required
/// only when `optional` is literally `false`. A sequence-valued `required`
/// is the property-list form and does not count.
pub(crate) fn node_required(node: &Node) -> bool {
    match node.get("required") {
        Some(Value::Null) | Some(Value::Array(_)) | None => {
            matches!(node.get("optional"), Some(Value::Bool(false)))
        }
        Some(flag) => truthy(flag),
    }
}

/// [`node_required`] for any schema value; bare type names are never
/// required.
pub(crate) fn is_required(schema: &Value) -> bool {
    schema.as_object().is_some_and(node_required)
}

/// Look up a keyword, treating an explicit `null` as absent.
pub(crate) fn get<'s>(node: &'s Node, key: &str) -> Option<&'s Value> {
    node.get(key).filter(|v| !v.is_null())
}

fn malformed(path: &InstancePath, key: &str, expected: &str, found: &Value) -> ValidationError {
    ValidationError::MalformedSchema {
        path: path.clone(),
        reason: format!("'{key}' must be {expected}, found {found}"),
    }
}

/// A non-negative integer keyword (`minItems`, `maxLength`, ...).
pub(crate) fn count(node: &Node, key: &str, path: &InstancePath) -> Result<Option<u64>, ValidationError> {
    match get(node, key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
            .map(Some)
            .ok_or_else(|| malformed(path, key, "a non-negative integer", v)),
    }
}

/// A numeric keyword (`minimum`, `divisibleBy`, ...).
pub(crate) fn number<'s>(
    node: &'s Node,
    key: &str,
    path: &InstancePath,
) -> Result<Option<&'s Number>, ValidationError> {
    match get(node, key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n)),
        Some(v) => Err(malformed(path, key, "a number", v)),
    }
}

/// A string keyword (`pattern`, `requires`, `$ref`).
pub(crate) fn string<'s>(
    node: &'s Node,
    key: &str,
    path: &InstancePath,
) -> Result<Option<&'s str>, ValidationError> {
    match get(node, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(v) => Err(malformed(path, key, "a string", v)),
    }
}

/// A mapping keyword (`properties`, `patternProperties`).
pub(crate) fn mapping<'s>(
    node: &'s Node,
    key: &str,
    path: &InstancePath,
) -> Result<Option<&'s Node>, ValidationError> {
    match get(node, key) {
        None => Ok(None),
        Some(Value::Object(m)) => Ok(Some(m)),
        Some(v) => Err(malformed(path, key, "an object", v)),
    }
}

/// A sequence keyword (`enum`).
pub(crate) fn sequence<'s>(
    node: &'s Node,
    key: &str,
    path: &InstancePath,
) -> Result<Option<&'s [Value]>, ValidationError> {
    match get(node, key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.as_slice())),
        Some(v) => Err(malformed(path, key, "an array", v)),
    }
}

/// Compile a `pattern` / `patternProperties` regex.
pub(crate) fn compile(pattern: &str, path: &InstancePath) -> Result<Regex, ValidationError> {
    Regex::new(pattern).map_err(|e| ValidationError::InvalidPattern {
        pattern: pattern.to_string(),
        path: path.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(v: Value) -> Node {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_requiredness_matrix() {
        // (required, optional) -> expected
        let cases = [
            (Some(true), Some(true), true),
            (Some(true), Some(false), true),
            (Some(true), None, true),
            (Some(false), Some(true), false),
            (Some(false), Some(false), false),
            (Some(false), None, false),
            (None, Some(true), false),
            (None, Some(false), true),
            (None, None, false),
        ];
        for (required, optional, expected) in cases {
            let mut n = Node::new();
            if let Some(r) = required {
                n.insert("required".into(), json!(r));
            }
            if let Some(o) = optional {
                n.insert("optional".into(), json!(o));
            }
            assert_eq!(
                node_required(&n),
                expected,
                "required={required:?} optional={optional:?}"
            );
        }
    }

    #[test]
    fn test_required_list_is_not_a_flag() {
        assert!(!node_required(&node(json!({"required": ["a"]}))));
        assert!(node_required(&node(json!({"required": ["a"], "optional": false}))));
    }

    #[test]
    fn test_bare_type_name_not_required() {
        assert!(!is_required(&json!("string")));
        assert!(is_required(&json!({"required": true})));
    }

    #[test]
    fn test_truthy() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(truthy(&json!(0)));
        assert!(truthy(&json!("")));
        assert!(truthy(&json!([])));
    }

    #[test]
    fn test_count_accepts_integral_floats() {
        let path = InstancePath::root();
        assert_eq!(count(&node(json!({"minItems": 2})), "minItems", &path).unwrap(), Some(2));
        assert_eq!(count(&node(json!({"minItems": 2.0})), "minItems", &path).unwrap(), Some(2));
        assert!(count(&node(json!({"minItems": -1})), "minItems", &path).is_err());
        assert!(count(&node(json!({"minItems": "2"})), "minItems", &path).is_err());
        assert_eq!(count(&node(json!({"minItems": null})), "minItems", &path).unwrap(), None);
    }

    #[test]
    fn test_wrong_kinds_are_malformed() {
        let path = InstancePath::root();
        let n = node(json!({"pattern": 5, "minimum": "0", "properties": [], "enum": {}}));
        assert!(matches!(
            string(&n, "pattern", &path),
            Err(ValidationError::MalformedSchema { .. })
        ));
        assert!(number(&n, "minimum", &path).is_err());
        assert!(mapping(&n, "properties", &path).is_err());
        assert!(sequence(&n, "enum", &path).is_err());
    }

    #[test]
    fn test_invalid_regex() {
        let err = compile("([a-z", &InstancePath::root()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { .. }));
    }
}
