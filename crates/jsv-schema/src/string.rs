//! # String Leaf
//!
//! `maxLength` / `minLength` count Unicode scalar values. `pattern` is a
//! search: any matching substring satisfies it, so schemas that want a
//! whole-string match anchor with `^...$` themselves.

use serde_json::{json, Value};

use crate::context::{Scope, ValidationContext};
use crate::keywords::{self, Node};
use crate::node::validate_common;
use crate::validate::ValidationError;
use crate::violation::ViolationCode;

/// Validate a string-typed node.
pub(crate) fn validate(
    node: &Node,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    validate_common(node, "string", instance, scope, ctx)?;

    let Value::String(s) = instance else {
        return Ok(());
    };

    let len = s.chars().count() as u64;
    if let Some(max) = keywords::count(node, "maxLength", ctx.path())? {
        if len > max {
            ctx.report(
                ViolationCode::MaxLengthExceeded,
                json!({ "expected": max, "actual": len }),
            );
        }
    }
    if let Some(min) = keywords::count(node, "minLength", ctx.path())? {
        if len < min {
            ctx.report(
                ViolationCode::MinLengthNotReached,
                json!({ "expected": min, "actual": len }),
            );
        }
    }

    if let Some(pattern) = keywords::string(node, "pattern", ctx.path())? {
        let regex = keywords::compile(pattern, ctx.path())?;
        if !regex.is_match(s) {
            ctx.report(
                ViolationCode::PatternNotMatched,
                json!({ "pattern": pattern, "actual": s }),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::store::MemoryStore;
    use crate::validate::{ValidateOptions, ValidationError, Validator};
    use crate::violation::{ViolationCode, Violations};
    use serde_json::{json, Value};

    fn collect(schema: Value, instance: Value) -> Result<Violations, ValidationError> {
        Validator::new(MemoryStore::new()).collect(&schema, &instance, &ValidateOptions::new())
    }

    #[test]
    fn test_lengths_count_characters() {
        let schema = json!({"type": "string", "minLength": 2, "maxLength": 3});
        assert_eq!(collect(schema.clone(), json!("żółw")).unwrap().len(), 1);
        assert!(collect(schema.clone(), json!("żół")).unwrap().is_empty());
        let short = collect(schema, json!("a")).unwrap();
        assert_eq!(short.violations()[0].code, ViolationCode::MinLengthNotReached);
        assert_eq!(short.violations()[0].data, json!({"expected": 2, "actual": 1}));
    }

    #[test]
    fn test_pattern_is_a_search() {
        let schema = json!({"type": "string", "pattern": "[0-9]+"});
        assert!(collect(schema.clone(), json!("abc123def")).unwrap().is_empty());
        let list = collect(schema, json!("abc")).unwrap();
        assert_eq!(list.violations()[0].code, ViolationCode::PatternNotMatched);
    }

    #[test]
    fn test_constraints_skip_non_strings() {
        let schema = json!({"type": "string", "maxLength": 1, "pattern": "^a$"});
        let list = collect(schema, json!(12345)).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.violations()[0].code, ViolationCode::Type);
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let err = collect(json!({"type": "string", "pattern": "("}), json!("x")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }
}
