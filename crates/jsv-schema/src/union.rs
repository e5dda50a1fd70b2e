//! # Union Types and Enums
//!
//! A union (`"type": [...]`) is satisfied when any candidate validates with
//! zero violations. Each candidate runs in an isolated context, so a
//! failing branch never leaks violations into the caller's log. When every
//! branch fails, a single `matches-no-type-in-union` is recorded carrying
//! the shortest branch's violations (earliest wins ties).
//!
//! A type-name candidate is checked as the union node narrowed to that
//! name, so sibling keywords such as `maxLength` or `required` still apply
//! to it. A schema candidate is checked as written.

use jsv_core::values_equal;
use serde_json::{json, Value};

use crate::context::{Scope, ValidationContext};
use crate::keywords::Node;
use crate::node::dispatch;
use crate::validate::ValidationError;
use crate::violation::{Violation, ViolationCode};

/// Validate a union node.
///
/// A type-name candidate keeps every sibling keyword of the union node. A
/// `$ref` or `enum` beside the `type` list therefore classifies ahead of the
/// narrowed name and takes that candidate over, so `{"type": ["string",
/// "boolean"], "enum": ["a"]}` accepts only `"a"`. `integer` and `number`
/// candidates still classify as numeric first.
pub(crate) fn validate_union(
    node: &Node,
    candidates: &[Value],
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    let mut best: Option<Vec<Violation>> = None;

    for candidate in candidates {
        let mut branch = ctx.isolated();
        match candidate {
            Value::String(name) => {
                let mut narrowed = node.clone();
                narrowed.insert("type".to_string(), Value::String(name.clone()));
                dispatch(&Value::Object(narrowed), instance, scope, &mut branch)?;
            }
            schema => dispatch(schema, instance, scope, &mut branch)?,
        }

        let violations = branch.into_violations();
        if violations.is_empty() {
            return Ok(());
        }
        if best.as_ref().map_or(true, |b| violations.len() < b.len()) {
            best = Some(violations);
        }
    }

    let errors: Vec<Value> = best
        .unwrap_or_default()
        .iter()
        .map(Violation::to_json)
        .collect();
    ctx.report(
        ViolationCode::MatchesNoTypeInUnion,
        json!({ "instance": instance, "errors": errors }),
    );
    Ok(())
}

/// Validate an enum node. No type check applies.
pub(crate) fn validate_enum(
    members: &[Value],
    instance: &Value,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    for member in members {
        if values_equal(member, instance)? {
            return Ok(());
        }
    }
    ctx.report(
        ViolationCode::ValueNotInEnum,
        json!({ "expected": members, "actual": instance }),
    );
    Ok(())
}
