//! # Array Validator
//!
//! Length bounds and `uniqueItems` are checked here directly. `items` is
//! reduced to object validation: the array is viewed as an index-keyed
//! mapping and checked against a synthetic object schema.
//!
//! - `items: <schema>` becomes `{type: object, additionalProperties: <schema>}`,
//!   so every index goes through the additional-properties path.
//! - `items: [<s0>, <s1>, ...]` (tuple) becomes the array schema itself with
//!   `type: object` and `properties: {"0": s0, "1": s1, ...}`. Its
//!   `additionalProperties` governs positions past the tuple.

use std::collections::HashSet;

use jsv_core::CanonicalBytes;
use serde_json::{json, Map, Value};

use crate::context::{Scope, ValidationContext};
use crate::keywords::{self, truthy, Node};
use crate::node::validate_common;
use crate::object::{self, Members};
use crate::validate::ValidationError;
use crate::violation::ViolationCode;

/// Validate an array-typed node.
pub(crate) fn validate(
    node: &Node,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    validate_common(node, "array", instance, scope, ctx)?;

    let Some(items) = instance.as_array() else {
        return Ok(());
    };

    let len = items.len() as u64;
    if let Some(min) = keywords::count(node, "minItems", ctx.path())? {
        if len < min {
            ctx.report(ViolationCode::MinItems, json!({ "expected": min, "actual": len }));
        }
    }
    if let Some(max) = keywords::count(node, "maxItems", ctx.path())? {
        if len > max {
            ctx.report(ViolationCode::MaxItems, json!({ "expected": max, "actual": len }));
        }
    }

    if keywords::get(node, "uniqueItems").is_some_and(truthy) {
        if let Some(duplicate) = first_duplicate(items)? {
            ctx.report(ViolationCode::UniqueItems, json!({ "duplicate": duplicate }));
        }
    }

    if let Some(synthetic) = synthetic_schema(node, ctx)? {
        object::validate_members(&synthetic, Some(Members::Items(items)), instance, scope, ctx)?;
    }
    Ok(())
}

/// First element equal (by value) to an earlier one, scanning left to right.
fn first_duplicate(items: &[Value]) -> Result<Option<&Value>, ValidationError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(CanonicalBytes::new(item)?) {
            return Ok(Some(item));
        }
    }
    Ok(None)
}

/// Object schema equivalent to this node's `items`, if any.
fn synthetic_schema(node: &Node, ctx: &ValidationContext) -> Result<Option<Node>, ValidationError> {
    match keywords::get(node, "items") {
        None => Ok(None),
        Some(Value::Array(tuple)) => {
            let mut synthetic = node.clone();
            let properties: Map<String, Value> = tuple
                .iter()
                .enumerate()
                .map(|(i, schema)| (i.to_string(), schema.clone()))
                .collect();
            synthetic.insert("type".to_string(), json!("object"));
            synthetic.insert("properties".to_string(), Value::Object(properties));
            synthetic.remove("items");
            synthetic.remove("extends");
            Ok(Some(synthetic))
        }
        Some(schema @ (Value::Object(_) | Value::String(_))) => {
            let mut synthetic = Node::new();
            synthetic.insert("type".to_string(), json!("object"));
            synthetic.insert("additionalProperties".to_string(), schema.clone());
            Ok(Some(synthetic))
        }
        Some(other) => Err(ValidationError::MalformedSchema {
            path: ctx.path().clone(),
            reason: format!("'items' must be a schema or an array of schemas, found {other}"),
        }),
    }
}
