//! # Dispatch
//!
//! Classifies a schema node by its structural shape and routes the
//! (schema, instance) pair to exactly one strategy. Classification is a
//! closed enum, [`SchemaNode`]; the `match` in [`dispatch`] is exhaustive, so
//! a new node shape cannot be added without deciding how it validates.
//!
//! ## Priority
//!
//! 1. `type` is `integer`/`number` → numeric leaf
//! 2. bare string → `{ "type": <string> }`
//! 3. `type` is a sequence → union
//! 4. `$ref` → reference
//! 5. `enum` → enum
//! 6. `type` is any other name → object / array / string / basic type
//! 7. no `type` → object
//!
//! Dispatch itself never records a violation.

use jsv_core::{InstancePath, ValueKind};
use serde_json::{json, Value};

use crate::context::{Scope, ValidationContext};
use crate::keywords::{self, node_required, Node};
use crate::validate::ValidationError;
use crate::violation::ViolationCode;
use crate::{array, numeric, object, string, union};

/// Structural shape of a schema node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SchemaNode<'s> {
    /// `type` is `integer` or `number`.
    Numeric { node: &'s Node, type_name: &'s str },
    /// The node is a bare type name.
    Simple(&'s str),
    /// `type` lists candidate schemas / type names.
    Union { node: &'s Node, candidates: &'s [Value] },
    /// `$ref` to a stored schema.
    Ref(&'s str),
    /// Fixed set of allowed values.
    Enum(&'s [Value]),
    /// `type` is a plain name other than `integer`/`number`.
    Named { node: &'s Node, named: NamedType<'s> },
    /// No `type`: validated as an object.
    Default(&'s Node),
}

/// Routing target of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NamedType<'s> {
    Object,
    Array,
    String,
    /// `boolean`, `null`, `any`, or a caller-registered name: common
    /// validation only.
    Basic(&'s str),
}

impl<'s> SchemaNode<'s> {
    /// Classify `schema`. `path` only feeds error messages.
    pub fn classify(schema: &'s Value, path: &InstancePath) -> Result<Self, ValidationError> {
        let node = match schema {
            Value::String(name) => return Ok(Self::Simple(name.as_str())),
            Value::Object(node) => node,
            other => {
                return Err(ValidationError::MalformedSchema {
                    path: path.clone(),
                    reason: format!(
                        "schema must be an object or a type name, found {}",
                        ValueKind::of(other)
                    ),
                })
            }
        };

        let type_name = match keywords::get(node, "type") {
            None => None,
            Some(Value::String(t)) if t == "integer" || t == "number" => {
                return Ok(Self::Numeric { node, type_name: t.as_str() })
            }
            Some(Value::String(t)) => Some(t.as_str()),
            Some(Value::Array(candidates)) => {
                return Ok(Self::Union { node, candidates: candidates.as_slice() })
            }
            Some(other) => {
                return Err(ValidationError::MalformedSchema {
                    path: path.clone(),
                    reason: format!("'type' must be a string or an array, found {other}"),
                })
            }
        };

        if let Some(locator) = keywords::string(node, "$ref", path)? {
            return Ok(Self::Ref(locator));
        }
        if let Some(members) = keywords::sequence(node, "enum", path)? {
            return Ok(Self::Enum(members));
        }

        Ok(match type_name {
            Some("object") => Self::Named { node, named: NamedType::Object },
            Some("array") => Self::Named { node, named: NamedType::Array },
            Some("string") => Self::Named { node, named: NamedType::String },
            Some(other) => Self::Named { node, named: NamedType::Basic(other) },
            None => Self::Default(node),
        })
    }
}

/// Validate `instance` against `schema`, recording into `ctx`.
pub(crate) fn dispatch(
    schema: &Value,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    ctx.enter(scope.max_depth)?;
    let result = route(schema, instance, scope, ctx);
    ctx.leave();
    result
}

fn route(
    schema: &Value,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    match SchemaNode::classify(schema, ctx.path())? {
        SchemaNode::Numeric { node, type_name } => {
            numeric::validate(node, type_name, instance, scope, ctx)
        }
        SchemaNode::Simple(name) => dispatch(&json!({ "type": name }), instance, scope, ctx),
        SchemaNode::Union { node, candidates } => {
            union::validate_union(node, candidates, instance, scope, ctx)
        }
        SchemaNode::Ref(locator) => {
            let resolved = scope.resolver.resolve(locator)?;
            dispatch(&resolved, instance, scope, ctx)
        }
        SchemaNode::Enum(members) => union::validate_enum(members, instance, ctx),
        SchemaNode::Named { node, named } => match named {
            NamedType::Object => object::validate(node, instance, scope, ctx),
            NamedType::Array => array::validate(node, instance, scope, ctx),
            NamedType::String => string::validate(node, instance, scope, ctx),
            NamedType::Basic(type_name) => validate_common(node, type_name, instance, scope, ctx),
        },
        SchemaNode::Default(node) => object::validate(node, instance, scope, ctx),
    }
}

/// Check the instance kind against the resolved type through the registry.
///
/// Skipped when the instance is `null` and the node is not required. An
/// unregistered type name fails even then.
pub(crate) fn validate_common(
    node: &Node,
    type_name: &str,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    let predicate = scope
        .registry
        .get(type_name)
        .ok_or_else(|| ValidationError::UnknownType {
            name: type_name.to_string(),
            path: ctx.path().clone(),
        })?;

    if instance.is_null() && !node_required(node) {
        return Ok(());
    }

    let accepted = predicate(instance).map_err(|source| ValidationError::Predicate {
        name: type_name.to_string(),
        path: ctx.path().clone(),
        source,
    })?;
    if !accepted {
        ctx.report(
            ViolationCode::Type,
            json!({ "expected": type_name, "actual": ValueKind::of(instance).as_str() }),
        );
    }
    Ok(())
}
