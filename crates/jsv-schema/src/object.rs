//! # Object Validator
//!
//! Validates mappings: requiredness, `extends`, `properties`,
//! `patternProperties`, `additionalProperties` and `requires`.
//!
//! The per-property work runs over [`Members`], which is either a real JSON
//! object or an array viewed as an index-keyed mapping. The array validator
//! uses the latter to get tuple typing, homogeneous typing and extra-element
//! policy from the same code path.

use std::collections::HashMap;

use jsv_core::{PathSegment, ValueKind};
use serde_json::{json, Map, Value};

use crate::context::{Scope, ValidationContext};
use crate::keywords::{self, is_required, truthy, Node};
use crate::node::{dispatch, validate_common};
use crate::validate::ValidationError;
use crate::violation::ViolationCode;

/// The key/value pairs an object schema is applied to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Members<'a> {
    /// A JSON object.
    Map(&'a Map<String, Value>),
    /// An array seen as `{0: items[0], 1: items[1], ...}`.
    Items(&'a [Value]),
}

impl<'a> Members<'a> {
    /// Value stored under `name`. Array positions answer to their decimal
    /// form only (`"1"`, not `"01"`).
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        match self {
            Self::Map(map) => map.get(name),
            Self::Items(items) => name
                .parse::<usize>()
                .ok()
                .filter(|i| i.to_string() == name)
                .and_then(|i| items.get(i)),
        }
    }

    /// Whether `name` is present (even with a `null` value).
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Path segment naming `name` in this collection, present or not.
    pub fn segment(&self, name: &str) -> PathSegment {
        match self {
            Self::Items(_) => match name.parse::<usize>() {
                Ok(i) if i.to_string() == name => PathSegment::Index(i),
                _ => PathSegment::Key(name.to_string()),
            },
            Self::Map(_) => PathSegment::Key(name.to_string()),
        }
    }

    /// All pairs in instance order.
    pub fn entries(&self) -> Vec<(PathSegment, &'a Value)> {
        match self {
            Self::Map(map) => map
                .iter()
                .map(|(k, v)| (PathSegment::Key(k.clone()), v))
                .collect(),
            Self::Items(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (PathSegment::Index(i), v))
                .collect(),
        }
    }
}

/// Effective property-name → schema table, in insertion order.
#[derive(Debug, Default)]
struct PropertyTable<'s> {
    order: Vec<String>,
    schemas: HashMap<String, &'s Value>,
}

impl<'s> PropertyTable<'s> {
    /// Later inserts for the same name replace the schema but keep the
    /// original position.
    fn insert(&mut self, name: &str, schema: &'s Value) {
        if self.schemas.insert(name.to_string(), schema).is_none() {
            self.order.push(name.to_string());
        }
    }

    fn get(&self, name: &str) -> Option<&'s Value> {
        self.schemas.get(name).copied()
    }

    fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &'s Value)> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.schemas.get(name).map(|s| (name.as_str(), *s)))
    }
}

/// Validate an object-typed node.
pub(crate) fn validate(
    node: &Node,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    validate_common(node, "object", instance, scope, ctx)?;

    match keywords::get(node, "extends") {
        None => {}
        Some(Value::Array(parents)) => {
            for parent in parents {
                dispatch(parent, instance, scope, ctx)?;
            }
        }
        Some(parent) => dispatch(parent, instance, scope, ctx)?,
    }

    let members = instance.as_object().map(Members::Map);
    validate_members(node, members, instance, scope, ctx)
}

/// Property-level checks shared by objects and arrays.
///
/// `members` is `None` when the instance is not a mapping; `instance` is
/// only used for reporting in that case.
pub(crate) fn validate_members(
    node: &Node,
    members: Option<Members<'_>>,
    instance: &Value,
    scope: Scope<'_>,
    ctx: &mut ValidationContext,
) -> Result<(), ValidationError> {
    let present = |name: &str| members.is_some_and(|m| m.contains(name));
    let segment = |name: &str| match members {
        Some(m) => m.segment(name),
        None => PathSegment::Key(name.to_string()),
    };

    // Property-list form of `required`.
    if let Some(Value::Array(names)) = keywords::get(node, "required") {
        for name in names {
            let name = name.as_str().ok_or_else(|| ValidationError::MalformedSchema {
                path: ctx.path().clone(),
                reason: format!("'required' entries must be property names, found {name}"),
            })?;
            if !present(name) {
                ctx.report_at(segment(name), ViolationCode::Required, json!({ "property": name }), None);
            }
        }
    }

    let table = property_table(node, members, ctx)?;

    for (name, schema) in table.iter() {
        if is_required(schema) && !present(name) {
            ctx.report_at(segment(name), ViolationCode::Required, json!({ "property": name }), None);
        }
    }

    let Some(members) = members else {
        ctx.report(
            ViolationCode::ObjectsMustBeMaps,
            json!({ "actual": ValueKind::of(instance).as_str() }),
        );
        return Ok(());
    };

    let additional = keywords::get(node, "additionalProperties");
    let additional_schema = additional.filter(|a| a.is_object() || a.is_string());
    let entries = members.entries();

    for (segment, value) in &entries {
        let name = segment.name();
        let Some(schema) = table.get(&name).or(additional_schema) else {
            continue;
        };

        let requires = match schema.as_object() {
            Some(property) => keywords::string(property, "requires", ctx.path())?,
            None => None,
        };
        if let Some(other) = requires {
            if truthy(value) && !members.contains(other) {
                ctx.report_at(
                    members.segment(other),
                    ViolationCode::Required,
                    json!({ "property": other, "required-by": name }),
                    Some(name.to_string()),
                );
            }
        }

        if !is_required(schema) && value.is_null() {
            continue;
        }
        ctx.push(segment.clone());
        let result = dispatch(schema, value, scope, ctx);
        ctx.pop();
        result?;
    }

    if matches!(additional, Some(Value::Bool(false))) {
        let extra: Vec<Value> = entries
            .iter()
            .map(|(segment, _)| segment.name())
            .filter(|name| !table.contains(name))
            .map(|name| Value::String(name.into_owned()))
            .collect();
        if !extra.is_empty() {
            ctx.report(
                ViolationCode::AdditionalPropertiesNotAllowed,
                json!({ "properties": extra }),
            );
        }
    }

    Ok(())
}

/// `properties` plus one entry per instance key matched by a
/// `patternProperties` regex. Pattern matches override explicit entries.
fn property_table<'s>(
    node: &'s Node,
    members: Option<Members<'_>>,
    ctx: &ValidationContext,
) -> Result<PropertyTable<'s>, ValidationError> {
    let mut table = PropertyTable::default();
    if let Some(properties) = keywords::mapping(node, "properties", ctx.path())? {
        for (name, schema) in properties {
            table.insert(name, schema);
        }
    }

    if let Some(patterns) = keywords::mapping(node, "patternProperties", ctx.path())? {
        let keys: Vec<String> = members
            .map(|m| m.entries().into_iter().map(|(s, _)| s.name().into_owned()).collect())
            .unwrap_or_default();
        for (pattern, schema) in patterns {
            let regex = keywords::compile(pattern, ctx.path())?;
            for key in keys.iter().filter(|k| regex.is_match(k)) {
                table.insert(key, schema);
            }
        }
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_of_map() {
        let value = json!({"b": 1, "a": null});
        let members = Members::Map(value.as_object().unwrap());
        assert!(members.contains("a"));
        assert!(!members.contains("c"));
        let names: Vec<String> = members
            .entries()
            .into_iter()
            .map(|(s, _)| s.name().into_owned())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_members_of_items() {
        let value = json!(["x", "y"]);
        let members = Members::Items(value.as_array().unwrap());
        assert_eq!(members.get("1"), Some(&json!("y")));
        assert_eq!(members.get("01"), None);
        assert_eq!(members.get("2"), None);
        assert_eq!(members.get("first"), None);
        assert_eq!(members.entries()[0].0, PathSegment::Index(0));
        assert_eq!(members.segment("5"), PathSegment::Index(5));
        assert_eq!(members.segment("x"), PathSegment::Key("x".to_string()));
    }

    #[test]
    fn test_property_table_pattern_overrides() {
        let node = json!({
            "properties": {"id": {"type": "string"}, "name": {"type": "string"}},
            "patternProperties": {"^i": {"type": "integer"}}
        });
        let instance = json!({"id": 1, "idx": 2, "name": "n"});
        let ctx = ValidationContext::new();
        let table = property_table(
            node.as_object().unwrap(),
            Some(Members::Map(instance.as_object().unwrap())),
            &ctx,
        )
        .unwrap();
        assert_eq!(table.get("id"), Some(&json!({"type": "integer"})));
        assert_eq!(table.get("idx"), Some(&json!({"type": "integer"})));
        assert_eq!(table.get("name"), Some(&json!({"type": "string"})));
        let order: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(order, vec!["id", "name", "idx"]);
    }
}
