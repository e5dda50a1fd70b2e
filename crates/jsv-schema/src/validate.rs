//! # Top-Level Validation
//!
//! [`Validator`] owns the reference resolver and the base type registry and
//! runs one top-level call per `validate` invocation:
//!
//! 1. build the effective type registry for the call (base registry with
//!    the caller's extra predicates OR-merged in, or the passthrough
//!    registry verbatim),
//! 2. create a fresh [`ValidationContext`] at the instance root,
//! 3. dispatch the root (schema, instance) pair,
//! 4. reduce the violation log to the requested [`Mode`].
//!
//! Both modes share the same walk, so `is_valid` is always equivalent to
//! `collect(..).is_empty()`.
//!
//! ## Fatal Errors
//!
//! Violations are data. Anything that prevents the walk from giving a
//! meaningful answer (an unresolvable `$ref`, a malformed schema node, an
//! unknown type name, a bad regex, a failing predicate) aborts the call with
//! a [`ValidationError`] instead.

use std::sync::OnceLock;

use jsv_core::{CanonicalizationError, InstancePath, PredicateError, ResolutionError};
use serde_json::Value;
use thiserror::Error;

use crate::context::{Scope, ValidationContext};
use crate::node::dispatch;
use crate::registry::{Predicate, TypeRegistry};
use crate::resolver::{Resolve, Resolver};
use crate::store::{DirectoryStore, SchemaStore};
use crate::violation::Violations;

/// A validation call could not complete.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A `$ref` could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A schema node has a shape the engine cannot interpret.
    #[error("malformed schema at {path}: {reason}")]
    MalformedSchema {
        /// Instance path being validated when the node was reached.
        path: InstancePath,
        /// What is wrong with the node.
        reason: String,
    },

    /// A `type` names no registered predicate.
    #[error("unknown type '{name}' at {path}")]
    UnknownType {
        /// The unregistered type name.
        name: String,
        /// Instance path being validated.
        path: InstancePath,
    },

    /// A `pattern` or `patternProperties` key is not a valid regex.
    #[error("invalid pattern '{pattern}' at {path}: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Instance path being validated.
        path: InstancePath,
        /// Regex compiler message.
        reason: String,
    },

    /// A type predicate failed.
    #[error("predicate for type '{name}' failed at {path}")]
    Predicate {
        /// Type name whose predicate failed.
        name: String,
        /// Instance path being validated.
        path: InstancePath,
        /// The predicate's error.
        #[source]
        source: PredicateError,
    },

    /// A value could not be canonicalized for comparison.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Dispatch nested deeper than the configured limit.
    #[error("dispatch depth limit of {limit} exceeded at {path}")]
    DepthExceeded {
        /// The configured limit.
        limit: usize,
        /// Instance path where the limit was hit.
        path: InstancePath,
    },
}

/// Output shape of a validation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// `true` iff there are no violations.
    #[default]
    Boolean,
    /// The full violation list.
    Collect,
}

/// Result of a successful validation call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// [`Mode::Boolean`] answer.
    Valid(bool),
    /// [`Mode::Collect`] answer.
    Violations(Violations),
}

impl Outcome {
    /// Whether the instance conforms, in either mode.
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Valid(valid) => *valid,
            Self::Violations(violations) => violations.is_empty(),
        }
    }
}

/// Per-call options.
#[derive(Clone, Default)]
pub struct ValidateOptions {
    mode: Mode,
    extra: Vec<(String, Predicate)>,
    passthrough: Option<TypeRegistry>,
    max_depth: Option<usize>,
}

impl ValidateOptions {
    /// Default options: boolean mode, built-in types, no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the output shape.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// OR-merge a predicate for `name` into the type table for this call.
    pub fn with_extra_validator(mut self, name: impl Into<String>, predicate: Predicate) -> Self {
        self.extra.push((name.into(), predicate));
        self
    }

    /// Use `registry` verbatim as the type table, ignoring the validator's
    /// own registry and any extra validators.
    pub fn with_passthrough(mut self, registry: TypeRegistry) -> Self {
        self.passthrough = Some(registry);
        self
    }

    /// Abort with [`ValidationError::DepthExceeded`] past `limit` nested
    /// dispatches.
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }
}

impl std::fmt::Debug for ValidateOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let extra: Vec<&str> = self.extra.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("ValidateOptions")
            .field("mode", &self.mode)
            .field("extra", &extra)
            .field("passthrough", &self.passthrough)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Schema validator over a store of referenceable documents.
///
/// `Send + Sync`; share one instance (e.g. behind an `Arc`) so the
/// reference cache is reused across calls.
#[derive(Debug)]
pub struct Validator<S> {
    resolver: Resolver<S>,
    registry: TypeRegistry,
}

impl<S: SchemaStore> Validator<S> {
    /// Validator with the built-in type registry.
    pub fn new(store: S) -> Self {
        Self::with_registry(store, TypeRegistry::builtin())
    }

    /// Validator with a custom base type registry.
    pub fn with_registry(store: S, registry: TypeRegistry) -> Self {
        Self {
            resolver: Resolver::new(store),
            registry,
        }
    }

    /// The caching reference resolver.
    pub fn resolver(&self) -> &Resolver<S> {
        &self.resolver
    }

    /// The base type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Validate `instance` against `schema`.
    pub fn validate(
        &self,
        schema: &Value,
        instance: &Value,
        options: &ValidateOptions,
    ) -> Result<Outcome, ValidationError> {
        let violations = self.run(schema, instance, options)?;
        Ok(match options.mode {
            Mode::Boolean => Outcome::Valid(violations.is_empty()),
            Mode::Collect => Outcome::Violations(violations),
        })
    }

    /// Boolean-mode shorthand.
    pub fn is_valid(
        &self,
        schema: &Value,
        instance: &Value,
        options: &ValidateOptions,
    ) -> Result<bool, ValidationError> {
        Ok(self.run(schema, instance, options)?.is_empty())
    }

    /// Collect-mode shorthand.
    pub fn collect(
        &self,
        schema: &Value,
        instance: &Value,
        options: &ValidateOptions,
    ) -> Result<Violations, ValidationError> {
        self.run(schema, instance, options)
    }

    /// Validate against the stored document named by `locator`.
    pub fn validate_document(
        &self,
        locator: &str,
        instance: &Value,
        options: &ValidateOptions,
    ) -> Result<Outcome, ValidationError> {
        let schema = self.resolver.resolve(locator)?;
        self.validate(&schema, instance, options)
    }

    fn run(
        &self,
        schema: &Value,
        instance: &Value,
        options: &ValidateOptions,
    ) -> Result<Violations, ValidationError> {
        let merged;
        let registry = match &options.passthrough {
            Some(passthrough) => passthrough,
            None if options.extra.is_empty() => &self.registry,
            None => {
                merged = self
                    .registry
                    .merged(options.extra.iter().map(|(name, predicate)| (name, predicate)));
                &merged
            }
        };

        let scope = Scope {
            registry,
            resolver: &self.resolver,
            max_depth: options.max_depth,
        };
        let mut ctx = ValidationContext::new();
        dispatch(schema, instance, scope, &mut ctx).map_err(|error| {
            tracing::debug!(error = %error, "validation aborted");
            error
        })?;

        let violations = Violations::from(ctx.into_violations());
        tracing::debug!(violations = violations.len(), "validation finished");
        Ok(violations)
    }
}

/// Process-wide validator rooted at `$JSV_SCHEMA_DIR`.
pub fn default_validator() -> &'static Validator<DirectoryStore> {
    static DEFAULT: OnceLock<Validator<DirectoryStore>> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        let store = DirectoryStore::from_env();
        tracing::debug!(root = %store.root().display(), "initializing default validator");
        Validator::new(store)
    })
}

/// Validate with the process-wide validator.
pub fn validate(
    schema: &Value,
    instance: &Value,
    options: &ValidateOptions,
) -> Result<Outcome, ValidationError> {
    default_validator().validate(schema, instance, options)
}

/// Boolean-mode validation with the process-wide validator and default
/// options.
pub fn is_valid(schema: &Value, instance: &Value) -> Result<bool, ValidationError> {
    default_validator().is_valid(schema, instance, &ValidateOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::predicate;
    use crate::store::MemoryStore;
    use crate::violation::ViolationCode;
    use jsv_core::PathSegment;
    use serde_json::json;

    fn validator() -> Validator<MemoryStore> {
        Validator::new(MemoryStore::new())
    }

    fn collect(schema: Value, instance: Value) -> Violations {
        validator()
            .collect(&schema, &instance, &ValidateOptions::default())
            .unwrap()
    }

    #[test]
    fn test_modes_share_the_walk() {
        let v = validator();
        let schema = json!({"type": "object", "properties": {"id": {"type": "integer", "required": true}}});
        let instance = json!({});
        let boolean = v.validate(&schema, &instance, &ValidateOptions::new()).unwrap();
        let collected = v
            .validate(&schema, &instance, &ValidateOptions::new().mode(Mode::Collect))
            .unwrap();
        assert_eq!(boolean, Outcome::Valid(false));
        assert!(!collected.is_valid());
        match collected {
            Outcome::Violations(list) => assert_eq!(list.len(), 1),
            other => panic!("expected violations, got {other:?}"),
        }
    }

    #[test]
    fn test_basic_types() {
        assert!(collect(json!("string"), json!("x")).is_empty());
        assert!(collect(json!("boolean"), json!(false)).is_empty());
        assert!(collect(json!("any"), json!([1, {}])).is_empty());
        assert!(collect(json!({"type": "null", "required": true}), json!(null)).is_empty());
        let list = collect(json!({"type": "boolean"}), json!("yes"));
        assert_eq!(list.violations()[0].code, ViolationCode::Type);
        assert_eq!(list.violations()[0].data, json!({"expected": "boolean", "actual": "string"}));
    }

    #[test]
    fn test_integer_is_strict() {
        assert!(collect(json!("integer"), json!(3)).is_empty());
        assert_eq!(collect(json!("integer"), json!(3.0)).len(), 1);
        assert!(collect(json!("number"), json!(3)).is_empty());
    }

    #[test]
    fn test_unknown_type_is_fatal() {
        let err = validator()
            .is_valid(&json!("widget"), &json!(1), &ValidateOptions::new())
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownType { ref name, .. } if name == "widget"));
    }

    #[test]
    fn test_extra_validator_is_or_merged() {
        let v = validator();
        let options = ValidateOptions::new()
            .with_extra_validator("integer", predicate(|v| Ok(v.as_str() == Some("forty-two"))));
        assert!(v.is_valid(&json!("integer"), &json!("forty-two"), &options).unwrap());
        assert!(v.is_valid(&json!("integer"), &json!(42), &options).unwrap());
        assert!(!v.is_valid(&json!("integer"), &json!("seven"), &options).unwrap());
        assert!(!v
            .is_valid(&json!("integer"), &json!("forty-two"), &ValidateOptions::new())
            .unwrap());
    }

    #[test]
    fn test_extra_validator_defines_new_type() {
        let options = ValidateOptions::new()
            .with_extra_validator("even", predicate(|v| Ok(v.as_i64().is_some_and(|n| n % 2 == 0))));
        let schema = json!({"properties": {"n": {"type": "even"}}});
        assert!(validator().is_valid(&schema, &json!({"n": 4}), &options).unwrap());
        assert!(!validator().is_valid(&schema, &json!({"n": 5}), &options).unwrap());
    }

    #[test]
    fn test_passthrough_replaces_registry() {
        let mut registry = TypeRegistry::empty();
        registry.insert("object", predicate(|v| Ok(v.is_object())));
        registry.insert("string", predicate(|v| Ok(v.as_str().is_some_and(|s| s.len() > 3))));
        let options = ValidateOptions::new()
            .with_passthrough(registry)
            .with_extra_validator("string", predicate(|_| Ok(true)));

        let schema = json!({"properties": {"name": "string"}});
        assert!(validator().is_valid(&schema, &json!({"name": "long"}), &options).unwrap());
        assert!(!validator().is_valid(&schema, &json!({"name": "x"}), &options).unwrap());
        let err = validator()
            .is_valid(&json!("integer"), &json!(1), &options)
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownType { .. }));
    }

    #[test]
    fn test_predicate_error_is_fatal() {
        let options = ValidateOptions::new()
            .with_passthrough(TypeRegistry::empty())
            .with_extra_validator("x", predicate(|_| Ok(false)));
        // Passthrough wins, so "x" stays unknown.
        assert!(validator().is_valid(&json!("x"), &json!(1), &options).is_err());

        let mut registry = TypeRegistry::builtin();
        registry.insert("flaky", predicate(|_| Err(PredicateError::new("backend unavailable"))));
        let options = ValidateOptions::new().with_passthrough(registry);
        let err = validator()
            .collect(&json!({"properties": {"a": "flaky"}}), &json!({"a": 1}), &options)
            .unwrap_err();
        match err {
            ValidationError::Predicate { name, path, source } => {
                assert_eq!(name, "flaky");
                assert_eq!(path.to_string(), "/a");
                assert_eq!(source.message(), "backend unavailable");
            }
            other => panic!("expected predicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_document_by_locator() {
        let store = MemoryStore::new().with_document("id.json", json!({"type": "string", "minLength": 2}));
        let v = Validator::new(store);
        let options = ValidateOptions::new();
        assert!(v.validate_document("id.json", &json!("ab"), &options).unwrap().is_valid());
        assert!(!v.validate_document("id.json", &json!("a"), &options).unwrap().is_valid());
        assert!(matches!(
            v.validate_document("nope.json", &json!("a"), &options),
            Err(ValidationError::Resolution(ResolutionError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_max_depth_stops_self_reference() {
        let store = MemoryStore::new().with_document("loop.json", json!({"$ref": "loop.json"}));
        let v = Validator::new(store);
        let options = ValidateOptions::new().with_max_depth(32);
        let err = v.is_valid(&json!({"$ref": "loop.json"}), &json!(1), &options).unwrap_err();
        assert!(matches!(err, ValidationError::DepthExceeded { limit: 32, .. }));
    }

    #[test]
    fn test_validator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator<MemoryStore>>();
        assert_send_sync::<Validator<DirectoryStore>>();
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::UnknownType {
            name: "widget".to_string(),
            path: InstancePath::from(vec![PathSegment::from("a"), PathSegment::from(0usize)]),
        };
        assert_eq!(err.to_string(), "unknown type 'widget' at /a/0");
    }
}
