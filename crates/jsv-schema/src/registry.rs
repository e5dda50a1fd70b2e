//! # Basic Type Registry
//!
//! Maps type names (`"object"`, `"integer"`, custom names) to predicates
//! over instance values. Common validation looks every declared type up
//! here.
//!
//! Callers broaden the built-in table with *extra* predicates: on a name
//! collision the effective predicate is the logical OR of both, so an extra
//! predicate can accept more values but never reject a value the built-in
//! accepts. A merged table can also be handed back in verbatim as a
//! *passthrough* registry, which skips merging entirely.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsv_core::{PredicateError, ValueKind};
use serde_json::Value;

/// A type predicate. Returning `Err` aborts the enclosing validation call.
pub type Predicate = Arc<dyn Fn(&Value) -> Result<bool, PredicateError> + Send + Sync>;

/// Wrap a closure as a [`Predicate`].
pub fn predicate<F>(f: F) -> Predicate
where
    F: Fn(&Value) -> Result<bool, PredicateError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Table of type predicates, cheap to clone.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    predicates: HashMap<String, Predicate>,
}

impl TypeRegistry {
    /// An empty table. Useful as a base for fully custom type systems.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table: one entry per [`ValueKind`] plus `any`.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for kind in ValueKind::all_kinds() {
            let kind = *kind;
            registry.insert(kind.as_str(), predicate(move |v| Ok(kind.matches(v))));
        }
        registry.insert("any", predicate(|_| Ok(true)));
        registry
    }

    /// Set `name` to exactly `predicate`, replacing any existing entry.
    pub fn insert(&mut self, name: impl Into<String>, predicate: Predicate) {
        self.predicates.insert(name.into(), predicate);
    }

    /// OR-merge `predicate` into the entry for `name`.
    ///
    /// The existing predicate is consulted first; the new one only runs
    /// when the existing one rejects.
    pub fn extend(&mut self, name: impl Into<String>, predicate: Predicate) {
        let name = name.into();
        let merged = match self.predicates.remove(&name) {
            Some(existing) => {
                let added = predicate;
                self::predicate(move |v| Ok(existing(v)? || added(v)?))
            }
            None => predicate,
        };
        self.predicates.insert(name, merged);
    }

    /// A copy of this table with every entry of `extra` OR-merged in.
    pub fn merged<'a, I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Predicate)>,
    {
        let mut out = self.clone();
        for (name, predicate) in extra {
            out.extend(name.clone(), Arc::clone(predicate));
        }
        out
    }

    /// Look up the predicate for a type name.
    pub fn get(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Whether a type name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.predicates.contains_key(name)
    }

    /// Registered names, sorted alphabetically.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.predicates.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}
