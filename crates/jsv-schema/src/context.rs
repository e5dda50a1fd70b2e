//! # Validation Context
//!
//! Per-call mutable state, passed explicitly through every recursive call:
//! the append-only violation log and the instance path currently being
//! descended. One context is created per top-level call; union branches
//! run in disposable [`ValidationContext::isolated`] ones.
//!
//! [`Scope`] carries the read-only half: the type registry in effect for the
//! call and the reference resolver.

use jsv_core::{InstancePath, PathSegment};
use serde_json::Value;

use crate::registry::TypeRegistry;
use crate::resolver::Resolve;
use crate::validate::ValidationError;
use crate::violation::{Violation, ViolationCode};

/// Read-only environment of one validation call.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    /// Merged (or passthrough) type table, reused verbatim at every level.
    pub registry: &'a TypeRegistry,
    /// `$ref` resolver.
    pub resolver: &'a dyn Resolve,
    /// Optional bound on dispatch depth.
    pub max_depth: Option<usize>,
}

/// Violation log plus current instance path.
#[derive(Debug, Default)]
pub(crate) struct ValidationContext {
    violations: Vec<Violation>,
    path: InstancePath,
    depth: usize,
}

impl ValidationContext {
    /// Fresh context at the instance root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh log and path for one union branch. Dispatch depth carries
    /// over so a depth limit still applies inside the branch.
    pub fn isolated(&self) -> Self {
        Self {
            violations: Vec::new(),
            path: InstancePath::root(),
            depth: self.depth,
        }
    }

    /// Current instance path.
    pub fn path(&self) -> &InstancePath {
        &self.path
    }

    /// Descend into a child value.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.path.push(segment);
    }

    /// Return from a child value.
    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// Record a violation at the current path.
    pub fn report(&mut self, code: ViolationCode, data: Value) {
        self.violations.push(Violation {
            path: self.path.clone(),
            code,
            data,
            reference: None,
        });
    }

    /// Record a violation one level below the current path, e.g. for a
    /// missing property.
    pub fn report_at(
        &mut self,
        segment: impl Into<PathSegment>,
        code: ViolationCode,
        data: Value,
        reference: Option<String>,
    ) {
        self.violations.push(Violation {
            path: self.path.child(segment),
            code,
            data,
            reference,
        });
    }

    /// Enter one dispatch level, failing when the limit is exceeded.
    pub fn enter(&mut self, max_depth: Option<usize>) -> Result<(), ValidationError> {
        self.depth += 1;
        match max_depth {
            Some(limit) if self.depth > limit => Err(ValidationError::DepthExceeded {
                limit,
                path: self.path.clone(),
            }),
            _ => Ok(()),
        }
    }

    /// Leave one dispatch level.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Number of violations recorded so far.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Consume the context, keeping its violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
