//! # jsv-schema: Schema Validation Engine
//!
//! Validates JSON values against draft-3 style schemas: typed properties,
//! union types, `$ref` to stored documents, `extends`, tuple and
//! homogeneous arrays, numeric and string constraints.
//!
//! ## Entry Points
//!
//! - [`Validator`] owns a [`Resolver`] over any [`SchemaStore`] and the
//!   base [`TypeRegistry`]. `validate` / `is_valid` / `collect` run one
//!   top-level call each.
//! - [`validate()`] / [`is_valid()`] are shorthand over a process-wide
//!   validator rooted at `$JSV_SCHEMA_DIR`.
//!
//! ## Engine Layout
//!
//! Dispatch (`node`) classifies each schema node into exactly one strategy:
//! the object validator (`object`), the array validator (`array`, built on
//! the object validator), the numeric and string leaves, or union / enum
//! (`union`). Strategies recurse back through dispatch, threading an
//! explicit per-call context that owns the violation log and the current
//! instance path.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsv-core` internally.
//! - Non-conformance is returned as [`Violations`]; a schema or store that
//!   cannot be used is a [`ValidationError`]. The two never mix.

mod array;
mod context;
mod keywords;
mod node;
mod numeric;
mod object;
pub mod registry;
pub mod resolver;
pub mod store;
mod string;
mod union;
pub mod validate;
pub mod violation;

pub use registry::{predicate, Predicate, TypeRegistry};
pub use resolver::{Resolve, Resolver};
pub use store::{decode_document, DecodeError, DirectoryStore, DocumentFormat, MemoryStore, SchemaStore};
pub use validate::{
    default_validator, is_valid, validate, Mode, Outcome, ValidateOptions, ValidationError,
    Validator,
};
pub use violation::{Violation, ViolationCode, Violations};
