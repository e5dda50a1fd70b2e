//! # jsv-core: Foundational Types for jsv
//!
//! This crate is the leaf of the jsv workspace. It defines the small set of
//! primitives the validation engine and its collaborators share. It depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One `ValueKind` enum.** The runtime kinds of a JSON instance are
//!    named in exactly one place, with exhaustive `match` everywhere. Type
//!    predicates and `type` violation payloads both flow through it.
//!
//! 2. **`InstancePath` newtype.** Violation locations are an ordered list of
//!    property names and array indices, never a pre-formatted string.
//!    Rendering to a JSON pointer happens only at the display boundary.
//!
//! 3. **`CanonicalBytes` for value equality.** `enum` membership and
//!    `uniqueItems` compare values through RFC 8785 canonical bytes, so
//!    `1` and `1.0` are the same value and object key order is irrelevant.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsv-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod kind;
pub mod path;

// Re-export primary types for ergonomic imports.
pub use canonical::{values_equal, CanonicalBytes};
pub use error::{CanonicalizationError, PredicateError, ResolutionError};
pub use kind::ValueKind;
pub use path::{InstancePath, PathSegment};
