//! # jsv-cli: Command-Line Front End
//!
//! Provides the `jsv` binary:
//!
//! ```bash
//! jsv validate --schema schemas/person.json people/ada.json people/grace.yaml
//! jsv validate --schema person.json --collect --format json ada.json
//! ```
//!
//! Exit codes: `0` when every instance conforms, `1` when any instance has
//! violations, `2` on operational errors (unreadable files, malformed
//! schemas, unresolvable `$ref`).

pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned as-is; relative paths are joined onto
/// `base`.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
