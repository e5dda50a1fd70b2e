//! # Schema Store
//!
//! Turns a locator string into a parsed schema document. The engine only
//! sees the [`SchemaStore`] trait; caching lives one layer up in
//! [`Resolver`](crate::resolver::Resolver).
//!
//! ## Locators
//!
//! [`DirectoryStore`] maps a locator to a file under its root directory:
//!
//! - configured URI prefixes are stripped first, so
//!   `https://schemas.example.org/person.json` and `person.json` name the
//!   same file;
//! - a locator without an extension also tries `<locator>.json` and
//!   `<locator>.schema.json`;
//! - `.yaml` / `.yml` files are decoded as YAML, everything else as JSON;
//! - locators that climb out of the root (`../x.json`, absolute paths) are
//!   refused.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use jsv_core::ResolutionError;
use serde_json::Value;
use thiserror::Error;

/// Environment variable naming the default store root.
pub const SCHEMA_DIR_ENV: &str = "JSV_SCHEMA_DIR";

/// Source of schema documents.
pub trait SchemaStore: Send + Sync {
    /// Load the document named by `locator`.
    fn load(&self, locator: &str) -> Result<Value, ResolutionError>;
}

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON text.
    Json,
    /// YAML text (JSON-compatible subset).
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension; unknown extensions are JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// A document could not be decoded.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Invalid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A YAML number with no JSON representation (`.inf`, `.nan`).
    #[error("YAML number {value} has no JSON representation")]
    NonFiniteNumber {
        /// The number as written by the YAML parser.
        value: String,
    },

    /// A mapping key that is not a scalar.
    #[error("YAML mapping key of kind {kind} cannot become a JSON object key")]
    UnsupportedKey {
        /// YAML kind of the offending key.
        kind: &'static str,
    },
}

/// Decode document text into the value tree the engine consumes.
pub fn decode_document(text: &str, format: DocumentFormat) -> Result<Value, DecodeError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::from_str(text)?),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
            yaml_to_json(&yaml)
        }
    }
}

/// Structural YAML to JSON conversion. Scalar keys are stringified and tags
/// are dropped.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, DecodeError> {
    use serde_yaml::Value as Yaml;

    Ok(match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(*b),
        Yaml::Number(n) => yaml_number(n)?,
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Sequence(seq) => {
            Value::Array(seq.iter().map(yaml_to_json).collect::<Result<_, _>>()?)
        }
        Yaml::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| Ok((yaml_key(k)?, yaml_to_json(v)?)))
                .collect::<Result<_, DecodeError>>()?,
        ),
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value, DecodeError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    n.as_f64()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| DecodeError::NonFiniteNumber {
            value: n.to_string(),
        })
}

fn yaml_key(key: &serde_yaml::Value) -> Result<String, DecodeError> {
    use serde_yaml::Value as Yaml;

    match key {
        Yaml::String(s) => Ok(s.clone()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Tagged(tagged) => yaml_key(&tagged.value),
        Yaml::Null => Err(DecodeError::UnsupportedKey { kind: "null" }),
        Yaml::Sequence(_) => Err(DecodeError::UnsupportedKey { kind: "sequence" }),
        Yaml::Mapping(_) => Err(DecodeError::UnsupportedKey { kind: "mapping" }),
    }
}

/// Store backed by a directory of `.json` / `.yaml` schema files.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    prefixes: Vec<String>,
}

impl DirectoryStore {
    /// Store rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            prefixes: Vec::new(),
        }
    }

    /// Store rooted at `$JSV_SCHEMA_DIR`, or the current directory.
    pub fn from_env() -> Self {
        let root = std::env::var_os(SCHEMA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }

    /// Also accept locators starting with `prefix` (e.g. a canonical `$id`
    /// base URI).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative path a locator refers to, after prefix stripping.
    fn relative_path<'l>(&self, locator: &'l str) -> Result<&'l Path, ResolutionError> {
        let stripped = self
            .prefixes
            .iter()
            .find_map(|prefix| locator.strip_prefix(prefix.as_str()))
            .unwrap_or(locator);
        let relative = Path::new(stripped);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || stripped.is_empty() {
            return Err(ResolutionError::OutsideRoot {
                locator: locator.to_string(),
            });
        }
        Ok(relative)
    }

    fn candidates(&self, relative: &Path) -> Vec<PathBuf> {
        let base = self.root.join(relative);
        if relative.extension().is_some() {
            return vec![base];
        }
        let name = base.as_os_str().to_os_string();
        let mut json = name.clone();
        json.push(".json");
        let mut schema_json = name;
        schema_json.push(".schema.json");
        vec![base, PathBuf::from(json), PathBuf::from(schema_json)]
    }
}

impl SchemaStore for DirectoryStore {
    fn load(&self, locator: &str) -> Result<Value, ResolutionError> {
        let relative = self.relative_path(locator)?;
        let path = self
            .candidates(relative)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| ResolutionError::NotFound {
                locator: locator.to_string(),
            })?;

        let text = std::fs::read_to_string(&path).map_err(|source| ResolutionError::Io {
            locator: locator.to_string(),
            source,
        })?;
        decode_document(&text, DocumentFormat::from_path(&path)).map_err(|e| {
            ResolutionError::Decode {
                locator: locator.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

/// Store holding documents in memory, keyed by exact locator.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, Value>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemoryStore::insert`].
    pub fn with_document(mut self, locator: impl Into<String>, document: Value) -> Self {
        self.insert(locator, document);
        self
    }

    /// Add or replace a document.
    pub fn insert(&mut self, locator: impl Into<String>, document: Value) {
        self.documents.insert(locator.into(), document);
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SchemaStore for MemoryStore {
    fn load(&self, locator: &str) -> Result<Value, ResolutionError> {
        self.documents
            .get(locator)
            .cloned()
            .ok_or_else(|| ResolutionError::NotFound {
                locator: locator.to_string(),
            })
    }
}
