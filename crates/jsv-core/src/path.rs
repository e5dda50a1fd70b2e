//! # Instance Paths
//!
//! Newtype wrappers for locations inside a validated instance. A path is the
//! ordered list of property names and array indices walked from the
//! instance root; violations carry one so callers can pinpoint the
//! offending value.
//!
//! Paths serialize as plain JSON arrays (`["address", "lines", 0]`) and
//! display as JSON pointers (`/address/lines/0`).

use serde::{Deserialize, Serialize};

/// One step of an instance path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array position.
    Index(usize),
    /// Object property name.
    Key(String),
}

impl PathSegment {
    /// The segment as it appears in a property table: indices render as
    /// their decimal form.
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Self::Index(i) => std::borrow::Cow::Owned(i.to_string()),
            Self::Key(k) => std::borrow::Cow::Borrowed(k),
        }
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            // RFC 6901 escaping.
            Self::Key(k) => f.write_str(&k.replace('~', "~0").replace('/', "~1")),
        }
    }
}

/// Location of a value inside an instance, from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstancePath(Vec<PathSegment>);

impl InstancePath {
    /// The empty path (instance root).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Descend one level.
    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.0.push(segment.into());
    }

    /// Ascend one level. Returns the removed segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// A copy of this path extended by one segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    /// Access the segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true at the instance root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<PathSegment>> for InstancePath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl std::fmt::Display for InstancePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut path = InstancePath::root();
        path.push("address");
        path.push(2usize);
        assert_eq!(path.len(), 2);
        assert_eq!(path.pop(), Some(PathSegment::Index(2)));
        assert_eq!(path.segments(), &[PathSegment::Key("address".into())]);
    }

    #[test]
    fn test_child_leaves_parent_untouched() {
        let parent = InstancePath::root().child("a");
        let child = parent.child(0usize);
        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
    }

    #[test]
    fn test_display_as_json_pointer() {
        let path = InstancePath::from(vec![
            PathSegment::from("lines"),
            PathSegment::from(0usize),
            PathSegment::from("a/b~c"),
        ]);
        assert_eq!(path.to_string(), "/lines/0/a~1b~0c");
        assert_eq!(InstancePath::root().to_string(), "(root)");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let path = InstancePath::root().child("id").child(3usize);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["id", 3]));
    }

    #[test]
    fn test_segment_name() {
        assert_eq!(PathSegment::Index(4).name(), "4");
        assert_eq!(PathSegment::Key("id".into()).name(), "id");
    }
}
