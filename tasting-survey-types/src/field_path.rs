use std::fmt;

/// A path naming one form field, e.g. `"ratings.praline-1.overall"`.
///
/// Catalog identifiers never contain dots, so a path splits back into the
/// segments it was built from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    path: String,
}

impl FieldPath {
    /// Create a path from a dot-separated string.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Append a child segment, returning a new path.
    pub fn child(&self, name: &str) -> Self {
        if name.is_empty() {
            self.clone()
        } else if self.path.is_empty() {
            Self::new(name)
        } else {
            Self::new(format!("{}.{}", self.path, name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Iterate over the non-empty segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|s| !s.is_empty())
    }

    /// Returns the remainder of the path after `prefix`, if the path starts
    /// with that whole segment.
    pub fn strip_prefix(&self, prefix: &str) -> Option<Self> {
        if self.path == prefix {
            Some(Self::new(""))
        } else if self.path.starts_with(prefix) && self.path[prefix.len()..].starts_with('.') {
            Some(Self::new(&self.path[prefix.len() + 1..]))
        } else {
            None
        }
    }

    /// The HTML element id for this path (dots are not valid in CSS selectors).
    pub fn element_id(&self) -> String {
        self.path.replace('.', "-")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
