use std::fmt;

/// Namespace-qualified identifier of a native type or function.
///
/// # Examples
///
/// ```
/// use gluegen_core::QualifiedName;
///
/// let name = QualifiedName::from_qualified_string("gs::math::Vec3");
/// assert_eq!(name.simple_name(), "Vec3");
/// assert_eq!(name.to_string(), "gs::math::Vec3");
/// assert_eq!(name.mangled(), "gs__math__Vec3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Simple name (e.g., "Vec3", "update")
    pub name: String,
    /// Namespace path (e.g., ["gs", "math"])
    /// Empty for global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a qualified string (e.g., "gs::Vec3").
    ///
    /// Splits on "::" - the last segment is the name, rest is namespace.
    /// Leading "::" (absolute path) is normalized: "::gs::Vec3" == "gs::Vec3".
    pub fn from_qualified_string(s: &str) -> Self {
        let mut parts: Vec<String> = s
            .split("::")
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace as a joined string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join("::")
    }

    /// Symbol-safe spelling: namespace separators become `__`.
    pub fn mangled(&self) -> String {
        mangle(&self.to_string())
    }
}

/// Replace `::` with `__` so a native name can be used as a symbol.
pub fn mangle(name: &str) -> String {
    name.replace("::", "__")
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}::{}", self.namespace.join("::"), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}
