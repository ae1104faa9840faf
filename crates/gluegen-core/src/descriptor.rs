//! Parsed type expressions.
//!
//! A type expression such as `const gs::Vec3 &` is held as a [`TypeDescriptor`]
//! with explicit presence fields for every optional part. Its `Display` output
//! is the canonical spelling and doubles as the converter registry key, so it
//! must stay deterministic.

use std::fmt;

use crate::QualifiedName;

/// Explicit signedness keyword in front of a type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    Signed,
    Unsigned,
}

impl Signedness {
    pub fn as_str(self) -> &'static str {
        match self {
            Signedness::Signed => "signed",
            Signedness::Unsigned => "unsigned",
        }
    }
}

/// One indirection layer of a reference suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefMarker {
    /// `&`
    Ref,
    /// `*`
    Ptr,
}

impl RefMarker {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '&' => Some(RefMarker::Ref),
            '*' => Some(RefMarker::Ptr),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            RefMarker::Ref => '&',
            RefMarker::Ptr => '*',
        }
    }
}

/// Sequence of `&`/`*` markers, read left to right as successive layers
/// applied outward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RefSuffix(Vec<RefMarker>);

impl RefSuffix {
    /// The empty suffix (a plain value).
    pub fn value() -> Self {
        Self::default()
    }

    /// Parse a suffix made only of `&` and `*`. Returns `None` on any other
    /// character.
    pub fn parse(s: &str) -> Option<Self> {
        s.chars()
            .map(RefMarker::from_char)
            .collect::<Option<Vec<_>>>()
            .map(RefSuffix)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn markers(&self) -> &[RefMarker] {
        &self.0
    }

    pub fn push(&mut self, marker: RefMarker) {
        self.0.push(marker);
    }

    /// Copy of this suffix with one more outer layer.
    pub fn with(&self, marker: RefMarker) -> Self {
        let mut out = self.clone();
        out.push(marker);
        out
    }
}

impl fmt::Display for RefSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for marker in &self.0 {
            write!(f, "{}", marker.as_char())?;
        }
        Ok(())
    }
}

/// A parsed type expression: `["const"] ["signed"|"unsigned"] name [ref-suffix]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub is_const: bool,
    pub signedness: Option<Signedness>,
    pub name: QualifiedName,
    pub ref_suffix: RefSuffix,
}

impl TypeDescriptor {
    /// A plain, unqualified value type.
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            is_const: false,
            signedness: None,
            name: name.into(),
            ref_suffix: RefSuffix::value(),
        }
    }

    /// Canonical spelling, also used as the registry key.
    pub fn canonical_name(&self) -> String {
        self.to_string()
    }

    /// The qualified name alone, without qualifiers or reference suffix.
    pub fn unqualified_name(&self) -> String {
        self.name.to_string()
    }

    pub fn is_void(&self) -> bool {
        self.canonical_name() == "void"
    }

    /// Copy of this descriptor with one more reference layer.
    pub fn with_ref(&self, marker: RefMarker) -> Self {
        Self {
            ref_suffix: self.ref_suffix.with(marker),
            ..self.clone()
        }
    }
}

/// Canonical spelling: `const `, signedness, the qualified name, then a space
/// and the reference suffix when present (`const unsigned char *`).
///
/// This spelling is the registry key, so signedness is part of it:
/// `unsigned int` and `int` are distinct keys, and `unsigned int` only
/// reaches an `int` converter through the registry's bare-name fallback.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            f.write_str("const ")?;
        }
        if let Some(signedness) = self.signedness {
            write!(f, "{} ", signedness.as_str())?;
        }
        write!(f, "{}", self.name)?;
        if !self.ref_suffix.is_empty() {
            write!(f, " {}", self.ref_suffix)?;
        }
        Ok(())
    }
}

/// A type expression with an optional trailing argument name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgDescriptor {
    pub ctype: TypeDescriptor,
    pub name: Option<String>,
}

impl fmt::Display for ArgDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ctype)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        Ok(())
    }
}

/// Turn a type spelling into an identifier fragment.
///
/// Splits on spaces, rewrites `*` to `ptr`, `&` to `_r` and `::` to `__` in each
/// token, then joins the tokens with `_`.
///
/// ```
/// use gluegen_core::clean_name;
///
/// assert_eq!(clean_name("const char *"), "const_char_ptr");
/// assert_eq!(clean_name("gs::Vec3 &"), "gs__Vec3__r");
/// ```
pub fn clean_name(type_string: &str) -> String {
    type_string
        .split(' ')
        .map(|part| {
            part.replace('*', "ptr")
                .replace('&', "_r")
                .replace("::", "__")
        })
        .collect::<Vec<_>>()
        .join("_")
}
