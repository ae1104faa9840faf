//! ConverterRegistry - the session's table of bindable types.
//!
//! Converters are stored in registration order and indexed by their
//! [`TypeHash`]. The registration order is significant: it drives the order of
//! emitted type glue and of the cast table, so output is stable across runs.
//!
//! # Inheritance
//!
//! Base links are references between entries (`TypeConverter::bases` holds
//! handles, never converters). [`ConverterRegistry::add_base`] refuses any link
//! that would close a cycle, so the recursive walks below always terminate.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = ConverterRegistry::new();
//! let a = registry.register(TypeConverter::new("A", codegen)?)?;
//! let b = registry.register(TypeConverter::new("B", codegen)?)?;
//! registry.add_base(b, a)?;
//! assert!(registry.can_upcast_to(b, "A"));
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use gluegen_core::{RegistrationError, TypeDescriptor, TypeHash, clean_name};
use gluegen_parser::canonical_spelling;

use crate::converter::{BoundFunction, TypeConverter};

/// Table of every converter declared in a generation session.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    /// Converters in registration order.
    converters: Vec<TypeConverter>,
    /// Handle -> position in `converters`.
    index: FxHashMap<TypeHash, usize>,
}

impl ConverterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register a converter under its canonical name.
    ///
    /// Returns an error if a converter with the same canonical name exists.
    pub fn register(&mut self, conv: TypeConverter) -> Result<TypeHash, RegistrationError> {
        let id = conv.id();
        if self.index.contains_key(&id) {
            return Err(RegistrationError::DuplicateType(conv.canonical_name));
        }

        trace!(target: "gluegen::registry", ty = %conv.canonical_name, "register converter");
        self.index.insert(id, self.converters.len());
        self.converters.push(conv);
        Ok(id)
    }

    /// Declare `base` as a direct base of `derived`.
    ///
    /// Rejects links that would make the inheritance graph cyclic.
    pub fn add_base(&mut self, derived: TypeHash, base: TypeHash) -> Result<(), RegistrationError> {
        let derived_name = self.name_of(derived)?;
        let base_name = self.name_of(base)?;

        if derived == base {
            return Err(RegistrationError::SelfInheritance(derived_name));
        }
        if self.ancestors(base).contains(&derived) {
            return Err(RegistrationError::CyclicInheritance {
                derived: derived_name,
                base: base_name,
            });
        }

        debug!(target: "gluegen::registry", derived = %derived_name, base = %base_name, "add base");
        let conv = self.get_mut(derived).ok_or(RegistrationError::TypeNotFound(derived_name))?;
        if !conv.bases.contains(&base) {
            conv.bases.push(base);
        }
        Ok(())
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn get(&self, id: TypeHash) -> Option<&TypeConverter> {
        self.index.get(&id).map(|&i| &self.converters[i])
    }

    pub fn get_mut(&mut self, id: TypeHash) -> Option<&mut TypeConverter> {
        self.index.get(&id).map(|&i| &mut self.converters[i])
    }

    pub fn contains(&self, id: TypeHash) -> bool {
        self.index.contains_key(&id)
    }

    /// Find a converter by type expression (spacing-insensitive).
    pub fn lookup(&self, type_expr: &str) -> Option<TypeHash> {
        let id = TypeHash::from_name(&canonical_spelling(type_expr));
        self.contains(id).then_some(id)
    }

    /// Like [`lookup`](Self::lookup) but failing with `TypeNotFound`.
    pub fn require(&self, type_expr: &str) -> Result<TypeHash, RegistrationError> {
        self.lookup(type_expr)
            .ok_or_else(|| RegistrationError::TypeNotFound(type_expr.to_string()))
    }

    /// Select the converter for a type used in a binding.
    ///
    /// `void` selects no converter. Otherwise the fully qualified spelling is
    /// tried first, then the bare name without qualifiers or reference suffix.
    pub fn select(&self, ctype: &TypeDescriptor) -> Result<Option<TypeHash>, RegistrationError> {
        let full = ctype.canonical_name();
        if full == "void" {
            return Ok(None);
        }

        let by_full = TypeHash::from_name(&full);
        if self.contains(by_full) {
            return Ok(Some(by_full));
        }

        let by_bare = TypeHash::from_name(&ctype.unqualified_name());
        if self.contains(by_bare) {
            return Ok(Some(by_bare));
        }

        Err(RegistrationError::TypeNotFound(full))
    }

    fn name_of(&self, id: TypeHash) -> Result<String, RegistrationError> {
        self.get(id)
            .map(|conv| conv.canonical_name.clone())
            .ok_or_else(|| RegistrationError::TypeNotFound(id.to_string()))
    }

    // ==========================================================================
    // Iteration
    // ==========================================================================

    /// Iterate over converters in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeConverter> {
        self.converters.iter()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    // ==========================================================================
    // Inheritance Helpers
    // ==========================================================================

    /// Every direct and transitive base of `id`, depth-first in base
    /// declaration order, without duplicates.
    pub fn ancestors(&self, id: TypeHash) -> Vec<TypeHash> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect_ancestors(id, &mut out, &mut seen);
        out
    }

    fn collect_ancestors(
        &self,
        id: TypeHash,
        out: &mut Vec<TypeHash>,
        seen: &mut FxHashSet<TypeHash>,
    ) {
        let Some(conv) = self.get(id) else {
            return;
        };
        for &base in &conv.bases {
            if seen.insert(base) {
                out.push(base);
                self.collect_ancestors(base, out, seen);
            }
        }
    }

    /// True if `id` is `target_type` or derives from it, directly or not.
    ///
    /// Types are compared by their identifier-safe spelling.
    pub fn can_upcast_to(&self, id: TypeHash, target_type: &str) -> bool {
        let target = clean_name(&canonical_spelling(target_type));
        self.can_upcast_to_clean(id, &target)
    }

    fn can_upcast_to_clean(&self, id: TypeHash, target: &str) -> bool {
        let Some(conv) = self.get(id) else {
            return false;
        };
        conv.clean_name == target
            || conv
                .bases
                .iter()
                .any(|&base| self.can_upcast_to_clean(base, target))
    }

    /// Own methods followed by inherited ones.
    ///
    /// Bases are visited depth-first in declaration order; an inherited
    /// method is skipped when a method of the same name is already listed, so
    /// own methods shadow base methods and the first-declared base wins.
    pub fn all_methods(&self, id: TypeHash) -> Vec<&BoundFunction> {
        let Some(conv) = self.get(id) else {
            return Vec::new();
        };

        let mut all: Vec<&BoundFunction> = conv.methods.iter().collect();
        for &base in &conv.bases {
            self.collect_base_methods(base, &mut all);
        }
        all
    }

    fn collect_base_methods<'a>(&'a self, base: TypeHash, all: &mut Vec<&'a BoundFunction>) {
        let Some(conv) = self.get(base) else {
            return;
        };
        for method in &conv.methods {
            if !all.iter().any(|m| m.name == method.name) {
                all.push(method);
            }
        }
        for &next in &conv.bases {
            self.collect_base_methods(next, all);
        }
    }
}
