//! Generation-time error types.
//!
//! Every error in this module is a contract violation in the API description
//! being compiled: the generation session should stop on the first one. Errors
//! raised by *generated* code at runtime are a different tier and never pass
//! through these types.
//!
//! ## Error Hierarchy
//!
//! ```text
//! GenerationError (top-level wrapper)
//! ├── ParseError        - malformed type or argument expression
//! ├── RegistrationError - unknown/duplicate types, inheritance cycles
//! └── binding violations - ambiguous overloads, unsupported arguments, templates
//! ```

use thiserror::Error;

// ============================================================================
// Parse Errors
// ============================================================================

/// A type expression did not match the type grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed type expression '{input}': expected {expected} at offset {offset}")]
pub struct ParseError {
    /// The full offending expression.
    pub input: String,
    /// Byte offset where matching failed.
    pub offset: usize,
    /// What the grammar required at that point.
    pub expected: &'static str,
}

impl ParseError {
    pub fn new(input: impl Into<String>, offset: usize, expected: &'static str) -> Self {
        Self {
            input: input.into(),
            offset,
            expected,
        }
    }
}

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised while populating the converter registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A referenced type was never registered.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this canonical name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// Declaring this base would make the inheritance graph cyclic.
    #[error("'{derived}' cannot derive from '{base}': '{base}' already derives from '{derived}'")]
    CyclicInheritance {
        /// The type gaining a base.
        derived: String,
        /// The proposed base.
        base: String,
    },

    /// A type was declared as its own base.
    #[error("'{0}' cannot derive from itself")]
    SelfInheritance(String),
}

// ============================================================================
// Generation Errors
// ============================================================================

/// Top-level error of a generation session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// An error raised while binding a specific construct.
    #[error("{context}: {source}")]
    InBinding {
        /// Description of the binding context (e.g. `function f`).
        context: String,
        #[source]
        source: Box<GenerationError>,
    },

    /// An overload set was declared without any prototype.
    #[error("{context}: no prototype declared")]
    EmptyOverloadSet { context: String },

    /// Several prototypes of one arity cannot be told apart by their converters.
    #[error("{context}: {count} prototypes taking {arg_count} argument(s) cannot be told apart by argument type")]
    AmbiguousOverload {
        context: String,
        arg_count: usize,
        count: usize,
    },

    /// An argument resolved to no converter (e.g. a positional `void`).
    #[error("{context}: argument {index} of type '{ctype}' has no converter")]
    UnsupportedArgument {
        context: String,
        index: usize,
        ctype: String,
    },

    /// A dispatch tree refers to a prototype missing from the list it is
    /// emitted with.
    #[error("{context}: dispatch tree refers to prototype {index}, only {count} given")]
    UnknownPrototype {
        context: String,
        index: usize,
        count: usize,
    },

    /// A template was bound before being declared.
    #[error("unknown function template '{0}'")]
    UnknownTemplate(String),

    /// Binding arguments do not match the template's parameter list.
    #[error("function template '{template}' takes {expected} parameter(s), {found} given")]
    TemplateArity {
        template: String,
        expected: usize,
        found: usize,
    },
}

impl GenerationError {
    /// Attach a binding context description to this error.
    pub fn in_binding(self, context: impl Into<String>) -> Self {
        GenerationError::InBinding {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result alias for generation-time operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
