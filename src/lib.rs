//! gluegen - binding code generator.
//!
//! Compiles a declarative description of a native API (types, constructors,
//! methods, members, free functions, class hierarchies) into glue code that
//! exposes it to a host scripting runtime.
//!
//! The runtime-specific parts are supplied by a [`Backend`] and by the
//! [`ConverterCodegen`] hooks of each type. Everything else is owned here:
//! the type grammar, the converter registry, overload dispatch trees, member
//! accessors and the polymorphic upcast table.
//!
//! # Example
//!
//! ```ignore
//! use gluegen::{Generator, GeneratorOptions, Signature};
//!
//! let mut generator = Generator::start("my_module", backend, GeneratorOptions::default());
//! generator.bind_type(int_converter)?;
//! generator.bind_type(float_converter)?;
//! generator.bind_function_overloads(
//!     "f",
//!     &[Signature::new("void", ["int"]), Signature::new("void", ["float"])],
//! )?;
//! let output = generator.finalize()?;
//! ```

mod generator;
mod options;
mod output;

pub use generator::Generator;
pub use options::{DEFAULT_DISCLAIMER, GeneratorOptions};
pub use output::{Artifact, GeneratedOutput};

pub use gluegen_compiler::{
    Backend, BindingContext, CodeWriter, DispatchError, DispatchNode, DispatchTree,
    FunctionTemplate, MemberAccessors, ScopeKind, Signature,
};
pub use gluegen_core::{
    ArgDescriptor, GenerationError, GenerationResult, OwnershipPolicy, ParseError, Prototype,
    RefSuffix, RefTransform, RegistrationError, TypeDescriptor, TypeHash, clean_name,
    ref_transform,
};
pub use gluegen_parser::{parse_arg, parse_type};
pub use gluegen_registry::{
    BoundFunction, CastGraph, CastResult, ConverterCodegen, ConverterRegistry, TypeConverter,
};
