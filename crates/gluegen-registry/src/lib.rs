//! Converter registry.
//!
//! Holds the per-session table of bindable types and the inheritance graph
//! derived from it:
//!
//! - [`TypeConverter`]: one bindable type, with its declared constructor,
//!   methods, members and bases
//! - [`ConverterCodegen`]: backend hooks producing the type's check and
//!   conversion code
//! - [`ConverterRegistry`]: registration-ordered storage keyed by [`TypeHash`]
//! - [`CastGraph`]: the base -> derived table behind upcasts
//!
//! [`TypeHash`]: gluegen_core::TypeHash

mod cast_graph;
mod converter;
mod registry;

pub use cast_graph::{CastGraph, CastResult};
pub use converter::{BoundFunction, ConverterCodegen, TypeConverter};
pub use registry::ConverterRegistry;
