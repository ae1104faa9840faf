//! Core types shared by every stage of the binding generator.
//!
//! This crate holds the vocabulary the other crates speak:
//!
//! - [`TypeDescriptor`] / [`ArgDescriptor`]: parsed type expressions
//! - [`RefSuffix`] and [`ref_transform`]: reference category arithmetic
//! - [`OwnershipPolicy`]: lifetime contract for values handed to the host runtime
//! - [`TypeHash`]: stable converter identity used as registry key
//! - [`Prototype`]: one call signature with its converters resolved
//! - [`error`]: the generation-time error hierarchy

mod descriptor;
pub mod error;
mod ownership;
mod prototype;
mod qualified_name;
mod type_hash;

pub use descriptor::{ArgDescriptor, RefMarker, RefSuffix, Signedness, TypeDescriptor, clean_name};
pub use error::{GenerationError, GenerationResult, ParseError, RegistrationError};
pub use ownership::{OwnershipPolicy, RefTransform, ref_transform, transform_var};
pub use prototype::{ArgSlot, Prototype, ReturnSlot};
pub use qualified_name::{QualifiedName, mangle};
pub use type_hash::TypeHash;
