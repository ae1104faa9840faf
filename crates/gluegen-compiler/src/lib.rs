//! Binding compiler.
//!
//! Turns declarations resolved against a [`ConverterRegistry`] into glue code
//! through a [`Backend`].
//!
//! ## Modules
//!
//! - [`backend`]: capabilities required from a target runtime
//! - [`cast`]: the type-tag upcast function
//! - [`context`]: binding contexts and proxy naming
//! - [`dispatch`]: overload dispatch trees, building and emission
//! - [`member`]: data member getter/setter proxies
//! - [`proto`]: signature parsing and converter resolution
//! - [`template`]: function template instantiation
//! - [`writer`]: indented output buffer
//!
//! [`ConverterRegistry`]: gluegen_registry::ConverterRegistry

pub mod backend;
pub mod cast;
pub mod context;
pub mod dispatch;
pub mod member;
pub mod proto;
pub mod template;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use backend::{Backend, ScopeKind};
pub use cast::{UPCAST_FUNCTION, emit_upcast_function, upcast_signature};
pub use context::BindingContext;
pub use dispatch::{
    ArityArm, DispatchError, DispatchNode, DispatchTree, TypeCheck, emit_overload_set,
};
pub use member::MemberAccessors;
pub use proto::{Signature, prepare_protos};
pub use template::{FunctionTemplate, TemplateInstance};
pub use writer::CodeWriter;
