//! Capabilities a target runtime must provide.
//!
//! The compiler owns the shape of the generated code (dispatch ladders, call
//! sequences, accessors, cast table) and asks a [`Backend`] for everything
//! that depends on the host runtime: how a proxy is declared, how arguments
//! and `self` are fetched, how results are handed back and how errors are
//! raised. Per-type checks and conversions come from each converter's
//! [`ConverterCodegen`](gluegen_registry::ConverterCodegen).

use gluegen_core::{OwnershipPolicy, ParseError, TypeDescriptor};
use gluegen_registry::TypeConverter;

use crate::writer::CodeWriter;

/// Kind of proxy scope being opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Free function or constructor.
    Function,
    /// Method receiving `self`.
    Method,
    /// Member read accessor.
    Getter,
    /// Member write accessor.
    Setter,
}

impl ScopeKind {
    /// Number of runtime arguments an accessor receives, `self` excluded.
    pub fn accessor_arg_count(self) -> usize {
        match self {
            ScopeKind::Setter => 1,
            _ => 0,
        }
    }
}

/// Target-runtime emitter consumed by the generator.
pub trait Backend {
    /// Name of the target language, e.g. `"Python"`.
    fn language(&self) -> &str;

    /// Open a proxy scope named `proxy`, taking at most `max_arg_count`
    /// runtime arguments.
    fn open_scope(&self, out: &mut CodeWriter, kind: ScopeKind, proxy: &str, max_arg_count: usize);

    fn close_scope(&self, out: &mut CodeWriter, kind: ScopeKind);

    /// Expression yielding the runtime argument count inside a proxy.
    fn arg_count(&self) -> String {
        "arg_count".to_string()
    }

    /// Expression yielding runtime argument `index`.
    fn get_arg(&self, index: usize) -> String;

    /// Expression yielding the runtime `self` value.
    fn get_self(&self) -> String;

    /// Convert a native value (pointed to by `in_var_p`) into the runtime
    /// variable holding result `var`. Returns the runtime variable name.
    fn rval_from_c_ptr(
        &self,
        out: &mut CodeWriter,
        conv: &TypeConverter,
        ctype: &TypeDescriptor,
        var: &str,
        in_var_p: &str,
        ownership: OwnershipPolicy,
    ) -> String {
        let out_var = format!("{}_out", var);
        out.block(&conv.from_c_call(ctype, &out_var, in_var_p, ownership));
        out_var
    }

    /// Hand the runtime values named in `rvals` back to the caller. Empty
    /// for a `void` result.
    fn commit_rvals(&self, out: &mut CodeWriter, rvals: &[String]);

    /// Raise a structured error in the host runtime.
    fn set_error(&self, out: &mut CodeWriter, category: &str, message: &str);

    /// Default converter for a class declared with `begin_class`.
    fn class_converter(&self, name: &str) -> Result<TypeConverter, ParseError>;
}
