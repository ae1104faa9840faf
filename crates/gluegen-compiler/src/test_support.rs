//! Shared fixtures for unit tests.

use gluegen_core::{
    ArgDescriptor, ArgSlot, OwnershipPolicy, ParseError, Prototype, ReturnSlot, TypeDescriptor,
    TypeHash,
};
use gluegen_registry::{ConverterCodegen, ConverterRegistry, TypeConverter};

use crate::backend::{Backend, ScopeKind};
use crate::writer::CodeWriter;

/// Codegen producing recognizable call spellings.
pub struct Plain;

impl ConverterCodegen for Plain {
    fn check_call(&self, conv: &TypeConverter, input: &str) -> String {
        format!("check_{}({})", conv.clean_name, input)
    }

    fn to_c_call(&self, conv: &TypeConverter, input: &str, out_var_p: &str) -> String {
        format!("to_c_{}({}, {});\n", conv.clean_name, input, out_var_p)
    }

    fn from_c_call(
        &self,
        conv: &TypeConverter,
        _ctype: &TypeDescriptor,
        out_var: &str,
        in_var_p: &str,
        ownership: OwnershipPolicy,
    ) -> String {
        format!(
            "value {} = from_c_{}({}, {});\n",
            out_var, conv.clean_name, in_var_p, ownership
        )
    }
}

/// Backend writing a C-like pseudo language.
pub struct TestBackend;

impl Backend for TestBackend {
    fn language(&self) -> &str {
        "Test"
    }

    fn open_scope(&self, out: &mut CodeWriter, kind: ScopeKind, proxy: &str, max_arg_count: usize) {
        match kind {
            ScopeKind::Function => out.line(format!("proxy {}(max {}) {{", proxy, max_arg_count)),
            ScopeKind::Method => out.line(format!("method {}(max {}) {{", proxy, max_arg_count)),
            ScopeKind::Getter => out.line(format!("getter {} {{", proxy)),
            ScopeKind::Setter => out.line(format!("setter {} {{", proxy)),
        }
    }

    fn close_scope(&self, out: &mut CodeWriter, _kind: ScopeKind) {
        out.line("}");
    }

    fn get_arg(&self, index: usize) -> String {
        format!("args[{}]", index)
    }

    fn get_self(&self) -> String {
        "self".to_string()
    }

    fn commit_rvals(&self, out: &mut CodeWriter, rvals: &[String]) {
        match rvals {
            [] => out.line("return;"),
            [single] => out.line(format!("return {};", single)),
            many => out.line(format!("return ({});", many.join(", "))),
        }
    }

    fn set_error(&self, out: &mut CodeWriter, category: &str, message: &str) {
        out.line(format!("error(\"{}\", \"{}\");", category, message));
    }

    fn class_converter(&self, name: &str) -> Result<TypeConverter, ParseError> {
        TypeConverter::with_storage(name, &format!("{} *", name), Plain)
    }
}

pub fn registry_with(types: &[&str]) -> (ConverterRegistry, Vec<TypeHash>) {
    let mut registry = ConverterRegistry::new();
    let ids = types
        .iter()
        .map(|ty| {
            registry
                .register(TypeConverter::new(ty, Plain).unwrap())
                .unwrap()
        })
        .collect();
    (registry, ids)
}

/// Prototype whose converters are the hashes of the given names.
pub fn proto(rval: &str, args: &[&str]) -> Prototype {
    Prototype {
        rval: ReturnSlot {
            ctype: TypeDescriptor::new(rval),
            converter: (rval != "void").then(|| TypeHash::from_name(rval)),
        },
        args: args
            .iter()
            .map(|arg| ArgSlot {
                arg: ArgDescriptor {
                    ctype: TypeDescriptor::new(*arg),
                    name: None,
                },
                converter: TypeHash::from_name(arg),
            })
            .collect(),
    }
}
