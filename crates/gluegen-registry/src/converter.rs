//! Type converters: how one native type crosses the binding boundary.

use std::fmt;

use gluegen_core::{
    ArgDescriptor, OwnershipPolicy, ParseError, Prototype, RefMarker, RefSuffix, TypeDescriptor,
    TypeHash, clean_name, transform_var,
};
use gluegen_parser::parse_type;

/// Target-runtime code for one converter.
///
/// Implemented by backends. Each method returns source text; the `conv`
/// argument is the converter the hooks are attached to.
pub trait ConverterCodegen {
    /// Boolean expression: does runtime value `input` satisfy this converter.
    fn check_call(&self, conv: &TypeConverter, input: &str) -> String;

    /// Statement(s) converting runtime value `input` into the native storage
    /// pointed to by `out_var_p`.
    fn to_c_call(&self, conv: &TypeConverter, input: &str, out_var_p: &str) -> String;

    /// Statement(s) converting the native value pointed to by `in_var_p` into
    /// runtime variable `out_var`.
    fn from_c_call(
        &self,
        conv: &TypeConverter,
        ctype: &TypeDescriptor,
        out_var: &str,
        in_var_p: &str,
        ownership: OwnershipPolicy,
    ) -> String;

    /// Declarations this type exposes to other translation units.
    fn type_api(&self, _conv: &TypeConverter, _module: &str) -> String {
        String::new()
    }

    /// Support code emitted when the type is closed.
    fn type_glue(&self, _conv: &TypeConverter, _module: &str) -> String {
        String::new()
    }
}

/// A bound overload set: free function, method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundFunction {
    /// Native name (method/function name, or `<type>__constructor__`).
    pub name: String,
    /// Generated proxy symbol.
    pub proxy_name: String,
    pub protos: Vec<Prototype>,
}

/// Registry entry describing one bindable type.
pub struct TypeConverter {
    id: TypeHash,
    /// Logical type.
    pub ctype: TypeDescriptor,
    /// Type of the local proxy variables holding converted values.
    pub storage_ctype: TypeDescriptor,
    /// Registry key.
    pub canonical_name: String,
    /// Identifier-safe spelling.
    pub clean_name: String,
    /// Name under which the type is exposed to the host runtime.
    pub bound_name: String,
    /// Runtime identity label for polymorphic casts.
    pub type_tag: String,

    pub constructor: Option<BoundFunction>,
    pub methods: Vec<BoundFunction>,
    pub members: Vec<ArgDescriptor>,
    /// Direct bases, in declaration order. Not owned.
    pub bases: Vec<TypeHash>,

    codegen: Box<dyn ConverterCodegen>,
}

impl TypeConverter {
    /// Converter whose storage is the logical type itself.
    pub fn new(
        type_expr: &str,
        codegen: impl ConverterCodegen + 'static,
    ) -> Result<Self, ParseError> {
        Self::build(type_expr, None, Box::new(codegen))
    }

    /// Converter with an explicit storage type (e.g. a class held by pointer).
    pub fn with_storage(
        type_expr: &str,
        storage_expr: &str,
        codegen: impl ConverterCodegen + 'static,
    ) -> Result<Self, ParseError> {
        Self::build(type_expr, Some(storage_expr), Box::new(codegen))
    }

    fn build(
        type_expr: &str,
        storage_expr: Option<&str>,
        codegen: Box<dyn ConverterCodegen>,
    ) -> Result<Self, ParseError> {
        let ctype = parse_type(type_expr)?;
        let storage_ctype = match storage_expr {
            Some(expr) => parse_type(expr)?,
            None => ctype.clone(),
        };

        let canonical_name = ctype.canonical_name();
        let clean_name = clean_name(&canonical_name);
        let type_tag = format!("__{}_type_tag", clean_name);

        Ok(Self {
            id: TypeHash::from_name(&canonical_name),
            ctype,
            storage_ctype,
            bound_name: clean_name.clone(),
            canonical_name,
            clean_name,
            type_tag,
            constructor: None,
            methods: Vec::new(),
            members: Vec::new(),
            bases: Vec::new(),
            codegen,
        })
    }

    /// Stable handle of this converter.
    pub fn id(&self) -> TypeHash {
        self.id
    }

    /// Expose the type under a different name.
    pub fn bound_as(mut self, name: impl Into<String>) -> Self {
        self.bound_name = name.into();
        self
    }

    pub fn check_call(&self, input: &str) -> String {
        self.codegen.check_call(self, input)
    }

    pub fn to_c_call(&self, input: &str, out_var_p: &str) -> String {
        self.codegen.to_c_call(self, input, out_var_p)
    }

    pub fn from_c_call(
        &self,
        ctype: &TypeDescriptor,
        out_var: &str,
        in_var_p: &str,
        ownership: OwnershipPolicy,
    ) -> String {
        self.codegen
            .from_c_call(self, ctype, out_var, in_var_p, ownership)
    }

    pub fn type_api(&self, module: &str) -> String {
        self.codegen.type_api(self, module)
    }

    pub fn type_glue(&self, module: &str) -> String {
        self.codegen.type_glue(self, module)
    }

    /// Reference suffix the conversion hooks expect: one pointer layer over
    /// the logical type.
    pub fn conversion_ref(&self) -> RefSuffix {
        self.ctype.ref_suffix.with(RefMarker::Ptr)
    }

    /// Adapt `var` (with reference suffix `var_ref`) into a pointer usable by
    /// the conversion hooks.
    pub fn prepare_var_for_conv(&self, var: &str, var_ref: &RefSuffix) -> String {
        transform_var(var, var_ref, &self.conversion_ref())
    }
}

impl fmt::Debug for TypeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeConverter")
            .field("id", &self.id)
            .field("canonical_name", &self.canonical_name)
            .field("storage_ctype", &self.storage_ctype.to_string())
            .field("type_tag", &self.type_tag)
            .field("methods", &self.methods.len())
            .field("members", &self.members.len())
            .field("bases", &self.bases)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Codegen producing recognizable call spellings.
    pub(crate) struct Plain;

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

    #[test]
    fn identity_fields() {
        let conv = TypeConverter::new("gs::Vec3", Plain).unwrap();
        assert_eq!(conv.canonical_name, "gs::Vec3");
        assert_eq!(conv.clean_name, "gs__Vec3");
        assert_eq!(conv.bound_name, "gs__Vec3");
        assert_eq!(conv.type_tag, "__gs__Vec3_type_tag");
        assert_eq!(conv.id(), TypeHash::from_name("gs::Vec3"));
        assert_eq!(conv.storage_ctype, conv.ctype);
    }

    #[test]
    fn storage_override() {
        let conv = TypeConverter::with_storage("Node", "Node *", Plain).unwrap();
        assert_eq!(conv.storage_ctype.to_string(), "Node *");
        assert_eq!(conv.ctype.to_string(), "Node");
    }

    #[test]
    fn pointer_type_clean_name() {
        let conv = TypeConverter::new("const char *", Plain).unwrap();
        assert_eq!(conv.clean_name, "const_char_ptr");
        assert_eq!(conv.conversion_ref().to_string(), "**");
    }

    #[test]
    fn bad_type_expression_is_rejected() {
        assert!(TypeConverter::new("9bad", Plain).is_err());
        assert!(TypeConverter::with_storage("Node", "Node *?", Plain).is_err());
    }

    #[test]
    fn hooks_delegate_to_codegen() {
        let conv = TypeConverter::new("int", Plain).unwrap();
        assert_eq!(conv.check_call("args[0]"), "check_int(args[0])");
        assert_eq!(conv.to_c_call("args[0]", "&arg0"), "to_c_int(args[0], &arg0);\n");
        assert_eq!(
            conv.from_c_call(&conv.ctype, "rval", "&rval", OwnershipPolicy::Copy),
            "value rval = from_c_int(&rval, Copy);\n"
        );
        assert_eq!(conv.type_api("mod"), "");
    }

    #[test]
    fn prepare_var_for_conv_targets_pointer() {
        let int_conv = TypeConverter::new("int", Plain).unwrap();
        assert_eq!(
            int_conv.prepare_var_for_conv("_self->a", &RefSuffix::value()),
            "&_self->a"
        );

        let str_conv = TypeConverter::new("const char *", Plain).unwrap();
        let field_ref = RefSuffix::parse("*").unwrap();
        assert_eq!(
            str_conv.prepare_var_for_conv("_self->text", &field_ref),
            "&_self->text"
        );
    }

    #[test]
    fn bound_as_renames() {
        let conv = TypeConverter::new("std::string", Plain).unwrap().bound_as("string");
        assert_eq!(conv.bound_name, "string");
        assert_eq!(conv.clean_name, "std__string");
    }
}
