//! The generation session.
//!
//! A [`Generator`] owns everything a session declares: the converter
//! registry, bound functions, templates, includes and the output being
//! written. Its lifecycle is explicit:
//!
//! ```text
//! start -> declare* -> finalize -> GeneratedOutput
//! ```
//!
//! Types must be declared before they are referenced as a base, argument,
//! return value or member type. Every declaration returns a
//! [`GenerationResult`]; the first error means the API description is wrong
//! and generation should stop.

use rustc_hash::FxHashMap;
use tracing::{debug, info};

use gluegen_compiler::{
    Backend, BindingContext, CodeWriter, DispatchTree, FunctionTemplate, MemberAccessors,
    Signature, emit_overload_set, emit_upcast_function, prepare_protos, upcast_signature,
};
use gluegen_core::{
    GenerationError, GenerationResult, OwnershipPolicy, RegistrationError, TypeHash,
};
use gluegen_parser::parse_type;
use gluegen_registry::{BoundFunction, CastGraph, ConverterRegistry, TypeConverter};

use crate::options::GeneratorOptions;
use crate::output::{Artifact, GeneratedOutput};

/// One binding generation session targeting backend `B`.
pub struct Generator<B: Backend> {
    name: String,
    backend: B,
    options: GeneratorOptions,
    registry: ConverterRegistry,
    templates: FxHashMap<String, FunctionTemplate>,
    bound_functions: Vec<BoundFunction>,
    system_includes: Vec<String>,
    user_includes: Vec<String>,
    header: CodeWriter,
    source: CodeWriter,
}

impl<B: Backend> Generator<B> {
    /// Start a session for module `name`.
    pub fn start(name: impl Into<String>, backend: B, options: GeneratorOptions) -> Self {
        let name = name.into();
        debug!(target: "gluegen", module = %name, language = backend.language(), "start session");

        Self {
            system_includes: options.system_includes.clone(),
            user_includes: Vec::new(),
            header: CodeWriter::new(options.indent.clone()),
            source: CodeWriter::new(options.indent.clone()),
            registry: ConverterRegistry::new(),
            templates: FxHashMap::default(),
            bound_functions: Vec::new(),
            name,
            backend,
            options,
        }
    }

    // ==========================================================================
    // Introspection
    // ==========================================================================

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target language of the backend.
    pub fn language(&self) -> &str {
        self.backend.language()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Free functions bound so far, in binding order.
    pub fn bound_functions(&self) -> &[BoundFunction] {
        &self.bound_functions
    }

    // ==========================================================================
    // Verbatim Output
    // ==========================================================================

    pub fn add_include(&mut self, path: impl Into<String>, is_system: bool) {
        if is_system {
            self.system_includes.push(path.into());
        } else {
            self.user_includes.push(path.into());
        }
    }

    /// Insert a code fragment as is into the selected artifacts.
    pub fn insert_code(&mut self, code: &str, targets: Artifact) {
        if targets.contains(Artifact::HEADER) {
            self.header.raw(code);
        }
        if targets.contains(Artifact::SOURCE) {
            self.source.raw(code);
        }
    }

    // ==========================================================================
    // Types
    // ==========================================================================

    /// Register a non-class type and close it immediately.
    pub fn bind_type(&mut self, conv: TypeConverter) -> GenerationResult<TypeHash> {
        let id = self.registry.register(conv)?;
        self.end_type(id)?;
        Ok(id)
    }

    /// Open a class using the backend's default class converter.
    pub fn begin_class(&mut self, name: &str) -> GenerationResult<TypeHash> {
        let conv = self.backend.class_converter(name)?;
        let api = conv.type_api(&self.name);
        let id = self.registry.register(conv)?;
        if !api.is_empty() {
            self.source.raw(&api);
            self.source.blank();
        }
        debug!(target: "gluegen", class = name, "begin class");
        Ok(id)
    }

    pub fn end_class(&mut self, name: &str) -> GenerationResult<()> {
        let id = self.registry.require(name)?;
        self.end_type(id)
    }

    fn end_type(&mut self, id: TypeHash) -> GenerationResult<()> {
        let conv = self
            .registry
            .get(id)
            .ok_or_else(|| RegistrationError::TypeNotFound(id.to_string()))?;

        self.header.raw(&conv.type_api(&self.name));
        self.source
            .line(format!("// {} type glue", conv.canonical_name));
        self.source.line(format!(
            "static const char *{} = \"{}\";",
            conv.type_tag, conv.canonical_name
        ));
        self.source.blank();
        self.source.raw(&conv.type_glue(&self.name));

        debug!(target: "gluegen", ty = %conv.canonical_name, "end type");
        Ok(())
    }

    /// Declare `base` as a direct base of `name`.
    pub fn add_class_base(&mut self, name: &str, base: &str) -> GenerationResult<()> {
        let derived = self.registry.require(name)?;
        let base = self.registry.require(base)?;
        self.registry.add_base(derived, base)?;
        Ok(())
    }

    fn owner(&self, ty: &str) -> GenerationResult<TypeHash> {
        self.registry
            .select(&parse_type(ty)?)?
            .ok_or_else(|| RegistrationError::TypeNotFound(ty.to_string()).into())
    }

    // ==========================================================================
    // Functions, Constructors, Methods
    // ==========================================================================

    pub fn bind_function<I, S>(&mut self, name: &str, rval: &str, args: I) -> GenerationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bind_function_overloads(name, &[Signature::new(rval, args)])
    }

    pub fn bind_function_overloads(
        &mut self,
        name: &str,
        signatures: &[Signature],
    ) -> GenerationResult<()> {
        self.bind_overloads(BindingContext::function(name), signatures, None)
    }

    pub fn bind_constructor<I, S>(&mut self, ty: &str, args: I) -> GenerationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bind_constructor_overloads(ty, [args])
    }

    /// Bind a constructor taking any of the given argument lists.
    pub fn bind_constructor_overloads<P, I, S>(&mut self, ty: &str, proto_args: P) -> GenerationResult<()>
    where
        P: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self
            .owner(ty)
            .map_err(|err| err.in_binding(format!("{} constructor", ty)))?;
        let signatures: Vec<_> = proto_args
            .into_iter()
            .map(|args| Signature::new(ty, args))
            .collect();
        self.bind_overloads(BindingContext::constructor(ty, id), &signatures, None)
    }

    pub fn bind_method<I, S>(
        &mut self,
        ty: &str,
        name: &str,
        rval: &str,
        args: I,
    ) -> GenerationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bind_method_overloads(ty, name, &[Signature::new(rval, args)])
    }

    pub fn bind_method_overloads(
        &mut self,
        ty: &str,
        name: &str,
        signatures: &[Signature],
    ) -> GenerationResult<()> {
        let id = self
            .owner(ty)
            .map_err(|err| err.in_binding(format!("{}.{} method", ty, name)))?;
        self.bind_overloads(BindingContext::method(ty, name, id), signatures, None)
    }

    /// Resolve, emit and record one overload set. Nothing reaches the source
    /// unless every step succeeds; `prelude` is written just before the proxy.
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn bind_overloads(
        &mut self,
        ctx: BindingContext,
        signatures: &[Signature],
        prelude: Option<&CodeWriter>,
    ) -> GenerationResult<()> {
        let protos = prepare_protos(&self.registry, signatures, &ctx)?;
        let tree = DispatchTree::build(&protos, ctx.to_string())?;

        let mut out = self.source.fork();
        out.line(format!("// {}", ctx.bound_name()));
        emit_overload_set(&mut out, &self.backend, &self.registry, &ctx, &protos, &tree)?;
        out.blank();

        debug!(
            target: "gluegen",
            binding = %ctx,
            proxy = %ctx.proxy_name(),
            prototypes = protos.len(),
            arities = tree.arms.len(),
            "bound overload set"
        );

        let bound = BoundFunction {
            name: ctx.bound_name(),
            proxy_name: ctx.proxy_name(),
            protos,
        };

        match ctx {
            BindingContext::Function { .. } => self.bound_functions.push(bound),
            BindingContext::Constructor { converter, .. } => {
                self.converter_mut(converter)?.constructor = Some(bound);
            }
            BindingContext::Method { converter, .. } => {
                self.converter_mut(converter)?.methods.push(bound);
            }
        }

        if let Some(prelude) = prelude {
            self.source.raw(prelude.as_str());
        }
        self.source.raw(out.as_str());
        Ok(())
    }

    fn converter_mut(&mut self, id: TypeHash) -> GenerationResult<&mut TypeConverter> {
        self.registry
            .get_mut(id)
            .ok_or_else(|| RegistrationError::TypeNotFound(id.to_string()).into())
    }

    // ==========================================================================
    // Members
    // ==========================================================================

    /// Bind a data member (`"<type> <name>"`) of `ty` through a getter and a
    /// setter proxy.
    pub fn bind_member(&mut self, ty: &str, member: &str) -> GenerationResult<()> {
        let accessors = MemberAccessors::plan(&self.registry, ty, member)?;

        let mut out = self.source.fork();
        out.line(format!(
            "// get/set {} {}::{}",
            accessors.member.ctype,
            ty,
            accessors.name()
        ));
        accessors.emit(&mut out, &self.backend, &self.registry)?;
        out.blank();

        debug!(
            target: "gluegen",
            ty,
            member = accessors.name(),
            getter = %accessors.getter,
            setter = %accessors.setter,
            "bound member"
        );

        let owner = accessors.owner;
        self.converter_mut(owner)?.members.push(accessors.member);
        self.source.raw(out.as_str());
        Ok(())
    }

    pub fn bind_members<I, S>(&mut self, ty: &str, members: I) -> GenerationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for member in members {
            self.bind_member(ty, member.as_ref())?;
        }
        Ok(())
    }

    // ==========================================================================
    // Function Templates
    // ==========================================================================

    /// Declare a function template with parameters `params`. Its return and
    /// argument types may name those parameters.
    pub fn decl_function_template<P, A>(&mut self, name: &str, params: P, rval: &str, args: A)
    where
        P: IntoIterator,
        P::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        let template = FunctionTemplate::new(name, params, rval, args);
        self.templates.insert(name.to_string(), template);
    }

    /// Instantiate template `template` with `bind_args`, emit its wrapper
    /// and bind the wrapper as free function `bound_name`.
    pub fn bind_function_template<I, S>(
        &mut self,
        template: &str,
        bound_name: &str,
        bind_args: I,
    ) -> GenerationResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bind_args: Vec<String> = bind_args.into_iter().map(Into::into).collect();
        let instance = self
            .templates
            .get(template)
            .ok_or_else(|| GenerationError::UnknownTemplate(template.to_string()))?
            .instantiate(&bind_args)?;

        let mut wrapper = self.source.fork();
        instance.emit_wrapper(&mut wrapper, bound_name);
        wrapper.blank();

        self.bind_overloads(
            BindingContext::function(bound_name),
            &[instance.signature()],
            Some(&wrapper),
        )
    }

    // ==========================================================================
    // Output
    // ==========================================================================

    /// Comment listing every bound free function.
    pub fn summary(&self) -> String {
        let mut out = format!("// Bound {} global functions:\n", self.bound_functions.len());
        for function in &self.bound_functions {
            out.push_str(&format!(
                "//\t- {} bound as {}\n",
                function.name, function.proxy_name
            ));
        }
        out
    }

    /// Append the bound function summary to the source.
    pub fn output_summary(&mut self) {
        let summary = self.summary();
        self.source.raw(&summary);
        self.source.blank();
    }

    /// Close the session and assemble the artifacts.
    ///
    /// Source layout: disclaimer, includes, ownership policy enumeration,
    /// upcast declaration, declared glue, upcast definition.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn finalize(mut self) -> GenerationResult<GeneratedOutput> {
        let graph = CastGraph::build(&self.registry)?;

        if self.options.emit_summary {
            self.output_summary();
        }

        let mut source = self.source.fork();
        source.line(format!("// {}", self.options.disclaimer));
        source.blank();
        for path in &self.system_includes {
            source.line(format!("#include <{}>", path));
        }
        for path in &self.user_includes {
            source.line(format!("#include \"{}\"", path));
        }
        source.blank();

        let policies: Vec<_> = OwnershipPolicy::ALL.iter().map(|p| p.as_str()).collect();
        source.line(format!("enum OwnershipPolicy {{ {} }};", policies.join(", ")));
        source.blank();
        source.line(format!("{};", upcast_signature()));
        source.blank();

        source.raw(self.source.as_str());
        emit_upcast_function(&mut source, &self.registry, &graph)?;

        let mut header = self.header.fork();
        header.line(format!("// {}", self.options.disclaimer));
        header.blank();
        header.raw(self.header.as_str());

        info!(
            target: "gluegen",
            module = %self.name,
            types = self.registry.len(),
            functions = self.bound_functions.len(),
            casts = graph.edge_count(),
            "session finalized"
        );

        Ok(GeneratedOutput {
            header: header.into_string(),
            source: source.into_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gluegen_compiler::ScopeKind;
    use gluegen_core::{ParseError, TypeDescriptor};
    use gluegen_registry::ConverterCodegen;

    struct Plain;

    impl ConverterCodegen for Plain {
        fn check_call(&self, conv: &TypeConverter, input: &str) -> String {
            format!("is_{}({})", conv.clean_name, input)
        }

        fn to_c_call(&self, conv: &TypeConverter, input: &str, out_var_p: &str) -> String {
            format!("to_{}({}, {});\n", conv.clean_name, input, out_var_p)
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
                "obj {} = from_{}({}, {});\n",
                out_var, conv.clean_name, in_var_p, ownership
            )
        }

        fn type_api(&self, conv: &TypeConverter, module: &str) -> String {
            format!("// {} api of {}\n", module, conv.bound_name)
        }
    }

    struct Mini;

    impl Backend for Mini {
        fn language(&self) -> &str {
            "Mini"
        }

        fn open_scope(&self, out: &mut CodeWriter, _kind: ScopeKind, proxy: &str, max: usize) {
            out.line(format!("fn {}({}) {{", proxy, max));
        }

        fn close_scope(&self, out: &mut CodeWriter, _kind: ScopeKind) {
            out.line("}");
        }

        fn get_arg(&self, index: usize) -> String {
            format!("a{}", index)
        }

        fn get_self(&self) -> String {
            "me".into()
        }

        fn commit_rvals(&self, out: &mut CodeWriter, rvals: &[String]) {
            out.line(format!("ret({});", rvals.join(", ")));
        }

        fn set_error(&self, out: &mut CodeWriter, category: &str, message: &str) {
            out.line(format!("raise({}, {});", category, message));
        }

        fn class_converter(&self, name: &str) -> Result<TypeConverter, ParseError> {
            TypeConverter::with_storage(name, &format!("{}*", name), Plain)
        }
    }

    fn session() -> Generator<Mini> {
        let mut generator = Generator::start("demo", Mini, GeneratorOptions::default());
        generator.bind_type(TypeConverter::new("int", Plain).unwrap()).unwrap();
        generator
    }

    #[test]
    fn start_reports_language() {
        let generator = session();
        assert_eq!(generator.language(), "Mini");
        assert_eq!(generator.name(), "demo");
        assert_eq!(generator.registry().len(), 1);
    }

    #[test]
    fn duplicate_type_is_an_error() {
        let mut generator = session();
        let err = generator
            .bind_type(TypeConverter::new("int", Plain).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::Registration(RegistrationError::DuplicateType("int".into()))
        );
    }

    #[test]
    fn bound_functions_are_recorded() {
        let mut generator = session();
        generator.bind_function("add", "int", ["int a", "int b"]).unwrap();
        generator.bind_function("gs::reset", "void", Vec::<String>::new()).unwrap();

        let names: Vec<_> = generator
            .bound_functions()
            .iter()
            .map(|f| (f.name.as_str(), f.proxy_name.as_str()))
            .collect();
        assert_eq!(names, [("add", "_add__"), ("gs::reset", "_gs__reset__")]);
        assert_eq!(
            generator.summary(),
            "// Bound 2 global functions:\n//\t- add bound as _add__\n//\t- gs::reset bound as _gs__reset__\n"
        );
    }

    #[test]
    fn class_constructor_and_methods_land_on_converter() {
        let mut generator = session();
        let id = generator.begin_class("Counter").unwrap();
        generator.bind_constructor("Counter", ["int start"]).unwrap();
        generator.bind_method("Counter", "get", "int", Vec::<String>::new()).unwrap();
        generator.bind_member("Counter", "int step").unwrap();
        generator.end_class("Counter").unwrap();

        let conv = generator.registry().get(id).unwrap();
        let ctor = conv.constructor.as_ref().unwrap();
        assert_eq!(ctor.proxy_name, "_Counter__constructor__");
        assert_eq!(conv.methods[0].proxy_name, "_Counter__get__");
        assert_eq!(conv.members[0].name.as_deref(), Some("step"));
        assert!(generator.bound_functions().is_empty());
    }

    #[test]
    fn unknown_owner_names_the_binding() {
        let mut generator = session();
        let err = generator
            .bind_method("Ghost", "boo", "void", Vec::<String>::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Ghost.boo method: type not found: Ghost");

        let err = generator.bind_constructor("Ghost", ["int"]).unwrap_err();
        assert_eq!(err.to_string(), "Ghost constructor: type not found: Ghost");
    }

    #[test]
    fn class_base_requires_both_types() {
        let mut generator = session();
        generator.begin_class("A").unwrap();
        assert!(matches!(
            generator.add_class_base("A", "Missing"),
            Err(GenerationError::Registration(RegistrationError::TypeNotFound(_)))
        ));
        assert!(matches!(
            generator.add_class_base("A", "A"),
            Err(GenerationError::Registration(RegistrationError::SelfInheritance(_)))
        ));
    }

    #[test]
    fn template_errors() {
        let mut generator = session();
        assert_eq!(
            generator.bind_function_template("nope", "nope_int", ["int"]),
            Err(GenerationError::UnknownTemplate("nope".into()))
        );

        generator.decl_function_template("max", ["T"], "T", ["T", "T"]);
        assert!(matches!(
            generator.bind_function_template("max", "max_int", ["int", "int"]),
            Err(GenerationError::TemplateArity { .. })
        ));
        generator.bind_function_template("max", "max_int", ["int"]).unwrap();
        assert_eq!(generator.bound_functions()[0].name, "max_int");
    }

    #[test]
    fn failed_template_bind_leaves_no_wrapper() {
        let mut generator = session();
        generator.decl_function_template("max", ["T"], "T", ["T", "T"]);
        let err = generator
            .bind_function_template("max", "max_double", ["double"])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "function max_double: type not found: double"
        );
        assert!(generator.bound_functions().is_empty());

        let output = generator.finalize().unwrap();
        assert!(!output.source.contains("max_double"), "{}", output.source);
        assert!(!output.source.contains("max<double>"));
    }

    #[test]
    fn duplicate_class_writes_api_once() {
        let mut generator = session();
        generator.begin_class("A").unwrap();
        generator.end_class("A").unwrap();
        assert_eq!(
            generator.begin_class("A"),
            Err(GenerationError::Registration(RegistrationError::DuplicateType("A".into())))
        );

        let output = generator.finalize().unwrap();
        assert_eq!(output.source.matches("// demo api of A\n").count(), 1);
        assert_eq!(output.header.matches("// demo api of A\n").count(), 1);
    }

    #[test]
    fn failed_member_bind_writes_nothing() {
        let mut generator = session();
        let id = generator.begin_class("A").unwrap();
        assert!(generator.bind_member("A", "double d").is_err());
        generator.end_class("A").unwrap();
        assert!(generator.registry().get(id).unwrap().members.is_empty());

        let output = generator.finalize().unwrap();
        assert!(!output.source.contains("_A_get_d"));
    }

    #[test]
    fn insert_code_targets() {
        let mut generator = session();
        generator.insert_code("// both\n", Artifact::HEADER | Artifact::SOURCE);
        generator.insert_code("// header only\n", Artifact::HEADER);
        let output = generator.finalize().unwrap();
        assert!(output.header.contains("// both\n// header only\n"));
        assert!(output.source.contains("// both\n"));
        assert!(!output.source.contains("// header only"));
    }

    #[test]
    fn finalize_layout() {
        let mut generator = session();
        generator.add_include("mylib.h", false);
        generator.add_include("vector", true);
        let output = generator.finalize().unwrap();

        let expected_prefix = "\
// This file is automatically generated, do not modify manually!

#include <cstdint>
#include <vector>
#include \"mylib.h\"

enum OwnershipPolicy { NonOwning, Copy, Owning };

void *_type_tag_upcast(void *in_p, const char *in_type_tag, const char *out_type_tag);

// int type glue
static const char *__int_type_tag = \"int\";

";
        assert!(output.source.starts_with(expected_prefix), "{}", output.source);
        assert!(output.source.ends_with("\treturn out_p;\n}\n"));
        assert!(output.header.starts_with("// This file is automatically generated"));
        assert!(output.header.contains("// demo api of int\n"));
    }

    #[test]
    fn summary_option() {
        let mut generator = Generator::start("demo", Mini, GeneratorOptions::new().with_summary(true));
        generator.bind_type(TypeConverter::new("int", Plain).unwrap()).unwrap();
        generator.bind_function("one", "int", Vec::<String>::new()).unwrap();
        let output = generator.finalize().unwrap();
        assert!(output.source.contains("// Bound 1 global functions:\n//\t- one bound as _one__\n"));
    }
}
