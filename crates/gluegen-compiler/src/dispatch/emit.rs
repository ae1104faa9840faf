//! Serializing a [`DispatchTree`] through a [`Backend`].

use gluegen_core::{
    GenerationError, GenerationResult, OwnershipPolicy, Prototype, RefMarker, RegistrationError,
    TypeDescriptor, TypeHash, transform_var,
};
use gluegen_registry::{ConverterRegistry, TypeConverter};

use super::{DispatchError, DispatchNode, DispatchTree};
use crate::backend::Backend;
use crate::context::BindingContext;
use crate::writer::CodeWriter;

/// Local variable declaration.
pub fn decl_var(ctype: &TypeDescriptor, name: &str) -> String {
    format!("{} {}", ctype, name)
}

/// Look up a converter that prototype preparation already resolved.
pub(crate) fn converter(registry: &ConverterRegistry, id: TypeHash) -> GenerationResult<&TypeConverter> {
    registry
        .get(id)
        .ok_or_else(|| RegistrationError::TypeNotFound(id.to_string()).into())
}

/// Emit the proxy of one overload set: scope, arity ladder, type-check
/// ladders and one call sequence per prototype.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_overload_set<B: Backend + ?Sized>(
    out: &mut CodeWriter,
    backend: &B,
    registry: &ConverterRegistry,
    ctx: &BindingContext,
    protos: &[Prototype],
    tree: &DispatchTree,
) -> GenerationResult<()> {
    let emitter = Emitter {
        backend,
        registry,
        ctx,
        protos,
        context: &tree.context,
    };

    let kind = ctx.scope_kind();
    backend.open_scope(out, kind, &ctx.proxy_name(), tree.max_arg_count());
    out.indent();

    for (i, arm) in tree.arms.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "} else if" };
        out.line(format!(
            "{} ({} == {}) {{",
            keyword,
            backend.arg_count(),
            arm.arg_count
        ));
        out.indent();
        emitter.node(out, &arm.root)?;
        out.dedent();
    }

    out.line(if tree.arms.is_empty() { "{" } else { "} else {" });
    out.indent();
    emitter.error(
        out,
        DispatchError::ArgumentCount {
            context: tree.context.clone(),
        },
    );
    out.dedent();
    out.line("}");

    out.dedent();
    backend.close_scope(out, kind);
    Ok(())
}

struct Emitter<'a, B: Backend + ?Sized> {
    backend: &'a B,
    registry: &'a ConverterRegistry,
    ctx: &'a BindingContext,
    protos: &'a [Prototype],
    context: &'a str,
}

impl<B: Backend + ?Sized> Emitter<'_, B> {
    fn node(&self, out: &mut CodeWriter, node: &DispatchNode) -> GenerationResult<()> {
        match node {
            DispatchNode::Call { proto } => {
                let found = self.protos.get(*proto).ok_or_else(|| {
                    GenerationError::UnknownPrototype {
                        context: self.context.to_string(),
                        index: *proto,
                        count: self.protos.len(),
                    }
                })?;
                self.proto_call(out, found)
            }
            DispatchNode::Check {
                arg_index,
                branches,
            } => {
                let arg = self.backend.get_arg(*arg_index);
                for (i, branch) in branches.iter().enumerate() {
                    let conv = converter(self.registry, branch.converter)?;
                    let keyword = if i == 0 { "if" } else { "} else if" };
                    out.line(format!("{} ({}) {{", keyword, conv.check_call(&arg)));
                    out.indent();
                    self.node(out, &branch.then)?;
                    out.dedent();
                }

                out.line("} else {");
                out.indent();
                self.error(
                    out,
                    DispatchError::ArgumentType {
                        index: *arg_index,
                        context: self.context.to_string(),
                    },
                );
                out.dedent();
                out.line("}");
                Ok(())
            }
        }
    }

    fn error(&self, out: &mut CodeWriter, err: DispatchError) {
        self.backend
            .set_error(out, DispatchError::CATEGORY, &err.to_string());
    }

    /// Convert arguments, call the native target, convert and commit the
    /// result.
    fn proto_call(&self, out: &mut CodeWriter, proto: &Prototype) -> GenerationResult<()> {
        if let BindingContext::Method { converter: id, .. } = self.ctx {
            let conv = converter(self.registry, *id)?;
            out.line(format!("{};", decl_var(&conv.storage_ctype, "_self")));
            out.block(&conv.to_c_call(&self.backend.get_self(), "&_self"));
        }

        let mut call_args = Vec::with_capacity(proto.arity());
        for (i, slot) in proto.args.iter().enumerate() {
            let conv = converter(self.registry, slot.converter)?;
            let var = format!("arg{}", i);
            out.line(format!("{};", decl_var(&conv.storage_ctype, &var)));
            out.block(&conv.to_c_call(&self.backend.get_arg(i), &format!("&{}", var)));
            call_args.push(transform_var(
                &var,
                &conv.storage_ctype.ref_suffix,
                &slot.ctype().ref_suffix,
            ));
        }
        let call_args = call_args.join(", ");

        let mut rvals = Vec::new();
        match self.ctx {
            BindingContext::Constructor { converter: id, .. } => {
                let conv = converter(self.registry, proto.rval.converter.unwrap_or(*id))?;
                let rval = proto.rval.ctype.with_ref(RefMarker::Ptr);
                out.line(format!(
                    "{} = new {}({});",
                    decl_var(&rval, "rval"),
                    proto.rval.ctype,
                    call_args
                ));
                rvals.push(self.rval_from_c(out, conv, &rval, OwnershipPolicy::Owning));
            }
            BindingContext::Function { name } | BindingContext::Method { name, .. } => {
                let callee = match self.ctx {
                    BindingContext::Method { .. } => format!("_self->{}", name),
                    _ => name.clone(),
                };
                let rval = &proto.rval.ctype;
                match proto.rval.converter {
                    Some(id) => {
                        let conv = converter(self.registry, id)?;
                        out.line(format!(
                            "{} = {}({});",
                            decl_var(rval, "rval"),
                            callee,
                            call_args
                        ));
                        let ownership = OwnershipPolicy::for_return(&rval.ref_suffix);
                        rvals.push(self.rval_from_c(out, conv, rval, ownership));
                    }
                    None => out.line(format!("{}({});", callee, call_args)),
                }
            }
        }

        self.backend.commit_rvals(out, &rvals);
        Ok(())
    }

    fn rval_from_c(
        &self,
        out: &mut CodeWriter,
        conv: &TypeConverter,
        rval: &TypeDescriptor,
        ownership: OwnershipPolicy,
    ) -> String {
        let in_var_p = transform_var("rval", &rval.ref_suffix, &conv.conversion_ref());
        self.backend
            .rval_from_c_ptr(out, conv, rval, "rval", &in_var_p, ownership)
    }
}
