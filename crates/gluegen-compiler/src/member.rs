//! Data member accessors.
//!
//! Every bound field gets an independent getter and setter proxy. Both
//! convert `self` to the owner's storage type and then work directly on the
//! field through a pointer expression (`&_self->field` for value fields).

use gluegen_core::{
    ArgDescriptor, GenerationError, GenerationResult, OwnershipPolicy, ParseError, TypeHash,
};
use gluegen_parser::{parse_arg, parse_type};
use gluegen_registry::ConverterRegistry;

use crate::backend::{Backend, ScopeKind};
use crate::dispatch::emit::{converter, decl_var};
use crate::writer::CodeWriter;

/// Resolved accessor pair of one data member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberAccessors {
    pub member: ArgDescriptor,
    /// Converter of the owning type.
    pub owner: TypeHash,
    /// Converter of the field type.
    pub converter: TypeHash,
    pub getter: String,
    pub setter: String,
    /// Pointer to the field, in the form the field converter expects.
    pub field_expr: String,
    /// Policy of the value handed out by the getter.
    pub ownership: OwnershipPolicy,
}

impl MemberAccessors {
    /// Resolve the accessors of `member_expr` (`"<type> <name>"`) on
    /// `owner_type`.
    pub fn plan(
        registry: &ConverterRegistry,
        owner_type: &str,
        member_expr: &str,
    ) -> GenerationResult<Self> {
        let context = format!("{} member", owner_type);
        Self::resolve(registry, owner_type, member_expr, &context)
            .map_err(|err| match err {
                err @ GenerationError::UnsupportedArgument { .. } => err,
                err => err.in_binding(context.clone()),
            })
    }

    fn resolve(
        registry: &ConverterRegistry,
        owner_type: &str,
        member_expr: &str,
        context: &str,
    ) -> GenerationResult<Self> {
        let owner_id = registry
            .select(&parse_type(owner_type)?)?
            .ok_or_else(|| GenerationError::UnsupportedArgument {
                context: context.to_string(),
                index: 0,
                ctype: owner_type.to_string(),
            })?;
        let owner = converter(registry, owner_id)?;

        let member = parse_arg(member_expr)?;
        let Some(name) = member.name.clone() else {
            return Err(ParseError::new(member_expr, member_expr.len(), "member name").into());
        };

        let field_id = registry.select(&member.ctype)?.ok_or_else(|| {
            GenerationError::UnsupportedArgument {
                context: context.to_string(),
                index: 0,
                ctype: member.ctype.to_string(),
            }
        })?;
        let field_conv = converter(registry, field_id)?;

        let field_expr =
            field_conv.prepare_var_for_conv(&format!("_self->{}", name), &member.ctype.ref_suffix);

        Ok(Self {
            getter: format!("_{}_get_{}", owner.clean_name, name),
            setter: format!("_{}_set_{}", owner.clean_name, name),
            ownership: OwnershipPolicy::for_return(&member.ctype.ref_suffix),
            owner: owner_id,
            converter: field_id,
            field_expr,
            member,
        })
    }

    /// Field name.
    pub fn name(&self) -> &str {
        self.member.name.as_deref().unwrap_or_default()
    }

    /// Emit both proxies.
    pub fn emit<B: Backend + ?Sized>(
        &self,
        out: &mut CodeWriter,
        backend: &B,
        registry: &ConverterRegistry,
    ) -> GenerationResult<()> {
        let owner = converter(registry, self.owner)?;
        let field = converter(registry, self.converter)?;

        backend.open_scope(out, ScopeKind::Getter, &self.getter, 0);
        out.indent();
        out.line(format!("{};", decl_var(&owner.storage_ctype, "_self")));
        out.block(&owner.to_c_call(&backend.get_self(), "&_self"));
        let rval = backend.rval_from_c_ptr(
            out,
            field,
            &self.member.ctype,
            "rval",
            &self.field_expr,
            self.ownership,
        );
        backend.commit_rvals(out, &[rval]);
        out.dedent();
        backend.close_scope(out, ScopeKind::Getter);

        backend.open_scope(out, ScopeKind::Setter, &self.setter, 1);
        out.indent();
        out.line(format!("{};", decl_var(&owner.storage_ctype, "_self")));
        out.block(&owner.to_c_call(&backend.get_self(), "&_self"));
        out.block(&field.to_c_call(&backend.get_arg(0), &self.field_expr));
        out.dedent();
        backend.close_scope(out, ScopeKind::Setter);

        Ok(())
    }
}
