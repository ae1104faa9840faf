//! Prototype preparation: from declared signatures to resolved prototypes.

use gluegen_core::{ArgSlot, GenerationError, GenerationResult, Prototype, ReturnSlot};
use gluegen_parser::{parse_arg, parse_type};
use gluegen_registry::ConverterRegistry;

use crate::context::BindingContext;

/// A declared call signature, as type expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub rval: String,
    pub args: Vec<String>,
}

impl Signature {
    pub fn new<I, S>(rval: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rval: rval.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Signature taking no argument.
    pub fn nullary(rval: impl Into<String>) -> Self {
        Self {
            rval: rval.into(),
            args: Vec::new(),
        }
    }
}

/// Parse every signature and resolve its converters.
///
/// Errors carry the description of `ctx`.
pub fn prepare_protos(
    registry: &ConverterRegistry,
    signatures: &[Signature],
    ctx: &BindingContext,
) -> GenerationResult<Vec<Prototype>> {
    signatures
        .iter()
        .map(|sig| prepare_proto(registry, sig, ctx))
        .collect::<GenerationResult<Vec<_>>>()
        .map_err(|err| match err {
            err @ GenerationError::UnsupportedArgument { .. } => err,
            err => err.in_binding(ctx.to_string()),
        })
}

fn prepare_proto(
    registry: &ConverterRegistry,
    sig: &Signature,
    ctx: &BindingContext,
) -> GenerationResult<Prototype> {
    let rval_ctype = parse_type(&sig.rval)?;
    let rval = ReturnSlot {
        converter: registry.select(&rval_ctype)?,
        ctype: rval_ctype,
    };

    let mut args = Vec::with_capacity(sig.args.len());
    for (index, expr) in sig.args.iter().enumerate() {
        let arg = parse_arg(expr)?;
        let converter = registry.select(&arg.ctype)?.ok_or_else(|| {
            GenerationError::UnsupportedArgument {
                context: ctx.to_string(),
                index,
                ctype: arg.ctype.to_string(),
            }
        })?;
        args.push(ArgSlot { arg, converter });
    }

    Ok(Prototype { rval, args })
}
