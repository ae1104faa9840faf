//! The type-tag upcast function.

use gluegen_core::GenerationResult;
use gluegen_registry::{CastGraph, ConverterRegistry};

use crate::dispatch::emit::converter;
use crate::writer::CodeWriter;

/// Name of the generated upcast function.
pub const UPCAST_FUNCTION: &str = "_type_tag_upcast";

/// Signature of the upcast function, without terminator.
pub fn upcast_signature() -> String {
    format!(
        "void *{}(void *in_p, const char *in_type_tag, const char *out_type_tag)",
        UPCAST_FUNCTION
    )
}

/// Emit the upcast function from the registry's inheritance table.
///
/// Identical tags return the pointer unchanged; a tag listed in the target's
/// derived set returns it reinterpreted as the target; anything else yields
/// `NULL`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn emit_upcast_function(
    out: &mut CodeWriter,
    registry: &ConverterRegistry,
    graph: &CastGraph,
) -> GenerationResult<()> {
    out.line("// type_tag based cast system");
    out.line(format!("{} {{", upcast_signature()));
    out.indent();
    out.line("if (out_type_tag == in_type_tag)");
    out.indent();
    out.line("return in_p;");
    out.dedent();
    out.blank();
    out.line("void *out_p = NULL;");
    out.blank();

    let mut any = false;
    for (base_id, derived) in graph.bases() {
        let base = converter(registry, base_id)?;
        let keyword = if any { "} else if" } else { "if" };
        out.line(format!("{} (out_type_tag == {}) {{", keyword, base.type_tag));
        out.indent();
        for (j, &derived_id) in derived.iter().enumerate() {
            let derived = converter(registry, derived_id)?;
            let keyword = if j == 0 { "if" } else { "else if" };
            out.line(format!("{} (in_type_tag == {})", keyword, derived.type_tag));
            out.indent();
            out.line(format!(
                "out_p = ({} *)(({} *)in_p);",
                base.canonical_name, derived.canonical_name
            ));
            out.dedent();
        }
        out.dedent();
        any = true;
    }
    if any {
        out.line("}");
        out.blank();
    }

    out.line("return out_p;");
    out.dedent();
    out.line("}");
    Ok(())
}
