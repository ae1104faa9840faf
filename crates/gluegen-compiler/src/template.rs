//! Function templates bound through concrete wrappers.
//!
//! A template is declared once with named parameters. Binding it substitutes
//! concrete types for those parameters, emits a plain function forwarding to
//! the explicit instantiation, and binds that function like any other.

use gluegen_core::{GenerationError, GenerationResult};
use gluegen_parser::parse_arg;

use crate::proto::Signature;
use crate::writer::CodeWriter;

/// A declared, not yet instantiated, function template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTemplate {
    pub name: String,
    pub params: Vec<String>,
    pub rval: String,
    pub args: Vec<String>,
}

/// A template with every parameter substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInstance {
    pub template: String,
    pub bind_args: Vec<String>,
    pub rval: String,
    pub args: Vec<String>,
}

impl FunctionTemplate {
    pub fn new<P, A>(
        name: impl Into<String>,
        params: impl IntoIterator<Item = P>,
        rval: impl Into<String>,
        args: impl IntoIterator<Item = A>,
    ) -> Self
    where
        P: Into<String>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            rval: rval.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Substitute `bind_args` positionally for the template parameters.
    pub fn instantiate(&self, bind_args: &[String]) -> GenerationResult<TemplateInstance> {
        if bind_args.len() != self.params.len() {
            return Err(GenerationError::TemplateArity {
                template: self.name.clone(),
                expected: self.params.len(),
                found: bind_args.len(),
            });
        }

        let rval = self.substitute(&self.rval, bind_args)?;
        let args = self
            .args
            .iter()
            .map(|arg| self.substitute(arg, bind_args))
            .collect::<GenerationResult<Vec<_>>>()?;

        Ok(TemplateInstance {
            template: self.name.clone(),
            bind_args: bind_args.to_vec(),
            rval,
            args,
        })
    }

    /// Replace a parameter name by its bound type, keeping the qualifiers and
    /// reference suffix written around it. Argument names are dropped.
    fn substitute(&self, expr: &str, bind_args: &[String]) -> GenerationResult<String> {
        let arg = parse_arg(expr)?;
        let ctype = arg.ctype;

        let bound = ctype
            .signedness
            .is_none()
            .then(|| {
                let name = ctype.name.to_string();
                self.params.iter().position(|param| *param == name)
            })
            .flatten()
            .map(|index| &bind_args[index]);

        let Some(bound) = bound else {
            return Ok(ctype.to_string());
        };

        let mut out = String::new();
        if ctype.is_const {
            out.push_str("const ");
        }
        out.push_str(bound);
        if !ctype.ref_suffix.is_empty() {
            out.push(' ');
            out.push_str(&ctype.ref_suffix.to_string());
        }
        Ok(out)
    }
}

impl TemplateInstance {
    /// Signature of the wrapper function.
    pub fn signature(&self) -> Signature {
        Signature::new(self.rval.clone(), self.args.clone())
    }

    /// `name<args>` spelling of the explicit instantiation.
    pub fn instantiation(&self) -> String {
        format!("{}<{}>", self.template, self.bind_args.join(", "))
    }

    /// Emit the forwarding wrapper named `bound_name`.
    pub fn emit_wrapper(&self, out: &mut CodeWriter, bound_name: &str) {
        let params: Vec<_> = self
            .args
            .iter()
            .enumerate()
            .map(|(i, arg)| format!("{} arg{}", arg, i))
            .collect();
        let forwarded: Vec<_> = (0..self.args.len()).map(|i| format!("arg{}", i)).collect();

        out.line(format!("// {} wrapper", self.instantiation()));
        out.line(format!(
            "static {} {}({}) {{",
            self.rval,
            bound_name,
            params.join(", ")
        ));
        out.indent();
        let call = format!("{}({});", self.instantiation(), forwarded.join(", "));
        if self.rval == "void" {
            out.line(call);
        } else {
            out.line(format!("return {}", call));
        }
        out.dedent();
        out.line("}");
    }
}
