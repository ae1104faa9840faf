//! Binding contexts: what kind of construct an overload set is bound as.

use std::fmt;

use gluegen_core::{TypeHash, mangle};

use crate::backend::ScopeKind;

/// The construct an overload set is bound as.
///
/// The context derives the proxy symbol and, through `Display`, the
/// description used in every diagnostic about the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingContext {
    Function {
        name: String,
    },
    Constructor {
        ty: String,
        converter: TypeHash,
    },
    Method {
        ty: String,
        name: String,
        converter: TypeHash,
    },
}

impl BindingContext {
    pub fn function(name: impl Into<String>) -> Self {
        BindingContext::Function { name: name.into() }
    }

    pub fn constructor(ty: impl Into<String>, converter: TypeHash) -> Self {
        BindingContext::Constructor {
            ty: ty.into(),
            converter,
        }
    }

    pub fn method(ty: impl Into<String>, name: impl Into<String>, converter: TypeHash) -> Self {
        BindingContext::Method {
            ty: ty.into(),
            name: name.into(),
            converter,
        }
    }

    /// Symbol of the generated proxy.
    pub fn proxy_name(&self) -> String {
        match self {
            BindingContext::Function { name } => format!("_{}__", mangle(name)),
            BindingContext::Constructor { ty, .. } => format!("_{}__constructor__", mangle(ty)),
            BindingContext::Method { ty, name, .. } => format!("_{}__{}__", mangle(ty), name),
        }
    }

    /// Name the overload set is recorded under.
    pub fn bound_name(&self) -> String {
        match self {
            BindingContext::Function { name } | BindingContext::Method { name, .. } => {
                name.clone()
            }
            BindingContext::Constructor { ty, .. } => format!("{}__constructor__", ty),
        }
    }

    /// Converter of the owning type, if any.
    pub fn converter(&self) -> Option<TypeHash> {
        match self {
            BindingContext::Function { .. } => None,
            BindingContext::Constructor { converter, .. }
            | BindingContext::Method { converter, .. } => Some(*converter),
        }
    }

    pub fn scope_kind(&self) -> ScopeKind {
        match self {
            BindingContext::Method { .. } => ScopeKind::Method,
            _ => ScopeKind::Function,
        }
    }
}

impl fmt::Display for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingContext::Function { name } => write!(f, "function {}", name),
            BindingContext::Constructor { ty, .. } => write!(f, "{} constructor", ty),
            BindingContext::Method { ty, name, .. } => write!(f, "{}.{} method", ty, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_naming() {
        let ctx = BindingContext::function("gs::make_vec");
        assert_eq!(ctx.proxy_name(), "_gs__make_vec__");
        assert_eq!(ctx.to_string(), "function gs::make_vec");
        assert_eq!(ctx.bound_name(), "gs::make_vec");
        assert_eq!(ctx.converter(), None);
        assert_eq!(ctx.scope_kind(), ScopeKind::Function);
    }

    #[test]
    fn constructor_naming() {
        let id = TypeHash::from_name("gs::Vec3");
        let ctx = BindingContext::constructor("gs::Vec3", id);
        assert_eq!(ctx.proxy_name(), "_gs__Vec3__constructor__");
        assert_eq!(ctx.to_string(), "gs::Vec3 constructor");
        assert_eq!(ctx.bound_name(), "gs::Vec3__constructor__");
        assert_eq!(ctx.converter(), Some(id));
    }

    #[test]
    fn method_naming() {
        let id = TypeHash::from_name("Node");
        let ctx = BindingContext::method("Node", "get_name", id);
        assert_eq!(ctx.proxy_name(), "_Node__get_name__");
        assert_eq!(ctx.to_string(), "Node.get_name method");
        assert_eq!(ctx.scope_kind(), ScopeKind::Method);
    }
}
