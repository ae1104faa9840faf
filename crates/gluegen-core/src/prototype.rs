use crate::{ArgDescriptor, TypeDescriptor, TypeHash};

/// Return value of a prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnSlot {
    pub ctype: TypeDescriptor,
    /// `None` only for a `void` return.
    pub converter: Option<TypeHash>,
}

/// One argument of a prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSlot {
    pub arg: ArgDescriptor,
    pub converter: TypeHash,
}

impl ArgSlot {
    pub fn ctype(&self) -> &TypeDescriptor {
        &self.arg.ctype
    }
}

/// One call signature with every type resolved to its converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub rval: ReturnSlot,
    pub args: Vec<ArgSlot>,
}

impl Prototype {
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Converter required at argument position `index`.
    pub fn arg_converter(&self, index: usize) -> Option<TypeHash> {
        self.args.get(index).map(|slot| slot.converter)
    }
}
