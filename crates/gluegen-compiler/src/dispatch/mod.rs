//! Overload dispatch trees.
//!
//! An overload set is first lowered to a [`DispatchTree`], a backend-free
//! decision tree, and only then serialized to code by [`emit`]. The tree can
//! also be evaluated directly with [`DispatchTree::resolve`], which is how
//! dispatch behaviour is tested without a host runtime.
//!
//! ## Shape
//!
//! ```text
//! DispatchTree
//! └── ArityArm (arg_count == N), first-seen arity order
//!     └── DispatchNode::Check (argument i)
//!         ├── TypeCheck (converter c0) -> node for argument i+1
//!         ├── TypeCheck (converter c1) -> ...
//!         └── else: incorrect type for argument i
//!             ...
//!             └── DispatchNode::Call (exactly one prototype)
//! ```
//!
//! Branches at every level follow the declaration order of the prototypes,
//! so the generated ladder is stable across runs.

mod builder;
pub mod emit;

use gluegen_core::TypeHash;
use thiserror::Error;

pub use emit::emit_overload_set;

/// Runtime dispatch failure, as reported by generated code.
///
/// The `Display` text is the message embedded in the generated error
/// branches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("incorrect number of arguments to {context}")]
    ArgumentCount { context: String },

    #[error("incorrect type for argument {index} to {context}")]
    ArgumentType { index: usize, context: String },
}

impl DispatchError {
    /// Error category passed to the backend's error channel.
    pub const CATEGORY: &'static str = "runtime";
}

/// Decision tree selecting one prototype of an overload set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTree {
    /// Description of the binding context, used in error messages.
    pub context: String,
    pub arms: Vec<ArityArm>,
}

/// All prototypes of one arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArityArm {
    pub arg_count: usize,
    pub root: DispatchNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchNode {
    /// Test argument `arg_index` against each branch's converter in order.
    Check {
        arg_index: usize,
        branches: Vec<TypeCheck>,
    },
    /// Invoke prototype `proto` (index into the overload set).
    Call { proto: usize },
}

/// One rung of a type-check ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCheck {
    pub converter: TypeHash,
    pub then: DispatchNode,
}

impl DispatchTree {
    /// Largest arity in the set.
    pub fn max_arg_count(&self) -> usize {
        self.arms.iter().map(|arm| arm.arg_count).max().unwrap_or(0)
    }

    /// Evaluate the tree for a call with `arg_count` arguments.
    ///
    /// `satisfies(i, c)` answers whether runtime argument `i` passes the
    /// check of converter `c`. Returns the index of the selected prototype.
    pub fn resolve(
        &self,
        arg_count: usize,
        satisfies: impl Fn(usize, TypeHash) -> bool,
    ) -> Result<usize, DispatchError> {
        let arm = self
            .arms
            .iter()
            .find(|arm| arm.arg_count == arg_count)
            .ok_or_else(|| DispatchError::ArgumentCount {
                context: self.context.clone(),
            })?;

        let mut node = &arm.root;
        loop {
            match node {
                DispatchNode::Call { proto } => return Ok(*proto),
                DispatchNode::Check {
                    arg_index,
                    branches,
                } => {
                    node = branches
                        .iter()
                        .find(|branch| satisfies(*arg_index, branch.converter))
                        .map(|branch| &branch.then)
                        .ok_or_else(|| DispatchError::ArgumentType {
                            index: *arg_index,
                            context: self.context.clone(),
                        })?;
                }
            }
        }
    }
}
