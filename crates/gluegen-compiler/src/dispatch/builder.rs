//! Lowering an overload set to a [`DispatchTree`].

use gluegen_core::{GenerationError, GenerationResult, Prototype, TypeHash};
use tracing::trace;

use super::{ArityArm, DispatchNode, DispatchTree, TypeCheck};

impl DispatchTree {
    /// Build the decision tree of an overload set.
    ///
    /// Prototypes are partitioned by arity, then split argument by argument
    /// on the converter each one requires. Every leaf must hold exactly one
    /// prototype; a set that converters alone cannot tell apart fails with
    /// `AmbiguousOverload`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(protos: &[Prototype], context: impl Into<String>) -> GenerationResult<Self> {
        let context = context.into();
        if protos.is_empty() {
            return Err(GenerationError::EmptyOverloadSet { context });
        }

        let mut arms = Vec::new();
        for (arg_count, members) in group_by_key(0..protos.len(), |&i| protos[i].arity()) {
            let root = build_node(protos, &members, 0, arg_count, &context)?;
            arms.push(ArityArm { arg_count, root });
        }

        Ok(DispatchTree { context, arms })
    }
}

fn build_node(
    protos: &[Prototype],
    members: &[usize],
    arg_index: usize,
    arg_count: usize,
    context: &str,
) -> GenerationResult<DispatchNode> {
    if arg_index == arg_count {
        return match members {
            [proto] => Ok(DispatchNode::Call { proto: *proto }),
            _ => Err(GenerationError::AmbiguousOverload {
                context: context.to_string(),
                arg_count,
                count: members.len(),
            }),
        };
    }

    let groups = group_by_key(members.iter().copied(), |&i| {
        protos[i].arg_converter(arg_index).unwrap_or(TypeHash::EMPTY)
    });

    let mut branches = Vec::with_capacity(groups.len());
    for (converter, group) in groups {
        trace!(
            target: "gluegen::dispatch",
            %context,
            arg_index,
            %converter,
            candidates = group.len(),
            "type check branch"
        );
        let then = build_node(protos, &group, arg_index + 1, arg_count, context)?;
        branches.push(TypeCheck { converter, then });
    }

    Ok(DispatchNode::Check {
        arg_index,
        branches,
    })
}

/// Stable grouping: groups appear in first-seen key order and keep their
/// members' order.
fn group_by_key<K: PartialEq>(
    items: impl IntoIterator<Item = usize>,
    key: impl Fn(&usize) -> K,
) -> Vec<(K, Vec<usize>)> {
    let mut groups: Vec<(K, Vec<usize>)> = Vec::new();
    for item in items {
        let k = key(&item);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}
