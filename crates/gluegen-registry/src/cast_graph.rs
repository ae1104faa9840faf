//! Cast graph - the base -> derived table behind polymorphic upcasts.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: converter handles, in registration order
//! - Edges: derived -> direct base
//!
//! Each base collects every direct and transitive derived type. The generated
//! upcast function is a straight serialization of that table.

use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use rustc_hash::FxHashMap;
use tracing::debug;

use gluegen_core::{RegistrationError, TypeHash};

use crate::registry::ConverterRegistry;

/// Outcome of casting a pointer tagged `dynamic` toward `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastResult {
    /// Same tag: the pointer is returned unchanged.
    Identity,
    /// `dynamic` derives from `target`: the pointer is reinterpreted.
    Upcast,
    /// No entry: the cast yields null.
    Null,
}

/// Complete inheritance table of a registry.
#[derive(Debug)]
pub struct CastGraph {
    graph: DiGraph<TypeHash, ()>,
    nodes: FxHashMap<TypeHash, NodeIndex>,
    /// Base -> derived types, in registration order of the derived types.
    derived: FxHashMap<TypeHash, Vec<TypeHash>>,
    /// Every type, in registration order.
    order: Vec<TypeHash>,
}

impl CastGraph {
    /// Build the table from the base links declared in `registry`.
    ///
    /// Fails if the base links contain a cycle.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(registry: &ConverterRegistry) -> Result<Self, RegistrationError> {
        let mut graph = DiGraph::new();
        let mut nodes = FxHashMap::default();
        let mut order = Vec::with_capacity(registry.len());

        for conv in registry.iter() {
            nodes.insert(conv.id(), graph.add_node(conv.id()));
            order.push(conv.id());
        }

        for conv in registry.iter() {
            let derived = nodes[&conv.id()];
            for base in &conv.bases {
                let base = *nodes
                    .get(base)
                    .ok_or_else(|| RegistrationError::TypeNotFound(base.to_string()))?;
                graph.add_edge(derived, base, ());
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(Self::cycle_error(registry, &graph, cycle.node_id()));
        }

        // every type joins the derived set of each of its ancestors
        let mut derived: FxHashMap<TypeHash, Vec<TypeHash>> = FxHashMap::default();
        for &id in &order {
            let start = nodes[&id];
            let mut dfs = Dfs::new(&graph, start);
            while let Some(node) = dfs.next(&graph) {
                if node == start {
                    continue;
                }
                let entry = derived.entry(graph[node]).or_default();
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
        }

        debug!(
            target: "gluegen::cast",
            types = order.len(),
            bases = derived.len(),
            "cast graph built"
        );

        Ok(Self {
            graph,
            nodes,
            derived,
            order,
        })
    }

    fn cycle_error(
        registry: &ConverterRegistry,
        graph: &DiGraph<TypeHash, ()>,
        node: NodeIndex,
    ) -> RegistrationError {
        let name = |id: TypeHash| {
            registry
                .get(id)
                .map(|conv| conv.canonical_name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        let derived = graph[node];
        let base = graph
            .neighbors(node)
            .find(|&base| has_path_connecting(graph, base, node, None));

        match base {
            Some(base) if base != node => RegistrationError::CyclicInheritance {
                derived: name(derived),
                base: name(graph[base]),
            },
            _ => RegistrationError::SelfInheritance(name(derived)),
        }
    }

    /// Direct and transitive derived types of `base`.
    pub fn derived_of(&self, base: TypeHash) -> &[TypeHash] {
        self.derived.get(&base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Bases with at least one derived type, in registration order, each
    /// with its derived set.
    pub fn bases(&self) -> impl Iterator<Item = (TypeHash, &[TypeHash])> {
        self.order
            .iter()
            .filter_map(|id| self.derived.get(id).map(|set| (*id, set.as_slice())))
    }

    /// Evaluate the upcast function for a pair of tags.
    pub fn resolve(&self, dynamic: TypeHash, target: TypeHash) -> CastResult {
        if dynamic == target {
            CastResult::Identity
        } else if self.derived_of(target).contains(&dynamic) {
            CastResult::Upcast
        } else {
            CastResult::Null
        }
    }

    /// Number of direct base links.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: TypeHash) -> bool {
        self.nodes.contains_key(&id)
    }
}
