// Compiled graph: immutable structure, owns no execution state
//
// Built by `GraphBuilder::compile`. Holds the node map, the designated
// entry node, and the edge/conditional-edge map. Shared via `Arc` across
// all concurrent runs without locking.

use std::collections::HashMap;
use std::sync::Arc;

use agentgraph_core::{AgentState, EngineError, Result};
use anyhow::anyhow;

use crate::graph::builder::RouterFn;
use crate::graph::transition::Transition;
use crate::node::Node;

/// One declared outgoing edge
pub(crate) enum Edge {
    /// Unconditional: the node always leads to this transition
    Direct(Transition),
    /// Conditional: the router selects one of the declared candidates
    Conditional {
        router: RouterFn,
        candidates: Vec<Transition>,
    },
}

/// A compiled, immutable graph of nodes and edges
pub struct Graph {
    nodes: HashMap<String, Arc<dyn Node>>,
    edges: HashMap<String, Edge>,
    entry: String,
}

impl Graph {
    pub(crate) fn new(
        nodes: HashMap<String, Arc<dyn Node>>,
        edges: HashMap<String, Edge>,
        entry: String,
    ) -> Self {
        Self {
            nodes,
            edges,
            entry,
        }
    }

    /// The designated entry node id
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// All declared node ids
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.keys().map(|s| s.as_str()).collect()
    }

    /// Look up a node by id
    pub(crate) fn node(&self, id: &str) -> Option<&Arc<dyn Node>> {
        self.nodes.get(id)
    }

    /// Resolve the transition out of `current` against the given state.
    ///
    /// Unconditional edges resolve directly; conditional edges invoke the
    /// router predicate and verify it picked one of its declared
    /// candidates.
    pub fn next(&self, current: &str, state: &AgentState) -> Result<Transition> {
        let edge = self
            .edges
            .get(current)
            .ok_or_else(|| EngineError::Internal(anyhow!("no edge declared for '{current}'")))?;

        match edge {
            Edge::Direct(transition) => Ok(transition.clone()),
            Edge::Conditional { router, candidates } => {
                let transition = router(state);
                if !candidates.contains(&transition) {
                    return Err(EngineError::Internal(anyhow!(
                        "router for '{current}' selected undeclared transition '{transition}'"
                    )));
                }
                Ok(transition)
            }
        }
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("entry", &self.entry)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}
