// Graph builder and compile-time validation
//
// A graph is built once at startup from a declarative node/edge
// definition and validated by `compile()`. After compilation the
// structure is immutable and shared read-only across all concurrent runs.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use agentgraph_core::AgentState;

use crate::graph::compiled::{Edge, Graph};
use crate::graph::error::GraphDefinitionError;
use crate::graph::transition::Transition;
use crate::node::Node;

/// A conditional-edge predicate: a pure function of state selecting one of
/// the candidate transitions declared at build time.
pub(crate) type RouterFn = Arc<dyn Fn(&AgentState) -> Transition + Send + Sync>;

/// Builder for a graph definition
///
/// Add nodes and edges, designate the entry node, then `compile()` to
/// obtain an executable [`Graph`]. All structural validation happens in
/// `compile`; the builder itself never fails.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: HashMap<String, Arc<dyn Node>>,
    duplicates: Vec<String>,
    edges: HashMap<String, Edge>,
    entry: Option<String>,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a node under a unique id
    pub fn add_node(mut self, id: impl Into<String>, node: impl Node + 'static) -> Self {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            self.duplicates.push(id.clone());
        }
        self.nodes.insert(id, Arc::new(node));
        self
    }

    /// Declare an unconditional edge: after `from` runs, control moves to `to`
    pub fn add_edge(mut self, from: impl Into<String>, to: Transition) -> Self {
        self.edges.insert(from.into(), Edge::Direct(to));
        self
    }

    /// Declare a conditional edge: after `from` runs, the router picks the
    /// next transition from the fixed candidate set.
    ///
    /// The router must be a pure function of state. This is a usage
    /// contract; it cannot be enforced at compile time.
    pub fn add_conditional_edge(
        mut self,
        from: impl Into<String>,
        router: impl Fn(&AgentState) -> Transition + Send + Sync + 'static,
        candidates: Vec<Transition>,
    ) -> Self {
        self.edges.insert(
            from.into(),
            Edge::Conditional {
                router: Arc::new(router),
                candidates,
            },
        );
        self
    }

    /// Designate the entry node
    pub fn entry(mut self, id: impl Into<String>) -> Self {
        self.entry = Some(id.into());
        self
    }

    /// Validate the definition and produce an immutable graph.
    ///
    /// Rejected definitions: duplicate node ids, missing or undeclared
    /// entry, edges touching undeclared nodes, conditional candidates
    /// naming undeclared nodes, nodes with no outgoing edge, and graphs
    /// where the terminal marker is unreachable from the entry.
    pub fn compile(self) -> Result<Graph, GraphDefinitionError> {
        if let Some(id) = self.duplicates.into_iter().next() {
            return Err(GraphDefinitionError::DuplicateNode(id));
        }

        let entry = self.entry.ok_or(GraphDefinitionError::MissingEntry)?;
        if !self.nodes.contains_key(&entry) {
            return Err(GraphDefinitionError::UnknownEntry(entry));
        }

        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(GraphDefinitionError::UnknownEdgeSource(from.clone()));
            }
            match edge {
                Edge::Direct(Transition::Node(to)) if !self.nodes.contains_key(to) => {
                    return Err(GraphDefinitionError::UnknownEdgeTarget {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
                Edge::Conditional { candidates, .. } => {
                    for candidate in candidates {
                        if let Transition::Node(to) = candidate {
                            if !self.nodes.contains_key(to) {
                                return Err(GraphDefinitionError::UnknownCandidate {
                                    from: from.clone(),
                                    candidate: to.clone(),
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        for id in self.nodes.keys() {
            if !self.edges.contains_key(id) {
                return Err(GraphDefinitionError::MissingRoute(id.clone()));
            }
        }

        if !end_reachable(&entry, &self.edges) {
            return Err(GraphDefinitionError::EndUnreachable(entry));
        }

        Ok(Graph::new(self.nodes, self.edges, entry))
    }
}

/// Breadth-first reachability from the entry over all declared transitions.
fn end_reachable(entry: &str, edges: &HashMap<String, Edge>) -> bool {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::from([entry]);

    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        let Some(edge) = edges.get(current) else {
            continue;
        };
        let targets: Vec<&Transition> = match edge {
            Edge::Direct(t) => vec![t],
            Edge::Conditional { candidates, .. } => candidates.iter().collect(),
        };
        for target in targets {
            match target {
                Transition::End => return true,
                Transition::Node(id) => queue.push_back(id.as_str()),
            }
        }
    }

    false
}
