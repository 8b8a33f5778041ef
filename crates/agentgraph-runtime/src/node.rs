// Node trait
//
// A node is a named unit of computation: it transforms a read-only view of
// the state into a partial update. Nodes know nothing about edges; routing
// is the graph's concern.

use agentgraph_core::{AgentState, Result, StateUpdate};
use async_trait::async_trait;

/// A unit of computation in the graph
#[async_trait]
pub trait Node: Send + Sync {
    /// Invoke the node with a read-only view of the current state.
    ///
    /// The returned update is merged by the engine: messages are appended
    /// to the log, auxiliary values are overwritten.
    async fn run(&self, state: &AgentState) -> Result<StateUpdate>;
}
