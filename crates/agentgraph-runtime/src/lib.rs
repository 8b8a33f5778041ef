// Graph Runtime
//
// This crate compiles a declarative node/edge definition into an
// immutable graph and interprets it against a checkpoint store, one step
// at a time, until a router selects the terminal outcome.
//
// Key design decisions:
// - Routing outcomes form a closed Transition enum resolved by pure
//   functions of state, so router decisions are testable in isolation
// - The compiled Graph owns no state and is shared via Arc across runs
// - Every completed step persists exactly one checkpoint, giving
//   crash-consistent resumability at step granularity
// - Model and tool invocations are the only suspension points; both honor
//   a caller-supplied cancellation token and an optional per-node timeout

pub mod engine;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod retry;
pub mod router;

// Re-exports for convenience
pub use engine::{EngineConfig, ExecutionEngine, StepUpdate};
pub use graph::{Graph, GraphBuilder, GraphDefinitionError, Transition};
pub use node::Node;
pub use nodes::{agent_graph, agent_graph_with, ModelNode, ToolNode};
pub use retry::RetryPolicy;
pub use router::{tools_condition, MODEL_NODE, TOOL_NODE};
