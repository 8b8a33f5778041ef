// Built-in node kinds: model (reason) and tool (act)

mod model;
mod tool;

pub use model::ModelNode;
pub use tool::ToolNode;

use std::sync::Arc;

use agentgraph_core::{ModelProvider, ToolRegistry};

use crate::graph::{Graph, GraphBuilder, GraphDefinitionError, Transition};
use crate::router::{tools_condition, MODEL_NODE, TOOL_NODE};

/// Build the canonical two-node reason/act graph:
///
/// ```text
/// agent --(pending tool calls)--> tools --> agent
///   \--(final answer)--> End
/// ```
pub fn agent_graph(
    provider: Arc<dyn ModelProvider>,
    tools: ToolRegistry,
) -> Result<Graph, GraphDefinitionError> {
    agent_graph_with(ModelNode::new(provider), ToolNode::new(tools))
}

/// Same shape as [`agent_graph`], with caller-configured nodes (e.g. a
/// model node wrapped in a retry policy).
pub fn agent_graph_with(
    model: ModelNode,
    tools: ToolNode,
) -> Result<Graph, GraphDefinitionError> {
    GraphBuilder::new()
        .add_node(MODEL_NODE, model)
        .add_node(TOOL_NODE, tools)
        .add_conditional_edge(
            MODEL_NODE,
            tools_condition,
            vec![Transition::node(TOOL_NODE), Transition::End],
        )
        .add_edge(TOOL_NODE, Transition::node(MODEL_NODE))
        .entry(MODEL_NODE)
        .compile()
}
