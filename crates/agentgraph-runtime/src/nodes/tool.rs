// Tool node: executes the calls requested by the latest assistant message
//
// Calls within one batch are independent and dispatched concurrently, but
// result messages are appended in the same order as the originating
// tool_calls sequence, so the log stays deterministic regardless of
// completion timing. A failed call never aborts the rest of the batch; it
// is recorded as an error-carrying tool result and the loop continues.

use agentgraph_core::{AgentState, Message, Result, StateUpdate, ToolRegistry};
use async_trait::async_trait;
use futures::future;
use tracing::debug;

use crate::node::Node;

/// Node wrapping a [`ToolRegistry`]
pub struct ToolNode {
    registry: ToolRegistry,
}

impl ToolNode {
    /// Create a tool node over the given registry
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

#[async_trait]
impl Node for ToolNode {
    async fn run(&self, state: &AgentState) -> Result<StateUpdate> {
        let calls = match state.latest_assistant() {
            Some(message) => message.tool_calls.clone(),
            None => Vec::new(),
        };
        if calls.is_empty() {
            return Ok(StateUpdate::default());
        }

        debug!(batch = calls.len(), "executing tool batch");

        // join_all preserves input order, which keeps results aligned with
        // the originating tool_calls sequence
        let results =
            future::join_all(calls.iter().map(|call| self.registry.execute_call(call))).await;

        let messages = results
            .into_iter()
            .map(|r| Message::tool_result(r.tool_call_id, r.result, r.error))
            .collect();

        Ok(StateUpdate::messages(messages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgraph_core::{EchoTool, FailingTool, ToolCall};

    fn state_with_calls(calls: Vec<ToolCall>) -> AgentState {
        let mut state = AgentState::with_user_message("go");
        state.apply(&StateUpdate::message(Message::assistant_with_tools(
            "", calls,
        )));
        state
    }

    fn call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }
    }

    #[tokio::test]
    async fn test_executes_batch_in_call_order() {
        let registry = ToolRegistry::builder().tool(EchoTool).build();
        let node = ToolNode::new(registry);

        let state = state_with_calls(vec![
            call("call_a", "echo", serde_json::json!({"message": "one"})),
            call("call_b", "echo", serde_json::json!({"message": "two"})),
        ]);

        let update = node.run(&state).await.unwrap();
        let ids: Vec<_> = update
            .messages
            .iter()
            .map(|m| m.tool_call_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["call_a", "call_b"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let registry = ToolRegistry::builder()
            .tool(EchoTool)
            .tool(FailingTool::with_tool_error("boom"))
            .build();
        let node = ToolNode::new(registry);

        let state = state_with_calls(vec![
            call("call_1", "failing_tool", serde_json::json!({})),
            call("call_2", "echo", serde_json::json!({"message": "still runs"})),
        ]);

        let update = node.run(&state).await.unwrap();
        assert_eq!(update.messages.len(), 2);
        assert!(update.messages[0].content.contains("boom"));
        assert!(update.messages[1].content.contains("still runs"));
    }

    #[tokio::test]
    async fn test_unregistered_tool_absorbed() {
        let node = ToolNode::new(ToolRegistry::new());

        let state = state_with_calls(vec![call("call_1", "missing", serde_json::json!({}))]);

        let update = node.run(&state).await.unwrap();
        assert_eq!(update.messages.len(), 1);
        assert!(update.messages[0].content.contains("not registered"));
    }

    #[tokio::test]
    async fn test_no_pending_calls_is_noop() {
        let node = ToolNode::new(ToolRegistry::new());
        let update = node
            .run(&AgentState::with_user_message("hi"))
            .await
            .unwrap();
        assert!(update.is_empty());
    }
}
