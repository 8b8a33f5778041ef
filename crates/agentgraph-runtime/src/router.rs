// Router predicates
//
// The router is the conditional-edge predicate attached to the model
// node's outgoing edge. It only reads state, never mutates it.

use agentgraph_core::AgentState;

use crate::graph::Transition;

/// Conventional id of the model (reason) node
pub const MODEL_NODE: &str = "agent";

/// Conventional id of the tool (act) node
pub const TOOL_NODE: &str = "tools";

/// Route based on the latest assistant message: pending tool calls go to
/// the tool node, anything else terminates the run.
pub fn tools_condition(state: &AgentState) -> Transition {
    match state.latest_assistant() {
        Some(message) if message.has_tool_calls() => Transition::node(TOOL_NODE),
        _ => Transition::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgraph_core::{Message, StateUpdate, ToolCall};

    fn tool_call() -> ToolCall {
        ToolCall {
            id: "call_1".to_string(),
            name: "search".to_string(),
            arguments: serde_json::json!({"query": "sf weather"}),
        }
    }

    #[test]
    fn test_routes_to_tools_on_pending_calls() {
        let mut state = AgentState::with_user_message("what's the weather?");
        state.apply(&StateUpdate::message(Message::assistant_with_tools(
            "",
            vec![tool_call()],
        )));

        assert_eq!(tools_condition(&state), Transition::node(TOOL_NODE));
    }

    #[test]
    fn test_routes_to_end_on_final_answer() {
        let mut state = AgentState::with_user_message("hi");
        state.apply(&StateUpdate::message(Message::assistant(
            "It's 60 degrees and foggy.",
        )));

        assert_eq!(tools_condition(&state), Transition::End);
    }

    #[test]
    fn test_routes_to_end_without_assistant_message() {
        let state = AgentState::with_user_message("hi");
        assert_eq!(tools_condition(&state), Transition::End);
    }

    #[test]
    fn test_does_not_mutate_state() {
        let mut state = AgentState::with_user_message("hi");
        state.apply(&StateUpdate::message(Message::assistant("done")));
        let before = state.clone();

        let _ = tools_condition(&state);

        assert_eq!(state, before);
    }
}
