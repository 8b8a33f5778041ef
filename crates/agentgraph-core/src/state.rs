// Execution state and partial updates
//
// AgentState is the unit of data threaded through the graph. The message
// log is append-only: nodes return a StateUpdate and the engine merges it
// by appending messages and overwriting auxiliary values. Messages are
// never removed or reordered during a run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageRole};

/// State threaded through graph execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Ordered, append-only conversation log
    pub messages: Vec<Message>,

    /// Auxiliary keyed fields carried alongside the log
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl AgentState {
    /// Create a state seeded with a single user message
    pub fn with_user_message(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
            values: BTreeMap::new(),
        }
    }

    /// Merge a partial update: append its messages, overwrite its values
    pub fn apply(&mut self, update: &StateUpdate) {
        self.messages.extend(update.messages.iter().cloned());
        for (key, value) in &update.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// The last message in the log, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The most recent assistant message, if any
    pub fn latest_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Assistant)
    }
}

/// Partial state update produced by one node invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Messages to append to the log
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,

    /// Auxiliary values to overwrite
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, serde_json::Value>,
}

impl StateUpdate {
    /// Create an update appending a single message
    pub fn message(message: Message) -> Self {
        Self {
            messages: vec![message],
            values: BTreeMap::new(),
        }
    }

    /// Create an update appending several messages
    pub fn messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            values: BTreeMap::new(),
        }
    }

    /// Add an auxiliary value to this update
    pub fn with_value(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Check if this update carries no changes
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_appends_messages() {
        let mut state = AgentState::with_user_message("hi");
        let before = state.messages.clone();

        state.apply(&StateUpdate::message(Message::assistant("hello")));

        assert_eq!(state.messages.len(), 2);
        // existing messages untouched
        assert_eq!(&state.messages[..1], &before[..]);
    }

    #[test]
    fn test_apply_overwrites_values() {
        let mut state = AgentState::default();
        state.apply(
            &StateUpdate::default().with_value("input", serde_json::json!("sf weather")),
        );
        state.apply(&StateUpdate::default().with_value("input", serde_json::json!("updated")));

        assert_eq!(state.values["input"], serde_json::json!("updated"));
    }

    #[test]
    fn test_latest_assistant() {
        let mut state = AgentState::with_user_message("hi");
        assert!(state.latest_assistant().is_none());

        state.apply(&StateUpdate::message(Message::assistant("first")));
        state.apply(&StateUpdate::message(Message::tool_result("c1", None, None)));

        assert_eq!(state.latest_assistant().unwrap().content, "first");
    }

    #[test]
    fn test_empty_update() {
        assert!(StateUpdate::default().is_empty());
        assert!(!StateUpdate::message(Message::user("x")).is_empty());
    }
}
