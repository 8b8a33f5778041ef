// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them suitable for:
// - Standalone examples that don't need a durable backend
// - Unit tests
// - Quick prototyping
//
// The checkpoint store is an explicit, injected dependency: create it at
// process start, hand it to the engine, drop it at shutdown.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::checkpoint::Checkpoint;
use crate::error::Result;
use crate::message::Message;
use crate::state::AgentState;
use crate::tool_types::ToolCall;
use crate::traits::{CheckpointStore, ModelProvider};

// ============================================================================
// InMemoryCheckpointStore
// ============================================================================

/// In-memory checkpoint store
///
/// Stores checkpoint sequences in a HashMap keyed by thread id. The write
/// lock serializes saves, so per-thread sequence numbers are assigned
/// atomically; readers of other threads are never blocked for long.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCheckpointStore {
    threads: Arc<RwLock<HashMap<String, Vec<Checkpoint>>>>,
}

impl InMemoryCheckpointStore {
    /// Create a new in-memory checkpoint store
    pub fn new() -> Self {
        Self {
            threads: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get all thread ids with at least one checkpoint
    pub async fn threads(&self) -> Vec<String> {
        self.threads.read().await.keys().cloned().collect()
    }

    /// Drop all checkpoints for a thread
    pub async fn clear_thread(&self, thread_id: &str) {
        self.threads.write().await.remove(thread_id);
    }

    /// Pre-populate a thread with a state snapshot (useful for testing)
    pub async fn seed(&self, thread_id: &str, state: AgentState) -> Checkpoint {
        let mut threads = self.threads.write().await;
        let history = threads.entry(thread_id.to_string()).or_default();
        let seq = history.last().map(|c| c.seq + 1).unwrap_or(1);
        let checkpoint = Checkpoint::new(thread_id, seq, state, None);
        history.push(checkpoint.clone());
        checkpoint
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save(
        &self,
        thread_id: &str,
        state: AgentState,
        next_node: Option<String>,
    ) -> Result<Checkpoint> {
        let mut threads = self.threads.write().await;
        let history = threads.entry(thread_id.to_string()).or_default();
        let seq = history.last().map(|c| c.seq + 1).unwrap_or(1);
        let checkpoint = Checkpoint::new(thread_id, seq, state, next_node);
        history.push(checkpoint.clone());
        Ok(checkpoint)
    }

    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>> {
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .and_then(|h| h.last())
            .cloned())
    }

    async fn history(&self, thread_id: &str) -> Result<Vec<Checkpoint>> {
        Ok(self
            .threads
            .read()
            .await
            .get(thread_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// ScriptedModel - Returns predefined responses
// ============================================================================

/// A scripted model response
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ScriptedResponse {
    /// Create a text-only response (no tool calls)
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create a response requesting tool execution
    pub fn with_tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            text: String::new(),
            tool_calls,
        }
    }
}

/// Deterministic model stub for testing
///
/// Returns predefined responses in sequence and logs the full message
/// history of every invocation for assertions.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: RwLock<Vec<ScriptedResponse>>,
    call_index: RwLock<usize>,
    call_log: RwLock<Vec<Vec<Message>>>,
}

impl ScriptedModel {
    /// Create a new scripted model with no responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scripted model with the given response sequence
    pub fn with_responses(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: RwLock::new(responses),
            call_index: RwLock::new(0),
            call_log: RwLock::new(Vec::new()),
        }
    }

    /// Append a response to the script
    pub async fn add_response(&self, response: ScriptedResponse) {
        self.responses.write().await.push(response);
    }

    /// The message histories the model was invoked with
    pub async fn calls(&self) -> Vec<Vec<Message>> {
        self.call_log.read().await.clone()
    }

    /// Number of invocations so far
    pub async fn call_count(&self) -> usize {
        *self.call_index.read().await
    }
}

#[async_trait]
impl ModelProvider for ScriptedModel {
    async fn invoke(&self, messages: &[Message]) -> Result<Message> {
        self.call_log.write().await.push(messages.to_vec());

        let mut index = self.call_index.write().await;
        let responses = self.responses.read().await;
        let response = responses
            .get(*index)
            .cloned()
            .unwrap_or_else(|| ScriptedResponse::text("scripted model: no more responses"));
        *index += 1;

        if response.tool_calls.is_empty() {
            Ok(Message::assistant(response.text))
        } else {
            Ok(Message::assistant_with_tools(
                response.text,
                response.tool_calls,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_checkpoint_store_sequences() {
        let store = InMemoryCheckpointStore::new();

        let c1 = store
            .save("t1", AgentState::with_user_message("hi"), None)
            .await
            .unwrap();
        let c2 = store.save("t1", AgentState::default(), None).await.unwrap();

        assert_eq!(c1.seq, 1);
        assert_eq!(c2.seq, 2);

        let latest = store.load("t1").await.unwrap().unwrap();
        assert_eq!(latest.seq, 2);
    }

    #[tokio::test]
    async fn test_checkpoint_store_unknown_thread() {
        let store = InMemoryCheckpointStore::new();
        assert!(store.load("fresh").await.unwrap().is_none());
        assert!(store.history("fresh").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkpoint_store_threads_independent() {
        let store = InMemoryCheckpointStore::new();
        store.save("a", AgentState::default(), None).await.unwrap();
        store.save("b", AgentState::default(), None).await.unwrap();
        store.save("b", AgentState::default(), None).await.unwrap();

        assert_eq!(store.load("a").await.unwrap().unwrap().seq, 1);
        assert_eq!(store.load("b").await.unwrap().unwrap().seq, 2);
    }

    #[tokio::test]
    async fn test_history_oldest_first() {
        let store = InMemoryCheckpointStore::new();
        for _ in 0..3 {
            store.save("t", AgentState::default(), None).await.unwrap();
        }

        let history = store.history("t").await.unwrap();
        let seqs: Vec<u64> = history.iter().map(|c| c.seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_scripted_model_sequence() {
        let model = ScriptedModel::with_responses(vec![
            ScriptedResponse::text("first"),
            ScriptedResponse::text("second"),
        ]);

        let m1 = model.invoke(&[Message::user("hi")]).await.unwrap();
        let m2 = model.invoke(&[Message::user("hi")]).await.unwrap();

        assert_eq!(m1.content, "first");
        assert_eq!(m2.content, "second");
        assert_eq!(model.call_count().await, 2);
        assert_eq!(model.calls().await[0].len(), 1);
    }
}
