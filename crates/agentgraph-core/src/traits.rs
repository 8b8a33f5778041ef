// Core traits for pluggable backends
//
// These traits allow the engine to be used with different collaborators:
// - In-memory implementations for examples and testing
// - Provider adapters and durable stores for production

use async_trait::async_trait;

use crate::checkpoint::Checkpoint;
use crate::error::Result;
use crate::message::Message;
use crate::state::AgentState;

// ============================================================================
// ModelProvider - For invoking the reasoning capability
// ============================================================================

/// Trait for model providers
///
/// Implementations adapt a language-model provider to the engine's
/// contract: given the full message history, return one assistant message
/// that carries either final content or a nonempty tool-call sequence.
/// Provider failures surface as `EngineError::ModelInvocation`; the engine
/// never retries internally.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Invoke the model with the current message history
    async fn invoke(&self, messages: &[Message]) -> Result<Message>;
}

// ============================================================================
// CheckpointStore - For persisting state snapshots
// ============================================================================

/// Trait for checkpoint storage backends
///
/// Implementations can keep checkpoints in memory, on disk, or in an
/// external store. The engine only requires this contract:
/// - `save` is atomic per thread id; concurrent saves for the same thread
///   are serialized
/// - `load` returns the highest-sequence checkpoint, or `None` on first
///   contact with a new thread id (callers treat that as "start fresh")
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist a new snapshot; sequence number = previous + 1.
    ///
    /// `next_node` records where a resumed run should pick up; `None`
    /// means nothing is pending and resumption starts at the graph entry.
    async fn save(
        &self,
        thread_id: &str,
        state: AgentState,
        next_node: Option<String>,
    ) -> Result<Checkpoint>;

    /// Load the latest checkpoint for the thread
    async fn load(&self, thread_id: &str) -> Result<Option<Checkpoint>>;

    /// All checkpoints for the thread, oldest first (audit/replay)
    async fn history(&self, thread_id: &str) -> Result<Vec<Checkpoint>>;
}
