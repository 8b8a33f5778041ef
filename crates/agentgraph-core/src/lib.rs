// Core Agent Abstractions
//
// This crate provides the storage-agnostic building blocks for a
// graph-driven agent loop (model call → tool execution → repeat):
//
// Key design decisions:
// - Uses traits (ModelProvider, CheckpointStore) for pluggable backends
// - Message log is append-only; state snapshots are immutable checkpoints
// - Tools are defined via a Tool trait and managed by a ToolRegistry
// - Error handling distinguishes between agent-recoverable tool failures
//   (absorbed into the conversation log) and infrastructure failures
//   (propagated to the caller)

pub mod checkpoint;
pub mod error;
pub mod message;
pub mod state;
pub mod tool_types;
pub mod tools;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use checkpoint::Checkpoint;
pub use error::{EngineError, Result};
pub use message::{Message, MessageRole};
pub use state::{AgentState, StateUpdate};
pub use tool_types::{ToolCall, ToolDefinition, ToolResult};
pub use tools::{
    validate_arguments, EchoTool, FailingTool, Tool, ToolOutcome, ToolRegistry,
    ToolRegistryBuilder,
};
pub use traits::{CheckpointStore, ModelProvider};

// In-memory implementation re-exports
pub use memory::{InMemoryCheckpointStore, ScriptedModel, ScriptedResponse};
