// Error types for graph execution

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while executing a compiled graph
///
/// Agent-recoverable tool failures (bad arguments, a tool's own runtime
/// error) never surface through this type during a run; the tool node
/// absorbs them into the message log as error-carrying tool results.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Model provider error; aborts the current run, last checkpoint intact
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// Infrastructure-level tool failure
    #[error("tool execution failed: {0}")]
    ToolExecution(String),

    /// Tool call arguments did not match the declared schema
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidToolArguments { tool: String, reason: String },

    /// Run terminated because the configured step limit was reached
    #[error("step limit ({0}) exceeded")]
    StepLimitExceeded(usize),

    /// Run was cancelled (or a node invocation timed out)
    #[error("execution cancelled")]
    Cancelled,

    /// Checkpoint storage backend error
    #[error("checkpoint store error: {0}")]
    Checkpoint(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Create a model invocation error
    pub fn model(msg: impl Into<String>) -> Self {
        EngineError::ModelInvocation(msg.into())
    }

    /// Create a tool execution error
    pub fn tool(msg: impl Into<String>) -> Self {
        EngineError::ToolExecution(msg.into())
    }

    /// Create an invalid-arguments error
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidToolArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Create a checkpoint store error
    pub fn checkpoint(msg: impl Into<String>) -> Self {
        EngineError::Checkpoint(msg.into())
    }
}
