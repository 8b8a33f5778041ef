// Model node: invokes the reasoning capability
//
// Produces one assistant message per invocation: either final content with
// no tool calls (the run can terminate) or a nonempty tool-call sequence
// (the agent wants to act before responding).

use std::sync::Arc;

use agentgraph_core::{AgentState, ModelProvider, Result, StateUpdate};
use async_trait::async_trait;
use tracing::debug;

use crate::node::Node;
use crate::retry::RetryPolicy;

/// Node wrapping a [`ModelProvider`]
pub struct ModelNode {
    provider: Arc<dyn ModelProvider>,
    retry: Option<RetryPolicy>,
}

impl ModelNode {
    /// Create a model node with no retry (provider failures abort the run)
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            retry: None,
        }
    }

    /// Wrap the provider invocation in a retry policy
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }
}

#[async_trait]
impl Node for ModelNode {
    async fn run(&self, state: &AgentState) -> Result<StateUpdate> {
        let mut attempt: u32 = 1;
        let message = loop {
            match self.provider.invoke(&state.messages).await {
                Ok(message) => break message,
                Err(err) => {
                    let Some(policy) = &self.retry else {
                        return Err(err);
                    };
                    if !policy.has_attempts_remaining(attempt) {
                        return Err(err);
                    }
                    attempt += 1;
                    let delay = policy.delay_for_attempt(attempt);
                    debug!(attempt, ?delay, error = %err, "retrying model invocation");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        };

        debug!(
            tool_calls = message.tool_calls.len(),
            "model produced response"
        );
        Ok(StateUpdate::message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentgraph_core::{EngineError, Message, ScriptedModel, ScriptedResponse};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct FlakyProvider {
        failures_before_success: u32,
        attempts: AtomicU32,
    }

    #[async_trait]
    impl ModelProvider for FlakyProvider {
        async fn invoke(&self, _messages: &[Message]) -> Result<Message> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures_before_success {
                Err(EngineError::model("provider unreachable"))
            } else {
                Ok(Message::assistant("recovered"))
            }
        }
    }

    #[tokio::test]
    async fn test_produces_single_assistant_message() {
        let model = Arc::new(ScriptedModel::with_responses(vec![ScriptedResponse::text(
            "It's 60 degrees and foggy.",
        )]));
        let node = ModelNode::new(model);

        let update = node
            .run(&AgentState::with_user_message("sf weather?"))
            .await
            .unwrap();

        assert_eq!(update.messages.len(), 1);
        assert_eq!(update.messages[0].content, "It's 60 degrees and foggy.");
    }

    #[tokio::test]
    async fn test_no_retry_propagates_error() {
        let node = ModelNode::new(Arc::new(FlakyProvider {
            failures_before_success: 1,
            attempts: AtomicU32::new(0),
        }));

        let err = node.run(&AgentState::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::ModelInvocation(_)));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let node = ModelNode::new(Arc::new(FlakyProvider {
            failures_before_success: 2,
            attempts: AtomicU32::new(0),
        }))
        .with_retry(RetryPolicy::fixed(Duration::ZERO, 3));

        let update = node.run(&AgentState::default()).await.unwrap();
        assert_eq!(update.messages[0].content, "recovered");
    }

    #[tokio::test]
    async fn test_retry_exhaustion_propagates_error() {
        let node = ModelNode::new(Arc::new(FlakyProvider {
            failures_before_success: 10,
            attempts: AtomicU32::new(0),
        }))
        .with_retry(RetryPolicy::fixed(Duration::ZERO, 3));

        let err = node.run(&AgentState::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::ModelInvocation(_)));
    }
}
