// Execution engine
//
// Interprets a compiled graph against a checkpoint store, one step at a
// time. Steps within one thread are strictly sequential; runs for
// different thread ids are fully independent and share the graph
// read-only.
//
// Checkpoint discipline: every completed step persists exactly one new
// snapshot. A cancelled or timed-out node invocation persists nothing, so
// the last successful checkpoint always remains the valid resumption
// point.

use std::sync::Arc;
use std::time::Duration;

use agentgraph_core::{
    AgentState, Checkpoint, CheckpointStore, EngineError, Result, StateUpdate,
};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::graph::{Graph, Transition};
use crate::node::Node;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum node invocations per `run` before the engine gives up with
    /// `StepLimitExceeded` (guards against graphs that never terminate)
    pub step_limit: usize,

    /// Optional per-node-invocation timeout; a timed-out invocation fails
    /// the same way as cancellation
    pub node_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_limit: 25,
            node_timeout: None,
        }
    }
}

/// One step's partial result, as emitted by [`ExecutionEngine::stream`]
#[derive(Debug, Clone)]
pub struct StepUpdate {
    /// Node that produced the update
    pub node: String,
    /// Sequence number of the checkpoint this step committed
    pub seq: u64,
    /// The partial update the node produced
    pub update: StateUpdate,
}

/// Drives a compiled graph to completion for one thread at a time
#[derive(Clone)]
pub struct ExecutionEngine {
    graph: Arc<Graph>,
    checkpoints: Arc<dyn CheckpointStore>,
    config: EngineConfig,
}

impl ExecutionEngine {
    /// Create an engine over a compiled graph and a checkpoint store
    pub fn new(graph: Arc<Graph>, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        Self {
            graph,
            checkpoints,
            config: EngineConfig::default(),
        }
    }

    /// Override the default configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the graph to the terminal marker and return the final state.
    ///
    /// The latest checkpoint for `thread_id` is the starting state when
    /// one exists; otherwise the run starts fresh. `input` is applied (and
    /// checkpointed) before the first node executes.
    pub async fn run(&self, thread_id: &str, input: StateUpdate) -> Result<AgentState> {
        self.run_inner(thread_id, input, CancellationToken::new(), None)
            .await
    }

    /// Like [`run`](Self::run), but the caller can cancel mid-step.
    ///
    /// Cancellation propagates into the in-flight node call; the run fails
    /// with `Cancelled` and the last-saved checkpoint is untouched.
    pub async fn run_with_cancellation(
        &self,
        thread_id: &str,
        input: StateUpdate,
        cancel: CancellationToken,
    ) -> Result<AgentState> {
        self.run_inner(thread_id, input, cancel, None).await
    }

    /// Streaming variant: yields one [`StepUpdate`] per completed step.
    ///
    /// A transport layer (e.g. an SSE endpoint) can relay these to a
    /// client as the run progresses. A failed run yields a final `Err`
    /// item before the stream closes.
    pub fn stream(
        &self,
        thread_id: impl Into<String>,
        input: StateUpdate,
    ) -> ReceiverStream<Result<StepUpdate>> {
        let (tx, rx) = mpsc::channel(16);
        let engine = self.clone();
        let thread_id = thread_id.into();
        tokio::spawn(async move {
            let result = engine
                .run_inner(&thread_id, input, CancellationToken::new(), Some(tx.clone()))
                .await;
            if let Err(err) = result {
                let _ = tx.send(Err(err)).await;
            }
        });
        ReceiverStream::new(rx)
    }

    /// All checkpoints for the thread, oldest first (audit/replay)
    pub async fn history(&self, thread_id: &str) -> Result<Vec<Checkpoint>> {
        self.checkpoints.history(thread_id).await
    }

    async fn run_inner(
        &self,
        thread_id: &str,
        input: StateUpdate,
        cancel: CancellationToken,
        emitter: Option<mpsc::Sender<Result<StepUpdate>>>,
    ) -> Result<AgentState> {
        let (mut state, resume_at) = match self.checkpoints.load(thread_id).await? {
            Some(checkpoint) => {
                debug!(thread_id, seq = checkpoint.seq, "resuming from checkpoint");
                (checkpoint.state, checkpoint.next_node)
            }
            None => {
                debug!(thread_id, "starting fresh thread");
                (AgentState::default(), None)
            }
        };

        // Fresh input restarts routing at the entry node; an empty input
        // resumes exactly where the latest checkpoint left off.
        let mut current = if input.is_empty() {
            resume_at.unwrap_or_else(|| self.graph.entry().to_string())
        } else {
            state.apply(&input);
            let entry = self.graph.entry().to_string();
            self.checkpoints
                .save(thread_id, state.clone(), Some(entry.clone()))
                .await?;
            entry
        };

        let mut steps = 0usize;

        loop {
            if steps >= self.config.step_limit {
                return Err(EngineError::StepLimitExceeded(self.config.step_limit));
            }
            steps += 1;

            let node = self.graph.node(&current).ok_or_else(|| {
                EngineError::Internal(anyhow::anyhow!("node '{current}' missing from graph"))
            })?;

            let update = self.invoke_node(node.as_ref(), &state, &cancel).await?;
            state.apply(&update);

            // Route before persisting so the checkpoint records where a
            // resumed run picks up.
            let transition = self.graph.next(&current, &state)?;
            let next_node = match &transition {
                Transition::Node(id) => Some(id.clone()),
                Transition::End => None,
            };
            let checkpoint = self
                .checkpoints
                .save(thread_id, state.clone(), next_node)
                .await?;

            debug!(thread_id, node = %current, seq = checkpoint.seq, "step committed");

            if let Some(tx) = &emitter {
                // consumer may have hung up; the run still finishes
                let _ = tx
                    .send(Ok(StepUpdate {
                        node: current.clone(),
                        seq: checkpoint.seq,
                        update,
                    }))
                    .await;
            }

            match transition {
                Transition::End => {
                    debug!(thread_id, steps, "run reached terminal marker");
                    return Ok(state);
                }
                Transition::Node(next) => current = next,
            }
        }
    }

    /// Invoke one node, racing its future against cancellation and the
    /// optional per-node timeout. Losing the race discards the in-flight
    /// invocation without persisting anything.
    async fn invoke_node(
        &self,
        node: &dyn Node,
        state: &AgentState,
        cancel: &CancellationToken,
    ) -> Result<StateUpdate> {
        let invocation = async {
            match self.config.node_timeout {
                Some(timeout) => tokio::time::timeout(timeout, node.run(state))
                    .await
                    .map_err(|_| EngineError::Cancelled)?,
                None => node.run(state).await,
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(EngineError::Cancelled),
            result = invocation => result,
        }
    }
}

impl std::fmt::Debug for ExecutionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionEngine")
            .field("graph", &self.graph)
            .field("config", &self.config)
            .finish()
    }
}
