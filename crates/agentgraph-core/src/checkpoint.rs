// Checkpoint snapshot type
//
// A checkpoint is an immutable snapshot of AgentState plus a monotonically
// increasing sequence number, scoped by an opaque thread id. For a given
// thread id, checkpoints are totally ordered by sequence number; the
// highest-sequence checkpoint is the authoritative resumption point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AgentState;

/// An immutable, sequence-numbered snapshot of execution state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Opaque caller-supplied identifier scoping one conversation
    pub thread_id: String,

    /// Monotonically increasing per thread, starting at 1
    pub seq: u64,

    /// Full state snapshot at this step
    pub state: AgentState,

    /// Node to resume at, or `None` when nothing is pending (fresh input
    /// or completed run) and resumption starts at the graph entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_node: Option<String>,

    /// Timestamp when the snapshot was persisted
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Create a checkpoint for the given thread and sequence number
    pub fn new(
        thread_id: impl Into<String>,
        seq: u64,
        state: AgentState,
        next_node: Option<String>,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            seq,
            state,
            next_node,
            created_at: Utc::now(),
        }
    }
}
