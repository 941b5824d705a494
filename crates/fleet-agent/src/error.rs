use fleet_core::{AgentId, VertexId};
use thiserror::Error;

use crate::AgentState;

/// Rejected task assignment: a busy agent or an unusable path.  Always
/// raised before the agent is touched, so the agent's previous task (if any)
/// is still intact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPathError {
    #[error("agent {agent} was given an empty path")]
    Empty { agent: AgentId },

    #[error("agent {agent} is at {current} but the path starts at {start}")]
    StartMismatch {
        agent:   AgentId,
        current: VertexId,
        start:   VertexId,
    },

    #[error("agent {agent} is {state} and cannot take a task")]
    Busy { agent: AgentId, state: AgentState },
}
