use fleet_agent::{AgentState, InvalidPathError};
use fleet_core::{AgentId, FleetError, VertexId};
use fleet_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Unknown agent or vertex, or an invalid `SimConfig`.
    #[error(transparent)]
    Fleet(#[from] FleetError),

    #[error("agent {agent} is {state} and cannot take a new task")]
    AgentBusy { agent: AgentId, state: AgentState },

    #[error("agent {agent} is at {vertex}, which has no charger")]
    NotACharger { agent: AgentId, vertex: VertexId },

    #[error("routing failed: {0}")]
    Route(#[from] GraphError),

    #[error(transparent)]
    InvalidPath(#[from] InvalidPathError),
}

pub type SimResult<T> = Result<T, SimError>;
