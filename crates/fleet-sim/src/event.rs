//! Fleet-level event stream.

use std::fmt;

use fleet_core::{AgentId, Lane, TaskId, VertexId};

/// Something worth recording happened to one agent.
///
/// Events raised between ticks (spawn, assignment, hold) are queued and
/// delivered at the start of the next tick, stamped with that tick.
#[derive(Clone, Debug, PartialEq)]
pub enum FleetEvent {
    AgentSpawned {
        agent:  AgentId,
        vertex: VertexId,
    },
    TaskAssigned {
        agent:       AgentId,
        task:        TaskId,
        destination: VertexId,
        /// Lanes on the computed route.
        hops:        usize,
    },
    LaneGranted {
        agent: AgentId,
        lane:  Lane,
    },
    /// The agent stopped in front of (or on) `lane`.
    AgentWaiting {
        agent:   AgentId,
        lane:    Lane,
        /// `None` when the agent was held rather than outranked.
        blocker: Option<AgentId>,
    },
    VertexReached {
        agent:  AgentId,
        vertex: VertexId,
    },
    TaskCompleted {
        agent:  AgentId,
        task:   Option<TaskId>,
        vertex: VertexId,
    },
}

impl FleetEvent {
    pub fn agent(&self) -> AgentId {
        match *self {
            FleetEvent::AgentSpawned { agent, .. }
            | FleetEvent::TaskAssigned { agent, .. }
            | FleetEvent::LaneGranted { agent, .. }
            | FleetEvent::AgentWaiting { agent, .. }
            | FleetEvent::VertexReached { agent, .. }
            | FleetEvent::TaskCompleted { agent, .. } => agent,
        }
    }

    /// Snake-case discriminant, used as the CSV `kind` column.
    pub fn kind(&self) -> &'static str {
        match self {
            FleetEvent::AgentSpawned { .. }  => "agent_spawned",
            FleetEvent::TaskAssigned { .. }  => "task_assigned",
            FleetEvent::LaneGranted { .. }   => "lane_granted",
            FleetEvent::AgentWaiting { .. }  => "agent_waiting",
            FleetEvent::VertexReached { .. } => "vertex_reached",
            FleetEvent::TaskCompleted { .. } => "task_completed",
        }
    }

    /// Variant payload without the agent id, e.g. `lane=3->4 blocker=1`.
    pub fn detail(&self) -> String {
        match self {
            FleetEvent::AgentSpawned { vertex, .. } => format!("vertex={}", vertex.0),
            FleetEvent::TaskAssigned { task, destination, hops, .. } => {
                format!("task={task} destination={} hops={hops}", destination.0)
            }
            FleetEvent::LaneGranted { lane, .. } => format!("lane={lane}"),
            FleetEvent::AgentWaiting { lane, blocker, .. } => match blocker {
                Some(b) => format!("lane={lane} blocker={}", b.0),
                None => format!("lane={lane} held"),
            },
            FleetEvent::VertexReached { vertex, .. } => format!("vertex={}", vertex.0),
            FleetEvent::TaskCompleted { task, vertex, .. } => match task {
                Some(t) => format!("task={t} vertex={}", vertex.0),
                None => format!("vertex={}", vertex.0),
            },
        }
    }
}

impl fmt::Display for FleetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent {} {} {}", self.agent().0, self.kind(), self.detail())
    }
}
