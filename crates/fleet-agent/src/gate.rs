//! The lane-occupancy capability injected into every agent update.

use fleet_core::{AgentId, VertexId};

/// Answers "may `agent` proceed along `from → to` this tick?".
///
/// In a running fleet this is the lane negotiator's per-tick decision table;
/// in tests it is usually a closure.
pub trait LaneGate {
    /// `true` if the lane is blocked for `agent`.
    fn is_blocked(&self, from: VertexId, to: VertexId, agent: AgentId) -> bool;
}

impl<F> LaneGate for F
where
    F: Fn(VertexId, VertexId, AgentId) -> bool,
{
    #[inline]
    fn is_blocked(&self, from: VertexId, to: VertexId, agent: AgentId) -> bool {
        self(from, to, agent)
    }
}

/// A gate that never blocks.  Handy for single-agent runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeFlow;

impl LaneGate for FreeFlow {
    #[inline]
    fn is_blocked(&self, _from: VertexId, _to: VertexId, _agent: AgentId) -> bool {
        false
    }
}
