//! Per-tick negotiation outcome.

use fleet_core::{AgentId, Lane, LaneKey};

/// An agent newly admitted to a lane it did not occupy before this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    pub agent: AgentId,
    pub lane:  Lane,
}

/// An agent refused entry to (or continued travel along) its lane.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Denial {
    pub agent:   AgentId,
    pub lane:    Lane,
    /// The agent occupying (or just admitted to) the lane.  `None` when the
    /// denial is due to an explicit hold and nobody else wants the lane.
    pub blocker: Option<AgentId>,
}

/// An occupancy entry dropped at the end of a tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Release {
    pub agent: AgentId,
    pub key:   LaneKey,
}

/// Everything [`LaneNegotiator::step`][crate::LaneNegotiator::step]
/// decided and observed during one tick.
///
/// All vectors are in ascending `AgentId` order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NegotiationReport {
    /// Zero-based index of the negotiated tick.
    pub tick:     u64,
    pub grants:   Vec<Grant>,
    pub denials:  Vec<Denial>,
    pub releases: Vec<Release>,
    /// Agents whose `update` reported a state or position change.
    pub changed:  Vec<AgentId>,
}

impl NegotiationReport {
    /// `true` if `agent` was refused its lane this tick.
    pub fn was_denied(&self, agent: AgentId) -> bool {
        self.denials.iter().any(|d| d.agent == agent)
    }

    /// The blocker recorded for `agent`, if it was denied.
    pub fn blocker_of(&self, agent: AgentId) -> Option<AgentId> {
        self.denials.iter().find(|d| d.agent == agent).and_then(|d| d.blocker)
    }
}
