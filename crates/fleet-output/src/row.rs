//! Plain data row types written by output backends.

/// One agent's kinematic state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id: u32,
    pub tick:     u64,
    /// Snake-case `AgentState` label.
    pub state:    &'static str,
    /// The last vertex the agent stood on.
    pub vertex:   u32,
    pub x:        f64,
    pub y:        f64,
    /// Fraction of the current lane covered.
    pub progress: f64,
}

/// One fleet event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub tick:         u64,
    pub elapsed_secs: f64,
    pub agent_id:     u32,
    /// Snake-case event kind, e.g. `lane_granted`.
    pub kind:         &'static str,
    /// Variant payload as `key=value` pairs.
    pub detail:       String,
}
