//! The closed set of agent states.

/// What an agent is doing right now.
///
/// ```text
///            assign (len ≥ 2)            last vertex reached
///   Idle ─────────────────────▶ Moving ─────────────────────▶ TaskComplete
///    │  ▲                        │  ▲                              │
///    │  │ stop_charging  blocked │  │ lane free                    │
///    ▼  │               / hold   ▼  │                              │
///  Charging                     Waiting                            │
///    ▲                                                             │
///    └──────────────────────── start_charging ─────────────────────┘
/// ```
///
/// `assign_task` with a single-vertex path goes straight to `TaskComplete`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum AgentState {
    /// Resting at a vertex with no task.
    #[default]
    Idle,
    /// Traversing (or about to enter) the current lane.
    Moving,
    /// Denied entry to the current lane; retries every tick.
    Waiting,
    /// Parked on a charger.  Entered and left only through explicit calls.
    Charging,
    /// Reached the end of its path.
    TaskComplete,
}

impl AgentState {
    /// `true` for the two states that `Agent::update` acts on.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, AgentState::Moving | AgentState::Waiting)
    }

    /// `true` if a new task may be handed out without interrupting one.
    #[inline]
    pub fn accepts_task(self) -> bool {
        matches!(self, AgentState::Idle | AgentState::TaskComplete)
    }

    /// Snake-case label, used as the CSV column value.
    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Idle         => "idle",
            AgentState::Moving       => "moving",
            AgentState::Waiting      => "waiting",
            AgentState::Charging     => "charging",
            AgentState::TaskComplete => "task_complete",
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
