//! A single agent: kinematic state plus the task state machine.

use fleet_core::{
    AgentId, AgentRng, DEFAULT_CREEP_BACK_RATE, DEFAULT_SPEED, Geometry, Lane, Point2, TaskId,
    VertexId,
};
use tracing::debug;

use crate::{AgentState, InvalidPathError, LaneGate};

/// Full battery, in percent.
pub const FULL_BATTERY: f64 = 100.0;

/// One mobile agent.
///
/// All fields are private; the lane negotiator and the fleet read them
/// through accessors and only [`update`](Self::update),
/// [`assign_task`](Self::assign_task) and the explicit triggers mutate them.
///
/// Invariants, holding between any two calls:
/// - `0.0 <= progress <= 1.0`
/// - while a task is active, `path[path_index] == vertex`
/// - `path_index` never decreases during a task
#[derive(Debug)]
pub struct Agent {
    id:              AgentId,
    vertex:          VertexId,
    position:        Point2,
    target:          Point2,
    path:            Vec<VertexId>,
    path_index:      usize,
    destination:     Option<VertexId>,
    task:            Option<TaskId>,
    progress:        f64,
    state:           AgentState,
    speed:           f64,
    battery:         f64,
    blocked_secs:    f64,
    creep_back_rate: f64,
    rng:             AgentRng,
}

impl Agent {
    /// An idle agent resting at `vertex`, whose coordinate is `position`.
    ///
    /// `seed` is the run's master seed; combined with `id` it fixes the
    /// sequence of task ids this agent will mint.
    pub fn new(id: AgentId, vertex: VertexId, position: Point2, seed: u64) -> Self {
        Self {
            id,
            vertex,
            position,
            target: position,
            path: Vec::new(),
            path_index: 0,
            destination: None,
            task: None,
            progress: 0.0,
            state: AgentState::Idle,
            speed: DEFAULT_SPEED,
            battery: FULL_BATTERY,
            blocked_secs: 0.0,
            creep_back_rate: DEFAULT_CREEP_BACK_RATE,
            rng: AgentRng::new(seed, id),
        }
    }

    /// Override the travel speed (distance units per second).
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    /// Override how fast a blocked mid-lane agent eases back (lane fraction
    /// per second).
    pub fn with_creep_back_rate(mut self, rate: f64) -> Self {
        self.creep_back_rate = rate.max(0.0);
        self
    }

    // ── Task assignment ───────────────────────────────────────────────────

    /// Start a new task along `path`, ending at `destination`.
    ///
    /// Only an `Idle` or `TaskComplete` agent takes a task, and `path[0]`
    /// must be the vertex it is at.  A single-vertex path completes the task
    /// immediately.  On error nothing is modified.
    ///
    /// Returns the freshly minted task id.
    pub fn assign_task(
        &mut self,
        destination: VertexId,
        path:        Vec<VertexId>,
    ) -> Result<TaskId, InvalidPathError> {
        if !self.state.accepts_task() {
            return Err(InvalidPathError::Busy { agent: self.id, state: self.state });
        }
        let Some(&start) = path.first() else {
            return Err(InvalidPathError::Empty { agent: self.id });
        };
        if start != self.vertex {
            return Err(InvalidPathError::StartMismatch {
                agent:   self.id,
                current: self.vertex,
                start,
            });
        }

        let task = self.rng.mint_task_id();
        self.task         = Some(task);
        self.destination  = Some(destination);
        self.path         = path;
        self.path_index   = 0;
        self.progress     = 0.0;
        self.blocked_secs = 0.0;
        self.target       = self.position;
        self.state = if self.path.len() == 1 {
            AgentState::TaskComplete
        } else {
            AgentState::Moving
        };

        debug!(agent = self.id.0, %task, hops = self.path.len() - 1, state = %self.state, "task assigned");
        Ok(task)
    }

    /// Abandon the current task and rest at the last vertex reached.
    ///
    /// A charging agent is left alone; it leaves the charger only through
    /// [`stop_charging`](Self::stop_charging).
    pub fn clear_task<G: Geometry + ?Sized>(&mut self, geometry: &G) {
        if self.state == AgentState::Charging {
            return;
        }
        self.task = None;
        self.path.clear();
        self.path_index   = 0;
        self.destination  = None;
        self.progress     = 0.0;
        self.blocked_secs = 0.0;
        self.position     = geometry.coordinate_of(self.vertex);
        self.target       = self.position;
        self.state        = AgentState::Idle;
    }

    // ── External triggers ─────────────────────────────────────────────────

    /// Stop before (or on) the current lane until the gate reports it free.
    ///
    /// Returns `true` if the agent was moving and is now waiting.
    pub fn hold(&mut self) -> bool {
        if self.state != AgentState::Moving {
            return false;
        }
        self.enter_waiting();
        true
    }

    /// Park on a charger.  Only a resting agent can start charging.
    pub fn start_charging(&mut self) -> bool {
        if !self.state.accepts_task() {
            return false;
        }
        self.state = AgentState::Charging;
        true
    }

    /// Leave the charger and go back to `Idle`.
    pub fn stop_charging(&mut self) -> bool {
        if self.state != AgentState::Charging {
            return false;
        }
        self.state = AgentState::Idle;
        true
    }

    /// Overwrite the battery level, clamped to `[0, 100]`.
    pub fn set_battery_level(&mut self, percent: f64) {
        self.battery = percent.clamp(0.0, FULL_BATTERY);
    }

    // ── Per-tick update ───────────────────────────────────────────────────

    /// Advance the agent by `dt` seconds.
    ///
    /// `gate` is consulted for the lane `path[i] → path[i+1]` before any
    /// movement.  Returns `true` if the state or the position changed.
    /// Negative or non-finite `dt` is treated as zero.
    pub fn update<G, L>(&mut self, dt: f64, geometry: &G, gate: &L) -> bool
    where
        G: Geometry + ?Sized,
        L: LaneGate + ?Sized,
    {
        if !self.state.is_active() {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let state_before    = self.state;
        let position_before = self.position;

        if self.state == AgentState::Waiting {
            let free = self
                .current_lane()
                .is_some_and(|lane| !gate.is_blocked(lane.from, lane.to, self.id));
            if !free {
                self.blocked_secs += dt;
                return self.creep_back(dt, geometry);
            }
            self.resume();
        }

        let Some(lane) = self.current_lane() else {
            return self.state != state_before;
        };

        if gate.is_blocked(lane.from, lane.to, self.id) {
            self.enter_waiting();
            return true;
        }

        let start = geometry.coordinate_of(lane.from);
        let end   = geometry.coordinate_of(lane.to);
        self.target = end;

        let length    = geometry.distance(lane.from, lane.to);
        let increment = if length > 0.0 { self.speed * dt / length } else { 1.0 };
        self.progress = (self.progress + increment).clamp(0.0, 1.0);
        self.position = start.lerp(end, self.progress);

        if self.progress >= 1.0 {
            self.arrive_at(lane.to, end);
        }

        self.state != state_before || self.position != position_before
    }

    fn arrive_at(&mut self, vertex: VertexId, coordinate: Point2) {
        self.position    = coordinate;
        self.vertex      = vertex;
        self.path_index += 1;
        self.progress    = 0.0;

        if self.path_index >= self.path.len() - 1 {
            self.state  = AgentState::TaskComplete;
            self.target = coordinate;
            debug!(agent = self.id.0, vertex = vertex.0, "task complete");
        } else {
            debug!(agent = self.id.0, vertex = vertex.0, "vertex reached");
        }
    }

    fn enter_waiting(&mut self) {
        if self.state != AgentState::Waiting {
            self.state        = AgentState::Waiting;
            self.blocked_secs = 0.0;
            debug!(agent = self.id.0, progress = self.progress, "waiting");
        }
    }

    fn resume(&mut self) {
        self.state        = AgentState::Moving;
        self.blocked_secs = 0.0;
        debug!(agent = self.id.0, "resumed");
    }

    /// Ease a blocked agent that had already started its lane back toward
    /// the lane start, so stacked waiters never render on the same point.
    fn creep_back<G: Geometry + ?Sized>(&mut self, dt: f64, geometry: &G) -> bool {
        if self.progress <= 0.0 {
            return false;
        }
        let Some(lane) = self.current_lane() else {
            return false;
        };
        let before = self.position;
        self.progress = (self.progress - self.creep_back_rate * dt).max(0.0);
        self.position = geometry
            .coordinate_of(lane.from)
            .lerp(geometry.coordinate_of(lane.to), self.progress);
        self.position != before
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// The last vertex the agent stood on.
    #[inline]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    #[inline]
    pub fn position(&self) -> Point2 {
        self.position
    }

    /// Coordinate of the vertex the agent is heading for.  Equals
    /// `position()` before the first movement of a task.
    #[inline]
    pub fn target_position(&self) -> Point2 {
        self.target
    }

    #[inline]
    pub fn path(&self) -> &[VertexId] {
        &self.path
    }

    #[inline]
    pub fn path_index(&self) -> usize {
        self.path_index
    }

    /// Fraction of the current lane covered, in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Battery level in percent.
    #[inline]
    pub fn battery_level(&self) -> f64 {
        self.battery
    }

    /// Battery level as a fraction of capacity, in `[0, 1]`.
    #[inline]
    pub fn battery_fraction(&self) -> f64 {
        self.battery / FULL_BATTERY
    }

    /// Seconds spent continuously in `Waiting`.  Zero while not waiting.
    #[inline]
    pub fn blocked_secs(&self) -> f64 {
        self.blocked_secs
    }

    #[inline]
    pub fn task_id(&self) -> Option<TaskId> {
        self.task
    }

    #[inline]
    pub fn destination(&self) -> Option<VertexId> {
        self.destination
    }

    /// The next vertex on the path, if any remain.
    pub fn next_vertex(&self) -> Option<VertexId> {
        if !self.state.is_active() {
            return None;
        }
        self.path.get(self.path_index + 1).copied()
    }

    /// The lane the agent is on or waiting to enter.  `None` unless
    /// `Moving`/`Waiting` with vertices left to visit.
    pub fn current_lane(&self) -> Option<Lane> {
        self.next_vertex().map(|to| Lane::new(self.path[self.path_index], to))
    }

    /// One-line human-readable status.
    pub fn status_text(&self) -> String {
        let id = self.id.0;
        match self.state {
            AgentState::Idle => format!("Agent {id}: Idle"),
            AgentState::Moving => match self.destination {
                Some(dest) => format!("Agent {id}: Moving to {}", dest.0),
                None => format!("Agent {id}: Moving"),
            },
            AgentState::Waiting => format!("Agent {id}: Waiting (blocked)"),
            AgentState::Charging => format!("Agent {id}: Charging ({:.0}%)", self.battery),
            AgentState::TaskComplete => format!("Agent {id}: Task Complete"),
        }
    }
}
