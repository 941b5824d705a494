//! The `Fleet` struct and its tick loop.

use fleet_agent::{Agent, AgentState};
use fleet_core::{AgentId, FleetError, SimClock, SimConfig, TaskId, Tick, VertexId};
use fleet_graph::{DijkstraRouter, NavGraph, Router};
use fleet_traffic::{LaneNegotiator, NegotiationReport};
use tracing::{debug, info, warn};

use crate::{FleetEvent, FleetObserver, SimError, SimResult};

// ── Fleet ─────────────────────────────────────────────────────────────────────

/// A set of agents sharing one navigation graph.
///
/// `Fleet<R>` owns the agents, the graph, the router and the lane
/// negotiator.  Each tick:
///
/// 1. **Flush**: events raised since the last tick (spawns, assignments,
///    holds) are delivered to the observer.
/// 2. **Negotiate + move**: [`LaneNegotiator::step`] decides lane access
///    from one snapshot and advances every agent by `config.tick_secs`.
/// 3. **Diff**: grants, new waits, vertex arrivals and task completions are
///    turned into [`FleetEvent`]s.
/// 4. **Snapshot**: every `snapshot_interval_ticks` ticks the observer sees
///    all agents.
///
/// Tasks are handed out and cleared between ticks only.
///
/// Create via [`FleetBuilder`][crate::FleetBuilder].
pub struct Fleet<R: Router = DijkstraRouter> {
    config:     SimConfig,
    clock:      SimClock,
    graph:      NavGraph,
    router:     R,
    /// Indexed by `AgentId`.
    agents:     Vec<Agent>,
    negotiator: LaneNegotiator,
    /// Events raised between ticks, delivered at the next tick start.
    pending:    Vec<FleetEvent>,
}

impl<R: Router> Fleet<R> {
    pub(crate) fn new(config: SimConfig, graph: NavGraph, router: R) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            graph,
            router,
            agents: Vec::new(),
            negotiator: LaneNegotiator::new(),
            pending: Vec::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The tick the next call to [`step`](Self::step) will process.
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn negotiator(&self) -> &LaneNegotiator {
        &self.negotiator
    }

    /// All agents in ascending id order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent(&self, agent: AgentId) -> Option<&Agent> {
        self.agents.get(agent.index())
    }

    /// Agents that can take a new task right now.
    pub fn available_agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents
            .iter()
            .filter(|a| a.state().accepts_task())
            .map(Agent::id)
    }

    /// `true` once no agent is moving or waiting.
    pub fn is_settled(&self) -> bool {
        self.agents.iter().all(|a| !a.state().is_active())
    }

    /// One status line per agent, e.g. `Agent 0: Moving to 4 @ dock`.
    pub fn status_lines(&self) -> Vec<String> {
        self.agents
            .iter()
            .map(|a| format!("{} @ {}", a.status_text(), self.graph.vertex_name(a.vertex())))
            .collect()
    }

    /// Occupancy query: would `agent` be kept off `from → to` right now?
    pub fn is_lane_blocked(&self, from: VertexId, to: VertexId, agent: AgentId) -> bool {
        self.negotiator.is_blocked(from, to, agent)
    }

    // ── Fleet management ──────────────────────────────────────────────────

    /// Add an idle agent at `vertex`.  Ids are handed out sequentially.
    pub fn spawn(&mut self, vertex: VertexId) -> SimResult<AgentId> {
        if !self.graph.contains(vertex) {
            return Err(FleetError::VertexNotFound(vertex).into());
        }
        let id = AgentId::try_from(self.agents.len())
            .map_err(|_| FleetError::Config("agent count exceeds u32".into()))?;

        let agent = Agent::new(id, vertex, self.graph.vertex_pos[vertex.index()], self.config.seed)
            .with_speed(self.config.default_speed)
            .with_creep_back_rate(self.config.creep_back_rate);
        self.agents.push(agent);
        self.pending.push(FleetEvent::AgentSpawned { agent: id, vertex });
        debug!(agent = id.0, vertex = vertex.0, "agent spawned");
        Ok(id)
    }

    /// Route `agent` from its current vertex to `destination` and start the
    /// task.
    ///
    /// Fails without touching the agent if it is unknown, busy (moving,
    /// waiting or charging), or cannot reach `destination`.
    pub fn assign_task(&mut self, agent: AgentId, destination: VertexId) -> SimResult<TaskId> {
        let a = self.agents.get(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        if !a.state().accepts_task() {
            warn!(agent = agent.0, state = %a.state(), "assignment rejected: agent busy");
            return Err(SimError::AgentBusy { agent, state: a.state() });
        }

        let route = self
            .router
            .route(&self.graph, a.vertex(), destination)
            .inspect_err(|e| warn!(agent = agent.0, destination = destination.0, "assignment rejected: {e}"))?;
        let hops = route.hops();

        let a = &mut self.agents[agent.index()];
        let task = a.assign_task(destination, route.vertices)?;

        info!(
            agent = agent.0,
            %task,
            to = %self.graph.vertex_name(destination),
            hops,
            length = route.length,
            "task assigned"
        );
        self.pending.push(FleetEvent::TaskAssigned { agent, task, destination, hops });
        if a.state() == AgentState::TaskComplete {
            self.pending.push(FleetEvent::TaskCompleted {
                agent,
                task:   Some(task),
                vertex: destination,
            });
        }
        Ok(task)
    }

    /// Abandon `agent`'s task; it rests at the last vertex it reached.  A
    /// charging agent is left on its charger.
    pub fn clear_task(&mut self, agent: AgentId) -> SimResult<()> {
        let a = self.agents.get_mut(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        a.clear_task(&self.graph);
        debug!(agent = agent.0, "task cleared");
        Ok(())
    }

    /// Keep `agent` off every lane until [`release`](Self::release).
    ///
    /// A moving agent stops where it is.  Returns `false` if already held.
    pub fn hold(&mut self, agent: AgentId) -> SimResult<bool> {
        let a = self.agents.get_mut(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        if !self.negotiator.hold(agent) {
            return Ok(false);
        }
        if a.hold() {
            if let Some(lane) = a.current_lane() {
                self.pending.push(FleetEvent::AgentWaiting { agent, lane, blocker: None });
            }
        }
        debug!(agent = agent.0, "agent held");
        Ok(true)
    }

    /// Lift a hold.  The agent re-enters lane negotiation on the next tick.
    pub fn release(&mut self, agent: AgentId) -> SimResult<bool> {
        if agent.index() >= self.agents.len() {
            return Err(FleetError::AgentNotFound(agent).into());
        }
        let released = self.negotiator.release(agent);
        if released {
            debug!(agent = agent.0, "agent released");
        }
        Ok(released)
    }

    /// Park a resting agent on the charger at its vertex.
    pub fn start_charging(&mut self, agent: AgentId) -> SimResult<bool> {
        let a = self.agents.get_mut(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        if !self.graph.is_charger(a.vertex()) {
            return Err(SimError::NotACharger { agent, vertex: a.vertex() });
        }
        Ok(a.start_charging())
    }

    pub fn stop_charging(&mut self, agent: AgentId) -> SimResult<bool> {
        let a = self.agents.get_mut(agent.index()).ok_or(FleetError::AgentNotFound(agent))?;
        Ok(a.stop_charging())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`, then call
    /// `on_sim_end`.
    pub fn run<O: FleetObserver>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: FleetObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step(observer);
        }
    }

    /// Process one tick and advance the clock.
    pub fn step<O: FleetObserver>(&mut self, observer: &mut O) -> NegotiationReport {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        for event in self.pending.drain(..) {
            emit(observer, now, &event);
        }

        let before: Vec<(VertexId, AgentState)> =
            self.agents.iter().map(|a| (a.vertex(), a.state())).collect();

        let report = self.negotiator.step(&mut self.agents, self.clock.tick_secs, &self.graph);

        for grant in &report.grants {
            emit(observer, now, &FleetEvent::LaneGranted { agent: grant.agent, lane: grant.lane });
        }
        for denial in &report.denials {
            let (_, was) = before[denial.agent.index()];
            if was != AgentState::Waiting {
                emit(observer, now, &FleetEvent::AgentWaiting {
                    agent:   denial.agent,
                    lane:    denial.lane,
                    blocker: denial.blocker,
                });
            }
        }
        for (a, &(vertex, state)) in self.agents.iter().zip(&before) {
            if a.vertex() != vertex {
                emit(observer, now, &FleetEvent::VertexReached { agent: a.id(), vertex: a.vertex() });
            }
            if state.is_active() && a.state() == AgentState::TaskComplete {
                emit(observer, now, &FleetEvent::TaskCompleted {
                    agent:  a.id(),
                    task:   a.task_id(),
                    vertex: a.vertex(),
                });
            }
        }

        observer.on_tick_end(now, report.changed.len());

        let interval = self.config.snapshot_interval_ticks;
        if interval > 0 && now.0.is_multiple_of(interval) {
            observer.on_snapshot(now, &self.agents);
        }

        self.clock.advance();
        report
    }
}

/// Mirror `event` to `tracing`, then hand it to the observer.
fn emit<O: FleetObserver>(observer: &mut O, tick: Tick, event: &FleetEvent) {
    match event {
        FleetEvent::TaskCompleted { .. } => info!(%tick, "{event}"),
        _ => debug!(%tick, "{event}"),
    }
    observer.on_event(tick, event);
}
