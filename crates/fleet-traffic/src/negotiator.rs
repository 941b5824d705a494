//! `LaneNegotiator` — exclusive lane occupancy, decided once per tick.
//!
//! # Tick phases
//!
//! ```text
//! step(agents, Δt, geometry)
//!   │
//!   ├─ 1. Reconcile: drop entries whose occupant left the lane between ticks
//!   ├─ 2. Snapshot:  one intent per Moving/Waiting agent, read-only
//!   ├─ 3. Resolve:   per undirected lane, incumbent keeps it, else the
//!   │                highest-priority unheld contender is admitted
//!   ├─ 4. Apply:     Agent::update for every agent against the fixed answers
//!   │                (parallel under the `parallel` feature)
//!   └─ 5. Commit:    drop entries whose occupant finished or changed lane
//! ```
//!
//! Decisions never depend on the order agents are updated in, so the serial
//! and parallel apply phases produce identical results.
//!
//! # Liveness
//!
//! An agent holds at most the one lane it is on and gives it up when it
//! reaches the far end, so there is no hold-and-wait cycle.  Once the
//! incumbent clears, the best waiting contender is admitted on the next tick.

use std::collections::{BTreeMap, BTreeSet};

use fleet_agent::{Agent, LaneGate};
use fleet_core::{AgentId, Geometry, Lane, LaneKey, TaskId, VertexId};
use tracing::debug;

use crate::{Denial, Grant, NegotiationReport, Release};

// ── Priority ──────────────────────────────────────────────────────────────────

/// Admission order among contenders for the same free lane; smaller wins.
///
/// Compares the agent id first, then the tick on which the agent's current
/// task was first seen by the negotiator.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Priority {
    pub agent:         AgentId,
    pub assigned_tick: u64,
}

#[derive(Copy, Clone, Debug)]
struct Intent {
    lane:     Lane,
    priority: Priority,
}

impl Intent {
    #[inline]
    fn agent(&self) -> AgentId {
        self.priority.agent
    }
}

// ── Per-tick decision table ───────────────────────────────────────────────────

/// The gate handed to every agent during the apply phase: an agent may
/// proceed only along the lane it was admitted to this tick.
struct Decisions {
    admitted: BTreeMap<AgentId, LaneKey>,
}

impl LaneGate for Decisions {
    #[inline]
    fn is_blocked(&self, from: VertexId, to: VertexId, agent: AgentId) -> bool {
        self.admitted.get(&agent) != Some(&LaneKey::new(from, to))
    }
}

// ── LaneNegotiator ────────────────────────────────────────────────────────────

/// Sole owner of the lane occupancy table.
///
/// Every agent passed to [`step`](Self::step) must have a distinct id.
#[derive(Debug, Default)]
pub struct LaneNegotiator {
    occupancy: BTreeMap<LaneKey, AgentId>,
    held:      BTreeSet<AgentId>,
    /// Task last seen per agent and the tick it was first seen on.
    stamps:    BTreeMap<AgentId, (TaskId, u64)>,
    tick:      u64,
}

impl LaneNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks negotiated so far.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    // ── Holds ─────────────────────────────────────────────────────────────

    /// Deny `agent` every lane until [`release`](Self::release).  A held
    /// incumbent keeps its lane.  Returns `false` if already held.
    pub fn hold(&mut self, agent: AgentId) -> bool {
        self.held.insert(agent)
    }

    /// Lift a hold.  Returns `false` if the agent was not held.
    pub fn release(&mut self, agent: AgentId) -> bool {
        self.held.remove(&agent)
    }

    #[inline]
    pub fn is_held(&self, agent: AgentId) -> bool {
        self.held.contains(&agent)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The agent occupying the undirected lane `key`, if any.
    #[inline]
    pub fn occupant(&self, key: LaneKey) -> Option<AgentId> {
        self.occupancy.get(&key).copied()
    }

    /// All occupied lanes in key order.
    pub fn occupancy(&self) -> impl Iterator<Item = (LaneKey, AgentId)> + '_ {
        self.occupancy.iter().map(|(&k, &a)| (k, a))
    }

    /// `true` if `agent` would currently be kept off `from → to`: it is
    /// held, or another agent occupies the lane in either direction.
    ///
    /// Reflects the table as of the last completed tick; it does not
    /// predict the admission contest of the next one.
    pub fn is_blocked(&self, from: VertexId, to: VertexId, agent: AgentId) -> bool {
        if self.held.contains(&agent) {
            return true;
        }
        matches!(self.occupancy.get(&LaneKey::new(from, to)), Some(&occ) if occ != agent)
    }

    /// The admission priority `agent` would contend with, once it has been
    /// seen with a task.
    pub fn priority_of(&self, agent: AgentId) -> Option<Priority> {
        self.stamps
            .get(&agent)
            .map(|&(_, assigned_tick)| Priority { agent, assigned_tick })
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Negotiate one tick and advance every agent by `dt` seconds.
    pub fn step<G>(&mut self, agents: &mut [Agent], dt: f64, geometry: &G) -> NegotiationReport
    where
        G: Geometry + ?Sized,
    {
        #[cfg(feature = "parallel")]
        let apply = apply_parallel::<G>;
        #[cfg(not(feature = "parallel"))]
        let apply = apply_serial::<G>;

        self.step_with(agents, dt, geometry, apply)
    }

    /// [`step`](Self::step) with the apply phase kept on the calling thread.
    #[cfg(all(test, feature = "parallel"))]
    pub(crate) fn step_serial<G>(
        &mut self,
        agents:   &mut [Agent],
        dt:       f64,
        geometry: &G,
    ) -> NegotiationReport
    where
        G: Geometry + ?Sized,
    {
        self.step_with(agents, dt, geometry, apply_serial::<G>)
    }

    fn step_with<G>(
        &mut self,
        agents:   &mut [Agent],
        dt:       f64,
        geometry: &G,
        apply:    fn(&mut [Agent], f64, &G, &Decisions) -> Vec<AgentId>,
    ) -> NegotiationReport
    where
        G: Geometry + ?Sized,
    {
        let mut report = NegotiationReport { tick: self.tick, ..NegotiationReport::default() };

        self.drop_stale(agents, &mut report.releases);

        let intents   = self.snapshot(agents);
        let decisions = self.resolve(intents, &mut report);

        report.changed = apply(agents, dt, geometry, &decisions);

        self.drop_stale(agents, &mut report.releases);

        report.grants.sort_by_key(|g| g.agent);
        report.denials.sort_by_key(|d| d.agent);
        report.releases.sort_by_key(|r| r.agent);
        report.changed.sort_unstable();

        self.tick += 1;
        report
    }

    /// Remove every entry whose occupant is no longer on that lane.
    fn drop_stale(&mut self, agents: &[Agent], released: &mut Vec<Release>) {
        let on_lane: BTreeMap<AgentId, LaneKey> = agents
            .iter()
            .filter_map(|a| a.current_lane().map(|lane| (a.id(), lane.key())))
            .collect();

        self.occupancy.retain(|&key, &mut agent| {
            let keep = on_lane.get(&agent) == Some(&key);
            if !keep {
                debug!(agent = agent.0, lane = %key, "lane released");
                released.push(Release { agent, key });
            }
            keep
        });
    }

    /// Read every active agent's upcoming lane, in priority order.
    fn snapshot(&mut self, agents: &[Agent]) -> Vec<Intent> {
        let tick = self.tick;
        let mut intents: Vec<Intent> = agents
            .iter()
            .filter_map(|a| {
                let lane = a.current_lane()?;
                let assigned_tick = match a.task_id() {
                    Some(task) => {
                        let stamp = self.stamps.entry(a.id()).or_insert((task, tick));
                        if stamp.0 != task {
                            *stamp = (task, tick);
                        }
                        stamp.1
                    }
                    None => tick,
                };
                Some(Intent { lane, priority: Priority { agent: a.id(), assigned_tick } })
            })
            .collect();
        intents.sort_by_key(|i| i.priority);
        intents
    }

    fn resolve(&mut self, intents: Vec<Intent>, report: &mut NegotiationReport) -> Decisions {
        let mut by_key: BTreeMap<LaneKey, Vec<Intent>> = BTreeMap::new();
        for intent in intents {
            by_key.entry(intent.lane.key()).or_default().push(intent);
        }

        let mut admitted = BTreeMap::new();
        for (key, contenders) in by_key {
            let incumbent = self.occupancy.get(&key).copied();
            let winner = incumbent.or_else(|| {
                contenders
                    .iter()
                    .map(Intent::agent)
                    .find(|a| !self.held.contains(a))
            });

            for intent in contenders {
                let agent = intent.agent();
                if Some(agent) == winner && !self.held.contains(&agent) {
                    admitted.insert(agent, key);
                    if incumbent.is_none() {
                        self.occupancy.insert(key, agent);
                        debug!(agent = agent.0, lane = %intent.lane, "lane granted");
                        report.grants.push(Grant { agent, lane: intent.lane });
                    }
                } else {
                    let blocker = winner.filter(|&w| w != agent);
                    debug!(agent = agent.0, lane = %intent.lane, ?blocker, "lane denied");
                    report.denials.push(Denial { agent, lane: intent.lane, blocker });
                }
            }
        }

        Decisions { admitted }
    }
}

impl LaneGate for LaneNegotiator {
    #[inline]
    fn is_blocked(&self, from: VertexId, to: VertexId, agent: AgentId) -> bool {
        LaneNegotiator::is_blocked(self, from, to, agent)
    }
}

// ── Apply phase ───────────────────────────────────────────────────────────────

#[cfg(any(test, not(feature = "parallel")))]
fn apply_serial<G>(agents: &mut [Agent], dt: f64, geometry: &G, gate: &Decisions) -> Vec<AgentId>
where
    G: Geometry + ?Sized,
{
    agents
        .iter_mut()
        .filter_map(|a| a.update(dt, geometry, gate).then(|| a.id()))
        .collect()
}

#[cfg(feature = "parallel")]
fn apply_parallel<G>(agents: &mut [Agent], dt: f64, geometry: &G, gate: &Decisions) -> Vec<AgentId>
where
    G: Geometry + ?Sized,
{
    use rayon::prelude::*;

    agents
        .par_iter_mut()
        .filter_map(|a| a.update(dt, geometry, gate).then(|| a.id()))
        .collect()
}
