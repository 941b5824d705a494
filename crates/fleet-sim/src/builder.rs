//! Fluent builder for constructing a [`Fleet`].

use fleet_core::{SimConfig, VertexId};
use fleet_graph::{NavGraph, Router};

use crate::{Fleet, SimResult};

/// Fluent builder for [`Fleet<R>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — tick duration, seed, default speed, …
/// - [`NavGraph`] — the navigation graph agents drive on
/// - `R: Router` — the routing algorithm (e.g. [`fleet_graph::DijkstraRouter`])
///
/// # Optional inputs
///
/// | Method             | Default       |
/// |--------------------|---------------|
/// | `.agents_at(v)`    | No agents     |
///
/// # Example
///
/// ```rust,ignore
/// let mut fleet = FleetBuilder::new(config, graph, DijkstraRouter)
///     .agents_at(vec![VertexId(0), VertexId(4)])
///     .build()?;
/// fleet.run(&mut NoopObserver);
/// ```
pub struct FleetBuilder<R: Router> {
    config: SimConfig,
    graph:  NavGraph,
    router: R,
    starts: Vec<VertexId>,
}

impl<R: Router> FleetBuilder<R> {
    pub fn new(config: SimConfig, graph: NavGraph, router: R) -> Self {
        Self { config, graph, router, starts: Vec::new() }
    }

    /// Spawn one agent per entry, in order, so `starts[i]` becomes
    /// `AgentId(i)`.
    pub fn agents_at(mut self, starts: Vec<VertexId>) -> Self {
        self.starts = starts;
        self
    }

    /// Validate the config and start vertices and return a fleet at tick 0.
    pub fn build(self) -> SimResult<Fleet<R>> {
        self.config.validate()?;

        let mut fleet = Fleet::new(self.config, self.graph, self.router);
        for vertex in self.starts {
            fleet.spawn(vertex)?;
        }
        Ok(fleet)
    }
}
