//! Routing trait and default Dijkstra implementation.
//!
//! The fleet layer computes a path once per task assignment and hands the
//! resulting vertex sequence to the agent; the motion core never routes.
//!
//! # Cost units
//!
//! Lane lengths are converted to integer micro-units (length × 1e6, rounded)
//! for the priority queue so heap ordering is total and exact.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use fleet_core::{EdgeId, VertexId};

use crate::{GraphError, GraphResult, NavGraph};

const COST_SCALE: f64 = 1_000_000.0;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: the vertices to visit in order, including
/// both endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub vertices: Vec<VertexId>,
    /// Sum of lane lengths along `vertices`.
    pub length: f64,
}

impl Route {
    /// `true` if source and destination are the same vertex.
    pub fn is_trivial(&self) -> bool {
        self.vertices.len() <= 1
    }

    /// Number of lanes traversed.
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields a single-vertex route, not an error.
    fn route(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra over the CSR lane arrays, weighted by lane length.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
        dijkstra(graph, from, to)
    }
}

#[inline]
fn lane_cost(graph: &NavGraph, edge: EdgeId) -> u64 {
    (graph.lane_length[edge.index()] * COST_SCALE).round() as u64
}

fn dijkstra(graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
    for v in [from, to] {
        if !graph.contains(v) {
            return Err(GraphError::VertexNotFound(v));
        }
    }
    if from == to {
        return Ok(Route { vertices: vec![from], length: 0.0 });
    }

    let n = graph.vertex_count();
    let mut dist      = vec![u64::MAX; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Secondary key VertexId makes tie-breaking deterministic.
    let mut heap: BinaryHeap<Reverse<(u64, VertexId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, vertex))) = heap.pop() {
        if vertex == to {
            return Ok(reconstruct(graph, &prev_edge, to));
        }
        if cost > dist[vertex.index()] {
            continue;
        }
        for edge in graph.out_lanes(vertex) {
            let next     = graph.lane_to[edge.index()];
            let new_cost = cost.saturating_add(lane_cost(graph, edge));
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_edge[next.index()] = edge;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

fn reconstruct(graph: &NavGraph, prev_edge: &[EdgeId], to: VertexId) -> Route {
    let mut vertices = vec![to];
    let mut length   = 0.0;
    let mut cur      = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        length += graph.lane_length[e.index()];
        cur = graph.lane_from[e.index()];
        vertices.push(cur);
    }
    vertices.reverse();
    Route { vertices, length }
}
