//! `fleet-graph` — navigation graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, `VertexInfo`    |
//! | [`router`] | `Router` trait, `Route`, `DijkstraRouter`                    |
//! | [`loader`] | JSON navigation-graph loader                                 |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                               |
//!
//! `NavGraph` implements [`fleet_core::Geometry`], so it can be handed
//! straight to agent updates.

pub mod error;
pub mod graph;
pub mod loader;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{NavGraph, NavGraphBuilder, VertexInfo};
pub use loader::{load_graph_json, load_graph_reader, load_graph_str};
pub use router::{DijkstraRouter, Route, Router};
