//! `fleet-core` — foundational types for the `rust_fleet` simulator.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It has no
//! `fleet-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `VertexId`, `EdgeId`, `TaskId`             |
//! | [`geo`]         | `Point2`, the `Geometry` capability trait             |
//! | [`lane`]        | `Lane` (directed), `LaneKey` (undirected)             |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`error`]       | `FleetError`, `FleetResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod geo;
pub mod ids;
pub mod lane;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FleetError, FleetResult};
pub use geo::{Geometry, Point2};
pub use ids::{AgentId, EdgeId, TaskId, VertexId};
pub use lane::{Lane, LaneKey};
pub use rng::{AgentRng, SimRng};
pub use time::{DEFAULT_CREEP_BACK_RATE, DEFAULT_SPEED, SimClock, SimConfig, Tick};
