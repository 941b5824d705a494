//! `fleet-sim` — fleet bookkeeping and the tick loop.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Flush      — deliver events raised between ticks (spawn, assign, hold)
//!   ② Negotiate  — LaneNegotiator decides lane access from one snapshot
//!   ③ Move       — every agent advances by tick_secs against those answers
//!                  (parallel with the `parallel` feature)
//!   ④ Diff       — grants, new waits, arrivals, completions → FleetEvent
//!   ⑤ Snapshot   — every snapshot_interval_ticks ticks
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the move phase on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::{SimConfig, VertexId};
//! use fleet_graph::DijkstraRouter;
//! use fleet_sim::{FleetBuilder, NoopObserver};
//!
//! let mut fleet = FleetBuilder::new(SimConfig::default(), graph, DijkstraRouter)
//!     .agents_at(vec![VertexId(0), VertexId(3)])
//!     .build()?;
//! fleet.assign_task(AgentId(0), VertexId(3))?;
//! fleet.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod event;
pub mod fleet;
pub mod observer;


pub use builder::FleetBuilder;
pub use error::{SimError, SimResult};
pub use event::FleetEvent;
pub use fleet::Fleet;
pub use observer::{FleetObserver, NoopObserver};
