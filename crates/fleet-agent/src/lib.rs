//! `fleet-agent` — the per-agent motion state machine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`state`]   | `AgentState` — the closed set of states                   |
//! | [`agent`]   | `Agent` — path following, waiting, creep-back             |
//! | [`gate`]    | `LaneGate` capability, `FreeFlow`                         |
//! | [`error`]   | `InvalidPathError`                                        |
//!
//! # Movement model (continuous interpolation)
//!
//! An agent follows a precomputed vertex path one lane at a time.  Each
//! call to [`Agent::update`] with a step of Δt seconds:
//!
//! 1. asks the injected [`LaneGate`] whether the next lane is free;
//! 2. if free, advances `progress` by `speed · Δt / lane_length` and
//!    interpolates the position between the lane endpoints;
//! 3. on reaching the lane end, snaps to the vertex and moves on.
//!
//! A blocked agent switches to `Waiting` and retries on every update.  An
//! agent that was stopped part-way along a lane slowly gives ground back
//! toward the lane start while it waits.
//!
//! The agent never routes and never owns the graph: coordinates and
//! distances come from the [`Geometry`][fleet_core::Geometry] argument.

pub mod agent;
pub mod error;
pub mod gate;
pub mod state;


pub use agent::{Agent, FULL_BATTERY};
pub use error::InvalidPathError;
pub use gate::{FreeFlow, LaneGate};
pub use state::AgentState;
