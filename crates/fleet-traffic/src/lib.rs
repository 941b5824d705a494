//! `fleet-traffic` — keeps agents from sharing a lane.
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`negotiator`]  | `LaneNegotiator`, `Priority`                           |
//! | [`report`]      | `NegotiationReport`, `Grant`, `Denial`, `Release`      |
//!
//! Lanes are exclusive per undirected edge: an agent on `a → b` blocks both
//! `a → b` and `b → a`, so head-on meetings cannot happen.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Run agent updates on Rayon's thread pool.               |

pub mod negotiator;
pub mod report;

#[cfg(test)]
mod tests;

pub use negotiator::{LaneNegotiator, Priority};
pub use report::{Denial, Grant, NegotiationReport, Release};
