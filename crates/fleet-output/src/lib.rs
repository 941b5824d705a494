//! `fleet-output` — run output writers for the rust_fleet simulator.
//!
//! | Backend | Files created                                  |
//! |---------|------------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `fleet_events.csv`      |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`FleetOutputObserver`], which implements `fleet_sim::FleetObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fleet_output::{CsvWriter, FleetOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = FleetOutputObserver::new(writer, fleet.config());
//! fleet.run(&mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use self::csv::{CsvWriter, EVENTS_FILE, SNAPSHOTS_FILE};
pub use error::{OutputError, OutputResult};
pub use observer::FleetOutputObserver;
pub use row::{AgentSnapshotRow, EventRow};
pub use writer::OutputWriter;
