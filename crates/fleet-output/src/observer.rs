//! `FleetOutputObserver<W>` — bridges `FleetObserver` to an `OutputWriter`.

use fleet_agent::Agent;
use fleet_core::{SimConfig, Tick};
use fleet_sim::{FleetEvent, FleetObserver};

use crate::row::{AgentSnapshotRow, EventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`FleetObserver`] that writes agent snapshots and fleet events to any
/// [`OutputWriter`] backend.
///
/// Events are buffered for the duration of a tick and written as one batch
/// in `on_tick_end`.  Errors from the writer are stored internally because
/// `FleetObserver` methods have no return value.  After `fleet.run()`
/// returns, check for errors with [`take_error`][Self::take_error].
pub struct FleetOutputObserver<W: OutputWriter> {
    writer:     W,
    tick_secs:  f64,
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> FleetOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` to convert ticks
    /// to elapsed seconds.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_secs:  config.tick_secs,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `fleet.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush buffered events and close the writer.  `on_sim_end` does this
    /// automatically; call it after driving the fleet with `run_ticks`.
    pub fn finish(&mut self) {
        self.flush_events();
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn flush_events(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let rows = std::mem::take(&mut self.pending);
        let result = self.writer.write_events(&rows);
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> FleetObserver for FleetOutputObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &FleetEvent) {
        self.pending.push(EventRow {
            tick:         tick.0,
            elapsed_secs: tick.0 as f64 * self.tick_secs,
            agent_id:     event.agent().0,
            kind:         event.kind(),
            detail:       event.detail(),
        });
    }

    fn on_tick_end(&mut self, _tick: Tick, _changed: usize) {
        self.flush_events();
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &[Agent]) {
        let rows: Vec<AgentSnapshotRow> = agents
            .iter()
            .map(|a| {
                let pos = a.position();
                AgentSnapshotRow {
                    agent_id: a.id().0,
                    tick:     tick.0,
                    state:    a.state().as_str(),
                    vertex:   a.vertex().0,
                    x:        pos.x,
                    y:        pos.y,
                    progress: a.progress(),
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.finish();
    }
}
