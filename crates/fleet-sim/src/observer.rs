//! Fleet observer trait for progress reporting and data collection.

use fleet_agent::Agent;
use fleet_core::Tick;

use crate::FleetEvent;

/// Callbacks invoked by [`Fleet::step`][crate::Fleet::step] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: waiting counter
///
/// ```rust,ignore
/// struct WaitCounter(usize);
///
/// impl FleetObserver for WaitCounter {
///     fn on_event(&mut self, _tick: Tick, event: &FleetEvent) {
///         if matches!(event, FleetEvent::AgentWaiting { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait FleetObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event, in the order events occurred.
    fn on_event(&mut self, _tick: Tick, _event: &FleetEvent) {}

    /// Called at the end of each tick.
    ///
    /// `changed` is the number of agents whose state or position changed.
    fn on_tick_end(&mut self, _tick: Tick, _changed: usize) {}

    /// Called every `config.snapshot_interval_ticks` ticks, after the tick's
    /// updates, with every agent in ascending id order.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &[Agent]) {}

    /// Called once after the final tick of [`Fleet::run`][crate::Fleet::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`FleetObserver`] that does nothing.
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}
