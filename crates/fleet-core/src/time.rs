//! Simulation time model.
//!
//! # Design
//!
//! Time advances in discrete ticks of a fixed duration Δt.  The integer
//! `Tick` counter is the canonical time unit for ordering (task assignment,
//! output rows); the floating-point Δt only feeds kinematic interpolation:
//!
//!   elapsed_secs = tick * tick_secs
//!
//! Keeping the counter integral means two runs with the same config always
//! agree on "which tick" something happened, regardless of float rounding.

use std::fmt;

use crate::{FleetError, FleetResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Fixed-step clock: the current tick plus the duration of one tick.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick (Δt handed to every agent update).
    pub tick_secs: f64,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_secs: f64) -> Self {
        Self { tick_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.secs_at(self.current_tick)
    }

    /// Simulated seconds at which `tick` begins.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.tick_secs
    }

    /// How many ticks span `secs` seconds? (rounds up)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        if self.tick_secs <= 0.0 {
            return 0;
        }
        (secs / self.tick_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Default agent speed in distance units per second.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Default rate (lane fraction per second) at which a blocked agent that has
/// already started its lane eases back toward the lane start.
pub const DEFAULT_CREEP_BACK_RATE: f64 = 0.05;

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the fleet builder.  Every field has a default so partial files work.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per tick.  Must be finite and ≥ 0.
    pub tick_secs: f64,

    /// Total ticks to simulate.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit an agent snapshot every N ticks.  0 disables snapshots.
    pub snapshot_interval_ticks: u64,

    /// Speed given to newly spawned agents.
    pub default_speed: f64,

    /// Progress fraction per second a held mid-lane agent gives back.
    pub creep_back_rate: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_secs:               0.1,
            total_ticks:             600,
            seed:                    42,
            snapshot_interval_ticks: 10,
            default_speed:           DEFAULT_SPEED,
            creep_back_rate:         DEFAULT_CREEP_BACK_RATE,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_secs)
    }

    /// Reject values that would break the kinematic invariants.
    pub fn validate(&self) -> FleetResult<()> {
        if !self.tick_secs.is_finite() || self.tick_secs < 0.0 {
            return Err(FleetError::Config(format!(
                "tick_secs must be finite and non-negative, got {}",
                self.tick_secs
            )));
        }
        if !self.default_speed.is_finite() || self.default_speed < 0.0 {
            return Err(FleetError::Config(format!(
                "default_speed must be finite and non-negative, got {}",
                self.default_speed
            )));
        }
        if !self.creep_back_rate.is_finite() || self.creep_back_rate < 0.0 {
            return Err(FleetError::Config(format!(
                "creep_back_rate must be finite and non-negative, got {}",
                self.creep_back_rate
            )));
        }
        Ok(())
    }
}
