//! Phase timeline: which scripted segment is active at a given elapsed time.

use serde::Serialize;
use tozemoon_config::PhaseDurations;

/// Ordered flight phases. `Orbit` is terminal and unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightPhase {
    Idle,
    Countdown,
    Launch,
    Transfer,
    Capture,
    Orbit,
}

impl FlightPhase {
    /// Phases with a fixed duration, in timeline order.
    pub const SCRIPTED: [FlightPhase; 5] = [
        FlightPhase::Idle,
        FlightPhase::Countdown,
        FlightPhase::Launch,
        FlightPhase::Transfer,
        FlightPhase::Capture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightPhase::Idle => "idle",
            FlightPhase::Countdown => "countdown",
            FlightPhase::Launch => "launch",
            FlightPhase::Transfer => "transfer",
            FlightPhase::Capture => "capture",
            FlightPhase::Orbit => "orbit",
        }
    }

    /// Phases spent on or just above the pad, where the camera is kept above the horizon.
    pub fn is_near_earth(&self) -> bool {
        matches!(
            self,
            FlightPhase::Idle | FlightPhase::Countdown | FlightPhase::Launch
        )
    }

    pub fn moon_visible(&self) -> bool {
        matches!(
            self,
            FlightPhase::Transfer | FlightPhase::Capture | FlightPhase::Orbit
        )
    }
}

/// Cumulative phase boundaries derived from the configured durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTimeline {
    durations: [f64; 5],
    ends: [f64; 5],
}

impl PhaseTimeline {
    pub fn new(durations: &PhaseDurations) -> Self {
        let durations = durations.as_array();
        let mut ends = [0.0; 5];
        let mut acc = 0.0;
        for (end, duration) in ends.iter_mut().zip(durations) {
            acc += duration;
            *end = acc;
        }
        Self { durations, ends }
    }

    /// Elapsed time at which `Orbit` begins.
    pub fn total(&self) -> f64 {
        self.ends[4]
    }

    /// Start time of `phase`.
    pub fn start_of(&self, phase: FlightPhase) -> f64 {
        match FlightPhase::SCRIPTED.iter().position(|p| *p == phase) {
            Some(0) => 0.0,
            Some(idx) => self.ends[idx - 1],
            None => self.total(),
        }
    }

    /// Resolve the active phase and its local progress in `[0, 1]`.
    ///
    /// Intervals are half-open (`start <= t < end`). Negative or non-finite times resolve to
    /// the start of `Idle`; anything at or past the total resolves to `Orbit` with zero progress.
    pub fn resolve(&self, elapsed: f64) -> (FlightPhase, f64) {
        let t = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
        let mut start = 0.0;
        for (idx, phase) in FlightPhase::SCRIPTED.iter().enumerate() {
            if t < self.ends[idx] {
                let progress = (t - start) / self.durations[idx];
                return (*phase, tozemoon_core::easing::clamp01(progress));
            }
            start = self.ends[idx];
        }
        (FlightPhase::Orbit, 0.0)
    }
}

/// Stateless phase resolution over the given durations.
pub fn resolve_phase(elapsed: f64, durations: &PhaseDurations) -> (FlightPhase, f64) {
    PhaseTimeline::new(durations).resolve(elapsed)
}

/// One-way latch recording that the orbit phase has been reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrbitLatch {
    engaged: bool,
}

impl OrbitLatch {
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Engage the latch; returns `true` only on the call that engaged it.
    pub fn engage(&mut self) -> bool {
        let newly = !self.engaged;
        self.engaged = true;
        newly
    }
}
