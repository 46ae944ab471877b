//! Engine thrust publication and exhaust flame selection.

use serde::Serialize;

use crate::phase::FlightPhase;

/// Dead-band gate on the published thrust level.
///
/// The published value only changes when the new target differs from it by more than the
/// dead band, so downstream consumers are not poked every frame for negligible changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustGate {
    published: f64,
    dead_band: f64,
}

impl ThrustGate {
    pub fn new(dead_band: f64) -> Self {
        Self {
            published: 0.0,
            dead_band: dead_band.max(0.0),
        }
    }

    pub fn level(&self) -> f64 {
        self.published
    }

    /// Offer a new target level (clamped to `[0, 1]`).
    ///
    /// Returns `true` when the published level changed.
    pub fn offer(&mut self, target: f64) -> bool {
        let target = tozemoon_core::easing::clamp01(target);
        if (self.published - target).abs() > self.dead_band {
            self.published = target;
            true
        } else {
            false
        }
    }
}

/// Exhaust flame meshes, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlameVariant {
    VerySmall,
    Small,
    Calm,
    Mid,
    Active,
}

impl FlameVariant {
    /// Mesh name inside the flame model.
    pub fn mesh_name(&self) -> &'static str {
        match self {
            FlameVariant::VerySmall => "Very_Small_Flame001",
            FlameVariant::Small => "Small_Flame",
            FlameVariant::Calm => "Calm_Flame",
            FlameVariant::Mid => "Mid_Flame",
            FlameVariant::Active => "Active_flame",
        }
    }

    /// Level-of-detail variant for a thrust level.
    pub fn for_thrust(thrust: f64) -> Self {
        if thrust > 0.85 {
            FlameVariant::Active
        } else if thrust > 0.60 {
            FlameVariant::Mid
        } else if thrust > 0.30 {
            FlameVariant::Calm
        } else if thrust > 0.10 {
            FlameVariant::Small
        } else {
            FlameVariant::VerySmall
        }
    }
}

/// Flame presentation for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlameCue {
    /// Variant chosen by phase.
    pub variant: FlameVariant,
    /// Uniform scale for the phase variant.
    pub scale: f64,
    /// Variant chosen by thrust level of detail.
    pub lod: FlameVariant,
    /// Whether the blue core flame is drawn.
    pub blue_core: bool,
}

impl FlameCue {
    /// Flame for the given phase, or `None` while the engine is cold.
    pub fn for_phase(phase: FlightPhase, progress: f64, thrust: f64) -> Option<Self> {
        let (variant, scale) = match phase {
            FlightPhase::Idle | FlightPhase::Countdown => return None,
            FlightPhase::Launch if progress < 0.35 => (FlameVariant::VerySmall, 0.10),
            FlightPhase::Launch => (FlameVariant::Active, 0.12),
            FlightPhase::Transfer => (FlameVariant::Mid, 0.115),
            FlightPhase::Capture | FlightPhase::Orbit => (FlameVariant::Calm, 0.105),
        };
        Some(Self {
            variant,
            scale,
            lod: FlameVariant::for_thrust(thrust),
            blue_core: thrust > 0.25,
        })
    }
}
