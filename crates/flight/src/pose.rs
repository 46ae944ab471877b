//! Per-phase rocket pose rules.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use tozemoon_config::SceneConfig;
use tozemoon_core::easing::{lerp, smootherstep};

use crate::geometry::SceneGeometry;
use crate::path::TransferPath;
use crate::phase::FlightPhase;

/// How the rocket should be oriented this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Heading {
    /// Snap to this orientation.
    Fixed(DQuat),
    /// Turn the rocket's +Y toward this direction (smoothed). `None` when the direction
    /// could not be computed; the previous orientation is kept.
    Track(Option<DVec3>),
}

/// Target rocket pose and engine level for one frame, before any smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTarget {
    pub position: DVec3,
    pub heading: Heading,
    pub thrust: f64,
}

/// Inputs to the pose rules for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct PoseInput {
    pub phase: FlightPhase,
    pub progress: f64,
    /// Seconds since session start.
    pub elapsed: f64,
    /// Seconds since the orbit phase began (zero before it).
    pub orbit_elapsed: f64,
}

/// Compute the target pose for the active phase.
pub fn target_pose(
    input: PoseInput,
    geometry: &SceneGeometry,
    path: &TransferPath,
    scene: &SceneConfig,
) -> PoseTarget {
    let normal = geometry.site.normal;
    match input.phase {
        FlightPhase::Idle => PoseTarget {
            position: geometry.rest_position,
            heading: Heading::Fixed(geometry.launch_orientation),
            thrust: 0.0,
        },
        FlightPhase::Countdown => {
            let launch = &scene.launch;
            let vibration =
                (input.elapsed * launch.vibration_rate_rad_s).sin() * launch.vibration_amplitude;
            PoseTarget {
                position: geometry.rest_position + normal * vibration,
                heading: Heading::Fixed(geometry.launch_orientation),
                thrust: 0.0,
            }
        }
        FlightPhase::Launch => {
            let p = smootherstep(input.progress);
            PoseTarget {
                position: geometry.above_site(lerp(0.0, scene.launch.apogee, p)),
                heading: Heading::Fixed(geometry.launch_orientation),
                thrust: lerp(0.0, 1.0, p),
            }
        }
        FlightPhase::Transfer => {
            let p = smootherstep(input.progress);
            let ahead = (p + 0.002).min(1.0);
            PoseTarget {
                position: path.point_at(p),
                heading: Heading::Track(path.tangent_at(ahead)),
                thrust: lerp(0.8, 0.55, p),
            }
        }
        FlightPhase::Capture => {
            let p = smootherstep(input.progress);
            let angle = lerp(-PI * 0.25, 0.0, p);
            let radius = lerp(geometry.orbit_radius * 1.6, geometry.orbit_radius, p);
            let offset = DVec3::new(
                angle.cos() * radius,
                lerp(0.2, 0.05, p),
                angle.sin() * radius,
            );
            PoseTarget {
                position: geometry.moon_center + offset,
                heading: Heading::Track(Some(orbit_tangent(angle))),
                thrust: 0.12,
            }
        }
        FlightPhase::Orbit => {
            let angle = input.orbit_elapsed * geometry.orbit_rate;
            let offset = DVec3::new(
                angle.cos() * geometry.orbit_radius,
                (angle * 0.4).sin() * 0.08,
                angle.sin() * geometry.orbit_radius,
            );
            PoseTarget {
                position: geometry.moon_center + offset,
                heading: Heading::Track(Some(orbit_tangent(angle))),
                thrust: 0.10,
            }
        }
    }
}

/// Direction of travel on a counter-clockwise circle in the XZ plane.
fn orbit_tangent(angle: f64) -> DVec3 {
    DVec3::new(-angle.sin(), 0.0, angle.cos())
}
