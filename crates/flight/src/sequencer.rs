//! Session-scoped sequencer tying phase resolution, poses, camera and thrust together.

use glam::{DQuat, DVec3};
use serde::Serialize;
use tozemoon_config::SceneConfig;
use tracing::debug;

use crate::camera::CameraRig;
use crate::geometry::{ClipPlane, SceneGeometry};
use crate::path::TransferPath;
use crate::phase::{FlightPhase, OrbitLatch, PhaseTimeline};
use crate::pose::{Heading, PoseInput, target_pose};
use crate::thrust::{FlameCue, ThrustGate};

/// Per-frame clock supplied by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since session start.
    pub elapsed: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
}

/// Drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Presentation hints derived from the phase for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneCues {
    pub moon_visible: bool,
    pub flame: Option<FlameCue>,
    pub clip_plane: ClipPlane,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequencerState {
    pub elapsed_time: f64,
    pub current_phase: FlightPhase,
    pub phase_local_progress: f64,
    pub rocket_position: DVec3,
    pub rocket_orientation: DQuat,
    pub thrust_level: f64,
    pub camera_position: DVec3,
    pub camera_look_at: DVec3,
    pub camera_fov_deg: f64,
    pub cues: SceneCues,
}

/// Flight sequencer for one visual session.
///
/// Geometry and the transfer curve are built once in [`Sequencer::new`]; each [`Sequencer::tick`]
/// recomputes the frame from elapsed time plus the carried smoothing state (orientation, camera,
/// published thrust). Once the orbit phase is reached the sequencer stays there for the rest of
/// the session, whatever elapsed times it is fed afterwards. Orbit time then advances by the
/// forward clock deltas it observes, falling back to `dt` when the clock jumps backwards.
#[derive(Debug, Clone)]
pub struct Sequencer {
    scene: SceneConfig,
    timeline: PhaseTimeline,
    geometry: SceneGeometry,
    path: TransferPath,
    latch: OrbitLatch,
    orientation: DQuat,
    camera: CameraRig,
    thrust: ThrustGate,
    orbit_time: f64,
    last_elapsed: f64,
}

impl Sequencer {
    pub fn new(scene: &SceneConfig) -> Self {
        let geometry = SceneGeometry::new(scene);
        let path = TransferPath::for_scene(&geometry, scene);
        Self {
            timeline: PhaseTimeline::new(&scene.durations),
            orientation: geometry.launch_orientation,
            camera: CameraRig::initial(&geometry, &scene.camera),
            thrust: ThrustGate::new(scene.rocket.thrust_dead_band),
            latch: OrbitLatch::default(),
            orbit_time: 0.0,
            last_elapsed: 0.0,
            scene: scene.clone(),
            geometry,
            path,
        }
    }

    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    pub fn transfer_path(&self) -> &TransferPath {
        &self.path
    }

    pub fn timeline(&self) -> &PhaseTimeline {
        &self.timeline
    }

    pub fn is_orbit_latched(&self) -> bool {
        self.latch.is_engaged()
    }

    /// Compute the frame for `frame.elapsed`.
    pub fn tick(&mut self, frame: FrameInput, viewport: Viewport) -> SequencerState {
        let elapsed = if frame.elapsed.is_finite() {
            frame.elapsed.max(0.0)
        } else {
            0.0
        };
        let dt = if frame.dt.is_finite() {
            frame.dt.max(0.0)
        } else {
            0.0
        };

        let (phase, progress) = if self.latch.is_engaged() {
            (FlightPhase::Orbit, 0.0)
        } else {
            self.timeline.resolve(elapsed)
        };
        if phase == FlightPhase::Orbit {
            if self.latch.engage() {
                debug!(elapsed, "flight sequence latched into orbit");
                self.orbit_time = (elapsed - self.timeline.total()).max(0.0);
            } else if elapsed >= self.last_elapsed {
                self.orbit_time += elapsed - self.last_elapsed;
            } else {
                self.orbit_time += dt;
            }
        }
        self.last_elapsed = elapsed;

        let target = target_pose(
            PoseInput {
                phase,
                progress,
                elapsed,
                orbit_elapsed: self.orbit_time,
            },
            &self.geometry,
            &self.path,
            &self.scene,
        );

        self.orientation = match target.heading {
            Heading::Fixed(q) => q,
            Heading::Track(Some(direction)) => match direction.try_normalize() {
                Some(direction) => {
                    let goal = DQuat::from_rotation_arc(DVec3::Y, direction);
                    let step = (dt * self.scene.rocket.orientation_slerp_rate).min(1.0);
                    self.orientation.slerp(goal, step).normalize()
                }
                None => self.orientation,
            },
            Heading::Track(None) => self.orientation,
        };

        self.camera.follow(
            target.position,
            dt,
            phase.is_near_earth(),
            &self.geometry,
            &self.scene.camera,
        );
        self.thrust.offer(target.thrust);
        self.camera.adjust_fov(
            target.position,
            self.scene.rocket.bounding_radius,
            viewport.height,
            &self.scene.zoom,
        );

        SequencerState {
            elapsed_time: elapsed,
            current_phase: phase,
            phase_local_progress: progress,
            rocket_position: target.position,
            rocket_orientation: self.orientation,
            thrust_level: self.thrust.level(),
            camera_position: self.camera.position(),
            camera_look_at: self.camera.look_at(),
            camera_fov_deg: self.camera.fov_deg(),
            cues: SceneCues {
                moon_visible: phase.moon_visible(),
                flame: FlameCue::for_phase(phase, progress, self.thrust.level()),
                clip_plane: self.geometry.clip_plane,
            },
        }
    }
}
