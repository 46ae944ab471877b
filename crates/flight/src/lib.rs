//! Flight sequencer driving the hero visualization.
//!
//! Given a wall-clock elapsed time and the viewport size, the sequencer resolves the active
//! flight phase and produces the rocket pose, camera pose and engine thrust for one frame.
//! Everything except a little smoothing state is a pure function of elapsed time.

pub mod camera;
pub mod geometry;
pub mod path;
pub mod phase;
pub mod pose;
pub mod sequencer;
pub mod thrust;

pub use camera::CameraRig;
pub use geometry::{ClipPlane, SceneGeometry};
pub use path::TransferPath;
pub use phase::{FlightPhase, OrbitLatch, PhaseTimeline, resolve_phase};
pub use sequencer::{FrameInput, SceneCues, Sequencer, SequencerState, Viewport};
pub use thrust::{FlameCue, FlameVariant, ThrustGate};
