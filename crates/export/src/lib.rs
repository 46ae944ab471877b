//! Export helpers for CSV and JSON timeline artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod timeline {
    use std::io::{self, Write};

    use tozemoon_flight::SequencerState;

    const HEADER: &str = "elapsed_s,phase,progress,rocket_x,rocket_y,rocket_z,rocket_qx,rocket_qy,rocket_qz,rocket_qw,thrust,camera_x,camera_y,camera_z,fov_deg,moon_visible,flame";

    /// Write the standard timeline CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One sampled frame as a CSV row.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub state: &'a SequencerState,
    }

    impl<'a> Record<'a> {
        pub fn new(state: &'a SequencerState) -> Self {
            Self { state }
        }

        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let s = self.state;
            let flame = s.cues.flame.map_or("none", |f| f.variant.mesh_name());
            writeln!(
                writer,
                "{:.4},{},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.4},{:.6},{:.6},{:.6},{:.3},{},{}",
                s.elapsed_time,
                s.current_phase.as_str(),
                s.phase_local_progress,
                s.rocket_position.x,
                s.rocket_position.y,
                s.rocket_position.z,
                s.rocket_orientation.x,
                s.rocket_orientation.y,
                s.rocket_orientation.z,
                s.rocket_orientation.w,
                s.thrust_level,
                s.camera_position.x,
                s.camera_position.y,
                s.camera_position.z,
                s.camera_fov_deg,
                if s.cues.moon_visible { "true" } else { "false" },
                flame,
            )
        }
    }
}

pub mod summary {
    use std::io::Write;

    use glam::DVec3;
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use tozemoon_flight::{FlightPhase, SequencerState};

    use crate::ExportError;

    /// Time span covered by one phase in the sampled frames.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct PhaseSpan {
        pub phase: FlightPhase,
        pub first_s: f64,
        pub last_s: f64,
        pub frames: usize,
    }

    /// Aggregate of a sampled run, written as a JSON document.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct TimelineSummary {
        pub frames: usize,
        pub duration_s: f64,
        pub orbit_entered_s: Option<f64>,
        pub max_thrust: f64,
        /// Smallest camera distance above the Earth surface while near Earth.
        pub min_camera_clearance: Option<f64>,
        pub fov_range_deg: Option<[f64; 2]>,
        pub phases: Vec<PhaseSpan>,
    }

    /// Accumulates frames into a [`TimelineSummary`].
    #[derive(Debug, Clone)]
    pub struct SummaryBuilder {
        earth_center: DVec3,
        earth_radius: f64,
        summary: TimelineSummary,
    }

    impl SummaryBuilder {
        pub fn new(earth_center: DVec3, earth_radius: f64) -> Self {
            Self {
                earth_center,
                earth_radius,
                summary: TimelineSummary {
                    frames: 0,
                    duration_s: 0.0,
                    orbit_entered_s: None,
                    max_thrust: 0.0,
                    min_camera_clearance: None,
                    fov_range_deg: None,
                    phases: Vec::new(),
                },
            }
        }

        pub fn push(&mut self, state: &SequencerState) {
            let summary = &mut self.summary;
            summary.frames += 1;
            summary.duration_s = summary.duration_s.max(state.elapsed_time);
            summary.max_thrust = summary.max_thrust.max(state.thrust_level);
            if state.current_phase == FlightPhase::Orbit && summary.orbit_entered_s.is_none() {
                summary.orbit_entered_s = Some(state.elapsed_time);
            }
            if state.current_phase.is_near_earth() {
                let clearance =
                    state.camera_position.distance(self.earth_center) - self.earth_radius;
                summary.min_camera_clearance = Some(
                    summary
                        .min_camera_clearance
                        .map_or(clearance, |c| c.min(clearance)),
                );
            }
            let fov = state.camera_fov_deg;
            summary.fov_range_deg = Some(match summary.fov_range_deg {
                Some([lo, hi]) => [lo.min(fov), hi.max(fov)],
                None => [fov, fov],
            });
            match summary.phases.last_mut() {
                Some(span) if span.phase == state.current_phase => {
                    span.last_s = state.elapsed_time;
                    span.frames += 1;
                }
                _ => summary.phases.push(PhaseSpan {
                    phase: state.current_phase,
                    first_s: state.elapsed_time,
                    last_s: state.elapsed_time,
                    frames: 1,
                }),
            }
        }

        pub fn finish(self) -> TimelineSummary {
            self.summary
        }
    }

    pub fn write_summary(
        writer: &mut dyn Write,
        summary: &TimelineSummary,
    ) -> Result<(), ExportError> {
        to_writer_pretty(&mut *writer, summary)?;
        writeln!(writer)?;
        Ok(())
    }
}
