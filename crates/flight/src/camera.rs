//! Chase camera: offset follow with horizon and occlusion corrections, damped motion,
//! and a field-of-view controller that holds the rocket's on-screen size.

use glam::DVec3;
use tozemoon_config::{CameraConfig, ZoomConfig};
use tozemoon_core::damping::Damped3;
use tozemoon_core::easing::lerp;
use tozemoon_core::geometry::{closest_point_on_segment, push_outside_sphere};

use crate::geometry::SceneGeometry;

/// Push `position` outward so it stays at least `margin` above the Earth surface.
pub fn keep_above_earth(position: DVec3, geometry: &SceneGeometry, margin: f64) -> DVec3 {
    push_outside_sphere(
        position,
        geometry.earth_center,
        geometry.earth_radius + margin,
    )
}

/// Relocate the camera when the Earth would sit between it and the rocket.
///
/// The check uses the closest approach of the camera-to-rocket segment to the Earth centre.
/// An occluded camera moves to the rocket plus the close offset (mirrored to the rocket's
/// side of the Earth) plus a radial push away from the Earth.
pub fn avoid_occlusion(
    camera: DVec3,
    rocket: DVec3,
    geometry: &SceneGeometry,
    config: &CameraConfig,
) -> DVec3 {
    let closest = closest_point_on_segment(camera, rocket, geometry.earth_center);
    if closest.distance(geometry.earth_center) >= geometry.earth_radius + config.occlusion_safety {
        return camera;
    }
    let offset = DVec3::from_array(config.offset_close);
    let radial = rocket - geometry.earth_center;
    let side = if radial.dot(offset) < 0.0 { -1.0 } else { 1.0 };
    let away = radial.try_normalize().unwrap_or(DVec3::Y) * config.occlusion_push;
    rocket + offset * side + away
}

/// Damped chase camera with a smoothed field of view.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    position: Damped3,
    look_at: DVec3,
    fov_deg: f64,
}

impl CameraRig {
    /// Camera at session start: beside the resting rocket, above the horizon, aimed at the pad.
    pub fn initial(geometry: &SceneGeometry, config: &CameraConfig) -> Self {
        let start = geometry.rest_position + DVec3::from_array(config.offset_close);
        Self {
            position: Damped3::new(keep_above_earth(start, geometry, config.horizon_margin)),
            look_at: geometry.site.position,
            fov_deg: config.initial_fov_deg,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position.value
    }

    pub fn look_at(&self) -> DVec3 {
        self.look_at
    }

    pub fn fov_deg(&self) -> f64 {
        self.fov_deg
    }

    /// Corrected position the camera is steering toward for this rocket position.
    pub fn desired_position(
        &self,
        rocket: DVec3,
        clamp_to_earth: bool,
        geometry: &SceneGeometry,
        config: &CameraConfig,
    ) -> DVec3 {
        let offset = if self.position.value.distance(rocket) > config.far_threshold {
            config.offset_far
        } else {
            config.offset_close
        };
        let mut desired = rocket + DVec3::from_array(offset);
        if clamp_to_earth {
            desired = keep_above_earth(desired, geometry, config.horizon_margin);
        }
        desired = avoid_occlusion(desired, rocket, geometry, config);
        if clamp_to_earth {
            desired = keep_above_earth(desired, geometry, config.horizon_margin);
        }
        desired
    }

    /// Advance the camera one frame toward the corrected chase position and aim it at the rocket.
    ///
    /// With `clamp_to_earth` the damped result is clamped above the horizon as well, so the
    /// camera never dips into the planet while easing in.
    pub fn follow(
        &mut self,
        rocket: DVec3,
        dt: f64,
        clamp_to_earth: bool,
        geometry: &SceneGeometry,
        config: &CameraConfig,
    ) -> DVec3 {
        let desired = self.desired_position(rocket, clamp_to_earth, geometry, config);
        let stepped = self.position.step(desired, config.smooth_time, dt);
        if clamp_to_earth {
            self.position.value = keep_above_earth(stepped, geometry, config.horizon_margin);
        }
        self.look_at = rocket;
        self.position.value
    }

    /// Nudge the FOV so a sphere of `radius` at `target` spans about the configured pixel height.
    ///
    /// Skipped for a zero-height viewport or a camera sitting on the target.
    pub fn adjust_fov(
        &mut self,
        target: DVec3,
        radius: f64,
        viewport_height: f64,
        zoom: &ZoomConfig,
    ) {
        let distance = target.distance(self.position.value);
        if !(viewport_height > 0.0) || !(distance > 1.0e-9) || !(radius > 0.0) {
            return;
        }
        let half_fov = (self.fov_deg * 0.5).to_radians();
        let apparent = (radius / distance) * (viewport_height / half_fov.tan());
        // Apparent size scales with 1 / tan(fov / 2): a rocket that looks too small needs a
        // narrower field of view.
        let ratio = (apparent / zoom.target_screen_height_px.max(1.0e-6))
            .clamp(zoom.min_ratio, zoom.max_ratio);
        let target_fov = (self.fov_deg * ratio).clamp(zoom.min_fov_deg, zoom.max_fov_deg);
        self.fov_deg = lerp(self.fov_deg, target_fov, zoom.lerp);
    }
}
