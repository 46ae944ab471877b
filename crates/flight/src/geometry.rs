//! Session-scoped scene anchors computed once from the scene configuration.

use glam::{DQuat, DVec3};
use serde::Serialize;
use tozemoon_config::SceneConfig;
use tozemoon_core::geometry::{SurfacePoint, lat_lon_to_surface};

/// Plane through the launch site, facing outward. Fragments below it (inside the Earth) are
/// clipped by the renderer so the exhaust never shows through the pad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClipPlane {
    pub normal: DVec3,
    pub constant: f64,
}

/// Immutable geometric anchors of the hero scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGeometry {
    pub earth_center: DVec3,
    pub earth_radius: f64,
    pub moon_center: DVec3,
    pub moon_radius: f64,
    pub orbit_radius: f64,
    pub orbit_rate: f64,
    pub site: SurfacePoint,
    /// Pad position lifted by the resting offset.
    pub rest_position: DVec3,
    /// Orientation mapping the rocket's local +Y onto the site normal.
    pub launch_orientation: DQuat,
    pub clip_plane: ClipPlane,
}

impl SceneGeometry {
    pub fn new(scene: &SceneConfig) -> Self {
        let earth_center = DVec3::from_array(scene.earth.center);
        let site = lat_lon_to_surface(
            scene.earth.radius,
            scene.launch.latitude_deg,
            scene.launch.longitude_deg,
            earth_center,
        );
        let clip_plane = ClipPlane {
            normal: site.normal,
            constant: -site.normal.dot(site.position),
        };
        Self {
            earth_center,
            earth_radius: scene.earth.radius,
            moon_center: DVec3::from_array(scene.moon.center),
            moon_radius: scene.moon.radius,
            orbit_radius: scene.moon.orbit_radius(),
            orbit_rate: scene.moon.orbit_rate_rad_s,
            site,
            rest_position: site.position + site.normal * scene.launch.rest_offset,
            launch_orientation: DQuat::from_rotation_arc(DVec3::Y, site.normal),
            clip_plane,
        }
    }

    /// Point on the pad's vertical at `height` above the surface.
    pub fn above_site(&self, height: f64) -> DVec3 {
        self.site.position + self.site.normal * height
    }
}
