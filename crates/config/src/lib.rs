//! Configuration models and loaders for the ToZeMoon site services.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Alias for a 3D vector stored in configuration files as `[x, y, z]`.
pub type Vector3 = [f64; 3];

/// Top-level site configuration. Every section falls back to built-in defaults.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub scene: SceneConfig,
    pub contact: ContactConfig,
    pub server: ServerConfig,
}

/// Hero animation constants.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub durations: PhaseDurations,
    pub earth: EarthConfig,
    pub moon: MoonConfig,
    pub launch: LaunchConfig,
    pub camera: CameraConfig,
    pub zoom: ZoomConfig,
    pub rocket: RocketConfig,
}

/// Scripted phase durations in seconds. The orbit phase is unbounded and has no entry.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhaseDurations {
    pub idle: f64,
    pub countdown: f64,
    pub launch: f64,
    pub transfer: f64,
    pub capture: f64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            idle: 1.2,
            countdown: 1.2,
            launch: 5.0,
            transfer: 7.5,
            capture: 2.4,
        }
    }
}

impl PhaseDurations {
    /// Durations in timeline order.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.idle,
            self.countdown,
            self.launch,
            self.transfer,
            self.capture,
        ]
    }

    /// Seconds from session start until the orbit phase begins.
    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EarthConfig {
    pub radius: f64,
    pub center: Vector3,
}

impl Default for EarthConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            center: [0.0, -50.0, -260.0],
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct MoonConfig {
    pub radius: f64,
    pub center: Vector3,
    /// Target orbit radius as a multiple of the Moon radius.
    pub orbit_radius_ratio: f64,
    /// Angular rate of the parking orbit (rad/s).
    pub orbit_rate_rad_s: f64,
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            radius: 50.0 * 0.273,
            center: [0.0, 0.0, -1200.0],
            orbit_radius_ratio: 1.4,
            orbit_rate_rad_s: 0.45,
        }
    }
}

impl MoonConfig {
    pub fn orbit_radius(&self) -> f64 {
        self.radius * self.orbit_radius_ratio
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Altitude above the pad reached at the end of the launch phase.
    pub apogee: f64,
    /// Resting offset of the rocket along the surface normal.
    pub rest_offset: f64,
    pub vibration_amplitude: f64,
    pub vibration_rate_rad_s: f64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            latitude_deg: 28.60839,
            longitude_deg: -80.60433,
            apogee: 8.5,
            rest_offset: 0.02,
            vibration_amplitude: 0.002,
            vibration_rate_rad_s: 40.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub offset_close: Vector3,
    pub offset_far: Vector3,
    /// Camera-to-rocket distance above which the far offset is used.
    pub far_threshold: f64,
    /// Smooth time of the position damper (seconds).
    pub smooth_time: f64,
    /// Minimum clearance above the Earth surface while near the pad.
    pub horizon_margin: f64,
    /// Clearance the camera-to-rocket sight line must keep from the Earth.
    pub occlusion_safety: f64,
    /// Radial push applied when relocating an occluded camera.
    pub occlusion_push: f64,
    pub initial_fov_deg: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset_close: [1.2, 0.9, 1.5],
            offset_far: [0.6, 0.4, 0.8],
            far_threshold: 400.0,
            smooth_time: 0.25,
            horizon_margin: 0.6,
            occlusion_safety: 0.45,
            occlusion_push: 1.2,
            initial_fov_deg: 50.0,
        }
    }
}

/// Field-of-view controller keeping the rocket near a target on-screen height.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ZoomConfig {
    pub target_screen_height_px: f64,
    pub min_fov_deg: f64,
    pub max_fov_deg: f64,
    /// Fraction of the gap to the target FOV closed per frame.
    pub lerp: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            target_screen_height_px: 220.0,
            min_fov_deg: 32.0,
            max_fov_deg: 58.0,
            lerp: 0.08,
            min_ratio: 0.6,
            max_ratio: 1.6,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RocketConfig {
    /// Radius of the rocket model's bounding sphere in scene units.
    pub bounding_radius: f64,
    /// Orientation slerp rate (per second) in the tangent-following phases.
    pub orientation_slerp_rate: f64,
    /// Published thrust only changes when the target moves by more than this.
    pub thrust_dead_band: f64,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            bounding_radius: 0.14,
            orientation_slerp_rate: 6.0,
            thrust_dead_band: 0.01,
        }
    }
}

impl SceneConfig {
    /// Reject configurations that would produce a degenerate timeline or scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in ["idle", "countdown", "launch", "transfer", "capture"]
            .iter()
            .zip(self.durations.as_array())
        {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidScene(format!(
                    "{name} duration must be positive (got {value})"
                )));
            }
        }
        if !(self.earth.radius > 0.0) || !(self.moon.radius > 0.0) {
            return Err(ConfigError::InvalidScene(
                "body radii must be positive".to_string(),
            ));
        }
        if !(self.moon.orbit_radius_ratio > 0.0) {
            return Err(ConfigError::InvalidScene(
                "orbit radius ratio must be positive".to_string(),
            ));
        }
        if !(self.zoom.min_fov_deg > 0.0) || self.zoom.min_fov_deg > self.zoom.max_fov_deg {
            return Err(ConfigError::InvalidScene(format!(
                "invalid FOV range {}..{}",
                self.zoom.min_fov_deg, self.zoom.max_fov_deg
            )));
        }
        Ok(())
    }
}

/// Contact relay settings: CAPTCHA verifier and transactional mail provider.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ContactConfig {
    pub captcha: CaptchaConfig,
    pub mail: MailConfig,
    /// Remote IP reported to the verifier when no forwarded-for header is present.
    pub fallback_remote_ip: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            captcha: CaptchaConfig::default(),
            mail: MailConfig::default(),
            fallback_remote_ip: "0.0.0.0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CaptchaConfig {
    pub verify_url: String,
    pub secret: String,
    pub site_key: String,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            verify_url: "https://hcaptcha.com/siteverify".to_string(),
            secret: String::new(),
            site_key: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
    pub subject_prefix: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: String::new(),
            from: "ToZeMoon Labs <onboarding@resend.dev>".to_string(),
            to: "contact@tozemoonlabs.com".to_string(),
            subject_prefix: "Nouveau message".to_string(),
        }
    }
}

impl ContactConfig {
    /// Override secrets and addresses from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    /// Override secrets and addresses using `lookup`; empty values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("HCAPTCHA_SECRET") {
            self.captcha.secret = v;
        }
        if let Some(v) = get("HCAPTCHA_SITE_KEY") {
            self.captcha.site_key = v;
        }
        if let Some(v) = get("RESEND_API_KEY") {
            self.mail.api_key = v;
        }
        if let Some(v) = get("RESEND_FROM") {
            self.mail.from = v;
        }
        if let Some(v) = get("RESEND_TO") {
            self.mail.to = v;
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("TOZEMOON_BIND").filter(|v| !v.trim().is_empty()) {
            self.bind = bind;
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid scene configuration: {0}")]
    InvalidScene(String),
}

/// Load a site configuration from a TOML (`.toml`) or YAML file and validate its scene.
pub fn load_site_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = load_record(path)?;
    config.scene.validate()?;
    Ok(config)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
