use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup configuration errors. Nothing inside the frame loop can fail;
/// everything that can is checked here before the loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid viewer config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Complete viewer configuration.
/// Every section falls back to the reference scene when omitted, so an
/// empty JSON object is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub orbit: OrbitConfig,
    pub lighting: LightingConfig,
    pub uniforms: UniformNames,
    pub assets: AssetPaths,
    pub bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Planets".to_string(),
        }
    }
}

/// Free-fly camera settings. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub world_up: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Degrees of rotation per pointer unit.
    pub sensitivity: f32,
    /// Initial field of view.
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Pitch is clamped to `[-pitch_limit, pitch_limit]`.
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 2.5,
            sensitivity: 0.1,
            zoom: 45.0,
            min_zoom: 1.0,
            max_zoom: 45.0,
            pitch_limit: 89.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 100.0,
        }
    }
}

/// How the phase angle advances while the orbit animation is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhasePolicy {
    /// Add `step` radians each time `interval` seconds of real time have
    /// accumulated. At most one step per frame.
    Threshold { interval: f32, step: f32 },
    /// Add `rate * delta_time` radians every frame.
    Continuous { rate: f32 },
}

impl Default for PhasePolicy {
    fn default() -> Self {
        PhasePolicy::Threshold {
            interval: 1.0 / 65.0,
            step: 0.001,
        }
    }
}

/// Fixed layout and motion parameters of the three-body scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// World offset of the sun. Also the light position.
    pub sun_offset: [f32; 3],
    pub earth_radius: f32,
    pub moon_radius: f32,
    /// Earth orbits at this multiple of the phase angle.
    pub earth_orbit_rate: f32,
    /// Earth spins about the vertical axis at this multiple of the phase angle.
    pub earth_spin_rate: f32,
    pub policy: PhasePolicy,
    /// Whether the animation runs before the first toggle.
    pub start_active: bool,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            sun_offset: [0.0, 0.0, -60.0],
            earth_radius: 30.0,
            moon_radius: 20.0,
            earth_orbit_rate: 5.0,
            earth_spin_rate: 30.0,
            policy: PhasePolicy::default(),
            start_active: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Emissive color of the sun (HDR, may exceed 1.0).
    pub sun_color: [f32; 4],
    pub light_color: [f32; 3],
    pub clear_color: [f32; 4],
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun_color: [1.8, 1.5, 1.0, 1.0],
            light_color: [1.0, 1.0, 1.0],
            clear_color: [0.01, 0.01, 0.01, 1.0],
        }
    }
}

/// Uniform names shared with the host's shader programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformNames {
    pub projection: String,
    pub view: String,
    pub model: String,
    pub normal_matrix: String,
    pub light_pos: String,
    pub light_color: String,
    pub view_pos: String,
    pub color: String,
    /// Sampler of the lit-body program and the texture unit bound to it.
    pub lit_sampler: String,
    pub lit_texture_unit: i32,
    /// Sampler of the light-source program and the texture unit bound to it.
    pub light_sampler: String,
    pub light_texture_unit: i32,
}

impl Default for UniformNames {
    fn default() -> Self {
        Self {
            projection: "projection".to_string(),
            view: "view".to_string(),
            model: "model".to_string(),
            normal_matrix: "InvTransModel".to_string(),
            light_pos: "lightPos".to_string(),
            light_color: "lightColor".to_string(),
            view_pos: "viewPos".to_string(),
            color: "color".to_string(),
            lit_sampler: "texture0".to_string(),
            lit_texture_unit: 0,
            light_sampler: "texture1".to_string(),
            light_texture_unit: 1,
        }
    }
}

/// Shader and model files the host loads before the loop starts.
/// The engine never opens them; they travel with the config so one file
/// describes a whole scene variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub lit_vertex_shader: String,
    pub lit_fragment_shader: String,
    pub light_vertex_shader: String,
    pub light_fragment_shader: String,
    pub sun_model: String,
    pub earth_model: String,
    pub moon_model: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            lit_vertex_shader: "shaders/planets.vs".to_string(),
            lit_fragment_shader: "shaders/planets.fs".to_string(),
            light_vertex_shader: "shaders/planets.vs".to_string(),
            light_fragment_shader: "shaders/lighting.fs".to_string(),
            sun_model: "models/planet/planet.obj".to_string(),
            earth_model: "models/earth/Model/Globe.obj".to_string(),
            moon_model: "models/rock/rock.obj".to_string(),
        }
    }
}

/// Key codes (DOM `keyCode` values) for the viewer's controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: u32,
    pub backward: u32,
    pub left: u32,
    pub right: u32,
    pub toggle_orbit: u32,
    pub quit: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: 87,
            backward: 83,
            left: 65,
            right: 68,
            toggle_orbit: 32,
            quit: 27,
        }
    }
}

impl ViewerConfig {
    /// Reference scene with continuous phase advance instead of
    /// threshold stepping. The rate matches the threshold preset's average.
    pub fn continuous() -> Self {
        let mut config = Self::default();
        config.orbit.policy = PhasePolicy::Continuous { rate: 0.065 };
        config
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON (used to hand the effective config to hosts).
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the frame loop cannot absorb by clamping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }
        fn non_negative(v: f32) -> bool {
            v >= 0.0 && v.is_finite()
        }

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window", "size must be non-zero");
        }
        let cam = &self.camera;
        if !(cam.min_zoom > 0.0) {
            return invalid("camera.min_zoom", "must be positive");
        }
        if !(cam.min_zoom <= cam.max_zoom && cam.max_zoom < 180.0) {
            return invalid("camera.max_zoom", "must lie in [min_zoom, 180)");
        }
        if !(cam.pitch_limit > 0.0 && cam.pitch_limit < 90.0) {
            return invalid("camera.pitch_limit", "must lie in (0, 90)");
        }
        if cam.world_up == [0.0, 0.0, 0.0] {
            return invalid("camera.world_up", "must be non-zero");
        }
        if !(self.projection.near > 0.0) {
            return invalid("projection.near", "must be positive");
        }
        if !(self.projection.far > self.projection.near) {
            return invalid("projection.far", "must exceed near");
        }
        // The phase angle only ever grows while active.
        match self.orbit.policy {
            PhasePolicy::Threshold { interval, .. } if !(interval > 0.0 && interval.is_finite()) =>
            {
                invalid("orbit.policy.interval", "must be positive and finite")
            }
            PhasePolicy::Threshold { step, .. } if !non_negative(step) => {
                invalid("orbit.policy.step", "must be non-negative and finite")
            }
            PhasePolicy::Continuous { rate } if !non_negative(rate) => {
                invalid("orbit.policy.rate", "must be non-negative and finite")
            }
            _ => Ok(()),
        }
    }
}
