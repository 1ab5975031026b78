//! Configuration parsing and management for lumitree

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use lumitree_fx::{TreeParams, VortexParams};

use crate::error::{ConfigError, LumitreeError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scene: SceneConfig,
    pub animation: AnimationConfig,
    pub gesture: GestureConfig,
    pub mediapipe: MediaPipeConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LumitreeError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, LumitreeError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, LumitreeError> {
        let paths = [
            PathBuf::from("lumitree.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LumitreeError> {
        if self.scene.vortex_particles == 0 {
            return Err(ConfigError::invalid(
                "scene.vortex_particles",
                "Particle count must be greater than 0",
            )
            .into());
        }

        if self.scene.trail_length == 0 {
            return Err(ConfigError::invalid(
                "scene.trail_length",
                "Trail length must be greater than 0",
            )
            .into());
        }

        if self.scene.max_memories == Some(0) {
            return Err(ConfigError::invalid(
                "scene.max_memories",
                "Memory cap must be greater than 0 (omit it for no cap)",
            )
            .into());
        }

        let [lo, hi] = self.scene.memory_height_range;
        if lo > hi {
            return Err(ConfigError::invalid(
                "scene.memory_height_range",
                "Lower bound must not exceed upper bound",
            )
            .into());
        }

        for (field, factor) in [
            ("animation.pointer_smoothing", self.animation.pointer_smoothing),
            ("animation.rotation_smoothing", self.animation.rotation_smoothing),
        ] {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(
                    ConfigError::invalid(field, "Smoothing factor must be in (0, 1]").into(),
                );
            }
        }

        if self.animation.fade_in_secs <= 0.0 {
            return Err(ConfigError::invalid(
                "animation.fade_in_secs",
                "Fade-in duration must be positive",
            )
            .into());
        }

        if self.gesture.pinch_threshold <= 0.0 {
            return Err(ConfigError::invalid(
                "gesture.pinch_threshold",
                "Pinch threshold must be positive",
            )
            .into());
        }

        if self.gesture.poll_hz == 0 {
            return Err(ConfigError::invalid(
                "gesture.poll_hz",
                "Polling rate must be greater than 0",
            )
            .into());
        }

        if self.render.fps == 0 {
            return Err(
                ConfigError::invalid("render.fps", "Frame rate must be greater than 0").into(),
            );
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(ConfigError::invalid(
                "render.width/render.height",
                "Viewport dimensions must be greater than 0",
            )
            .into());
        }

        if self.mediapipe.enabled && self.mediapipe.port == 0 {
            return Err(ConfigError::invalid(
                "mediapipe.port",
                "Port must be greater than 0",
            )
            .into());
        }

        if self.mediapipe.enabled && self.mediapipe.auto_launch {
            let path = Path::new(&self.mediapipe.tracker_script);
            if !path.exists() {
                tracing::warn!(
                    "MediaPipe auto_launch enabled but tracker script not found at: {}",
                    self.mediapipe.tracker_script
                );
            }
        }

        Ok(())
    }
}

/// Scene population and placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of ambient vortex particles
    pub vortex_particles: usize,
    pub vortex_inner_radius: f32,
    pub vortex_outer_radius: f32,
    pub vortex_half_height: f32,
    pub vortex_min_angular_velocity: f32,
    pub vortex_max_angular_velocity: f32,
    /// Number of points in the pointer trail
    pub trail_length: usize,
    /// Number of points forming the tree cone
    pub tree_particles: usize,
    pub tree_height: f32,
    pub tree_base_radius: f32,
    /// Radius of the ring memory panels are placed on
    pub memory_ring_radius: f32,
    /// [min, max] height of a newly placed memory panel
    pub memory_height_range: [f32; 2],
    /// Height of a memory panel in scene units (width follows the image aspect)
    pub memory_panel_height: f32,
    /// Evict the oldest panel beyond this many; `None` keeps every panel
    pub max_memories: Option<usize>,
    /// Seed for all scene randomness
    pub seed: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            vortex_particles: 3000,
            vortex_inner_radius: 10.0,
            vortex_outer_radius: 35.0,
            vortex_half_height: 20.0,
            vortex_min_angular_velocity: 0.2,
            vortex_max_angular_velocity: 1.0,
            trail_length: 100,
            tree_particles: 1500,
            tree_height: 24.0,
            tree_base_radius: 9.0,
            memory_ring_radius: 15.0,
            memory_height_range: [-5.0, 5.0],
            memory_panel_height: 4.0,
            max_memories: None,
            seed: 0x5EED_0001,
        }
    }
}

impl SceneConfig {
    pub fn vortex_params(&self) -> VortexParams {
        VortexParams {
            count: self.vortex_particles,
            inner_radius: self.vortex_inner_radius,
            outer_radius: self.vortex_outer_radius,
            half_height: self.vortex_half_height,
            min_angular_velocity: self.vortex_min_angular_velocity,
            max_angular_velocity: self.vortex_max_angular_velocity,
            seed: self.seed,
        }
    }

    pub fn tree_params(&self) -> TreeParams {
        TreeParams {
            count: self.tree_particles,
            height: self.tree_height,
            base_radius: self.tree_base_radius,
            seed: self.seed.rotate_left(7),
            ..Default::default()
        }
    }
}

/// Per-frame animation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Radians per unit of angular velocity per frame
    pub vortex_spin_scale: f32,
    /// Vertical bob amplitude per frame (vortex and memory panels)
    pub bob_amplitude: f32,
    /// Pointer low-pass factor per frame
    pub pointer_smoothing: f32,
    /// Group rotation low-pass factor per frame
    pub rotation_smoothing: f32,
    /// Normalized → scene mapping scale for x and y
    pub pointer_scale: [f32; 2],
    /// Fixed scene depth of the pointer
    pub pointer_depth: f32,
    /// Yaw swing across the full horizontal hand range (radians)
    pub rotation_yaw_range: f32,
    /// Pitch swing across the full vertical hand range (radians)
    pub rotation_pitch_range: f32,
    /// Seconds for a memory panel to fade in
    pub fade_in_secs: f32,
    pub pinch_opacity: f32,
    pub pinch_size: f32,
    pub idle_opacity: f32,
    pub idle_size: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            vortex_spin_scale: 0.01,
            bob_amplitude: 0.01,
            pointer_smoothing: 0.15,
            rotation_smoothing: 0.05,
            pointer_scale: [50.0, 40.0],
            pointer_depth: 10.0,
            rotation_yaw_range: std::f32::consts::PI,
            rotation_pitch_range: 0.5,
            fade_in_secs: 2.0,
            pinch_opacity: 0.8,
            pinch_size: 0.25,
            idle_opacity: 0.4,
            idle_size: 0.12,
        }
    }
}

/// Gesture sampling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Enable the gesture loop
    pub enabled: bool,
    /// Thumb-tip to index-tip distance below which the hand is pinching
    pub pinch_threshold: f32,
    /// Detector polls per second
    pub poll_hz: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pinch_threshold: 0.06,
            poll_hz: 60,
        }
    }
}

/// MediaPipe hand landmarker transport
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaPipeConfig {
    /// Receive hand landmarks from the MediaPipe helper
    pub enabled: bool,
    /// UDP port to receive landmark packets on
    pub port: u16,
    /// Listen address for UDP socket
    pub listen_address: String,
    /// Auto-launch the Python tracker subprocess
    pub auto_launch: bool,
    /// Path to the hand tracker script
    pub tracker_script: String,
    /// Camera device index
    pub camera_device: u32,
    pub capture_width: u32,
    pub capture_height: u32,
    pub capture_fps: u32,
    /// Maximum hands the landmarker reports (only the first is used)
    pub max_hands: u32,
}

impl Default for MediaPipeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 12347,
            listen_address: "127.0.0.1".to_string(),
            auto_launch: false,
            tracker_script: "scripts/hand_tracker.py".to_string(),
            camera_device: 0,
            capture_width: 640,
            capture_height: 480,
            capture_fps: 30,
            max_hands: 1,
        }
    }
}

/// Output viewport, camera and post-processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Render loop rate
    pub fps: u32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub camera_position: [f32; 3],
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
    /// Log a frame summary every this many frames (0 disables)
    pub log_every: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: 60,
            fov_degrees: 45.0,
            camera_position: [0.0, 0.0, 60.0],
            bloom_strength: 1.5,
            bloom_radius: 0.4,
            bloom_threshold: 0.1,
            log_every: 300,
        }
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("lumitree");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/lumitree");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/lumitree");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("lumitree");
        }
    }

    PathBuf::from(".")
}
