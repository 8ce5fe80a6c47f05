//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ESIM_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// View rig and input tuning
    #[serde(default)]
    pub view: ViewConfig,
    /// Depth slider layout
    #[serde(default)]
    pub slider: SliderConfig,
    /// Animation configuration
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Asset locations
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Scene file
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ESIM_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Optional user overrides
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // ESIM_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("ESIM_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Earth Simulation!".to_string(),
            width: 1400,
            height: 1000,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 30.0,
            near: 1.0,
            far: 20000.0,
        }
    }
}

/// View rig and input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rig center [x, y, z] in pixels
    pub center: [f32; 3],
    /// Smallest depth offset
    pub depth_min: f32,
    /// Largest depth offset
    pub depth_max: f32,
    /// Depth change per Minus/Equal key press
    pub depth_step: f32,
    /// Degrees per arrow key press
    pub rotate_step: f32,
    /// Degrees of rotation per pixel dragged
    pub drag_sensitivity: f32,
    /// Depth change per scroll wheel line
    pub scroll_pixels_per_line: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [700.0, 500.0, 0.0],
            depth_min: -1000.0,
            depth_max: 1000.0,
            depth_step: 50.0,
            rotate_step: 10.0,
            drag_sensitivity: 1.0,
            scroll_pixels_per_line: 40.0,
        }
    }
}

/// Depth slider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Show the slider
    pub visible: bool,
    /// Left edge in pixels
    pub x: f32,
    /// Top edge in pixels
    pub y: f32,
    /// Track length in pixels
    pub width: f32,
    /// Value distance between tick marks
    pub major_tick_unit: f32,
    /// Draw tick marks
    pub show_ticks: bool,
    /// Draw the value under each tick mark
    pub show_tick_labels: bool,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            visible: true,
            x: 200.0,
            y: 900.0,
            width: 1000.0,
            major_tick_unit: 250.0,
            show_ticks: true,
            show_tick_labels: true,
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Start with the spin animation paused
    pub start_paused: bool,
    /// Multiplier applied to every spin rate
    pub time_scale: f32,
    /// Longest frame time fed to the animation, in seconds
    pub max_frame_time: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start_paused: false,
            time_scale: 1.0,
            max_frame_time: 0.25,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Clear color [r, g, b, a], seen where the backdrop does not reach
    pub clear_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory that texture paths are relative to
    pub directory: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            directory: "assets".to_string(),
        }
    }
}

impl AssetsConfig {
    /// Resolve an asset-relative path
    pub fn resolve(&self, relative: &str) -> PathBuf {
        Path::new(&self.directory).join(relative)
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RON scene file; the built-in scene is used if it cannot be loaded
    pub path: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "scenes/earth_moon.ron".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.title, "Earth Simulation!");
        assert_eq!((config.window.width, config.window.height), (1400, 1000));
        assert_eq!(config.camera.fov, 30.0);
        assert_eq!(config.view.depth_step, 50.0);
        assert_eq!(config.slider.width, 1000.0);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("major_tick_unit"));
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str("[window]\nwidth = 800\n").unwrap();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 1000);
        assert_eq!(config.view.rotate_step, 10.0);
    }

    #[test]
    fn test_tick_labels_toggle() {
        assert!(AppConfig::default().slider.show_tick_labels);
        let config: AppConfig = toml::from_str("[slider]\nshow_tick_labels = false\n").unwrap();
        assert!(!config.slider.show_tick_labels);
        assert!(config.slider.show_ticks);
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/config").unwrap();
        assert_eq!(config.scene.path, "scenes/earth_moon.ron");
    }

    #[test]
    fn test_resolve_asset() {
        let assets = AssetsConfig { directory: "data".to_string() };
        assert_eq!(assets.resolve("moon.jpg"), Path::new("data").join("moon.jpg"));
    }
}
