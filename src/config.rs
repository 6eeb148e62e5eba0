//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`SHOOTER_SECTION__KEY`)

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Simulation rules and entity geometry
    #[serde(default)]
    pub gameplay: GameplayConfig,
    /// Key bindings
    #[serde(default)]
    pub input: InputConfig,
    /// Terminal front-end settings
    #[serde(default)]
    pub display: DisplayConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
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

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // SHOOTER_GAMEPLAY__INITIAL_LIVES=5 -> gameplay.initial_lives = 5
        figment = figment.merge(Env::prefixed("SHOOTER_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Simulation constants.  Sizes and speeds are in arena pixels, times in
/// wall-clock milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Treated as at least 1
    pub initial_lives: u32,
    pub points_per_kill: u32,
    /// Side of the square player ship
    pub player_size: f32,
    /// Distance moved per tick for each held direction
    pub player_step: f32,
    /// Gap between the ship and the bottom edge at start
    pub player_bottom_margin: f32,
    pub projectile_width: f32,
    pub projectile_height: f32,
    /// Upward distance per tick
    pub projectile_speed: f32,
    /// Horizontal offset of a new projectile from the ship's left edge
    pub projectile_offset_x: f32,
    /// Side of the square enemy
    pub enemy_size: f32,
    /// Downward distance per tick
    pub enemy_speed: f32,
    pub initial_spawn_interval_ms: u64,
    /// Subtracted from the spawn interval after every spawn
    pub spawn_interval_step_ms: u64,
    /// Lowest spawn interval; treated as at least 1 ms
    pub min_spawn_interval_ms: u64,
    pub explosion_size: f32,
    pub explosion_duration_ms: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            points_per_kill: 10,
            player_size: 50.0,
            player_step: 8.0,
            player_bottom_margin: 50.0,
            projectile_width: 6.0,
            projectile_height: 15.0,
            projectile_speed: 10.0,
            projectile_offset_x: 22.0,
            enemy_size: 40.0,
            enemy_speed: 3.0,
            initial_spawn_interval_ms: 1000,
            spawn_interval_step_ms: 10,
            min_spawn_interval_ms: 200,
            explosion_size: 40.0,
            explosion_duration_ms: 500,
        }
    }
}

/// Key bindings, by browser-style key name (`"ArrowLeft"`, `" "`, `"a"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub fire: Vec<String>,
    /// Restarts the game, only while the game-over screen is shown
    pub reset: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            left: keys(&["ArrowLeft", "a"]),
            right: keys(&["ArrowRight", "d"]),
            up: keys(&["ArrowUp", "w"]),
            down: keys(&["ArrowDown", "s"]),
            fire: keys(&[" "]),
            reset: keys(&[" "]),
        }
    }
}

/// Terminal front-end configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frame duration in milliseconds
    pub frame_ms: u64,
    /// Arena pixels covered by one terminal column
    pub cell_width: f32,
    /// Arena pixels covered by one terminal row
    pub cell_height: f32,
    /// Frames a key stays held after its last press/repeat event when the
    /// terminal does not report releases
    pub hold_window_frames: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_ms: 33,
            cell_width: 10.0,
            cell_height: 20.0,
            hold_window_frames: 4,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter, e.g. "info" or "sky_shooter=debug"
    pub log_level: String,
    /// The terminal is in raw mode while playing, so logs go to this file
    pub log_file: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: "sky_shooter.log".to_string(),
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
