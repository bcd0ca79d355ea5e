//! Tuning tables.
//!
//! Every gameplay constant lives here so a RON file can override any of
//! them.  Fields missing from the file keep their defaults.

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::Result;

/// Environment variable naming an optional RON config file.
pub const CONFIG_ENV: &str = "FLYING_SPUR_CONFIG";

// ── Craft ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CraftConfig {
    /// Forward speed after every reset (units per frame).
    pub initial_forward_speed: f32,
    /// Vertical speed change per frame, up with thrust and down without.
    pub lift_step: f32,
    /// Forward speed gained every active frame.
    pub forward_accel: f32,
    pub roll_amplitude: f32,
    pub roll_frequency: f32,
    /// Height of the idle bob shown on the menu.
    pub idle_bob: f32,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            initial_forward_speed: 0.1,
            lift_step: 0.001,
            forward_accel: 0.0001,
            roll_amplitude: 0.2,
            roll_frequency: 3.0,
            idle_bob: 1.5,
        }
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObstacleConfig {
    pub column_count: usize,
    /// Cursor position before the first respawn of a session.
    pub spawn_start: f32,
    /// Vertical randomisation envelope before the first respawn.
    pub spawn_offset: f32,
    /// Forward distance between consecutive columns.
    pub pitch: f32,
    /// Envelope growth per respawn.
    pub offset_growth: f32,
    /// Collectible spin per frame (radians).
    pub collectible_spin: f32,
    /// Columns closer than this (forward distance) are collision candidates.
    pub collision_gate: f32,
    /// Columns this far behind the craft are recycled.
    pub recycle_distance: f32,
    /// Squared distance under which a child counts as struck.
    pub hit_radius_sq: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            column_count: 4,
            spawn_start: 20.0,
            spawn_offset: 5.0,
            pitch: 30.0,
            offset_growth: 0.2,
            collectible_spin: 0.01,
            collision_gate: 2.0,
            recycle_distance: 20.0,
            hit_radius_sq: 5.0,
        }
    }
}

// ── Explosion ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplosionConfig {
    pub start_scale: f32,
    pub target_scale: f32,
    pub scale_duration: f32,
    /// Extra time after the scale-up before the fade begins.
    pub fade_delay: f32,
    pub fade_duration: f32,
    pub start_opacity: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            start_scale: 0.05,
            target_scale: 0.2,
            scale_duration: 1.5,
            fade_delay: 1.0,
            fade_duration: 0.5,
            start_opacity: 0.6,
        }
    }
}

// ── Session / controller ──────────────────────────────────────────────────────

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub starting_lives: u32,
    /// Scores that trigger a level-up, ascending.
    pub level_thresholds: Vec<u32>,
    /// Seconds between crossing a threshold and the level-up pause.
    pub level_up_delay: f32,
    /// Seconds between losing the last life and the game-over screen.
    pub game_over_delay: f32,
    /// How far ahead of the craft the camera looks.
    pub camera_lead: f32,
    pub high_score_capacity: usize,
    /// Name recorded in the high score table.
    pub player_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            level_thresholds: vec![10, 30],
            level_up_delay: 0.5,
            game_over_delay: 1.2,
            camera_lead: 6.0,
            high_score_capacity: 10,
            player_name: "pilot".to_string(),
        }
    }
}

// ── Root ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub craft: CraftConfig,
    pub obstacles: ObstacleConfig,
    pub explosion: ExplosionConfig,
    pub session: SessionConfig,
}

impl GameConfig {
    /// Parse a RON document.  Omitted sections and fields fall back to
    /// their defaults.
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Load from `path`.  A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                info!("loading config from {}", path.display());
                Self::from_ron(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the file named by `FLYING_SPUR_CONFIG`, if set.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
