//! Game entity types. Pure data, no logic.
//!
//! Behaviour lives in the component modules (`craft`, `obstacles`,
//! `explosion`, `game`); this file only describes shapes.

use glam::Vec3;

// ── Status ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Nothing requested yet.
    Idle,
    /// Waiting for the craft and obstacle models.
    Loading,
    /// Menu: craft idles, waiting for a start command.
    Ready,
    Active,
    /// Paused between tiers, waiting for a continue command.
    LevelUp,
    GameOver,
}

/// Background shown behind the tunnel.  One per level tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Sunset,
    Dusk,
    Night,
}

impl Environment {
    pub fn for_tier(tier: usize) -> Self {
        match tier {
            0 => Environment::Sunset,
            1 => Environment::Dusk,
            _ => Environment::Night,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub score: u32,
    pub lives: u32,
    /// Number of level thresholds crossed so far.
    pub tier: usize,
}

// ── Craft ─────────────────────────────────────────────────────────────────────

/// The player's flyer.
#[derive(Clone, Debug)]
pub struct Craft {
    pub position: Vec3,
    /// Only `y` (lift) and `z` (forward) are driven.
    pub velocity: Vec3,
    /// Cosmetic roll about the forward axis (radians).
    pub roll: f32,
    pub visible: bool,
    /// Set once the craft model has loaded.
    pub ready: bool,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Star: worth a point.
    Collectible,
    /// Bomb: costs a life.
    Hazard,
}

/// One member of a column, positioned relative to the column origin.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub offset: Vec3,
    /// Euler angles (x, y, z); purely cosmetic.
    pub rotation: Vec3,
    pub visible: bool,
}

/// A rigid group of one collectible and several hazards stacked vertically.
#[derive(Clone, Debug)]
pub struct Column {
    pub position: Vec3,
    pub obstacles: Vec<Obstacle>,
    /// Set on the first hit of a pass; cleared on respawn.
    pub hit: bool,
}

/// Where the next recycled column goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnCursor {
    /// Forward distance of the most recently placed column.
    pub pos: f32,
    /// Half-width of the vertical randomisation envelope.
    pub offset: f32,
}

// ── Camera ────────────────────────────────────────────────────────────────────

/// Chase camera: the rig trails the craft at ground level and looks a
/// little ahead of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub rig: Vec3,
    pub target: Vec3,
}
