//! Per-frame flight model for the player's craft.
//!
//! Speeds are per frame, not per second: the craft gains the same lift
//! every frame regardless of frame length.

use glam::Vec3;

use crate::config::CraftConfig;
use crate::entities::{Craft, GameStatus};

impl Craft {
    /// A craft waiting for its model.  Not ready, parked at the origin.
    pub fn new(config: &CraftConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::new(0.0, 0.0, config.initial_forward_speed),
            roll: 0.0,
            visible: true,
            ready: false,
        }
    }

    /// Called when the model has loaded.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Back to the origin with the initial forward speed.
    pub fn reset(&mut self, config: &CraftConfig) {
        self.position = Vec3::ZERO;
        self.velocity = Vec3::new(0.0, 0.0, config.initial_forward_speed);
        self.visible = true;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Advance one frame.
    ///
    /// `elapsed` is the total time since the clock started; it only drives
    /// the cosmetic roll and the idle bob.  The craft flies while active,
    /// holds still through a level-up pause and bobs on every other screen.
    pub fn update(&mut self, config: &CraftConfig, elapsed: f32, status: GameStatus, thrust: bool) {
        self.roll = (elapsed * config.roll_frequency).sin() * config.roll_amplitude;

        match status {
            GameStatus::Active => {}
            GameStatus::LevelUp => return,
            _ => {
                self.position.y = elapsed.cos() * config.idle_bob;
                return;
            }
        }

        if thrust {
            self.velocity.y += config.lift_step;
        } else {
            self.velocity.y -= config.lift_step;
        }
        self.velocity.z += config.forward_accel;

        // Lift acts along the rolled up-axis; roll is about z so forward
        // motion is unaffected.
        let up = Vec3::new(-self.roll.sin(), self.roll.cos(), 0.0);
        self.position += Vec3::Z * self.velocity.z + up * self.velocity.y;
    }
}
