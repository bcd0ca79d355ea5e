//! Short-lived blast left behind when the craft clips a hazard.
//!
//! Two sequential tweens: a decelerating scale-up, then (after a pause) a
//! linear fade.  The explosion finishes when the fade does.

use glam::Vec3;
use log::debug;

use crate::config::ExplosionConfig;
use crate::tween::{Easing, Tween};

#[derive(Clone, Debug)]
pub struct Explosion {
    position: Vec3,
    scale: Vec3,
    opacity: f32,
    /// Accumulated time; also drives the turbulence in the renderer.
    time: f32,
    grow: Tween,
    fade: Option<Tween>,
    /// When the fade may start.
    fade_at: f32,
    fade_duration: f32,
    active: bool,
}

impl Explosion {
    pub fn new(position: Vec3, config: &ExplosionConfig) -> Self {
        Self {
            position,
            scale: Vec3::splat(config.start_scale),
            opacity: config.start_opacity,
            time: 0.0,
            grow: Tween::new(
                config.start_scale,
                config.target_scale,
                config.scale_duration,
                Easing::OutQuad,
            ),
            fade: None,
            fade_at: config.scale_duration + config.fade_delay,
            fade_duration: config.fade_duration,
            active: true,
        }
    }

    /// Advance by `dt` seconds.  Returns `true` on the frame the explosion
    /// finishes and never again.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.time += dt;

        let s = self.grow.update(dt);
        self.scale = Vec3::splat(s);

        match &mut self.fade {
            Some(fade) => {
                self.opacity = fade.update(dt);
                if fade.is_finished() {
                    return self.complete();
                }
            }
            None => {
                if self.grow.is_finished() && self.time >= self.fade_at {
                    self.fade = Some(Tween::new(
                        self.opacity,
                        0.0,
                        self.fade_duration,
                        Easing::Linear,
                    ));
                }
            }
        }
        false
    }

    /// Finish immediately.  Returns `true` if it was still running.
    pub fn complete(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.fade = None;
        debug!("explosion at {:?} finished after {:.2}s", self.position, self.time);
        true
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}
