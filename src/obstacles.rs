//! The obstacle field: a fixed pool of columns recycled ahead of the craft.
//!
//! Columns are addressed by index and never destroyed.  Each frame the
//! field picks at most one column near the craft, tests its children, and
//! reports what was struck as [`FieldEvent`]s for the controller to apply.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;
use log::debug;
use rand::Rng;

use crate::config::{ExplosionConfig, ObstacleConfig};
use crate::entities::{Column, Obstacle, ObstacleKind, SpawnCursor};
use crate::explosion::Explosion;

/// Local heights of the hazards stacked around the collectible.
const HAZARD_HEIGHTS: [f32; 6] = [7.5, 5.0, 2.5, -2.5, -5.0, -7.5];

// ── Events ────────────────────────────────────────────────────────────────────

/// The craft picked up a collectible.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreEvent {
    pub column: usize,
}

/// The craft clipped a hazard.
#[derive(Clone, Debug, PartialEq)]
pub struct LifeLostEvent {
    pub column: usize,
    /// World position of the struck hazard.
    pub position: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldEvent {
    Score(ScoreEvent),
    LifeLost(LifeLostEvent),
}

// ── Column layout ─────────────────────────────────────────────────────────────

impl Column {
    /// One collectible at the origin with hazards above and below it.
    /// Hazards alternate between tilted and upright.
    pub fn standard() -> Self {
        let mut obstacles = Vec::with_capacity(HAZARD_HEIGHTS.len() + 1);
        obstacles.push(Obstacle {
            kind: ObstacleKind::Collectible,
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            visible: true,
        });
        for (i, &y) in HAZARD_HEIGHTS.iter().enumerate() {
            let tilt = if i % 2 == 0 { -FRAC_PI_2 } else { 0.0 };
            obstacles.push(Obstacle {
                kind: ObstacleKind::Hazard,
                offset: Vec3::new(0.0, y, 0.0),
                rotation: Vec3::new(tilt, 0.0, 0.0),
                visible: true,
            });
        }
        Self { position: Vec3::ZERO, obstacles, hit: false }
    }

    pub fn world_position(&self, index: usize) -> Vec3 {
        self.position + self.obstacles[index].offset
    }

    pub fn collectible_mut(&mut self) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.kind == ObstacleKind::Collectible)
    }
}

// ── Field ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ObstacleField {
    config: ObstacleConfig,
    explosion_config: ExplosionConfig,
    columns: Vec<Column>,
    cursor: SpawnCursor,
    explosions: Vec<Explosion>,
    collectible_loaded: bool,
    hazard_loaded: bool,
}

impl ObstacleField {
    /// An empty field.  The pool is built once both models have loaded.
    pub fn new(config: ObstacleConfig, explosion_config: ExplosionConfig) -> Self {
        let cursor = SpawnCursor { pos: config.spawn_start, offset: config.spawn_offset };
        Self {
            config,
            explosion_config,
            columns: Vec::new(),
            cursor,
            explosions: Vec::new(),
            collectible_loaded: false,
            hazard_loaded: false,
        }
    }

    pub fn collectible_loaded(&mut self, rng: &mut impl Rng) {
        self.collectible_loaded = true;
        self.initialize_if_loaded(rng);
    }

    pub fn hazard_loaded(&mut self, rng: &mut impl Rng) {
        self.hazard_loaded = true;
        self.initialize_if_loaded(rng);
    }

    fn initialize_if_loaded(&mut self, rng: &mut impl Rng) {
        if self.collectible_loaded && self.hazard_loaded && self.columns.is_empty() {
            self.initialize(rng);
        }
    }

    /// Build the pool and lay it out.  Normally triggered by the model
    /// loads; exposed for hosts that have no assets to wait for.
    pub fn initialize(&mut self, rng: &mut impl Rng) {
        self.columns = (0..self.config.column_count).map(|_| Column::standard()).collect();
        self.reset(rng);
        debug!("obstacle pool ready with {} columns", self.columns.len());
    }

    pub fn is_ready(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn cursor(&self) -> SpawnCursor {
        self.cursor
    }

    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    /// Rewind the cursor, relay every column and drop running explosions.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.cursor = SpawnCursor { pos: self.config.spawn_start, offset: self.config.spawn_offset };
        for i in 0..self.columns.len() {
            self.respawn(i, rng);
        }
        for explosion in &mut self.explosions {
            explosion.complete();
        }
        self.explosions.clear();
    }

    /// Move column `index` one pitch past the cursor with a random height.
    pub fn respawn(&mut self, index: usize, rng: &mut impl Rng) {
        self.cursor.pos += self.config.pitch;
        let dy = (rng.gen::<f32>() * 2.0 - 1.0) * self.cursor.offset;
        self.cursor.offset += self.config.offset_growth;

        let column = &mut self.columns[index];
        column.position = Vec3::new(0.0, dy, self.cursor.pos);
        if let Some(star) = column.collectible_mut() {
            star.rotation.y = rng.gen::<f32>() * TAU;
        }
        column.hit = false;
        for obstacle in &mut column.obstacles {
            obstacle.visible = true;
        }
        debug!("column {} respawned at z={:.1} y={:.2}", index, self.cursor.pos, dy);
    }

    /// The column nearest the craft within the collision gate, if any.
    pub fn candidate(&self, craft: Vec3) -> Option<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| (i, (c.position.z - craft.z).abs()))
            .filter(|&(_, dz)| dz < self.config.collision_gate)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// One gameplay frame: spin, recycle, collide, animate explosions.
    pub fn update(&mut self, craft: Vec3, dt: f32, rng: &mut impl Rng) -> Vec<FieldEvent> {
        let mut events = Vec::new();

        for column in &mut self.columns {
            if let Some(star) = column.collectible_mut() {
                star.rotation.y += self.config.collectible_spin;
            }
        }

        let candidate = self.candidate(craft);

        for i in 0..self.columns.len() {
            if self.columns[i].position.z - craft.z < -self.config.recycle_distance {
                self.respawn(i, rng);
            }
        }

        if let Some(ci) = candidate {
            if let Some(event) = self.test_column(ci, craft) {
                events.push(event);
            }
        }

        self.advance_effects(dt);
        events
    }

    /// Strike at most one child of column `ci`.
    fn test_column(&mut self, ci: usize, craft: Vec3) -> Option<FieldEvent> {
        let column = &self.columns[ci];
        if column.hit {
            return None;
        }
        let struck = (0..column.obstacles.len())
            .find(|&oi| column.world_position(oi).distance_squared(craft) < self.config.hit_radius_sq)?;
        self.columns[ci].hit = true;
        Some(self.hit(ci, struck))
    }

    /// Apply the outcome of striking child `oi` of column `ci`.
    pub fn hit(&mut self, ci: usize, oi: usize) -> FieldEvent {
        let position = self.columns[ci].world_position(oi);
        let obstacle = &mut self.columns[ci].obstacles[oi];
        match obstacle.kind {
            ObstacleKind::Collectible => {
                obstacle.visible = false;
                debug!("collectible taken in column {}", ci);
                FieldEvent::Score(ScoreEvent { column: ci })
            }
            ObstacleKind::Hazard => {
                self.explosions.push(Explosion::new(position, &self.explosion_config));
                debug!("hazard hit in column {} at {:?}", ci, position);
                FieldEvent::LifeLost(LifeLostEvent { column: ci, position })
            }
        }
    }

    /// Animate explosions and drop the finished ones.  Runs whether or not
    /// the session is active.  Returns how many finished.
    pub fn advance_effects(&mut self, dt: f32) -> usize {
        let mut finished = 0;
        for explosion in &mut self.explosions {
            if explosion.update(dt) {
                finished += 1;
            }
        }
        self.explosions.retain(Explosion::is_active);
        finished
    }
}
