//! Game controller: session state, the status machine and per-frame order.
//!
//! Frame order is fixed: timers → craft → obstacle field → camera.  The
//! obstacle field never touches the session directly; it hands back
//! [`FieldEvent`]s which [`Game::apply_event`] turns into score and life
//! changes.

use glam::Vec3;
use log::{error, info, warn};
use rand::Rng;

use crate::assets::{AssetId, LoadEvent, LoadingBar};
use crate::audio::{self, Sfx, SoundOptions};
use crate::config::GameConfig;
use crate::entities::{Camera, Craft, Environment, GameStatus, Session};
use crate::highscores::{HighScore, HighScoreTable, ScoreStore};
use crate::obstacles::{FieldEvent, ObstacleField};
use crate::scheduler::{Deferred, Scheduler};

pub struct Game {
    config: GameConfig,
    status: GameStatus,
    session: Session,
    environment: Environment,
    craft: Craft,
    field: ObstacleField,
    camera: Camera,
    sfx: Sfx,
    scheduler: Scheduler,
    high_scores: HighScoreTable,
    store: Box<dyn ScoreStore>,
    loading: LoadingBar,
    /// Seconds since the simulation clock started.
    elapsed: f32,
    thrust: bool,
    /// Rank of the last recorded score, if it made the table.
    last_rank: Option<usize>,
}

impl Game {
    pub fn new(config: GameConfig, mut sfx: Sfx, store: Box<dyn ScoreStore>) -> Self {
        let capacity = config.session.high_score_capacity;
        let high_scores = match store.load() {
            Ok(entries) => HighScoreTable::from_entries(entries, capacity),
            Err(e) => {
                error!("could not read high scores, starting empty: {}", e);
                HighScoreTable::new(capacity)
            }
        };

        sfx.load(audio::ENGINE, SoundOptions { looped: true, volume: 1.0, positional: true });
        sfx.load(audio::STAR, SoundOptions::default());
        sfx.load(audio::EXPLOSION, SoundOptions::default());
        sfx.load(audio::LEVEL_UP, SoundOptions::default());
        sfx.load(audio::GAME_OVER, SoundOptions::default());

        let craft = Craft::new(&config.craft);
        let field = ObstacleField::new(config.obstacles.clone(), config.explosion.clone());
        let session = Session { score: 0, lives: config.session.starting_lives, tier: 0 };
        let camera = Camera { rig: Vec3::ZERO, target: Vec3::new(0.0, 0.0, config.session.camera_lead) };

        Self {
            config,
            status: GameStatus::Idle,
            session,
            environment: Environment::Sunset,
            craft,
            field,
            camera,
            sfx,
            scheduler: Scheduler::new(),
            high_scores,
            store,
            loading: LoadingBar::new(),
            elapsed: 0.0,
            thrust: false,
            last_rank: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn craft(&self) -> &Craft {
        &self.craft
    }

    pub fn field(&self) -> &ObstacleField {
        &self.field
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn sfx(&self) -> &Sfx {
        &self.sfx
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn loading_bar(&self) -> &LoadingBar {
        &self.loading
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Thrust is a level: true for as long as the button is held.
    pub fn set_thrust(&mut self, held: bool) {
        self.thrust = held;
    }

    pub fn thrust(&self) -> bool {
        self.thrust
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Idle → Loading.  Assets report back through [`Game::handle_load`].
    pub fn load(&mut self) {
        if self.status != GameStatus::Idle {
            warn!("load requested while {:?}", self.status);
            return;
        }
        self.status = GameStatus::Loading;
        self.loading.visible = true;
        info!("loading assets");
    }

    pub fn handle_load(&mut self, event: LoadEvent, rng: &mut impl Rng) {
        match event {
            LoadEvent::Progress { asset, loaded, total } => {
                self.loading.update(asset, loaded, total);
            }
            LoadEvent::Loaded(asset) => {
                self.loading.finish(asset);
                info!("{} loaded", asset.label());
                match asset {
                    AssetId::Craft => self.craft.mark_ready(),
                    AssetId::Collectible => self.field.collectible_loaded(rng),
                    AssetId::Hazard => self.field.hazard_loaded(rng),
                    AssetId::Skybox => {}
                }
            }
            LoadEvent::Failed { asset, reason } => {
                error!("failed to load {}: {}", asset.label(), reason);
            }
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    /// Ready / GameOver → Active with a fresh session.
    pub fn start(&mut self, rng: &mut impl Rng) -> bool {
        if !matches!(self.status, GameStatus::Ready | GameStatus::GameOver) {
            warn!("start ignored while {:?}", self.status);
            return false;
        }
        self.scheduler.invalidate();
        self.session = Session { score: 0, lives: self.config.session.starting_lives, tier: 0 };
        self.environment = Environment::Sunset;
        self.last_rank = None;
        self.craft.reset(&self.config.craft);
        self.field.reset(rng);
        self.status = GameStatus::Active;
        self.sfx.play(audio::ENGINE);
        info!("session started (generation {})", self.scheduler.generation());
        true
    }

    /// LevelUp → Active, keeping score and lives.
    pub fn continue_level(&mut self) -> bool {
        if self.status != GameStatus::LevelUp {
            warn!("continue ignored while {:?}", self.status);
            return false;
        }
        self.status = GameStatus::Active;
        self.sfx.play(audio::ENGINE);
        info!("resuming at tier {}", self.session.tier);
        true
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Advance the whole simulation by `dt` seconds.
    pub fn frame(&mut self, dt: f32, rng: &mut impl Rng) {
        match self.status {
            GameStatus::Idle => return,
            GameStatus::Loading => {
                if self.craft.ready && self.field.is_ready() {
                    self.status = GameStatus::Ready;
                    self.loading.visible = false;
                    info!("assets ready");
                } else {
                    return;
                }
            }
            _ => {}
        }

        self.elapsed += dt;

        for action in self.scheduler.advance(dt) {
            self.fire(action);
        }

        self.craft.update(&self.config.craft, self.elapsed, self.status, self.thrust);

        if self.is_active() {
            let events = self.field.update(self.craft.position, dt, rng);
            for event in events {
                self.apply_event(event);
            }
        } else {
            self.field.advance_effects(dt);
        }

        self.update_camera();
    }

    fn update_camera(&mut self) {
        let pos = self.craft.position;
        self.camera.rig = Vec3::new(pos.x, 0.0, pos.z);
        self.camera.target = pos + Vec3::Z * self.config.session.camera_lead;
    }

    // ── Session mutations ─────────────────────────────────────────────────────

    /// Apply an outcome reported by the obstacle field.
    pub fn apply_event(&mut self, event: FieldEvent) {
        match event {
            FieldEvent::Score(_) => self.inc_score(),
            FieldEvent::LifeLost(_) => self.dec_lives(),
        }
    }

    fn inc_score(&mut self) {
        self.session.score += 1;
        self.sfx.play(audio::STAR);

        let score = self.session.score;
        if let Some(i) = self.config.session.level_thresholds.iter().position(|&t| t == score) {
            let tier = i + 1;
            info!("score {} reached, level {} pending", score, tier);
            self.scheduler.schedule(self.config.session.level_up_delay, Deferred::LevelUp { tier });
        }
    }

    fn dec_lives(&mut self) {
        self.sfx.play(audio::EXPLOSION);
        if self.session.lives == 0 {
            return;
        }
        self.session.lives -= 1;
        if self.session.lives == 0 {
            info!("last life lost, game over pending");
            self.scheduler.schedule(self.config.session.game_over_delay, Deferred::GameOver);
        }
    }

    fn fire(&mut self, action: Deferred) {
        match action {
            Deferred::LevelUp { tier } => {
                if self.status != GameStatus::Active {
                    warn!("dropping level-up to {} while {:?}", tier, self.status);
                    return;
                }
                self.status = GameStatus::LevelUp;
                self.session.tier = tier;
                self.environment = Environment::for_tier(tier);
                self.sfx.stop(audio::ENGINE);
                self.sfx.play(audio::LEVEL_UP);
                info!("level up: tier {} ({:?})", tier, self.environment);
            }
            Deferred::GameOver => self.game_over(),
        }
    }

    fn game_over(&mut self) {
        self.scheduler.invalidate();
        self.status = GameStatus::GameOver;
        self.craft.set_visible(false);
        self.sfx.stop(audio::ENGINE);
        self.sfx.play(audio::GAME_OVER);
        info!("game over with score {}", self.session.score);
        self.record_high_score();
    }

    fn record_high_score(&mut self) {
        let score = self.session.score;
        if !self.high_scores.qualifies(score) {
            return;
        }
        let entry = HighScore { name: self.config.session.player_name.clone(), score };
        self.last_rank = self.high_scores.insert(entry);
        if let Err(e) = self.store.save(self.high_scores.entries()) {
            error!("could not save high scores: {}", e);
        }
    }
}
