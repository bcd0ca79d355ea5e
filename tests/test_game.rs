use flying_spur::assets::{AssetId, LoadEvent};
use flying_spur::audio::{self, LogBackend, Sfx};
use flying_spur::config::GameConfig;
use flying_spur::entities::{Environment, GameStatus};
use flying_spur::game::Game;
use flying_spur::highscores::{FileStore, MemoryStore, ScoreStore};
use flying_spur::obstacles::{FieldEvent, LifeLostEvent, ScoreEvent};

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

// dt = 0.25 keeps the scheduler clock exact in f32.
const DT: f32 = 0.25;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn new_game(config: GameConfig, store: Box<dyn ScoreStore>) -> Game {
    Game::new(config, Sfx::new(Box::new(LogBackend)), store)
}

fn load_all(game: &mut Game, rng: &mut StdRng) {
    game.load();
    for asset in AssetId::ALL {
        game.handle_load(LoadEvent::Loaded(asset), rng);
    }
    game.frame(DT, rng);
}

fn ready_game(rng: &mut StdRng) -> Game {
    let mut game = new_game(GameConfig::default(), Box::new(MemoryStore::new()));
    load_all(&mut game, rng);
    assert_eq!(game.status(), GameStatus::Ready);
    game
}

fn score(game: &mut Game, n: u32) {
    for _ in 0..n {
        game.apply_event(FieldEvent::Score(ScoreEvent { column: 0 }));
    }
}

fn lose_life(game: &mut Game) {
    game.apply_event(FieldEvent::LifeLost(LifeLostEvent { column: 0, position: Vec3::ZERO }));
}

fn run(game: &mut Game, rng: &mut StdRng, frames: usize) {
    for _ in 0..frames {
        game.frame(DT, rng);
    }
}

// ── loading ───────────────────────────────────────────────────────────────────

#[test]
fn idle_frames_do_nothing() {
    let mut rng = seeded_rng();
    let mut game = new_game(GameConfig::default(), Box::new(MemoryStore::new()));
    game.frame(DT, &mut rng);
    assert_eq!(game.status(), GameStatus::Idle);
    assert_eq!(game.elapsed(), 0.0);
}

#[test]
fn loading_waits_for_craft_and_field() {
    let mut rng = seeded_rng();
    let mut game = new_game(GameConfig::default(), Box::new(MemoryStore::new()));
    game.load();
    assert!(game.loading_bar().visible);

    game.handle_load(LoadEvent::Loaded(AssetId::Craft), &mut rng);
    game.handle_load(LoadEvent::Loaded(AssetId::Collectible), &mut rng);
    game.frame(DT, &mut rng);
    assert_eq!(game.status(), GameStatus::Loading);

    game.handle_load(LoadEvent::Loaded(AssetId::Hazard), &mut rng);
    game.frame(DT, &mut rng);
    assert_eq!(game.status(), GameStatus::Ready);
    assert!(!game.loading_bar().visible);
}

#[test]
fn failed_load_stalls_without_crashing() {
    let mut rng = seeded_rng();
    let mut game = new_game(GameConfig::default(), Box::new(MemoryStore::new()));
    game.load();
    game.handle_load(LoadEvent::Loaded(AssetId::Craft), &mut rng);
    game.handle_load(LoadEvent::Loaded(AssetId::Collectible), &mut rng);
    game.handle_load(
        LoadEvent::Failed { asset: AssetId::Hazard, reason: "404".to_string() },
        &mut rng,
    );
    run(&mut game, &mut rng, 10);
    assert_eq!(game.status(), GameStatus::Loading);
}

#[test]
fn progress_feeds_the_loading_bar() {
    let mut rng = seeded_rng();
    let mut game = new_game(GameConfig::default(), Box::new(MemoryStore::new()));
    game.load();
    game.handle_load(LoadEvent::Progress { asset: AssetId::Craft, loaded: 1, total: 4 }, &mut rng);
    game.handle_load(LoadEvent::Progress { asset: AssetId::Hazard, loaded: 3, total: 4 }, &mut rng);
    assert!((game.loading_bar().fraction() - 0.5).abs() < 1e-6);
}

// ── start ─────────────────────────────────────────────────────────────────────

#[test]
fn start_begins_a_fresh_session() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    assert!(game.start(&mut rng));

    assert_eq!(game.status(), GameStatus::Active);
    assert_eq!(game.session().score, 0);
    assert_eq!(game.session().lives, 3);
    assert_eq!(game.craft().position, Vec3::ZERO);
    assert_eq!(game.field().columns()[0].position.z, 50.0);
    assert!(game.sfx().is_playing(audio::ENGINE));
}

#[test]
fn start_is_refused_while_loading() {
    let mut rng = seeded_rng();
    let mut game = new_game(GameConfig::default(), Box::new(MemoryStore::new()));
    game.load();
    assert!(!game.start(&mut rng));
    assert_eq!(game.status(), GameStatus::Loading);
}

#[test]
fn start_is_refused_mid_flight() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    score(&mut game, 3);
    assert!(!game.start(&mut rng));
    assert_eq!(game.session().score, 3);
}

// ── per-frame order ───────────────────────────────────────────────────────────

#[test]
fn menu_craft_bobs_in_place() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    run(&mut game, &mut rng, 4);
    let t = game.elapsed();
    assert!((game.craft().position.y - t.cos() * 1.5).abs() < 1e-5);
    assert_eq!(game.craft().position.z, 0.0);
}

#[test]
fn thrust_lifts_the_craft() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    game.set_thrust(true);
    run(&mut game, &mut rng, 10);
    assert!(game.craft().velocity.y > 0.0);
    assert!(game.craft().position.z > 0.0);
}

#[test]
fn camera_trails_at_ground_level() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    game.set_thrust(true);
    run(&mut game, &mut rng, 20);

    let craft = game.craft().position;
    let camera = game.camera();
    assert_eq!(camera.rig.y, 0.0);
    assert_eq!(camera.rig.z, craft.z);
    assert_eq!(camera.target, craft + Vec3::new(0.0, 0.0, 6.0));
}

// ── score / lives ─────────────────────────────────────────────────────────────

#[test]
fn score_events_increment_score() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    score(&mut game, 4);
    assert_eq!(game.session().score, 4);
    assert_eq!(game.scheduler().pending(), 0);
}

#[test]
fn threshold_schedules_level_up() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    score(&mut game, 10);
    assert_eq!(game.scheduler().pending(), 1);
    assert_eq!(game.status(), GameStatus::Active);

    run(&mut game, &mut rng, 3);
    assert_eq!(game.status(), GameStatus::LevelUp);
    assert_eq!(game.session().tier, 1);
    assert_eq!(game.environment(), Environment::Dusk);
    assert!(!game.sfx().is_playing(audio::ENGINE));
}

#[test]
fn continue_keeps_score_and_lives() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    lose_life(&mut game);
    score(&mut game, 10);
    run(&mut game, &mut rng, 3);

    assert!(game.continue_level());
    assert_eq!(game.status(), GameStatus::Active);
    assert_eq!(game.session().score, 10);
    assert_eq!(game.session().lives, 2);
    assert!(game.sfx().is_playing(audio::ENGINE));

    // Second threshold
    score(&mut game, 20);
    run(&mut game, &mut rng, 3);
    assert_eq!(game.status(), GameStatus::LevelUp);
    assert_eq!(game.session().tier, 2);
    assert_eq!(game.environment(), Environment::Night);
}

#[test]
fn continue_is_refused_outside_level_up() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    assert!(!game.continue_level());
}

#[test]
fn level_up_pause_holds_the_craft_in_place() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    game.set_thrust(true);
    run(&mut game, &mut rng, 40);
    assert!(game.craft().position.y > 0.5);

    score(&mut game, 10);
    run(&mut game, &mut rng, 1);
    assert_eq!(game.status(), GameStatus::Active);
    let position = game.craft().position;
    let velocity = game.craft().velocity;

    // Level-up fires before the craft moves on this frame
    run(&mut game, &mut rng, 1);
    assert_eq!(game.status(), GameStatus::LevelUp);
    assert_eq!(game.craft().position, position);

    run(&mut game, &mut rng, 8);
    assert_eq!(game.craft().position, position);
    assert_eq!(game.craft().velocity, velocity);

    assert!(game.continue_level());
    assert_eq!(game.craft().position, position);
    assert_eq!(game.craft().velocity, velocity);
}

#[test]
fn last_life_schedules_game_over() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    lose_life(&mut game);
    lose_life(&mut game);
    assert_eq!(game.scheduler().pending(), 0);
    lose_life(&mut game);
    assert_eq!(game.session().lives, 0);
    assert_eq!(game.scheduler().pending(), 1);

    // 1.2 s delay: still flying after 1.0 s
    run(&mut game, &mut rng, 4);
    assert_eq!(game.status(), GameStatus::Active);
    run(&mut game, &mut rng, 1);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert!(!game.craft().visible);
    assert!(!game.sfx().is_playing(audio::ENGINE));
}

#[test]
fn extra_hits_while_game_over_pending_are_absorbed() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    for _ in 0..5 {
        lose_life(&mut game);
    }
    assert_eq!(game.session().lives, 0);
    assert_eq!(game.scheduler().pending(), 1);
}

#[test]
fn restart_after_game_over() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    score(&mut game, 2);
    for _ in 0..3 {
        lose_life(&mut game);
    }
    run(&mut game, &mut rng, 5);
    assert_eq!(game.status(), GameStatus::GameOver);

    assert!(game.start(&mut rng));
    assert_eq!(game.session().score, 0);
    assert_eq!(game.session().lives, 3);
    assert!(game.craft().visible);
    assert_eq!(game.environment(), Environment::Sunset);
    assert_eq!(game.last_rank(), None);
}

#[test]
fn stale_level_up_never_reaches_the_next_session() {
    let mut rng = seeded_rng();
    let mut config = GameConfig::default();
    config.session.level_up_delay = 5.0;
    let mut game = new_game(config, Box::new(MemoryStore::new()));
    load_all(&mut game, &mut rng);
    game.start(&mut rng);

    score(&mut game, 10);
    for _ in 0..3 {
        lose_life(&mut game);
    }
    run(&mut game, &mut rng, 5);
    assert_eq!(game.status(), GameStatus::GameOver);

    game.start(&mut rng);
    run(&mut game, &mut rng, 30);
    assert_eq!(game.status(), GameStatus::Active);
    assert_eq!(game.session().tier, 0);
}

// ── high scores ───────────────────────────────────────────────────────────────

#[test]
fn qualifying_score_is_recorded_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.json");
    let mut rng = seeded_rng();
    let mut config = GameConfig::default();
    config.session.player_name = "ace".to_string();
    let mut game = new_game(config, Box::new(FileStore::new(&path)));
    load_all(&mut game, &mut rng);

    game.start(&mut rng);
    score(&mut game, 7);
    for _ in 0..3 {
        lose_life(&mut game);
    }
    run(&mut game, &mut rng, 5);

    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.last_rank(), Some(0));
    assert_eq!(game.high_scores().best(), 7);

    let saved = FileStore::new(&path).load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "ace");
    assert_eq!(saved[0].score, 7);
}

#[test]
fn zero_score_is_not_recorded() {
    let mut rng = seeded_rng();
    let mut game = ready_game(&mut rng);
    game.start(&mut rng);
    for _ in 0..3 {
        lose_life(&mut game);
    }
    run(&mut game, &mut rng, 5);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.last_rank(), None);
    assert!(game.high_scores().entries().is_empty());
}

#[test]
fn stored_scores_are_loaded_on_startup() {
    use flying_spur::highscores::HighScore;
    let store = MemoryStore::with_entries(vec![
        HighScore { name: "b".to_string(), score: 3 },
        HighScore { name: "a".to_string(), score: 9 },
    ]);
    let game = new_game(GameConfig::default(), Box::new(store));
    assert_eq!(game.high_scores().best(), 9);
    assert_eq!(game.high_scores().entries().len(), 2);
}

// ── field → session ───────────────────────────────────────────────────────────

#[test]
fn flying_through_a_star_scores_once() {
    let mut rng = seeded_rng();
    let mut config = GameConfig::default();
    // One column laid out right on the craft's start point
    config.obstacles.column_count = 1;
    config.obstacles.spawn_start = -30.0;
    config.obstacles.spawn_offset = 0.0;
    let mut game = new_game(config, Box::new(MemoryStore::new()));
    load_all(&mut game, &mut rng);
    game.start(&mut rng);
    assert_eq!(game.field().columns()[0].position.z, 0.0);

    game.frame(1.0 / 60.0, &mut rng);
    assert_eq!(game.session().score, 1);
    assert!(game.field().columns()[0].hit);

    run(&mut game, &mut rng, 2);
    assert_eq!(game.session().score, 1);
    assert_eq!(game.session().lives, 3);
}

#[test]
fn explosions_keep_animating_after_game_over() {
    let mut rng = seeded_rng();
    let mut config = GameConfig::default();
    config.obstacles.column_count = 1;
    config.obstacles.spawn_start = -30.0;
    config.obstacles.spawn_offset = 0.0;
    // One heavy drop on the first frame puts the craft on the hazard
    // just below the star.
    config.craft.lift_step = 3.0;
    config.session.starting_lives = 1;
    let mut game = new_game(config, Box::new(MemoryStore::new()));
    load_all(&mut game, &mut rng);
    game.start(&mut rng);

    game.frame(1.0 / 60.0, &mut rng);
    assert_eq!(game.session().score, 0);
    assert_eq!(game.session().lives, 0);
    assert_eq!(game.field().explosions().len(), 1);

    run(&mut game, &mut rng, 5);
    assert_eq!(game.status(), GameStatus::GameOver);
    assert_eq!(game.field().explosions().len(), 1);

    let before = game.field().explosions()[0].time();
    run(&mut game, &mut rng, 1);
    assert!(game.field().explosions()[0].time() > before);

    run(&mut game, &mut rng, 16);
    assert!(game.field().explosions().is_empty());
}
