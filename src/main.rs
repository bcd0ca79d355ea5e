mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use flying_spur::assets::{AssetId, LoadEvent};
use flying_spur::audio::{LogBackend, Sfx};
use flying_spur::config::GameConfig;
use flying_spur::entities::GameStatus;
use flying_spur::game::Game;
use flying_spur::highscores::{FileStore, MemoryStore, ScoreStore};
use flying_spur::input::HeldKeys;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw alternate-screen mode, so logs go to a file.
fn init_logging() {
    let path = std::env::temp_dir().join("flying_spur.log");
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(file) = File::create(&path) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

// ── Asset loader ──────────────────────────────────────────────────────────────

/// Models are built into the binary; the loader still reports them one
/// chunk at a time so the loading screen behaves like a real fetch.
fn spawn_loader(tx: mpsc::Sender<LoadEvent>) {
    thread::spawn(move || {
        const CHUNKS: u64 = 8;
        for asset in AssetId::ALL {
            for loaded in 1..=CHUNKS {
                thread::sleep(Duration::from_millis(25));
                let progress = LoadEvent::Progress { asset, loaded, total: CHUNKS };
                if tx.send(progress).is_err() {
                    return;
                }
            }
            if tx.send(LoadEvent::Loaded(asset)).is_err() {
                return;
            }
        }
    });
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// Input model: `held` records the frame of the last press/repeat for
/// every key.  Thrust is whatever thrust key is still "fresh" this frame,
/// so holding Space reads as a level rather than a stream of presses.
/// A press consumed as a command is released straight away.  Mouse
/// buttons work the same way via `mouse_down`.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    input: &mpsc::Receiver<Event>,
    loads: &mpsc::Receiver<LoadEvent>,
) -> std::io::Result<()> {
    let mut rng = StdRng::from_entropy();

    let mut held = HeldKeys::new();
    let mut mouse_down = false;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Asset loads ───────────────────────────────────────────────────────
        while let Ok(load) = loads.try_recv() {
            game.handle_load(load, &mut rng);
        }

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = input.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        held.press(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Enter | KeyCode::Char(' ')
                                if game.status() == GameStatus::Ready =>
                            {
                                game.start(&mut rng);
                                held.release(code);
                            }
                            KeyCode::Enter | KeyCode::Char('c') | KeyCode::Char('C')
                                if game.status() == GameStatus::LevelUp =>
                            {
                                game.continue_level();
                                held.release(code);
                            }
                            KeyCode::Char('r') | KeyCode::Char('R')
                                if game.status() == GameStatus::GameOver =>
                            {
                                game.start(&mut rng);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        held.press(code, frame);
                    }
                    KeyEventKind::Release => {
                        held.release(code);
                    }
                },
                Event::Mouse(m) => match m.kind {
                    MouseEventKind::Down(_) => mouse_down = true,
                    MouseEventKind::Up(_) => mouse_down = false,
                    _ => {}
                },
                _ => {}
            }
        }

        let thrust = mouse_down || held.thrust(frame);
        game.set_thrust(thrust);

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        game.frame(dt, &mut rng);

        display::render(out, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();

    let mut config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("bad config, using defaults: {}", e);
            GameConfig::default()
        }
    };
    if let Ok(user) = std::env::var("USER") {
        config.session.player_name = user;
    }

    let file_store = FileStore::new(FileStore::default_path());
    let store: Box<dyn ScoreStore> = match file_store.load() {
        Ok(_) => Box::new(file_store),
        Err(e) => {
            warn!("high scores unavailable, keeping them in memory: {}", e);
            Box::new(MemoryStore::new())
        }
    };

    let mut game = Game::new(config, Sfx::new(Box::new(LogBackend)), store);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(event::EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, input) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let (load_tx, loads) = mpsc::channel::<LoadEvent>();
    game.load();
    spawn_loader(load_tx);
    info!("flying spur started");

    let result = game_loop(&mut out, &mut game, &input, &loads);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(event::DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
