/// Rendering layer. All terminal I/O lives here.
///
/// Side view of the tunnel: screen columns are world forward (z), screen
/// rows are world up (y).  Each function receives a mutable writer and an
/// immutable view of the game; nothing here changes the simulation.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use flying_spur::entities::{Environment, GameStatus, ObstacleKind};
use flying_spur::game::Game;
use glam::Vec3;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_CRAFT: Color = Color::White;
const C_COLLECTIBLE: Color = Color::Yellow;
const C_HAZARD: Color = Color::DarkRed;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;

// ── View ──────────────────────────────────────────────────────────────────────

/// World units visible behind the camera rig.
const VIEW_BEHIND: f32 = 8.0;
/// Screen columns per world unit along z.
const X_SCALE: f32 = 1.0;
/// World units from the centre line to the top (and bottom) of the view.
const VIEW_HALF_HEIGHT: f32 = 12.0;

/// Maps world positions to terminal cells for one frame.
struct Viewport {
    origin_z: f32,
    top: u16,
    bottom: u16,
    width: u16,
}

impl Viewport {
    fn new(game: &Game, width: u16, height: u16) -> Self {
        Self {
            origin_z: game.camera().rig.z - VIEW_BEHIND,
            top: 2,
            bottom: height.saturating_sub(3),
            width,
        }
    }

    /// Cell for a world position, or `None` when off screen.
    fn project(&self, p: Vec3) -> Option<(u16, u16)> {
        let col = 1.0 + (p.z - self.origin_z) * X_SCALE;
        let centre = (self.top + self.bottom) as f32 / 2.0;
        let half = self.bottom.saturating_sub(self.top) as f32 / 2.0;
        let row = centre - p.y / VIEW_HALF_HEIGHT * half;
        if col < 1.0 || col >= self.width.saturating_sub(1) as f32 {
            return None;
        }
        if row < self.top as f32 || row > self.bottom as f32 {
            return None;
        }
        Some((col as u16, row.round() as u16))
    }
}

fn border_color(env: Environment) -> Color {
    match env {
        Environment::Sunset => Color::DarkYellow,
        Environment::Dusk => Color::Magenta,
        Environment::Night => Color::DarkBlue,
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match game.status() {
        GameStatus::Idle | GameStatus::Loading => draw_loading(out, game, width, height)?,
        status => {
            let view = Viewport::new(game, width, height);
            draw_border(out, game, width, height)?;
            draw_columns(out, game, &view)?;
            draw_explosions(out, game, &view)?;
            draw_craft(out, game, &view)?;
            draw_hud(out, game, width)?;
            draw_controls_hint(out, game, height)?;

            match status {
                GameStatus::Ready => draw_menu(out, game, width, height)?,
                GameStatus::LevelUp => draw_level_up(out, game, width, height)?,
                GameStatus::GameOver => draw_game_over(out, game, width, height)?,
                _ => {}
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Loading ───────────────────────────────────────────────────────────────────

fn draw_loading<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let bar = game.loading_bar();
    let bar_width = (width as usize).saturating_sub(20).clamp(10, 50);
    let filled = (bar.fraction() * bar_width as f32).round() as usize;
    let cx = width / 2;
    let cy = height / 2;

    let line = format!("[{}{}]", "█".repeat(filled), "·".repeat(bar_width - filled.min(bar_width)));
    out.queue(cursor::MoveTo(cx.saturating_sub(line.chars().count() as u16 / 2), cy))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(&line))?;

    for (i, (asset, loaded, total)) in bar.entries().enumerate() {
        let label = format!("{:<6} {:>6}/{:<6}", asset.label(), loaded, total);
        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 2 + i as u16))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(label))?;
    }
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;
    out.queue(style::SetForegroundColor(border_color(game.environment())))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game, width: u16) -> std::io::Result<()> {
    let session = game.session();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    let best = game.high_scores().best();
    if best > 0 {
        out.queue(Print(format!("Stars:{:>4}  Best:{:>4}", session.score, best)))?;
    } else {
        out.queue(Print(format!("Stars:{:>4}", session.score)))?;
    }

    let level_str = format!("[ LEVEL {} ]", session.tier + 1);
    let lx = (width / 2).saturating_sub(level_str.len() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(border_color(game.environment())))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Lives:{}", "♥".repeat(session.lives as usize));
    let rx = width.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_columns<W: Write>(out: &mut W, game: &Game, view: &Viewport) -> std::io::Result<()> {
    for column in game.field().columns() {
        for (i, obstacle) in column.obstacles.iter().enumerate() {
            if !obstacle.visible {
                continue;
            }
            let Some((x, y)) = view.project(column.world_position(i)) else {
                continue;
            };
            out.queue(cursor::MoveTo(x, y))?;
            match obstacle.kind {
                ObstacleKind::Collectible => {
                    // Spin shows as a twinkle
                    let glyph = if obstacle.rotation.y.sin() > 0.0 { "★" } else { "☆" };
                    out.queue(style::SetForegroundColor(C_COLLECTIBLE))?;
                    out.queue(Print(glyph))?;
                }
                ObstacleKind::Hazard => {
                    out.queue(style::SetForegroundColor(C_HAZARD))?;
                    out.queue(Print("●"))?;
                }
            }
        }
    }
    Ok(())
}

fn draw_explosions<W: Write>(out: &mut W, game: &Game, view: &Viewport) -> std::io::Result<()> {
    for explosion in game.field().explosions() {
        let Some((x, y)) = view.project(explosion.position()) else {
            continue;
        };
        // Scale 0.05..0.2 → radius 0..3 cells
        let radius = ((explosion.scale().x - 0.05) * 20.0).round().max(0.0) as i32;
        let color = match explosion.opacity() {
            o if o > 0.4 => Color::Yellow,
            o if o > 0.2 => Color::Red,
            _ => Color::DarkRed,
        };
        // Shimmer driven by the explosion's own clock
        let glyph = if (explosion.time() * 12.0) as i32 % 2 == 0 { "*" } else { "✶" };
        out.queue(style::SetForegroundColor(color))?;
        for dy in -radius..=radius {
            for dx in -radius * 2..=radius * 2 {
                if dx * dx / 4 + dy * dy > radius * radius {
                    continue;
                }
                let cx = x as i32 + dx;
                let cy = y as i32 + dy;
                if cx < 1 || cx >= view.width as i32 - 1 || cy < view.top as i32 || cy > view.bottom as i32 {
                    continue;
                }
                out.queue(cursor::MoveTo(cx as u16, cy as u16))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

fn draw_craft<W: Write>(out: &mut W, game: &Game, view: &Viewport) -> std::io::Result<()> {
    // Sprite (2 cols):  ═►   tilted with the roll
    let craft = game.craft();
    if !craft.visible {
        return Ok(());
    }
    let Some((x, y)) = view.project(craft.position) else {
        return Ok(());
    };
    let sprite = match craft.roll {
        r if r > 0.1 => "═◥",
        r if r < -0.1 => "═◢",
        _ => "═►",
    };
    out.queue(style::SetForegroundColor(C_CRAFT))?;
    out.queue(cursor::MoveTo(x.saturating_sub(1), y))?;
    out.queue(Print(sprite))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, game: &Game, height: u16) -> std::io::Result<()> {
    let hint = match game.status() {
        GameStatus::Ready => "ENTER : Start   Q : Quit",
        GameStatus::LevelUp => "C / ENTER : Continue   Q : Quit",
        GameStatus::GameOver => "R : Play Again   Q : Quit",
        _ => "SPACE / ↑ / W (hold) : Climb   Q : Quit",
    };
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    lines: &[(String, Color)],
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_menu<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let mut lines: Vec<(String, Color)> = vec![
        ("★  FLYING  SPUR  ★".to_string(), C_TITLE),
        (String::new(), C_HINT),
        ("Hold SPACE to climb, release to sink.".to_string(), Color::White),
        ("Collect stars, dodge bombs.".to_string(), Color::White),
        (String::new(), C_HINT),
    ];
    let scores = game.high_scores().entries();
    if !scores.is_empty() {
        lines.push(("High Scores".to_string(), C_HUD_SCORE));
        for (i, entry) in scores.iter().take(5).enumerate() {
            lines.push((format!("{:>2}. {:<12} {:>4}", i + 1, entry.name, entry.score), C_HINT));
        }
        lines.push((String::new(), C_HINT));
    }
    lines.push(("Press ENTER to fly".to_string(), Color::Green));
    draw_centered(out, &lines, width, height)
}

fn draw_level_up<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let lines = vec![
        ("╔════════════════════╗".to_string(), Color::Green),
        (format!("║     LEVEL  {:<2}      ║", game.session().tier + 1), Color::Green),
        ("╚════════════════════╝".to_string(), Color::Green),
        (format!("Stars: {}", game.session().score), C_HUD_SCORE),
        ("C - Continue".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}

fn draw_game_over<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let score = game.session().score;
    let best_line = match game.last_rank() {
        Some(rank) => (format!("★ NEW HIGH SCORE #{} ★", rank + 1), Color::Yellow),
        None => (format!("Best Score: {:>4}", game.high_scores().best()), Color::DarkGrey),
    };
    let lines = vec![
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>4}", score), Color::Yellow),
        best_line,
        ("R - Play Again  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, &lines, width, height)
}
