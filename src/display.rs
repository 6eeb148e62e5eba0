/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// arena pixels into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use sky_shooter::compute::{hud, visuals};
use sky_shooter::config::DisplayConfig;
use sky_shooter::entities::{GameState, Rect, Visual, VisualKind};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_PROJECTILE: Color = Color::Cyan;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

/// Rows reserved outside the arena: HUD on top, controls hint at the bottom.
const HUD_ROWS: u16 = 1;
const HINT_ROWS: u16 = 1;

// ── Pixel ↔ cell mapping ─────────────────────────────────────────────────────

/// How the terminal grid maps onto the arena.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, config: &DisplayConfig) -> Self {
        Self {
            cols,
            rows,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
        }
    }

    fn arena_rows(&self) -> u16 {
        self.rows.saturating_sub(HUD_ROWS + HINT_ROWS)
    }

    /// Arena size in pixels for the current terminal size.
    pub fn arena_size(&self) -> (f32, f32) {
        (
            self.cols as f32 * self.cell_width,
            self.arena_rows() as f32 * self.cell_height,
        )
    }

    /// Screen cells covered by `rect`, clipped to the arena.  `None` when
    /// the rect is entirely off screen.
    fn cells(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let max_col = self.cols as f32;
        let max_row = self.arena_rows() as f32;
        let c0 = (rect.x / self.cell_width).floor().max(0.0);
        let c1 = (rect.right() / self.cell_width).ceil().min(max_col);
        let r0 = (rect.y / self.cell_height).floor().max(0.0);
        let r1 = (rect.bottom() / self.cell_height).ceil().min(max_row);
        if c0 >= c1 || r0 >= r1 {
            return None;
        }
        Some((
            c0 as u16,
            c1 as u16,
            r0 as u16 + HUD_ROWS,
            r1 as u16 + HUD_ROWS,
        ))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, state, view)?;

    // Painter's order: effects underneath, the ship on top.
    let mut all = visuals(state);
    all.sort_by_key(|v| match v.kind {
        VisualKind::Explosion => 0,
        VisualKind::Enemy => 1,
        VisualKind::Projectile => 2,
        VisualKind::Player => 3,
    });
    for visual in &all {
        draw_visual(out, visual, view)?;
    }

    draw_controls_hint(out, view)?;

    if hud(state).game_over_visible {
        draw_game_over(out, state, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: &Viewport) -> std::io::Result<()> {
    let counters = hud(state);

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", counters.score)))?;

    let lives_str = format!("Lives:{}", "♥".repeat(counters.lives as usize));
    let rx = view
        .cols
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_visual<W: Write>(out: &mut W, visual: &Visual, view: &Viewport) -> std::io::Result<()> {
    let Some((c0, c1, r0, r1)) = view.cells(&visual.rect) else {
        return Ok(());
    };
    let (glyph, color) = match visual.kind {
        VisualKind::Player => ("▲", C_PLAYER),
        VisualKind::Projectile => ("║", C_PROJECTILE),
        VisualKind::Enemy => ("▼", C_ENEMY),
        VisualKind::Explosion => ("*", C_EXPLOSION),
    };
    out.queue(style::SetForegroundColor(color))?;
    let span = glyph.repeat((c1 - c0) as usize);
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&span))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → ↑ ↓ / WASD : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    view: &Viewport,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        ("SPACE - Play Again  Q - Quit", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
