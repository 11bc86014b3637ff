/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and a frame of draw commands
/// produced by the core.  No game logic is performed; this module only
/// scales canvas pixels down to terminal cells and queues crossterm
/// commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_shooter::assets::ImageId;
use space_shooter::entities::{BossKind, EnemyKind, PlayerShotType, PowerUpKind, ShotSource};
use space_shooter::render::{Align, DrawCommand, Frame, TextStyle};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STARS: Color = Color::DarkGrey;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY_PATROLLER: Color = Color::Green;
const C_ENEMY_TRACKER: Color = Color::Red;
const C_ENEMY_KAMIKAZE: Color = Color::Yellow;
const C_ENEMY_STRAFER: Color = Color::Magenta;
const C_BOSS: Color = Color::DarkRed;
const C_SHOT_PLAYER: Color = Color::Cyan;
const C_SHOT_ENEMY: Color = Color::Magenta;
const C_SHOT_BOSS: Color = Color::Red;
const C_POWER_UP: Color = Color::Yellow;
const C_TEXT: Color = Color::Grey;
const C_TITLE: Color = Color::White;
const C_ACCENT: Color = Color::DarkRed;
const C_HIGHLIGHT: Color = Color::Cyan;
const C_BAR: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Fades at or above this alpha black the screen out.
const FADE_BLACKOUT: f32 = 0.5;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps canvas pixels onto the terminal grid.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub canvas_width: f32,
    pub canvas_height: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            canvas_width,
            canvas_height,
        }
    }

    fn col(&self, x: f32) -> f32 {
        x / self.canvas_width * f32::from(self.cols)
    }

    fn row(&self, y: f32) -> f32 {
        y / self.canvas_height * f32::from(self.rows)
    }

    /// Cell for a canvas point, or `None` when it falls outside the terminal.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let (c, r) = (self.col(x).floor(), self.row(y).floor());
        if c < 0.0 || r < 0.0 || c >= f32::from(self.cols) || r >= f32::from(self.rows) {
            return None;
        }
        Some((c as u16, r as u16))
    }

    /// Width in cells of a canvas length, at least one.
    fn span(&self, width: f32) -> usize {
        (self.col(width).round() as usize).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    frame: &Frame,
    view: &Viewport,
    show_hint: bool,
) -> std::io::Result<()> {
    for command in &frame.draw {
        draw_command(out, command, view)?;
    }

    if show_hint {
        draw_controls_hint(out, view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_command<W: Write>(out: &mut W, command: &DrawCommand, view: &Viewport) -> std::io::Result<()> {
    match command {
        DrawCommand::Clear => {
            out.queue(terminal::Clear(terminal::ClearType::All))?;
        }
        DrawCommand::Background { image, scroll } => {
            if image.is_some() {
                draw_stars(out, *scroll, view)?;
            }
        }
        DrawCommand::Sprite {
            image, x, y, width, ..
        } => draw_sprite(out, *image, *x, *y, *width, view)?,
        DrawCommand::Shot { x, y, source, .. } => draw_shot(out, *x, *y, *source, view)?,
        DrawCommand::PowerUp { x, y, kind, .. } => draw_power_up(out, *x, *y, *kind, view)?,
        DrawCommand::Text {
            text, x, y, align, style, ..
        } => draw_text(out, text, *x, *y, *align, *style, view)?,
        DrawCommand::Bar {
            x, y, width, fill, ..
        } => draw_bar(out, *x, *y, *width, *fill, view)?,
        DrawCommand::Button {
            x, y, label, focused, ..
        } => {
            let style = if *focused {
                TextStyle::Highlight
            } else {
                TextStyle::Accent
            };
            draw_text(out, &format!("[ {label} ]"), *x, *y, Align::Left, style, view)?;
        }
        DrawCommand::Hud { lives, score } => draw_hud(out, *lives, *score, view)?,
        DrawCommand::Fade { alpha } => {
            if *alpha >= FADE_BLACKOUT {
                out.queue(terminal::Clear(terminal::ClearType::All))?;
            }
        }
    }
    Ok(())
}

// ── Backdrop ──────────────────────────────────────────────────────────────────

/// Sparse star field that drifts down with the scroll offset.
fn draw_stars<W: Write>(out: &mut W, scroll: f32, view: &Viewport) -> std::io::Result<()> {
    let offset = view.row(scroll) as u32;
    let (cols, rows) = (u32::from(view.cols), u32::from(view.rows));

    out.queue(style::SetForegroundColor(C_STARS))?;
    for i in 0..(cols * rows / 40).max(1) {
        let col = (i * 37) % cols;
        let row = (i * 53 + offset) % rows;
        out.queue(cursor::MoveTo(col as u16, row as u16))?;
        out.queue(Print("."))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, lives: u32, score: u32, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{score:>7}")))?;

    let hearts: String = "♥".repeat(lives as usize);
    let lives_str = format!("Lives:{hearts}");
    let rx = view.cols.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Two-row glyph art per sprite.
fn sprite_art(image: ImageId) -> (&'static str, &'static str, Color) {
    match image {
        ImageId::Player => ("▲", "/█\\", C_PLAYER),
        ImageId::Enemy1 => ("«▼»", "╚═╝", C_ENEMY_PATROLLER),
        ImageId::Enemy2 => ("(◎)", "╰─╯", C_ENEMY_TRACKER),
        ImageId::Enemy3 => ("\\▼/", " ˅ ", C_ENEMY_KAMIKAZE),
        ImageId::Enemy4 => ("[▼]", " ║ ", C_ENEMY_STRAFER),
        ImageId::BossLevel1 | ImageId::BossLevel2 => ("", "", C_BOSS),
        ImageId::BackgroundLevel1 | ImageId::BackgroundLevel2 => ("", "", C_STARS),
    }
}

fn boss_kind(image: ImageId) -> Option<BossKind> {
    match image {
        ImageId::BossLevel1 => Some(BossKind::BouncingSkull),
        ImageId::BossLevel2 => Some(BossKind::Jorhan),
        _ => None,
    }
}

fn draw_sprite<W: Write>(
    out: &mut W,
    image: ImageId,
    x: f32,
    y: f32,
    width: f32,
    view: &Viewport,
) -> std::io::Result<()> {
    if let Some(kind) = boss_kind(image) {
        return draw_boss(out, kind, x, y, width, view);
    }

    let (top, bottom, color) = sprite_art(image);
    let center_x = x + width / 2.0;
    let Some((col, row)) = view.cell(center_x, y) else {
        return Ok(());
    };

    out.queue(style::SetForegroundColor(color))?;
    let top_col = col.saturating_sub(top.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(top_col, row))?;
    out.queue(Print(top))?;

    if row + 1 < view.rows {
        let bottom_col = col.saturating_sub(bottom.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(bottom_col, row + 1))?;
        out.queue(Print(bottom))?;
    }
    Ok(())
}

fn draw_boss<W: Write>(
    out: &mut W,
    kind: BossKind,
    x: f32,
    y: f32,
    width: f32,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(x.max(0.0), y) else {
        return Ok(());
    };
    let span = view.span(width).max(3);
    let (face, fill) = match kind {
        BossKind::BouncingSkull => ("☠", "▓"),
        BossKind::Jorhan => ("◉", "█"),
    };

    out.queue(style::SetForegroundColor(C_BOSS))?;
    for line in 0..3u16 {
        if row + line >= view.rows {
            break;
        }
        out.queue(cursor::MoveTo(col, row + line))?;
        if line == 1 {
            let side = fill.repeat((span - 1) / 2);
            out.queue(Print(format!("{side}{face}{side}")))?;
        } else {
            out.queue(Print(fill.repeat(span)))?;
        }
    }
    Ok(())
}

fn draw_shot<W: Write>(
    out: &mut W,
    x: f32,
    y: f32,
    source: ShotSource,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(x, y) else {
        return Ok(());
    };

    let (glyph, color) = match source {
        ShotSource::Player(PlayerShotType::Single | PlayerShotType::Spread) => ("║", C_SHOT_PLAYER),
        ShotSource::Player(PlayerShotType::Heavy) => ("●", C_SHOT_PLAYER),
        ShotSource::Enemy(EnemyKind::Kamikaze) => ("*", C_SHOT_ENEMY),
        ShotSource::Enemy(_) if source.is_rectangular() => ("|", C_SHOT_ENEMY),
        ShotSource::Enemy(_) => ("↓", C_SHOT_ENEMY),
        ShotSource::Boss(_) => ("O", C_SHOT_BOSS),
        ShotSource::Fragment => ("·", C_SHOT_BOSS),
    };

    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

/// Draw a falling power-up.
///
/// Symbols:
///   1  single shot,  3  spread shot,  ●  heavy shot,  ♥  extra life,
///   »  speed boost
fn draw_power_up<W: Write>(
    out: &mut W,
    x: f32,
    y: f32,
    kind: PowerUpKind,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(x, y) else {
        return Ok(());
    };
    let glyph = match kind {
        PowerUpKind::SingleShot => "1",
        PowerUpKind::SpreadShot => "3",
        PowerUpKind::HeavyShot => "●",
        PowerUpKind::ExtraLife => "♥",
        PowerUpKind::SpeedBoost => "»",
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_POWER_UP))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── UI ────────────────────────────────────────────────────────────────────────

fn draw_text<W: Write>(
    out: &mut W,
    text: &str,
    x: f32,
    y: f32,
    align: Align,
    style: TextStyle,
    view: &Viewport,
) -> std::io::Result<()> {
    let row = view.row(y).floor();
    if row < 0.0 || row >= f32::from(view.rows) {
        return Ok(());
    }

    let len = text.chars().count() as u16;
    let anchor = view.col(x).max(0.0) as u16;
    let col = match align {
        Align::Left => anchor,
        Align::Center => anchor.saturating_sub(len / 2),
        Align::Right => anchor.saturating_sub(len),
    };

    let color = match style {
        TextStyle::Title => C_TITLE,
        TextStyle::Body => C_TEXT,
        TextStyle::Accent => C_ACCENT,
        TextStyle::Highlight => C_HIGHLIGHT,
    };

    // Clip to the right edge.
    let room = view.cols.saturating_sub(col) as usize;
    let clipped: String = text.chars().take(room).collect();

    out.queue(cursor::MoveTo(col, row as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(clipped))?;
    Ok(())
}

fn draw_bar<W: Write>(
    out: &mut W,
    x: f32,
    y: f32,
    width: f32,
    fill: f32,
    view: &Viewport,
) -> std::io::Result<()> {
    let Some((col, row)) = view.cell(x, y) else {
        return Ok(());
    };
    let span = view.span(width);
    let filled = ((span as f32) * fill.clamp(0.0, 1.0)).round() as usize;

    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_BAR))?;
    out.queue(Print("█".repeat(filled)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("░".repeat(span - filled)))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD / arrows : Move   K / SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}
