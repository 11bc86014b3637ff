//! Menus and text screens: scrolling story text, title menu, options
//! volume buttons, the shared back button and the static pages.

use crate::audio::AudioDirector;
use crate::render::{Align, DrawCommand, Frame, TextStyle};
use crate::screen::Screen;

// ── Story text ────────────────────────────────────────────────────────────────

pub const INTRO_TEXT: &str = "Far out past the last charted beacon, the mining colonies \
    of the Varn belt lived quietly under the watch of a single patrol pilot. Then the \
    engineer Jorhan stole the fleet's navigation cores, rewired the drone squadrons to \
    answer only to him, and turned them loose on the colonies. Outposts are going dark \
    one by one. The patrol pilot is the only ship left flying. Launch, clear the lanes \
    and find Jorhan before the belt falls silent.";

pub const ENDING_TEXT: &str = "With the Bouncing Skull reduced to scrap, Jorhan fused \
    himself into the heart of his flagship and came out to fight in person. The duel \
    lit up the belt for hours. When the flagship finally broke apart, the stolen cores \
    went quiet and the drones drifted home with their engines cold. The colonies are \
    lighting their beacons again, and every one of them is pointed at the patrol pilot.";

/// Canvas pixels per character for the text size, used to wrap lines.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// Greedy word wrap to at most `max_chars` per line.  A single word longer
/// than the limit gets its own line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.len()
        } else {
            line.len() + 1 + word.len()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Text block that rises from below the canvas until it has fully left
/// through the top.
#[derive(Clone, Debug)]
pub struct ScrollText {
    pub x: f32,
    pub y: f32,
    pub text_size: f32,
    pub speed_y: f32,
    pub width: f32,
    pub lines: Vec<String>,
    pub finished: bool,
    start_y: f32,
}

pub const SCROLL_TEXT_SIZE: f32 = 22.0;

impl ScrollText {
    pub fn new(text: &str, canvas_width: f32, canvas_height: f32) -> Self {
        let width = canvas_width * 0.8;
        let max_chars = ((width / (SCROLL_TEXT_SIZE * GLYPH_WIDTH_RATIO)) as usize).max(1);
        let start_y = canvas_height + SCROLL_TEXT_SIZE;
        Self {
            x: canvas_width * 0.1,
            y: start_y,
            text_size: SCROLL_TEXT_SIZE,
            speed_y: -1.0 / 3.0,
            width,
            lines: wrap_text(text, max_chars),
            finished: false,
            start_y,
        }
    }

    pub fn height(&self) -> f32 {
        self.text_size * self.lines.len() as f32
    }

    pub fn advance(&mut self, rate: f32) {
        self.y += rate * self.speed_y;
        if self.y + self.height() - self.text_size < 0.0 {
            self.finished = true;
        }
    }

    pub fn reset(&mut self) {
        self.y = self.start_y;
        self.finished = false;
    }

    pub fn draw(&self, frame: &mut Frame) {
        for (i, line) in self.lines.iter().enumerate() {
            frame.text(
                line.clone(),
                self.x,
                self.y + i as f32 * self.text_size,
                self.text_size,
                Align::Left,
                TextStyle::Body,
            );
        }
    }
}

// ── Title menu ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TitleOption {
    Start,
    Options,
    HowTo,
    Credits,
}

impl TitleOption {
    pub const ALL: [TitleOption; 4] = [
        TitleOption::Start,
        TitleOption::Options,
        TitleOption::HowTo,
        TitleOption::Credits,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TitleOption::Start => "Start",
            TitleOption::Options => "Options",
            TitleOption::HowTo => "How to play",
            TitleOption::Credits => "Credits",
        }
    }

    pub fn target(self) -> Screen {
        match self {
            TitleOption::Start => Screen::Playing,
            TitleOption::Options => Screen::Options,
            TitleOption::HowTo => Screen::HowTo,
            TitleOption::Credits => Screen::Credits,
        }
    }
}

pub fn draw_title(frame: &mut Frame, width: f32, height: f32) {
    frame.text("Space", width / 2.0, height * 0.2, width * 0.2, Align::Center, TextStyle::Title);
    frame.text("Shooter", width / 2.0, height * 0.35, width * 0.2, Align::Center, TextStyle::Title);

    for (i, option) in TitleOption::ALL.iter().enumerate() {
        let y = height * ((6 + i) as f32 / 10.0);
        frame.text(
            format!("[{}] {}", i + 1, option.label()),
            width / 2.0,
            y,
            width * 0.1,
            Align::Center,
            TextStyle::Body,
        );
    }
}

// ── Options ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VolumeButton {
    MusicUp,
    MusicDown,
    EffectsUp,
    EffectsDown,
}

impl VolumeButton {
    pub const ALL: [VolumeButton; 4] = [
        VolumeButton::MusicUp,
        VolumeButton::MusicDown,
        VolumeButton::EffectsUp,
        VolumeButton::EffectsDown,
    ];

    fn y_factor(self) -> f32 {
        match self {
            VolumeButton::MusicUp => 0.18,
            VolumeButton::MusicDown => 0.35,
            VolumeButton::EffectsUp => 0.48,
            VolumeButton::EffectsDown => 0.65,
        }
    }

    fn label(self) -> &'static str {
        match self {
            VolumeButton::MusicUp | VolumeButton::EffectsUp => "+",
            VolumeButton::MusicDown | VolumeButton::EffectsDown => "-",
        }
    }

    /// A button is hidden once its gain sits at the limit it moves towards.
    pub fn is_visible(self, audio: &AudioDirector) -> bool {
        match self {
            VolumeButton::MusicUp => audio.user_track_gain() < 1.0,
            VolumeButton::MusicDown => audio.user_track_gain() > 0.0,
            VolumeButton::EffectsUp => audio.user_effects_gain() < 1.0,
            VolumeButton::EffectsDown => audio.user_effects_gain() > 0.0,
        }
    }

    pub fn press(self, audio: &mut AudioDirector) -> bool {
        let changed = match self {
            VolumeButton::MusicUp => audio.adjust_track_gain(true),
            VolumeButton::MusicDown => audio.adjust_track_gain(false),
            VolumeButton::EffectsUp => audio.adjust_effects_gain(true),
            VolumeButton::EffectsDown => audio.adjust_effects_gain(false),
        };
        if changed {
            tracing::debug!(
                button = ?self,
                music = audio.user_track_gain(),
                effects = audio.user_effects_gain(),
                "volume changed"
            );
        }
        changed
    }
}

pub fn draw_options(frame: &mut Frame, audio: &AudioDirector, width: f32, height: f32) {
    frame.text("Options", width / 2.0, height * 0.1, 40.0, Align::Center, TextStyle::Title);

    frame.text("Music:", width * 0.1, height * 0.3, 30.0, Align::Left, TextStyle::Body);
    frame.text(
        format!("{:.0}%", audio.user_track_gain() * 100.0),
        width * 0.7,
        height * 0.3,
        30.0,
        Align::Right,
        TextStyle::Accent,
    );
    frame.text("Effects:", width * 0.1, height * 0.6, 30.0, Align::Left, TextStyle::Body);
    frame.text(
        format!("{:.0}%", audio.user_effects_gain() * 100.0),
        width * 0.7,
        height * 0.6,
        30.0,
        Align::Right,
        TextStyle::Accent,
    );

    for button in VolumeButton::ALL {
        if button.is_visible(audio) {
            frame.push(DrawCommand::Button {
                x: width * 0.9 - 60.0,
                y: height * button.y_factor(),
                width: 60.0,
                height: height * 0.06,
                label: button.label().to_string(),
                focused: false,
            });
        }
    }
}

// ── Static pages ──────────────────────────────────────────────────────────────

pub fn draw_back_button(frame: &mut Frame, width: f32, height: f32) {
    frame.push(DrawCommand::Button {
        x: width * 0.05,
        y: height * 0.9,
        width: width * 0.25,
        height: height * 0.06,
        label: "Back".to_string(),
        focused: false,
    });
}

pub fn draw_how_to(frame: &mut Frame, width: f32, height: f32) {
    frame.text("How To Play", width / 2.0, height * 0.1, 40.0, Align::Center, TextStyle::Title);
    frame.text("Move with:", width * 0.1, height * 0.3, 30.0, Align::Left, TextStyle::Body);
    frame.text("A-S-W-D", width * 0.9, height * 0.3, 30.0, Align::Right, TextStyle::Accent);
    frame.text("Shoot with:", width * 0.1, height * 0.55, 30.0, Align::Left, TextStyle::Body);
    frame.text("K or SPACE", width * 0.9, height * 0.55, 30.0, Align::Right, TextStyle::Accent);
}

pub fn draw_credits(frame: &mut Frame, width: f32, height: f32) {
    let rows: [(&str, f32, TextStyle); 5] = [
        ("Credits", 0.1, TextStyle::Title),
        ("Music By:", 0.3, TextStyle::Accent),
        ("OBLIDVM", 0.4, TextStyle::Body),
        ("Sound Effects:", 0.6, TextStyle::Accent),
        ("Kenney.nl", 0.7, TextStyle::Body),
    ];
    for (text, y, style) in rows {
        frame.text(text, width / 2.0, height * y, 30.0, Align::Center, style);
    }
}

/// Animated "loading..." label, progress bar and, if a required asset
/// could not be read, a notice naming the first one.
pub fn draw_loading(
    frame: &mut Frame,
    now: f64,
    progress: f32,
    failed: Option<&str>,
    width: f32,
    height: f32,
) {
    let dots = ((now / 1000.0).round() as i64).rem_euclid(4) as usize;
    frame.text(
        format!("loading{}", ".".repeat(dots)),
        width / 2.0,
        height * 0.45,
        30.0,
        Align::Center,
        TextStyle::Body,
    );
    frame.push(DrawCommand::Bar {
        x: width * 0.1,
        y: height * 0.52,
        width: width * 0.8,
        height: height * 0.05,
        fill: progress.clamp(0.0, 1.0),
    });
    if let Some(path) = failed {
        frame.text(
            format!("could not load {path}"),
            width / 2.0,
            height * 0.65,
            20.0,
            Align::Center,
            TextStyle::Accent,
        );
    }
}

pub fn draw_game_over(frame: &mut Frame, width: f32, height: f32) {
    frame.text("Game Over", width / 2.0, height / 2.0, width * 0.15, Align::Center, TextStyle::Title);
}

// ── Interface ─────────────────────────────────────────────────────────────────

/// UI state carried across frames.
#[derive(Clone, Debug)]
pub struct Interface {
    pub intro: ScrollText,
    pub ending: ScrollText,
}

impl Interface {
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            intro: ScrollText::new(INTRO_TEXT, canvas_width, canvas_height),
            ending: ScrollText::new(ENDING_TEXT, canvas_width, canvas_height),
        }
    }
}
