//! Draw command vocabulary.
//!
//! The core never draws.  Each update returns a `Frame`: the draw list in
//! painter's order (clear, background, entities, UI overlay, fade) and the
//! audio commands issued during the frame.  Coordinates are canvas pixels.

use crate::assets::ImageId;
use crate::audio::AudioCommand;
use crate::entities::{PowerUpKind, ShotShape, ShotSource};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Body,
    /// Red labels (key names, credit headings).
    Accent,
    /// A menu entry or button under focus.
    Highlight,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    /// Scrolling level backdrop, or a plain dark fill when `image` is `None`.
    Background { image: Option<ImageId>, scroll: f32 },
    Sprite {
        image: ImageId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        angle: f32,
    },
    Shot {
        x: f32,
        y: f32,
        shape: ShotShape,
        angle: f32,
        source: ShotSource,
    },
    PowerUp {
        x: f32,
        y: f32,
        size: f32,
        kind: PowerUpKind,
    },
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        align: Align,
        style: TextStyle,
    },
    /// Filled bar, `fill` in [0, 1] of `width`.
    Bar {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: f32,
    },
    Button {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        label: String,
        focused: bool,
    },
    Hud { lives: u32, score: u32 },
    /// Black overlay at `alpha`.
    Fade { alpha: f32 },
}

/// Output of one `Game::update`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub draw: Vec<DrawCommand>,
    pub audio: Vec<AudioCommand>,
}

impl Frame {
    pub fn push(&mut self, command: DrawCommand) {
        self.draw.push(command);
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, align: Align, style: TextStyle) {
        self.draw.push(DrawCommand::Text {
            text: text.into(),
            x,
            y,
            size,
            align,
            style,
        });
    }

    pub fn contains(&self, predicate: impl Fn(&DrawCommand) -> bool) -> bool {
        self.draw.iter().any(predicate)
    }
}
