//! Host input, as the core sees it.

use crate::interface::{TitleOption, VolumeButton};

/// Held controls for this frame.  The host overwrites it every frame, so
/// the last reported state wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub moving_up: bool,
    pub moving_down: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    pub shooting: bool,
}

impl InputState {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Discrete menu actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiEvent {
    /// Skip the intro text.
    Skip,
    Choose(TitleOption),
    Back,
    Volume(VolumeButton),
}
