//! Screen selection and the fade transition sub-machine.

/// The active screen.  Being an enum, exactly one is active at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Loading,
    Intro,
    Title,
    Options,
    HowTo,
    Credits,
    Playing,
    GameOver,
    Ending,
}

impl Screen {
    /// Screens that share the back button.
    pub fn has_back_button(self) -> bool {
        matches!(self, Screen::Options | Screen::HowTo | Screen::Credits)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadePhase {
    Idle,
    /// Alpha rising towards 1.
    FadingOut,
    /// Alpha reached 1 (the "ready" point) and is now falling.
    FadingIn,
    /// Alpha is back at 0; the next advance returns to `Idle`.
    Finished,
}

/// Fade-out / fade-in overlay.  Alpha is kept in hundredths so it lands on
/// exactly 0 and 1 with no float drift.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    phase: FadePhase,
    alpha_steps: u8,
}

const ALPHA_STEPS: u8 = 100;

impl Default for Transition {
    fn default() -> Self {
        Self::new()
    }
}

impl Transition {
    pub fn new() -> Self {
        Self {
            phase: FadePhase::Idle,
            alpha_steps: 0,
        }
    }

    /// Advance one step.  The first call only starts the fade; after that
    /// alpha moves by 0.01 per call until it has gone up to 1 and back to 0,
    /// and one further call resets to `Idle`.
    pub fn advance(&mut self) {
        match self.phase {
            FadePhase::Idle => self.phase = FadePhase::FadingOut,
            FadePhase::FadingOut => {
                self.alpha_steps = (self.alpha_steps + 1).min(ALPHA_STEPS);
                if self.alpha_steps == ALPHA_STEPS {
                    self.phase = FadePhase::FadingIn;
                }
            }
            FadePhase::FadingIn => {
                self.alpha_steps = self.alpha_steps.saturating_sub(1);
                if self.alpha_steps == 0 {
                    self.phase = FadePhase::Finished;
                }
            }
            FadePhase::Finished => self.phase = FadePhase::Idle,
        }
    }

    /// Drop any fade in progress (used when the player dies mid-transition).
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        f32::from(self.alpha_steps) / f32::from(ALPHA_STEPS)
    }

    pub fn started(&self) -> bool {
        self.phase != FadePhase::Idle
    }

    pub fn ready(&self) -> bool {
        matches!(self.phase, FadePhase::FadingIn | FadePhase::Finished)
    }

    pub fn finished(&self) -> bool {
        self.phase == FadePhase::Finished
    }
}
