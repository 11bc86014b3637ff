//! Audio director.
//!
//! The core never touches an audio graph.  It issues a handful of commands
//! (`AudioCommand`) that the host plays however it likes, and runs the
//! track crossfade itself as a small per-frame state machine whose
//! completion is exposed through `transition_finished()`.

use crate::assets::{Effect, Track};

/// Gains are kept in hundredths; the crossfade moves one step per frame.
const GAIN_STEPS: u8 = 100;
const DEFAULT_GAIN: u8 = 50;
/// Options-screen volume buttons move by 0.1.
const USER_GAIN_STEP: u8 = 10;

#[derive(Clone, Debug, PartialEq)]
pub enum AudioCommand {
    PlayOneShot { effect: Effect, pan: f32, gain: f32 },
    PlayTrack { track: Track, looped: bool, gain: f32 },
    SetTrackGain(f32),
    SetPan(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrossfadeStage {
    FadingOut,
    Switching,
    FadingIn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crossfade {
    pub next: Track,
    pub looped: bool,
    pub stage: CrossfadeStage,
}

#[derive(Clone, Debug)]
pub struct AudioDirector {
    track_gain: u8,
    user_track_gain: u8,
    user_effects_gain: u8,
    pan: f32,
    current_track: Option<Track>,
    crossfade: Option<Crossfade>,
    transition_finished: bool,
    outbox: Vec<AudioCommand>,
}

impl Default for AudioDirector {
    fn default() -> Self {
        Self::new()
    }
}

fn to_gain(steps: u8) -> f32 {
    f32::from(steps) / f32::from(GAIN_STEPS)
}

impl AudioDirector {
    pub fn new() -> Self {
        Self {
            track_gain: DEFAULT_GAIN,
            user_track_gain: DEFAULT_GAIN,
            user_effects_gain: DEFAULT_GAIN,
            pan: 0.0,
            current_track: None,
            crossfade: None,
            transition_finished: false,
            outbox: Vec::new(),
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    pub fn play_one_shot(&mut self, effect: Effect) {
        self.outbox.push(AudioCommand::PlayOneShot {
            effect,
            pan: self.pan,
            gain: to_gain(self.user_effects_gain),
        });
    }

    /// Start a track immediately, without fading.
    pub fn play_track(&mut self, track: Track, looped: bool) {
        self.current_track = Some(track);
        self.outbox.push(AudioCommand::PlayTrack {
            track,
            looped,
            gain: to_gain(self.track_gain),
        });
    }

    /// Fade the current track out, switch to `track`, fade back in.
    /// Clears the finished flag; a crossfade already running is retargeted
    /// and keeps fading from its current gain.
    pub fn crossfade_to(&mut self, track: Track, looped: bool) {
        tracing::debug!(?track, looped, "crossfade requested");
        self.transition_finished = false;
        self.crossfade = Some(Crossfade {
            next: track,
            looped,
            stage: CrossfadeStage::FadingOut,
        });
    }

    pub fn set_pan(&mut self, pan: f32) {
        let pan = pan.clamp(-1.0, 1.0);
        if pan != self.pan {
            self.pan = pan;
            self.outbox.push(AudioCommand::SetPan(pan));
        }
    }

    // ── Per-frame ─────────────────────────────────────────────────────────────

    /// Advance the crossfade by one frame.
    pub fn tick(&mut self) {
        let Some(fade) = self.crossfade.as_mut() else {
            return;
        };

        match fade.stage {
            CrossfadeStage::FadingOut => {
                if self.track_gain > 0 {
                    self.track_gain -= 1;
                    self.outbox
                        .push(AudioCommand::SetTrackGain(to_gain(self.track_gain)));
                }
                if self.track_gain == 0 {
                    fade.stage = CrossfadeStage::Switching;
                }
            }
            CrossfadeStage::Switching => {
                let (track, looped) = (fade.next, fade.looped);
                fade.stage = CrossfadeStage::FadingIn;
                self.play_track(track, looped);
            }
            CrossfadeStage::FadingIn => {
                if self.track_gain < self.user_track_gain {
                    self.track_gain += 1;
                    self.outbox
                        .push(AudioCommand::SetTrackGain(to_gain(self.track_gain)));
                } else {
                    tracing::debug!(track = ?fade.next, "crossfade finished");
                    self.crossfade = None;
                    self.transition_finished = true;
                }
            }
        }
    }

    pub fn transition_finished(&self) -> bool {
        self.transition_finished
    }

    /// Consume the finished flag so the next crossfade can be awaited.
    pub fn acknowledge_transition(&mut self) {
        self.transition_finished = false;
    }

    pub fn drain(&mut self) -> Vec<AudioCommand> {
        std::mem::take(&mut self.outbox)
    }

    // ── Options screen ────────────────────────────────────────────────────────

    /// Raise or lower the music volume by 0.1.  Returns false at the limit.
    pub fn adjust_track_gain(&mut self, up: bool) -> bool {
        let Some(next) = step_gain(self.user_track_gain, up) else {
            return false;
        };
        self.user_track_gain = next;
        if self.crossfade.is_none() {
            self.track_gain = next;
            self.outbox.push(AudioCommand::SetTrackGain(to_gain(next)));
        }
        true
    }

    /// Raise or lower the effects volume by 0.1 and play a sample effect.
    pub fn adjust_effects_gain(&mut self, up: bool) -> bool {
        let Some(next) = step_gain(self.user_effects_gain, up) else {
            return false;
        };
        self.user_effects_gain = next;
        self.play_one_shot(Effect::PowerUp);
        true
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn track_gain(&self) -> f32 {
        to_gain(self.track_gain)
    }

    pub fn user_track_gain(&self) -> f32 {
        to_gain(self.user_track_gain)
    }

    pub fn user_effects_gain(&self) -> f32 {
        to_gain(self.user_effects_gain)
    }

    pub fn pan(&self) -> f32 {
        self.pan
    }

    pub fn current_track(&self) -> Option<Track> {
        self.current_track
    }

    pub fn crossfade(&self) -> Option<&Crossfade> {
        self.crossfade.as_ref()
    }
}

fn step_gain(gain: u8, up: bool) -> Option<u8> {
    match up {
        true if gain < GAIN_STEPS => Some((gain + USER_GAIN_STEP).min(GAIN_STEPS)),
        false if gain > 0 => Some(gain.saturating_sub(USER_GAIN_STEP)),
        _ => None,
    }
}
