//! Game manager: owns every piece of state and runs one frame per
//! `update` call.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::{AssetLoader, AssetManifest, Track};
use crate::audio::AudioDirector;
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::input::{InputState, UiEvent};
use crate::interface::{self, Interface};
use crate::registry::{GameOverState, World};
use crate::render::{DrawCommand, Frame};
use crate::screen::{Screen, Transition};

pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) clock: Clock,
    pub(crate) screen: Screen,
    pub(crate) transition: Transition,
    pub(crate) audio: AudioDirector,
    pub(crate) loader: Option<AssetLoader>,
    pub(crate) interface: Interface,
    pub(crate) world: World,
    pub(crate) game_over: GameOverState,
    pub(crate) rng: StdRng,
    pub(crate) touch_controls: bool,
}

impl Game {
    /// Seeds from `config.seed`, or from entropy when unset.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            clock: Clock::new(),
            screen: Screen::Loading,
            transition: Transition::new(),
            audio: AudioDirector::new(),
            loader: None,
            interface: Interface::new(config.canvas_width, config.canvas_height),
            world: World::new(&config),
            game_over: GameOverState::new(config.game_over_interval_ms),
            rng,
            touch_controls: false,
            config,
        }
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Advance the clock, the audio crossfade and then the active screen.
    pub fn update(&mut self, timestamp: f64, input: &InputState, events: &[UiEvent]) -> Frame {
        self.clock.advance(timestamp);
        self.audio.tick();

        let mut frame = Frame::default();
        match self.screen {
            Screen::Loading => self.update_loading(&mut frame),
            Screen::Intro => self.update_intro(events, &mut frame),
            Screen::Title => self.update_title(events, &mut frame),
            Screen::Playing => self.update_playing(input, &mut frame),
            Screen::GameOver => self.update_game_over(&mut frame),
            Screen::Ending => self.update_ending(&mut frame),
            Screen::Options | Screen::HowTo | Screen::Credits => {
                self.update_menu_page(events, &mut frame)
            }
        }

        frame.audio = self.audio.drain();
        frame
    }

    /// The host stopped calling `update`.  The next frame starts with a
    /// zero delta instead of catching up.
    pub fn pause(&mut self) {
        self.clock.pause();
        tracing::info!(screen = ?self.screen, "paused");
    }

    pub fn change_screen(&mut self, target: Screen) {
        if self.screen != target {
            tracing::info!(from = ?self.screen, to = ?target, "screen change");
        }
        self.screen = target;
    }

    /// Back to a fresh session with stereo centered.
    pub fn reset_game(&mut self) {
        self.world.reset(&self.config);
        self.audio.set_pan(0.0);
        tracing::debug!("session reset");
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    pub fn audio(&self) -> &AudioDirector {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioDirector {
        &mut self.audio
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn game_over(&self) -> &GameOverState {
        &self.game_over
    }

    pub fn interface(&self) -> &Interface {
        &self.interface
    }

    pub fn loader(&self) -> Option<&AssetLoader> {
        self.loader.as_ref()
    }

    pub fn touch_controls(&self) -> bool {
        self.touch_controls
    }

    // ── Screens ───────────────────────────────────────────────────────────────

    fn draw_backdrop(frame: &mut Frame) {
        frame.push(DrawCommand::Clear);
        frame.push(DrawCommand::Background {
            image: None,
            scroll: 0.0,
        });
    }

    fn update_loading(&mut self, frame: &mut Frame) {
        let root = self.config.asset_root.clone();
        let loader = self
            .loader
            .get_or_insert_with(|| AssetLoader::start(AssetManifest::standard(), root));
        loader.poll();

        if loader.is_loaded() {
            tracing::info!("required assets loaded");
            self.audio.play_track(Track::Title, true);
            self.change_screen(Screen::Intro);
            Self::draw_backdrop(frame);
            return;
        }

        let failed = loader.failed().first().map(|id| id.relative_path());
        let progress = loader.progress();
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        Self::draw_backdrop(frame);
        interface::draw_loading(frame, self.clock.current_time, progress, failed, width, height);
    }

    fn update_intro(&mut self, events: &[UiEvent], frame: &mut Frame) {
        let intro = &mut self.interface.intro;
        intro.advance(self.clock.rate);

        Self::draw_backdrop(frame);
        intro.draw(frame);

        if intro.finished || events.contains(&UiEvent::Skip) {
            intro.reset();
            self.change_screen(Screen::Title);
        }
    }

    fn update_title(&mut self, events: &[UiEvent], frame: &mut Frame) {
        Self::draw_backdrop(frame);
        interface::draw_title(frame, self.config.canvas_width, self.config.canvas_height);

        for event in events {
            if let UiEvent::Choose(option) = event {
                self.change_screen(option.target());
                break;
            }
        }
    }

    fn update_menu_page(&mut self, events: &[UiEvent], frame: &mut Frame) {
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);

        for event in events {
            match event {
                UiEvent::Volume(button) if self.screen == Screen::Options => {
                    button.press(&mut self.audio);
                }
                UiEvent::Back => {
                    self.change_screen(Screen::Title);
                }
                UiEvent::Volume(_) | UiEvent::Skip | UiEvent::Choose(_) => {}
            }
        }

        Self::draw_backdrop(frame);
        match self.screen {
            Screen::Credits => interface::draw_credits(frame, width, height),
            Screen::HowTo => interface::draw_how_to(frame, width, height),
            Screen::Options => interface::draw_options(frame, &self.audio, width, height),
            // Went back to the title this frame.
            _ => interface::draw_title(frame, width, height),
        }
        if self.screen.has_back_button() {
            interface::draw_back_button(frame, width, height);
        }
    }

    fn update_game_over(&mut self, frame: &mut Frame) {
        let now = self.clock.current_time;
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);

        if self.audio.transition_finished() && !self.game_over.audio_loaded {
            self.audio.acknowledge_transition();
            self.game_over.audio_loaded = true;
            self.game_over.reference_time = now;
            frame.push(DrawCommand::Clear);
            interface::draw_game_over(frame, width, height);
            return;
        }

        let revealed = now - self.game_over.reference_time >= self.game_over.interval;
        if !(self.game_over.audio_loaded && revealed) {
            frame.push(DrawCommand::Clear);
            interface::draw_game_over(frame, width, height);
            return;
        }

        if !self.game_over.finished {
            self.game_over.finished = true;
            self.audio.crossfade_to(Track::Title, true);
        } else if self.audio.transition_finished() {
            self.audio.acknowledge_transition();
        }

        frame.push(DrawCommand::Clear);
        interface::draw_title(frame, width, height);
        self.transition.advance();
        frame.push(DrawCommand::Fade {
            alpha: self.transition.alpha(),
        });

        if !self.transition.started() {
            self.game_over.clear();
            self.change_screen(Screen::Title);
        }
    }

    fn update_ending(&mut self, frame: &mut Frame) {
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        let ending = &mut self.interface.ending;
        ending.advance(self.clock.rate);

        Self::draw_backdrop(frame);
        ending.draw(frame);

        if !ending.finished {
            return;
        }

        interface::draw_title(frame, width, height);
        self.transition.advance();
        frame.push(DrawCommand::Fade {
            alpha: self.transition.alpha(),
        });

        if self.transition.finished() {
            self.transition.advance();
            self.reset_game();
            self.interface.ending.reset();
            tracing::info!("ending finished");
            self.change_screen(Screen::Title);
        }
    }
}
