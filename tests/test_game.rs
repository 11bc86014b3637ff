use std::thread;
use std::time::Duration;

use space_shooter::assets::{AssetId, AssetLoader, AssetManifest, Track};
use space_shooter::audio::{AudioCommand, AudioDirector};
use space_shooter::clock::Clock;
use space_shooter::entities::{BossKind, EnemyKind};
use space_shooter::input::{InputState, UiEvent};
use space_shooter::interface::{wrap_text, ScrollText, TitleOption, VolumeButton};
use space_shooter::render::{DrawCommand, Frame};
use space_shooter::screen::{FadePhase, Screen, Transition};
use space_shooter::spawner::build_enemy;
use space_shooter::{Game, GameConfig};

use rand::rngs::StdRng;
use rand::SeedableRng;

const FRAME_MS: f64 = 16.0;

fn make_game(config: GameConfig) -> Game {
    Game::with_rng(config, StdRng::seed_from_u64(42))
}

/// Drives a game at a steady 16 ms per frame.
struct Driver {
    game: Game,
    now: f64,
}

impl Driver {
    fn new(config: GameConfig) -> Self {
        Self {
            game: make_game(config),
            now: 0.0,
        }
    }

    fn step(&mut self, events: &[UiEvent]) -> Frame {
        self.now += FRAME_MS;
        self.game.update(self.now, &InputState::idle(), events)
    }

    fn step_until(&mut self, max_frames: usize, done: impl Fn(&Game) -> bool) -> bool {
        for _ in 0..max_frames {
            if done(&self.game) {
                return true;
            }
            self.step(&[]);
        }
        done(&self.game)
    }
}

// ── Clock ─────────────────────────────────────────────────────────────────────

#[test]
fn rate_is_one_for_a_sixteen_ms_frame() {
    let mut clock = Clock::new();
    clock.advance(1000.0);
    let frame = clock.advance(1016.0);
    assert_eq!(frame.delta, 16.0);
    assert_eq!(frame.rate, 1.0);
}

#[test]
fn clock_rebases_after_pause() {
    let mut clock = Clock::new();
    clock.advance(1000.0);
    clock.pause();
    assert!(clock.is_paused());

    let resumed = clock.advance(9000.0);
    assert_eq!(resumed.delta, 0.0);
    assert_eq!(resumed.rate, 0.0);
    assert!(!clock.is_paused());

    let next = clock.advance(9032.0);
    assert_eq!(next.rate, 2.0);
    assert_eq!(clock.since(9000.0), 32.0);
}

// ── Fade transition ───────────────────────────────────────────────────────────

#[test]
fn fade_rises_then_falls() {
    let mut fade = Transition::new();
    assert!(!fade.started());

    fade.advance();
    assert_eq!(fade.phase(), FadePhase::FadingOut);
    assert_eq!(fade.alpha(), 0.0);

    let mut previous = 0.0;
    while !fade.ready() {
        fade.advance();
        assert!(fade.alpha() >= previous);
        previous = fade.alpha();
    }
    assert_eq!(fade.alpha(), 1.0);

    while !fade.finished() {
        fade.advance();
        assert!(fade.alpha() <= previous);
        previous = fade.alpha();
    }
    assert_eq!(fade.alpha(), 0.0);

    fade.advance();
    assert_eq!(fade.phase(), FadePhase::Idle);
}

#[test]
fn fade_takes_one_hundred_steps_each_way() {
    let mut fade = Transition::new();
    fade.advance();
    for _ in 0..99 {
        fade.advance();
    }
    assert!(!fade.ready());
    fade.advance();
    assert!(fade.ready());
}

#[test]
fn fade_reset_returns_to_idle() {
    let mut fade = Transition::new();
    for _ in 0..40 {
        fade.advance();
    }
    fade.reset();
    assert_eq!(fade.phase(), FadePhase::Idle);
    assert_eq!(fade.alpha(), 0.0);
    assert!(!fade.started());
}

// ── Audio ─────────────────────────────────────────────────────────────────────

#[test]
fn crossfade_raises_finished_flag() {
    let mut audio = AudioDirector::new();
    audio.play_track(Track::Title, true);
    audio.crossfade_to(Track::Level1, true);
    assert!(!audio.transition_finished());

    let mut ticks = 0;
    while !audio.transition_finished() && ticks < 500 {
        audio.tick();
        ticks += 1;
    }
    assert!(audio.transition_finished());
    assert_eq!(audio.current_track(), Some(Track::Level1));
    assert_eq!(audio.track_gain(), audio.user_track_gain());

    let played = audio.drain().into_iter().any(|c| {
        matches!(
            c,
            AudioCommand::PlayTrack {
                track: Track::Level1,
                looped: true,
                ..
            }
        )
    });
    assert!(played);

    audio.acknowledge_transition();
    assert!(!audio.transition_finished());
}

#[test]
fn crossfade_reaches_silence_before_switching() {
    let mut audio = AudioDirector::new();
    audio.crossfade_to(Track::Boss, true);
    while audio.current_track() != Some(Track::Boss) {
        audio.tick();
    }
    assert_eq!(audio.track_gain(), 0.0);
}

#[test]
fn volume_buttons_stop_at_limits() {
    let mut audio = AudioDirector::new();
    for _ in 0..5 {
        assert!(VolumeButton::MusicUp.press(&mut audio));
    }
    assert_eq!(audio.user_track_gain(), 1.0);
    assert!(!VolumeButton::MusicUp.is_visible(&audio));
    assert!(!VolumeButton::MusicUp.press(&mut audio));

    for _ in 0..5 {
        VolumeButton::EffectsDown.press(&mut audio);
    }
    assert_eq!(audio.user_effects_gain(), 0.0);
    assert!(!VolumeButton::EffectsDown.is_visible(&audio));
}

#[test]
fn pan_is_clamped_and_reported_once() {
    let mut audio = AudioDirector::new();
    audio.set_pan(3.0);
    audio.set_pan(1.0);
    assert_eq!(audio.pan(), 1.0);
    assert_eq!(audio.drain(), vec![AudioCommand::SetPan(1.0)]);
}

// ── Assets ────────────────────────────────────────────────────────────────────

fn poll_until(loader: &mut AssetLoader, done: impl Fn(&AssetLoader) -> bool) {
    for _ in 0..500 {
        loader.poll();
        if done(loader) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn built_in_assets_load_immediately() {
    let mut loader = AssetLoader::start(AssetManifest::standard(), None);
    loader.poll();
    assert!(loader.is_loaded());
    assert_eq!(loader.progress(), 1.0);
    assert_eq!(loader.streamed_loaded(), 4);
}

#[test]
fn missing_asset_stalls_loading() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = AssetManifest::standard();
    let total = manifest.entries.len();

    let mut loader = AssetLoader::start(manifest, Some(dir.path().to_path_buf()));
    poll_until(&mut loader, |l| l.failed().len() == total);

    assert_eq!(loader.failed().len(), total);
    assert!(!loader.is_loaded());
    assert_eq!(loader.progress(), 0.0);
}

#[test]
fn files_on_disk_load_completely() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = AssetManifest::standard();
    for id in &manifest.entries {
        let path = dir.path().join(id.relative_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"data").unwrap();
    }

    let mut loader = AssetLoader::start(manifest, Some(dir.path().to_path_buf()));
    poll_until(&mut loader, |l| l.is_loaded() && l.streamed_loaded() == 4);

    assert!(loader.is_loaded());
    assert!(loader.failed().is_empty());
    assert_eq!(loader.streamed_loaded(), 4);
}

#[test]
fn required_tier_comes_first() {
    let manifest = AssetManifest::standard();
    let required = manifest.required_count();
    assert_eq!(required, 16);
    assert!(manifest.entries[..required]
        .iter()
        .all(|id| id.tier() == space_shooter::assets::Tier::Required));
    assert_eq!(
        AssetId::Track(Track::Boss).relative_path(),
        "media/audio/soundtrack/boss-fight.mp3"
    );
}

// ── Interface ─────────────────────────────────────────────────────────────────

#[test]
fn wrap_text_breaks_on_words() {
    assert_eq!(wrap_text("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
    assert_eq!(wrap_text("tiny enormousword x", 5), vec!["tiny", "enormousword", "x"]);
    assert!(wrap_text("   ", 10).is_empty());
}

#[test]
fn scroll_text_finishes_after_leaving_the_top() {
    let mut text = ScrollText::new("one two three four five six", 200.0, 100.0);
    let mut frames = 0;
    while !text.finished && frames < 100_000 {
        text.advance(1.0);
        frames += 1;
    }
    assert!(text.finished);
    assert!(text.y + text.height() - text.text_size < 0.0);

    text.reset();
    assert!(!text.finished);
    assert_eq!(text.y, 100.0 + text.text_size);
}

#[test]
fn title_options_target_their_screens() {
    let targets: Vec<Screen> = TitleOption::ALL.iter().map(|o| o.target()).collect();
    assert_eq!(
        targets,
        vec![Screen::Playing, Screen::Options, Screen::HowTo, Screen::Credits]
    );
    assert!(targets[1..].iter().all(|s| s.has_back_button()));
}

// ── Screens ───────────────────────────────────────────────────────────────────

#[test]
fn game_starts_on_loading_then_goes_to_intro() {
    let mut driver = Driver::new(GameConfig::default());
    assert_eq!(driver.game.screen(), Screen::Loading);

    let frame = driver.step(&[]);
    assert_eq!(driver.game.screen(), Screen::Intro);
    assert!(frame.audio.iter().any(|c| matches!(
        c,
        AudioCommand::PlayTrack {
            track: Track::Title,
            ..
        }
    )));
}

#[test]
fn loading_shows_failed_asset() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig {
        asset_root: Some(dir.path().to_path_buf()),
        ..GameConfig::default()
    };
    let mut driver = Driver::new(config);

    let mut shown = false;
    for _ in 0..500 {
        let frame = driver.step(&[]);
        shown = frame.contains(|c| {
            matches!(c, DrawCommand::Text { text, .. } if text.starts_with("could not load"))
        });
        if shown {
            break;
        }
        thread::sleep(Duration::from_millis(2));
    }
    assert!(shown);
    assert_eq!(driver.game.screen(), Screen::Loading);
}

#[test]
fn skip_leaves_intro_for_title() {
    let mut driver = Driver::new(GameConfig::default());
    driver.step(&[]);
    driver.step(&[UiEvent::Skip]);
    assert_eq!(driver.game.screen(), Screen::Title);
    assert!(!driver.game.interface().intro.finished);
}

#[test]
fn options_page_adjusts_volume_and_goes_back() {
    let mut driver = Driver::new(GameConfig::default());
    driver.game.change_screen(Screen::Title);

    driver.step(&[UiEvent::Choose(TitleOption::Options)]);
    assert_eq!(driver.game.screen(), Screen::Options);

    driver.step(&[UiEvent::Volume(VolumeButton::MusicUp)]);
    assert!((driver.game.audio().user_track_gain() - 0.6).abs() < 1e-6);

    let frame = driver.step(&[UiEvent::Back]);
    assert_eq!(driver.game.screen(), Screen::Title);
    assert!(!frame.contains(|c| matches!(c, DrawCommand::Button { .. })));
}

#[test]
fn volume_is_ignored_off_the_options_page() {
    let mut driver = Driver::new(GameConfig::default());
    driver.game.change_screen(Screen::Credits);
    driver.step(&[UiEvent::Volume(VolumeButton::MusicUp)]);
    assert_eq!(driver.game.audio().user_track_gain(), 0.5);
}

#[test]
fn change_screen_is_idempotent() {
    let mut game = make_game(GameConfig::default());
    game.change_screen(Screen::HowTo);
    game.change_screen(Screen::HowTo);
    assert_eq!(game.screen(), Screen::HowTo);
}

#[test]
fn pause_rebases_game_clock() {
    let mut driver = Driver::new(GameConfig::default());
    driver.step(&[]);
    driver.game.pause();
    driver.now += 60_000.0;
    driver.step(&[]);
    assert_eq!(driver.game.clock().delta, 0.0);
}

// ── Playing ───────────────────────────────────────────────────────────────────

fn start_session(config: GameConfig) -> Driver {
    let mut driver = Driver::new(config);
    driver.game.change_screen(Screen::Playing);
    let started = driver.step_until(1000, |g| g.world().progress.started);
    assert!(started);
    driver
}

#[test]
fn entry_fade_waits_for_music() {
    let mut driver = Driver::new(GameConfig::default());
    driver.game.change_screen(Screen::Playing);

    let frame = driver.step(&[]);
    assert!(driver.game.world().progress.in_transition);
    assert!(driver.game.touch_controls());
    assert!(frame.contains(|c| matches!(c, DrawCommand::Fade { .. })));

    driver.step_until(1000, |g| g.world().progress.started);
    assert!(driver.game.world().progress.started);
    assert!(!driver.game.world().progress.in_transition);
}

#[test]
fn running_frame_starts_level_one_and_draws_hud() {
    let mut driver = start_session(GameConfig::default());
    let frame = driver.step(&[]);
    assert!(driver.game.world().progress.level1.started);
    assert!(frame.contains(|c| matches!(c, DrawCommand::Hud { lives: 3, score: 0 })));
}

#[test]
fn losing_last_life_leads_to_game_over() {
    let config = GameConfig {
        player_lives: 1,
        ..GameConfig::default()
    };
    let mut driver = start_session(config);
    driver.game.world_mut().player.hit_points = 0;

    let reached = driver.step_until(2000, |g| g.screen() == Screen::GameOver);
    assert!(reached);
    assert!(driver.game.game_over().started);
    assert!(!driver.game.touch_controls());
    assert_eq!(
        driver.game.audio().crossfade().map(|c| c.next),
        Some(Track::GameOver)
    );
    // the session was reset behind the fade
    assert_eq!(driver.game.world().player.lives, 1);
    assert!(!driver.game.world().progress.started);
}

#[test]
fn game_over_returns_to_title() {
    let config = GameConfig {
        player_lives: 1,
        game_over_interval_ms: 500.0,
        ..GameConfig::default()
    };
    let mut driver = start_session(config);
    driver.game.world_mut().player.hit_points = 0;
    driver.step_until(2000, |g| g.screen() == Screen::GameOver);

    let back = driver.step_until(3000, |g| g.screen() == Screen::Title);
    assert!(back);
    assert!(!driver.game.game_over().started);
    assert!(!driver.game.transition().started());
}

/// Push an enemy already out of hit points.  Its kill runs the boss
/// trigger once the death animation ends.
fn push_dying_enemy(game: &mut Game, score: u32) {
    let mut rng = StdRng::seed_from_u64(7);
    let world = game.world_mut();
    let mut enemy = build_enemy(EnemyKind::Patroller, world.canvas_width, &mut rng);
    enemy.x = 100.0;
    enemy.y = 100.0;
    enemy.hit_points = 0;
    world.player.score = score;
    world.enemies.push(enemy);
}

/// At most one of the two level victories and the game over is active,
/// and level 1 never counts as won again once level 2 is running.
fn assert_single_outcome(game: &Game) {
    let progress = &game.world().progress;
    let active = [
        progress.level1.in_victory,
        progress.level2.in_victory,
        game.game_over().started,
    ]
    .iter()
    .filter(|flag| **flag)
    .count();
    assert!(active <= 1, "{active} outcomes active at once");
    if progress.level2.started {
        assert!(!progress.level1.in_victory);
    }
}

impl Driver {
    fn step_checked(&mut self, max_frames: usize, done: impl Fn(&Game) -> bool) -> bool {
        for _ in 0..max_frames {
            if done(&self.game) {
                return true;
            }
            self.step(&[]);
            assert_single_outcome(&self.game);
        }
        done(&self.game)
    }
}

#[test]
fn boss_defeat_leads_to_victory() {
    let mut driver = start_session(GameConfig::default());
    driver.step(&[]);
    push_dying_enemy(&mut driver.game, 9_900);

    assert!(driver.step_until(500, |g| g.world().bosses.len() == 1));
    assert!(driver.game.world().progress.level1.boss_started);
    assert_eq!(driver.game.world().bosses[0].kind, BossKind::BouncingSkull);

    driver.game.world_mut().bosses[0].hit_points = 0;
    let won = driver.step_until(5000, |g| g.world().progress.level1.in_victory);
    assert!(won);
    assert!(driver.game.world().progress.level1.boss_finished);
    assert_eq!(driver.game.audio().current_track(), Some(Track::Victory));
}

#[test]
fn campaign_runs_through_both_levels_to_the_ending() {
    let config = GameConfig {
        player_lives: 1000,
        victory_interval_ms: 100.0,
        ..GameConfig::default()
    };
    let mut driver = start_session(config);
    driver.step(&[]);

    // ── Level 1 boss and victory ──────────────────────────────────────────────
    push_dying_enemy(&mut driver.game, 9_900);
    assert!(driver.step_checked(500, |g| g.world().bosses.len() == 1));
    driver.game.world_mut().bosses[0].hit_points = 0;

    assert!(driver.step_checked(5000, |g| g.world().progress.level1.in_victory));
    assert!(driver.step_checked(1000, |g| g.world().progress.level1.finished));
    assert_eq!(
        driver.game.audio().crossfade().map(|c| c.next),
        Some(Track::Level2)
    );

    // ── Level 2 ───────────────────────────────────────────────────────────────
    assert!(driver.step_checked(1000, |g| g.world().progress.level2.started));
    assert!(!driver.game.world().progress.level1.in_victory);

    // Long enough for the level-2 music to settle; level 1 stays done.
    driver.step_checked(300, |_| false);
    assert!(!driver.game.world().progress.level1.in_victory);

    push_dying_enemy(&mut driver.game, 60_000);
    assert!(driver.step_checked(500, |g| !g.world().bosses.is_empty()));
    assert!(driver.game.world().progress.level2.boss_started);
    assert_eq!(driver.game.world().bosses[0].kind, BossKind::Jorhan);
    driver.game.world_mut().bosses[0].hit_points = 0;

    assert!(driver.step_checked(5000, |g| g.world().progress.level2.in_victory));

    // ── Ending ────────────────────────────────────────────────────────────────
    assert!(driver.step_checked(1000, |g| g.screen() == Screen::Ending));
    assert!(driver.game.world().progress.level2.finished);
    assert!(!driver.game.touch_controls());

    assert!(driver.step_checked(20_000, |g| g.screen() == Screen::Title));
    assert!(!driver.game.touch_controls());
    assert!(!driver.game.world().progress.level1.started);
    assert_eq!(driver.game.world().player.score, 0);
    assert!(!driver.game.interface().ending.finished);
}
