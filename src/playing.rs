//! The playing screen: entry fade, the per-frame check pass, level
//! victories and the slide into game over.

use rand::Rng;

use crate::assets::{Effect, ImageId, Track};
use crate::audio::AudioDirector;
use crate::combat::{self, PlayerDeath};
use crate::entities::{BossKind, DeathTick, EnemyKind, Level};
use crate::game::Game;
use crate::input::InputState;
use crate::interface;
use crate::motion;
use crate::registry::World;
use crate::render::{DrawCommand, Frame};
use crate::screen::Screen;
use crate::spawner;

/// Enemies and power-ups are dropped once this far below the canvas.
pub const OFFSCREEN_MARGIN: f32 = 30.0;

/// What the check pass reports back to the state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// The player's last death animation just ended with no lives left.
    pub out_of_lives: bool,
    pub enemies_destroyed: u32,
    pub bosses_destroyed: u32,
}

// ── Check pass ────────────────────────────────────────────────────────────────

/// Run every per-frame rule after movement, in a fixed order: keep the
/// player on screen, player fire, player death, power-up spawn and pickup,
/// enemy spawn, enemy removal/death/fire, boss fire/death, shot sweep,
/// exploding boss shots, then collisions.
pub fn check_all(
    world: &mut World,
    audio: &mut AudioDirector,
    rng: &mut impl Rng,
    now: f64,
) -> CheckReport {
    let mut report = CheckReport::default();
    let (width, height) = (world.canvas_width, world.canvas_height);

    // ── Player ────────────────────────────────────────────────────────────────
    motion::clamp_player(&mut world.player, width, height);
    combat::player_shoot(&mut world.player, &mut world.player_shots, audio, now);

    match combat::update_player_death(&mut world.player, now) {
        PlayerDeath::OutOfLives => report.out_of_lives = true,
        PlayerDeath::Started | PlayerDeath::Revived | PlayerDeath::Alive => {}
    }

    // ── Power-ups ─────────────────────────────────────────────────────────────
    if world.spawn.power_up.due(now) && world.player.allow_player {
        world.spawn.power_up.reference = now;
        spawner::spawn_power_up(world, rng);
    }

    for index in 0..world.power_ups.len() {
        let power_up = &world.power_ups[index];
        if power_up.active && world.player.lives > 0 {
            let kind = power_up.kind;
            combat::apply_power_up(&mut world.player, kind);
            world.power_ups.mark(index);
            audio.play_one_shot(Effect::PowerUp);
            tracing::debug!(?kind, "power-up applied");
        } else if power_up.y > height + OFFSCREEN_MARGIN {
            world.power_ups.mark(index);
        }
    }
    world.power_ups.compact();

    // ── Enemies ───────────────────────────────────────────────────────────────
    if world.spawn.enemy.due(now)
        && world.player.allow_player
        && !world.progress.in_boss_fight()
    {
        world.spawn.enemy.reference = now;
        spawner::spawn_enemy(world, rng);
    }

    let mut kills = 0;
    for index in 0..world.enemies.len() {
        let enemy = &mut world.enemies[index];

        if enemy.y > height + OFFSCREEN_MARGIN {
            world.enemies.mark(index);
            continue;
        }

        if enemy.dead {
            if enemy.death.tick(now) == DeathTick::Completed {
                if enemy.kind == EnemyKind::Kamikaze {
                    world.enemy_shots.extend(combat::kamikaze_burst(enemy));
                    audio.play_one_shot(Effect::EnemyShot);
                }
                let points = enemy.score_points;
                world.enemies.mark(index);
                combat::award(&mut world.player, points);
                kills += 1;
            }
            continue;
        }

        if enemy.hit_points <= 0 {
            enemy.dead = true;
            continue;
        }

        if enemy.can_shoot && combat::enemy_volley_ready(&enemy.volley, now) {
            combat::enemy_fire(enemy, &mut world.enemy_shots, audio, now);
        }
    }
    world.enemies.compact();
    report.enemies_destroyed = kills;

    for _ in 0..kills {
        if world.player.lives > 0 {
            spawner::check_boss_trigger(world, audio, rng);
        }
    }

    // ── Bosses ────────────────────────────────────────────────────────────────
    let mut boss_kills = 0;
    for index in 0..world.bosses.len() {
        let boss = &mut world.bosses[index];

        if boss.dead {
            if boss.death.tick(now) == DeathTick::Completed {
                let points = boss.score_points;
                world.bosses.mark(index);
                combat::award(&mut world.player, points);
                boss_kills += 1;
            }
            continue;
        }

        if !boss.is_animating && boss.can_shoot && combat::boss_volley_ready(&boss.volley, now) {
            combat::boss_fire(boss, &mut world.enemy_shots, audio, now);
        }

        if boss.hit_points <= 0 {
            boss.dead = true;
        }
    }
    world.bosses.compact();
    report.bosses_destroyed = boss_kills;

    for _ in 0..boss_kills {
        combat::boss_defeated(world, audio);
        if world.player.lives > 0 {
            spawner::check_boss_trigger(world, audio, rng);
        }
    }

    // ── Shots ─────────────────────────────────────────────────────────────────
    for list in [&mut world.player_shots, &mut world.enemy_shots] {
        for index in 0..list.len() {
            let shot = &list[index];
            if motion::is_shot_offscreen(shot, width, height) || shot.endurance.depleted() {
                list.mark(index);
            }
        }
        list.compact();
    }

    combat::explode_boss_shots(world);
    combat::resolve_collisions(world);

    report
}

// ── Drawing ───────────────────────────────────────────────────────────────────

fn enemy_image(kind: EnemyKind) -> ImageId {
    match kind {
        EnemyKind::Patroller => ImageId::Enemy1,
        EnemyKind::Tracker => ImageId::Enemy2,
        EnemyKind::Kamikaze => ImageId::Enemy3,
        EnemyKind::Strafer => ImageId::Enemy4,
    }
}

fn boss_image(kind: BossKind) -> ImageId {
    match kind {
        BossKind::BouncingSkull => ImageId::BossLevel1,
        BossKind::Jorhan => ImageId::BossLevel2,
    }
}

pub fn level_backdrop(level: Level) -> ImageId {
    match level {
        Level::One => ImageId::BackgroundLevel1,
        Level::Two => ImageId::BackgroundLevel2,
    }
}

/// Background, power-ups, shots, player, enemies, bosses, then the HUD.
pub fn draw_world(world: &World, frame: &mut Frame) {
    frame.push(DrawCommand::Clear);
    frame.push(DrawCommand::Background {
        image: Some(level_backdrop(world.progress.current_level())),
        scroll: world.background.scroll,
    });

    for power_up in &world.power_ups {
        frame.push(DrawCommand::PowerUp {
            x: power_up.x,
            y: power_up.y,
            size: power_up.width,
            kind: power_up.kind,
        });
    }

    for shot in world.player_shots.iter().chain(world.enemy_shots.iter()) {
        frame.push(DrawCommand::Shot {
            x: shot.x,
            y: shot.y,
            shape: shot.shape,
            angle: shot.angle,
            source: shot.source,
        });
    }

    let player = &world.player;
    if player.death.visible {
        frame.push(DrawCommand::Sprite {
            image: ImageId::Player,
            x: player.x,
            y: player.y,
            width: player.width,
            height: player.height,
            angle: 0.0,
        });
    }

    for enemy in world.enemies.iter().filter(|e| e.death.visible) {
        frame.push(DrawCommand::Sprite {
            image: enemy_image(enemy.kind),
            x: enemy.x,
            y: enemy.y,
            width: enemy.width,
            height: enemy.height,
            angle: enemy.angle,
        });
    }
    for boss in world.bosses.iter().filter(|b| b.death.visible) {
        frame.push(DrawCommand::Sprite {
            image: boss_image(boss.kind),
            x: boss.x,
            y: boss.y,
            width: boss.width,
            height: boss.height,
            angle: boss.angle,
        });
    }

    frame.push(DrawCommand::Hud {
        lives: player.lives,
        score: player.score,
    });
}

// ── Sub-machine ───────────────────────────────────────────────────────────────

impl Game {
    pub(crate) fn update_playing(&mut self, input: &InputState, frame: &mut Frame) {
        let now = self.clock.current_time;

        if !self.world.progress.started && !self.world.progress.in_transition {
            self.world.progress.in_transition = true;
            self.audio.crossfade_to(Track::Level1, true);
            self.touch_controls = true;
            tracing::info!("session starting");
            self.draw_entry(frame);
            return;
        }

        if self.world.progress.in_transition {
            if self.audio.transition_finished() && self.transition.ready() {
                self.audio.acknowledge_transition();
                self.world.progress.in_transition = false;
                self.world.progress.started = true;
            }
            self.transition.advance();
            self.draw_entry(frame);
            return;
        }

        if !self.world.progress.started || self.game_over.started {
            return;
        }

        self.register_progress(now);

        self.world.player.controls = if self.world.player.allow_player {
            *input
        } else {
            InputState::idle()
        };

        if let Some(pan) = motion::move_all(&mut self.world, self.clock.rate) {
            self.audio.set_pan(pan);
        }

        let report = check_all(&mut self.world, &mut self.audio, &mut self.rng, now);
        if report.out_of_lives {
            self.transition.reset();
            self.audio.acknowledge_transition();
            self.game_over.in_transition = true;
            tracing::info!(score = self.world.player.score, "out of lives");
        }

        draw_world(&self.world, frame);

        let fade_advanced = self.advance_level_transition(now);
        self.advance_tail_or_game_over(fade_advanced);

        if self.transition.started() {
            frame.push(DrawCommand::Fade {
                alpha: self.transition.alpha(),
            });
        }
    }

    /// Level start and victory bookkeeping at the top of a running frame.
    fn register_progress(&mut self, now: f64) {
        let progress = &mut self.world.progress;

        if !progress.level1.started {
            progress.level1.started = true;
            tracing::info!("level 1 started");
            return;
        }

        // Level 1 stays finished once level 2 is under way.
        let level = if progress.level1.boss_finished
            && !progress.level1.in_victory
            && !progress.level1.finished
        {
            Level::One
        } else if progress.level2.boss_finished && !progress.level2.in_victory {
            Level::Two
        } else {
            return;
        };

        if self.audio.transition_finished() {
            self.audio.acknowledge_transition();
            progress.level_mut(level).in_victory = true;
            progress.victory.reference_time = now;
            tracing::info!(?level, "victory");
        }
    }

    /// After the victory timer, fade to the next level (or the ending).
    /// Returns true if the fade was advanced.
    fn advance_level_transition(&mut self, now: f64) -> bool {
        if self.game_over.in_transition {
            return false;
        }

        let progress = &mut self.world.progress;
        let elapsed = now - progress.victory.reference_time > progress.victory.interval;

        if progress.level1.in_victory && !progress.level2.started && elapsed {
            self.transition.advance();
            if self.transition.ready() && !progress.level1.finished {
                progress.level1.finished = true;
                self.audio.crossfade_to(Track::Level2, true);
            } else if self.transition.finished() {
                progress.level2.started = true;
                progress.level1.in_victory = false;
                self.transition.advance();
                tracing::info!("level 2 started");
            }
            return true;
        }

        if progress.level2.in_victory && !progress.level2.finished && elapsed {
            self.transition.advance();
            if self.transition.ready() {
                progress.level2.finished = true;
                self.audio.crossfade_to(Track::Level2, true);
                self.touch_controls = false;
                self.change_screen(Screen::Ending);
            }
            return true;
        }

        false
    }

    /// Finish a leftover fade (the tail of the entry fade-in), or run the
    /// fade into the game-over screen.
    fn advance_tail_or_game_over(&mut self, fade_advanced: bool) {
        if self.game_over.in_transition {
            if self.transition.ready() {
                return;
            }
            self.transition.advance();
            if self.transition.ready() {
                self.audio.crossfade_to(Track::GameOver, false);
                self.game_over.in_transition = false;
                self.game_over.started = true;
                self.reset_game();
                self.touch_controls = false;
                self.change_screen(Screen::GameOver);
            }
            return;
        }

        if !fade_advanced
            && self.transition.started()
            && !self.transition.finished()
            && !self.game_over.started
        {
            self.transition.advance();
            if self.transition.finished() {
                self.transition.advance();
            }
        }
    }

    fn draw_entry(&self, frame: &mut Frame) {
        frame.push(DrawCommand::Clear);
        frame.push(DrawCommand::Background {
            image: None,
            scroll: 0.0,
        });
        interface::draw_title(frame, self.world.canvas_width, self.world.canvas_height);
        frame.push(DrawCommand::Fade {
            alpha: self.transition.alpha(),
        });
    }
}
