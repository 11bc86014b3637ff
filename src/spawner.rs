//! Spawning policy: when and what to create.
//!
//! Enemies and power-ups come on shrinking timers, bosses on score
//! thresholds.  All randomness comes through the injected `rng`.

use std::f32::consts::PI;

use rand::Rng;

use crate::assets::Track;
use crate::audio::AudioDirector;
use crate::config::GameConfig;
use crate::entities::{
    Boss, BossKind, Circle, DeathAnimation, Endurance, Enemy, EnemyKind, Level, PowerUp,
    PowerUpKind, ShotShape, ShotTemplate, Volley, ENEMY_START_ANGLE, POWER_UP_SIZE,
};
use crate::registry::World;

// ── Timers ────────────────────────────────────────────────────────────────────

pub const ENEMY_SPAWN_FLOOR: f64 = 7_000.0;
pub const POWER_UP_SPAWN_FLOOR: f64 = 10_000.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTimer {
    pub interval: f64,
    pub reference: f64,
}

impl SpawnTimer {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            reference: 0.0,
        }
    }

    pub fn due(&self, now: f64) -> bool {
        now - self.reference > self.interval
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTimers {
    pub enemy: SpawnTimer,
    pub power_up: SpawnTimer,
}

impl SpawnTimers {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            enemy: SpawnTimer::new(config.enemy_spawn_interval_ms),
            power_up: SpawnTimer::new(config.power_up_spawn_interval_ms),
        }
    }
}

// ── Enemy stat table ──────────────────────────────────────────────────────────

struct EnemyStats {
    width: f32,
    height: f32,
    speed_x: f32,
    speed_y: f32,
    hit_points: i32,
    score_points: u32,
    shot: ShotTemplate,
    volley: Volley,
    can_shoot: bool,
    death: DeathAnimation,
}

fn round_shot(width: f32, height: f32, radius: f32, endurance: i32, speed: f32) -> ShotTemplate {
    ShotTemplate {
        offset_x: width / 2.0,
        offset_y: height / 2.0,
        shape: ShotShape::Circle { radius },
        endurance: Endurance::Finite(endurance),
        speed,
    }
}

fn needle_shot(
    width: f32,
    height: f32,
    shot_width: f32,
    shot_height: f32,
    endurance: i32,
    speed: f32,
) -> ShotTemplate {
    ShotTemplate {
        offset_x: (width - shot_width) / 2.0,
        offset_y: height / 2.0,
        shape: ShotShape::Rect {
            width: shot_width,
            height: shot_height,
        },
        endurance: Endurance::Finite(endurance),
        speed,
    }
}

fn enemy_stats(kind: EnemyKind, rng: &mut impl Rng) -> EnemyStats {
    match kind {
        EnemyKind::Patroller => EnemyStats {
            width: 70.0,
            height: 70.0,
            speed_x: 0.6 + rng.gen::<f32>(),
            speed_y: (0.5 + rng.gen::<f32>()) / 3.0,
            hit_points: 1,
            score_points: 300,
            shot: round_shot(70.0, 70.0, 10.0, 1, 2.0),
            volley: Volley::new((2000.0 + 1500.0 * rng.gen::<f64>()).round(), 0.0, 1),
            can_shoot: true,
            death: DeathAnimation::new(12, 100.0),
        },
        EnemyKind::Tracker => EnemyStats {
            width: 80.0,
            height: 80.0,
            speed_x: 0.6 + rng.gen::<f32>(),
            speed_y: (0.5 + rng.gen::<f32>()) / 3.0,
            hit_points: 2,
            score_points: 400,
            shot: needle_shot(80.0, 80.0, 4.0, 10.0, 2, 2.0),
            volley: Volley::new((2000.0 + 1500.0 * rng.gen::<f64>()).round(), 0.0, 1),
            can_shoot: true,
            death: DeathAnimation::new(10, 150.0),
        },
        // Never fires on its own; the template is used for the death burst.
        EnemyKind::Kamikaze => EnemyStats {
            width: 60.0,
            height: 80.0,
            speed_x: 1.5 + rng.gen::<f32>(),
            speed_y: 2.0 + rng.gen::<f32>(),
            hit_points: 3,
            score_points: 4000,
            shot: round_shot(60.0, 80.0, 15.0, 2, 3.0),
            volley: Volley::new(0.0, 0.0, 1),
            can_shoot: false,
            death: DeathAnimation::new(10, 100.0),
        },
        EnemyKind::Strafer => EnemyStats {
            width: 80.0,
            height: 120.0,
            speed_x: 2.5 + rng.gen::<f32>(),
            speed_y: 2.0 + rng.gen::<f32>(),
            hit_points: 4,
            score_points: 2500,
            shot: needle_shot(80.0, 120.0, 3.0, 30.0, 4, 3.0),
            volley: Volley::new(1000.0, 300.0, 5),
            can_shoot: false,
            death: DeathAnimation::new(10, 100.0),
        },
    }
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Pick a kind for the current level: 1–2 until level 1 is finished, 3–4
/// once level 2 has started, nothing in between.
pub fn pick_enemy_kind(world: &World, rng: &mut impl Rng) -> Option<EnemyKind> {
    let progress = &world.progress;
    if !progress.level1.finished {
        Some(if rng.gen_bool(0.5) {
            EnemyKind::Patroller
        } else {
            EnemyKind::Tracker
        })
    } else if progress.level2.started {
        Some(if rng.gen_bool(0.5) {
            EnemyKind::Kamikaze
        } else {
            EnemyKind::Strafer
        })
    } else {
        None
    }
}

/// Build one enemy of `kind` just above the top edge.
pub fn build_enemy(kind: EnemyKind, canvas_width: f32, rng: &mut impl Rng) -> Enemy {
    let stats = enemy_stats(kind, rng);
    let x = rng.gen::<f32>() * canvas_width * 0.9 + 50.0;
    let y = -30.0 - rng.gen::<f32>() * 30.0;

    Enemy {
        kind,
        x,
        y,
        width: stats.width,
        height: stats.height,
        speed_x: stats.speed_x,
        speed_y: stats.speed_y,
        angle: ENEMY_START_ANGLE,
        angle_speed: PI / 90.0,
        hit_points: stats.hit_points,
        score_points: stats.score_points,
        can_shoot: stats.can_shoot,
        volley: stats.volley,
        shot: stats.shot,
        death: stats.death,
        dead: false,
        collision: Circle {
            x: x + stats.width / 2.0,
            y: y + stats.height / 2.0,
            radius: stats.width * (2.0 / 5.0),
        },
    }
}

/// Spawn one enemy for the current level and shorten the enemy timer by a
/// random 300–599 ms, never below the floor.
pub fn spawn_enemy(world: &mut World, rng: &mut impl Rng) -> Option<EnemyKind> {
    let kind = pick_enemy_kind(world, rng)?;
    let enemy = build_enemy(kind, world.canvas_width, rng);
    world.enemies.push(enemy);

    let timer = &mut world.spawn.enemy;
    timer.interval -= (rng.gen::<f64>() * 300.0 + 300.0).floor();
    timer.interval = timer.interval.max(ENEMY_SPAWN_FLOOR);

    tracing::trace!(?kind, next_in = timer.interval, "enemy spawned");
    Some(kind)
}

/// Spawn one falling power-up and shorten the power-up timer by up to
/// 600 ms, never below the floor.
pub fn spawn_power_up(world: &mut World, rng: &mut impl Rng) -> PowerUpKind {
    let timer = &mut world.spawn.power_up;
    timer.interval -= rng.gen::<f64>() * 600.0;
    timer.interval = timer.interval.max(POWER_UP_SPAWN_FLOOR);

    let x = rng.gen::<f32>() * world.canvas_width * 0.9 + 50.0;
    let y = -30.0 - rng.gen::<f32>() * 30.0;
    let speed_y = (0.5 + rng.gen::<f32>()) / 3.0;
    // Rounding 1 + 4r makes the two end kinds half as likely.
    let roll = (rng.gen::<f32>() * 4.0 + 1.0).round() as u8;
    let kind = PowerUpKind::try_from(roll).unwrap_or(PowerUpKind::SingleShot);

    world.power_ups.push(PowerUp {
        x,
        y,
        width: POWER_UP_SIZE,
        height: POWER_UP_SIZE,
        speed_y,
        active: false,
        kind,
    });

    tracing::trace!(?kind, "power-up spawned");
    kind
}

// ── Bosses ────────────────────────────────────────────────────────────────────

pub const BOSS_START_Y: f32 = -200.0;
pub const BOSS_DEATH_STEPS: u32 = 50;
pub const BOSS_DEATH_INTERVAL: f64 = 600.0;

/// Build the boss for `level`, centered above the screen with its entry
/// animation on.
pub fn build_boss(level: Level, world: &World, rng: &mut impl Rng) -> Boss {
    let kind = BossKind::for_level(level);
    let direction = if rng.gen::<f32>() > 0.5 { 1.0 } else { -1.0 };
    let wide = world.is_wide_canvas();

    let (width, height, hit_points, score_points, speed_x, can_move, shot, volley) = match kind {
        BossKind::BouncingSkull => {
            let radius = if wide { 30.0 } else { 20.0 };
            (
                100.0,
                100.0,
                50,
                10_000,
                4.0 * direction,
                true,
                round_shot(100.0, 100.0, radius, 10, 3.0),
                Volley::new(2000.0, 300.0, 4),
            )
        }
        BossKind::Jorhan => {
            let speed = if wide { 6.0 } else { 3.0 };
            (
                140.0,
                180.0,
                100,
                50_000,
                speed * direction,
                false,
                ShotTemplate {
                    offset_x: 70.0,
                    offset_y: 90.0,
                    shape: ShotShape::Circle { radius: 20.0 },
                    endurance: Endurance::Unbreakable,
                    speed: 3.5,
                },
                // Volleys follow the movement pattern, not a timer.
                Volley::new(0.0, 250.0, 6),
            )
        }
    };

    let x = world.canvas_width * 0.5 - width / 2.0;
    Boss {
        kind,
        x,
        y: BOSS_START_Y,
        width,
        height,
        speed_x,
        angle: 0.0,
        hit_points,
        score_points,
        is_animating: true,
        can_move,
        can_shoot: true,
        volley,
        shot,
        death: DeathAnimation::new(BOSS_DEATH_STEPS, BOSS_DEATH_INTERVAL).accelerating(),
        dead: false,
        collision: Circle {
            x: world.canvas_width * 0.5,
            y: BOSS_START_Y + height / 2.0,
            radius: width / 2.0,
        },
    }
}

/// Bring in the boss for `level`, mark its fight started and switch to
/// the boss track.
pub fn call_boss(level: Level, world: &mut World, audio: &mut AudioDirector, rng: &mut impl Rng) {
    world.progress.level_mut(level).boss_started = true;
    let boss = build_boss(level, world, rng);
    tracing::info!(?level, kind = ?boss.kind, score = world.player.score, "boss called");
    world.bosses.push(boss);
    audio.crossfade_to(Track::Boss, true);
}

/// Call a boss if the score just crossed a threshold.  Level 1 uses an
/// inclusive comparison, level 2 a strict one and also needs level 2 running.
pub fn check_boss_trigger(world: &mut World, audio: &mut AudioDirector, rng: &mut impl Rng) {
    let score = world.player.score;
    let progress = &world.progress;

    if score >= progress.level1.boss_score && !progress.level1.boss_started {
        call_boss(Level::One, world, audio, rng);
    } else if score > progress.level2.boss_score
        && !progress.level2.boss_started
        && progress.level2.started
    {
        call_boss(Level::Two, world, audio, rng);
    }
}
