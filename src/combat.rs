//! Shooting, collisions, death animations and power-up effects.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::assets::{Effect, Track};
use crate::audio::AudioDirector;
use crate::entities::{
    Boss, BossKind, Circle, Collider, DeathTick, Endurance, Enemy, EnemyKind, Level, Player,
    PlayerShotType, PowerUpKind, Rect, Shot, ShotShape, ShotSource, ShotTemplate, Volley,
};
use crate::registry::{EntityList, World};

/// Level-2 boss shots start exploding once the boss drops below this.
pub const EXPLOSION_HP_THRESHOLD: i32 = 50;
const FRAGMENT_COUNT: usize = 8;
const FRAGMENT_ENDURANCE: i32 = 5;
const BURST_COUNT: usize = 8;

// ── Collision primitives ──────────────────────────────────────────────────────

/// Touching circles count as colliding.
pub fn circle_vs_circle(a: &Circle, b: &Circle) -> bool {
    let distance = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
    distance <= a.radius + b.radius
}

/// Clamp the circle's center onto the rectangle and compare the distance
/// to that point with the radius.
pub fn circle_vs_rect(circle: &Circle, rect: &Rect) -> bool {
    let test_x = circle.x.clamp(rect.x, rect.x + rect.width);
    let test_y = circle.y.clamp(rect.y, rect.y + rect.height);
    (circle.x - test_x).powi(2) + (circle.y - test_y).powi(2) <= circle.radius.powi(2)
}

pub fn hits(circle: &Circle, collider: &Collider) -> bool {
    match collider {
        Collider::Circle(other) => circle_vs_circle(circle, other),
        Collider::Rect(rect) => circle_vs_rect(circle, rect),
    }
}

// ── Volleys ───────────────────────────────────────────────────────────────────

/// Regular enemies: strictly more than the volley interval must have passed.
pub fn enemy_volley_ready(volley: &Volley, now: f64) -> bool {
    now - volley.interval_reference > volley.interval
        && now - volley.sequence_reference >= volley.sequence_interval
}

/// Bosses: both comparisons are inclusive.
pub fn boss_volley_ready(volley: &Volley, now: f64) -> bool {
    now - volley.interval_reference >= volley.interval
        && now - volley.sequence_reference >= volley.sequence_interval
}

/// Count one shot of the volley.  Returns true when this shot ends it.
pub fn advance_volley(volley: &mut Volley, now: f64) -> bool {
    volley.sequence_reference = now;
    volley.step += 1;
    if volley.step >= volley.max_step {
        volley.step = 0;
        volley.interval_reference = now;
        true
    } else {
        false
    }
}

// ── Player fire ───────────────────────────────────────────────────────────────

pub fn player_shot_pattern(player: &Player) -> Vec<Shot> {
    let (x, y) = player.center();
    let (radius, endurance, speed, angles): (f32, i32, f32, &[f32]) = match player.shot_type {
        PlayerShotType::Single => (10.0, 1, 2.0, &[-FRAC_PI_2]),
        PlayerShotType::Spread => (10.0, 1, 2.0, &[-3.0 * FRAC_PI_4, -FRAC_PI_2, -FRAC_PI_4]),
        PlayerShotType::Heavy => (20.0, 4, 1.0, &[-FRAC_PI_2]),
    };

    angles
        .iter()
        .map(|&angle| Shot {
            x,
            y,
            shape: ShotShape::Circle { radius },
            speed,
            angle,
            endurance: Endurance::Finite(endurance),
            source: ShotSource::Player(player.shot_type),
        })
        .collect()
}

fn player_shot_effect(shot_type: PlayerShotType) -> Effect {
    match shot_type {
        PlayerShotType::Single => Effect::PlayerShot1,
        PlayerShotType::Spread => Effect::PlayerShot2,
        PlayerShotType::Heavy => Effect::PlayerShot3,
    }
}

/// Fire if the trigger is held and the shot interval has passed.
pub fn player_shoot(
    player: &mut Player,
    shots: &mut EntityList<Shot>,
    audio: &mut AudioDirector,
    now: f64,
) -> bool {
    if !player.controls.shooting || now - player.shot_reference <= player.shot_interval {
        return false;
    }

    player.shot_reference = now;
    shots.extend(player_shot_pattern(player));
    audio.play_one_shot(player_shot_effect(player.shot_type));
    true
}

// ── Enemy & boss fire ─────────────────────────────────────────────────────────

fn shot_from(x: f32, y: f32, template: &ShotTemplate, angle: f32, source: ShotSource) -> Shot {
    Shot {
        x: x + template.offset_x,
        y: y + template.offset_y,
        shape: template.shape,
        speed: template.speed,
        angle,
        endurance: template.endurance,
        source,
    }
}

/// The eight-way burst a kamikaze leaves behind, starting at its heading.
pub fn kamikaze_burst(enemy: &Enemy) -> Vec<Shot> {
    (0..BURST_COUNT)
        .map(|i| {
            shot_from(
                enemy.x,
                enemy.y,
                &enemy.shot,
                enemy.angle + i as f32 * FRAC_PI_4,
                ShotSource::Enemy(enemy.kind),
            )
        })
        .collect()
}

/// One shot of an enemy volley.  Strafers go back to strafing when the
/// volley ends.
pub fn enemy_fire(
    enemy: &mut Enemy,
    shots: &mut EntityList<Shot>,
    audio: &mut AudioDirector,
    now: f64,
) {
    if advance_volley(&mut enemy.volley, now) && enemy.kind == EnemyKind::Strafer {
        enemy.can_shoot = false;
    }

    match enemy.kind {
        EnemyKind::Kamikaze => shots.extend(kamikaze_burst(enemy)),
        EnemyKind::Patroller | EnemyKind::Tracker | EnemyKind::Strafer => shots.push(shot_from(
            enemy.x,
            enemy.y,
            &enemy.shot,
            enemy.angle,
            ShotSource::Enemy(enemy.kind),
        )),
    }

    audio.play_one_shot(Effect::EnemyShot);
}

/// One shot of a boss volley, fired straight down.  The level-2 boss
/// starts moving again once its volley ends.
pub fn boss_fire(
    boss: &mut Boss,
    shots: &mut EntityList<Shot>,
    audio: &mut AudioDirector,
    now: f64,
) {
    if advance_volley(&mut boss.volley, now) && boss.kind == BossKind::Jorhan {
        boss.can_shoot = false;
        boss.can_move = true;
    }

    shots.push(shot_from(
        boss.x,
        boss.y,
        &boss.shot,
        boss.angle + FRAC_PI_2,
        ShotSource::Boss(boss.kind),
    ));
    audio.play_one_shot(Effect::EnemyShot);
}

// ── Exploding shots ───────────────────────────────────────────────────────────

pub fn explosion_fragments(shot: &Shot) -> Vec<Shot> {
    let radius = shot.radius() / 2.0;
    (0..FRAGMENT_COUNT)
        .map(|i| Shot {
            x: shot.x,
            y: shot.y,
            shape: ShotShape::Circle { radius },
            speed: shot.speed * 2.0,
            angle: shot.angle + i as f32 * (PI / 4.0),
            endurance: Endurance::Finite(FRAGMENT_ENDURANCE),
            source: ShotSource::Fragment,
        })
        .collect()
}

/// During the level-2 boss fight on a wide canvas, a boss shot crossing the
/// vertical midline bursts into fragments once the boss is badly hurt.
/// There is only ever one live boss, so the first one is checked.
pub fn explode_boss_shots(world: &mut World) -> usize {
    if !world.progress.final_boss_active() || !world.is_wide_canvas() {
        return 0;
    }
    let hurt = world
        .bosses
        .first()
        .is_some_and(|boss| boss.hit_points < EXPLOSION_HP_THRESHOLD);
    if !hurt {
        return 0;
    }

    let midline = world.canvas_height / 2.0;
    let mut fragments = Vec::new();
    for index in 0..world.enemy_shots.len() {
        let shot = &world.enemy_shots[index];
        if shot.source == ShotSource::Boss(BossKind::Jorhan) && shot.y >= midline {
            fragments.extend(explosion_fragments(shot));
            world.enemy_shots.mark(index);
        }
    }

    let exploded = world.enemy_shots.compact();
    world.enemy_shots.extend(fragments);
    exploded
}

// ── Collisions ────────────────────────────────────────────────────────────────

/// Resolve every contact of the frame.  Each contact costs both sides one
/// point of hit points or endurance; power-ups are only flagged here.
pub fn resolve_collisions(world: &mut World) {
    let World {
        player,
        player_shots,
        enemies,
        bosses,
        enemy_shots,
        power_ups,
        ..
    } = world;

    let mut hostile = |collision: &Circle, dead: bool, hit_points: &mut i32| {
        if dead {
            return;
        }
        if !player.invincible && circle_vs_circle(collision, &player.collision) {
            player.hit_points -= 1;
            *hit_points -= 1;
        }
        for shot in player_shots.iter_mut() {
            if hits(collision, &shot.collider()) {
                shot.endurance.hit();
                *hit_points -= 1;
            }
        }
    };

    for enemy in enemies.iter_mut() {
        hostile(&enemy.collision, enemy.dead, &mut enemy.hit_points);
    }
    for boss in bosses.iter_mut() {
        hostile(&boss.collision, boss.dead, &mut boss.hit_points);
    }

    for enemy_shot in enemy_shots.iter_mut() {
        let collider = enemy_shot.collider();

        if !player.invincible && hits(&player.collision, &collider) {
            player.hit_points -= 1;
            enemy_shot.endurance.hit();
        }

        for player_shot in player_shots.iter_mut() {
            let Collider::Circle(circle) = player_shot.collider() else {
                continue;
            };
            if hits(&circle, &collider) {
                player_shot.endurance.hit();
                enemy_shot.endurance.hit();
            }
        }
    }

    for power_up in power_ups.iter_mut() {
        if circle_vs_rect(&player.collision, &power_up.rect()) {
            power_up.active = true;
        }
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

pub fn apply_power_up(player: &mut Player, kind: PowerUpKind) {
    match kind {
        PowerUpKind::SingleShot => player.shot_type = PlayerShotType::Single,
        PowerUpKind::SpreadShot => player.shot_type = PlayerShotType::Spread,
        PowerUpKind::HeavyShot => player.shot_type = PlayerShotType::Heavy,
        PowerUpKind::ExtraLife => player.lives += 1,
        PowerUpKind::SpeedBoost => player.speed += 0.25,
    }
}

// ── Death ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerDeath {
    /// Nothing happening, or the animation is still blinking.
    Alive,
    Started,
    Revived,
    OutOfLives,
}

/// Start or advance the player's death sequence.
pub fn update_player_death(player: &mut Player, now: f64) -> PlayerDeath {
    if player.invincible {
        if player.death.tick(now) != DeathTick::Completed {
            return PlayerDeath::Alive;
        }
        player.death.rewind();
        player.invincible = false;
        player.hit_points = 1;
        if player.lives > 0 {
            player.death.visible = true;
            return PlayerDeath::Revived;
        }
        player.death.visible = false;
        return PlayerDeath::OutOfLives;
    }

    if player.hit_points <= 0 && player.lives > 0 {
        player.lives -= 1;
        player.invincible = true;
        tracing::debug!(lives = player.lives, "player hit");
        return PlayerDeath::Started;
    }

    PlayerDeath::Alive
}

/// Award a destroyed enemy's or boss's score exactly once.
pub fn award(player: &mut Player, points: u32) {
    player.score = player.score.saturating_add(points);
}

/// Record a boss kill: the level's boss fight is over and the victory
/// track starts.
pub fn boss_defeated(world: &mut World, audio: &mut AudioDirector) {
    let progress = &mut world.progress;
    let level = if progress.level1.started && !progress.level1.finished {
        Some(Level::One)
    } else if progress.level2.started && !progress.level2.finished {
        Some(Level::Two)
    } else {
        None
    };

    if let Some(level) = level {
        progress.level_mut(level).boss_finished = true;
        tracing::info!(?level, score = world.player.score, "boss defeated");
    }

    audio.acknowledge_transition();
    audio.crossfade_to(Track::Victory, false);
    audio.set_pan(0.0);
}
