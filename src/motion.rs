//! Movement rules.  Every speed is in pixels per rate unit, so each step
//! is scaled by the frame `rate`.

use crate::entities::{Background, Boss, BossKind, Enemy, EnemyKind, Player, PowerUp, Shot};
use crate::registry::World;

/// Bosses descend at this speed during their entry.
pub const BOSS_ENTRY_SPEED: f32 = 0.75;
const BACKGROUND_SPEED: f32 = 1.0 / 3.0;

// ── Background & player ───────────────────────────────────────────────────────

pub fn move_background(background: &mut Background, rate: f32, canvas_height: f32) {
    background.scroll += rate * BACKGROUND_SPEED;
    if canvas_height > 0.0 {
        background.scroll = background.scroll.rem_euclid(canvas_height);
    }
}

/// Glide in from below until the ship's center reaches 70% of the height,
/// then follow the input flags.
pub fn move_player(player: &mut Player, rate: f32, canvas_width: f32, canvas_height: f32) {
    if !player.allow_player {
        player.y -= rate * player.speed;
        player.x = canvas_width * 0.5 - player.width / 2.0;
        if player.y + player.height / 2.0 <= canvas_height * 0.7 {
            player.allow_player = true;
        }
    } else {
        let step = rate * player.speed;
        let controls = player.controls;
        if controls.moving_up {
            player.y -= step;
        }
        if controls.moving_down {
            player.y += step;
        }
        if controls.moving_left {
            player.x -= step;
        }
        if controls.moving_right {
            player.x += step;
        }
    }

    player.sync_collision();
}

/// Keep the ship inside the canvas.
pub fn clamp_player(player: &mut Player, canvas_width: f32, canvas_height: f32) {
    if player.x <= 0.0 {
        player.x = 0.0;
    } else if player.x + player.width >= canvas_width {
        player.x = canvas_width - player.width;
    }

    if player.y <= 0.0 {
        player.y = 0.0;
    } else if player.y + player.height >= canvas_height {
        player.y = canvas_height - player.height;
    }

    player.sync_collision();
}

// ── Enemies ───────────────────────────────────────────────────────────────────

pub fn move_enemy(
    enemy: &mut Enemy,
    player: &Player,
    rate: f32,
    canvas_width: f32,
    canvas_height: f32,
) {
    let (player_cx, player_cy) = player.center();

    match enemy.kind {
        EnemyKind::Patroller => {
            let reach = canvas_width * 0.3;
            if enemy.x < player_cx - reach {
                enemy.speed_x = enemy.speed_x.abs();
            } else if enemy.x + enemy.width > player_cx + reach {
                enemy.speed_x = -enemy.speed_x.abs();
            }

            if !enemy.dead {
                enemy.x += rate * enemy.speed_x;
            }
            enemy.y += rate * enemy.speed_y;
        }
        EnemyKind::Tracker => {
            // Aim from the sprite's corner, as the needle is fired from there.
            let target = (player_cy - enemy.y).atan2(player_cx - enemy.x);
            if (enemy.angle - target).abs() >= enemy.angle_speed && !enemy.dead {
                if enemy.angle < target {
                    enemy.angle += enemy.angle_speed;
                } else if enemy.angle > target {
                    enemy.angle -= enemy.angle_speed;
                }
            }
            enemy.y += rate * enemy.speed_y;
        }
        EnemyKind::Kamikaze => {
            if enemy.x + enemy.width <= player.x {
                enemy.speed_x = enemy.speed_x.abs();
            } else if enemy.x >= player.x + player.width {
                enemy.speed_x = -enemy.speed_x.abs();
            }
            enemy.x += rate * enemy.speed_x;
            enemy.y += rate * enemy.speed_y;
        }
        EnemyKind::Strafer => {
            if enemy.y < canvas_height * 0.1 {
                enemy.y += rate * enemy.speed_y;
            }

            if !enemy.can_shoot && !enemy.dead {
                enemy.speed_x = if enemy.x < player.x {
                    enemy.speed_x.abs()
                } else {
                    -enemy.speed_x.abs()
                };
                enemy.x += rate * enemy.speed_x;
            }

            let offset = (enemy.x - player.x + (enemy.width - player.width) / 2.0).abs();
            if offset <= player.width / 4.0 && !enemy.dead {
                enemy.can_shoot = true;
            }
        }
    }

    enemy.collision.x = enemy.x + enemy.width / 2.0;
    enemy.collision.y = enemy.y + enemy.height / 2.0;
}

// ── Bosses ────────────────────────────────────────────────────────────────────

/// Move a boss one frame.  Returns the stereo pan matching its position
/// while it is moving sideways.
pub fn move_boss(boss: &mut Boss, rate: f32, canvas_width: f32, canvas_height: f32) -> Option<f32> {
    if boss.is_animating {
        boss.x = canvas_width * 0.5 - boss.width / 2.0;
        boss.y += rate * BOSS_ENTRY_SPEED;
        boss.collision.x = boss.x + boss.width / 2.0;
        boss.collision.y = boss.y + boss.height / 2.0;

        if boss.y >= canvas_height * 0.1 {
            boss.is_animating = false;
        }
        return None;
    }

    if boss.dead || !boss.can_move {
        return None;
    }

    let boundary = match boss.kind {
        BossKind::BouncingSkull => 0.0,
        BossKind::Jorhan => canvas_width * 0.1,
    };

    if boss.kind == BossKind::Jorhan {
        let center = (canvas_width - boss.width) / 2.0;
        let at_edge = boss.x <= boundary || boss.x + boss.width >= canvas_width - boundary;
        let at_center = (center - boss.x).abs() < (boss.speed_x / 2.0).abs();
        if at_edge || at_center {
            // Finishes this step, then holds still for a volley.
            boss.can_move = false;
            boss.can_shoot = true;
        }
    }

    if boss.x <= boundary {
        boss.x = boundary;
        boss.speed_x = boss.speed_x.abs();
    } else if boss.x + boss.width >= canvas_width - boundary {
        boss.x = canvas_width - boss.width - boundary;
        boss.speed_x = -boss.speed_x.abs();
    }

    boss.x += rate * boss.speed_x;
    boss.collision.x = boss.x + boss.width / 2.0;

    Some(2.0 * (boss.x + boss.width / 2.0) / canvas_width - 1.0)
}

// ── Shots & power-ups ─────────────────────────────────────────────────────────

pub fn move_shot(shot: &mut Shot, rate: f32) {
    shot.y += rate * shot.speed * shot.angle.sin();
    shot.x += rate * shot.speed * shot.angle.cos();
}

pub fn move_power_up(power_up: &mut PowerUp, rate: f32) {
    power_up.y += rate * power_up.speed_y;
}

/// Move everything in draw order: backdrop, player, enemies, bosses,
/// power-ups, then both shot lists.  Returns the last boss pan, if any
/// boss moved sideways.
pub fn move_all(world: &mut World, rate: f32) -> Option<f32> {
    let (width, height) = (world.canvas_width, world.canvas_height);

    move_background(&mut world.background, rate, height);
    move_player(&mut world.player, rate, width, height);

    for enemy in world.enemies.iter_mut() {
        move_enemy(enemy, &world.player, rate, width, height);
    }

    let mut pan = None;
    for boss in world.bosses.iter_mut() {
        if let Some(p) = move_boss(boss, rate, width, height) {
            pan = Some(p);
        }
    }

    for power_up in world.power_ups.iter_mut() {
        move_power_up(power_up, rate);
    }
    for shot in world.player_shots.iter_mut().chain(world.enemy_shots.iter_mut()) {
        move_shot(shot, rate);
    }

    pan
}

/// A shot more than 50 px outside the canvas is gone for good.
pub fn is_shot_offscreen(shot: &Shot, canvas_width: f32, canvas_height: f32) -> bool {
    shot.x > canvas_width + 50.0
        || shot.x < -50.0
        || shot.y > canvas_height + 50.0
        || shot.y < -50.0
}
