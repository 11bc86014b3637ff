use space_shooter::assets::Track;
use space_shooter::audio::AudioDirector;
use space_shooter::entities::*;
use space_shooter::motion::*;
use space_shooter::registry::{EntityList, World};
use space_shooter::spawner::*;
use space_shooter::{GameConfig, GameError};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_world() -> World {
    World::new(&GameConfig::default())
}

// ── EntityList ────────────────────────────────────────────────────────────────

#[test]
fn compact_drops_marked_and_keeps_order() {
    let mut list = EntityList::new();
    list.extend([10, 11, 12, 13, 14]);
    list.mark(1);
    list.mark(3);
    assert!(list.is_marked(1));

    assert_eq!(list.compact(), 2);
    assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![10, 12, 14]);
    assert!(!list.is_marked(1));
}

#[test]
fn marking_out_of_range_is_ignored() {
    let mut list = EntityList::new();
    list.push("a");
    list.mark(5);
    assert_eq!(list.compact(), 0);
    assert_eq!(list.len(), 1);
}

#[test]
fn compact_with_nothing_marked_is_a_no_op() {
    let mut list = EntityList::new();
    list.extend([1, 2, 3]);
    assert_eq!(list.compact(), 0);
    assert_eq!(list.len(), 3);
}

// ── World & progress ──────────────────────────────────────────────────────────

#[test]
fn new_world_starts_below_the_canvas() {
    let world = make_world();
    assert_eq!(world.player.x, 768.0 * 0.5 - 30.0);
    assert_eq!(world.player.y, 960.0 * 1.1);
    assert_eq!(world.player.lives, 3);
    assert!(!world.player.allow_player);
    assert!(world.enemies.is_empty());
    assert_eq!(world.progress.current_level(), Level::One);
}

#[test]
fn reset_clears_everything() {
    let config = GameConfig::default();
    let mut rng = seeded_rng();
    let mut world = World::new(&config);
    world.player.score = 5000;
    world.progress.level1.started = true;
    world.spawn.enemy.interval = 7000.0;
    world.enemies.push(build_enemy(EnemyKind::Patroller, 768.0, &mut rng));

    world.reset(&config);
    assert_eq!(world.player.score, 0);
    assert!(!world.progress.level1.started);
    assert!(world.enemies.is_empty());
    assert_eq!(world.spawn.enemy.interval, config.enemy_spawn_interval_ms);
}

#[test]
fn boss_fight_flags() {
    let mut world = make_world();
    assert!(!world.progress.in_boss_fight());

    world.progress.level1.boss_started = true;
    assert!(world.progress.in_boss_fight());

    // level 2 running, its boss not yet called
    world.progress.level2.started = true;
    assert!(!world.progress.in_boss_fight());
    assert_eq!(world.progress.current_level(), Level::Two);

    world.progress.level2.boss_started = true;
    assert!(world.progress.in_boss_fight());
    assert!(world.progress.final_boss_active());
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn spawn_timer_is_strict() {
    let timer = SpawnTimer::new(1000.0);
    assert!(!timer.due(1000.0));
    assert!(timer.due(1001.0));
}

#[test]
fn enemy_interval_never_drops_below_floor() {
    let mut rng = seeded_rng();
    let mut world = make_world();
    let mut previous = world.spawn.enemy.interval;

    for _ in 0..50 {
        spawn_enemy(&mut world, &mut rng);
        let interval = world.spawn.enemy.interval;
        assert!(interval <= previous);
        assert!(interval >= ENEMY_SPAWN_FLOOR);
        previous = interval;
    }
    assert_eq!(world.spawn.enemy.interval, ENEMY_SPAWN_FLOOR);
    assert_eq!(world.enemies.len(), 50);
}

#[test]
fn enemy_interval_shrinks_by_300_to_599() {
    let mut rng = seeded_rng();
    let mut world = make_world();
    spawn_enemy(&mut world, &mut rng);
    let shrink = GameConfig::default().enemy_spawn_interval_ms - world.spawn.enemy.interval;
    assert!((300.0..600.0).contains(&shrink));
    assert_eq!(shrink, shrink.floor());
}

#[test]
fn power_up_interval_never_drops_below_floor() {
    let mut rng = seeded_rng();
    let mut world = make_world();

    for _ in 0..200 {
        spawn_power_up(&mut world, &mut rng);
        assert!(world.spawn.power_up.interval >= POWER_UP_SPAWN_FLOOR);
    }
    assert_eq!(world.spawn.power_up.interval, POWER_UP_SPAWN_FLOOR);
    assert!(world.power_ups.iter().all(|p| p.width == POWER_UP_SIZE && !p.active));
}

#[test]
fn enemy_kinds_follow_the_level() {
    let mut rng = seeded_rng();
    let mut world = make_world();

    for _ in 0..20 {
        let kind = pick_enemy_kind(&world, &mut rng);
        assert!(matches!(kind, Some(EnemyKind::Patroller | EnemyKind::Tracker)));
    }

    world.progress.level1.finished = true;
    assert_eq!(pick_enemy_kind(&world, &mut rng), None);
    assert_eq!(spawn_enemy(&mut world, &mut rng), None);
    assert!(world.enemies.is_empty());

    world.progress.level2.started = true;
    for _ in 0..20 {
        let kind = pick_enemy_kind(&world, &mut rng);
        assert!(matches!(kind, Some(EnemyKind::Kamikaze | EnemyKind::Strafer)));
    }
}

#[test]
fn enemies_spawn_above_the_top_edge() {
    let mut rng = seeded_rng();
    for kind in [
        EnemyKind::Patroller,
        EnemyKind::Tracker,
        EnemyKind::Kamikaze,
        EnemyKind::Strafer,
    ] {
        let enemy = build_enemy(kind, 768.0, &mut rng);
        assert!(enemy.y <= -30.0 && enemy.y >= -60.0);
        assert!(enemy.x >= 50.0 && enemy.x <= 768.0 * 0.9 + 50.0);
        assert_eq!(enemy.angle, ENEMY_START_ANGLE);
        assert!(!enemy.dead);
    }
}

#[test]
fn enemy_type_ids_round_trip() {
    for id in 1..=4u8 {
        let kind = EnemyKind::try_from(id).unwrap();
        assert_eq!(kind.type_id(), id);
    }
    assert!(matches!(
        EnemyKind::try_from(9),
        Err(GameError::UnknownEntityType(9))
    ));
    assert_eq!(BossKind::try_from(6).unwrap(), BossKind::Jorhan);
}

// ── Bosses ────────────────────────────────────────────────────────────────────

#[test]
fn boss_trigger_fires_once() {
    let mut rng = seeded_rng();
    let mut world = make_world();
    let mut audio = AudioDirector::new();
    world.player.score = 10_000;

    check_boss_trigger(&mut world, &mut audio, &mut rng);
    check_boss_trigger(&mut world, &mut audio, &mut rng);

    assert_eq!(world.bosses.len(), 1);
    assert_eq!(world.bosses[0].kind, BossKind::BouncingSkull);
    assert!(world.progress.level1.boss_started);
    assert_eq!(audio.crossfade().map(|c| c.next), Some(Track::Boss));
}

#[test]
fn boss_trigger_waits_for_threshold() {
    let mut rng = seeded_rng();
    let mut world = make_world();
    let mut audio = AudioDirector::new();
    world.player.score = 9_999;

    check_boss_trigger(&mut world, &mut audio, &mut rng);
    assert!(world.bosses.is_empty());
    assert!(audio.crossfade().is_none());
}

#[test]
fn second_boss_needs_strictly_more_and_level_two() {
    let mut rng = seeded_rng();
    let mut world = make_world();
    let mut audio = AudioDirector::new();
    world.progress.level1.boss_started = true;
    world.player.score = 60_001;

    // level 2 not running yet
    check_boss_trigger(&mut world, &mut audio, &mut rng);
    assert!(world.bosses.is_empty());

    world.progress.level2.started = true;
    world.player.score = 60_000;
    check_boss_trigger(&mut world, &mut audio, &mut rng);
    assert!(world.bosses.is_empty());

    world.player.score = 60_001;
    check_boss_trigger(&mut world, &mut audio, &mut rng);
    assert_eq!(world.bosses.len(), 1);
    assert_eq!(world.bosses[0].kind, BossKind::Jorhan);
}

#[test]
fn narrow_canvas_gets_gentler_bosses() {
    let mut rng = seeded_rng();
    let config = GameConfig {
        canvas_width: 400.0,
        ..GameConfig::default()
    };
    let world = World::new(&config);
    assert!(!world.is_wide_canvas());

    let skull = build_boss(Level::One, &world, &mut rng);
    assert_eq!(skull.shot.shape, ShotShape::Circle { radius: 20.0 });

    let jorhan = build_boss(Level::Two, &world, &mut rng);
    assert_eq!(jorhan.speed_x.abs(), 3.0);
    assert_eq!(jorhan.x, 200.0 - 70.0);
    assert_eq!(jorhan.y, BOSS_START_Y);
    assert!(jorhan.is_animating);
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[test]
fn player_glides_in_then_takes_control() {
    let mut world = make_world();
    let mut frames = 0;
    while !world.player.allow_player && frames < 10_000 {
        move_player(&mut world.player, 1.0, 768.0, 960.0);
        frames += 1;
    }
    assert!(world.player.allow_player);
    assert!(world.player.y + world.player.height / 2.0 <= 960.0 * 0.7);
    assert_eq!(world.player.x, 768.0 * 0.5 - 30.0);
}

#[test]
fn input_moves_player_diagonally() {
    let mut player = Player::new(768.0, 960.0, 3);
    player.allow_player = true;
    player.y = 500.0;
    player.controls.moving_up = true;
    player.controls.moving_left = true;

    let x = player.x;
    move_player(&mut player, 2.0, 768.0, 960.0);
    assert_eq!(player.y, 500.0 - 2.0 * PLAYER_SPEED);
    assert_eq!(player.x, x - 2.0 * PLAYER_SPEED);
    assert_eq!(player.collision.x, player.x + 30.0);
}

#[test]
fn dead_strafer_does_not_arm_when_aligned() {
    let mut rng = seeded_rng();
    let player = Player::new(768.0, 960.0, 3);
    let mut enemy = build_enemy(EnemyKind::Strafer, 768.0, &mut rng);
    enemy.x = player.x - (enemy.width - player.width) / 2.0;
    enemy.y = 200.0;
    enemy.can_shoot = false;
    enemy.dead = true;

    move_enemy(&mut enemy, &player, 0.0, 768.0, 960.0);
    assert!(!enemy.can_shoot);

    enemy.dead = false;
    move_enemy(&mut enemy, &player, 0.0, 768.0, 960.0);
    assert!(enemy.can_shoot);
}

#[test]
fn clamp_keeps_player_on_canvas() {
    let mut player = Player::new(768.0, 960.0, 3);
    player.x = -20.0;
    player.y = 2000.0;
    clamp_player(&mut player, 768.0, 960.0);
    assert_eq!(player.x, 0.0);
    assert_eq!(player.y, 900.0);

    player.x = 800.0;
    player.y = -5.0;
    clamp_player(&mut player, 768.0, 960.0);
    assert_eq!(player.x, 708.0);
    assert_eq!(player.y, 0.0);
}

#[test]
fn background_wraps() {
    let mut background = Background { scroll: 959.9 };
    move_background(&mut background, 3.0, 960.0);
    assert!(background.scroll >= 0.0 && background.scroll < 960.0);
    assert!(background.scroll < 2.0);
}

#[test]
fn shot_offscreen_margin_is_fifty() {
    let shot = Shot {
        x: 100.0,
        y: -50.0,
        shape: ShotShape::Circle { radius: 10.0 },
        speed: 2.0,
        angle: 0.0,
        endurance: Endurance::Finite(1),
        source: ShotSource::Fragment,
    };
    assert!(!is_shot_offscreen(&shot, 768.0, 960.0));
    let gone = Shot { y: -50.5, ..shot };
    assert!(is_shot_offscreen(&gone, 768.0, 960.0));
}

// ── Config ────────────────────────────────────────────────────────────────────

#[test]
fn partial_toml_keeps_defaults() {
    let config = GameConfig::from_toml_str("canvas_width = 480.0\nseed = 7\n").unwrap();
    assert_eq!(config.canvas_width, 480.0);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.canvas_height, 960.0);
    assert_eq!(config.level1_boss_score, 10_000);
    assert!(!config.is_wide_canvas());
}

#[test]
fn bad_toml_is_a_config_error() {
    let err = GameConfig::from_toml_str("canvas_width = \"wide\"").unwrap_err();
    assert!(matches!(err, GameError::Config(_)));
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shooter.toml");
    std::fs::write(&path, "player_lives = 5\nlevel2_boss_score = 1000\n").unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.player_lives, 5);
    assert_eq!(config.level2_boss_score, 1000);

    let world = World::new(&config);
    assert_eq!(world.player.lives, 5);
    assert_eq!(world.progress.level2.boss_score, 1000);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = GameConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
}
