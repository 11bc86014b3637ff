//! All game entity types. Pure data, no per-instance behaviour.
//!
//! Behaviour lives in free functions (`motion`, `combat`, `spawner`) that
//! dispatch on the kind tags defined here.

use std::f32::consts::FRAC_PI_2;

use crate::error::GameError;
use crate::input::InputState;

// ── Shapes ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Circle(Circle),
    Rect(Rect),
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Type 1: patrols around the player, single round shot.
    Patroller,
    /// Type 2: turns to face the player, fires needles.
    Tracker,
    /// Type 3: chases the player's x-extent and bursts on death.
    Kamikaze,
    /// Type 4: drops in, strafes into line with the player, fires a burst.
    Strafer,
}

impl EnemyKind {
    pub fn type_id(self) -> u8 {
        match self {
            EnemyKind::Patroller => 1,
            EnemyKind::Tracker => 2,
            EnemyKind::Kamikaze => 3,
            EnemyKind::Strafer => 4,
        }
    }
}

impl TryFrom<u8> for EnemyKind {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(EnemyKind::Patroller),
            2 => Ok(EnemyKind::Tracker),
            3 => Ok(EnemyKind::Kamikaze),
            4 => Ok(EnemyKind::Strafer),
            other => Err(GameError::UnknownEntityType(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossKind {
    /// Level 1 boss (type 5).
    BouncingSkull,
    /// Level 2 boss (type 6).
    Jorhan,
}

impl BossKind {
    pub fn type_id(self) -> u8 {
        match self {
            BossKind::BouncingSkull => 5,
            BossKind::Jorhan => 6,
        }
    }

    pub fn for_level(level: Level) -> Self {
        match level {
            Level::One => BossKind::BouncingSkull,
            Level::Two => BossKind::Jorhan,
        }
    }
}

impl TryFrom<u8> for BossKind {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            5 => Ok(BossKind::BouncingSkull),
            6 => Ok(BossKind::Jorhan),
            other => Err(GameError::UnknownEntityType(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    One,
    Two,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerShotType {
    Single,
    Spread,
    Heavy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    SingleShot,
    SpreadShot,
    HeavyShot,
    ExtraLife,
    SpeedBoost,
}

impl TryFrom<u8> for PowerUpKind {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(PowerUpKind::SingleShot),
            2 => Ok(PowerUpKind::SpreadShot),
            3 => Ok(PowerUpKind::HeavyShot),
            4 => Ok(PowerUpKind::ExtraLife),
            5 => Ok(PowerUpKind::SpeedBoost),
            other => Err(GameError::UnknownPowerUpType(other)),
        }
    }
}

// ── Shots ─────────────────────────────────────────────────────────────────────

/// Who fired a shot.  Determines the collision shape table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotSource {
    Player(PlayerShotType),
    Enemy(EnemyKind),
    Boss(BossKind),
    /// Shrapnel from an exploding level-2 boss shot (type 7).
    Fragment,
}

impl ShotSource {
    /// Needle-shaped shots from types 2 and 4 collide as rectangles;
    /// everything else is round.
    pub fn is_rectangular(self) -> bool {
        matches!(
            self,
            ShotSource::Enemy(EnemyKind::Tracker | EnemyKind::Strafer)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShotShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endurance {
    Finite(i32),
    /// Level-2 boss shots cannot be shot down.
    Unbreakable,
}

impl Endurance {
    pub fn hit(&mut self) {
        if let Endurance::Finite(n) = self {
            *n -= 1;
        }
    }

    pub fn depleted(self) -> bool {
        matches!(self, Endurance::Finite(n) if n <= 0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shot {
    /// Circle centre, or top-left corner for rectangular shots.
    pub x: f32,
    pub y: f32,
    pub shape: ShotShape,
    pub speed: f32,
    pub angle: f32,
    pub endurance: Endurance,
    pub source: ShotSource,
}

impl Shot {
    pub fn collider(&self) -> Collider {
        match self.shape {
            ShotShape::Circle { radius } => Collider::Circle(Circle {
                x: self.x,
                y: self.y,
                radius,
            }),
            ShotShape::Rect { width, height } => Collider::Rect(Rect {
                x: self.x,
                y: self.y,
                width,
                height,
            }),
        }
    }

    pub fn radius(&self) -> f32 {
        match self.shape {
            ShotShape::Circle { radius } => radius,
            ShotShape::Rect { width, height } => width.max(height) / 2.0,
        }
    }
}

/// Per-kind shot parameters carried by a shooter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShotTemplate {
    pub offset_x: f32,
    pub offset_y: f32,
    pub shape: ShotShape,
    pub endurance: Endurance,
    pub speed: f32,
}

/// Volley cadence: `interval` between volleys, `sequence_interval` between
/// the shots of one volley, `max_step` shots per volley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Volley {
    pub interval: f64,
    pub interval_reference: f64,
    pub sequence_interval: f64,
    pub sequence_reference: f64,
    pub step: u32,
    pub max_step: u32,
}

impl Volley {
    pub fn new(interval: f64, sequence_interval: f64, max_step: u32) -> Self {
        Self {
            interval,
            interval_reference: 0.0,
            sequence_interval,
            sequence_reference: 0.0,
            step: 0,
            max_step,
        }
    }
}

// ── Death animation ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathTick {
    Waiting,
    Toggled,
    Completed,
}

/// Blink sequence played before an entity is removed: visibility toggles
/// every time more than `interval` ms have passed, `max_step` times.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeathAnimation {
    pub step: u32,
    pub max_step: u32,
    pub interval: f64,
    pub reference_time: f64,
    pub visible: bool,
    /// Bosses blink faster and faster.
    pub accelerating: bool,
}

/// Step by which an accelerating animation shortens its interval, and the
/// shortest interval it reaches.
pub const DEATH_INTERVAL_SHRINK: f64 = 50.0;

impl DeathAnimation {
    pub fn new(max_step: u32, interval: f64) -> Self {
        Self {
            step: 0,
            max_step,
            interval,
            reference_time: 0.0,
            visible: true,
            accelerating: false,
        }
    }

    /// Rewind so the animation can run again (the player dies more than once).
    pub fn rewind(&mut self) {
        self.step = 0;
        self.reference_time = 0.0;
    }

    pub fn accelerating(mut self) -> Self {
        self.accelerating = true;
        self
    }

    pub fn tick(&mut self, now: f64) -> DeathTick {
        if now - self.reference_time <= self.interval {
            return DeathTick::Waiting;
        }

        self.reference_time = now;
        self.visible = !self.visible;
        self.step += 1;

        if self.accelerating {
            self.interval = (self.interval - DEATH_INTERVAL_SHRINK).max(DEATH_INTERVAL_SHRINK);
        }

        if self.step >= self.max_step {
            DeathTick::Completed
        } else {
            DeathTick::Toggled
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: f32 = 60.0;
pub const PLAYER_SPEED: f32 = 0.5;
pub const PLAYER_COLLISION_RADIUS: f32 = 24.0;
pub const PLAYER_SHOT_INTERVAL: f64 = 700.0;
pub const PLAYER_DEATH_STEPS: u32 = 10;
pub const PLAYER_DEATH_INTERVAL: f64 = 200.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// False while the ship glides in from below; input is ignored until then.
    pub allow_player: bool,
    pub lives: u32,
    pub hit_points: i32,
    /// Only set while the death animation runs.
    pub invincible: bool,
    pub score: u32,
    pub controls: InputState,
    pub shot_type: PlayerShotType,
    pub shot_interval: f64,
    pub shot_reference: f64,
    pub death: DeathAnimation,
    pub collision: Circle,
}

impl Player {
    pub fn new(canvas_width: f32, canvas_height: f32, lives: u32) -> Self {
        let x = canvas_width * 0.5 - PLAYER_SIZE / 2.0;
        let y = canvas_height * 1.1;
        Self {
            x,
            y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            allow_player: false,
            lives,
            hit_points: 1,
            invincible: false,
            score: 0,
            controls: InputState::default(),
            shot_type: PlayerShotType::Single,
            shot_interval: PLAYER_SHOT_INTERVAL,
            shot_reference: 0.0,
            death: DeathAnimation::new(PLAYER_DEATH_STEPS, PLAYER_DEATH_INTERVAL),
            collision: Circle {
                x: x + PLAYER_SIZE / 2.0,
                y: y + PLAYER_SIZE / 2.0,
                radius: PLAYER_COLLISION_RADIUS,
            },
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn sync_collision(&mut self) {
        let (cx, cy) = self.center();
        self.collision.x = cx;
        self.collision.y = cy;
    }
}

// ── Enemies & bosses ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub angle: f32,
    pub angle_speed: f32,
    pub hit_points: i32,
    pub score_points: u32,
    pub can_shoot: bool,
    pub volley: Volley,
    pub shot: ShotTemplate,
    pub death: DeathAnimation,
    /// Set once hit points run out; the death animation is then running.
    pub dead: bool,
    pub collision: Circle,
}

/// Enemies face straight down when they appear.
pub const ENEMY_START_ANGLE: f32 = FRAC_PI_2;

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub kind: BossKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed_x: f32,
    pub angle: f32,
    pub hit_points: i32,
    pub score_points: u32,
    /// True during the scripted descent onto the screen.
    pub is_animating: bool,
    pub can_move: bool,
    pub can_shoot: bool,
    pub volley: Volley,
    pub shot: ShotTemplate,
    pub death: DeathAnimation,
    pub dead: bool,
    pub collision: Circle,
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

pub const POWER_UP_SIZE: f32 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed_y: f32,
    /// Set on contact with the player; applied on the next check pass.
    pub active: bool,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Background ────────────────────────────────────────────────────────────────

/// Vertical scroll offset of the playing backdrop, in [0, canvas height).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Background {
    pub scroll: f32,
}
