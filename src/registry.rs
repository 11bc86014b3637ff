//! Session state: the entity lists and the progression flags.
//!
//! Entities are never spliced out while a pass walks their list.  A pass
//! marks what must go and `compact` drops it afterwards.

use std::ops::{Index, IndexMut};

use crate::config::GameConfig;
use crate::entities::{Background, Boss, Enemy, Level, Player, PowerUp, Shot};
use crate::spawner::SpawnTimers;

// ── Entity list ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct EntityList<T> {
    items: Vec<T>,
    marked: Vec<bool>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            marked: Vec::new(),
        }
    }
}

impl<T> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.marked.push(false);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Schedule `index` for removal at the next `compact`.
    pub fn mark(&mut self, index: usize) {
        if let Some(flag) = self.marked.get_mut(index) {
            *flag = true;
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Drop every marked entry, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.items.len();
        let mut flags = std::mem::take(&mut self.marked).into_iter();
        // `retain` visits elements in order, exactly once.
        self.items.retain(|_| !flags.next().unwrap_or(false));
        self.marked = vec![false; self.items.len()];
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.marked.clear();
    }
}

impl<T> Index<usize> for EntityList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for EntityList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> Extend<T> for EntityList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ── Progress ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelState {
    pub started: bool,
    pub boss_score: u32,
    pub boss_started: bool,
    pub boss_finished: bool,
    pub in_victory: bool,
    pub finished: bool,
}

impl LevelState {
    pub fn new(boss_score: u32) -> Self {
        Self {
            started: false,
            boss_score,
            boss_started: false,
            boss_finished: false,
            in_victory: false,
            finished: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Victory {
    pub reference_time: f64,
    pub interval: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Progress {
    /// Entry fade running on the first playing frames.
    pub in_transition: bool,
    pub started: bool,
    pub level1: LevelState,
    pub level2: LevelState,
    pub victory: Victory,
}

impl Progress {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            in_transition: false,
            started: false,
            level1: LevelState::new(config.level1_boss_score),
            level2: LevelState::new(config.level2_boss_score),
            victory: Victory {
                reference_time: 0.0,
                interval: config.victory_interval_ms,
            },
        }
    }

    /// Level the player is currently fighting through.
    pub fn current_level(&self) -> Level {
        if self.level2.started {
            Level::Two
        } else {
            Level::One
        }
    }

    pub fn level_mut(&mut self, level: Level) -> &mut LevelState {
        match level {
            Level::One => &mut self.level1,
            Level::Two => &mut self.level2,
        }
    }

    /// A boss is on screen (or its victory is still playing out) for the
    /// current level, so regular enemies stay away.
    pub fn in_boss_fight(&self) -> bool {
        (self.level1.boss_started && !self.level2.started) || self.level2.boss_started
    }

    /// The level-2 boss is alive and fighting.
    pub fn final_boss_active(&self) -> bool {
        self.level2.boss_started && !self.level2.boss_finished
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameOverState {
    pub in_transition: bool,
    pub started: bool,
    pub finished: bool,
    pub audio_loaded: bool,
    pub reference_time: f64,
    pub interval: f64,
}

impl GameOverState {
    pub fn new(interval: f64) -> Self {
        Self {
            in_transition: false,
            started: false,
            finished: false,
            audio_loaded: false,
            reference_time: 0.0,
            interval,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.interval);
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Everything a play session owns.  Rebuilt wholesale by `reset`.
#[derive(Clone, Debug)]
pub struct World {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub player: Player,
    pub player_shots: EntityList<Shot>,
    pub enemies: EntityList<Enemy>,
    pub bosses: EntityList<Boss>,
    pub enemy_shots: EntityList<Shot>,
    pub power_ups: EntityList<PowerUp>,
    pub background: Background,
    pub progress: Progress,
    pub spawn: SpawnTimers,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            player: Player::new(config.canvas_width, config.canvas_height, config.player_lives),
            player_shots: EntityList::new(),
            enemies: EntityList::new(),
            bosses: EntityList::new(),
            enemy_shots: EntityList::new(),
            power_ups: EntityList::new(),
            background: Background::default(),
            progress: Progress::new(config),
            spawn: SpawnTimers::new(config),
        }
    }

    /// Return to a fresh session: player rebuilt, every list emptied,
    /// progression flags and spawn timers back to their initial values.
    pub fn reset(&mut self, config: &GameConfig) {
        *self = Self::new(config);
    }

    pub fn is_wide_canvas(&self) -> bool {
        self.canvas_width >= crate::config::WIDE_CANVAS_MIN_WIDTH
    }
}
