//! Runtime configuration loaded from a TOML file.
//!
//! Every field has a default matching the stock game, and the struct is
//! `#[serde(default)]`, so a config file only needs the keys it overrides:
//!
//! ```toml
//! canvas_width = 480.0
//! level1_boss_score = 2000
//! seed = 7
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::GameResult;

/// Canvases narrower than this get the gentler boss tuning (smaller shots,
/// slower level-2 boss, no exploding shots).
pub const WIDE_CANVAS_MIN_WIDTH: f32 = 576.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Canvas ────────────────────────────────────────────────────────────────
    pub canvas_width: f32,
    pub canvas_height: f32,

    // ── Host loop ─────────────────────────────────────────────────────────────
    /// Target frame length of the host loop, in milliseconds.
    pub frame_ms: u64,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Directory holding the `media/` tree.  `None` uses built-in assets
    /// and completes loading immediately.
    pub asset_root: Option<PathBuf>,

    // ── Progression ───────────────────────────────────────────────────────────
    pub level1_boss_score: u32,
    pub level2_boss_score: u32,
    pub victory_interval_ms: f64,
    pub game_over_interval_ms: f64,
    pub player_lives: u32,

    // ── Spawning ──────────────────────────────────────────────────────────────
    pub enemy_spawn_interval_ms: f64,
    pub power_up_spawn_interval_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 768.0,
            canvas_height: 960.0,
            frame_ms: 16,
            seed: None,
            asset_root: None,
            level1_boss_score: 10_000,
            level2_boss_score: 60_000,
            victory_interval_ms: 15_000.0,
            game_over_interval_ms: 12_000.0,
            player_lives: 3,
            enemy_spawn_interval_ms: 10_000.0,
            power_up_spawn_interval_ms: 35_000.0,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(src: &str) -> GameResult<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: &Path) -> GameResult<Self> {
        let src = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&src)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn is_wide_canvas(&self) -> bool {
        self.canvas_width >= WIDE_CANVAS_MIN_WIDTH
    }
}
