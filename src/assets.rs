//! Asset manifest and background loader.
//!
//! Assets are referenced by name everywhere in the simulation.  The loader
//! reads the files on a worker thread and reports through a channel; the
//! loading screen only polls it and never blocks.
//!
//! Required assets (tier-1 images and every audio clip) gate the start of
//! the game.  Tier-2 images are streamed afterwards and do not count
//! towards progress.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::GameError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageId {
    BackgroundLevel1,
    BossLevel1,
    Enemy1,
    Enemy2,
    Player,
    BackgroundLevel2,
    BossLevel2,
    Enemy3,
    Enemy4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    GameOver,
    Victory,
    Boss,
    Title,
    Level1,
    Level2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    PowerUp,
    PlayerShot1,
    PlayerShot2,
    PlayerShot3,
    EnemyShot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Required,
    Streamed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetId {
    Image(ImageId),
    Track(Track),
    Effect(Effect),
}

impl AssetId {
    pub fn relative_path(self) -> &'static str {
        match self {
            AssetId::Image(image) => match image {
                ImageId::BackgroundLevel1 => "media/images/background-level-1.png",
                ImageId::BossLevel1 => "media/images/boss-level-1.png",
                ImageId::Enemy1 => "media/images/enemy-ship-1.png",
                ImageId::Enemy2 => "media/images/enemy-ship-2.png",
                ImageId::Player => "media/images/player-ship.png",
                ImageId::BackgroundLevel2 => "media/images/background-level-2.gif",
                ImageId::BossLevel2 => "media/images/boss-level-2.png",
                ImageId::Enemy3 => "media/images/enemy-ship-3.png",
                ImageId::Enemy4 => "media/images/enemy-ship-4.png",
            },
            AssetId::Track(track) => match track {
                Track::GameOver => "media/audio/soundtrack/game-over.mp3",
                Track::Victory => "media/audio/soundtrack/victory.mp3",
                Track::Boss => "media/audio/soundtrack/boss-fight.mp3",
                Track::Title => "media/audio/soundtrack/title-screen.mp3",
                Track::Level1 => "media/audio/soundtrack/level-1.mp3",
                Track::Level2 => "media/audio/soundtrack/level-2.mp3",
            },
            AssetId::Effect(effect) => match effect {
                Effect::PowerUp => "media/audio/sound-effects/power-up.mp3",
                Effect::PlayerShot1 => "media/audio/sound-effects/player-shot-1.mp3",
                Effect::PlayerShot2 => "media/audio/sound-effects/player-shot-2.mp3",
                Effect::PlayerShot3 => "media/audio/sound-effects/player-shot-3.mp3",
                Effect::EnemyShot => "media/audio/sound-effects/enemy-shot.mp3",
            },
        }
    }

    pub fn tier(self) -> Tier {
        match self {
            AssetId::Image(
                ImageId::BackgroundLevel2
                | ImageId::BossLevel2
                | ImageId::Enemy3
                | ImageId::Enemy4,
            ) => Tier::Streamed,
            _ => Tier::Required,
        }
    }
}

/// Ordered list of everything the game uses, required tier first.
#[derive(Clone, Debug)]
pub struct AssetManifest {
    pub entries: Vec<AssetId>,
}

impl AssetManifest {
    pub fn standard() -> Self {
        use ImageId::*;

        let mut entries: Vec<AssetId> = [
            BackgroundLevel1,
            BossLevel1,
            Enemy1,
            Enemy2,
            Player,
        ]
        .into_iter()
        .map(AssetId::Image)
        .collect();

        entries.extend(
            [
                Track::Title,
                Track::Level1,
                Track::GameOver,
                Track::Boss,
                Track::Level2,
                Track::Victory,
            ]
            .into_iter()
            .map(AssetId::Track),
        );
        entries.extend(
            [
                Effect::EnemyShot,
                Effect::PlayerShot1,
                Effect::PlayerShot2,
                Effect::PlayerShot3,
                Effect::PowerUp,
            ]
            .into_iter()
            .map(AssetId::Effect),
        );
        entries.extend(
            [BackgroundLevel2, BossLevel2, Enemy3, Enemy4]
                .into_iter()
                .map(AssetId::Image),
        );

        Self { entries }
    }

    pub fn required_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|id| id.tier() == Tier::Required)
            .count()
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
enum LoadEvent {
    Loaded(AssetId),
    Failed(AssetId, GameError),
}

#[derive(Debug)]
pub struct AssetLoader {
    rx: Option<Receiver<LoadEvent>>,
    required_total: usize,
    required_loaded: usize,
    streamed_loaded: usize,
    failed: Vec<AssetId>,
}

impl AssetLoader {
    /// Start loading.  With no `root` the built-in assets are used and
    /// everything resolves immediately; otherwise each file is read from
    /// `root` on a worker thread.
    pub fn start(manifest: AssetManifest, root: Option<PathBuf>) -> Self {
        let required_total = manifest.required_count();

        let Some(root) = root else {
            let streamed = manifest.entries.len() - required_total;
            return Self {
                rx: None,
                required_total,
                required_loaded: required_total,
                streamed_loaded: streamed,
                failed: Vec::new(),
            };
        };

        tracing::info!(root = %root.display(), assets = manifest.entries.len(), "loading assets");

        let (tx, rx) = mpsc::channel::<LoadEvent>();
        thread::spawn(move || {
            for id in manifest.entries {
                let event = match read_asset(&root, id) {
                    Ok(()) => LoadEvent::Loaded(id),
                    Err(err) => LoadEvent::Failed(id, err),
                };
                if tx.send(event).is_err() {
                    break; // loader dropped
                }
            }
        });

        Self {
            rx: Some(rx),
            required_total,
            required_loaded: 0,
            streamed_loaded: 0,
            failed: Vec::new(),
        }
    }

    /// Drain finished loads.  Never blocks.
    pub fn poll(&mut self) {
        let Some(rx) = self.rx.as_ref() else {
            return;
        };

        loop {
            match rx.try_recv() {
                Ok(LoadEvent::Loaded(id)) => match id.tier() {
                    Tier::Required => self.required_loaded += 1,
                    Tier::Streamed => self.streamed_loaded += 1,
                },
                Ok(LoadEvent::Failed(id, err)) => {
                    tracing::error!(asset = ?id, "{err}");
                    self.failed.push(id);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.rx = None;
                    break;
                }
            }
        }
    }

    /// Fraction of required assets loaded, in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.required_total == 0 {
            return 1.0;
        }
        self.required_loaded as f32 / self.required_total as f32
    }

    pub fn is_loaded(&self) -> bool {
        self.required_loaded == self.required_total
    }

    pub fn streamed_loaded(&self) -> usize {
        self.streamed_loaded
    }

    /// Assets that failed.  A failed required asset keeps the game on the
    /// loading screen for good.
    pub fn failed(&self) -> &[AssetId] {
        &self.failed
    }
}

fn read_asset(root: &Path, id: AssetId) -> Result<(), GameError> {
    let path = root.join(id.relative_path());
    std::fs::read(&path)
        .map(|_| ())
        .map_err(|source| GameError::AssetLoad { path, source })
}
