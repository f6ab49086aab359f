//! Platform abstraction layer
//!
//! The simulation never draws or plays anything itself. Hosts provide:
//! - a `DrawSurface` that receives per-frame draw commands
//! - a `Hud` that shows score/lives text, the round-over and paused banners,
//!   and plays sounds
//!
//! Null and recording implementations live here for headless runs and tests.

use glam::Vec2;
use thiserror::Error;

use crate::sim::EntityKind;

/// Failure inside a drawing surface (missing asset, lost context, ...)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("No drawable resource for {0}")]
    MissingAsset(String),
    #[error("The drawing surface is unavailable")]
    SurfaceLost,
    #[error("Draw failed: {0}")]
    Other(String),
}

/// Something the loop driver can issue draw commands to
pub trait DrawSurface {
    fn clear(&mut self) -> Result<(), DrawError>;
    /// Draw an entity's sprite with its bounding box at `pos` (top-left)
    fn draw_entity(&mut self, kind: EntityKind, pos: Vec2, size: f32) -> Result<(), DrawError>;
    /// Draw a splash effect; `alpha` fades from 1 to 0 over its lifetime
    fn draw_effect(&mut self, center: Vec2, radius: f32, alpha: f32) -> Result<(), DrawError>;
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Fruit sliced
    Slice,
    /// Bomb hit
    Explosion,
    /// Fruit fell off the bottom
    Miss,
    /// Round ended by running out of lives
    GameOver,
}

/// HUD text, round-over banner and sound output
pub trait Hud {
    fn set_score_text(&mut self, text: &str);
    fn set_lives_text(&mut self, text: &str);
    fn show_round_end(&mut self, message: &str);
    fn hide_round_end(&mut self);
    /// Show or hide the paused banner
    fn set_paused(&mut self, _paused: bool) {}
    fn play_sound(&mut self, _effect: SoundEffect) {}
}

/// Surface that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DrawSurface for NullSurface {
    fn clear(&mut self) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw_entity(&mut self, _kind: EntityKind, _pos: Vec2, _size: f32) -> Result<(), DrawError> {
        Ok(())
    }

    fn draw_effect(&mut self, _center: Vec2, _radius: f32, _alpha: f32) -> Result<(), DrawError> {
        Ok(())
    }
}

/// A recorded draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Entity { kind: EntityKind, pos: Vec2, size: f32 },
    Effect { center: Vec2, radius: f32, alpha: f32 },
}

/// Surface that records commands, optionally failing every entity draw
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    pub fail_entity_draws: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued since the last `Clear`
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::Clear)
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.commands[start..]
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self) -> Result<(), DrawError> {
        self.commands.push(DrawCommand::Clear);
        Ok(())
    }

    fn draw_entity(&mut self, kind: EntityKind, pos: Vec2, size: f32) -> Result<(), DrawError> {
        if self.fail_entity_draws {
            return Err(DrawError::MissingAsset(format!("{:?}", kind)));
        }
        self.commands.push(DrawCommand::Entity { kind, pos, size });
        Ok(())
    }

    fn draw_effect(&mut self, center: Vec2, radius: f32, alpha: f32) -> Result<(), DrawError> {
        self.commands.push(DrawCommand::Effect {
            center,
            radius,
            alpha,
        });
        Ok(())
    }
}

/// HUD that remembers what it was last told
#[derive(Debug, Default, Clone)]
pub struct RecordingHud {
    pub score_text: String,
    pub lives_text: String,
    pub banner: Option<String>,
    pub banners_shown: u32,
    pub paused: bool,
    pub sounds: Vec<SoundEffect>,
}

impl Hud for RecordingHud {
    fn set_score_text(&mut self, text: &str) {
        self.score_text = text.to_string();
    }

    fn set_lives_text(&mut self, text: &str) {
        self.lives_text = text.to_string();
    }

    fn show_round_end(&mut self, message: &str) {
        self.banner = Some(message.to_string());
        self.banners_shown += 1;
    }

    fn hide_round_end(&mut self) {
        self.banner = None;
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        self.sounds.push(effect);
    }
}

/// HUD for headless runs: writes changes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogHud;

impl Hud for LogHud {
    fn set_score_text(&mut self, text: &str) {
        log::debug!("[hud] {}", text);
    }

    fn set_lives_text(&mut self, text: &str) {
        log::info!("[hud] {}", text);
    }

    fn show_round_end(&mut self, message: &str) {
        log::info!("[hud] {}", message.replace('\n', " | "));
    }

    fn hide_round_end(&mut self) {}

    fn set_paused(&mut self, paused: bool) {
        log::info!("[hud] {}", if paused { "Paused" } else { "Playing" });
    }
}
