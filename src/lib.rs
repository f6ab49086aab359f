//! Fruit Slice - an arcade slicing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling, hit-testing, rounds)
//! - `driver`: Frame loop driver that connects the simulation to presentation
//! - `platform`: Presentation seams (drawing surface, HUD)
//! - `renderer`: WebGPU presentation adapter
//! - `session`: External auth/session boundary
//! - `persistence`: Write-only score sink boundary

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod driver;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use driver::{LoopDriver, LoopState};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Side length of every entity's square bounding box (pixels)
    pub const ENTITY_SIZE: f32 = 60.0;

    /// Wall-clock interval between spawns
    pub const SPAWN_INTERVAL_MS: u32 = 1000;
    /// Probability that a spawned entity is a bomb
    pub const BOMB_CHANCE: f64 = 0.2;
    /// Fall speed range (pixels per frame update)
    pub const MIN_FALL_SPEED: f32 = 3.0;
    pub const MAX_FALL_SPEED: f32 = 6.0;

    /// Lives at the start of every round
    pub const STARTING_LIVES: u8 = 3;

    /// Radius of the decorative splash drawn at a slice
    pub const SPLASH_RADIUS: f32 = 30.0;
    /// Frames a splash stays on screen
    pub const SPLASH_FRAMES: u32 = 12;

    /// Nominal display refresh used by the headless demo
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
