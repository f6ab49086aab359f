//! Loop driver
//!
//! Owns nothing but presentation bookkeeping: the host keeps the `GameState`
//! and hands it in on every frame, spawn interval, and pointer event. After
//! each of those the driver drains the simulation's events and forwards them
//! to the HUD, sounds and transient splash effects.

use glam::Vec2;

use crate::consts::SPLASH_FRAMES;
use crate::platform::{DrawSurface, Hud, SoundEffect};
use crate::sim::{
    GameEvent, GameState, PointerOutcome, RoundEndReason, handle_pointer, spawn_tick, tick,
};

/// Driver run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Frames still draw, but nothing moves or spawns and pointers are ignored
    Paused,
}

/// A round that has finished since the last `take_finished_rounds`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub reason: RoundEndReason,
    pub final_score: u32,
}

/// Decorative splash left behind by a slice
#[derive(Debug, Clone, Copy, PartialEq)]
struct Splash {
    center: Vec2,
    frames_left: u32,
}

#[derive(Debug)]
pub struct LoopDriver {
    state: LoopState,
    frames: u64,
    splashes: Vec<Splash>,
    splash_radius: f32,
    splashes_enabled: bool,
    draw_failures: u64,
    finished: Vec<RoundSummary>,
    /// Pause state the HUD last showed
    hud_paused: bool,
}

impl LoopDriver {
    pub fn new(splash_radius: f32) -> Self {
        Self {
            state: LoopState::Running,
            frames: 0,
            splashes: Vec::new(),
            splash_radius,
            splashes_enabled: true,
            draw_failures: 0,
            finished: Vec::new(),
            hud_paused: false,
        }
    }

    pub fn set_splashes_enabled(&mut self, enabled: bool) {
        self.splashes_enabled = enabled;
        if !enabled {
            self.splashes.clear();
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == LoopState::Paused
    }

    pub fn pause(&mut self) {
        if self.state == LoopState::Running {
            log::info!("Paused");
            self.state = LoopState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == LoopState::Paused {
            log::info!("Resumed");
            self.state = LoopState::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            LoopState::Running => self.pause(),
            LoopState::Paused => self.resume(),
        }
    }

    /// Frames run so far (including paused ones)
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls that failed and were skipped
    pub fn draw_failures(&self) -> u64 {
        self.draw_failures
    }

    /// Push the current score and lives to the HUD
    pub fn sync_hud(&self, game: &GameState, hud: &mut dyn Hud) {
        hud.set_score_text(&game.score_text());
        hud.set_lives_text(&game.lives_text());
    }

    /// One display frame: clear, advance, then draw in spawn order
    pub fn frame(&mut self, game: &mut GameState, surface: &mut dyn DrawSurface, hud: &mut dyn Hud) {
        self.frames += 1;

        if let Err(e) = surface.clear() {
            self.note_draw_failure(&e);
        }

        // Ticks before drawing: an entity that falls out this frame is never
        // drawn at its final, already off-screen, position.
        if self.state == LoopState::Running {
            tick(game);
        }
        self.sync_pause(hud);
        self.present(game, hud);
        self.draw(game, surface);
    }

    /// One spawn interval elapsed
    pub fn spawn(&mut self, game: &mut GameState, hud: &mut dyn Hud) -> Option<u32> {
        if self.is_paused() {
            return None;
        }
        let id = spawn_tick(game);
        self.present(game, hud);
        id
    }

    /// Pointer-down in playfield coordinates.
    /// While paused the tap only resumes play; nothing is sliced.
    pub fn pointer(&mut self, game: &mut GameState, point: Vec2, hud: &mut dyn Hud) -> PointerOutcome {
        if self.is_paused() {
            self.resume();
            self.sync_pause(hud);
            return PointerOutcome::Ignored;
        }
        let outcome = handle_pointer(game, point);
        self.present(game, hud);
        outcome
    }

    /// Dismiss the round-over banner without a pointer (keyboard, headless)
    pub fn acknowledge(&mut self, game: &mut GameState, hud: &mut dyn Hud) -> bool {
        if self.is_paused() {
            return false;
        }
        let reset = game.acknowledge();
        self.present(game, hud);
        reset
    }

    /// Show or hide the paused banner if the run state changed
    fn sync_pause(&mut self, hud: &mut dyn Hud) {
        let paused = self.is_paused();
        if paused != self.hud_paused {
            hud.set_paused(paused);
            self.hud_paused = paused;
        }
    }

    /// Rounds that ended since the last call, oldest first
    pub fn take_finished_rounds(&mut self) -> Vec<RoundSummary> {
        std::mem::take(&mut self.finished)
    }

    /// Forward pending simulation events to the HUD
    pub fn present(&mut self, game: &mut GameState, hud: &mut dyn Hud) {
        for event in game.drain_events() {
            match event {
                GameEvent::Spawned { .. } => {}
                GameEvent::Sliced { at, .. } => {
                    hud.play_sound(SoundEffect::Slice);
                    if self.splashes_enabled {
                        self.splashes.push(Splash {
                            center: at,
                            frames_left: SPLASH_FRAMES,
                        });
                    }
                }
                GameEvent::Missed { kind, .. } => {
                    if kind.is_fruit() {
                        hud.play_sound(SoundEffect::Miss);
                    }
                }
                GameEvent::ScoreChanged(_) => hud.set_score_text(&game.score_text()),
                GameEvent::LivesChanged(_) => hud.set_lives_text(&game.lives_text()),
                GameEvent::RoundEnded {
                    reason,
                    final_score,
                } => {
                    hud.play_sound(match reason {
                        RoundEndReason::BombHit => SoundEffect::Explosion,
                        RoundEndReason::LivesExhausted => SoundEffect::GameOver,
                    });
                    hud.show_round_end(&round_end_message(reason, final_score));
                    self.finished.push(RoundSummary {
                        reason,
                        final_score,
                    });
                }
                GameEvent::RoundReset => {
                    self.splashes.clear();
                    hud.hide_round_end();
                    self.sync_hud(game, hud);
                }
            }
        }
    }

    fn draw(&mut self, game: &GameState, surface: &mut dyn DrawSurface) {
        for entity in &game.entities {
            if let Err(e) = surface.draw_entity(entity.kind, entity.pos, entity.size) {
                self.note_draw_failure(&e);
            }
        }

        let radius = self.splash_radius;
        let mut failures = Vec::new();
        for splash in &mut self.splashes {
            let alpha = splash.frames_left as f32 / SPLASH_FRAMES as f32;
            if let Err(e) = surface.draw_effect(splash.center, radius, alpha) {
                failures.push(e);
            }
            splash.frames_left -= 1;
        }
        self.splashes.retain(|s| s.frames_left > 0);
        for e in &failures {
            self.note_draw_failure(e);
        }
    }

    fn note_draw_failure(&mut self, error: &crate::platform::DrawError) {
        self.draw_failures += 1;
        if self.draw_failures == 1 {
            log::warn!("Draw failed, skipping: {}", error);
        } else {
            log::trace!("Draw failed, skipping: {}", error);
        }
    }
}

/// Banner text for a finished round
pub fn round_end_message(reason: RoundEndReason, final_score: u32) -> String {
    format!("{}\nFinal Score: {}", reason.headline(), final_score)
}
