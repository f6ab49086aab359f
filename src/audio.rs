//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, so no audio files need loading.
//! Every effect is a short list of oscillator tones.

use web_sys::{AudioContext, OscillatorType};

use crate::platform::SoundEffect;
use crate::settings::Settings;

/// One oscillator voice with an exponential fade
#[derive(Debug, Clone, Copy)]
struct Tone {
    wave: OscillatorType,
    freq: f32,
    /// Pitch at the end of the tone; `None` holds `freq`
    glide_to: Option<f32>,
    /// Seconds after the effect starts
    delay: f64,
    duration: f64,
    /// Peak gain before volume scaling
    gain: f32,
}

impl Tone {
    const fn new(wave: OscillatorType, freq: f32, duration: f64, gain: f32) -> Self {
        Self {
            wave,
            freq,
            glide_to: None,
            delay: 0.0,
            duration,
            gain,
        }
    }

    const fn glide(mut self, to: f32) -> Self {
        self.glide_to = Some(to);
        self
    }

    const fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

const SLICE: &[Tone] = &[
    // Swish
    Tone::new(OscillatorType::Sawtooth, 2400.0, 0.12, 0.2).glide(300.0),
    // Wet pop
    Tone::new(OscillatorType::Sine, 180.0, 0.07, 0.35).after(0.03),
];

const EXPLOSION: &[Tone] = &[
    Tone::new(OscillatorType::Sawtooth, 100.0, 0.6, 0.5).glide(25.0),
    // Crack
    Tone::new(OscillatorType::Square, 1500.0, 0.1, 0.2),
];

const MISS: &[Tone] = &[Tone::new(OscillatorType::Triangle, 220.0, 0.25, 0.3).glide(110.0)];

const GAME_OVER: &[Tone] = &[
    Tone::new(OscillatorType::Sine, 400.0, 0.3, 0.3),
    Tone::new(OscillatorType::Sine, 350.0, 0.3, 0.3).after(0.2),
    Tone::new(OscillatorType::Sine, 300.0, 0.3, 0.3).after(0.4),
    Tone::new(OscillatorType::Sine, 200.0, 0.3, 0.3).after(0.6),
];

fn tones(effect: SoundEffect) -> &'static [Tone] {
    match effect {
        SoundEffect::Slice => SLICE,
        SoundEffect::Explosion => EXPLOSION,
        SoundEffect::Miss => MISS,
        SoundEffect::GameOver => GAME_OVER,
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Fails outside a secure context; the game just runs silent
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Re-read volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let start = ctx.current_time();
        for tone in tones(effect) {
            if self.voice(ctx, tone, start).is_none() {
                log::debug!("Could not schedule {:?} tone", effect);
            }
        }
    }

    fn voice(&self, ctx: &AudioContext, tone: &Tone, start: f64) -> Option<()> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(tone.wave);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let t = start + tone.delay;
        let end = t + tone.duration;
        osc.frequency().set_value_at_time(tone.freq, t).ok()?;
        if let Some(to) = tone.glide_to {
            osc.frequency().exponential_ramp_to_value_at_time(to, end).ok()?;
        }
        gain.gain().set_value_at_time(self.volume * tone.gain, t).ok()?;
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok()?;

        osc.start_with_when(t).ok()?;
        osc.stop_with_when(end + 0.05).ok()
    }
}
