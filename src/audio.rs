//! Audio cues using the Web Audio API
//!
//! Procedurally generated tones - no external files needed. Playback is
//! fire-and-forget: any failure is swallowed and never touches game state.

use crate::sim::GameEvent;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// One enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency (Hz)
    pub freq: f32,
    /// Seconds until the gain has decayed
    pub duration: f64,
    /// Seconds after the cue fires
    pub delay: f64,
    pub waveform: Waveform,
}

impl Tone {
    const fn new(freq: f32, duration: f64, delay: f64, waveform: Waveform) -> Self {
        Self {
            freq,
            duration,
            delay,
            waveform,
        }
    }
}

/// Starting gain of every tone
pub const TONE_GAIN: f32 = 0.1;
/// Gain at the end of the exponential decay
pub const TONE_FLOOR: f32 = 0.001;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Fruit dropped
    Drop,
    /// Merge produced a fruit of this tier
    Merge { tier: usize },
    /// Stack crossed the line
    GameOver,
    /// Terminal tier reached
    Win,
}

impl SoundEffect {
    /// Cue for a simulation event
    pub fn for_event(event: &GameEvent) -> Self {
        match *event {
            GameEvent::Dropped { .. } => SoundEffect::Drop,
            GameEvent::Merged { tier, .. } => SoundEffect::Merge { tier },
            GameEvent::Won { .. } => SoundEffect::Win,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
        }
    }

    /// Notes making up this cue
    pub fn tones(&self) -> Vec<Tone> {
        match *self {
            SoundEffect::Drop => vec![Tone::new(220.0, 0.1, 0.0, Waveform::Triangle)],
            SoundEffect::Merge { tier } => {
                // Pitch climbs with the tier
                let base = 300.0 + tier as f32 * 50.0;
                vec![
                    Tone::new(base, 0.3, 0.0, Waveform::Sine),
                    Tone::new(base * 1.5, 0.2, 0.1, Waveform::Sine),
                ]
            }
            SoundEffect::GameOver => vec![
                Tone::new(150.0, 0.5, 0.0, Waveform::Sawtooth),
                Tone::new(100.0, 0.5, 0.2, Waveform::Sawtooth),
            ],
            SoundEffect::Win => vec![
                Tone::new(400.0, 0.4, 0.0, Waveform::Sine),
                Tone::new(600.0, 0.4, 0.2, Waveform::Sine),
            ],
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, TONE_FLOOR, TONE_GAIN, Tone, Waveform};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        enabled: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                enabled: true,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        pub fn is_enabled(&self) -> bool {
            self.enabled
        }

        /// Whether `play` would make any sound
        pub fn is_audible(&self) -> bool {
            self.enabled && self.master_volume > 0.0
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            if !self.is_audible() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers suspend the context until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.tones() {
                self.play_tone(ctx, &tone);
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone) {
            let osc_type = match tone.waveform {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            };
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, osc_type) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;

            gain.gain()
                .set_value_at_time(TONE_GAIN * self.master_volume, t)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(TONE_FLOOR, t + tone.duration)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.duration).ok();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::SoundEffect;

    /// Silent stand-in used for headless runs
    #[derive(Debug, Default)]
    pub struct AudioManager {
        enabled: bool,
        master_volume: f32,
    }

    impl AudioManager {
        pub fn new() -> Self {
            Self {
                enabled: true,
                master_volume: 0.8,
            }
        }

        pub fn resume(&self) {}

        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        pub fn is_enabled(&self) -> bool {
            self.enabled
        }

        /// Whether `play` would make any sound
        pub fn is_audible(&self) -> bool {
            self.enabled && self.master_volume > 0.0
        }

        pub fn play(&self, effect: SoundEffect) {
            if self.is_audible() {
                log::trace!("Sound cue: {:?}", effect);
            }
        }
    }
}
