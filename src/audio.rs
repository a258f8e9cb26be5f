//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Correct answer, rocket lifts off
    Launch,
    /// Wrong answer buzz
    WrongAnswer,
    /// Rocket hits the planet
    Explosion,
    /// New problem on screen
    NextProblem,
    /// Run finished, result screen up
    RunComplete,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Pick up volume and mute from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let t = ctx.current_time();
        match effect {
            SoundEffect::Launch => {
                // Rising whoosh
                self.sweep(ctx, OscillatorType::Sawtooth, 120.0, 900.0, vol * 0.25, t, 0.6);
                self.sweep(ctx, OscillatorType::Sine, 60.0, 180.0, vol * 0.4, t, 0.6);
            }
            SoundEffect::WrongAnswer => {
                self.sweep(ctx, OscillatorType::Square, 180.0, 110.0, vol * 0.25, t, 0.25);
            }
            SoundEffect::Explosion => {
                self.sweep(ctx, OscillatorType::Sawtooth, 100.0, 30.0, vol * 0.5, t, 0.5);
                self.sweep(ctx, OscillatorType::Square, 1500.0, 400.0, vol * 0.2, t, 0.15);
                self.sweep(ctx, OscillatorType::Sine, 60.0, 25.0, vol * 0.5, t, 0.6);
            }
            SoundEffect::NextProblem => {
                self.sweep(ctx, OscillatorType::Triangle, 660.0, 660.0, vol * 0.2, t, 0.08);
                self.sweep(ctx, OscillatorType::Triangle, 880.0, 880.0, vol * 0.2, t + 0.08, 0.1);
            }
            SoundEffect::RunComplete => {
                // Major arpeggio
                for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
                    let start = t + i as f64 * 0.12;
                    self.sweep(ctx, OscillatorType::Triangle, freq, freq, vol * 0.25, start, 0.25);
                }
            }
        }
    }

    /// Create an oscillator routed through a gain node
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

    /// One oscillator gliding from `from` to `to` Hz with a decaying envelope
    #[allow(clippy::too_many_arguments)]
    fn sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        from: f32,
        to: f32,
        peak: f32,
        start: f64,
        duration: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };

        gain.gain().set_value_at_time(peak, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, start + duration)
            .ok();
        if from != to {
            osc.frequency().set_value_at_time(from, start).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(to, start + duration)
                .ok();
        }

        osc.start_with_when(start).ok();
        osc.stop_with_when(start + duration + 0.05).ok();
    }
}
