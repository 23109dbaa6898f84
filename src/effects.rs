//! Optional spin effects
//!
//! Chosen once when a wheel is built. Hosts without audio or a confetti
//! library get the no-op implementations.

/// Plays the pointer tick as slice boundaries pass
pub trait AudioPlayer {
    fn play_tick(&self);
}

/// Fires once when a spin lands
pub trait CelebrationEffect {
    fn celebrate(&self);
}

/// Silent audio
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudio;

impl AudioPlayer for NoAudio {
    fn play_tick(&self) {}
}

/// No celebration
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCelebration;

impl CelebrationEffect for NoCelebration {
    fn celebrate(&self) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::{ConfettiCelebration, WebAudioTick, audio_from_settings, celebration_from_settings};

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioPlayer, CelebrationEffect, NoAudio, NoCelebration};
    use crate::settings::WheelSettings;

    /// Procedural tick through the Web Audio API - no sound file needed
    pub struct WebAudioTick {
        ctx: AudioContext,
        volume: f32,
    }

    impl WebAudioTick {
        /// `None` when no AudioContext can be created (insecure context, old browser)
        pub fn new(volume: f32) -> Option<Self> {
            match AudioContext::new() {
                Ok(ctx) => Some(Self {
                    ctx,
                    volume: volume.clamp(0.0, 1.0),
                }),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - tick sound disabled");
                    None
                }
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let osc = self.ctx.create_oscillator().ok()?;
            let gain = self.ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&self.ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    impl AudioPlayer for WebAudioTick {
        /// Short, light click
        fn play_tick(&self) {
            if self.volume <= 0.0 {
                return;
            }
            // Browsers keep the context suspended until a user gesture
            if self.ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = self.ctx.resume();
            }

            let Some((osc, gain)) = self.create_osc(1800.0, OscillatorType::Triangle) else {
                return;
            };
            let t = self.ctx.current_time();

            gain.gain().set_value_at_time(self.volume, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.03)
                .ok();
            osc.frequency().set_value_at_time(1800.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(900.0, t + 0.03)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.04).ok();
        }
    }

    /// Calls the page's `confetti()` function, if one was loaded
    pub struct ConfettiCelebration {
        confetti: js_sys::Function,
    }

    impl ConfettiCelebration {
        /// Looks up `window.confetti` once; `None` if the page has none
        pub fn detect() -> Option<Self> {
            let window = web_sys::window()?;
            let value = js_sys::Reflect::get(&window, &JsValue::from_str("confetti")).ok()?;
            let confetti = value.dyn_into::<js_sys::Function>().ok()?;
            Some(Self { confetti })
        }

        fn options() -> Result<js_sys::Object, JsValue> {
            let opts = js_sys::Object::new();
            js_sys::Reflect::set(&opts, &"particleCount".into(), &JsValue::from_f64(90.0))?;
            js_sys::Reflect::set(&opts, &"spread".into(), &JsValue::from_f64(70.0))?;
            let origin = js_sys::Object::new();
            js_sys::Reflect::set(&origin, &"y".into(), &JsValue::from_f64(0.6))?;
            js_sys::Reflect::set(&opts, &"origin".into(), &origin)?;
            Ok(opts)
        }
    }

    impl CelebrationEffect for ConfettiCelebration {
        fn celebrate(&self) {
            let result = Self::options().and_then(|opts| self.confetti.call1(&JsValue::NULL, &opts));
            if let Err(e) = result {
                log::warn!("confetti() failed: {:?}", e);
            }
        }
    }

    /// Audio capability for the given settings
    pub fn audio_from_settings(settings: &WheelSettings) -> Box<dyn AudioPlayer> {
        if !settings.tick_sound {
            return Box::new(NoAudio);
        }
        match WebAudioTick::new(settings.effective_tick_volume()) {
            Some(audio) => Box::new(audio),
            None => Box::new(NoAudio),
        }
    }

    /// Celebration capability for the given settings
    pub fn celebration_from_settings(settings: &WheelSettings) -> Box<dyn CelebrationEffect> {
        if !settings.effective_celebration() {
            return Box::new(NoCelebration);
        }
        match ConfettiCelebration::detect() {
            Some(confetti) => {
                log::info!("confetti() found - celebration enabled");
                Box::new(confetti)
            }
            None => Box::new(NoCelebration),
        }
    }
}
