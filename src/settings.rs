//! Wheel settings and preferences
//!
//! Read from LocalStorage on the web; the page owns writing it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wheel::{OutcomeConfig, SpinParams};

/// Which outcomes the wheel shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutcomeMode {
    /// Fixed cosmetic labels
    #[default]
    Curated,
    /// Regenerable numeric amounts
    Amounts {
        config: OutcomeConfig,
        requested: usize,
    },
}

impl OutcomeMode {
    /// Generation bounds and requested count, if numeric
    pub fn amounts(&self) -> Option<(OutcomeConfig, usize)> {
        match self {
            OutcomeMode::Curated => None,
            OutcomeMode::Amounts { config, requested } => Some((*config, *requested)),
        }
    }
}

/// Wheel settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSettings {
    // === Spin ===
    /// Spin animation length (ms)
    pub spin_duration_ms: f64,
    /// Minimum extra full turns per spin
    pub min_turns: u32,
    /// Maximum extra full turns per spin
    pub max_turns: u32,
    /// Fraction of the spin after which ticks stop
    pub tick_cutoff: f64,

    // === Display ===
    /// Wheel labels longer than this are truncated
    pub label_max_chars: usize,
    pub outcomes: OutcomeMode,

    // === Effects ===
    pub tick_sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Tick volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Confetti on landing
    pub celebration: bool,

    // === Accessibility ===
    /// Shorter spin, no confetti
    pub reduced_motion: bool,

    // === Checkout ===
    pub checkout_endpoint: String,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            spin_duration_ms: SPIN_DURATION_MS,
            min_turns: MIN_TURNS,
            max_turns: MAX_TURNS,
            tick_cutoff: TICK_CUTOFF,

            label_max_chars: LABEL_MAX_CHARS,
            outcomes: OutcomeMode::Curated,

            tick_sound: true,
            master_volume: 0.8,
            sfx_volume: 0.25,
            celebration: true,

            reduced_motion: false,

            checkout_endpoint: "/api/create-checkout-session".to_string(),
        }
    }
}

impl WheelSettings {
    /// Copy with out-of-range values pulled back into range
    pub fn validated(&self) -> Self {
        let mut s = self.clone();
        if !s.spin_duration_ms.is_finite() || s.spin_duration_ms <= 0.0 {
            log::warn!("Invalid spin duration {}, using default", s.spin_duration_ms);
            s.spin_duration_ms = SPIN_DURATION_MS;
        }
        if s.min_turns > s.max_turns {
            std::mem::swap(&mut s.min_turns, &mut s.max_turns);
        }
        s.tick_cutoff = if s.tick_cutoff.is_finite() {
            s.tick_cutoff.clamp(0.0, 1.0)
        } else {
            TICK_CUTOFF
        };
        s.master_volume = s.master_volume.clamp(0.0, 1.0);
        s.sfx_volume = s.sfx_volume.clamp(0.0, 1.0);
        s.label_max_chars = s.label_max_chars.max(1);
        s
    }

    /// Spin duration honoring reduced motion
    pub fn effective_duration_ms(&self) -> f64 {
        if self.reduced_motion {
            self.spin_duration_ms.min(REDUCED_MOTION_DURATION_MS)
        } else {
            self.spin_duration_ms
        }
    }

    /// Celebration honoring reduced motion
    pub fn effective_celebration(&self) -> bool {
        self.celebration && !self.reduced_motion
    }

    pub fn effective_tick_volume(&self) -> f32 {
        if self.tick_sound {
            self.master_volume * self.sfx_volume
        } else {
            0.0
        }
    }

    pub fn spin_params(&self) -> SpinParams {
        SpinParams {
            duration_ms: self.effective_duration_ms(),
            min_turns: self.min_turns,
            max_turns: self.max_turns,
            tick_cutoff: self.tick_cutoff,
        }
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "prize_wheel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Self>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.validated();
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_json() {
        let settings = WheelSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let back: WheelSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"spin_duration_ms": 3000.0, "outcomes": {"mode": "amounts", "config": {"min_count": 6, "max_count": 24, "min_value": 5, "max_value": 100000}, "requested": 8}}"#;
        let settings: WheelSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.spin_duration_ms, 3000.0);
        assert_eq!(settings.max_turns, MAX_TURNS);
        let (config, requested) = settings.outcomes.amounts().unwrap();
        assert_eq!(config, OutcomeConfig::default());
        assert_eq!(requested, 8);
    }

    #[test]
    fn test_validated_repairs_bad_values() {
        let settings = WheelSettings {
            spin_duration_ms: -5.0,
            min_turns: 9,
            max_turns: 3,
            tick_cutoff: 4.0,
            master_volume: 2.0,
            label_max_chars: 0,
            ..Default::default()
        }
        .validated();
        assert_eq!(settings.spin_duration_ms, SPIN_DURATION_MS);
        assert_eq!((settings.min_turns, settings.max_turns), (3, 9));
        assert_eq!(settings.tick_cutoff, 1.0);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.label_max_chars, 1);
    }

    #[test]
    fn test_reduced_motion() {
        let settings = WheelSettings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_celebration());
        assert_eq!(settings.spin_params().duration_ms, REDUCED_MOTION_DURATION_MS);
    }

    #[test]
    fn test_tick_volume() {
        let settings = WheelSettings::default();
        assert!((settings.effective_tick_volume() - 0.2).abs() < 1e-6);
        let muted = WheelSettings {
            tick_sound: false,
            ..Default::default()
        };
        assert_eq!(muted.effective_tick_volume(), 0.0);
    }
}
