//! Prize Wheel - a payment-gated, single-use prize wheel
//!
//! Core modules:
//! - `wheel`: Deterministic spin engine (outcomes, gate, spin controller)
//! - `renderer`: Pure wheel renderer producing draw commands, plus the canvas backend
//! - `platform`: Clock and frame-scheduling capabilities
//! - `effects`: Optional audio/celebration capabilities
//! - `checkout`: Payment session contract that feeds the gate
//! - `settings`: Data-driven wheel configuration

pub mod checkout;
pub mod effects;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod wheel;

pub use error::{CheckoutError, OutcomeError, SpinError};
pub use settings::WheelSettings;
pub use wheel::{Gate, GateState, Outcome, OutcomeSet, Wheel, WheelEvent};

/// Wheel configuration constants
pub mod consts {
    use std::f64::consts::FRAC_PI_2;

    /// Fixed pointer angle: top of the wheel (0 points right, y grows downward)
    pub const POINTER_ANGLE: f64 = -FRAC_PI_2;

    /// Default spin duration (ms)
    pub const SPIN_DURATION_MS: f64 = 2200.0;
    /// Spin duration when reduced motion is requested (ms)
    pub const REDUCED_MOTION_DURATION_MS: f64 = 900.0;

    /// Extra full turns added to every spin, inclusive range
    pub const MIN_TURNS: u32 = 5;
    pub const MAX_TURNS: u32 = 9;

    /// Fraction of the spin after which boundary ticks are suppressed
    pub const TICK_CUTOFF: f64 = 0.98;

    /// Labels longer than this are truncated with an ellipsis
    pub const LABEL_MAX_CHARS: usize = 18;

    /// A spin needs at least this many outcomes
    pub const MIN_OUTCOMES: usize = 2;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    use std::f64::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        assert!((normalize_angle(5.0 * TAU + 0.25) - 0.25).abs() < 1e-9);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert!(normalize_angle(-1e-18) < TAU);
    }
}
