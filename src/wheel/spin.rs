//! Spin session: the motion plan for one spin
//!
//! The outcome is decided before any of this runs. A session only moves the
//! wheel from its current rotation to a target that parks the chosen slice
//! under the pointer.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::slice::{Slice, boundary_count};
use crate::consts::POINTER_ANGLE;

/// Cubic ease-out: fast start, zero velocity at t = 1
#[inline]
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Rotation that parks the middle of slice `index` under the pointer, plus
/// `extra_turns` full turns. The result is advanced by whole turns until it
/// lies strictly ahead of `start`, so the wheel never turns backwards; this
/// never changes the resting slice.
pub fn target_rotation(index: usize, count: usize, start: f64, extra_turns: u32) -> f64 {
    let base = POINTER_ANGLE - Slice::new(index, count).mid();
    let wind = if start > 0.0 {
        (start / TAU).ceil() * TAU
    } else {
        0.0
    };
    let target = base + wind + extra_turns as f64 * TAU;
    if target > start {
        target
    } else {
        target + ((start - target) / TAU).floor() * TAU + TAU
    }
}

/// Motion parameters shared by every spin of a wheel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinParams {
    pub duration_ms: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    /// Fraction of the duration after which ticks are suppressed
    pub tick_cutoff: f64,
}

impl Default for SpinParams {
    fn default() -> Self {
        use crate::consts::*;
        Self {
            duration_ms: SPIN_DURATION_MS,
            min_turns: MIN_TURNS,
            max_turns: MAX_TURNS,
            tick_cutoff: TICK_CUTOFF,
        }
    }
}

/// One frame's worth of motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinFrame {
    pub rotation: f64,
    /// Normalized time in [0, 1]
    pub t: f64,
    /// A slice boundary passed the pointer this frame
    pub tick: bool,
    pub finished: bool,
}

/// A live spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinSession {
    /// Chosen outcome index (authoritative)
    pub index: usize,
    pub slice_count: usize,
    pub start_rotation: f64,
    pub target_rotation: f64,
    pub started_at_ms: f64,
    pub duration_ms: f64,
    pub tick_cutoff: f64,
    pub extra_turns: u32,
    /// Last boundary count seen, for edge-triggered ticks
    last_boundary: i64,
}

impl SpinSession {
    pub fn new(
        index: usize,
        slice_count: usize,
        start_rotation: f64,
        extra_turns: u32,
        started_at_ms: f64,
        params: &SpinParams,
    ) -> Self {
        Self {
            index,
            slice_count,
            start_rotation,
            target_rotation: target_rotation(index, slice_count, start_rotation, extra_turns),
            started_at_ms,
            duration_ms: params.duration_ms.max(1.0),
            tick_cutoff: params.tick_cutoff,
            extra_turns,
            last_boundary: boundary_count(start_rotation, slice_count),
        }
    }

    /// Normalized progress at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased rotation at normalized time `t`, exactly the target at t >= 1
    pub fn rotation_at(&self, t: f64) -> f64 {
        if t >= 1.0 {
            return self.target_rotation;
        }
        self.start_rotation + (self.target_rotation - self.start_rotation) * ease_out_cubic(t)
    }

    /// Advance to `now_ms` and report the frame
    pub fn step(&mut self, now_ms: f64) -> SpinFrame {
        let t = self.progress(now_ms);
        let rotation = self.rotation_at(t);

        let boundary = boundary_count(rotation, self.slice_count);
        let crossed = boundary > self.last_boundary;
        if crossed {
            self.last_boundary = boundary;
        }

        SpinFrame {
            rotation,
            t,
            tick: crossed && t < self.tick_cutoff,
            finished: t >= 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::slice::slice_at_pointer;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_ease_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        // Clamped outside [0, 1]
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
    }

    #[test]
    fn test_ease_decelerates_to_rest() {
        let h = 1e-6;
        let end_slope = (ease_out_cubic(1.0) - ease_out_cubic(1.0 - h)) / h;
        assert!(end_slope < 1e-4);
        let start_slope = (ease_out_cubic(h) - ease_out_cubic(0.0)) / h;
        assert!((start_slope - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_target_for_index_two_of_six() {
        for k in 5..=9u32 {
            let target = target_rotation(2, 6, 0.0, k);
            let expected = -PI / 2.0 - 2.5 * (PI / 3.0) + k as f64 * TAU;
            assert!((target - expected).abs() < 1e-12, "k={}", k);
            assert_eq!(slice_at_pointer(target, 6), 2);
        }
    }

    #[test]
    fn test_final_frame_snaps_to_target() {
        let params = SpinParams::default();
        let mut session = SpinSession::new(2, 6, 0.0, 7, 1000.0, &params);
        let frame = session.step(1000.0 + params.duration_ms);
        assert!(frame.finished);
        assert_eq!(frame.rotation, session.target_rotation);

        // Well past the end stays on the target
        let frame = session.step(1000.0 + params.duration_ms * 3.0);
        assert_eq!(frame.rotation, session.target_rotation);
    }

    #[test]
    fn test_target_stays_ahead_of_accumulated_rotation() {
        let start = 57.3;
        let target = target_rotation(0, 12, start, 5);
        assert!(target > start + 4.0 * TAU);
        assert_eq!(slice_at_pointer(target, 12), 0);
    }

    #[test]
    fn test_ticks_are_edge_triggered_and_suppressed_at_rest() {
        let params = SpinParams {
            duration_ms: 1000.0,
            ..Default::default()
        };
        let mut session = SpinSession::new(3, 8, 0.0, 5, 0.0, &params);

        let mut ticks = 0;
        let mut last_t = 0.0;
        for ms in (0..=1000).step_by(1) {
            let frame = session.step(ms as f64);
            if frame.tick {
                ticks += 1;
                last_t = frame.t;
            }
        }
        // Never more than one tick per boundary crossed
        let crossed = boundary_count(session.target_rotation, 8) - boundary_count(0.0, 8);
        assert!(ticks > 0);
        assert!(ticks as i64 <= crossed);
        assert!(last_t < params.tick_cutoff);

        // Repeating the same frame never re-ticks
        let frame = session.step(500.0);
        assert!(!frame.tick);
    }

    #[test]
    fn test_zero_turns_still_spins_forward_and_ticks() {
        let params = crate::settings::WheelSettings {
            min_turns: 0,
            max_turns: 0,
            ..Default::default()
        }
        .validated()
        .spin_params();
        let start = 0.1;
        let mut session = SpinSession::new(11, 12, start, params.min_turns, 0.0, &params);
        assert!(session.target_rotation > start);
        assert_eq!(slice_at_pointer(session.target_rotation, 12), 11);

        let mut ticks = 0;
        let mut ms = 0.0;
        loop {
            let frame = session.step(ms);
            if frame.tick {
                ticks += 1;
            }
            if frame.finished {
                break;
            }
            ms += 16.0;
        }
        assert!(ticks > 0);
    }

    #[test]
    fn test_target_exactly_at_start_moves_a_full_turn() {
        let base = target_rotation(0, 4, 0.0, 1);
        let target = target_rotation(0, 4, base, 0);
        assert!(target > base);
        assert!((target - base - TAU).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_spin_lands_in_chosen_slice(
            count in 2usize..64,
            pick in 0usize..1000,
            start in -50.0f64..500.0,
            turns in 0u32..=9,
        ) {
            let index = pick % count;
            let target = target_rotation(index, count, start, turns);
            prop_assert!(target > start);

            // Pointer lands inside the slice, near its middle
            let slice = Slice::new(index, count);
            let local = crate::wheel::slice::pointer_local_angle(target);
            let off = (local - slice.mid()).abs();
            let off = off.min(TAU - off);
            prop_assert!(off < slice.width() / 2.0 - 1e-9);
        }

        #[test]
        fn prop_ease_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_out_cubic(lo) <= ease_out_cubic(hi));
        }
    }
}
