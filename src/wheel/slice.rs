//! Slice geometry for the wheel
//!
//! In the wheel's unrotated frame, slice `i` of `n` spans
//! `[i * width, (i + 1) * width)` with `width = 2π / n`. A wheel rotated by
//! `R` shows local angle `a` at screen angle `R + a`.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::consts::POINTER_ANGLE;
use crate::normalize_angle;

/// One wedge of the wheel in its local (unrotated) frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub index: usize,
    /// Start angle (radians, local frame)
    pub theta_start: f64,
    /// End angle (radians, local frame)
    pub theta_end: f64,
}

impl Slice {
    /// Slice `index` of a wheel with `count` slices
    pub fn new(index: usize, count: usize) -> Self {
        let width = slice_width(count);
        Self {
            index,
            theta_start: index as f64 * width,
            theta_end: (index + 1) as f64 * width,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.theta_end - self.theta_start
    }

    /// Angle at the middle of the slice
    #[inline]
    pub fn mid(&self) -> f64 {
        self.theta_start + self.width() / 2.0
    }

    /// Check if a local-frame angle falls in the slice (start inclusive)
    pub fn contains_angle(&self, theta: f64) -> bool {
        let theta = normalize_angle(theta);
        theta >= self.theta_start && theta < self.theta_end
    }

    /// Screen-space bounds when the wheel is rotated by `rotation`
    pub fn rotated(&self, rotation: f64) -> (f64, f64) {
        (rotation + self.theta_start, rotation + self.theta_end)
    }
}

/// Angular width of one slice
#[inline]
pub fn slice_width(count: usize) -> f64 {
    TAU / count as f64
}

/// Local-frame angle currently under the pointer
#[inline]
pub fn pointer_local_angle(rotation: f64) -> f64 {
    normalize_angle(POINTER_ANGLE - rotation)
}

/// Index of the slice under the pointer for a given rotation. An empty
/// wheel reports slice 0.
pub fn slice_at_pointer(rotation: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let local = pointer_local_angle(rotation);
    let index = (local / slice_width(count)).floor() as usize;
    // Guard the 2π edge against rounding
    index.min(count - 1)
}

/// Number of slice boundaries the pointer has passed since rotation zero.
/// Increases by one each time a boundary sweeps under the pointer.
pub fn boundary_count(rotation: f64, count: usize) -> i64 {
    ((rotation - POINTER_ANGLE) / slice_width(count)).floor() as i64
}
