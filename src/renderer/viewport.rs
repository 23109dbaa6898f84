//! Logical canvas size and device pixel ratio
//!
//! Layout is computed once in logical pixels. High-density screens only get a
//! bigger backing buffer and a scale transform.

use glam::DVec2;

/// Gap between the wheel rim and the canvas edge
pub const RIM_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width (CSS pixels)
    pub width: f64,
    /// Logical height (CSS pixels)
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            device_pixel_ratio: dpr,
        }
    }

    /// Backing buffer size in device pixels
    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.width * self.device_pixel_ratio).round() as u32,
            (self.height * self.device_pixel_ratio).round() as u32,
        )
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wheel radius (logical)
    pub fn wheel_radius(&self) -> f64 {
        let c = self.center();
        (c.x.min(c.y) - RIM_MARGIN).max(0.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(360.0, 360.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_scales_layout_does_not() {
        let sd = Viewport::new(360.0, 360.0, 1.0);
        let hd = Viewport::new(360.0, 360.0, 2.0);
        assert_eq!(sd.buffer_size(), (360, 360));
        assert_eq!(hd.buffer_size(), (720, 720));
        assert_eq!(sd.wheel_radius(), hd.wheel_radius());
        assert_eq!(hd.center(), DVec2::new(180.0, 180.0));
    }

    #[test]
    fn test_bad_dpr_falls_back() {
        assert_eq!(Viewport::new(100.0, 50.0, 0.0).device_pixel_ratio, 1.0);
        assert_eq!(Viewport::new(100.0, 50.0, f64::NAN).device_pixel_ratio, 1.0);
        assert_eq!(Viewport::new(100.0, 50.0, 1.0).wheel_radius(), 15.0);
    }
}
