//! Backend-neutral draw commands

use glam::DVec2;

/// 8-bit RGB with float alpha, as canvas CSS colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Wheel palette
pub mod colors {
    use super::Rgba;

    pub const WEDGE_EVEN: Rgba = Rgba::rgb(0x1f, 0x1f, 0x1f);
    pub const WEDGE_ODD: Rgba = Rgba::rgb(0x2a, 0x2a, 0x2a);
    pub const BORDER: Rgba = Rgba::rgba(255, 255, 255, 0.18);
    pub const LABEL: Rgba = Rgba::rgba(255, 255, 255, 0.9);
    pub const HUB: Rgba = Rgba::rgb(0x11, 0x11, 0x11);
}

/// One drawing step, in logical (CSS pixel) coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Replace the current transform with a uniform scale
    SetScale(f64),
    /// Clear the logical area
    Clear { width: f64, height: f64 },
    /// Filled and stroked pie slice
    Wedge {
        center: DVec2,
        radius: f64,
        start: f64,
        end: f64,
        fill: Rgba,
        stroke: Rgba,
        line_width: f64,
    },
    /// Right-aligned text drawn in a frame rotated by `angle` around
    /// `center`, anchored at `offset` within that frame
    Label {
        center: DVec2,
        angle: f64,
        offset: DVec2,
        text: String,
        font: &'static str,
        fill: Rgba,
    },
    /// Filled and stroked circle
    Circle {
        center: DVec2,
        radius: f64,
        fill: Rgba,
        stroke: Rgba,
        line_width: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_colors() {
        assert_eq!(colors::WEDGE_EVEN.to_css(), "#1f1f1f");
        assert_eq!(colors::HUB.to_css(), "#111111");
        assert_eq!(colors::BORDER.to_css(), "rgba(255,255,255,0.18)");
    }
}
