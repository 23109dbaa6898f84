//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::commands::DrawCommand;
use super::viewport::Viewport;

/// Replays draw commands onto a `<canvas>`
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Viewport from the canvas's CSS size and the window's pixel ratio
    pub fn measure(&self) -> Viewport {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let (w, h) = match (self.canvas.client_width(), self.canvas.client_height()) {
            (w, h) if w > 0 && h > 0 => (w as f64, h as f64),
            // Not laid out yet: use the attribute size
            _ => (self.canvas.width() as f64, self.canvas.height() as f64),
        };
        Viewport::new(w, h, dpr)
    }

    /// Size the backing buffer for `viewport`
    pub fn resize(&self, viewport: &Viewport) {
        let (w, h) = viewport.buffer_size();
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            log::debug!("Canvas buffer resized to {}x{}", w, h);
        }
    }

    pub fn paint(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        for command in commands {
            match command {
                DrawCommand::SetScale(scale) => ctx.set_transform(*scale, 0.0, 0.0, *scale, 0.0, 0.0)?,
                DrawCommand::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
                DrawCommand::Wedge {
                    center,
                    radius,
                    start,
                    end,
                    fill,
                    stroke,
                    line_width,
                } => {
                    ctx.begin_path();
                    ctx.move_to(center.x, center.y);
                    ctx.arc(center.x, center.y, *radius, *start, *end)?;
                    ctx.close_path();
                    ctx.set_fill_style_str(&fill.to_css());
                    ctx.fill();
                    ctx.set_stroke_style_str(&stroke.to_css());
                    ctx.set_line_width(*line_width);
                    ctx.stroke();
                }
                DrawCommand::Label {
                    center,
                    angle,
                    offset,
                    text,
                    font,
                    fill,
                } => {
                    ctx.save();
                    ctx.translate(center.x, center.y)?;
                    ctx.rotate(*angle)?;
                    ctx.set_text_align("right");
                    ctx.set_fill_style_str(&fill.to_css());
                    ctx.set_font(font);
                    let drawn = ctx.fill_text(text, offset.x, offset.y);
                    ctx.restore();
                    drawn?;
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                    line_width,
                } => {
                    ctx.begin_path();
                    ctx.arc(center.x, center.y, *radius, 0.0, TAU)?;
                    ctx.set_fill_style_str(&fill.to_css());
                    ctx.fill();
                    ctx.set_stroke_style_str(&stroke.to_css());
                    ctx.set_line_width(*line_width);
                    ctx.stroke();
                }
            }
        }
        Ok(())
    }
}
