//! Wheel rendering
//!
//! Layout produces backend-neutral draw commands; the canvas backend replays
//! them in the browser.

pub mod commands;
pub mod viewport;
pub mod wheel;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use commands::{DrawCommand, Rgba, colors};
pub use viewport::Viewport;
pub use wheel::{render, truncate_label};
