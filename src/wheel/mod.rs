//! Deterministic spin engine
//!
//! All wheel logic lives here. This module must stay deterministic:
//! - Time is passed in, never read
//! - Seeded RNG only
//! - No rendering or platform dependencies beyond the injected capabilities

pub mod controller;
pub mod driver;
pub mod gate;
pub mod outcome;
pub mod slice;
pub mod spin;

pub use controller::{FrameStatus, Wheel, WheelEvent};
pub use driver::{FrameHook, SpinDriver};
pub use gate::{Gate, GateState, GateTransition};
pub use outcome::{CURATED_LABELS, Generated, Outcome, OutcomeConfig, OutcomeSet, format_amount};
pub use slice::{Slice, boundary_count, slice_at_pointer, slice_width};
pub use spin::{SpinFrame, SpinParams, SpinSession, ease_out_cubic, target_rotation};
