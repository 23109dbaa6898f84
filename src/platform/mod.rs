//! Platform abstraction layer
//!
//! Capabilities the wheel needs from its host:
//! - Time (`Clock`)
//! - Frame scheduling with cancellation (`FrameScheduler`)
//!
//! Browser implementations live behind `cfg(target_arch = "wasm32")`; the
//! manual implementations drive tests and the native demo.

pub mod frame;
pub mod time;

pub use frame::{FrameCallback, FrameHandle, FrameScheduler, ManualScheduler};
pub use time::{Clock, ManualClock};

#[cfg(target_arch = "wasm32")]
pub use frame::RafScheduler;
#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
