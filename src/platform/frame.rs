//! Frame scheduling
//!
//! A scheduler runs a callback once on the next frame. Recurring animation
//! re-registers every frame, so cancelling the pending handle stops it.

use std::cell::{Cell, RefCell};

/// Callback run with the frame timestamp (ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Identifies a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

pub trait FrameScheduler {
    /// Queue `callback` for the next frame. `None` if the host can no longer
    /// schedule frames.
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle>;

    /// Drop a pending request. Unknown or already-run handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Scheduler fired by hand, for tests and headless runs
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Vec<(FrameHandle, FrameCallback)>>,
    next_id: Cell<i32>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued callbacks
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Run every callback queued before this call. Callbacks may queue new
    /// ones; those wait for the next `fire`.
    pub fn fire(&self, now_ms: f64) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(now_ms);
        }
        count
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = FrameHandle(id);
        self.pending.borrow_mut().push((handle, callback));
        Some(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(h, _)| *h != handle);
    }
}

/// `requestAnimationFrame` in the browser
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct RafScheduler;

#[cfg(target_arch = "wasm32")]
impl FrameScheduler for RafScheduler {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameHandle> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let window = web_sys::window()?;
        let closure = Closure::once(move |time: f64| callback(time));
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|e| log::error!("requestAnimationFrame failed: {:?}", e))
            .ok()?;
        closure.forget();
        Some(FrameHandle(id))
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0);
        }
    }
}
