//! Frame loop for a wheel
//!
//! Registers one frame at a time with a `FrameScheduler`, advances the wheel,
//! hands the new state to a frame hook (rendering, UI updates) and
//! re-registers until the spin finishes. Every frame checks a single
//! "still active" flag, so `cancel()` stops the loop at the next frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::controller::{FrameStatus, Wheel};
use crate::error::SpinError;
use crate::platform::{FrameHandle, FrameScheduler};

/// Called after every advanced frame
pub type FrameHook = Box<dyn FnMut(&mut Wheel, &FrameStatus)>;

struct DriverInner {
    wheel: Rc<RefCell<Wheel>>,
    scheduler: Rc<dyn FrameScheduler>,
    active: Cell<bool>,
    pending: Cell<Option<FrameHandle>>,
    on_frame: RefCell<FrameHook>,
}

pub struct SpinDriver {
    inner: Rc<DriverInner>,
}

impl SpinDriver {
    pub fn new(
        wheel: Rc<RefCell<Wheel>>,
        scheduler: Rc<dyn FrameScheduler>,
        on_frame: FrameHook,
    ) -> Self {
        Self {
            inner: Rc::new(DriverInner {
                wheel,
                scheduler,
                active: Cell::new(false),
                pending: Cell::new(None),
                on_frame: RefCell::new(on_frame),
            }),
        }
    }

    pub fn wheel(&self) -> &Rc<RefCell<Wheel>> {
        &self.inner.wheel
    }

    /// Whether a frame loop is running
    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// Start a spin and its frame loop
    pub fn start(&self, now_ms: f64) -> Result<usize, SpinError> {
        let index = self.inner.wheel.borrow_mut().spin(now_ms)?;
        self.inner.active.set(true);
        schedule(&self.inner);
        Ok(index)
    }

    /// Stop the frame loop. A spin still in flight is abandoned: no result,
    /// no relock.
    pub fn cancel(&self) {
        let was_active = self.inner.active.replace(false);
        if let Some(handle) = self.inner.pending.take() {
            self.inner.scheduler.cancel_frame(handle);
        }
        if was_active {
            self.inner.wheel.borrow_mut().abandon();
        }
    }
}

impl Drop for SpinDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule(inner: &Rc<DriverInner>) {
    let next = Rc::clone(inner);
    let handle = inner
        .scheduler
        .request_frame(Box::new(move |now_ms| run_frame(&next, now_ms)));

    match handle {
        Some(handle) => inner.pending.set(Some(handle)),
        None => {
            log::warn!("Frame scheduler unavailable; stopping spin loop");
            inner.active.set(false);
            inner.wheel.borrow_mut().abandon();
        }
    }
}

fn run_frame(inner: &Rc<DriverInner>, now_ms: f64) {
    inner.pending.set(None);
    if !inner.active.get() {
        return;
    }

    let status = {
        let mut wheel = inner.wheel.borrow_mut();
        let status = wheel.advance(now_ms);
        (inner.on_frame.borrow_mut())(&mut *wheel, &status);
        status
    };

    match status {
        FrameStatus::Spinning => schedule(inner),
        FrameStatus::Finished(_) | FrameStatus::Idle => inner.active.set(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Clock, ManualClock, ManualScheduler};
    use crate::wheel::gate::GateState;
    use crate::wheel::outcome::OutcomeSet;
    use crate::wheel::slice::slice_at_pointer;
    use crate::wheel::spin::SpinParams;
    use crate::wheel::WheelEvent;

    fn setup() -> (Rc<RefCell<Wheel>>, Rc<ManualScheduler>, Rc<RefCell<Vec<f64>>>, SpinDriver) {
        let wheel = Rc::new(RefCell::new(Wheel::new(
            OutcomeSet::curated(),
            SpinParams::default(),
            2024,
        )));
        let scheduler = Rc::new(ManualScheduler::new());
        let frames = Rc::new(RefCell::new(Vec::new()));
        let seen = frames.clone();
        let driver = SpinDriver::new(
            wheel.clone(),
            scheduler.clone(),
            Box::new(move |wheel: &mut Wheel, _status: &FrameStatus| seen.borrow_mut().push(wheel.rotation())),
        );
        (wheel, scheduler, frames, driver)
    }

    #[test]
    fn test_loop_runs_to_completion() {
        let (wheel, scheduler, frames, driver) = setup();
        let clock = ManualClock::new(0.0);

        wheel.borrow_mut().unlock();
        let index = driver.start(clock.now_ms()).unwrap();
        assert!(driver.is_active());

        let mut guard = 0;
        while scheduler.pending() > 0 {
            clock.advance(16.0);
            scheduler.fire(clock.now_ms());
            guard += 1;
            assert!(guard < 1000, "loop never finished");
        }

        assert!(!driver.is_active());
        let wheel = wheel.borrow();
        assert_eq!(wheel.gate_state(), GateState::Locked);
        assert_eq!(wheel.last_result().map(|o| o.id), Some(index));
        assert_eq!(slice_at_pointer(wheel.rotation(), 12), index);

        // Hook saw every frame, ending exactly at the target
        let frames = frames.borrow();
        assert_eq!(frames.len(), guard);
        assert_eq!(*frames.last().unwrap(), wheel.rotation());
        assert!(frames.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_start_rejected_when_locked() {
        let (_wheel, scheduler, _frames, driver) = setup();
        assert_eq!(driver.start(0.0), Err(SpinError::GateClosed));
        assert!(!driver.is_active());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_stops_loop_without_result() {
        let (wheel, scheduler, frames, driver) = setup();
        wheel.borrow_mut().unlock();
        driver.start(0.0).unwrap();
        scheduler.fire(16.0);
        assert_eq!(scheduler.pending(), 1);

        driver.cancel();
        assert_eq!(scheduler.pending(), 0);
        assert!(!driver.is_active());
        scheduler.fire(5000.0);
        assert_eq!(frames.borrow().len(), 1);

        let mut wheel = wheel.borrow_mut();
        assert_eq!(wheel.gate_state(), GateState::Spinning);
        assert!(wheel.session().is_none());
        assert!(
            !wheel
                .drain_events()
                .iter()
                .any(|e| matches!(e, WheelEvent::Result(_)))
        );
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let (wheel, scheduler, _frames, driver) = setup();
        wheel.borrow_mut().unlock();
        driver.start(0.0).unwrap();
        drop(driver);
        assert_eq!(scheduler.pending(), 0);
    }
}
