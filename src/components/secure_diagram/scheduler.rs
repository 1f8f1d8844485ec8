use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;

use super::error::{DiagramError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u32);

/// Display refresh and timer primitives of the host.
///
/// Cancelling a handle must drop its callback without running it.
pub trait Scheduler {
	// Same timeline as frame timestamps.
	fn now(&self) -> f64;

	fn schedule_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle;

	fn cancel_frame(&self, handle: FrameHandle);

	fn schedule_timer(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle;

	fn cancel_timer(&self, handle: TimerHandle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
	Frame(FrameHandle),
	Timer(TimerHandle),
}

#[derive(Default)]
struct StopState {
	stopped: Cell<bool>,
	pending: RefCell<Vec<Pending>>,
}

/// Cooperative cancellation shared by every suspension point of the engine.
#[derive(Clone, Default)]
pub struct StopSignal(Rc<StopState>);

impl StopSignal {
	pub fn is_stopped(&self) -> bool {
		self.0.stopped.get()
	}

	pub fn trigger<C: Scheduler + ?Sized>(&self, scheduler: &C) {
		self.0.stopped.set(true);
		let pending = std::mem::take(&mut *self.0.pending.borrow_mut());
		for item in pending {
			match item {
				Pending::Frame(handle) => scheduler.cancel_frame(handle),
				Pending::Timer(handle) => scheduler.cancel_timer(handle),
			}
		}
	}

	#[cfg(test)]
	pub fn pending_count(&self) -> usize {
		self.0.pending.borrow().len()
	}

	fn track(&self, item: Pending) {
		self.0.pending.borrow_mut().push(item);
	}

	fn untrack(&self, item: Pending) {
		self.0.pending.borrow_mut().retain(|p| *p != item);
	}

	fn check(&self) -> Result<()> {
		if self.is_stopped() {
			Err(DiagramError::Cancelled)
		} else {
			Ok(())
		}
	}
}

pub async fn next_frame<C: Scheduler + ?Sized>(scheduler: &C, stop: &StopSignal) -> Result<f64> {
	stop.check()?;
	let (tx, rx) = oneshot::channel();
	let handle = scheduler.schedule_frame(Box::new(move |timestamp| {
		let _ = tx.send(timestamp);
	}));
	let pending = Pending::Frame(handle);
	stop.track(pending);
	// A dropped sender means the frame was cancelled.
	let timestamp = rx.await.map_err(|_| DiagramError::Cancelled)?;
	stop.untrack(pending);
	// The frame may have fired before a stop that landed ahead of this poll.
	stop.check()?;
	Ok(timestamp)
}

pub async fn sleep<C: Scheduler + ?Sized>(
	scheduler: &C,
	stop: &StopSignal,
	delay_ms: f64,
) -> Result<()> {
	stop.check()?;
	let (tx, rx) = oneshot::channel();
	let handle = scheduler.schedule_timer(
		delay_ms,
		Box::new(move || {
			let _ = tx.send(());
		}),
	);
	let pending = Pending::Timer(handle);
	stop.track(pending);
	rx.await.map_err(|_| DiagramError::Cancelled)?;
	stop.untrack(pending);
	stop.check()
}
