use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use log::{debug, error, info};

use super::cycle::{Orchestrator, Timings};
use super::error::{DiagramError, ErrorKind, Result};
use super::scheduler::Scheduler;
use super::surface::{Subscription, Surface};

/// Owns the orchestrator and everything that must be released on unmount.
pub struct DiagramEngine<S, C> {
	orchestrator: Orchestrator<S, C>,
	started: Cell<bool>,
	resize: RefCell<Option<Subscription>>,
}

impl<S: Surface + 'static, C: Scheduler + 'static> DiagramEngine<S, C> {
	pub fn new(surface: S, scheduler: C, timings: Timings) -> Rc<Self> {
		Rc::new(Self {
			orchestrator: Orchestrator::new(surface, scheduler, timings),
			started: Cell::new(false),
			resize: RefCell::new(None),
		})
	}

	#[cfg(test)]
	pub fn orchestrator(&self) -> &Orchestrator<S, C> {
		&self.orchestrator
	}

	/// Subscribes to resizes and returns the startup future for the host to spawn.
	pub fn activate(self: Rc<Self>) -> impl Future<Output = ()> {
		if !self.orchestrator.stop.is_stopped() && self.resize.borrow().is_none() {
			let weak = Rc::downgrade(&self);
			let subscription = self.orchestrator.surface.watch_resize(Box::new(move || {
				if let Some(engine) = weak.upgrade() {
					engine.on_resize();
				}
			}));
			*self.resize.borrow_mut() = subscription;
		}
		async move { self.run().await }
	}

	async fn run(&self) {
		if self.started.replace(true) {
			debug!("diagram engine already started");
			return;
		}
		let timings = *self.orchestrator.timings();
		loop {
			let retry = match self.start().await {
				Ok(()) => break,
				Err(err) => match err.kind() {
					ErrorKind::Cancelled => break,
					ErrorKind::MissingElement => {
						debug!("{err}, retrying");
						timings.missing_retry
					}
					ErrorKind::Execution => {
						error!("Animation loop error: {err}");
						timings.startup_error_retry
					}
				},
			};
			if self.orchestrator.sleep(retry).await.is_err() {
				break;
			}
		}
	}

	async fn start(&self) -> Result<()> {
		self.orchestrator
			.sleep(self.orchestrator.timings().startup_delay)
			.await?;
		let missing = self.orchestrator.surface.missing_elements();
		if !missing.is_empty() {
			return Err(DiagramError::MissingElements(missing));
		}
		self.orchestrator.relayout()?;
		self.orchestrator.run_loop().await;
		Ok(())
	}

	pub fn on_resize(&self) {
		match self.orchestrator.relayout() {
			Ok(()) => debug!("connectors re-laid out after resize"),
			Err(DiagramError::Cancelled) => {}
			Err(err) => debug!("resize layout skipped: {err}"),
		}
	}

	/// Stops the loop, cancels pending frames and timers, removes the resize
	/// listener. Safe to call more than once.
	pub fn teardown(&self) {
		let stop = &self.orchestrator.stop;
		if stop.is_stopped() {
			return;
		}
		stop.trigger(&self.orchestrator.scheduler);
		self.resize.borrow_mut().take();
		info!(
			"diagram engine torn down after {} cycles ({} failed)",
			self.orchestrator.completed_cycles(),
			self.orchestrator.failed_cycles()
		);
	}
}

pub struct DiagramScope<S: Surface + 'static, C: Scheduler + 'static>(Rc<DiagramEngine<S, C>>);

impl<S: Surface + 'static, C: Scheduler + 'static> DiagramScope<S, C> {
	pub fn new(engine: Rc<DiagramEngine<S, C>>) -> Self {
		Self(engine)
	}
}

impl<S: Surface + 'static, C: Scheduler + 'static> Drop for DiagramScope<S, C> {
	fn drop(&mut self) {
		self.0.teardown();
	}
}
