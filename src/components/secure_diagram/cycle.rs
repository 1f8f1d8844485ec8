use std::cell::{Cell, RefCell};

use log::{debug, info, warn};

use super::connectors::ConnectorLayout;
use super::error::{DiagramError, ErrorKind, Result};
use super::marker;
use super::scheduler::{self, Scheduler, StopSignal};
use super::surface::Surface;
use super::types::{ConnectorId, Highlights, NodeId};

/// Every delay and duration of the animation, in scheduler time units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timings {
	pub startup_delay: f64,
	pub missing_retry: f64,
	pub startup_error_retry: f64,
	pub traversal: f64,
	pub turnaround: f64,
	pub phase_gap: f64,
	pub cycle_gap: f64,
	pub failed_cycle_backoff: f64,
}

impl Default for Timings {
	fn default() -> Self {
		Self {
			startup_delay: 100.0,
			missing_retry: 1000.0,
			startup_error_retry: 2000.0,
			traversal: 600.0,
			turnaround: 100.0,
			phase_gap: 100.0,
			cycle_gap: 1000.0,
			failed_cycle_backoff: 1000.0,
		}
	}
}

pub struct Orchestrator<S, C> {
	pub(super) surface: S,
	pub(super) scheduler: C,
	pub(super) stop: StopSignal,
	layout: ConnectorLayout,
	timings: Timings,
	highlights: RefCell<Highlights>,
	loop_running: Cell<bool>,
	cycles: Cell<u64>,
	completed: Cell<u64>,
	failed: Cell<u64>,
}

impl<S: Surface, C: Scheduler> Orchestrator<S, C> {
	pub fn new(surface: S, scheduler: C, timings: Timings) -> Self {
		Self {
			surface,
			scheduler,
			stop: StopSignal::default(),
			layout: ConnectorLayout::default(),
			timings,
			highlights: RefCell::default(),
			loop_running: Cell::new(false),
			cycles: Cell::new(0),
			completed: Cell::new(0),
			failed: Cell::new(0),
		}
	}

	pub fn timings(&self) -> &Timings {
		&self.timings
	}

	#[cfg(test)]
	pub fn highlights(&self) -> Highlights {
		*self.highlights.borrow()
	}

	pub fn completed_cycles(&self) -> u64 {
		self.completed.get()
	}

	pub fn failed_cycles(&self) -> u64 {
		self.failed.get()
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.loop_running.get()
	}

	pub(super) async fn sleep(&self, delay_ms: f64) -> Result<()> {
		scheduler::sleep(&self.scheduler, &self.stop, delay_ms).await
	}

	fn highlight(&self, node: NodeId, on: bool) -> Result<()> {
		self.highlights.borrow_mut().set(node, on);
		self.surface.set_highlight(node, on)
	}

	/// Runs cycles back to back until stopped. A second call while a loop is
	/// active returns immediately.
	pub async fn run_loop(&self) {
		if self.loop_running.replace(true) {
			debug!("cycle loop already running");
			return;
		}
		info!("diagram animation started");
		while !self.stop.is_stopped() {
			let count = self.cycles.get() + 1;
			self.cycles.set(count);
			debug!("animation cycle {count}");
			let pause = match self.run_cycle().await {
				Ok(()) => {
					self.completed.set(self.completed.get() + 1);
					self.timings.cycle_gap
				}
				Err(err) if err.kind() == ErrorKind::Cancelled => break,
				Err(err) => {
					warn!("Animation cycle error: {err}");
					self.failed.set(self.failed.get() + 1);
					self.recover();
					self.timings.failed_cycle_backoff
				}
			};
			if self.sleep(pause).await.is_err() {
				break;
			}
		}
		self.loop_running.set(false);
		info!("diagram animation stopped");
	}

	pub async fn run_cycle(&self) -> Result<()> {
		self.highlight(NodeId::Client, true)?;
		let mut previous: Option<NodeId> = None;
		for connector in ConnectorId::ALL {
			let current = connector.peripheral();
			match previous {
				Some(node) => self.highlight(node, false)?,
				None => {
					for other in ConnectorId::ALL.map(ConnectorId::peripheral) {
						if other != current {
							self.highlight(other, false)?;
						}
					}
				}
			}
			self.highlight(current, true)?;
			self.visit(connector).await?;
			self.sleep(self.timings.phase_gap).await?;
			previous = Some(current);
		}
		self.highlight(NodeId::Client, false)?;
		if let Some(last) = previous {
			self.highlight(last, false)?;
		}
		Ok(())
	}

	async fn visit(&self, connector: ConnectorId) -> Result<()> {
		self.layout.layout(&self.surface)?;
		let segment = self.layout.segment(connector)?;
		self.surface.set_line_active(connector, true)?;
		scheduler::next_frame(&self.scheduler, &self.stop).await?;

		let duration = self.timings.traversal;
		marker::traverse(&self.surface, &self.scheduler, &self.stop, segment, false, duration)
			.await?;
		self.sleep(self.timings.turnaround).await?;
		marker::traverse(&self.surface, &self.scheduler, &self.stop, segment, true, duration)
			.await?;

		self.surface.set_line_active(connector, false)?;
		marker::hide(&self.surface)
	}

	// Best effort after a failed cycle; the surface may be half gone.
	fn recover(&self) {
		for connector in ConnectorId::ALL {
			if let Err(err) = self.surface.set_line_active(connector, false) {
				debug!("{connector} not reset after failed cycle: {err}");
			}
		}
		let highlights = *self.highlights.borrow();
		for node in NodeId::ALL.into_iter().filter(|&n| highlights.is_on(n)) {
			if let Err(err) = self.highlight(node, false) {
				debug!("{node:?} highlight not reset after failed cycle: {err}");
			}
		}
		if let Err(err) = marker::hide(&self.surface) {
			debug!("marker not reset after failed cycle: {err}");
		}
	}

	pub(super) fn relayout(&self) -> Result<()> {
		if self.stop.is_stopped() {
			return Err(DiagramError::Cancelled);
		}
		self.layout.layout(&self.surface)
	}
}
