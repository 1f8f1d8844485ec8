//! In-memory host doubles for driving the engine without a browser.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::executor::LocalPool;

use super::error::{DiagramError, Result};
use super::geometry::{Point, Rect, Segment};
use super::scheduler::{FrameHandle, Scheduler, TimerHandle};
use super::surface::{Subscription, Surface};
use super::types::{ConnectorId, ElementId, NodeId};

pub const FRAME_MS: f64 = 16.0;

#[derive(Default)]
struct SchedulerState {
	now: Cell<f64>,
	next_id: Cell<u32>,
	frames: RefCell<Vec<(u32, Box<dyn FnOnce(f64)>)>>,
	timers: RefCell<Vec<(u32, f64, Box<dyn FnOnce()>)>>,
	cancelled: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<SchedulerState>);

impl ManualScheduler {
	pub fn pending_frames(&self) -> usize {
		self.0.frames.borrow().len()
	}

	pub fn pending_timers(&self) -> usize {
		self.0.timers.borrow().len()
	}

	pub fn cancelled(&self) -> usize {
		self.0.cancelled.get()
	}

	/// Advances to the next frame or timer deadline and fires what is due.
	/// Returns `false` once nothing is scheduled.
	pub fn step(&self) -> bool {
		let has_frames = !self.0.frames.borrow().is_empty();
		let next_timer = self
			.0
			.timers
			.borrow()
			.iter()
			.map(|(_, due, _)| *due)
			.reduce(f64::min);
		let now = self.0.now.get();
		let target = match (has_frames, next_timer) {
			(true, Some(due)) => (now + FRAME_MS).min(due.max(now)),
			(true, None) => now + FRAME_MS,
			(false, Some(due)) => due.max(now),
			(false, None) => return false,
		};
		self.0.now.set(target);

		let due: Vec<_> = {
			let mut timers = self.0.timers.borrow_mut();
			let (due, rest): (Vec<_>, Vec<_>) =
				std::mem::take(&mut *timers).into_iter().partition(|(_, at, _)| *at <= target);
			*timers = rest;
			due
		};
		for (_, _, callback) in due {
			callback();
		}

		if has_frames && target >= now + FRAME_MS {
			let frames = std::mem::take(&mut *self.0.frames.borrow_mut());
			for (_, callback) in frames {
				callback(target);
			}
		}
		true
	}

	fn next_id(&self) -> u32 {
		let id = self.0.next_id.get() + 1;
		self.0.next_id.set(id);
		id
	}
}

impl Scheduler for ManualScheduler {
	fn now(&self) -> f64 {
		self.0.now.get()
	}

	fn schedule_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle {
		let id = self.next_id();
		self.0.frames.borrow_mut().push((id, callback));
		FrameHandle(id)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		let removed = {
			let mut frames = self.0.frames.borrow_mut();
			let before = frames.len();
			frames.retain(|(id, _)| *id != handle.0);
			before - frames.len()
		};
		self.0.cancelled.set(self.0.cancelled.get() + removed);
	}

	fn schedule_timer(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
		let id = self.next_id();
		let due = self.now() + delay_ms;
		self.0.timers.borrow_mut().push((id, due, callback));
		TimerHandle(id)
	}

	fn cancel_timer(&self, handle: TimerHandle) {
		let removed = {
			let mut timers = self.0.timers.borrow_mut();
			let before = timers.len();
			timers.retain(|(id, _, _)| *id != handle.0);
			before - timers.len()
		};
		self.0.cancelled.set(self.0.cancelled.get() + removed);
	}
}

/// Runs the pool and the simulated clock until `done` holds, nothing is
/// scheduled, or `budget_ms` of simulated time has passed.
pub fn drive(
	pool: &mut LocalPool,
	scheduler: &ManualScheduler,
	budget_ms: f64,
	mut done: impl FnMut() -> bool,
) {
	let deadline = scheduler.now() + budget_ms;
	loop {
		pool.run_until_stalled();
		if done() || scheduler.now() >= deadline || !scheduler.step() {
			pool.run_until_stalled();
			return;
		}
	}
}

pub struct FakeState {
	pub container: Cell<Option<Rect>>,
	pub rects: RefCell<HashMap<NodeId, Rect>>,
	pub present: RefCell<HashSet<ElementId>>,
	pub lines: RefCell<HashMap<ConnectorId, Segment>>,
	pub active_lines: RefCell<HashSet<ConnectorId>>,
	pub highlighted: RefCell<HashSet<NodeId>>,
	pub marker_visible: Cell<bool>,
	pub marker_at: Cell<Point>,
	/// Every position written while the marker was visible.
	pub samples: RefCell<Vec<Point>>,
	pub probes: RefCell<Vec<f64>>,
	pub on_resize: RefCell<Option<Rc<dyn Fn()>>>,
	clock: RefCell<Option<ManualScheduler>>,
}

/// Two-column diagram: client over storage on the left, auth over AI on the right.
#[derive(Clone)]
pub struct FakeSurface(pub Rc<FakeState>);

impl Default for FakeSurface {
	fn default() -> Self {
		let rects = HashMap::from([
			(NodeId::Client, Rect::new(10.0, 10.0, 96.0, 48.0)),
			(NodeId::EncryptedStorage, Rect::new(10.0, 80.0, 96.0, 40.0)),
			(NodeId::PrivateAuth, Rect::new(200.0, 10.0, 96.0, 48.0)),
			(NodeId::PrivateAi, Rect::new(200.0, 80.0, 96.0, 40.0)),
		]);
		FakeSurface(Rc::new(FakeState {
			container: Cell::new(Some(Rect::new(0.0, 0.0, 320.0, 140.0))),
			rects: RefCell::new(rects),
			present: RefCell::new(ElementId::ALL.into_iter().collect()),
			lines: RefCell::default(),
			active_lines: RefCell::default(),
			highlighted: RefCell::default(),
			marker_visible: Cell::new(false),
			marker_at: Cell::new(Point::ORIGIN),
			samples: RefCell::default(),
			probes: RefCell::default(),
			on_resize: RefCell::new(None),
			clock: RefCell::new(None),
		}))
	}
}

impl FakeSurface {
	pub fn empty() -> Self {
		let surface = Self::default();
		surface.0.present.borrow_mut().clear();
		surface
	}

	pub fn with_clock(self, scheduler: &ManualScheduler) -> Self {
		*self.0.clock.borrow_mut() = Some(scheduler.clone());
		self
	}

	pub fn render_all(&self) {
		self.0.present.borrow_mut().extend(ElementId::ALL);
	}

	pub fn detach(&self, element: ElementId) {
		self.0.present.borrow_mut().remove(&element);
	}

	pub fn move_node(&self, node: NodeId, rect: Rect) {
		self.0.rects.borrow_mut().insert(node, rect);
	}

	pub fn fire_resize(&self) {
		let callback = self.0.on_resize.borrow().clone();
		if let Some(callback) = callback {
			callback();
		}
	}

	pub fn sample_count(&self) -> usize {
		self.0.samples.borrow().len()
	}

	fn require(&self, element: ElementId) -> Result<()> {
		if self.0.present.borrow().contains(&element) {
			Ok(())
		} else {
			Err(DiagramError::Detached(element))
		}
	}
}

struct ResizeGuard(Rc<FakeState>);

impl Drop for ResizeGuard {
	fn drop(&mut self) {
		self.0.on_resize.borrow_mut().take();
	}
}

impl Surface for FakeSurface {
	fn missing_elements(&self) -> Vec<ElementId> {
		let at = self.0.clock.borrow().as_ref().map_or(0.0, |c| c.now());
		self.0.probes.borrow_mut().push(at);
		let present = self.0.present.borrow();
		ElementId::ALL
			.into_iter()
			.filter(|e| !present.contains(e))
			.collect()
	}

	fn container_rect(&self) -> Option<Rect> {
		self.0.container.get()
	}

	fn node_rect(&self, node: NodeId) -> Result<Rect> {
		self.require(ElementId::Node(node))?;
		self.0
			.rects
			.borrow()
			.get(&node)
			.copied()
			.ok_or(DiagramError::Detached(ElementId::Node(node)))
	}

	fn place_line(&self, connector: ConnectorId, segment: &Segment) -> Result<()> {
		self.require(ElementId::Line(connector))?;
		self.0.lines.borrow_mut().insert(connector, *segment);
		Ok(())
	}

	fn set_line_active(&self, connector: ConnectorId, active: bool) -> Result<()> {
		self.require(ElementId::Line(connector))?;
		let mut lines = self.0.active_lines.borrow_mut();
		if active {
			lines.insert(connector);
		} else {
			lines.remove(&connector);
		}
		Ok(())
	}

	fn set_highlight(&self, node: NodeId, on: bool) -> Result<()> {
		self.require(ElementId::Node(node))?;
		let mut highlighted = self.0.highlighted.borrow_mut();
		if on {
			highlighted.insert(node);
		} else {
			highlighted.remove(&node);
		}
		Ok(())
	}

	fn set_marker_visible(&self, visible: bool) -> Result<()> {
		self.require(ElementId::Marker)?;
		self.0.marker_visible.set(visible);
		Ok(())
	}

	fn move_marker(&self, at: Point) -> Result<()> {
		self.require(ElementId::Marker)?;
		self.0.marker_at.set(at);
		if self.0.marker_visible.get() {
			self.0.samples.borrow_mut().push(at);
		}
		Ok(())
	}

	fn watch_resize(&self, on_resize: Box<dyn Fn()>) -> Option<Subscription> {
		*self.0.on_resize.borrow_mut() = Some(Rc::from(on_resize));
		Some(Box::new(ResizeGuard(Rc::clone(&self.0))))
	}
}
