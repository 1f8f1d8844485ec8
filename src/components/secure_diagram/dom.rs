use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

use super::error::{DiagramError, Result};
use super::geometry::{Point, Rect, Segment};
use super::scheduler::{FrameHandle, Scheduler, TimerHandle};
use super::surface::{Subscription, Surface};
use super::types::{ConnectorId, ElementId, NodeId};

const ACTIVE_CLASS: &str = "active";
const HIGHLIGHT_TRANSFORM: &str = "scale(1.05)";
const HIGHLIGHT_SHADOW: &str = "0 8px 25px rgba(30, 64, 175, 0.4)";
const NORMAL_TRANSFORM: &str = "scale(1)";
const NORMAL_SHADOW: &str = "0 4px 12px rgba(0,0,0,0.1)";

pub struct DomSurface {
	container: HtmlElement,
}

impl DomSurface {
	pub fn new(container: HtmlElement) -> Self {
		Self { container }
	}

	fn find(&self, element: ElementId) -> Option<HtmlElement> {
		self.container
			.query_selector(&element.selector())
			.ok()
			.flatten()
			.and_then(|el| el.dyn_into::<HtmlElement>().ok())
	}

	fn get(&self, element: ElementId) -> Result<HtmlElement> {
		self.find(element).ok_or(DiagramError::Detached(element))
	}

	fn style(&self, element: ElementId, properties: &[(&str, &str)]) -> Result<()> {
		let style = self.get(element)?.style();
		for (name, value) in properties {
			style
				.set_property(name, value)
				.map_err(|err| style_error(element, err))?;
		}
		Ok(())
	}
}

fn style_error(element: ElementId, err: JsValue) -> DiagramError {
	DiagramError::Style {
		element,
		reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
	}
}

fn px(value: f64) -> String {
	format!("{value}px")
}

impl Surface for DomSurface {
	fn missing_elements(&self) -> Vec<ElementId> {
		ElementId::ALL
			.into_iter()
			.filter(|&e| self.find(e).is_none())
			.collect()
	}

	fn container_rect(&self) -> Option<Rect> {
		if !self.container.is_connected() {
			return None;
		}
		let r = self.container.get_bounding_client_rect();
		Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
	}

	fn node_rect(&self, node: NodeId) -> Result<Rect> {
		let el = self.get(ElementId::Node(node))?;
		if !el.is_connected() {
			return Err(DiagramError::Detached(ElementId::Node(node)));
		}
		let r = el.get_bounding_client_rect();
		Ok(Rect::new(r.left(), r.top(), r.width(), r.height()))
	}

	fn place_line(&self, connector: ConnectorId, segment: &Segment) -> Result<()> {
		let (left, top, width) = (px(segment.start.x), px(segment.start.y), px(segment.length));
		let transform = format!("rotate({}deg)", segment.angle);
		self.style(
			ElementId::Line(connector),
			&[
				("left", left.as_str()),
				("top", top.as_str()),
				("width", width.as_str()),
				("transform", transform.as_str()),
			],
		)
	}

	fn set_line_active(&self, connector: ConnectorId, active: bool) -> Result<()> {
		let element = ElementId::Line(connector);
		let classes = self.get(element)?.class_list();
		let toggled = if active {
			classes.add_1(ACTIVE_CLASS)
		} else {
			classes.remove_1(ACTIVE_CLASS)
		};
		toggled.map_err(|err| style_error(element, err))
	}

	fn set_highlight(&self, node: NodeId, on: bool) -> Result<()> {
		let (transform, shadow) = if on {
			(HIGHLIGHT_TRANSFORM, HIGHLIGHT_SHADOW)
		} else {
			(NORMAL_TRANSFORM, NORMAL_SHADOW)
		};
		self.style(
			ElementId::Node(node),
			&[("transform", transform), ("box-shadow", shadow)],
		)
	}

	fn set_marker_visible(&self, visible: bool) -> Result<()> {
		let opacity = if visible { "1" } else { "0" };
		self.style(ElementId::Marker, &[("opacity", opacity)])
	}

	fn move_marker(&self, at: Point) -> Result<()> {
		let (left, top) = (px(at.x), px(at.y));
		self.style(ElementId::Marker, &[("left", left.as_str()), ("top", top.as_str())])
	}

	fn watch_resize(&self, on_resize: Box<dyn Fn()>) -> Option<Subscription> {
		let window = web_sys::window()?;
		let listener = EventListener::new(&window, "resize", move |_| on_resize());
		Some(Box::new(listener))
	}
}

/// `requestAnimationFrame` and `setTimeout` behind [`Scheduler`].
///
/// Handles live in id maps; removing an entry cancels the browser callback.
#[derive(Default)]
pub struct WebScheduler {
	next_id: Cell<u32>,
	frames: Rc<RefCell<HashMap<u32, AnimationFrame>>>,
	timers: Rc<RefCell<HashMap<u32, Timeout>>>,
}

impl WebScheduler {
	fn next_id(&self) -> u32 {
		let id = self.next_id.get().wrapping_add(1);
		self.next_id.set(id);
		id
	}
}

impl Scheduler for WebScheduler {
	fn now(&self) -> f64 {
		web_sys::window()
			.and_then(|w| w.performance())
			.map_or(0.0, |p| p.now())
	}

	fn schedule_frame(&self, callback: Box<dyn FnOnce(f64)>) -> FrameHandle {
		let id = self.next_id();
		let frames = Rc::clone(&self.frames);
		let handle = request_animation_frame(move |timestamp| {
			let finished = frames.borrow_mut().remove(&id);
			callback(timestamp);
			drop(finished);
		});
		self.frames.borrow_mut().insert(id, handle);
		FrameHandle(id)
	}

	fn cancel_frame(&self, handle: FrameHandle) {
		let removed = self.frames.borrow_mut().remove(&handle.0);
		drop(removed);
	}

	fn schedule_timer(&self, delay_ms: f64, callback: Box<dyn FnOnce()>) -> TimerHandle {
		let id = self.next_id();
		let timers = Rc::clone(&self.timers);
		let timeout = Timeout::new(delay_ms.max(0.0) as u32, move || {
			let finished = timers.borrow_mut().remove(&id);
			callback();
			drop(finished);
		});
		self.timers.borrow_mut().insert(id, timeout);
		TimerHandle(id)
	}

	fn cancel_timer(&self, handle: TimerHandle) {
		let removed = self.timers.borrow_mut().remove(&handle.0);
		drop(removed);
	}
}
