use std::any::Any;

use super::error::Result;
use super::geometry::{Point, Rect, Segment};
use super::types::{ConnectorId, ElementId, NodeId};

pub type Subscription = Box<dyn Any>;

/// The rendered diagram as the engine sees it.
///
/// Implementations re-resolve elements on every call, so a detached element
/// surfaces as an error instead of writing into a stale handle.
pub trait Surface {
	fn missing_elements(&self) -> Vec<ElementId>;

	/// `None` until the container is attached.
	fn container_rect(&self) -> Option<Rect>;

	fn node_rect(&self, node: NodeId) -> Result<Rect>;

	fn place_line(&self, connector: ConnectorId, segment: &Segment) -> Result<()>;

	fn set_line_active(&self, connector: ConnectorId, active: bool) -> Result<()>;

	fn set_highlight(&self, node: NodeId, on: bool) -> Result<()>;

	fn set_marker_visible(&self, visible: bool) -> Result<()>;

	fn move_marker(&self, at: Point) -> Result<()>;

	fn watch_resize(&self, on_resize: Box<dyn Fn()>) -> Option<Subscription>;
}
