use std::cell::RefCell;

use super::error::{DiagramError, Result};
use super::geometry::{self, NodeBox, Segment};
use super::surface::Surface;
use super::types::{ConnectorId, NodeId};

/// Latest segment per connector. The only place line placement is computed.
#[derive(Debug, Default)]
pub struct ConnectorLayout {
	segments: RefCell<[Option<Segment>; 3]>,
}

impl ConnectorLayout {
	/// Recomputes all three segments from current geometry and places the lines.
	///
	/// Nothing is published unless every box could be read.
	pub fn layout<S: Surface + ?Sized>(&self, surface: &S) -> Result<()> {
		let container = surface.container_rect();
		let node_box = |node: NodeId| -> Result<NodeBox> {
			Ok(geometry::box_of(surface.node_rect(node)?, container))
		};
		let central = node_box(NodeId::Client)?;
		let mut computed = [Segment::default(); 3];
		for connector in ConnectorId::ALL {
			let peripheral = node_box(connector.peripheral())?;
			computed[connector.index()] = geometry::segment_between(&central, &peripheral);
		}

		*self.segments.borrow_mut() = computed.map(Some);
		for connector in ConnectorId::ALL {
			surface.place_line(connector, &computed[connector.index()])?;
		}
		Ok(())
	}

	pub fn segment(&self, connector: ConnectorId) -> Result<Segment> {
		self.segments.borrow()[connector.index()].ok_or(DiagramError::NoSegment(connector))
	}
}
