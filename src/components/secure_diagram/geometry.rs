/// Distance a border point is pulled back toward its box center.
pub const BORDER_INSET: f64 = 2.0;

// Stands in for a zero direction component in the ray/rectangle intersection.
const EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn lerp(self, to: Point, p: f64) -> Point {
		Point {
			x: self.x + (to.x - self.x) * p,
			y: self.y + (to.y - self.y) * p,
		}
	}

	pub fn distance(self, other: Point) -> f64 {
		(other.x - self.x).hypot(other.y - self.y)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeBox {
	pub cx: f64,
	pub cy: f64,
	pub hw: f64,
	pub hh: f64,
}

impl NodeBox {
	pub fn center(&self) -> Point {
		Point::new(self.cx, self.cy)
	}
}

/// Line between two node borders, snapshotted for one traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Segment {
	pub start: Point,
	pub end: Point,
	pub length: f64,
	/// Degrees, for `rotate()` transforms.
	pub angle: f64,
}

/// Box of `rect` relative to `container`. A missing container yields a zeroed box.
pub fn box_of(rect: Rect, container: Option<Rect>) -> NodeBox {
	let Some(container) = container else {
		return NodeBox::default();
	};
	NodeBox {
		cx: rect.left + rect.width / 2.0 - container.left,
		cy: rect.top + rect.height / 2.0 - container.top,
		hw: rect.width / 2.0,
		hh: rect.height / 2.0,
	}
}

/// Where a ray from the box center along `(dx, dy)` leaves the rectangle.
pub fn border_exit(b: &NodeBox, dx: f64, dy: f64) -> Point {
	if dx == 0.0 && dy == 0.0 {
		return b.center();
	}
	let nonzero = |v: f64| if v == 0.0 { EPSILON } else { v.abs() };
	let t = (b.hw / nonzero(dx)).min(b.hh / nonzero(dy));
	Point::new(b.cx + dx * t, b.cy + dy * t)
}

/// [`border_exit`] pulled inward by [`BORDER_INSET`] along the direction.
pub fn border_point(b: &NodeBox, dx: f64, dy: f64) -> Point {
	if dx == 0.0 && dy == 0.0 {
		return b.center();
	}
	let exit = border_exit(b, dx, dy);
	let len = dx.hypot(dy);
	Point::new(
		exit.x - dx / len * BORDER_INSET,
		exit.y - dy / len * BORDER_INSET,
	)
}

pub fn segment_between(from: &NodeBox, to: &NodeBox) -> Segment {
	let (dx, dy) = (to.cx - from.cx, to.cy - from.cy);
	let start = border_point(from, dx, dy);
	let end = border_point(to, -dx, -dy);
	Segment {
		start,
		end,
		length: start.distance(end),
		angle: (end.y - start.y).atan2(end.x - start.x).to_degrees(),
	}
}
