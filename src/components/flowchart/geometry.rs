//! Node boxes, handle anchors and edge paths in graph space.

use super::types::{EdgeKind, Node, Position};

/// Node box size in graph units.
pub const NODE_WIDTH: f64 = 150.0;
/// Node box height in graph units.
pub const NODE_HEIGHT: f64 = 40.0;

/// Distance a smooth-step edge travels straight out of a handle before turning.
const STEP_OFFSET: f64 = 20.0;

/// Which end of an edge a handle accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
	/// Bottom centre; edges leave from here.
	Source,
	/// Top centre; edges arrive here.
	Target,
}

impl HandleKind {
	/// The kind a connection from this handle must end on.
	pub fn opposite(self) -> Self {
		match self {
			HandleKind::Source => HandleKind::Target,
			HandleKind::Target => HandleKind::Source,
		}
	}
}

/// Axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub x: f64,
	/// Top edge.
	pub y: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Rect {
	/// The box a node occupies.
	pub fn of_node(node: &Node) -> Self {
		Self {
			x: node.position.x,
			y: node.position.y,
			width: NODE_WIDTH,
			height: NODE_HEIGHT,
		}
	}

	/// Whether `p` lies inside or on the border.
	pub fn contains(&self, p: Position) -> bool {
		p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
	}

	/// Smallest rectangle covering both.
	pub fn union(self, other: Rect) -> Rect {
		let x = self.x.min(other.x);
		let y = self.y.min(other.y);
		Rect {
			x,
			y,
			width: (self.x + self.width).max(other.x + other.width) - x,
			height: (self.y + self.height).max(other.y + other.height) - y,
		}
	}

	/// Centre point.
	pub fn center(&self) -> Position {
		Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// Bounding box of all nodes, or `None` for an empty chart.
pub fn bounds<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Option<Rect> {
	nodes
		.into_iter()
		.map(Rect::of_node)
		.reduce(Rect::union)
}

/// Anchor point of a node's handle.
pub fn handle_position(node: &Node, kind: HandleKind) -> Position {
	let x = node.position.x + NODE_WIDTH / 2.0;
	match kind {
		HandleKind::Source => Position::new(x, node.position.y + NODE_HEIGHT),
		HandleKind::Target => Position::new(x, node.position.y),
	}
}

/// Polyline from a source handle to a target handle, before corner rounding.
pub fn edge_path(kind: EdgeKind, from: Position, to: Position) -> Vec<Position> {
	match kind {
		EdgeKind::Straight => vec![from, to],
		EdgeKind::SmoothStep => smooth_step_path(from, to),
	}
}

fn smooth_step_path(from: Position, to: Position) -> Vec<Position> {
	if to.y >= from.y + 2.0 * STEP_OFFSET {
		// Target below: down, across at the midpoint, down.
		let mid_y = (from.y + to.y) / 2.0;
		if (from.x - to.x).abs() < 0.5 {
			return vec![from, to];
		}
		vec![
			from,
			Position::new(from.x, mid_y),
			Position::new(to.x, mid_y),
			to,
		]
	} else {
		// Target above or level: leave downwards, route around, enter from above.
		// Stacked nodes: detour to the right of the boxes.
		let mid_x = if (from.x - to.x).abs() < NODE_WIDTH {
			from.x.max(to.x) + NODE_WIDTH / 2.0 + STEP_OFFSET
		} else {
			(from.x + to.x) / 2.0
		};
		let out_y = from.y + STEP_OFFSET;
		let in_y = to.y - STEP_OFFSET;
		vec![
			from,
			Position::new(from.x, out_y),
			Position::new(mid_x, out_y),
			Position::new(mid_x, in_y),
			Position::new(to.x, in_y),
			to,
		]
	}
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq < f64::EPSILON {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx, a.y + t * dy);
	((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Shortest distance from `p` to any segment of `path`.
pub fn distance_to_path(p: Position, path: &[Position]) -> f64 {
	match path {
		[] => f64::INFINITY,
		[only] => distance_to_segment(p, *only, *only),
		_ => path
			.windows(2)
			.map(|w| distance_to_segment(p, w[0], w[1]))
			.fold(f64::INFINITY, f64::min),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flowchart::types::NodeKind;

	fn node(x: f64, y: f64) -> Node {
		Node {
			id: "n".to_string(),
			label: "n".to_string(),
			position: Position::new(x, y),
			kind: NodeKind::Editable,
		}
	}

	#[test]
	fn handles_sit_on_box_edges() {
		let n = node(10.0, 20.0);
		assert_eq!(handle_position(&n, HandleKind::Target), Position::new(85.0, 20.0));
		assert_eq!(handle_position(&n, HandleKind::Source), Position::new(85.0, 60.0));
	}

	#[test]
	fn bounds_cover_all_nodes() {
		let nodes = [node(0.0, 0.0), node(100.0, 200.0)];
		let b = bounds(&nodes).unwrap();
		assert_eq!(b, Rect { x: 0.0, y: 0.0, width: 250.0, height: 240.0 });
		assert!(bounds(&Vec::<Node>::new()).is_none());
	}

	#[test]
	fn smooth_step_downwards_has_two_turns() {
		let path = edge_path(
			EdgeKind::SmoothStep,
			Position::new(0.0, 0.0),
			Position::new(100.0, 100.0),
		);
		assert_eq!(path.len(), 4);
		assert_eq!(path[1], Position::new(0.0, 50.0));
		assert_eq!(path[2], Position::new(100.0, 50.0));
	}

	#[test]
	fn smooth_step_aligned_is_straight() {
		let path = edge_path(
			EdgeKind::SmoothStep,
			Position::new(5.0, 0.0),
			Position::new(5.0, 100.0),
		);
		assert_eq!(path.len(), 2);
	}

	#[test]
	fn smooth_step_upwards_routes_around() {
		let path = edge_path(
			EdgeKind::SmoothStep,
			Position::new(0.0, 100.0),
			Position::new(200.0, 0.0),
		);
		assert_eq!(path.len(), 6);
		assert_eq!(path[1].y, 120.0);
		assert_eq!(path[4].y, -20.0);
		assert_eq!(path[2].x, 100.0);
	}

	#[test]
	fn smooth_step_back_edge_in_one_column_leaves_the_column() {
		let path = edge_path(
			EdgeKind::SmoothStep,
			Position::new(325.0, 280.0),
			Position::new(325.0, 0.0),
		);
		assert_eq!(
			path,
			vec![
				Position::new(325.0, 280.0),
				Position::new(325.0, 300.0),
				Position::new(420.0, 300.0),
				Position::new(420.0, -20.0),
				Position::new(325.0, -20.0),
				Position::new(325.0, 0.0),
			]
		);
	}

	#[test]
	fn distance_to_path_picks_nearest_segment() {
		let path = [
			Position::new(0.0, 0.0),
			Position::new(0.0, 10.0),
			Position::new(10.0, 10.0),
		];
		assert_eq!(distance_to_path(Position::new(5.0, 12.0), &path), 2.0);
		assert_eq!(distance_to_path(Position::new(-3.0, 5.0), &path), 3.0);
		assert_eq!(distance_to_path(Position::new(0.0, 0.0), &[]), f64::INFINITY);
	}
}
