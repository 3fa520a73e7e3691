//! Canvas view state and pointer interaction tracking.
//!
//! Everything here is view-only: pan/zoom, the in-progress drag, pan or
//! connection gesture, selection and hover. The graph itself lives in
//! [`FlowchartSession`]; gestures that change it call into the session.

use super::geometry::{self, HandleKind, Rect};
use super::scale::ScaledValues;
use super::session::FlowchartSession;
use super::types::{EdgeKind, Position};

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal screen offset of the graph origin.
	pub x: f64,
	/// Vertical screen offset of the graph origin.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Tracks an in-progress node drag.
#[derive(Clone, Debug)]
pub struct DragState {
	/// Node being dragged.
	pub node_id: String,
	/// Screen x where the drag started.
	pub start_x: f64,
	/// Screen y where the drag started.
	pub start_y: f64,
	/// Node position when the drag started.
	pub node_start: Position,
}

/// Tracks an in-progress canvas pan.
#[derive(Clone, Debug)]
pub struct PanState {
	/// Screen x where the pan started.
	pub start_x: f64,
	/// Screen y where the pan started.
	pub start_y: f64,
	/// Transform offset when the pan started.
	pub transform_start_x: f64,
	/// Transform offset when the pan started.
	pub transform_start_y: f64,
}

/// A connection being dragged out of a handle.
#[derive(Clone, Debug)]
pub struct ConnectState {
	/// Node the connection starts from.
	pub node_id: String,
	/// Handle the connection starts from.
	pub handle: HandleKind,
	/// Current pointer position in graph space.
	pub cursor: Position,
}

/// Currently selected element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
	/// A node, by id.
	Node(String),
	/// An edge, by id.
	Edge(String),
}

/// What lies under the pointer, in pick priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
	/// A handle of the given node.
	Handle(String, HandleKind),
	/// A node box.
	Node(String),
	/// An edge, within the hit distance.
	Edge(String),
	/// Empty canvas.
	Background,
}

/// View state for one flowchart canvas.
#[derive(Clone, Debug, Default)]
pub struct FlowchartState {
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Node drag in progress.
	pub drag: Option<DragState>,
	/// Canvas pan in progress.
	pub pan: Option<PanState>,
	/// Connection drag in progress.
	pub connect: Option<ConnectState>,
	/// Selected node or edge.
	pub selection: Option<Selection>,
	/// Handle under the pointer.
	pub hovered_handle: Option<(String, HandleKind)>,
	/// Viewport width in CSS pixels.
	pub width: f64,
	/// Viewport height in CSS pixels.
	pub height: f64,
}

impl FlowchartState {
	/// Identity view over a viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width,
			height,
			..Self::default()
		}
	}

	/// Converts a canvas point to graph space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Converts a graph point to canvas space.
	pub fn graph_to_screen(&self, p: Position) -> (f64, f64) {
		(
			p.x * self.transform.k + self.transform.x,
			p.y * self.transform.k + self.transform.y,
		)
	}

	/// Zooms by `factor`, keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, min_k: f64, max_k: f64) {
		let new_k = (self.transform.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zooms about the viewport centre.
	pub fn zoom_by(&mut self, factor: f64, min_k: f64, max_k: f64) {
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.zoom_at(cx, cy, factor, min_k, max_k);
	}

	/// Centres `bounds` in the viewport, leaving `padding` (fraction of the
	/// viewport) free around it.
	pub fn fit_view(&mut self, bounds: Rect, padding: f64, min_k: f64, max_k: f64) {
		let avail_w = self.width * (1.0 - 2.0 * padding);
		let avail_h = self.height * (1.0 - 2.0 * padding);
		let k = (avail_w / bounds.width.max(1.0))
			.min(avail_h / bounds.height.max(1.0))
			.clamp(min_k, max_k);
		let center = bounds.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - center.x * k,
			y: self.height / 2.0 - center.y * k,
			k,
		};
	}

	/// Picks the topmost element under the screen point.
	pub fn hit_test(
		&self,
		session: &FlowchartSession,
		sx: f64,
		sy: f64,
		scale: &ScaledValues,
	) -> Hit {
		let p = self.screen_to_graph(sx, sy);

		// Later nodes draw on top, so search back to front.
		for node in session.nodes().iter().rev() {
			for kind in [HandleKind::Source, HandleKind::Target] {
				let h = geometry::handle_position(node, kind);
				if ((h.x - p.x).powi(2) + (h.y - p.y).powi(2)).sqrt() <= scale.handle_hit_radius {
					return Hit::Handle(node.id.clone(), kind);
				}
			}
		}
		if let Some(node) = session
			.nodes()
			.iter()
			.rev()
			.find(|n| Rect::of_node(n).contains(p))
		{
			return Hit::Node(node.id.clone());
		}

		let mut best: Option<(f64, &str)> = None;
		for edge in session.edges() {
			let Some(path) = edge_points(session, &edge.source, &edge.target, edge.kind) else {
				continue;
			};
			let d = geometry::distance_to_path(p, &path);
			if d <= scale.edge_hit_distance && best.is_none_or(|(bd, _)| d < bd) {
				best = Some((d, edge.id.as_str()));
			}
		}
		match best {
			Some((_, id)) => Hit::Edge(id.to_string()),
			None => Hit::Background,
		}
	}

	/// Ends a connection gesture over `hit`. Returns the `(source, target)`
	/// pair to connect when it landed on a handle of the opposite kind.
	pub fn finish_connect(&mut self, hit: &Hit) -> Option<(String, String)> {
		let connect = self.connect.take()?;
		let Hit::Handle(node_id, kind) = hit else {
			return None;
		};
		if *kind != connect.handle.opposite() {
			return None;
		}
		match connect.handle {
			HandleKind::Source => Some((connect.node_id, node_id.clone())),
			HandleKind::Target => Some((node_id.clone(), connect.node_id)),
		}
	}

	/// Drops every gesture in progress.
	pub fn cancel_gestures(&mut self) {
		self.drag = None;
		self.pan = None;
		self.connect = None;
	}

	/// Forgets selection and hover that point at elements no longer in the session.
	pub fn prune(&mut self, session: &FlowchartSession) {
		let stale = match &self.selection {
			Some(Selection::Node(id)) => session.node(id).is_none(),
			Some(Selection::Edge(id)) => session.edge(id).is_none(),
			None => false,
		};
		if stale {
			self.selection = None;
		}
		if let Some((id, _)) = &self.hovered_handle {
			if session.node(id).is_none() {
				self.hovered_handle = None;
			}
		}
	}

	/// Records the new viewport size.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Unrounded path of an edge between two nodes of the session.
pub fn edge_points(
	session: &FlowchartSession,
	source: &str,
	target: &str,
	kind: EdgeKind,
) -> Option<Vec<Position>> {
	let (s, t) = (session.node(source)?, session.node(target)?);
	Some(geometry::edge_path(
		kind,
		geometry::handle_position(s, HandleKind::Source),
		geometry::handle_position(t, HandleKind::Target),
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::flowchart::scale::ScaleConfig;

	fn scale() -> ScaledValues {
		ScaledValues::new(&ScaleConfig::default(), 1.0)
	}

	#[test]
	fn screen_graph_round_trip_under_transform() {
		let mut state = FlowchartState::new(800.0, 600.0);
		state.transform = ViewTransform {
			x: 100.0,
			y: 50.0,
			k: 2.0,
		};
		let p = state.screen_to_graph(300.0, 250.0);
		assert_eq!(p, Position::new(100.0, 100.0));
		assert_eq!(state.graph_to_screen(p), (300.0, 250.0));
	}

	#[test]
	fn zoom_keeps_anchor_fixed_and_clamps() {
		let mut state = FlowchartState::new(800.0, 600.0);
		let before = state.screen_to_graph(200.0, 100.0);
		state.zoom_at(200.0, 100.0, 2.0, 0.1, 4.0);
		assert_eq!(state.transform.k, 2.0);
		assert_eq!(state.screen_to_graph(200.0, 100.0), before);

		state.zoom_at(0.0, 0.0, 100.0, 0.1, 4.0);
		assert_eq!(state.transform.k, 4.0);
	}

	#[test]
	fn fit_view_centres_bounds() {
		let mut state = FlowchartState::new(1000.0, 500.0);
		let bounds = Rect {
			x: 0.0,
			y: 0.0,
			width: 250.0,
			height: 250.0,
		};
		state.fit_view(bounds, 0.25, 0.1, 4.0);
		// Height limits: 250 available / 250 tall.
		assert_eq!(state.transform.k, 1.0);
		assert_eq!(state.graph_to_screen(bounds.center()), (500.0, 250.0));
	}

	#[test]
	fn hit_test_prefers_handles_then_nodes_then_edges() {
		let session = FlowchartSession::seeded();
		let state = FlowchartState::new(800.0, 600.0);
		let s = scale();

		// Node "1" sits at (250, 0), 150x40; its source handle is at (325, 40).
		assert_eq!(
			state.hit_test(&session, 325.0, 40.0, &s),
			Hit::Handle("1".to_string(), HandleKind::Source)
		);
		assert_eq!(
			state.hit_test(&session, 260.0, 20.0, &s),
			Hit::Node("1".to_string())
		);
		// Straight segment between node 1 and node 2 at x = 325.
		assert_eq!(
			state.hit_test(&session, 326.0, 80.0, &s),
			Hit::Edge("e1-2".to_string())
		);
		assert_eq!(state.hit_test(&session, 0.0, 500.0, &s), Hit::Background);
	}

	#[test]
	fn back_edge_in_stacked_chart_is_selectable() {
		let mut session = FlowchartSession::seeded();
		session.connect("3", "1", EdgeKind::SmoothStep).unwrap();
		let state = FlowchartState::new(800.0, 600.0);
		let s = scale();

		let path = edge_points(&session, "3", "1", EdgeKind::SmoothStep).unwrap();
		assert!(path.iter().any(|p| p.x > 400.0));
		assert_eq!(
			state.hit_test(&session, 420.0, 150.0, &s),
			Hit::Edge("e3-1".to_string())
		);
		// The forward edges keep their own segments.
		assert_eq!(
			state.hit_test(&session, 326.0, 80.0, &s),
			Hit::Edge("e1-2".to_string())
		);
	}

	#[test]
	fn finish_connect_normalises_direction() {
		let mut state = FlowchartState::default();
		state.connect = Some(ConnectState {
			node_id: "3".to_string(),
			handle: HandleKind::Target,
			cursor: Position::default(),
		});
		let pair = state.finish_connect(&Hit::Handle("1".to_string(), HandleKind::Source));
		assert_eq!(pair, Some(("1".to_string(), "3".to_string())));
		assert!(state.connect.is_none());
	}

	#[test]
	fn finish_connect_requires_opposite_handle() {
		let mut state = FlowchartState::default();
		state.connect = Some(ConnectState {
			node_id: "1".to_string(),
			handle: HandleKind::Source,
			cursor: Position::default(),
		});
		assert_eq!(
			state.finish_connect(&Hit::Handle("2".to_string(), HandleKind::Source)),
			None
		);
		assert!(state.connect.is_none());
		assert_eq!(state.finish_connect(&Hit::Background), None);
	}

	#[test]
	fn prune_clears_stale_selection() {
		let mut session = FlowchartSession::seeded();
		let mut state = FlowchartState::default();
		state.selection = Some(Selection::Node("2".to_string()));
		session.remove_node("2");
		state.prune(&session);
		assert_eq!(state.selection, None);
	}
}
