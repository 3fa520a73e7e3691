//! The flowchart model: one session owning every node and edge.
//!
//! All mutations go through [`FlowchartSession`], which keeps the two
//! collections consistent: node ids are unique and every edge references two
//! nodes that exist.

use log::{debug, warn};

use super::config::FlowchartConfig;
use super::types::{Edge, EdgeKind, FlowchartData, Node, NodeKind, Position};

/// Rejected connection attempt.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConnectError {
	/// No node has this id.
	#[error("unknown node `{0}`")]
	UnknownNode(String),
}

/// Result of a successful [`FlowchartSession::connect`] call.
#[derive(Debug, PartialEq)]
pub enum ConnectOutcome {
	/// A new edge with this id was appended.
	Added(String),
	/// An edge from source to target already existed; nothing changed.
	AlreadyConnected,
}

/// Owns the nodes and edges for the lifetime of the page.
#[derive(Clone, Debug, Default)]
pub struct FlowchartSession {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

impl FlowchartSession {
	/// Builds a session from a document, dropping duplicate node ids and edges
	/// whose endpoints are missing.
	pub fn new(data: FlowchartData) -> Self {
		let mut session = Self::default();
		for node in data.nodes {
			if session.node(&node.id).is_some() {
				warn!("flowchart: dropping duplicate node `{}`", node.id);
				continue;
			}
			session.nodes.push(node);
		}
		for edge in data.edges {
			if session.node(&edge.source).is_none() || session.node(&edge.target).is_none() {
				warn!(
					"flowchart: dropping edge `{}` ({} -> {}): unknown endpoint",
					edge.id, edge.source, edge.target
				);
				continue;
			}
			session.edges.push(edge);
		}
		session
	}

	/// Session over the three-step seed chart.
	pub fn seeded() -> Self {
		Self::new(FlowchartData::seed())
	}

	/// Nodes in draw order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Edges in draw order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Looks up a node by id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Looks up an edge by id.
	pub fn edge(&self, id: &str) -> Option<&Edge> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Appends a node with a time-derived id, a random position and the next
	/// default label.
	///
	/// `unit` is a pair of uniform draws in `[0, 1)`, scaled to the configured
	/// spawn area.
	pub fn add_node(&mut self, now_ms: f64, unit: (f64, f64), config: &FlowchartConfig) -> &Node {
		// Half-open bounds: a draw of exactly 1.0 still lands inside.
		let draw = |u: f64| u.clamp(0.0, 1.0 - f64::EPSILON);
		let (w, h) = config.spawn_area;
		let position = Position::new(draw(unit.0) * w, draw(unit.1) * h);

		let id = self.unique_id(format!("{}", now_ms.max(0.0).floor() as u64));
		let label = format!("{} {}", config.label_prefix, self.nodes.len() + 1);
		debug!("flowchart: add node `{id}` ({label}) at ({:.1}, {:.1})", position.x, position.y);

		self.nodes.push(Node {
			id,
			label,
			position,
			kind: NodeKind::Editable,
		});
		&self.nodes[self.nodes.len() - 1]
	}

	/// Sets a node's position. Returns `false` if the node does not exist.
	pub fn move_node(&mut self, id: &str, position: Position) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.position = position;
				true
			}
			None => false,
		}
	}

	/// Replaces a node's label. Returns `false` if the node does not exist.
	pub fn rename_node(&mut self, id: &str, label: impl Into<String>) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.label = label.into();
				debug!("flowchart: node `{id}` relabelled to {:?}", node.label);
				true
			}
			None => false,
		}
	}

	/// Adds an edge from `source` to `target`.
	pub fn connect(
		&mut self,
		source: &str,
		target: &str,
		kind: EdgeKind,
	) -> Result<ConnectOutcome, ConnectError> {
		for id in [source, target] {
			if self.node(id).is_none() {
				return Err(ConnectError::UnknownNode(id.to_string()));
			}
		}
		if self
			.edges
			.iter()
			.any(|e| e.source == source && e.target == target)
		{
			return Ok(ConnectOutcome::AlreadyConnected);
		}

		let id = self.unique_edge_id(Edge::id_for(source, target));
		debug!("flowchart: connect {source} -> {target} as `{id}`");
		self.edges.push(Edge {
			id: id.clone(),
			source: source.to_string(),
			target: target.to_string(),
			kind,
		});
		Ok(ConnectOutcome::Added(id))
	}

	/// Removes a node along with every edge touching it.
	pub fn remove_node(&mut self, id: &str) -> Option<Node> {
		let pos = self.nodes.iter().position(|n| n.id == id)?;
		let node = self.nodes.remove(pos);
		let before = self.edges.len();
		self.edges.retain(|e| !e.touches(id));
		debug!(
			"flowchart: removed node `{id}` and {} edge(s)",
			before - self.edges.len()
		);
		Some(node)
	}

	pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
		let pos = self.edges.iter().position(|e| e.id == id)?;
		debug!("flowchart: removed edge `{id}`");
		Some(self.edges.remove(pos))
	}

	fn unique_id(&self, base: String) -> String {
		if self.node(&base).is_none() {
			return base;
		}
		(1..)
			.map(|n| format!("{base}-{n}"))
			.find(|candidate| self.node(candidate).is_none())
			.unwrap_or(base)
	}

	fn unique_edge_id(&self, base: String) -> String {
		if self.edge(&base).is_none() {
			return base;
		}
		(1..)
			.map(|n| format!("{base}-{n}"))
			.find(|candidate| self.edge(candidate).is_none())
			.unwrap_or(base)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn config() -> FlowchartConfig {
		FlowchartConfig::default()
	}

	#[test]
	fn add_node_appends_exactly_one() {
		let mut session = FlowchartSession::seeded();
		let before = session.nodes().len();
		session.add_node(1_700_000_000_000.0, (0.5, 0.25), &config());
		assert_eq!(session.nodes().len(), before + 1);
	}

	#[test]
	fn add_node_position_within_spawn_area() {
		let mut session = FlowchartSession::default();
		let cfg = config();
		for (i, unit) in [(0.0, 0.0), (0.999, 0.999), (1.0, 1.0), (0.3, 0.7)]
			.into_iter()
			.enumerate()
		{
			let node = session.add_node(i as f64, unit, &cfg);
			let (w, h) = cfg.spawn_area;
			assert!(node.position.x >= 0.0 && node.position.x < w);
			assert!(node.position.y >= 0.0 && node.position.y < h);
		}
	}

	#[test]
	fn add_node_uses_time_for_id() {
		let mut session = FlowchartSession::default();
		let id = session.add_node(1234.9, (0.1, 0.1), &config()).id.clone();
		assert_eq!(id, "1234");
	}

	#[test]
	fn add_node_ids_stay_unique_within_same_millisecond() {
		let mut session = FlowchartSession::default();
		let a = session.add_node(42.0, (0.1, 0.1), &config()).id.clone();
		let b = session.add_node(42.0, (0.2, 0.2), &config()).id.clone();
		assert_ne!(a, b);
		assert_eq!(b, "42-1");
	}

	#[test]
	fn seeded_add_node_scenario() {
		let mut session = FlowchartSession::seeded();
		assert_eq!(session.nodes().len(), 3);
		assert_eq!(session.edges().len(), 2);

		session.add_node(1.0, (0.5, 0.5), &config());

		assert_eq!(session.nodes().len(), 4);
		assert_eq!(session.edges().len(), 2);
		assert_eq!(session.nodes()[3].label, "Step 4");
	}

	#[test]
	fn connect_adds_one_edge_with_configured_kind() {
		let mut session = FlowchartSession::seeded();
		let outcome = session.connect("1", "3", EdgeKind::SmoothStep).unwrap();

		assert_eq!(outcome, ConnectOutcome::Added("e1-3".to_string()));
		assert_eq!(session.edges().len(), 3);
		let edge = session.edge("e1-3").unwrap();
		assert_eq!((edge.source.as_str(), edge.target.as_str()), ("1", "3"));
		assert_eq!(edge.kind, EdgeKind::SmoothStep);
	}

	#[test]
	fn connect_rejects_unknown_nodes() {
		let mut session = FlowchartSession::seeded();
		let err = session.connect("1", "nope", EdgeKind::SmoothStep).unwrap_err();
		assert_eq!(err, ConnectError::UnknownNode("nope".to_string()));
		assert_eq!(session.edges().len(), 2);
	}

	#[test]
	fn connect_ignores_duplicates() {
		let mut session = FlowchartSession::seeded();
		let outcome = session.connect("1", "2", EdgeKind::Straight).unwrap();
		assert_eq!(outcome, ConnectOutcome::AlreadyConnected);
		assert_eq!(session.edges().len(), 2);
	}

	#[test]
	fn reverse_connection_is_a_new_edge() {
		let mut session = FlowchartSession::seeded();
		assert!(matches!(
			session.connect("2", "1", EdgeKind::SmoothStep),
			Ok(ConnectOutcome::Added(_))
		));
	}

	#[test]
	fn remove_node_drops_incident_edges() {
		let mut session = FlowchartSession::seeded();
		let removed = session.remove_node("2").unwrap();
		assert_eq!(removed.label, "Process");
		assert_eq!(session.nodes().len(), 2);
		assert!(session.edges().is_empty());
	}

	#[test]
	fn remove_edge_leaves_nodes() {
		let mut session = FlowchartSession::seeded();
		assert!(session.remove_edge("e1-2").is_some());
		assert!(session.remove_edge("e1-2").is_none());
		assert_eq!(session.nodes().len(), 3);
		assert_eq!(session.edges().len(), 1);
	}

	#[test]
	fn new_drops_dangling_edges_and_duplicate_nodes() {
		let mut data = FlowchartData::seed();
		data.nodes.push(data.nodes[0].clone());
		data.edges.push(Edge {
			id: "ex".to_string(),
			source: "1".to_string(),
			target: "missing".to_string(),
			kind: EdgeKind::Straight,
		});
		let session = FlowchartSession::new(data);
		assert_eq!(session.nodes().len(), 3);
		assert_eq!(session.edges().len(), 2);
	}

	#[test]
	fn move_and_rename() {
		let mut session = FlowchartSession::seeded();
		assert!(session.move_node("1", Position::new(10.0, 20.0)));
		assert!(session.rename_node("1", "Begin"));
		let node = session.node("1").unwrap();
		assert_eq!(node.position, Position::new(10.0, 20.0));
		assert_eq!(node.label, "Begin");
		assert!(!session.rename_node("x", "y"));
		assert!(!session.move_node("x", Position::default()));
	}
}
