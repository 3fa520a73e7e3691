//! Flowchart data structures: nodes, edges and the initial data document.

use serde::{Deserialize, Serialize};

/// A point in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Position {
	/// Point at `(x, y)`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Rendering variant of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Rounded box with an inline-editable label and two handles.
	#[default]
	Editable,
}

/// Rendering variant of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
	/// Orthogonal path with rounded corners.
	#[default]
	SmoothStep,
	/// Direct line from source handle to target handle.
	Straight,
}

/// A flowchart step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	/// Unique identifier. Edges reference nodes by this value.
	pub id: String,
	/// Text drawn inside the box.
	pub label: String,
	/// Top-left corner of the node box in graph space.
	pub position: Position,
	/// Rendering variant.
	#[serde(default)]
	pub kind: NodeKind,
}

/// A directed connector from the source node's bottom handle to the target
/// node's top handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	/// Unique identifier.
	pub id: String,
	/// Id of the node the edge leaves.
	pub source: String,
	/// Id of the node the edge enters.
	pub target: String,
	/// Path style.
	#[serde(default)]
	pub kind: EdgeKind,
}

impl Edge {
	/// Edge id in the `e{source}-{target}` form used for seeded and drawn edges.
	pub fn id_for(source: &str, target: &str) -> String {
		format!("e{source}-{target}")
	}

	/// Whether either endpoint is `node_id`.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// Complete flowchart document, as embedded in the host page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowchartData {
	/// Nodes in draw order.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// Edges between those nodes.
	#[serde(default)]
	pub edges: Vec<Edge>,
}

impl FlowchartData {
	/// The three-step chart shown on first load.
	pub fn seed() -> Self {
		let node = |id: &str, label: &str, x: f64, y: f64| Node {
			id: id.to_string(),
			label: label.to_string(),
			position: Position::new(x, y),
			kind: NodeKind::Editable,
		};
		let edge = |source: &str, target: &str| Edge {
			id: Edge::id_for(source, target),
			source: source.to_string(),
			target: target.to_string(),
			kind: EdgeKind::SmoothStep,
		};

		Self {
			nodes: vec![
				node("1", "Start", 250.0, 0.0),
				node("2", "Process", 250.0, 120.0),
				node("3", "End", 250.0, 240.0),
			],
			edges: vec![edge("1", "2"), edge("2", "3")],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn seed_has_three_nodes_and_two_edges() {
		let data = FlowchartData::seed();
		assert_eq!(data.nodes.len(), 3);
		assert_eq!(data.edges.len(), 2);
		assert_eq!(data.edges[0].id, "e1-2");
	}

	#[test]
	fn kinds_default_when_missing_from_json() {
		let json = r#"{
			"nodes": [{ "id": "a", "label": "A", "position": { "x": 1.0, "y": 2.0 } }],
			"edges": [{ "id": "ea-a", "source": "a", "target": "a" }]
		}"#;
		let data: FlowchartData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes[0].kind, NodeKind::Editable);
		assert_eq!(data.edges[0].kind, EdgeKind::SmoothStep);
	}

	#[test]
	fn edge_kind_uses_lowercase_tag() {
		let kind: EdgeKind = serde_json::from_str(r#""straight""#).unwrap();
		assert_eq!(kind, EdgeKind::Straight);
	}
}
