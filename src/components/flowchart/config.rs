//! Editor defaults.

use super::types::EdgeKind;

/// Settings for the "Export as PNG" action.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
	/// Name offered to the browser for the downloaded file.
	pub filename: String,
	/// CSS color painted behind the chart before rasterizing.
	pub background: String,
}

impl Default for ExportOptions {
	fn default() -> Self {
		Self {
			filename: "flowchart.png".to_string(),
			background: "#1a202c".to_string(),
		}
	}
}

/// Behavioral settings for the flowchart editor.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowchartConfig {
	/// New nodes are placed uniformly at random in `[0, w) x [0, h)`.
	pub spawn_area: (f64, f64),
	/// Default label for new nodes is `"{prefix} {count}"`.
	pub label_prefix: String,
	/// Variant given to user-drawn edges.
	pub edge_kind: EdgeKind,
	/// Fraction of the viewport left empty around the chart by fit-view.
	pub fit_padding: f64,
	/// Zoom limits for wheel and control zooming.
	pub min_zoom: f64,
	/// Upper zoom limit.
	pub max_zoom: f64,
	/// PNG export settings.
	pub export: ExportOptions,
}

impl Default for FlowchartConfig {
	fn default() -> Self {
		Self {
			spawn_area: (400.0, 400.0),
			label_prefix: "Step".to_string(),
			edge_kind: EdgeKind::SmoothStep,
			fit_padding: 0.1,
			min_zoom: 0.1,
			max_zoom: 4.0,
			export: ExportOptions::default(),
		}
	}
}
