//! flowchart-canvas: a browser flowchart editor.
//!
//! This crate provides a WASM-based editor that lets users add labelled nodes,
//! connect them by dragging between handles, rename nodes inline and export
//! the chart as a PNG image.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::flowchart::{
	Edge, EdgeKind, ExportOptions, FlowchartConfig, FlowchartData, FlowchartEditor,
	FlowchartSession, Node, NodeKind, Position, Theme,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("flowchart: logging initialized");
}

/// Load a starting chart from a script element with id="flowchart-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_flowchart_data() -> Option<FlowchartData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("flowchart-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<FlowchartData>(&json_text) {
		Ok(data) => {
			info!(
				"flowchart: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("flowchart: failed to parse flowchart data: {}", e);
			None
		}
	}
}

/// Theme named by the `data-theme` attribute of the flowchart-data element.
fn load_theme() -> Option<Theme> {
	let document = web_sys::window()?.document()?;
	let name = document
		.get_element_by_id("flowchart-data")?
		.get_attribute("data-theme")?;
	let theme = Theme::named(&name);
	if theme.is_none() {
		warn!("flowchart: unknown theme `{}`, using the default", name);
	}
	theme
}

/// Main application component.
/// Starts from page-provided data when present, otherwise the seed chart.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let initial = load_flowchart_data().unwrap_or_else(FlowchartData::seed);
	let theme = load_theme().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Flowchart" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-flowchart">
			<FlowchartEditor initial=initial theme=theme />
			<p class="hint">
				"Drag from a bottom handle to a top handle to connect. Double-click a node to rename it. Delete removes the selection."
			</p>
		</div>
	}
}
