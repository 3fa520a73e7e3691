//! Canvas rendering for the flowchart.
//!
//! Draw order, back to front:
//! 1. Background fill and dot grid
//! 2. Edges, then the dashed preview of a connection being dragged
//! 3. Node boxes with labels, then their handles
//!
//! Export rendering uses the same passes but paints a solid export background
//! and leaves out selection, hover and connection preview.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{self, HandleKind, NODE_HEIGHT, NODE_WIDTH};
use super::scale::{ScaleConfig, ScaledValues};
use super::session::FlowchartSession;
use super::state::{self, FlowchartState, Selection};
use super::theme::Theme;
use super::types::{Node, Position};

/// Upper bound on grid dots per frame; the grid is skipped beyond it.
const MAX_GRID_DOTS: f64 = 20_000.0;

/// What the frame is for.
#[derive(Clone, Copy, Debug)]
pub enum RenderMode<'a> {
	/// On-screen editing, with selection and hover feedback.
	Interactive,
	/// PNG export over a fixed background color.
	Export { background: &'a str },
}

impl RenderMode<'_> {
	fn interactive(&self) -> bool {
		matches!(self, RenderMode::Interactive)
	}
}

/// Renders the complete flowchart to the canvas.
pub fn render(
	session: &FlowchartSession,
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
	mode: RenderMode<'_>,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme, mode);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	if scale.show_grid {
		draw_grid(state, ctx, config, theme);
	}
	draw_edges(session, state, ctx, &scale, theme, mode);
	if mode.interactive() {
		draw_connection_preview(session, state, ctx, &scale, theme);
	}
	for node in session.nodes() {
		let selected = mode.interactive()
			&& state.selection.as_ref() == Some(&Selection::Node(node.id.clone()));
		draw_node(ctx, node, &scale, theme, selected);
	}
	for node in session.nodes() {
		draw_handles(state, ctx, node, &scale, theme, mode);
	}

	ctx.restore();
}

fn draw_background(
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	mode: RenderMode<'_>,
) {
	match mode {
		RenderMode::Interactive => ctx.set_fill_style_str(&theme.background.color.to_css()),
		RenderMode::Export { background } => ctx.set_fill_style_str(background),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_grid(
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let gap = config.grid_gap;
	let top_left = state.screen_to_graph(0.0, 0.0);
	let bottom_right = state.screen_to_graph(state.width, state.height);
	let (x0, y0) = ((top_left.x / gap).floor() * gap, (top_left.y / gap).floor() * gap);
	let (cols, rows) = (
		((bottom_right.x - x0) / gap).ceil(),
		((bottom_right.y - y0) / gap).ceil(),
	);
	if cols * rows > MAX_GRID_DOTS {
		return;
	}

	ctx.set_fill_style_str(&theme.background.grid.to_css());
	let r = theme.background.grid_dot;
	for row in 0..=rows as usize {
		for col in 0..=cols as usize {
			let (x, y) = (x0 + col as f64 * gap, y0 + row as f64 * gap);
			ctx.begin_path();
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
			ctx.fill();
		}
	}
}

fn draw_edges(
	session: &FlowchartSession,
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	mode: RenderMode<'_>,
) {
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	for edge in session.edges() {
		let Some(path) = state::edge_points(session, &edge.source, &edge.target, edge.kind) else {
			continue;
		};
		let selected = mode.interactive()
			&& state.selection.as_ref() == Some(&Selection::Edge(edge.id.clone()));
		let (color, width) = if selected {
			(theme.edge.selected, scale.edge_width * 1.6)
		} else {
			(theme.edge.color, scale.edge_width)
		};
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		stroke_rounded_path(ctx, &path, theme.edge.corner_radius);
	}
}

/// Strokes a polyline with its interior corners rounded.
fn stroke_rounded_path(ctx: &CanvasRenderingContext2d, path: &[Position], radius: f64) {
	let (Some(first), Some(last)) = (path.first(), path.last()) else {
		return;
	};
	ctx.begin_path();
	ctx.move_to(first.x, first.y);
	for w in path.windows(3) {
		let (prev, corner, next) = (w[0], w[1], w[2]);
		let seg_in = ((corner.x - prev.x).powi(2) + (corner.y - prev.y).powi(2)).sqrt();
		let seg_out = ((next.x - corner.x).powi(2) + (next.y - corner.y).powi(2)).sqrt();
		let r = radius.min(seg_in / 2.0).min(seg_out / 2.0);
		let _ = ctx.arc_to(corner.x, corner.y, next.x, next.y, r);
	}
	ctx.line_to(last.x, last.y);
	ctx.stroke();
}

fn draw_connection_preview(
	session: &FlowchartSession,
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let Some(connect) = &state.connect else {
		return;
	};
	let Some(node) = session.node(&connect.node_id) else {
		return;
	};
	let from = geometry::handle_position(node, connect.handle);

	ctx.set_stroke_style_str(&theme.edge.preview.to_css());
	ctx.set_line_width(scale.edge_width);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(6.0 / scale.k),
		&JsValue::from_f64(4.0 / scale.k),
	));
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(connect.cursor.x, connect.cursor.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	scale: &ScaledValues,
	theme: &Theme,
	selected: bool,
) {
	let (x, y) = (node.position.x, node.position.y);
	rounded_rect_path(ctx, x, y, NODE_WIDTH, NODE_HEIGHT, theme.node.corner_radius);
	ctx.set_fill_style_str(&theme.node.fill.to_css());
	ctx.fill();

	if selected {
		ctx.set_stroke_style_str(&theme.node.selected_border.to_css());
		ctx.set_line_width(scale.selection_width);
	} else {
		ctx.set_stroke_style_str(&theme.node.border.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
	}
	ctx.stroke();

	ctx.set_fill_style_str(&theme.node.text.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text_with_max_width(
		&node.label,
		x + NODE_WIDTH / 2.0,
		y + NODE_HEIGHT / 2.0,
		NODE_WIDTH - 12.0,
	);
}

fn draw_handles(
	state: &FlowchartState,
	ctx: &CanvasRenderingContext2d,
	node: &Node,
	scale: &ScaledValues,
	theme: &Theme,
	mode: RenderMode<'_>,
) {
	for kind in [HandleKind::Target, HandleKind::Source] {
		let p = geometry::handle_position(node, kind);
		let hovered = mode.interactive()
			&& state
				.hovered_handle
				.as_ref()
				.is_some_and(|(id, k)| *id == node.id && *k == kind);
		let color = if hovered {
			theme.node.handle_hover
		} else {
			theme.node.handle
		};
		let radius = if hovered {
			scale.handle_radius * 1.4
		} else {
			scale.handle_radius
		};
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&color.to_css());
		ctx.fill();
	}
}
