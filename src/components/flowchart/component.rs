//! Leptos component wrapping the flowchart canvas.
//!
//! The component owns the [`FlowchartSession`] for the page lifetime, draws it
//! onto an HTML canvas every animation frame and routes pointer, wheel and
//! keyboard events into session mutations. The toolbar, zoom controls and the
//! inline label input are DOM elements layered over the canvas, so they never
//! end up in an exported image.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent,
	WheelEvent, Window,
};

use super::config::FlowchartConfig;
use super::editing::{EditEnd, LabelEditor};
use super::export::{self, BrowserDownload, CanvasSurface, ExportOutcome};
use super::geometry::{self, NODE_HEIGHT, NODE_WIDTH};
use super::render::{self, RenderMode};
use super::scale::{ScaleConfig, ScaledValues};
use super::session::{ConnectOutcome, FlowchartSession};
use super::state::{ConnectState, DragState, FlowchartState, Hit, PanState, Selection};
use super::theme::Theme;
use super::types::{FlowchartData, Position};

const ZOOM_STEP: f64 = 1.2;

/// Everything the event handlers and the animation loop share.
struct EditorContext {
	session: FlowchartSession,
	state: FlowchartState,
	/// Node whose label is being edited, with its editor state.
	editing: Option<(String, LabelEditor)>,
	config: FlowchartConfig,
	scale: ScaleConfig,
	theme: Theme,
	ctx: Option<CanvasRenderingContext2d>,
}

impl EditorContext {
	fn counts(&self) -> (usize, usize) {
		(self.session.nodes().len(), self.session.edges().len())
	}

	fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.state.transform.k)
	}

	fn fit_view(&mut self) {
		if let Some(bounds) = geometry::bounds(self.session.nodes()) {
			self.state.fit_view(
				bounds,
				self.config.fit_padding,
				self.config.min_zoom,
				self.config.max_zoom,
			);
		}
	}

	/// Starts editing `node_id`, ending any edit already open. Returns the
	/// label to seed the input with.
	fn begin_edit(&mut self, node_id: &str) -> Option<String> {
		let label = self.session.node(node_id)?.label.clone();
		self.finish_edit(EditEnd::Blur);
		self.state.cancel_gestures();

		let mut editor = LabelEditor::default();
		editor.begin(&label);
		self.editing = Some((node_id.to_string(), editor));
		Some(label)
	}

	/// Ends any label edit, committing the draft unless `end` is a cancel.
	fn finish_edit(&mut self, end: EditEnd) {
		let Some((node_id, mut editor)) = self.editing.take() else {
			return;
		};
		if let Some(label) = editor.finish(end) {
			if !self.session.rename_node(&node_id, label) {
				debug!("flowchart: edited node `{node_id}` no longer exists");
			}
		}
	}

	fn delete_selection(&mut self) {
		match self.state.selection.take() {
			Some(Selection::Node(id)) => {
				self.session.remove_node(&id);
			}
			Some(Selection::Edge(id)) => {
				self.session.remove_edge(&id);
			}
			None => {}
		}
		self.state.prune(&self.session);
	}
}

fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn viewport_size(window: &Window, canvas: &HtmlCanvasElement, fullscreen: bool) -> (f64, f64) {
	if fullscreen {
		let w = window.inner_width().ok().and_then(|v| v.as_f64());
		let h = window.inner_height().ok().and_then(|v| v.as_f64());
		return (w.unwrap_or(800.0), h.unwrap_or(600.0));
	}
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn show_label_input(input: &HtmlInputElement, c: &EditorContext, node_id: &str, label: &str) {
	let Some(node) = c.session.node(node_id) else {
		return;
	};
	let scale = c.scaled();
	let k = scale.k;
	let (left, top) = c.state.graph_to_screen(node.position);
	let style = web_sys::HtmlElement::style(input);
	let _ = style.set_property("display", "block");
	let _ = style.set_property("left", &format!("{left}px"));
	let _ = style.set_property("top", &format!("{top}px"));
	let _ = style.set_property("width", &format!("{}px", NODE_WIDTH * k));
	let _ = style.set_property("height", &format!("{}px", NODE_HEIGHT * k));
	let _ = style.set_property("font-size", &format!("{}px", scale.label_size * k));
	input.set_value(label);
	let _ = input.focus();
	input.select();
}

fn hide_label_input(input: &HtmlInputElement) {
	let _ = web_sys::HtmlElement::style(input).set_property("display", "none");
}

/// Interactive flowchart editor: toolbar, canvas and overlay controls.
///
/// Starts from `initial` (or the three-step seed chart). The canvas fills its
/// parent by default; `fullscreen = true` sizes it to the window and follows
/// window resizes.
#[component]
pub fn FlowchartEditor(
	#[prop(optional)] initial: Option<FlowchartData>,
	#[prop(optional)] config: FlowchartConfig,
	#[prop(optional)] theme: Theme,
	#[prop(default = false)] fullscreen: bool,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let input_ref = NodeRef::<leptos::html::Input>::new();

	let session = FlowchartSession::new(initial.unwrap_or_else(FlowchartData::seed));
	let context = Rc::new(RefCell::new(EditorContext {
		session,
		state: FlowchartState::default(),
		editing: None,
		config,
		scale: ScaleConfig::default(),
		theme,
		ctx: None,
	}));
	let counts = RwSignal::new(context.borrow().counts());

	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("flowchart: no window, canvas not started");
			return;
		};

		let (w, h) = viewport_size(&window, &canvas, fullscreen);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: Option<CanvasRenderingContext2d> = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok());
		let Some(ctx) = ctx else {
			warn!("flowchart: 2d canvas context unavailable");
			return;
		};

		{
			let mut c = context_init.borrow_mut();
			c.ctx = Some(ctx);
			c.state.resize(w, h);
			c.fit_view();
			info!(
				"flowchart: mounted {}x{} with {} nodes, {} edges",
				w,
				h,
				c.session.nodes().len(),
				c.session.edges().len()
			);
		}

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = viewport_size(&win, &canvas_resize, fullscreen);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			context_resize.borrow_mut().state.resize(nw, nh);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let c = context_anim.borrow();
				if let Some(ref ctx) = c.ctx {
					render::render(
						&c.session,
						&c.state,
						ctx,
						&c.scale,
						&c.theme,
						RenderMode::Interactive,
					);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_add = context.clone();
	let on_add_node = move |_: MouseEvent| {
		let mut c = context_add.borrow_mut();
		let unit = (js_sys::Math::random(), js_sys::Math::random());
		let config = c.config.clone();
		let label = c.session.add_node(js_sys::Date::now(), unit, &config).label.clone();
		info!("flowchart: added {label}");
		counts.set(c.counts());
	};

	let context_export = context.clone();
	let on_export = move |_: MouseEvent| {
		let c = context_export.borrow();
		let canvas: Option<HtmlCanvasElement> = canvas_ref.get().map(Into::into);
		let surface = match (&canvas, &c.ctx) {
			(Some(canvas), Some(ctx)) => Some(CanvasSurface {
				canvas,
				ctx,
				session: &c.session,
				state: &c.state,
				scale: &c.scale,
				theme: &c.theme,
			}),
			_ => None,
		};
		match export::export_png(surface.as_ref(), &BrowserDownload, &c.config.export) {
			Ok(ExportOutcome::Downloaded) => {}
			Ok(ExportOutcome::NoCanvas) => debug!("flowchart: export skipped, canvas not mounted"),
			Err(e) => error!("flowchart: export failed: {e}"),
		}
	};

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let _ = canvas.focus();
		let (x, y) = canvas_point(&canvas, &ev);

		let mut c = context_md.borrow_mut();
		let c = &mut *c;
		let scale = c.scaled();
		match c.state.hit_test(&c.session, x, y, &scale) {
			Hit::Handle(node_id, handle) => {
				let cursor = c.state.screen_to_graph(x, y);
				c.state.connect = Some(ConnectState {
					node_id,
					handle,
					cursor,
				});
			}
			Hit::Node(node_id) => {
				if let Some(node) = c.session.node(&node_id) {
					let node_start = node.position;
					c.state.drag = Some(DragState {
						node_id: node_id.clone(),
						start_x: x,
						start_y: y,
						node_start,
					});
				}
				c.state.selection = Some(Selection::Node(node_id));
			}
			Hit::Edge(edge_id) => {
				c.state.selection = Some(Selection::Edge(edge_id));
			}
			Hit::Background => {
				c.state.selection = None;
				c.state.pan = Some(PanState {
					start_x: x,
					start_y: y,
					transform_start_x: c.state.transform.x,
					transform_start_y: c.state.transform.y,
				});
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		let mut c = context_mm.borrow_mut();
		let c = &mut *c;
		let scale = c.scaled();
		c.state.hovered_handle = match c.state.hit_test(&c.session, x, y, &scale) {
			Hit::Handle(id, kind) => Some((id, kind)),
			_ => None,
		};

		if let Some(drag) = &c.state.drag {
			let k = c.state.transform.k;
			let position = Position::new(
				drag.node_start.x + (x - drag.start_x) / k,
				drag.node_start.y + (y - drag.start_y) / k,
			);
			c.session.move_node(&drag.node_id, position);
		} else if let Some(pan) = &c.state.pan {
			c.state.transform.x = pan.transform_start_x + (x - pan.start_x);
			c.state.transform.y = pan.transform_start_y + (y - pan.start_y);
		} else if c.state.connect.is_some() {
			let cursor = c.state.screen_to_graph(x, y);
			if let Some(ref mut connect) = c.state.connect {
				connect.cursor = cursor;
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		let mut c = context_mu.borrow_mut();
		if c.state.connect.is_some() {
			let scale = c.scaled();
			let hit = c.state.hit_test(&c.session, x, y, &scale);
			if let Some((source, target)) = c.state.finish_connect(&hit) {
				let kind = c.config.edge_kind;
				match c.session.connect(&source, &target, kind) {
					Ok(ConnectOutcome::Added(id)) => {
						info!("flowchart: connected {source} -> {target} ({id})");
						counts.set(c.counts());
					}
					Ok(ConnectOutcome::AlreadyConnected) => {
						debug!("flowchart: {source} -> {target} already connected");
					}
					Err(e) => warn!("flowchart: connection rejected: {e}"),
				}
			}
		}
		c.state.cancel_gestures();
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut c = context_ml.borrow_mut();
		c.state.cancel_gestures();
		c.state.hovered_handle = None;
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = canvas_point(&canvas, &ev);

		let mut c = context_wh.borrow_mut();
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		let (min_k, max_k) = (c.config.min_zoom, c.config.max_zoom);
		c.state.zoom_at(x, y, factor, min_k, max_k);
	};

	let context_dbl = context.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let (Some(canvas), Some(input)) = (canvas_ref.get(), input_ref.get()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let input: HtmlInputElement = input.into();
		let (x, y) = canvas_point(&canvas, &ev);

		let mut c = context_dbl.borrow_mut();
		let scale = c.scaled();
		let Hit::Node(node_id) = c.state.hit_test(&c.session, x, y, &scale) else {
			return;
		};
		let Some(label) = c.begin_edit(&node_id) else {
			return;
		};
		show_label_input(&input, &c, &node_id, &label);
	};

	let context_kd = context.clone();
	let on_canvas_keydown = move |ev: KeyboardEvent| {
		if matches!(ev.key().as_str(), "Delete" | "Backspace") {
			ev.prevent_default();
			let mut c = context_kd.borrow_mut();
			c.delete_selection();
			counts.set(c.counts());
		}
	};

	let context_in = context.clone();
	let on_label_input = move |ev: leptos::ev::Event| {
		let value = event_target_value(&ev);
		let mut c = context_in.borrow_mut();
		if let Some((_, editor)) = c.editing.as_mut() {
			editor.input(&value);
		}
	};

	let context_lk = context.clone();
	let on_label_keydown = move |ev: KeyboardEvent| {
		let Some(end) = LabelEditor::end_for_key(&ev.key()) else {
			return;
		};
		ev.prevent_default();
		context_lk.borrow_mut().finish_edit(end);
		if let Some(input) = input_ref.get() {
			hide_label_input(&input.into());
		}
		if let Some(canvas) = canvas_ref.get() {
			let canvas: HtmlCanvasElement = canvas.into();
			let _ = canvas.focus();
		}
	};

	let context_blur = context.clone();
	let on_label_blur = move |_| {
		context_blur.borrow_mut().finish_edit(EditEnd::Blur);
		if let Some(input) = input_ref.get() {
			hide_label_input(&input.into());
		}
	};

	let context_zi = context.clone();
	let on_zoom_in = move |_: MouseEvent| {
		let mut c = context_zi.borrow_mut();
		let (min_k, max_k) = (c.config.min_zoom, c.config.max_zoom);
		c.state.zoom_by(ZOOM_STEP, min_k, max_k);
	};

	let context_zo = context.clone();
	let on_zoom_out = move |_: MouseEvent| {
		let mut c = context_zo.borrow_mut();
		let (min_k, max_k) = (c.config.min_zoom, c.config.max_zoom);
		c.state.zoom_by(1.0 / ZOOM_STEP, min_k, max_k);
	};

	let context_fit = context.clone();
	let on_fit = move |_: MouseEvent| {
		context_fit.borrow_mut().fit_view();
	};

	view! {
		<div class="flowchart-editor">
			<div class="flowchart-toolbar">
				<button on:click=on_add_node>"Add Node"</button>
				<button on:click=on_export>"Export as PNG"</button>
				<span class="flowchart-status">
					{move || {
						let (n, e) = counts.get();
						format!("{n} nodes, {e} edges")
					}}
				</span>
			</div>
			<div class="flowchart-viewport" style="position: relative; flex: 1; overflow: hidden;">
				<canvas
					node_ref=canvas_ref
					class="flowchart-canvas"
					tabindex="0"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					on:dblclick=on_dblclick
					on:keydown=on_canvas_keydown
					style="display: block; outline: none; cursor: default;"
				/>
				<input
					node_ref=input_ref
					class="flowchart-label-input"
					type="text"
					on:input=on_label_input
					on:keydown=on_label_keydown
					on:blur=on_label_blur
					style="display: none; position: absolute; box-sizing: border-box; text-align: center;"
				/>
				<div class="flowchart-controls">
					<button title="Zoom in" on:click=on_zoom_in>"+"</button>
					<button title="Zoom out" on:click=on_zoom_out>"-"</button>
					<button title="Fit view" on:click=on_fit>"Fit"</button>
				</div>
			</div>
		</div>
	}
}
