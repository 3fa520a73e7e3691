//! Zoom-dependent sizes for canvas chrome.
//!
//! Node boxes live in world space and simply scale with the view. Strokes,
//! handles and hit targets need to stay usable at any zoom, so their sizes are
//! resolved here once per frame.
//!
//! - [`ScaleBehavior::World`]: scales with zoom.
//! - [`ScaleBehavior::Screen`]: constant pixel size.
//! - [`ScaleBehavior::Clamped`]: world size, clamped to a screen-size range.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "World variant completes the API for users customizing ScaleConfig"
)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size, in pixels.
		min_screen: f64,
		/// Largest on-screen size, in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value to draw with, after the canvas transform is applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Scale configuration for all canvas chrome.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Edge stroke width in pixels.
	pub edge_width: f64,
	/// Radius of node handles.
	pub handle_radius: f64,
	/// How the handle radius follows zoom.
	pub handle_behavior: ScaleBehavior,
	/// Extra pick distance around handles and edges, in pixels.
	pub hit_slop: f64,
	/// Label font size in world units.
	pub label_size: f64,
	/// How the label size follows zoom.
	pub label_behavior: ScaleBehavior,
	/// Selection outline width in pixels.
	pub selection_width: f64,
	/// Background dot spacing in world units.
	pub grid_gap: f64,
	/// Below this zoom the background dots are skipped.
	pub grid_min_k: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			edge_width: 1.5,
			handle_radius: 4.0,
			handle_behavior: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: 8.0,
			},
			hit_slop: 6.0,
			label_size: 14.0,
			label_behavior: ScaleBehavior::Clamped {
				min_screen: 6.0,
				max_screen: f64::INFINITY,
			},
			selection_width: 2.0,
			grid_gap: 20.0,
			grid_min_k: 0.4,
		}
	}
}

/// Scale values resolved for one zoom level. Sizes are in world space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom factor these values were resolved for.
	pub k: f64,
	/// Edge stroke width.
	pub edge_width: f64,
	/// Drawn handle radius.
	pub handle_radius: f64,
	/// Pick radius for handles.
	pub handle_hit_radius: f64,
	/// Pick distance for edges.
	pub edge_hit_distance: f64,
	/// Label font size; multiply by `k` for CSS pixels.
	pub label_size: f64,
	/// Canvas font string, e.g. `"14px sans-serif"`.
	pub label_font: String,
	/// Selection outline width.
	pub selection_width: f64,
	/// Whether the dot grid is drawn at this zoom.
	pub show_grid: bool,
}

impl ScaledValues {
	/// Resolves every size in `config` for zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let handle_radius = config.handle_behavior.apply(config.handle_radius, k);
		let slop = ScaleBehavior::Screen.apply(config.hit_slop, k);
		let label_size = config.label_behavior.apply(config.label_size, k);

		Self {
			k,
			edge_width: ScaleBehavior::Screen.apply(config.edge_width, k),
			handle_radius,
			handle_hit_radius: handle_radius + slop,
			edge_hit_distance: slop,
			label_size,
			label_font: format!("{label_size}px sans-serif"),
			selection_width: ScaleBehavior::Screen.apply(config.selection_width, k),
			show_grid: k >= config.grid_min_k,
		}
	}
}
