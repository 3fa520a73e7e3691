//! Visual theming for the flowchart canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color at opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Canvas style string: `#rrggbb` when opaque, `rgba(...)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas background.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Canvas fill.
	pub color: Color,
	/// Dot grid color.
	pub grid: Color,
	/// Dot radius in world units.
	pub grid_dot: f64,
}

/// Node box style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Box fill.
	pub fill: Color,
	/// Box outline.
	pub border: Color,
	/// Outline width in pixels.
	pub border_width: f64,
	/// Outline drawn around the selected node.
	pub selected_border: Color,
	/// Box corner radius in world units.
	pub corner_radius: f64,
	/// Label color.
	pub text: Color,
	/// Handle fill.
	pub handle: Color,
	/// Handle fill while a pointer or connection hovers it.
	pub handle_hover: Color,
}

/// Edge style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke color.
	pub color: Color,
	/// Stroke color of the selected edge.
	pub selected: Color,
	/// Radius of the rounded corners on smooth-step paths.
	pub corner_radius: f64,
	/// Dashed preview of a connection being dragged.
	pub preview: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas background and grid.
	pub background: BackgroundStyle,
	/// Node boxes, labels and handles.
	pub node: NodeStyle,
	/// Edges and the connection preview.
	pub edge: EdgeStyle,
}

impl Theme {
	/// Looks up a built-in theme by name.
	pub fn named(name: &str) -> Option<Self> {
		match name {
			"slate" => Some(Self::slate()),
			"paper" => Some(Self::paper()),
			_ => None,
		}
	}

	/// Dark slate theme (default)
	pub fn slate() -> Self {
		let accent = Color::rgb(99, 179, 237);
		Self {
			background: BackgroundStyle {
				color: Color::rgb(26, 32, 44),
				grid: Color::rgba(160, 174, 192, 0.25),
				grid_dot: 1.0,
			},
			node: NodeStyle {
				fill: Color::rgb(45, 55, 72),
				border: Color::rgb(113, 128, 150),
				border_width: 1.0,
				selected_border: accent,
				corner_radius: 6.0,
				text: Color::rgb(237, 242, 247),
				handle: Color::rgb(160, 174, 192),
				handle_hover: accent.lighten(0.3),
			},
			edge: EdgeStyle {
				color: Color::rgb(160, 174, 192),
				selected: accent,
				corner_radius: 5.0,
				preview: accent.with_alpha(0.8),
			},
		}
	}

	/// Light paper theme
	pub fn paper() -> Self {
		let accent = Color::rgb(49, 130, 206);
		Self {
			background: BackgroundStyle {
				color: Color::rgb(247, 250, 252),
				grid: Color::rgba(113, 128, 150, 0.35),
				grid_dot: 1.0,
			},
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				border: Color::rgb(26, 32, 44),
				border_width: 1.0,
				selected_border: accent,
				corner_radius: 3.0,
				text: Color::rgb(26, 32, 44),
				handle: Color::rgb(85, 85, 85),
				handle_hover: accent,
			},
			edge: EdgeStyle {
				color: Color::rgb(113, 128, 150),
				selected: accent,
				corner_radius: 5.0,
				preview: accent.with_alpha(0.8),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::slate()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::rgb(26, 32, 44).to_css(), "#1a202c");
		assert_eq!(
			Color::rgb(255, 0, 0).with_alpha(0.5).to_css(),
			"rgba(255, 0, 0, 0.5)"
		);
	}

	#[test]
	fn themes_resolve_by_name() {
		let paper = Theme::named("paper").unwrap();
		assert_eq!(paper.background.color.to_css(), "#f7fafc");
		assert_eq!(
			Theme::named("slate").unwrap().background.color,
			Theme::default().background.color
		);
		assert!(Theme::named("neon").is_none());
	}

	#[test]
	fn lighten_moves_towards_white() {
		assert_eq!(Color::rgb(0, 0, 0).lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::rgb(10, 20, 30).lighten(0.0), Color::rgb(10, 20, 30));
	}
}
