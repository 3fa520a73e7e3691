//! PNG export of the flowchart canvas.
//!
//! [`export_png`] only orchestrates: a [`RasterSurface`] produces the PNG data
//! URL and a [`DownloadSink`] hands it to the user. The browser
//! implementations are [`CanvasSurface`] and [`BrowserDownload`].

use log::info;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

use super::config::ExportOptions;
use super::render::{self, RenderMode};
use super::scale::ScaleConfig;
use super::session::FlowchartSession;
use super::state::FlowchartState;
use super::theme::Theme;

/// Export failure. Logged by the caller; never shown to the user.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExportError {
	/// The canvas could not produce a data URL.
	#[error("failed to rasterize canvas: {0}")]
	Rasterize(String),
	/// The download element could not be created or clicked.
	#[error("failed to start download: {0}")]
	Download(String),
}

/// Outcome of an export request that did not fail.
#[derive(Debug, PartialEq, Eq)]
pub enum ExportOutcome {
	/// The canvas was not mounted; nothing happened.
	NoCanvas,
	/// One download was triggered.
	Downloaded,
}

/// Something that can be rasterized to a PNG data URL.
pub trait RasterSurface {
	/// Paints the chart over `background` and returns a `data:image/png` URL.
	fn rasterize_png(&self, background: &str) -> Result<String, ExportError>;
}

/// Offers a URL to the user as a file download.
pub trait DownloadSink {
	/// Starts a download of `href` saved as `filename`.
	fn download(&self, href: &str, filename: &str) -> Result<(), ExportError>;
}

/// Rasterizes `surface` and downloads the result under the configured name.
pub fn export_png<S, D>(
	surface: Option<&S>,
	sink: &D,
	options: &ExportOptions,
) -> Result<ExportOutcome, ExportError>
where
	S: RasterSurface + ?Sized,
	D: DownloadSink + ?Sized,
{
	let Some(surface) = surface else {
		return Ok(ExportOutcome::NoCanvas);
	};
	let data_url = surface.rasterize_png(&options.background)?;
	sink.download(&data_url, &options.filename)?;
	info!(
		"flowchart: exported {} ({} bytes encoded)",
		options.filename,
		data_url.len()
	);
	Ok(ExportOutcome::Downloaded)
}

fn js_error(value: JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// The live editor canvas, repainted without interactive chrome for export.
pub struct CanvasSurface<'a> {
	/// Canvas the editor draws on.
	pub canvas: &'a HtmlCanvasElement,
	/// Its 2D context.
	pub ctx: &'a CanvasRenderingContext2d,
	/// Chart to paint.
	pub session: &'a FlowchartSession,
	/// Current view, kept for the export.
	pub state: &'a FlowchartState,
	/// Zoom-dependent sizes.
	pub scale: &'a ScaleConfig,
	/// Node and edge colors.
	pub theme: &'a Theme,
}

impl RasterSurface for CanvasSurface<'_> {
	fn rasterize_png(&self, background: &str) -> Result<String, ExportError> {
		render::render(
			self.session,
			self.state,
			self.ctx,
			self.scale,
			self.theme,
			RenderMode::Export { background },
		);
		// The next animation frame restores the interactive rendering.
		self.canvas
			.to_data_url_with_type("image/png")
			.map_err(|e| ExportError::Rasterize(js_error(e)))
	}
}

/// Triggers a download through a temporary `<a download>` element.
pub struct BrowserDownload;

impl DownloadSink for BrowserDownload {
	fn download(&self, href: &str, filename: &str) -> Result<(), ExportError> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| ExportError::Download("no document".to_string()))?;
		let anchor: HtmlAnchorElement = document
			.create_element("a")
			.map_err(|e| ExportError::Download(js_error(e)))?
			.dyn_into()
			.map_err(|_| ExportError::Download("`a` is not an anchor element".to_string()))?;
		anchor.set_href(href);
		anchor.set_download(filename);

		// Firefox ignores clicks on detached anchors.
		let body = document.body();
		if let Some(ref body) = body {
			body.append_child(&anchor)
				.map_err(|e| ExportError::Download(js_error(e)))?;
		}
		anchor.click();
		if body.is_some() {
			anchor.remove();
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;

	struct FakeSurface {
		result: Result<String, ExportError>,
		backgrounds: RefCell<Vec<String>>,
	}

	impl FakeSurface {
		fn ok() -> Self {
			Self {
				result: Ok("data:image/png;base64,AAAA".to_string()),
				backgrounds: RefCell::new(Vec::new()),
			}
		}
	}

	impl RasterSurface for FakeSurface {
		fn rasterize_png(&self, background: &str) -> Result<String, ExportError> {
			self.backgrounds.borrow_mut().push(background.to_string());
			self.result.clone()
		}
	}

	#[derive(Default)]
	struct RecordingSink {
		downloads: RefCell<Vec<(String, String)>>,
	}

	impl DownloadSink for RecordingSink {
		fn download(&self, href: &str, filename: &str) -> Result<(), ExportError> {
			self.downloads
				.borrow_mut()
				.push((href.to_string(), filename.to_string()));
			Ok(())
		}
	}

	#[test]
	fn missing_canvas_is_a_silent_noop() {
		let sink = RecordingSink::default();
		let outcome = export_png::<FakeSurface, _>(None, &sink, &ExportOptions::default());
		assert_eq!(outcome, Ok(ExportOutcome::NoCanvas));
		assert!(sink.downloads.borrow().is_empty());
	}

	#[test]
	fn success_downloads_once_with_fixed_name() {
		let surface = FakeSurface::ok();
		let sink = RecordingSink::default();
		let outcome = export_png(Some(&surface), &sink, &ExportOptions::default());

		assert_eq!(outcome, Ok(ExportOutcome::Downloaded));
		let downloads = sink.downloads.borrow();
		assert_eq!(downloads.len(), 1);
		assert_eq!(downloads[0].0, "data:image/png;base64,AAAA");
		assert_eq!(downloads[0].1, "flowchart.png");
	}

	#[test]
	fn rasterizes_over_dark_background() {
		let surface = FakeSurface::ok();
		let sink = RecordingSink::default();
		export_png(Some(&surface), &sink, &ExportOptions::default()).unwrap();
		assert_eq!(*surface.backgrounds.borrow(), vec!["#1a202c".to_string()]);
	}

	#[test]
	fn rasterize_failure_skips_download() {
		let surface = FakeSurface {
			result: Err(ExportError::Rasterize("tainted canvas".to_string())),
			backgrounds: RefCell::new(Vec::new()),
		};
		let sink = RecordingSink::default();
		let outcome = export_png(Some(&surface), &sink, &ExportOptions::default());

		assert_eq!(
			outcome,
			Err(ExportError::Rasterize("tainted canvas".to_string()))
		);
		assert!(sink.downloads.borrow().is_empty());
	}
}
