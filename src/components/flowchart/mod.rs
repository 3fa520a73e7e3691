//! Flowchart editor component.
//!
//! Renders an editable flowchart on an HTML canvas with:
//! - Nodes that can be added, dragged, relabelled inline and deleted
//! - Edges drawn by dragging from one node's handle to another's
//! - Pan, zoom and fit-view controls
//! - PNG export of the current view
//!
//! # Example
//!
//! ```ignore
//! use flowchart_canvas::{FlowchartData, FlowchartEditor};
//!
//! view! { <FlowchartEditor initial=FlowchartData::seed() fullscreen=true /> }
//! ```

mod component;
pub mod config;
pub mod editing;
pub mod export;
pub mod geometry;
mod render;
pub mod scale;
pub mod session;
pub mod state;
pub mod theme;
mod types;

pub use component::FlowchartEditor;
pub use config::{ExportOptions, FlowchartConfig};
pub use session::FlowchartSession;
pub use theme::Theme;
pub use types::{Edge, EdgeKind, FlowchartData, Node, NodeKind, Position};
