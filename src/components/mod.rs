//! UI components.

pub mod flowchart;
