#![forbid(unsafe_code)]

//! Checkbox tree widgets bound to hierarchical vocabulary data.

pub mod checkbox_tree;
pub mod loader;
pub mod selected_set;

pub use checkbox_tree::{CheckState, CheckboxTreeSync, LoadSummary, Node, ToggleOutcome};
pub use loader::{LoadRequest, NodeDescriptor};
pub use selected_set::SelectedSet;
