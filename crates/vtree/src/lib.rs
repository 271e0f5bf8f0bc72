#![forbid(unsafe_code)]

//! vtree public facade crate.
//!
//! Re-exports the common surface of the internal crates and offers a
//! lightweight prelude.

// --- Core re-exports -------------------------------------------------------

pub use vtree_core::{FieldConfig, NodeId, PageSettings, SettingsError, TreeError};

// --- Widget re-exports -----------------------------------------------------

pub use vtree_widgets::{
    CheckState, CheckboxTreeSync, LoadRequest, LoadSummary, Node, NodeDescriptor, SelectedSet,
    ToggleOutcome,
};

// --- Form re-exports -------------------------------------------------------

pub use vtree_form::{
    Cleared, FormCoordinator, FormError, FormSession, HiddenField, ModeChange, NamespaceChoice,
    Propagation, ResourceType, Visibility,
};

pub mod prelude {
    pub use crate::{
        CheckboxTreeSync, FormCoordinator, FormError, FormSession, NodeDescriptor, NodeId,
        PageSettings, ResourceType, SelectedSet, ToggleOutcome, TreeError,
    };

    pub use crate::{core, form, widgets};
}

pub use vtree_core as core;
pub use vtree_form as form;
pub use vtree_widgets as widgets;
