#![forbid(unsafe_code)]

//! Core: node identifiers, structural errors, and page settings decoding.

pub mod error;
pub mod id;
pub mod settings;

pub use error::TreeError;
pub use id::NodeId;
pub use settings::{FieldConfig, PageSettings, SettingsError};
