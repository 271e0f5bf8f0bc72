#![forbid(unsafe_code)]

//! Form glue around checkbox tree widgets: bootstrapping from page
//! settings, submission fields, section visibility, and dependent widgets.

pub mod coordinator;
pub mod error;
pub mod session;
pub mod submit;
pub mod visibility;

pub use coordinator::{Cleared, Dependent, FormCoordinator, Propagation, Reloads};
pub use error::{FormError, Result};
pub use session::{FormSession, ModeChange};
pub use submit::{HiddenField, encode_fields, hidden_fields, submission_fields};
pub use visibility::{NamespaceChoice, ResourceType, Visibility};
