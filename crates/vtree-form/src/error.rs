use thiserror::Error;
use vtree_core::{SettingsError, TreeError};

pub type Result<T> = std::result::Result<T, FormError>;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("field `{field}`: {source}")]
    Tree {
        field: String,
        #[source]
        source: TreeError,
    },

    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("field `{field}` is already registered")]
    DuplicateField { field: String },

    #[error("`{downstream}` observing `{upstream}` would form a cycle")]
    DependencyCycle { upstream: String, downstream: String },
}

impl FormError {
    #[must_use]
    pub fn tree(field: impl Into<String>, source: TreeError) -> Self {
        Self::Tree {
            field: field.into(),
            source,
        }
    }

    #[must_use]
    pub fn unknown(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}
