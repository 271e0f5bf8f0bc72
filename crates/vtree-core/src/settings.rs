//! Page settings decoding.
//!
//! The hosting page injects one settings object per form. Each tree-backed
//! field contributes three entries keyed by field name:
//!
//! - `field_values`: the previously submitted selection, usually as a
//!   JSON-encoded array inside a string (`"[\"a\",\"b\"]"`);
//! - `json_url`: the endpoint that serves child nodes for lazy loading;
//! - `field_id`: the element the tree is rendered into.
//!
//! [`PageSettings::fields`] validates the three maps and yields one
//! [`FieldConfig`] per field, in field-name order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::NodeId;

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Failure while decoding page settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed initial values for field `{field}`: {source}")]
    FieldValues {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("field `{field}` has no `{key}` entry")]
    MissingField { field: String, key: &'static str },
}

/// Previously selected identifiers as delivered by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValues {
    /// A JSON array encoded inside a string.
    Encoded(String),
    /// An already decoded array.
    Decoded(Vec<NodeId>),
    /// `null`, sent for fields that were never submitted.
    Absent,
}

impl RawValues {
    fn decode(&self, field: &str) -> Result<Vec<NodeId>> {
        match self {
            Self::Decoded(values) => Ok(values.clone()),
            Self::Absent => Ok(Vec::new()),
            Self::Encoded(text) if text.trim().is_empty() => Ok(Vec::new()),
            Self::Encoded(text) => {
                serde_json::from_str(text).map_err(|source| SettingsError::FieldValues {
                    field: field.to_owned(),
                    source,
                })
            }
        }
    }
}

/// Settings object injected by the page, one entry per field and map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default)]
    pub field_values: BTreeMap<String, RawValues>,
    #[serde(default)]
    pub json_url: BTreeMap<String, String>,
    #[serde(default)]
    pub field_id: BTreeMap<String, String>,
}

/// Validated configuration for one tree-backed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldConfig {
    /// Form field name; submitted values use `<name>_values[<i>]`.
    pub name: String,
    /// Endpoint serving child nodes.
    pub data_url: String,
    /// Element the widget renders into, if the page named one.
    pub render_target: Option<String>,
    /// Selection restored from the previous submission.
    pub initial_values: Vec<NodeId>,
}

impl PageSettings {
    /// Parse the settings object from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode every field that carries initial values.
    ///
    /// Fields without a `json_url` cannot lazily load and are rejected.
    pub fn fields(&self) -> Result<Vec<FieldConfig>> {
        self.field_values
            .keys()
            .map(|name| self.field(name))
            .collect()
    }

    /// Decode a single field by name.
    pub fn field(&self, name: &str) -> Result<FieldConfig> {
        let raw = self
            .field_values
            .get(name)
            .ok_or_else(|| SettingsError::MissingField {
                field: name.to_owned(),
                key: "field_values",
            })?;
        let data_url = self
            .json_url
            .get(name)
            .cloned()
            .ok_or_else(|| SettingsError::MissingField {
                field: name.to_owned(),
                key: "json_url",
            })?;
        Ok(FieldConfig {
            name: name.to_owned(),
            data_url,
            render_target: self.field_id.get(name).cloned(),
            initial_values: raw.decode(name)?,
        })
    }
}
