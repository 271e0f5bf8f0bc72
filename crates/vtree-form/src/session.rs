//! One form instance: widgets bootstrapped from page settings plus the
//! range-mode controls that can invalidate the range tree.

use vtree_core::PageSettings;
use vtree_widgets::CheckboxTreeSync;

use crate::coordinator::{FormCoordinator, Reloads};
use crate::error::{FormError, Result};
use crate::submit::{HiddenField, encode_fields};
use crate::visibility::{ResourceType, Visibility};

/// Widgets and mode state of one form.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    coordinator: FormCoordinator,
    range_field: Option<String>,
    resource_type: Option<ResourceType>,
}

/// Result of switching the resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChange {
    pub visibility: Visibility,
    /// Whether the range tree's selection was cleared.
    pub cleared_range: bool,
    pub reloads: Reloads,
}

impl FormSession {
    /// Create one widget per configured field, seeded with its previous
    /// selection.
    pub fn from_settings(settings: &PageSettings) -> Result<Self> {
        let mut coordinator = FormCoordinator::new();
        for field in settings.fields()? {
            coordinator.register(field.name.clone(), CheckboxTreeSync::from_field(&field))?;
        }
        Ok(Self {
            coordinator,
            range_field: None,
            resource_type: None,
        })
    }

    /// Parse page settings JSON and bootstrap from it.
    pub fn from_settings_json(json: &str) -> Result<Self> {
        Self::from_settings(&PageSettings::from_json(json)?)
    }

    /// Name the field whose tree picks a class range.
    pub fn with_range_field(mut self, field: impl Into<String>) -> Result<Self> {
        let field = field.into();
        if self.coordinator.widget(&field).is_none() {
            return Err(FormError::unknown(field));
        }
        self.range_field = Some(field);
        Ok(self)
    }

    #[must_use]
    pub fn coordinator(&self) -> &FormCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut FormCoordinator {
        &mut self.coordinator
    }

    #[must_use]
    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type
    }

    /// Apply a resource-type radio selection.
    ///
    /// Modes that hide the class range tree clear its selection.
    pub fn set_resource_type(&mut self, mode: ResourceType) -> Result<ModeChange> {
        self.resource_type = Some(mode);
        let visibility = mode.visibility();
        let mut cleared_range = false;
        let mut reloads = Vec::new();
        if visibility.clears_range()
            && let Some(field) = self.range_field.as_deref()
        {
            let cleared = self.coordinator.clear(field)?;
            cleared_range = cleared.changed;
            reloads = cleared.reloads;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "form.visibility",
            mode = mode.radio_value(),
            datatypes = visibility.datatypes,
            class_range = visibility.class_range,
            cleared_range
        );

        Ok(ModeChange {
            visibility,
            cleared_range,
            reloads,
        })
    }

    /// Hidden fields to append to the form at submit time.
    #[must_use]
    pub fn submission(&self) -> Vec<HiddenField> {
        self.coordinator.submission()
    }

    /// The submission as an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn submission_body(&self) -> String {
        encode_fields(&self.submission())
    }
}
