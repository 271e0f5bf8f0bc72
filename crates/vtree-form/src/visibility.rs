//! Radio- and checkbox-driven visibility of form sections.
//!
//! These are pure functions of the control state; the caller applies the
//! resulting [`Visibility`] to its sections and, when
//! [`Visibility::clears_range`] is set, clears the range tree.

use serde::{Deserialize, Serialize};

/// What a property's range may hold, chosen with a radio group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Another resource: the range is picked from the class tree.
    Resource,
    /// A literal (string, number, date, ...): the range is a datatype.
    Literal,
    /// Either; no range is picked.
    Either,
}

impl ResourceType {
    /// Decode the radio value (`"1"`, `"2"` or `"3"`).
    #[must_use]
    pub fn from_radio(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(Self::Resource),
            "2" => Some(Self::Literal),
            "3" => Some(Self::Either),
            _ => None,
        }
    }

    /// Radio value for this mode.
    #[must_use]
    pub const fn radio_value(self) -> &'static str {
        match self {
            Self::Resource => "1",
            Self::Literal => "2",
            Self::Either => "3",
        }
    }

    /// Section visibility for this mode.
    #[must_use]
    pub const fn visibility(self) -> Visibility {
        match self {
            Self::Resource => Visibility {
                datatypes: false,
                class_range: true,
            },
            Self::Literal => Visibility {
                datatypes: true,
                class_range: false,
            },
            Self::Either => Visibility {
                datatypes: false,
                class_range: false,
            },
        }
    }
}

/// Which range sections are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    /// The datatype picker.
    pub datatypes: bool,
    /// The class range tree.
    pub class_range: bool,
}

impl Visibility {
    /// A hidden range tree no longer applies; its selection must be cleared.
    #[must_use]
    pub const fn clears_range(self) -> bool {
        !self.class_range
    }
}

/// The range field is hidden while "literal as range" is ticked.
#[must_use]
pub const fn range_field_visible(literal_as_range: bool) -> bool {
    !literal_as_range
}

/// Namespace mode of a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamespaceChoice {
    /// Namespace derived from the vocabulary prefix.
    #[default]
    Default,
    /// Namespace typed by the user.
    Custom,
}

impl NamespaceChoice {
    /// The custom namespace input only accepts text in custom mode.
    #[must_use]
    pub const fn custom_input_enabled(self) -> bool {
        matches!(self, Self::Custom)
    }
}

/// Placeholder shown in the namespace preview while the prefix is empty.
pub const PREFIX_PLACEHOLDER: &str = "vocabulary-id";

/// Text of the default-namespace preview for the current prefix input.
///
/// Returns `None` when the placeholder should be shown instead.
#[must_use]
pub fn namespace_preview(prefix: &str) -> Option<&str> {
    let prefix = prefix.trim();
    (!prefix.is_empty()).then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_values_round_trip() {
        for mode in [ResourceType::Resource, ResourceType::Literal, ResourceType::Either] {
            assert_eq!(ResourceType::from_radio(mode.radio_value()), Some(mode));
        }
        assert_eq!(ResourceType::from_radio("4"), None);
        assert_eq!(ResourceType::from_radio(""), None);
    }

    #[test]
    fn resource_shows_class_tree_only() {
        let v = ResourceType::Resource.visibility();
        assert!(v.class_range);
        assert!(!v.datatypes);
        assert!(!v.clears_range());
    }

    #[test]
    fn literal_shows_datatypes_and_clears_range() {
        let v = ResourceType::Literal.visibility();
        assert!(v.datatypes);
        assert!(!v.class_range);
        assert!(v.clears_range());
    }

    #[test]
    fn either_hides_both() {
        let v = ResourceType::Either.visibility();
        assert!(!v.datatypes && !v.class_range);
        assert!(v.clears_range());
    }

    #[test]
    fn literal_as_range_hides_range_field() {
        assert!(!range_field_visible(true));
        assert!(range_field_visible(false));
    }

    #[test]
    fn custom_namespace_input_follows_choice() {
        assert!(!NamespaceChoice::default().custom_input_enabled());
        assert!(NamespaceChoice::Custom.custom_input_enabled());
    }

    #[test]
    fn namespace_preview_falls_back_to_placeholder() {
        assert_eq!(namespace_preview(" foaf "), Some("foaf"));
        assert_eq!(namespace_preview("   "), None);
    }
}
