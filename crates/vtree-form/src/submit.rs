//! Submission glue: turns selected sets into hidden form fields.
//!
//! The server reads each tree field back as an ordered list under
//! `<field>_values`, so every selected identifier becomes one hidden input
//! named `<field>_values[<index>]`.

use serde::Serialize;
use url::form_urlencoded;
use vtree_core::NodeId;
use vtree_widgets::LoadRequest;

/// Suffix appended to a field name to form the submitted array name.
pub const VALUES_SUFFIX: &str = "_values";

/// One hidden input appended to the form at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

/// One hidden field per element of `values`, named `<name>[<index>]`.
#[must_use]
pub fn hidden_fields(name: &str, values: &[NodeId]) -> Vec<HiddenField> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| HiddenField {
            name: format!("{name}[{index}]"),
            value: value.to_string(),
        })
        .collect()
}

/// Hidden fields for every `(field, values)` pair, using the
/// `<field>_values[<index>]` convention.
#[must_use]
pub fn submission_fields<'a, I>(fields: I) -> Vec<HiddenField>
where
    I: IntoIterator<Item = (&'a str, &'a [NodeId])>,
{
    let mut out = Vec::new();
    for (field, values) in fields {
        let fields = hidden_fields(&format!("{field}{VALUES_SUFFIX}"), values);

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "form.serialize", field, count = fields.len());

        out.extend(fields);
    }
    out
}

/// Encode hidden fields as an `application/x-www-form-urlencoded` body.
#[must_use]
pub fn encode_fields(fields: &[HiddenField]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter().map(|field| (&field.name, &field.value)))
        .finish()
}

/// Encode a subtree load request as an `application/x-www-form-urlencoded`
/// body.
#[must_use]
pub fn encode_load_request(request: &LoadRequest) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(request.params())
        .finish()
}
