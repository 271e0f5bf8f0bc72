//! Coordination between the tree widgets of one form.
//!
//! A widget can observe other widgets: whenever an operation changes an
//! upstream widget's selection, every observer is asked to
//! [`Dependent::recompute`] against the current selections of all the
//! widgets it observes. An inverse-property tree observing the domain and
//! range trees is the typical case. Observation edges must form a DAG.

use std::collections::BTreeMap;

use vtree_core::NodeId;
use vtree_widgets::{CheckboxTreeSync, LoadRequest, LoadSummary, NodeDescriptor, ToggleOutcome};

use crate::error::{FormError, Result};
use crate::submit::{HiddenField, VALUES_SUFFIX, submission_fields};

/// A widget that derives its content from upstream selections.
pub trait Dependent {
    /// Re-derive state from `upstream` as `(field, selected values)` pairs.
    ///
    /// Returns the load the widget needs issued, if any.
    fn recompute(&mut self, upstream: &[(&str, &[NodeId])]) -> Option<LoadRequest>;
}

impl Dependent for CheckboxTreeSync {
    fn recompute(&mut self, upstream: &[(&str, &[NodeId])]) -> Option<LoadRequest> {
        let request = upstream
            .iter()
            .fold(self.reload(), |request, (field, values)| {
                request.with_context(&format!("{field}{VALUES_SUFFIX}"), values)
            });
        Some(request)
    }
}

/// Loads to issue after an operation, keyed by the field that needs them.
pub type Reloads = Vec<(String, LoadRequest)>;

/// Outcome of a toggle routed through the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Propagation {
    pub outcome: ToggleOutcome,
    pub reloads: Reloads,
}

/// Outcome of clearing a field through the coordinator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cleared {
    /// Whether the field had a non-empty selection.
    pub changed: bool,
    pub reloads: Reloads,
}

/// Named tree widgets of one form and the observation edges between them.
#[derive(Debug, Clone, Default)]
pub struct FormCoordinator {
    widgets: BTreeMap<String, CheckboxTreeSync>,
    /// upstream -> observers
    observers: BTreeMap<String, Vec<String>>,
}

impl FormCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a widget under a field name.
    pub fn register(&mut self, field: impl Into<String>, tree: CheckboxTreeSync) -> Result<()> {
        let field = field.into();
        if self.widgets.contains_key(&field) {
            return Err(FormError::DuplicateField { field });
        }
        self.widgets.insert(field, tree);
        Ok(())
    }

    /// Make `downstream` observe `upstream`.
    pub fn observe(&mut self, upstream: &str, downstream: &str) -> Result<()> {
        for field in [upstream, downstream] {
            if !self.widgets.contains_key(field) {
                return Err(FormError::unknown(field));
            }
        }
        if upstream == downstream || self.reaches(downstream, upstream) {
            return Err(FormError::DependencyCycle {
                upstream: upstream.to_owned(),
                downstream: downstream.to_owned(),
            });
        }
        let observers = self.observers.entry(upstream.to_owned()).or_default();
        if !observers.iter().any(|o| o == downstream) {
            observers.push(downstream.to_owned());
        }
        Ok(())
    }

    fn reaches(&self, from: &str, to: &str) -> bool {
        let mut stack = vec![from];
        let mut visited = Vec::new();
        while let Some(field) = stack.pop() {
            if field == to {
                return true;
            }
            if visited.contains(&field) {
                continue;
            }
            visited.push(field);
            if let Some(next) = self.observers.get(field) {
                stack.extend(next.iter().map(String::as_str));
            }
        }
        false
    }

    #[must_use]
    pub fn widget(&self, field: &str) -> Option<&CheckboxTreeSync> {
        self.widgets.get(field)
    }

    /// Registered field names in order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.widgets.keys().map(String::as_str)
    }

    /// Fields observed by `downstream`, in field-name order.
    #[must_use]
    pub fn upstreams_of(&self, downstream: &str) -> Vec<&str> {
        self.observers
            .iter()
            .filter(|(_, observers)| observers.iter().any(|o| o == downstream))
            .map(|(upstream, _)| upstream.as_str())
            .collect()
    }

    fn widget_mut(&mut self, field: &str) -> Result<&mut CheckboxTreeSync> {
        self.widgets
            .get_mut(field)
            .ok_or_else(|| FormError::unknown(field))
    }

    /// Start loading the children of `node` in `field`.
    pub fn begin_load(&mut self, field: &str, node: &str) -> Result<LoadRequest> {
        self.widget_mut(field)?
            .begin_load(node)
            .map_err(|source| FormError::tree(field, source))
    }

    /// Deliver loaded children to `field`.
    pub fn on_subtree_loaded(
        &mut self,
        field: &str,
        parent: &str,
        children: Vec<NodeDescriptor>,
    ) -> Result<LoadSummary> {
        self.widget_mut(field)?
            .on_subtree_loaded(parent, children)
            .map_err(|source| FormError::tree(field, source))
    }

    /// Toggle `node` in `field`; observers recompute when the selection
    /// changed.
    pub fn toggle(&mut self, field: &str, node: &str, checked: bool) -> Result<Propagation> {
        let outcome = self
            .widget_mut(field)?
            .on_toggle(node, checked)
            .map_err(|source| FormError::tree(field, source))?;
        let reloads = if outcome.changed() {
            self.notify(field)
        } else {
            Vec::new()
        };
        Ok(Propagation { outcome, reloads })
    }

    /// Clear `field`; observers recompute when the selection changed.
    pub fn clear(&mut self, field: &str) -> Result<Cleared> {
        let changed = self.widget_mut(field)?.clear_values();
        let reloads = if changed { self.notify(field) } else { Vec::new() };
        Ok(Cleared { changed, reloads })
    }

    /// Recompute every observer of `field` regardless of changes.
    ///
    /// Used once after wiring so observers start from the upstream state.
    pub fn prime(&mut self, field: &str) -> Result<Reloads> {
        if !self.widgets.contains_key(field) {
            return Err(FormError::unknown(field));
        }
        Ok(self.notify(field))
    }

    fn notify(&mut self, upstream: &str) -> Reloads {
        let observers = self.observers.get(upstream).cloned().unwrap_or_default();
        let mut reloads = Vec::new();
        for downstream in observers {
            let inputs: Vec<(String, Vec<NodeId>)> = self
                .upstreams_of(&downstream)
                .into_iter()
                .filter_map(|field| {
                    self.widgets
                        .get(field)
                        .map(|tree| (field.to_owned(), tree.selected_values().to_vec()))
                })
                .collect();
            let borrowed: Vec<(&str, &[NodeId])> = inputs
                .iter()
                .map(|(field, values)| (field.as_str(), values.as_slice()))
                .collect();

            let Some(tree) = self.widgets.get_mut(&downstream) else {
                continue;
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(
                message = "form.recompute",
                upstream,
                downstream = downstream.as_str(),
                inputs = borrowed.len()
            );

            if let Some(request) = tree.recompute(&borrowed) {
                reloads.push((downstream.clone(), request));
            }
        }
        reloads
    }

    /// Hidden fields carrying every widget's selection.
    #[must_use]
    pub fn submission(&self) -> Vec<HiddenField> {
        submission_fields(
            self.widgets
                .iter()
                .map(|(field, tree)| (field.as_str(), tree.selected_values())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(id: &str) -> NodeDescriptor {
        NodeDescriptor::new(id, id)
    }

    fn loaded(url: &str, children: Vec<NodeDescriptor>) -> CheckboxTreeSync {
        let mut tree = CheckboxTreeSync::new(url);
        tree.on_subtree_loaded("root", children).unwrap();
        tree
    }

    fn property_form() -> FormCoordinator {
        let mut form = FormCoordinator::new();
        form.register("field_domain", loaded("/domain", vec![d("ex:Agent"), d("ex:Doc")]))
            .unwrap();
        form.register("field_range", loaded("/range", vec![d("ex:Agent"), d("ex:Doc")]))
            .unwrap();
        form.register("field_inverse", loaded("/inverse", vec![d("ex:knows")]))
            .unwrap();
        form.observe("field_domain", "field_inverse").unwrap();
        form.observe("field_range", "field_inverse").unwrap();
        form
    }

    #[test]
    fn toggle_recomputes_observers_with_all_upstreams() {
        let mut form = property_form();
        form.toggle("field_range", "ex:Doc", true).unwrap();
        let propagation = form.toggle("field_domain", "ex:Agent", true).unwrap();

        assert!(propagation.outcome.changed());
        assert_eq!(propagation.reloads.len(), 1);
        let (field, request) = &propagation.reloads[0];
        assert_eq!(field, "field_inverse");
        assert_eq!(request.url, "/inverse");
        assert_eq!(
            request.context,
            vec![
                ("field_domain_values[0]".to_owned(), "ex:Agent".to_owned()),
                ("field_range_values[0]".to_owned(), "ex:Doc".to_owned()),
            ]
        );
        assert!(!form.widget("field_inverse").unwrap().is_enabled());
    }

    #[test]
    fn unchanged_selection_does_not_notify() {
        let mut form = property_form();
        form.toggle("field_domain", "ex:Agent", true).unwrap();
        form.on_subtree_loaded("field_inverse", "root", vec![d("ex:knows")])
            .unwrap();
        let propagation = form.toggle("field_domain", "ex:Agent", true).unwrap();
        assert!(!propagation.outcome.changed());
        assert!(propagation.reloads.is_empty());
    }

    #[test]
    fn clear_notifies_only_when_something_was_selected() {
        let mut form = property_form();
        let idle = form.clear("field_range").unwrap();
        assert!(!idle.changed);
        assert!(idle.reloads.is_empty());

        form.toggle("field_range", "ex:Doc", true).unwrap();
        let cleared = form.clear("field_range").unwrap();
        assert!(cleared.changed);
        assert_eq!(cleared.reloads.len(), 1);
        assert!(!form.clear("field_range").unwrap().changed);
    }

    #[test]
    fn prime_recomputes_without_changes() {
        let mut form = property_form();
        let reloads = form.prime("field_domain").unwrap();
        assert_eq!(reloads.len(), 1);
        assert!(reloads[0].1.context.is_empty());
    }

    #[test]
    fn observe_rejects_cycles_and_unknown_fields() {
        let mut form = property_form();
        assert!(matches!(
            form.observe("field_inverse", "field_domain"),
            Err(FormError::DependencyCycle { .. })
        ));
        assert!(matches!(
            form.observe("field_domain", "field_domain"),
            Err(FormError::DependencyCycle { .. })
        ));
        assert!(matches!(
            form.observe("field_domain", "nope"),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut form = property_form();
        assert!(matches!(
            form.register("field_domain", CheckboxTreeSync::new("/x")),
            Err(FormError::DuplicateField { .. })
        ));
    }

    #[test]
    fn tree_errors_carry_field_name() {
        let mut form = property_form();
        let err = form.toggle("field_domain", "ex:Missing", true).unwrap_err();
        assert!(matches!(err, FormError::Tree { ref field, .. } if field == "field_domain"));
        assert!(matches!(
            form.toggle("nope", "x", true),
            Err(FormError::UnknownField { .. })
        ));
    }

    #[test]
    fn submission_covers_every_field() {
        let mut form = property_form();
        form.toggle("field_domain", "ex:Agent", true).unwrap();
        form.toggle("field_range", "ex:Doc", true).unwrap();
        form.toggle("field_range", "ex:Agent", true).unwrap();
        let names: Vec<(String, String)> = form
            .submission()
            .into_iter()
            .map(|f| (f.name, f.value))
            .collect();
        assert_eq!(
            names,
            vec![
                ("field_domain_values[0]".to_owned(), "ex:Agent".to_owned()),
                ("field_range_values[0]".to_owned(), "ex:Doc".to_owned()),
                ("field_range_values[1]".to_owned(), "ex:Agent".to_owned()),
            ]
        );
    }
}
