//! Checkbox tree kept in sync with a [`SelectedSet`].
//!
//! The tree is materialized lazily: only the root exists at first, and each
//! [`CheckboxTreeSync::on_subtree_loaded`] call attaches the children an
//! endpoint returned for one node. The selected set is the authoritative
//! value of the field; node check marks are derived from it and from check
//! cascades.
//!
//! Three triggers mutate the pair:
//!
//! - a subtree load, which checks every newly materialized node whose
//!   identifier is already selected and reveals it;
//! - a user toggle, which records or removes the node and cascades the new
//!   state to all descendants;
//! - [`CheckboxTreeSync::clear_values`], which empties both.
//!
//! # Check provenance
//!
//! A checked node is in one of three [`CheckState`]s. `Selected` nodes are
//! exactly the materialized nodes whose identifier is in the set.
//! `Inherited` nodes were checked by an ancestor's cascade. `Detached` nodes
//! were checked by the user while their parent was neither the root nor
//! checked; such checks are not recorded in the set.
//!
//! # Example
//!
//! ```
//! use vtree_widgets::checkbox_tree::CheckboxTreeSync;
//! use vtree_widgets::loader::NodeDescriptor;
//!
//! let mut tree = CheckboxTreeSync::new("/json/classes");
//! tree.on_subtree_loaded(
//!     "root",
//!     vec![NodeDescriptor::new("a", "A").child(NodeDescriptor::new("a1", "A1"))],
//! )
//! .unwrap();
//!
//! tree.on_toggle("a", true).unwrap();
//! assert_eq!(tree.selected_values(), ["a"]);
//! assert!(tree.node("a1").unwrap().is_checked());
//! ```

use ahash::{AHashMap, AHashSet};
use vtree_core::{FieldConfig, NodeId, TreeError};

use crate::loader::{LoadRequest, NodeDescriptor};
use crate::selected_set::SelectedSet;

/// Identifier given to the root when none is configured.
pub const DEFAULT_ROOT_ID: &str = "root";
/// Label given to the root when none is configured.
pub const DEFAULT_ROOT_LABEL: &str = "Thing / Superclass";
/// Node class whose checkbox stays enabled under a checked ancestor.
pub const DEFAULT_COMPLETE_CLASS: &str = "complete";

pub type Result<T> = std::result::Result<T, TreeError>;

/// Why a node is (or is not) checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    /// Checked and recorded in the selected set.
    Selected,
    /// Checked by an ancestor's cascade.
    Inherited,
    /// Checked without a checked or root parent; not recorded.
    Detached,
}

impl CheckState {
    #[must_use]
    pub const fn is_checked(self) -> bool {
        !matches!(self, Self::Unchecked)
    }
}

/// A materialized node.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    leaf: bool,
    class: Option<String>,
    icon_class: Option<String>,
    state: CheckState,
    expanded: bool,
    disabled: bool,
    loaded: bool,
}

impl Node {
    fn root(id: NodeId, text: String) -> Self {
        Self {
            id,
            text,
            parent: None,
            children: Vec::new(),
            leaf: false,
            class: None,
            icon_class: None,
            state: CheckState::Unchecked,
            expanded: false,
            disabled: true,
            loaded: false,
        }
    }

    fn from_descriptor(descriptor: &NodeDescriptor, parent: NodeId) -> Self {
        Self {
            id: descriptor.id.clone(),
            text: descriptor.text.clone(),
            parent: Some(parent),
            children: Vec::new(),
            leaf: descriptor.leaf,
            class: descriptor.cls.clone(),
            icon_class: descriptor.icon_cls.clone(),
            state: CheckState::Unchecked,
            expanded: false,
            disabled: false,
            loaded: descriptor.leaf || descriptor.children.is_some(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parent identifier; `None` only for the root.
    #[must_use]
    pub fn parent(&self) -> Option<&NodeId> {
        self.parent.as_ref()
    }

    /// Child identifiers in load order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    #[must_use]
    pub fn icon_class(&self) -> Option<&str> {
        self.icon_class.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> CheckState {
        self.state
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.state.is_checked()
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Whether the checkbox control is inert.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the children of this node are known.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

/// Result of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The widget or the node's checkbox was disabled.
    Ignored,
    /// The toggle was applied.
    Applied {
        /// Whether the selected set changed.
        selection_changed: bool,
    },
}

impl ToggleOutcome {
    /// Whether the selected set changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(
            self,
            Self::Applied {
                selection_changed: true
            }
        )
    }
}

/// Counts reported by a completed subtree load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    /// Nodes attached by this load.
    pub materialized: usize,
    /// Attached nodes that were checked because they were already selected.
    pub restored: usize,
}

/// Stateful checkbox tree bound to one form field.
#[derive(Debug, Clone)]
pub struct CheckboxTreeSync {
    nodes: AHashMap<NodeId, Node>,
    root: NodeId,
    selected: SelectedSet,
    data_url: String,
    complete_class: String,
    pending_loads: usize,
    enabled: bool,
}

impl CheckboxTreeSync {
    /// Create a tree whose children are served from `data_url`.
    ///
    /// The widget starts disabled; the first completed load enables it.
    #[must_use]
    pub fn new(data_url: impl Into<String>) -> Self {
        let root = NodeId::new(DEFAULT_ROOT_ID);
        let mut nodes = AHashMap::new();
        nodes.insert(
            root.clone(),
            Node::root(root.clone(), DEFAULT_ROOT_LABEL.to_owned()),
        );
        Self {
            nodes,
            root,
            selected: SelectedSet::new(),
            data_url: data_url.into(),
            complete_class: DEFAULT_COMPLETE_CLASS.to_owned(),
            pending_loads: 0,
            enabled: false,
        }
    }

    /// Create a tree for a configured field, seeded with its initial values.
    #[must_use]
    pub fn from_field(field: &FieldConfig) -> Self {
        Self::new(field.data_url.clone()).with_selection(field.initial_values.iter().cloned())
    }

    /// Replace the root identifier and label.
    ///
    /// Discards any materialized nodes.
    #[must_use]
    pub fn with_root(mut self, id: impl Into<NodeId>, label: impl Into<String>) -> Self {
        let root = id.into();
        self.nodes.clear();
        self.nodes
            .insert(root.clone(), Node::root(root.clone(), label.into()));
        self.root = root;
        self
    }

    /// Seed the selected set from a previous submission.
    #[must_use]
    pub fn with_selection<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        self.selected = SelectedSet::from_values(values);
        self
    }

    /// Set the node class that keeps a checkbox live under a checked ancestor.
    #[must_use]
    pub fn with_complete_class(mut self, class: impl Into<String>) -> Self {
        self.complete_class = class.into();
        self
    }

    // --- Queries ------------------------------------------------------------

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[&self.root]
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of materialized nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether only the root is materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    #[must_use]
    pub fn selected(&self) -> &SelectedSet {
        &self.selected
    }

    /// Selected identifiers in order, as submitted with the form.
    #[must_use]
    pub fn selected_values(&self) -> &[NodeId] {
        self.selected.as_slice()
    }

    #[must_use]
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Whether the widget accepts interaction.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Loads requested and not yet completed.
    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.pending_loads
    }

    /// Identifiers from the root down to `id`, inclusive.
    #[must_use]
    pub fn path_to(&self, id: &str) -> Option<Vec<NodeId>> {
        let mut current = self.nodes.get(id)?;
        let mut path = vec![current.id.clone()];
        while let Some(parent) = &current.parent {
            current = self.nodes.get(parent.as_str())?;
            path.push(current.id.clone());
        }
        path.reverse();
        Some(path)
    }

    /// Descendants of `id` in depth-first pre-order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(node) = self.nodes.get(id) else {
            return out;
        };
        let mut stack: Vec<&NodeId> = node.children.iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next.clone());
            if let Some(child) = self.nodes.get(next.as_str()) {
                stack.extend(child.children.iter().rev());
            }
        }
        out
    }

    /// Rows currently visible, as `(depth, node)`, in display order.
    ///
    /// The root is hidden; its children are the top-level rows and are shown
    /// once the root is expanded.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<(usize, &Node)> {
        let mut rows = Vec::new();
        let root = self.root();
        if root.expanded {
            for child in &root.children {
                self.collect_visible(child, 0, &mut rows);
            }
        }
        rows
    }

    fn collect_visible<'a>(&'a self, id: &NodeId, depth: usize, out: &mut Vec<(usize, &'a Node)>) {
        let Some(node) = self.nodes.get(id.as_str()) else {
            return;
        };
        out.push((depth, node));
        if node.expanded {
            for child in &node.children {
                self.collect_visible(child, depth + 1, out);
            }
        }
    }

    /// Whether every materialized non-root node is `Selected` exactly when
    /// its identifier is in the selected set, and the root is unchecked.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.nodes.values().all(|node| {
            if node.is_root() {
                return !node.is_checked();
            }
            (node.state == CheckState::Selected) == self.selected.contains(node.id.as_str())
        })
    }

    // --- Expansion ----------------------------------------------------------

    /// Expand every node on the path from the root to `id`, inclusive.
    pub fn expand_path(&mut self, id: &str) -> Result<()> {
        let path = self
            .path_to(id)
            .ok_or_else(|| TreeError::UnknownNode(NodeId::new(id)))?;
        for step in &path {
            if let Some(node) = self.nodes.get_mut(step.as_str()) {
                node.expanded = true;
            }
        }
        Ok(())
    }

    /// Expand every materialized node.
    ///
    /// Returns the expanded nodes whose children still need loading, in
    /// display (depth-first pre-order) order.
    pub fn expand_all(&mut self) -> Vec<NodeId> {
        let mut order = vec![self.root.clone()];
        order.extend(self.descendants(self.root.as_str()));

        let mut unloaded = Vec::new();
        for id in order {
            let Some(node) = self.nodes.get_mut(id.as_str()) else {
                continue;
            };
            if node.leaf {
                continue;
            }
            node.expanded = true;
            if !node.loaded {
                unloaded.push(id);
            }
        }
        unloaded
    }

    /// Collapse every node below the root.
    pub fn collapse_all(&mut self) {
        let root = self.root.clone();
        for node in self.nodes.values_mut() {
            if node.id != root {
                node.expanded = false;
            }
        }
    }

    // --- Loading ------------------------------------------------------------

    /// Start loading the children of `id`.
    ///
    /// The widget stays disabled until every outstanding load completes.
    pub fn begin_load(&mut self, id: &str) -> Result<LoadRequest> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| TreeError::UnknownNode(NodeId::new(id)))?;
        let request = LoadRequest {
            url: self.data_url.clone(),
            node: node.id.clone(),
            array_of_values: self.selected.as_slice().to_vec(),
            context: Vec::new(),
        };
        self.pending_loads = self.pending_loads.saturating_add(1);
        self.enabled = false;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "checkbox_tree.load_request",
            node = id,
            pending = self.pending_loads,
            selected = self.selected.len()
        );
        Ok(request)
    }

    /// Attach the children loaded for `parent` and restore check marks for
    /// every attached node whose identifier is already selected.
    ///
    /// Children previously attached under `parent` are replaced by a
    /// non-empty batch; an empty batch leaves the subtree as it is. The
    /// selected set is only read. The input is validated before anything is
    /// attached, so a malformed load leaves the tree untouched apart from
    /// finishing the outstanding load.
    pub fn on_subtree_loaded(
        &mut self,
        parent: &str,
        children: Vec<NodeDescriptor>,
    ) -> Result<LoadSummary> {
        #[cfg(feature = "tracing")]
        let load_span = tracing::debug_span!(
            "checkbox_tree.load",
            parent,
            materialized = tracing::field::Empty,
            restored = tracing::field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _load_guard = load_span.enter();

        let result = self.attach(parent, &children);
        self.finish_load();

        #[cfg(feature = "tracing")]
        {
            match &result {
                Ok(summary) => {
                    load_span.record("materialized", summary.materialized as u64);
                    load_span.record("restored", summary.restored as u64);
                }
                Err(err) => {
                    tracing::warn!(message = "checkbox_tree.load_rejected", error = %err);
                }
            }
        }
        result
    }

    fn finish_load(&mut self) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        if self.pending_loads == 0 {
            self.enabled = true;
        }
    }

    fn attach(&mut self, parent: &str, children: &[NodeDescriptor]) -> Result<LoadSummary> {
        let parent_id = self
            .nodes
            .get(parent)
            .map(|node| node.id.clone())
            .ok_or_else(|| TreeError::UnknownNode(NodeId::new(parent)))?;

        if children.is_empty() {
            if let Some(node) = self.nodes.get_mut(parent_id.as_str()) {
                node.loaded = true;
            }
            return Ok(LoadSummary::default());
        }

        let replaced: AHashSet<NodeId> = self.descendants(parent).into_iter().collect();
        self.validate(&parent_id, children, &replaced)?;

        for id in &replaced {
            self.nodes.remove(id.as_str());
        }

        let mut attached = Vec::new();
        let mut top = Vec::with_capacity(children.len());
        for descriptor in children {
            top.push(descriptor.id.clone());
            self.insert_subtree(descriptor, &parent_id, &mut attached);
        }
        if let Some(node) = self.nodes.get_mut(parent_id.as_str()) {
            node.children = top;
            node.loaded = true;
        }

        let mut summary = LoadSummary {
            materialized: attached.len(),
            restored: 0,
        };
        for id in &attached {
            if !self.selected.contains(id.as_str()) {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(id.as_str()) {
                node.state = CheckState::Selected;
            }
            self.expand_path(id.as_str())?;
            summary.restored += 1;
        }
        Ok(summary)
    }

    fn validate(
        &self,
        parent: &NodeId,
        children: &[NodeDescriptor],
        replaced: &AHashSet<NodeId>,
    ) -> Result<()> {
        let mut seen = AHashSet::new();
        let mut stack: Vec<(&NodeId, &NodeDescriptor)> =
            children.iter().map(|child| (parent, child)).collect();
        while let Some((owner, descriptor)) = stack.pop() {
            if descriptor.id.is_blank() {
                return Err(TreeError::MissingId {
                    parent: owner.clone(),
                });
            }
            let taken = self.nodes.contains_key(descriptor.id.as_str())
                && !replaced.contains(&descriptor.id);
            if taken || !seen.insert(&descriptor.id) {
                return Err(TreeError::DuplicateId(descriptor.id.clone()));
            }
            for child in descriptor.children.iter().flatten() {
                stack.push((&descriptor.id, child));
            }
        }
        Ok(())
    }

    fn insert_subtree(
        &mut self,
        descriptor: &NodeDescriptor,
        parent: &NodeId,
        attached: &mut Vec<NodeId>,
    ) {
        let mut node = Node::from_descriptor(descriptor, parent.clone());
        attached.push(node.id.clone());
        for child in descriptor.children.iter().flatten() {
            node.children.push(child.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
        for child in descriptor.children.iter().flatten() {
            self.insert_subtree(child, &descriptor.id, attached);
        }
    }

    // --- Toggling -----------------------------------------------------------

    /// Apply a checkbox change on `id` and cascade it to every descendant.
    ///
    /// Checking records `id` in the selected set only when its parent is the
    /// root or already checked. Descendants become checked; those whose class
    /// is not the completion class get their checkbox disabled. Unchecking
    /// removes `id` and every descendant from the set and re-enables their
    /// checkboxes. The path to `id` is expanded either way.
    pub fn on_toggle(&mut self, id: &str, checked: bool) -> Result<ToggleOutcome> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| TreeError::UnknownNode(NodeId::new(id)))?;
        let Some(parent) = node.parent.as_ref() else {
            return Err(TreeError::RootNotCheckable);
        };
        if !self.enabled || node.disabled {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "checkbox_tree.toggle_ignored", node = id, checked);
            return Ok(ToggleOutcome::Ignored);
        }

        let node_id = node.id.clone();
        let reachable = self
            .nodes
            .get(parent.as_str())
            .is_some_and(|parent| parent.is_root() || parent.is_checked());

        let selection_changed = if checked {
            self.check(&node_id, reachable)
        } else {
            self.uncheck(&node_id)
        };
        self.expand_path(id)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "checkbox_tree.toggle",
            node = id,
            checked,
            reachable,
            selection_changed,
            selected = self.selected.len()
        );
        debug_assert!(self.is_consistent());
        Ok(ToggleOutcome::Applied { selection_changed })
    }

    fn check(&mut self, id: &NodeId, reachable: bool) -> bool {
        let inserted = reachable && self.selected.insert(id.clone());
        let state = if self.selected.contains(id.as_str()) {
            CheckState::Selected
        } else {
            CheckState::Detached
        };
        if let Some(node) = self.nodes.get_mut(id.as_str()) {
            node.state = state;
        }

        for descendant in self.descendants(id.as_str()) {
            let state = if self.selected.contains(descendant.as_str()) {
                CheckState::Selected
            } else {
                CheckState::Inherited
            };
            if let Some(node) = self.nodes.get_mut(descendant.as_str()) {
                node.state = state;
                if node.class.as_deref() != Some(self.complete_class.as_str()) {
                    node.disabled = true;
                }
            }
        }
        inserted
    }

    fn uncheck(&mut self, id: &NodeId) -> bool {
        let mut removed = self.selected.remove(id.as_str());
        if let Some(node) = self.nodes.get_mut(id.as_str()) {
            node.state = CheckState::Unchecked;
        }
        for descendant in self.descendants(id.as_str()) {
            removed += self.selected.remove(descendant.as_str());
            if let Some(node) = self.nodes.get_mut(descendant.as_str()) {
                node.state = CheckState::Unchecked;
                node.disabled = false;
            }
        }
        removed > 0
    }

    /// Empty the selected set and uncheck every materialized node.
    ///
    /// Returns whether the selected set was non-empty.
    pub fn clear_values(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        for node in self.nodes.values_mut() {
            if node.is_root() {
                continue;
            }
            node.state = CheckState::Unchecked;
            node.disabled = false;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(message = "checkbox_tree.clear", changed);
        changed
    }

    /// Drop every materialized node below the root and request the root's
    /// children again. The selected set is kept.
    ///
    /// Used when an upstream widget's selection changes what this tree
    /// should show.
    pub fn reload(&mut self) -> LoadRequest {
        for id in self.descendants(self.root.as_str()) {
            self.nodes.remove(id.as_str());
        }
        let root = self.root.clone();
        if let Some(node) = self.nodes.get_mut(root.as_str()) {
            node.children.clear();
            node.loaded = false;
        }
        self.pending_loads = self.pending_loads.saturating_add(1);
        self.enabled = false;
        LoadRequest {
            url: self.data_url.clone(),
            node: root,
            array_of_values: self.selected.as_slice().to_vec(),
            context: Vec::new(),
        }
    }
}
