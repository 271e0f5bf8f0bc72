//! Structural errors raised by checkbox tree operations.

use crate::id::NodeId;

/// Structural failure in tree input.
///
/// Operations fail fast with one of these instead of touching the selected
/// set when their input is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A node descriptor arrived without an identifier.
    MissingId {
        /// Identifier of the node whose children were being loaded.
        parent: NodeId,
    },
    /// A node descriptor reused an identifier already present in the tree.
    DuplicateId(NodeId),
    /// The referenced node is not materialized in the tree.
    UnknownNode(NodeId),
    /// The root cannot be checked or unchecked.
    RootNotCheckable,
}

impl core::fmt::Display for TreeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingId { parent } => {
                write!(f, "child of node `{parent}` has no identifier")
            }
            Self::DuplicateId(id) => write!(f, "node `{id}` is already in the tree"),
            Self::UnknownNode(id) => write!(f, "node `{id}` is not materialized"),
            Self::RootNotCheckable => write!(f, "the root node is not checkable"),
        }
    }
}

impl std::error::Error for TreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_node() {
        let err = TreeError::UnknownNode(NodeId::new("ex:Missing"));
        assert_eq!(err.to_string(), "node `ex:Missing` is not materialized");
        let err = TreeError::MissingId {
            parent: NodeId::new("root"),
        };
        assert!(err.to_string().contains("root"));
    }
}
