//! Construct-once population of tree objects.
//!
//! The engine builds a tree's node array and object tables exactly once and
//! never relocates them afterwards; this builder is the safe equivalent of
//! that setup phase. `build` validates the properties the engine guarantees
//! for well-formed trees: node ids are unique and parent back-references
//! land inside the array. Child and action/transition indices are *not*
//! validated here — partially-loaded trees legitimately carry indices that
//! do not resolve yet, and the accessors handle that leniently at read time.

use crate::error::TreeBuildError;
use crate::managed::ObjectTable;
use crate::node::TreeNode;
use crate::tree::{TreeObject, TreeObjectData};

/// Builder for a [`TreeObject`].
#[derive(Debug, Default)]
pub struct TreeObjectBuilder {
    nodes: Vec<TreeNode>,
    actions: ObjectTable,
    delayed_actions: ObjectTable,
    data: Option<TreeObjectData>,
}

impl TreeObjectBuilder {
    /// Starts an empty tree with default (empty) class data attached.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            actions: ObjectTable::new(),
            delayed_actions: ObjectTable::new(),
            data: Some(TreeObjectData::default()),
        }
    }

    /// Appends a node; its index is the current node count.
    #[must_use]
    pub fn node(mut self, node: TreeNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Sets the live (immediate-setup) action table.
    #[must_use]
    pub fn live_actions(mut self, table: ObjectTable) -> Self {
        self.actions = table;
        self
    }

    /// Sets the delayed-setup action table.
    #[must_use]
    pub fn delayed_actions(mut self, table: ObjectTable) -> Self {
        self.delayed_actions = table;
        self
    }

    /// Attaches class-level backing data.
    #[must_use]
    pub fn object_data(mut self, data: TreeObjectData) -> Self {
        self.data = Some(data);
        self
    }

    /// Builds the tree with no class data attached, modelling the window
    /// where the engine has allocated the tree but not bound its type data.
    #[must_use]
    pub fn without_object_data(mut self) -> Self {
        self.data = None;
        self
    }

    /// Validates and produces the tree object.
    pub fn build(self) -> Result<TreeObject, TreeBuildError> {
        let node_count = self.nodes.len() as u32;
        for (index, node) in self.nodes.iter().enumerate() {
            if self.nodes[..index].iter().any(|prior| prior.id == node.id) {
                return Err(TreeBuildError::DuplicateNodeId(node.id));
            }
            if let Some(parent) = node.parent
                && parent >= node_count
            {
                return Err(TreeBuildError::ParentOutOfRange {
                    node: index as u32,
                    parent,
                    node_count,
                });
            }
        }
        Ok(TreeObject::from_parts(
            self.nodes,
            self.actions,
            self.delayed_actions,
            self.data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = TreeObjectBuilder::new()
            .node(TreeNode::new(7, "root"))
            .node(TreeNode::new(7, "combat"))
            .build();
        assert_eq!(result.err(), Some(TreeBuildError::DuplicateNodeId(7)));
    }

    #[test]
    fn parent_out_of_range_is_rejected() {
        let result = TreeObjectBuilder::new()
            .node(TreeNode::new(1, "root"))
            .node(TreeNode::new(2, "combat").with_parent(5))
            .build();
        assert_eq!(
            result.err(),
            Some(TreeBuildError::ParentOutOfRange {
                node: 1,
                parent: 5,
                node_count: 2,
            })
        );
    }

    #[test]
    fn self_referential_parent_is_allowed() {
        // The engine produces these in malformed trees; the read-side cycle
        // guard is what keeps walks finite.
        let result = TreeObjectBuilder::new()
            .node(TreeNode::new(1, "loner").with_parent(0))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn dangling_child_indices_are_allowed() {
        let node = TreeNode::new(1, "root").with_data(crate::node::TreeNodeData::new(
            vec![99],
            Vec::new(),
            Vec::new(),
        ));
        let tree = TreeObjectBuilder::new().node(node).build().unwrap();
        // Resolved leniently: the dangling child is simply dropped.
        assert!(tree.node_ref(0).unwrap().children().is_empty());
    }
}
