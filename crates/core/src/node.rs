//! Tree nodes and the index lists they own.
//!
//! A [`TreeNode`] is one slot in the node array owned by a
//! [`TreeObject`](crate::tree::TreeObject). Nodes never hold direct
//! references to each other: children and the parent back-reference are
//! stored as indices into the owning array, and action/transition references
//! are stored in the packed wire form described in [`crate::index`].
//!
//! Reads that need resolution go through [`NodeRef`], a borrow of the owning
//! tree plus a node index. Mutation touches only the node's own action-index
//! list and therefore lives directly on [`TreeNode`].

use bitflags::bitflags;

use crate::index::SlotIndex;
use crate::managed::ManagedRef;
use crate::tree::{SetupPolicy, TreeObject};

bitflags! {
    /// Node attribute word.
    ///
    /// The engine packs per-node behavior switches into a 16-bit field;
    /// unknown bits are preserved as-is.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct NodeAttr: u16 {
        const ENABLED        = 1 << 0;
        const RESTARTABLE    = 1 << 1;
        const INTERRUPTIBLE  = 1 << 2;
        const REFERENCE_TREE = 1 << 3;
    }
}

/// Engine-side evaluation state of a node.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NodeStatus {
    /// Not part of the active path.
    #[default]
    Off,
    /// Currently active.
    On,
    /// Preempted by a higher-priority transition.
    Interrupted,
    /// Ran to completion this update.
    Finished,
}

/// The per-node index lists.
///
/// Backing data can be absent while the engine is still setting a tree up;
/// every accessor and mutator treats a missing `TreeNodeData` as "nothing
/// there" rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNodeData {
    /// Indices of child nodes in the owner's node array, in evaluation order.
    pub children: Vec<u32>,
    /// Packed action indices (see [`crate::index`]), in execution order.
    pub actions: Vec<u32>,
    /// Packed transition indices.
    pub transitions: Vec<u32>,
}

impl TreeNodeData {
    pub fn new(children: Vec<u32>, actions: Vec<u32>, transitions: Vec<u32>) -> Self {
        Self {
            children,
            actions,
            transitions,
        }
    }
}

/// One node of a behavior tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    /// Unique within the owning tree object.
    pub id: u64,
    /// Display name; not guaranteed unique. The name `root` is a sentinel
    /// terminating [`NodeRef::full_name`] walks.
    pub name: String,
    pub attr: NodeAttr,
    /// Selection ordering hint; semantics belong to the engine's selector.
    pub priority: i32,
    /// Index of the parent node in the owner's array, if any.
    pub parent: Option<u32>,
    /// Index of the condition the parent's selector evaluates for this
    /// node, or -1 when none. Opaque to this crate.
    pub selector_condition_index: i32,
    pub status1: NodeStatus,
    pub status2: NodeStatus,
    pub data: Option<TreeNodeData>,
}

impl TreeNode {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            attr: NodeAttr::empty(),
            priority: 0,
            parent: None,
            selector_condition_index: -1,
            status1: NodeStatus::Off,
            status2: NodeStatus::Off,
            data: Some(TreeNodeData::default()),
        }
    }

    /// Sets the parent node index (builder pattern).
    #[must_use]
    pub fn with_parent(mut self, parent_index: u32) -> Self {
        self.parent = Some(parent_index);
        self
    }

    /// Sets the attribute word (builder pattern).
    #[must_use]
    pub fn with_attr(mut self, attr: NodeAttr) -> Self {
        self.attr = attr;
        self
    }

    /// Sets the selection priority (builder pattern).
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replaces the backing data (builder pattern).
    #[must_use]
    pub fn with_data(mut self, data: TreeNodeData) -> Self {
        self.data = Some(data);
        self
    }

    /// Appends a packed action index to the node's action list.
    ///
    /// No-op when the node has no backing data.
    pub fn append_action(&mut self, raw_index: u32) {
        let Some(data) = self.data.as_mut() else {
            return;
        };
        data.actions.push(raw_index);
    }

    /// Overwrites the action index at `position` in place.
    ///
    /// Silently ignored when `position` is out of bounds or the node has no
    /// backing data; callers are expected to have validated the count.
    pub fn replace_action(&mut self, position: u32, raw_index: u32) {
        let Some(data) = self.data.as_mut() else {
            return;
        };
        if let Some(slot) = data.actions.get_mut(position as usize) {
            *slot = raw_index;
        }
    }

    /// Removes the action index at `position`, preserving the order of the
    /// remaining entries.
    ///
    /// Silently ignored when `position` is out of bounds or the node has no
    /// backing data.
    pub fn remove_action(&mut self, position: u32) {
        let Some(data) = self.data.as_mut() else {
            return;
        };
        if position as usize >= data.actions.len() {
            return;
        }
        if position == 0 && data.actions.len() == 1 {
            // Sole entry: drop it without shifting anything.
            data.actions.clear();
            return;
        }
        data.actions.remove(position as usize);
    }

    /// Number of stored action indices.
    pub fn action_index_count(&self) -> u32 {
        self.data
            .as_ref()
            .map(|data| data.actions.len() as u32)
            .unwrap_or(0)
    }
}

/// Borrowed view of one node inside its owning tree.
///
/// Everything that needs to resolve indices into concrete nodes or objects
/// lives here: the node alone cannot interpret its index lists.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    owner: &'a TreeObject,
    index: u32,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(owner: &'a TreeObject, index: u32) -> Self {
        Self { owner, index }
    }

    /// Index of this node in the owner's array.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The underlying node, if the index is still valid.
    pub fn node(&self) -> Option<&'a TreeNode> {
        self.owner.node(self.index)
    }

    pub fn id(&self) -> Option<u64> {
        self.node().map(|node| node.id)
    }

    pub fn name(&self) -> &'a str {
        self.node().map(|node| node.name.as_str()).unwrap_or("")
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let parent_index = self.node()?.parent?;
        self.owner.node(parent_index)?;
        Some(NodeRef::new(self.owner, parent_index))
    }

    /// Child nodes in stored order.
    ///
    /// Indices that no longer resolve are dropped; a node without backing
    /// data yields an empty sequence.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        let Some(data) = self.node().and_then(|node| node.data.as_ref()) else {
            return Vec::new();
        };
        data.children
            .iter()
            .filter(|&&child_index| self.owner.node(child_index).is_some())
            .map(|&child_index| NodeRef::new(self.owner, child_index))
            .collect()
    }

    /// Action objects in stored order, resolved through the live tables.
    ///
    /// Unresolved entries stay in place as `None`: an action may simply not
    /// be loaded yet, and callers compare by position before it exists.
    pub fn actions(&self, policy: SetupPolicy) -> Vec<Option<&'a ManagedRef>> {
        let Some(data) = self.node().and_then(|node| node.data.as_ref()) else {
            return Vec::new();
        };
        data.actions
            .iter()
            .map(|&raw| self.owner.action(raw, policy))
            .collect()
    }

    /// Like [`actions`](Self::actions), but forced through the unloaded
    /// (class-data) resolution path.
    pub fn unloaded_actions(&self) -> Vec<Option<&'a ManagedRef>> {
        let Some(data) = self.node().and_then(|node| node.data.as_ref()) else {
            return Vec::new();
        };
        data.actions
            .iter()
            .map(|&raw| self.owner.unloaded_action(raw))
            .collect()
    }

    /// Transition objects in stored order; unresolved entries are dropped.
    pub fn transitions(&self) -> Vec<&'a ManagedRef> {
        let Some(data) = self.node().and_then(|node| node.data.as_ref()) else {
            return Vec::new();
        };
        data.transitions
            .iter()
            .filter_map(|&raw| self.owner.transition(raw))
            .collect()
    }

    /// Raw packed action indices, decoded.
    pub fn action_indices(&self) -> Vec<SlotIndex> {
        self.node()
            .and_then(|node| node.data.as_ref())
            .map(|data| data.actions.iter().map(|&raw| SlotIndex::decode(raw)).collect())
            .unwrap_or_default()
    }

    /// Dotted path from just below the root down to this node.
    ///
    /// Walks parent indices, prepending each name, and stops at a node
    /// literally named `root`, at a missing parent, or when the walk returns
    /// to this node. Step count is capped at the owner's node count so a
    /// malformed parent cycle that never revisits the start also terminates.
    pub fn full_name(&self) -> String {
        let Some(node) = self.node() else {
            return String::new();
        };
        let mut out = node.name.clone();
        let mut cursor = node.parent;
        let mut remaining = self.owner.node_count();
        while let Some(parent_index) = cursor {
            if remaining == 0 || parent_index == self.index {
                break;
            }
            remaining -= 1;
            let Some(parent) = self.owner.node(parent_index) else {
                break;
            };
            if parent.name == "root" {
                break;
            }
            out = format!("{}.{}", parent.name, out);
            cursor = parent.parent;
        }
        out
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("index", &self.index)
            .field("name", &self.name())
            .finish()
    }
}
