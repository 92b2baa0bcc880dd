//! Tree objects: node arrays plus the object tables indices resolve against.
//!
//! A [`TreeObject`] owns the contiguous node array of one behavior tree (or
//! one motion-FSM layer) and the per-instance action tables. Class-level
//! backing data lives in [`TreeObjectData`], which may be absent while the
//! engine is still attaching it; every resolution treats that as "nothing
//! loaded yet".

use crate::index::SlotIndex;
use crate::managed::{ManagedRef, ObjectTable, resolve};
use crate::node::{NodeRef, TreeNode};

/// Which per-instance table dynamic action indices resolve against.
///
/// The engine exposes this as a process-wide `DelaySetupObjects` flag that
/// can flip at runtime, so callers derive a fresh policy from the binding on
/// every resolution rather than caching one.
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
pub enum SetupPolicy {
    /// Objects are set up immediately; dynamic indices hit the live table.
    #[default]
    Immediate,
    /// Object setup is deferred; dynamic indices hit the delayed table.
    DelaySetup,
}

impl SetupPolicy {
    /// Derives the policy from the engine's delay-setup flag.
    #[inline]
    pub const fn from_delay_flag(delay_setup_objects: bool) -> Self {
        if delay_setup_objects {
            Self::DelaySetup
        } else {
            Self::Immediate
        }
    }
}

/// Class-level backing data shared by every instance of a tree's type.
///
/// `actions` here is the raw (not-yet-instantiated) action table the
/// unloaded resolution path reads; `static_actions`/`static_transitions`
/// are the tables static-flagged indices address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeObjectData {
    pub actions: ObjectTable,
    pub static_actions: ObjectTable,
    pub transitions: ObjectTable,
    pub static_transitions: ObjectTable,
}

/// One behavior tree's worth of nodes and object tables.
///
/// Nodes are populated once at construction and never relocated; all node
/// references anywhere in this crate are indices into this array. The only
/// post-construction mutation is to per-node action-index lists, via
/// [`node_mut`](Self::node_mut).
#[derive(Clone, Debug, Default)]
pub struct TreeObject {
    nodes: Vec<TreeNode>,
    actions: ObjectTable,
    delayed_actions: ObjectTable,
    data: Option<TreeObjectData>,
}

impl TreeObject {
    pub(crate) fn from_parts(
        nodes: Vec<TreeNode>,
        actions: ObjectTable,
        delayed_actions: ObjectTable,
        data: Option<TreeObjectData>,
    ) -> Self {
        Self {
            nodes,
            actions,
            delayed_actions,
            data,
        }
    }

    /// Bounds-checked slot access; out-of-range yields `None`.
    pub fn node(&self, index: u32) -> Option<&TreeNode> {
        self.nodes.get(index as usize)
    }

    /// Mutable slot access for action-list edits.
    pub fn node_mut(&mut self, index: u32) -> Option<&mut TreeNode> {
        self.nodes.get_mut(index as usize)
    }

    /// Resolving view of the node at `index`, if it exists.
    pub fn node_ref(&self, index: u32) -> Option<NodeRef<'_>> {
        self.node(index)?;
        Some(NodeRef::new(self, index))
    }

    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in array order, as resolving views.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.node_count()).map(|index| NodeRef::new(self, index))
    }

    /// First node with the given name, scanning in array order.
    pub fn node_by_name(&self, name: &str) -> Option<NodeRef<'_>> {
        if self.is_empty() {
            return None;
        }
        let index = self.nodes.iter().position(|node| node.name == name)?;
        Some(NodeRef::new(self, index as u32))
    }

    /// First node with the given id, scanning in array order.
    pub fn node_by_id(&self, id: u64) -> Option<NodeRef<'_>> {
        if self.is_empty() {
            return None;
        }
        let index = self.nodes.iter().position(|node| node.id == id)?;
        Some(NodeRef::new(self, index as u32))
    }

    /// Resolves a packed action index through the live tables.
    ///
    /// Static-flagged indices read the class data's static table; dynamic
    /// indices read the live or delayed per-instance table per `policy`.
    /// Absent class data, an out-of-range index, or an unoccupied slot all
    /// resolve to `None`.
    pub fn action(&self, raw_index: u32, policy: SetupPolicy) -> Option<&ManagedRef> {
        let data = self.data.as_ref()?;
        let dynamic = match policy {
            SetupPolicy::Immediate => &self.actions,
            SetupPolicy::DelaySetup => &self.delayed_actions,
        };
        resolve(
            SlotIndex::decode(raw_index),
            Some(&data.static_actions),
            Some(dynamic),
        )
    }

    /// Resolves a packed action index through the class-data table,
    /// bypassing the live/delayed distinction.
    ///
    /// Used when the action has not been instantiated into a live object;
    /// static-flagged indices decode exactly as in [`action`](Self::action).
    pub fn unloaded_action(&self, raw_index: u32) -> Option<&ManagedRef> {
        let data = self.data.as_ref()?;
        resolve(
            SlotIndex::decode(raw_index),
            Some(&data.static_actions),
            Some(&data.actions),
        )
    }

    /// Count of the dynamic table selected by `policy`.
    pub fn action_count(&self, policy: SetupPolicy) -> u32 {
        match policy {
            SetupPolicy::Immediate => self.actions.count(),
            SetupPolicy::DelaySetup => self.delayed_actions.count(),
        }
    }

    /// Count of the class-data (unloaded) action table.
    pub fn unloaded_action_count(&self) -> u32 {
        self.data
            .as_ref()
            .map(|data| data.actions.count())
            .unwrap_or(0)
    }

    /// Count of the static action table.
    pub fn static_action_count(&self) -> u32 {
        self.data
            .as_ref()
            .map(|data| data.static_actions.count())
            .unwrap_or(0)
    }

    /// Resolves a packed transition index.
    ///
    /// Only the static-flagged branch is supported; dynamic transition
    /// indices resolve to `None`. The engine-side semantics of the dynamic
    /// branch are unconfirmed, so it is a documented gap rather than a
    /// guess.
    pub fn transition(&self, raw_index: u32) -> Option<&ManagedRef> {
        let data = self.data.as_ref()?;
        match SlotIndex::decode(raw_index) {
            SlotIndex::Static(index) => data.static_transitions.get(index),
            SlotIndex::Dynamic(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeObjectBuilder;
    use crate::index::STATIC_FLAG;

    fn object(id: u64) -> ManagedRef {
        ManagedRef::new(id, "via.behaviortree.Action")
    }

    fn sample_tree() -> TreeObject {
        TreeObjectBuilder::new()
            .node(TreeNode::new(100, "root"))
            .node(TreeNode::new(101, "combat").with_parent(0))
            .node(TreeNode::new(102, "idle").with_parent(0))
            .live_actions(ObjectTable::from_objects([object(1), object(2)]))
            .delayed_actions(ObjectTable::from_objects([object(3)]))
            .object_data(TreeObjectData {
                actions: ObjectTable::from_objects([object(4), object(5)]),
                static_actions: ObjectTable::from_objects([object(6), object(7)]),
                transitions: ObjectTable::from_objects([object(8)]),
                static_transitions: ObjectTable::from_objects([object(9)]),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn node_access_is_bounds_checked() {
        let tree = sample_tree();
        assert_eq!(tree.node(2).map(|node| node.id), Some(102));
        assert!(tree.node(3).is_none());
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn lookup_by_name_and_id() {
        let tree = sample_tree();
        assert_eq!(tree.node_by_name("combat").and_then(|n| n.id()), Some(101));
        assert_eq!(tree.node_by_id(102).map(|n| n.name().to_owned()), Some("idle".into()));
        assert!(tree.node_by_name("missing").is_none());
    }

    #[test]
    fn lookup_on_empty_tree_short_circuits() {
        let tree = TreeObjectBuilder::new().build().unwrap();
        assert!(tree.node_by_name("root").is_none());
        assert!(tree.node_by_id(0).is_none());
    }

    #[test]
    fn dynamic_action_follows_policy() {
        let tree = sample_tree();
        assert_eq!(tree.action(0, SetupPolicy::Immediate).map(ManagedRef::id), Some(1));
        assert_eq!(tree.action(0, SetupPolicy::DelaySetup).map(ManagedRef::id), Some(3));
        // Delayed table has a single slot.
        assert_eq!(tree.action(1, SetupPolicy::DelaySetup), None);
    }

    #[test]
    fn static_action_ignores_policy() {
        let tree = sample_tree();
        let raw = STATIC_FLAG | 1;
        assert_eq!(tree.action(raw, SetupPolicy::Immediate).map(ManagedRef::id), Some(7));
        assert_eq!(tree.action(raw, SetupPolicy::DelaySetup).map(ManagedRef::id), Some(7));
    }

    #[test]
    fn unloaded_action_reads_class_data() {
        let tree = sample_tree();
        assert_eq!(tree.unloaded_action(1).map(ManagedRef::id), Some(5));
        assert_eq!(tree.unloaded_action(STATIC_FLAG).map(ManagedRef::id), Some(6));
    }

    #[test]
    fn action_counts_per_table() {
        let tree = sample_tree();
        assert_eq!(tree.action_count(SetupPolicy::Immediate), 2);
        assert_eq!(tree.action_count(SetupPolicy::DelaySetup), 1);
        assert_eq!(tree.unloaded_action_count(), 2);
        assert_eq!(tree.static_action_count(), 2);
    }

    #[test]
    fn transition_static_branch_only() {
        let tree = sample_tree();
        assert_eq!(tree.transition(STATIC_FLAG).map(ManagedRef::id), Some(9));
        // Dynamic transitions are a documented gap.
        assert_eq!(tree.transition(0), None);
    }

    #[test]
    fn missing_object_data_resolves_to_absent() {
        let tree = TreeObjectBuilder::new()
            .node(TreeNode::new(1, "root"))
            .live_actions(ObjectTable::from_objects([object(1)]))
            .without_object_data()
            .build()
            .unwrap();
        assert_eq!(tree.action(0, SetupPolicy::Immediate), None);
        assert_eq!(tree.unloaded_action(0), None);
        assert_eq!(tree.transition(STATIC_FLAG), None);
    }
}
