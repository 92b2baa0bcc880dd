//! Snapshot reports over behavior trees.
//!
//! [`TreeReport::capture`] walks every handle of a [`BehaviorTree`] and
//! produces an owned summary that debug frontends can render however they
//! like; [`TreeReport::render`] is the built-in indented-text form. Capture
//! is read-only and tolerates partially-loaded trees, since tooling polls
//! trees every frame regardless of load state.

use std::fmt::Write as _;

use bhvt_core::{BehaviorTree, NodeRef, SetupPolicy, SlotIndex};

/// Load state of one action slot of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum ActionSlot {
    /// Resolved to a live object.
    Loaded { id: u64, class: String },
    /// Present in the node's index list but not resolvable yet.
    Unloaded,
}

/// One node of a captured tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct NodeSummary {
    pub index: u32,
    pub id: u64,
    pub full_name: String,
    pub priority: i32,
    pub attr_bits: u16,
    pub status: String,
    pub child_indices: Vec<u32>,
    /// One entry per stored action index, position preserved.
    pub actions: Vec<ActionSlot>,
    pub transition_count: u32,
}

/// One tree handle of a captured behavior tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TreeSummary {
    pub index: u32,
    pub kind: String,
    pub nodes: Vec<NodeSummary>,
}

/// Owned snapshot of every tree in a behavior tree aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct TreeReport {
    /// Policy in effect at capture time (it can change between captures).
    pub policy: String,
    pub trees: Vec<TreeSummary>,
}

impl TreeReport {
    /// Walks every handle and node of `behavior_tree`.
    pub fn capture(behavior_tree: &BehaviorTree) -> Self {
        let policy = behavior_tree.current_policy();
        let trees = behavior_tree
            .trees()
            .enumerate()
            .map(|(tree_index, handle)| {
                let tree = handle.tree_object();
                let nodes: Vec<NodeSummary> = tree
                    .nodes()
                    .map(|node| summarize_node(node, policy))
                    .collect();
                tracing::debug!(
                    tree_index,
                    kind = %handle.kind(),
                    node_count = nodes.len(),
                    "captured tree"
                );
                TreeSummary {
                    index: tree_index as u32,
                    kind: handle.kind().to_string(),
                    nodes,
                }
            })
            .collect();
        Self {
            policy: policy.to_string(),
            trees,
        }
    }

    /// Renders the report as indented text, one line per node.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for tree in &self.trees {
            let _ = writeln!(
                out,
                "tree {} [{}] ({} nodes)",
                tree.index,
                tree.kind,
                tree.nodes.len()
            );
            for node in &tree.nodes {
                let loaded = node
                    .actions
                    .iter()
                    .filter(|slot| matches!(slot, ActionSlot::Loaded { .. }))
                    .count();
                let _ = writeln!(
                    out,
                    "  [{:>3}] {} (id={}, pri={}, status={}, actions={}/{}, transitions={})",
                    node.index,
                    node.full_name,
                    node.id,
                    node.priority,
                    node.status,
                    loaded,
                    node.actions.len(),
                    node.transition_count,
                );
            }
        }
        out
    }

    /// Serializes the report to pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn summarize_node(node: NodeRef<'_>, policy: SetupPolicy) -> NodeSummary {
    let actions = node
        .actions(policy)
        .into_iter()
        .map(|resolved| match resolved {
            Some(object) => ActionSlot::Loaded {
                id: object.id(),
                class: object.class().to_owned(),
            },
            None => ActionSlot::Unloaded,
        })
        .collect();
    let stored = node.node();
    NodeSummary {
        index: node.index(),
        id: stored.map(|n| n.id).unwrap_or(0),
        full_name: node.full_name(),
        priority: stored.map(|n| n.priority).unwrap_or(0),
        attr_bits: stored.map(|n| n.attr.bits()).unwrap_or(0),
        status: stored
            .map(|n| n.status1.to_string())
            .unwrap_or_default(),
        child_indices: node.children().iter().map(|child| child.index()).collect(),
        actions,
        transition_count: node.transitions().len() as u32,
    }
}

/// Decoded display form of a packed action index, for slot-level tooling.
pub fn describe_index(raw: u32) -> String {
    match SlotIndex::decode(raw) {
        SlotIndex::Static(index) => format!("static:{index}"),
        SlotIndex::Dynamic(index) => format!("dynamic:{index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bhvt_core::{
        CoreHandle, HandleKind, ManagedRef, NodeAttr, NullBinding, ObjectTable, STATIC_FLAG,
        TreeNode, TreeNodeData, TreeObjectBuilder, TreeObjectData,
    };

    fn sample() -> BehaviorTree {
        let root = TreeNode::new(1, "root")
            .with_data(TreeNodeData::new(vec![1], Vec::new(), Vec::new()));
        let combat = TreeNode::new(2, "combat")
            .with_parent(0)
            .with_priority(3)
            .with_attr(NodeAttr::ENABLED)
            .with_data(TreeNodeData::new(Vec::new(), vec![0, 7], vec![STATIC_FLAG]));
        let tree = TreeObjectBuilder::new()
            .node(root)
            .node(combat)
            .live_actions(ObjectTable::from_objects([ManagedRef::new(
                100,
                "app.EnemyAction",
            )]))
            .object_data(TreeObjectData {
                static_transitions: ObjectTable::from_objects([ManagedRef::new(
                    200,
                    "app.Transition",
                )]),
                ..TreeObjectData::default()
            })
            .build()
            .unwrap();
        BehaviorTree::new(
            vec![CoreHandle::new(HandleKind::MotionLayer, tree)],
            Arc::new(NullBinding),
        )
    }

    #[test]
    fn capture_preserves_action_slot_positions() {
        let report = TreeReport::capture(&sample());
        assert_eq!(report.trees.len(), 1);
        let combat = &report.trees[0].nodes[1];
        assert_eq!(combat.full_name, "combat");
        assert_eq!(combat.actions.len(), 2);
        assert!(matches!(combat.actions[0], ActionSlot::Loaded { id: 100, .. }));
        assert_eq!(combat.actions[1], ActionSlot::Unloaded);
        assert_eq!(combat.transition_count, 1);
        assert_eq!(combat.priority, 3);
        assert_eq!(combat.attr_bits, NodeAttr::ENABLED.bits());
    }

    #[test]
    fn capture_records_policy_and_kind() {
        let report = TreeReport::capture(&sample());
        assert_eq!(report.policy, "immediate");
        assert_eq!(report.trees[0].kind, "motion_layer");
        assert_eq!(report.trees[0].nodes[0].child_indices, vec![1]);
    }

    #[test]
    fn render_lists_every_node() {
        let rendered = TreeReport::capture(&sample()).render();
        assert!(rendered.contains("tree 0 [motion_layer] (2 nodes)"));
        assert!(rendered.contains("combat"));
        assert!(rendered.contains("actions=1/2"));
    }

    #[test]
    fn describe_index_decodes_both_families() {
        assert_eq!(describe_index(5), "dynamic:5");
        assert_eq!(describe_index(STATIC_FLAG | 5), "static:5");
    }
}
