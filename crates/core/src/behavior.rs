//! Behavior-tree aggregates and capability-discriminated tree handles.
//!
//! A [`BehaviorTree`] owns a fixed set of [`CoreHandle`] entries populated at
//! construction, plus the injected [`EngineBinding`]. The engine reuses one
//! handle representation for plain behavior-tree cores and for motion-FSM
//! layers; instead of reinterpreting the same bytes under different types,
//! each handle carries an explicit [`HandleKind`] discriminant and callers
//! obtain the layer-specific view through a checked conversion.

use std::sync::Arc;

use crate::binding::{
    BEHAVIOR_TREE_TYPE, EngineBinding, MethodArg, MethodCall, SET_CURRENT_NODE_SIGNATURE,
};
use crate::managed::ManagedRef;
use crate::node::TreeNode;
use crate::tree::{SetupPolicy, TreeObject};

/// What a tree handle actually is.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HandleKind {
    /// A plain behavior-tree core.
    Core,
    /// A motion-FSM layer wrapping a core.
    MotionLayer,
}

/// One tree slot of a behavior tree.
#[derive(Clone, Debug)]
pub struct CoreHandle {
    kind: HandleKind,
    tree: TreeObject,
}

impl CoreHandle {
    pub fn new(kind: HandleKind, tree: TreeObject) -> Self {
        Self { kind, tree }
    }

    pub fn kind(&self) -> HandleKind {
        self.kind
    }

    pub fn tree_object(&self) -> &TreeObject {
        &self.tree
    }

    pub fn tree_object_mut(&mut self) -> &mut TreeObject {
        &mut self.tree
    }

    /// Motion-FSM capability view; `None` unless the discriminant matches.
    pub fn as_motion_layer(&self) -> Option<MotionLayerView<'_>> {
        (self.kind == HandleKind::MotionLayer).then_some(MotionLayerView { handle: self })
    }
}

/// Checked motion-FSM view over a [`CoreHandle`].
#[derive(Clone, Copy, Debug)]
pub struct MotionLayerView<'a> {
    handle: &'a CoreHandle,
}

impl<'a> MotionLayerView<'a> {
    /// The layer's tree object (the same one the core exposes).
    pub fn tree_object(&self) -> &'a TreeObject {
        &self.handle.tree
    }
}

/// Aggregate of tree handles plus the injected engine binding.
pub struct BehaviorTree {
    trees: Vec<CoreHandle>,
    binding: Arc<dyn EngineBinding>,
}

impl BehaviorTree {
    pub fn new(trees: Vec<CoreHandle>, binding: Arc<dyn EngineBinding>) -> Self {
        Self { trees, binding }
    }

    /// Bounds-checked handle access; out-of-range yields `None`.
    pub fn tree(&self, index: u32) -> Option<&CoreHandle> {
        self.trees.get(index as usize)
    }

    pub fn tree_mut(&mut self, index: u32) -> Option<&mut CoreHandle> {
        self.trees.get_mut(index as usize)
    }

    pub fn tree_count(&self) -> u32 {
        self.trees.len() as u32
    }

    pub fn trees(&self) -> impl Iterator<Item = &CoreHandle> {
        self.trees.iter()
    }

    /// Setup policy derived from a fresh read of the binding's delay flag.
    ///
    /// Never cache this across calls; the engine can flip the flag at any
    /// time.
    pub fn current_policy(&self) -> SetupPolicy {
        SetupPolicy::from_delay_flag(self.binding.delay_setup_objects())
    }

    /// Resolves a packed action index within one tree under the current
    /// policy.
    pub fn action(&self, tree_index: u32, raw_index: u32) -> Option<&ManagedRef> {
        let policy = self.current_policy();
        self.tree(tree_index)?.tree_object().action(raw_index, policy)
    }

    /// Action-table count of one tree under the current policy.
    pub fn action_count(&self, tree_index: u32) -> u32 {
        let policy = self.current_policy();
        self.tree(tree_index)
            .map(|handle| handle.tree_object().action_count(policy))
            .unwrap_or(0)
    }

    /// Asks the engine to make `node` the current node of tree `tree_index`.
    ///
    /// The node is identified to the engine by id, never by reference. When
    /// the binding cannot find the engine method the operation is silently
    /// skipped; tooling that drives this every frame must not take the host
    /// down over a missing export.
    pub fn set_current_node(&self, node: &TreeNode, tree_index: u32, info: Option<ManagedRef>) {
        let call = MethodCall::new(BEHAVIOR_TREE_TYPE, SET_CURRENT_NODE_SIGNATURE)
            .with_arg(MethodArg::U64(node.id))
            .with_arg(MethodArg::U32(tree_index))
            .with_arg(MethodArg::Object(info));
        let _ = self.binding.invoke(&call);
    }
}

impl std::fmt::Debug for BehaviorTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorTree")
            .field("trees", &self.trees)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::NullBinding;
    use crate::builder::TreeObjectBuilder;

    fn handle(kind: HandleKind) -> CoreHandle {
        let tree = TreeObjectBuilder::new()
            .node(TreeNode::new(1, "root"))
            .build()
            .unwrap();
        CoreHandle::new(kind, tree)
    }

    #[test]
    fn tree_access_is_bounds_checked() {
        let bt = BehaviorTree::new(
            vec![handle(HandleKind::Core)],
            Arc::new(NullBinding),
        );
        assert!(bt.tree(0).is_some());
        assert!(bt.tree(1).is_none());
        assert_eq!(bt.tree_count(), 1);
    }

    #[test]
    fn motion_layer_view_checks_the_discriminant() {
        let core = handle(HandleKind::Core);
        let layer = handle(HandleKind::MotionLayer);
        assert!(core.as_motion_layer().is_none());
        let view = layer.as_motion_layer().unwrap();
        assert_eq!(view.tree_object().node_count(), 1);
    }

    #[test]
    fn set_current_node_without_engine_method_is_a_no_op() {
        let bt = BehaviorTree::new(vec![handle(HandleKind::Core)], Arc::new(NullBinding));
        let node = TreeNode::new(42, "combat");
        // NullBinding fails every lookup; must not panic or error out.
        bt.set_current_node(&node, 0, None);
    }
}
