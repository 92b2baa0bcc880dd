//! Behavior-tree / motion-FSM tree-object data model.
//!
//! This crate models an engine's behavior-tree runtime structures as owned
//! Rust data: nodes addressed by array index, action and transition
//! references packed into bit-discriminated 32-bit indices, tree objects
//! owning the object tables those indices resolve against, and an aggregate
//! [`BehaviorTree`] of capability-discriminated tree handles.
//!
//! Design points:
//!
//! - **Absence is not an error.** Trees are routinely inspected while the
//!   engine is still loading them; unresolved indices, missing backing data,
//!   and unoccupied object slots all surface as `None`/empty, never panics.
//! - **Indices, not references.** Nodes refer to each other and to objects
//!   only through indices resolved by the owning [`TreeObject`]; reads that
//!   need resolution go through the borrowed [`NodeRef`] view.
//! - **Injected engine context.** The delay-setup policy flag and managed
//!   method invocation come from an [`EngineBinding`] passed in at
//!   construction, so the data model runs unchanged against a live engine,
//!   a fake, or the inert [`NullBinding`].

pub mod behavior;
pub mod binding;
pub mod builder;
pub mod error;
pub mod index;
pub mod managed;
pub mod node;
pub mod tree;

// Re-export core types for ergonomic API
pub use behavior::{BehaviorTree, CoreHandle, HandleKind, MotionLayerView};
pub use binding::{EngineBinding, MethodArg, MethodCall, NullBinding};
pub use builder::TreeObjectBuilder;
pub use error::{BindingError, TreeBuildError};
pub use index::{STATIC_FLAG, STATIC_INDEX_MASK, SlotIndex};
pub use managed::{ManagedRef, ObjectTable};
pub use node::{NodeAttr, NodeRef, NodeStatus, TreeNode, TreeNodeData};
pub use tree::{SetupPolicy, TreeObject, TreeObjectData};
