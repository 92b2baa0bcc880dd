//! Error types.
//!
//! Absence (missing data, unresolved index, unoccupied slot) is never an
//! error in this crate; it is signaled with `Option` at the call site.
//! Errors are reserved for the two places something can actually go wrong:
//! talking to the engine binding, and construct-once tree population.

/// Failure reported by an [`EngineBinding`](crate::binding::EngineBinding).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// No method matched the declaring type + signature pair.
    #[error("method not found: {declaring_type}.{signature}")]
    MethodNotFound {
        declaring_type: String,
        signature: String,
    },

    /// The method was found but the engine-side call failed.
    #[error("invoking {declaring_type}.{signature} failed: {reason}")]
    InvocationFailed {
        declaring_type: String,
        signature: String,
        reason: String,
    },
}

/// Validation failure while populating a [`TreeObject`](crate::tree::TreeObject).
///
/// The builder checks only what the engine guarantees about well-formed
/// trees; see [`TreeObjectBuilder`](crate::builder::TreeObjectBuilder).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeBuildError {
    /// Two nodes share an id; ids must be unique within a tree object.
    #[error("duplicate node id {0}")]
    DuplicateNodeId(u64),

    /// A node's parent back-reference points outside the node array.
    #[error("node {node} has parent index {parent}, but the tree has {node_count} nodes")]
    ParentOutOfRange {
        node: u32,
        parent: u32,
        node_count: u32,
    },
}
