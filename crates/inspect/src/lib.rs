//! Developer-facing enumeration over behavior trees.
//!
//! `bhvt-inspect` sits between the data model in `bhvt-core` and whatever
//! frontend displays it: it captures owned, render-free snapshots of every
//! tree, node, action slot, and transition, plus a plain-text rendering for
//! logs and terminals. Rendering frameworks themselves are out of scope.

pub mod report;

pub use report::{ActionSlot, NodeSummary, TreeReport, TreeSummary, describe_index};
