//! Injected engine context.
//!
//! Everything this crate needs from the host engine is two capabilities:
//! reading the process-wide delay-setup flag, and looking up + invoking a
//! managed method by declaring type and signature. Both are behind the
//! [`EngineBinding`] trait so the data model can be exercised without a live
//! engine, and so the binding's lifetime is owned explicitly by the
//! [`BehaviorTree`](crate::behavior::BehaviorTree) it is injected into
//! instead of living in lazily-initialized statics.

use crate::error::BindingError;
use crate::managed::ManagedRef;

/// Managed type that owns the transition entry point.
pub const BEHAVIOR_TREE_TYPE: &str = "via.behaviortree.BehaviorTree";

/// Signature of the engine's current-node transition method.
pub const SET_CURRENT_NODE_SIGNATURE: &str =
    "setCurrentNode(System.UInt64, System.UInt32, via.behaviortree.SetNodeInfo)";

/// One argument of a managed method call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodArg {
    U32(u32),
    U64(u64),
    Bool(bool),
    /// A managed object reference, or a null argument.
    Object(Option<ManagedRef>),
}

/// A method call keyed by declaring type and signature string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodCall {
    pub declaring_type: String,
    pub signature: String,
    pub args: Vec<MethodArg>,
}

impl MethodCall {
    pub fn new(declaring_type: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            signature: signature.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument (builder pattern).
    #[must_use]
    pub fn with_arg(mut self, arg: MethodArg) -> Self {
        self.args.push(arg);
        self
    }
}

/// Host-engine capabilities injected at construction.
pub trait EngineBinding: Send + Sync {
    /// Current value of the engine's `DelaySetupObjects` flag.
    ///
    /// The flag can change at runtime; callers must re-read it for every
    /// resolution instead of caching the result.
    fn delay_setup_objects(&self) -> bool;

    /// Looks up the method named by `call` and invokes it.
    fn invoke(&self, call: &MethodCall) -> Result<(), BindingError>;
}

/// Inert binding for inspecting trees outside a live engine.
///
/// Reports the delay-setup flag as off and fails every method lookup, which
/// turns engine-side operations like `set_current_node` into no-ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBinding;

impl EngineBinding for NullBinding {
    fn delay_setup_objects(&self) -> bool {
        false
    }

    fn invoke(&self, call: &MethodCall) -> Result<(), BindingError> {
        Err(BindingError::MethodNotFound {
            declaring_type: call.declaring_type.clone(),
            signature: call.signature.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_binding_fails_every_lookup() {
        let call = MethodCall::new(BEHAVIOR_TREE_TYPE, SET_CURRENT_NODE_SIGNATURE);
        assert_eq!(
            NullBinding.invoke(&call),
            Err(BindingError::MethodNotFound {
                declaring_type: BEHAVIOR_TREE_TYPE.into(),
                signature: SET_CURRENT_NODE_SIGNATURE.into(),
            })
        );
        assert!(!NullBinding.delay_setup_objects());
    }

    #[test]
    fn method_call_collects_args_in_order() {
        let call = MethodCall::new(BEHAVIOR_TREE_TYPE, SET_CURRENT_NODE_SIGNATURE)
            .with_arg(MethodArg::U64(42))
            .with_arg(MethodArg::U32(1))
            .with_arg(MethodArg::Object(None));
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.args[0], MethodArg::U64(42));
    }
}
