//! Engine-managed object references and the dense tables that hold them.
//!
//! The engine parks actions and transitions in contiguous object arrays
//! addressed by dense indices. A slot can be empty: an action that exists in
//! the class data but has not been instantiated yet resolves to nothing, and
//! callers are expected to tolerate that ("absent", never an error).

use crate::index::SlotIndex;

/// Opaque reference to an engine-managed object.
///
/// Identity (`id`) is the engine's managed-object address/handle; `class` is
/// the managed type name, kept for tooling display. Two references are the
/// same object iff their ids match.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManagedRef {
    id: u64,
    class: String,
}

impl ManagedRef {
    pub fn new(id: u64, class: impl Into<String>) -> Self {
        Self {
            id,
            class: class.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn class(&self) -> &str {
        &self.class
    }
}

/// Dense table of object slots addressed by unsigned index.
///
/// Slots hold `Option<ManagedRef>` so a not-yet-loaded entry keeps its
/// position. Lookups are bounds-checked; out-of-range is absence, not an
/// error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTable {
    slots: Vec<Option<ManagedRef>>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table where every slot is occupied.
    pub fn from_objects(objects: impl IntoIterator<Item = ManagedRef>) -> Self {
        Self {
            slots: objects.into_iter().map(Some).collect(),
        }
    }

    /// Bounds-checked slot access; `None` for out-of-range or empty slots.
    pub fn get(&self, index: u32) -> Option<&ManagedRef> {
        self.slots.get(index as usize)?.as_ref()
    }

    /// Number of slots, occupied or not.
    pub fn count(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends a slot, returning its index.
    pub fn push(&mut self, object: Option<ManagedRef>) -> u32 {
        self.slots.push(object);
        self.slots.len() as u32 - 1
    }

    /// Overwrites an existing slot; out-of-range is ignored.
    pub fn set(&mut self, index: u32, object: Option<ManagedRef>) {
        if let Some(slot) = self.slots.get_mut(index as usize) {
            *slot = object;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&ManagedRef>> {
        self.slots.iter().map(Option::as_ref)
    }
}

/// Resolves a decoded slot index against a static/dynamic table pair.
///
/// The static branch consults only `static_table`; the dynamic branch only
/// `dynamic_table`. Which dynamic table to pass is the caller's policy
/// decision.
pub fn resolve<'a>(
    index: SlotIndex,
    static_table: Option<&'a ObjectTable>,
    dynamic_table: Option<&'a ObjectTable>,
) -> Option<&'a ManagedRef> {
    match index {
        SlotIndex::Static(i) => static_table?.get(i),
        SlotIndex::Dynamic(i) => dynamic_table?.get(i),
    }
}
