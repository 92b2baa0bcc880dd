//! Bit-packed slot indices.
//!
//! Action and transition references inside tree node data are stored as
//! 32-bit indices with a discriminator packed into bit 30: when the bit is
//! set, the lower 28 bits address the *static* (class-level, read-only)
//! object table; when clear, the full value addresses a per-instance dynamic
//! table. The packed form is an external binary contract and must round-trip
//! bit-for-bit; everything in-process works on the decoded [`SlotIndex`].

/// Discriminator bit marking an index as static-table addressed.
pub const STATIC_FLAG: u32 = 1 << 30;

/// Mask extracting the static-table index from a static-flagged value.
pub const STATIC_INDEX_MASK: u32 = 0x0FFF_FFFF;

/// A decoded slot index: which table family it addresses, and where.
///
/// `Static` indices resolve against class-level tables shared by every
/// instance of the owning object's type. `Dynamic` indices resolve against
/// per-instance tables (which one is selected by [`SetupPolicy`]).
///
/// [`SetupPolicy`]: crate::tree::SetupPolicy
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotIndex {
    /// Addresses the static (class-level) table.
    Static(u32),
    /// Addresses a per-instance dynamic table.
    Dynamic(u32),
}

impl SlotIndex {
    /// Decodes a packed 32-bit index.
    #[inline]
    pub const fn decode(raw: u32) -> Self {
        if raw & STATIC_FLAG != 0 {
            Self::Static(raw & STATIC_INDEX_MASK)
        } else {
            Self::Dynamic(raw)
        }
    }

    /// Re-encodes into the packed wire form.
    ///
    /// For any `raw`, `SlotIndex::decode(raw).encode()` reproduces `raw`
    /// except for bits 28-29 and 31 of static-flagged values, which the
    /// engine never sets.
    #[inline]
    pub const fn encode(self) -> u32 {
        match self {
            Self::Static(index) => STATIC_FLAG | (index & STATIC_INDEX_MASK),
            Self::Dynamic(index) => index,
        }
    }

    /// Returns `true` for static-table indices.
    #[inline]
    pub const fn is_static(self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// The table-local index regardless of family.
    #[inline]
    pub const fn raw_index(self) -> u32 {
        match self {
            Self::Static(index) | Self::Dynamic(index) => index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_static_flagged() {
        let raw = STATIC_FLAG | 7;
        assert_eq!(SlotIndex::decode(raw), SlotIndex::Static(7));
    }

    #[test]
    fn decode_dynamic() {
        assert_eq!(SlotIndex::decode(42), SlotIndex::Dynamic(42));
    }

    #[test]
    fn static_mask_strips_high_bits() {
        // Bit 30 plus a 28-bit payload at its maximum.
        let raw = STATIC_FLAG | STATIC_INDEX_MASK;
        assert_eq!(
            SlotIndex::decode(raw),
            SlotIndex::Static(STATIC_INDEX_MASK)
        );
    }

    #[test]
    fn encode_round_trips() {
        for raw in [0, 1, 42, STATIC_FLAG, STATIC_FLAG | 7, STATIC_INDEX_MASK] {
            assert_eq!(SlotIndex::decode(raw).encode(), raw);
        }
    }

    #[test]
    fn dynamic_never_reports_static() {
        // Bit 29 alone is not a discriminator.
        let raw = 1 << 29;
        assert!(!SlotIndex::decode(raw).is_static());
        assert_eq!(SlotIndex::decode(raw).raw_index(), raw);
    }
}
