//! The open-addressing key→bool hash map and its adapters.

pub(crate) mod bool_map;
mod builder;
mod immutable;
mod iter;
mod serial;

pub use bool_map::BoolMap;
pub use builder::BoolMapBuilder;
pub use immutable::ImmutableBoolMap;
pub use iter::{IntoIter, Iter, Keys, Values};
pub use serial::KeyCodec;

/// The state of one table slot.
///
/// The original Eclipse Collections implementation encodes these states with
/// reference-identity sentinel objects whose `equals`/`hashCode` throw to
/// surface corruption. An explicit discriminant makes the three states a
/// type-level fact instead, and corruption detection becomes an assertion on
/// the probe loop (see `BoolMap::probe`).
#[derive(Clone)]
pub(crate) enum Slot<K> {
    /// Never held an entry since the last rehash.
    Empty,
    /// Held an entry that was removed. Kept so probe sequences keep scanning
    /// past it, until a compaction rehash reclaims it.
    Tombstone,
    /// Holds a live key; the value lives in the parallel bit set.
    Occupied(K),
}

impl<K> Slot<K> {
    pub(crate) fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }
}
