use super::BoolMap;

use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
};

/// Builds a [`BoolMap`][map-struct] with various configuration knobs.
///
/// [map-struct]: ./struct.BoolMap.html
///
/// # Examples
///
/// ```rust
/// use boolmap::BoolMap;
///
/// let mut map = BoolMap::builder()
///     // Room for 1,000 entries without a growth rehash.
///     .initial_capacity(1_000)
///     .build();
///
/// for i in 0..1_000u32 {
///     map.put(i, i % 2 == 0);
/// }
/// assert_eq!(map.len(), 1_000);
/// ```
pub struct BoolMapBuilder<C> {
    initial_capacity: Option<usize>,
    map_type: PhantomData<C>,
}

impl<C> Default for BoolMapBuilder<C> {
    fn default() -> Self {
        Self {
            initial_capacity: None,
            map_type: PhantomData,
        }
    }
}

impl<K> BoolMapBuilder<BoolMap<K, RandomState>>
where
    K: Hash + Eq,
{
    /// Builds a `BoolMap<K>`.
    pub fn build(self) -> BoolMap<K, RandomState> {
        BoolMap::with_everything(self.initial_capacity, RandomState::default())
    }

    /// Builds a `BoolMap<K, S>` with the given `hasher`.
    pub fn build_with_hasher<S>(self, hasher: S) -> BoolMap<K, S>
    where
        S: BuildHasher,
    {
        BoolMap::with_everything(self.initial_capacity, hasher)
    }
}

impl<C> BoolMapBuilder<C> {
    /// Sets the initial capacity (the number of entries the map holds before
    /// its first growth rehash). The underlying table is sized to the
    /// smallest power of two that keeps the load at or below one half.
    pub fn initial_capacity(self, capacity: usize) -> Self {
        Self {
            initial_capacity: Some(capacity),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BoolMap;

    #[test]
    fn build_infers_the_key_type() {
        // No turbofish: `K` is inferred from how the map is used.
        let mut map = BoolMap::builder().initial_capacity(10).build();
        map.put("a", true);
        assert!(map.get("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn initial_capacity_presizes_the_table() {
        let mut map: BoolMap<u32> = BoolMap::builder().initial_capacity(100).build();
        assert_eq!(map.capacity(), 256);

        for i in 0..100 {
            map.put(i, true);
        }
        assert_eq!(map.capacity(), 256);
    }

    #[test]
    fn build_with_hasher() {
        let mut map: BoolMap<&str, ahash::RandomState> = BoolMap::builder()
            .initial_capacity(8)
            .build_with_hasher(ahash::RandomState::default());
        map.put("a", true);
        assert!(map.get("a"));
    }
}
