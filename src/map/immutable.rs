use super::{iter::{Iter, Keys, Values}, BoolMap};
use crate::common::error::NotPresentError;

use std::{
    borrow::Borrow,
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash},
};

/// A read-only snapshot of a [`BoolMap`], produced by
/// [`BoolMap::to_immutable`].
///
/// The snapshot owns its own table; mutating the source map afterwards does
/// not affect it. Only read operations are exposed, all delegating to the
/// wrapped map.
pub struct ImmutableBoolMap<K, S = RandomState> {
    map: BoolMap<K, S>,
}

impl<K, S> ImmutableBoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub(crate) fn new(map: BoolMap<K, S>) -> Self {
        Self { map }
    }

    /// Returns the value stored for `key`, or `false` if the key is not
    /// present.
    pub fn get<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    /// Returns the value stored for `key`, or `if_absent` if the key is not
    /// present.
    pub fn get_if_absent<Q>(&self, key: &Q, if_absent: bool) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get_if_absent(key, if_absent)
    }

    /// Returns the value stored for `key`, or a [`NotPresentError`] if the
    /// key is not present.
    pub fn try_get<Q>(&self, key: &Q) -> Result<bool, NotPresentError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.try_get(key)
    }

    /// Returns `true` if the snapshot contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Converts the snapshot back into a mutable map.
    pub fn into_mutable(self) -> BoolMap<K, S> {
        self.map
    }
}

impl<K, S> ImmutableBoolMap<K, S> {
    /// Returns the number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the snapshot contains no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns `true` if any entry is mapped to `value`.
    pub fn contains_value(&self, value: bool) -> bool {
        self.map.contains_value(value)
    }

    /// Iterates over `(&key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_, K> {
        self.map.iter()
    }

    /// Iterates over the keys in slot order.
    pub fn keys(&self) -> Keys<'_, K> {
        self.map.keys()
    }

    /// Iterates over the values in slot order.
    pub fn values(&self) -> Values<'_, K> {
        self.map.values()
    }
}

impl<K, S> Clone for ImmutableBoolMap<K, S>
where
    K: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<K, S> PartialEq for ImmutableBoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<K, S> Eq for ImmutableBoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
}

impl<K, S> fmt::Debug for ImmutableBoolMap<K, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.map.fmt(f)
    }
}
