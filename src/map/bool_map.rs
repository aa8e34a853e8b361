use super::{
    iter::{IntoIter, Iter, Keys, Values},
    BoolMapBuilder, ImmutableBoolMap, Slot,
};
use crate::common::{bit_set::BitSet, error::NotPresentError};

use std::{
    borrow::Borrow,
    collections::hash_map::{DefaultHasher, RandomState},
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

/// The value reported for keys that are not present.
pub(crate) const EMPTY_VALUE: bool = false;

pub(crate) const DEFAULT_INITIAL_CAPACITY: usize = 8;

// A slot array of capacity `c` may hold at most `c / OCCUPIED_DATA_RATIO`
// live entries and `c / OCCUPIED_SENTINEL_RATIO` tombstones before a rehash
// is forced.
const OCCUPIED_DATA_RATIO: usize = 2;
const OCCUPIED_SENTINEL_RATIO: usize = 4;

// Probe displacements are 17 * n * (n + 1) / 2 for attempt n. For any
// power-of-two capacity the triangular numbers scaled by an odd constant
// visit every residue within one period of 2 * capacity attempts, which is
// what makes the corruption bound in `probe` sound.
const PROBE_STEP: usize = 17;

// The hash codes of `Boolean.TRUE` and `Boolean.FALSE` on the JVM; kept so
// the order-independent map hash matches the original design.
const TRUE_HASH: u64 = 1231;
const FALSE_HASH: u64 = 1237;

/// A hash map from keys to boolean values, with the values packed into a bit
/// set.
///
/// `BoolMap` stores every entry directly in one power-of-two slot array
/// (open addressing) and keeps the boolean values in a parallel bit set, so
/// the memory overhead per entry is close to one bit plus one key. Removals
/// leave tombstones which are reclaimed by a same-capacity rehash before they
/// can occupy more than a quarter of the table.
///
/// Reads of absent keys return `false` by default, mirroring the primitive
/// map design this is based on; use [`get_if_absent`](Self::get_if_absent) or
/// [`try_get`](Self::try_get) when absence must be distinguished from a
/// stored `false`.
///
/// # Examples
///
/// ```rust
/// use boolmap::BoolMap;
///
/// let mut seen = BoolMap::new();
/// seen.put("index.html", true);
/// seen.put("about.html", false);
///
/// assert!(seen.get("index.html"));
/// assert!(!seen.get("missing.html"));
/// assert_eq!(seen.len(), 2);
///
/// seen.update_value("about.html", false, |v| !v);
/// assert!(seen.get("about.html"));
/// ```
///
/// # Not thread-safe
///
/// `BoolMap` performs no internal synchronization. Every mutating operation
/// takes `&mut self`, so sharing a map across threads requires an external
/// lock that serializes all access.
pub struct BoolMap<K, S = RandomState> {
    keys: Box<[Slot<K>]>,
    values: BitSet,
    occupied_with_data: usize,
    occupied_with_sentinels: usize,
    build_hasher: S,
}

/// Where a probe ended up.
enum Probe {
    /// The key is present at this slot.
    Found(usize),
    /// The key is absent; this slot (Empty, or the first Tombstone seen) is
    /// the insertion target.
    Vacant(usize),
}

impl<K> BoolMap<K, RandomState>
where
    K: Hash + Eq,
{
    /// Constructs a new `BoolMap<K>` with the default initial capacity.
    pub fn new() -> Self {
        Self::with_everything(None, RandomState::default())
    }

    /// Constructs a new `BoolMap<K>` pre-sized so that `capacity` entries can
    /// be inserted without triggering a growth rehash.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_everything(Some(capacity), RandomState::default())
    }

    /// Returns a [`BoolMapBuilder`], which can build a `BoolMap` with various
    /// configuration knobs.
    pub fn builder() -> BoolMapBuilder<BoolMap<K, RandomState>> {
        BoolMapBuilder::default()
    }

    /// Constructs a new `BoolMap<K>` holding the same entries as `map`,
    /// pre-sized from its current size.
    pub fn from_map<S2>(map: &BoolMap<K, S2>) -> Self
    where
        K: Clone,
        S2: BuildHasher,
    {
        let mut result = Self::with_capacity(map.len().max(DEFAULT_INITIAL_CAPACITY));
        result.put_all(map);
        result
    }
}

impl<K> Default for BoolMap<K, RandomState>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

//
// public
//
impl<K, S> BoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    pub(crate) fn with_everything(initial_capacity: Option<usize>, build_hasher: S) -> Self {
        let capacity = match initial_capacity {
            Some(n) => table_capacity_for(n),
            // Pre-doubled so the first few insertions do not grow the table.
            None => DEFAULT_INITIAL_CAPACITY << 1,
        };
        Self::allocate(capacity, build_hasher)
    }

    /// Returns the value stored for `key`, or `false` if the key is not
    /// present.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form _must_ match those for the key type.
    pub fn get<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_if_absent(key, EMPTY_VALUE)
    }

    /// Returns the value stored for `key`, or `if_absent` if the key is not
    /// present.
    pub fn get_if_absent<Q>(&self, key: &Q, if_absent: bool) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Found(index) => self.values.get(index),
            Probe::Vacant(_) => if_absent,
        }
    }

    /// Returns the value stored for `key`, or a [`NotPresentError`] if the
    /// key is not present.
    pub fn try_get<Q>(&self, key: &Q) -> Result<bool, NotPresentError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Found(index) => Ok(self.values.get(index)),
            Probe::Vacant(_) => Err(NotPresentError),
        }
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        matches!(self.probe(key), Probe::Found(_))
    }

    /// Inserts a key-value pair into the map, overwriting the value if the
    /// key is already present.
    pub fn put(&mut self, key: K, value: bool) {
        match self.probe(&key) {
            Probe::Found(index) => self.values.set(index, value),
            Probe::Vacant(index) => self.add_key_value_at_index(key, value, index),
        }
    }

    /// Applies [`put`](Self::put) for every entry of `map`, in `map`'s
    /// iteration order.
    pub fn put_all<S2>(&mut self, map: &BoolMap<K, S2>)
    where
        K: Clone,
        S2: BuildHasher,
    {
        for (key, value) in map.iter() {
            self.put(key.clone(), value);
        }
    }

    /// Removes `key` from the map. Does nothing if the key is not present.
    pub fn remove_key<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Probe::Found(index) = self.probe(key) {
            self.remove_key_at_index(index);
        }
    }

    /// Removes `key` and returns the value it was mapped to, or `if_absent`
    /// if the key was not present.
    pub fn remove_key_if_absent<Q>(&mut self, key: &Q, if_absent: bool) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.probe(key) {
            Probe::Found(index) => {
                let old_value = self.values.get(index);
                self.remove_key_at_index(index);
                old_value
            }
            Probe::Vacant(_) => if_absent,
        }
    }

    /// Returns the value stored for `key` if present; otherwise stores
    /// `value` for it and returns `value`.
    pub fn get_if_absent_put(&mut self, key: K, value: bool) -> bool {
        match self.probe(&key) {
            Probe::Found(index) => self.values.get(index),
            Probe::Vacant(index) => {
                self.add_key_value_at_index(key, value, index);
                value
            }
        }
    }

    /// Returns the value stored for `key` if present; otherwise computes a
    /// value with `f`, stores it and returns it.
    ///
    /// `f` is called at most once, and only when the key is absent.
    pub fn get_if_absent_put_with(&mut self, key: K, f: impl FnOnce() -> bool) -> bool {
        match self.probe(&key) {
            Probe::Found(index) => self.values.get(index),
            Probe::Vacant(index) => {
                let value = f();
                self.add_key_value_at_index(key, value, index);
                value
            }
        }
    }

    /// Like [`get_if_absent_put_with`](Self::get_if_absent_put_with), but the
    /// closure receives a reference to the key being inserted.
    pub fn get_if_absent_put_with_key(&mut self, key: K, f: impl FnOnce(&K) -> bool) -> bool {
        match self.probe(&key) {
            Probe::Found(index) => self.values.get(index),
            Probe::Vacant(index) => {
                let value = f(&key);
                self.add_key_value_at_index(key, value, index);
                value
            }
        }
    }

    /// Replaces the value stored for `key` with `f(old)` if present;
    /// otherwise stores `f(initial_value_if_absent)`. Returns the new value
    /// either way.
    pub fn update_value(
        &mut self,
        key: K,
        initial_value_if_absent: bool,
        f: impl FnOnce(bool) -> bool,
    ) -> bool {
        match self.probe(&key) {
            Probe::Found(index) => {
                let new_value = f(self.values.get(index));
                self.values.set(index, new_value);
                new_value
            }
            Probe::Vacant(index) => {
                let value = f(initial_value_if_absent);
                self.add_key_value_at_index(key, value, index);
                value
            }
        }
    }

    /// Inserts a key-value pair and returns the map, for chained
    /// construction.
    pub fn with_key_value(mut self, key: K, value: bool) -> Self {
        self.put(key, value);
        self
    }

    /// Removes a key and returns the map, for chained construction.
    pub fn without_key<Q>(mut self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_key(key);
        self
    }

    /// Returns a new map containing only the entries that satisfy
    /// `predicate`. The receiver is not mutated.
    pub fn select(&self, mut predicate: impl FnMut(&K, bool) -> bool) -> BoolMap<K, S>
    where
        K: Clone,
        S: Clone,
    {
        let mut result = BoolMap::with_everything(None, self.build_hasher.clone());
        for (key, value) in self.iter() {
            if predicate(key, value) {
                result.put(key.clone(), value);
            }
        }
        result
    }

    /// Returns a new map containing only the entries that do _not_ satisfy
    /// `predicate`. The receiver is not mutated.
    pub fn reject(&self, mut predicate: impl FnMut(&K, bool) -> bool) -> BoolMap<K, S>
    where
        K: Clone,
        S: Clone,
    {
        self.select(|key, value| !predicate(key, value))
    }

    /// Returns a read-only snapshot of the current entries. Subsequent
    /// mutation of this map does not affect the snapshot.
    pub fn to_immutable(&self) -> ImmutableBoolMap<K, S>
    where
        K: Clone,
        S: Clone,
    {
        ImmutableBoolMap::new(self.clone())
    }
}

// Operations that need no key bounds.
impl<K, S> BoolMap<K, S> {
    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.occupied_with_data
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.occupied_with_data == 0
    }

    /// Returns `true` if the map contains at least one entry.
    pub fn not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Returns `true` if any entry is mapped to `value`. This is a linear
    /// scan over the table.
    pub fn contains_value(&self, value: bool) -> bool {
        self.iter().any(|(_, v)| v == value)
    }

    /// Removes every entry. Keeps the current capacity.
    pub fn clear(&mut self) {
        self.occupied_with_data = 0;
        self.occupied_with_sentinels = 0;
        for slot in self.keys.iter_mut() {
            *slot = Slot::Empty;
        }
        self.values.clear_all();
    }

    /// Iterates over `(&key, value)` pairs in current slot order.
    ///
    /// The order is unspecified and may change after any mutation, but a
    /// single call visits every entry exactly once.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.keys, &self.values)
    }

    /// Iterates over the keys in current slot order.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys::new(self.iter())
    }

    /// Iterates over the values in current slot order.
    pub fn values(&self) -> Values<'_, K> {
        Values::new(self.iter())
    }
}

//
// private
//
impl<K, S> BoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn allocate(capacity: usize, build_hasher: S) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            keys: new_slot_array(capacity),
            values: BitSet::new(capacity),
            occupied_with_data: 0,
            occupied_with_sentinels: 0,
            build_hasher,
        }
    }

    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        let mut hasher = self.build_hasher.build_hasher();
        key.hash(&mut hasher);
        hasher.finish()
    }

    /// Mixes a hash code down to a starting slot index. The shift constants
    /// bound the collisions caused by hash codes that differ only in high
    /// bits.
    #[inline]
    fn spread<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        let hash = self.hash(key);
        let mut h = (hash ^ (hash >> 32)) as u32;
        h ^= (h >> 20) ^ (h >> 12);
        h ^= (h >> 7) ^ (h >> 4);
        h as usize & (self.keys.len() - 1)
    }

    /// Finds the slot holding `key`, or the slot an insertion of `key`
    /// should use. Tombstones are scanned past, and the first one seen is
    /// preferred as the insertion target so sentinel slots get reused.
    ///
    /// # Panics
    ///
    /// The displacement sequence provably visits every slot of a
    /// power-of-two table within `2 * capacity` attempts, and the growth
    /// policy guarantees at least one Empty slot. Exhausting the bound
    /// therefore means the table invariants no longer hold — most likely the
    /// single-writer discipline was defeated (e.g. via unsynchronized
    /// `unsafe` aliasing) — and the map cannot be trusted, so this panics
    /// rather than corrupting data silently.
    fn probe<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mask = self.keys.len() - 1;
        let index = self.spread(key);

        let mut removed_index = None;
        match &self.keys[index] {
            Slot::Empty => return Probe::Vacant(index),
            Slot::Tombstone => removed_index = Some(index),
            Slot::Occupied(k) if k.borrow() == key => return Probe::Found(index),
            Slot::Occupied(_) => {}
        }

        let mut next_index = index;
        let mut step = PROBE_STEP;

        // Displacement for attempt n is 17 * n * (n + 1) / 2.
        for _ in 0..2 * self.keys.len() {
            next_index = (next_index + step) & mask;
            step += PROBE_STEP;

            match &self.keys[next_index] {
                Slot::Empty => return Probe::Vacant(removed_index.unwrap_or(next_index)),
                Slot::Tombstone => {
                    if removed_index.is_none() {
                        removed_index = Some(next_index);
                    }
                }
                Slot::Occupied(k) if k.borrow() == key => return Probe::Found(next_index),
                Slot::Occupied(_) => {}
            }
        }

        panic!(
            "no empty slot found within {} probe attempts of a table of capacity {}; \
             the map is corrupted and must be discarded (was it mutated concurrently \
             without synchronization?)",
            2 * self.keys.len(),
            self.keys.len(),
        );
    }

    fn add_key_value_at_index(&mut self, key: K, value: bool, index: usize) {
        if self.keys[index].is_tombstone() {
            self.occupied_with_sentinels -= 1;
        }
        self.keys[index] = Slot::Occupied(key);
        self.values.set(index, value);
        self.occupied_with_data += 1;
        if self.occupied_with_data > self.max_occupied_with_data() {
            self.rehash_and_grow();
        }
    }

    fn remove_key_at_index(&mut self, index: usize) {
        self.keys[index] = Slot::Tombstone;
        self.values.set(index, EMPTY_VALUE);
        self.occupied_with_data -= 1;
        self.occupied_with_sentinels += 1;
        if self.occupied_with_sentinels > self.max_occupied_with_sentinels() {
            // Same-capacity rehash, purely to reclaim tombstone slots.
            self.rehash(self.keys.len());
        }
    }

    fn max_occupied_with_data(&self) -> usize {
        let capacity = self.keys.len();
        // need at least one free slot for open addressing
        (capacity - 1).min(capacity / OCCUPIED_DATA_RATIO)
    }

    fn max_occupied_with_sentinels(&self) -> usize {
        self.keys.len() / OCCUPIED_SENTINEL_RATIO
    }

    fn rehash_and_grow(&mut self) {
        self.rehash(self.keys.len() << 1);
    }

    /// Replaces the table wholesale: allocates fresh arrays at
    /// `new_capacity`, reinserts every Occupied entry through the normal
    /// insertion path, and drops all tombstones.
    fn rehash(&mut self, new_capacity: usize) {
        #[cfg(feature = "logging")]
        log::trace!(
            "rehashing a BoolMap from capacity {} to {} ({} live entries, {} tombstones)",
            self.keys.len(),
            new_capacity,
            self.occupied_with_data,
            self.occupied_with_sentinels,
        );

        let old_keys = std::mem::replace(&mut self.keys, new_slot_array(new_capacity));
        let old_values = std::mem::replace(&mut self.values, BitSet::new(new_capacity));
        self.occupied_with_data = 0;
        self.occupied_with_sentinels = 0;

        for (index, slot) in Vec::from(old_keys).into_iter().enumerate() {
            if let Slot::Occupied(key) = slot {
                self.put(key, old_values.get(index));
            }
        }
    }
}

fn new_slot_array<K>(capacity: usize) -> Box<[Slot<K>]> {
    (0..capacity).map(|_| Slot::Empty).collect()
}

/// Table capacity for holding `n` entries: the smallest power of two that
/// keeps the load at or below one half, floored at the minimum capacity.
pub(crate) fn table_capacity_for(n: usize) -> usize {
    (n.saturating_mul(OCCUPIED_DATA_RATIO))
        .next_power_of_two()
        .max(DEFAULT_INITIAL_CAPACITY)
}

impl<K, S> Clone for BoolMap<K, S>
where
    K: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            values: self.values.clone(),
            occupied_with_data: self.occupied_with_data,
            occupied_with_sentinels: self.occupied_with_sentinels,
            build_hasher: self.build_hasher.clone(),
        }
    }
}

impl<K, S> PartialEq for BoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(key, value)| other.try_get(key) == Ok(value))
    }
}

impl<K, S> Eq for BoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
}

impl<K, S> Hash for BoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// An order-independent hash: the wrapping sum over entries of the key's
    /// hash combined with a fixed per-value salt. A deterministic hasher is
    /// used for the keys so that equal maps hash equal regardless of each
    /// map's own hasher seed.
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut sum = 0u64;
        for (key, value) in self.iter() {
            let mut hasher = DefaultHasher::new();
            key.hash(&mut hasher);
            let salt = if value { TRUE_HASH } else { FALSE_HASH };
            sum = sum.wrapping_add(hasher.finish() ^ salt);
        }
        state.write_u64(sum);
    }
}

impl<K, S> fmt::Debug for BoolMap<K, S>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, S> Extend<(K, bool)> for BoolMap<K, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<T: IntoIterator<Item = (K, bool)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K> FromIterator<(K, bool)> for BoolMap<K, RandomState>
where
    K: Hash + Eq,
{
    fn from_iter<T: IntoIterator<Item = (K, bool)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'i, K, S> IntoIterator for &'i BoolMap<K, S> {
    type Item = (&'i K, bool);
    type IntoIter = Iter<'i, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S> IntoIterator for BoolMap<K, S> {
    type Item = (K, bool);
    type IntoIter = IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.keys, self.values)
    }
}

//
// for testing
//
#[cfg(test)]
impl<K, S> BoolMap<K, S> {
    pub(crate) fn capacity(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn data_count(&self) -> usize {
        self.occupied_with_data
    }

    pub(crate) fn sentinel_count(&self) -> usize {
        self.occupied_with_sentinels
    }
}

// To see the debug prints, run test as `cargo test -- --nocapture`
#[cfg(test)]
mod tests {
    use super::{table_capacity_for, BoolMap, PROBE_STEP};
    use crate::common::error::NotPresentError;

    use std::{
        collections::hash_map::{DefaultHasher, RandomState},
        collections::HashSet,
        hash::{Hash, Hasher},
    };

    fn hash_of<K, S>(map: &BoolMap<K, S>) -> u64
    where
        K: Hash + Eq,
        S: std::hash::BuildHasher,
    {
        let mut hasher = DefaultHasher::new();
        // Fully qualified so the `Hash` impl is used rather than the map's
        // private inherent key-hashing helper.
        Hash::hash(map, &mut hasher);
        hasher.finish()
    }

    #[test]
    fn basic_single_thread() {
        let mut map = BoolMap::new();
        assert!(map.is_empty());
        assert!(!map.not_empty());

        map.put("a", true);
        map.put("b", false);
        assert!(map.get("a"));
        assert!(!map.get("b"));
        assert!(!map.get("c"));
        assert!(map.get_if_absent("c", true));
        assert_eq!(map.len(), 2);
        assert!(map.not_empty());

        // Overwrite does not change the size.
        map.put("a", false);
        assert!(!map.get("a"));
        assert_eq!(map.len(), 2);

        map.remove_key("a");
        assert!(!map.contains_key("a"));
        assert!(!map.get("a"));
        assert_eq!(map.len(), 1);

        // Removing an absent key is a no-op.
        map.remove_key("zzz");
        assert_eq!(map.len(), 1);
    }

    // The scenario spelled out for the original implementation: put "a" and
    // "b", read a hit, a default miss, then remove "a".
    #[test]
    fn put_get_remove_scenario() {
        let mut map = BoolMap::new();
        map.put("a", true);
        map.put("b", false);
        assert!(map.get("a"));
        assert!(!map.get_if_absent("c", false));
        map.remove_key("a");
        assert!(!map.contains_key("a"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn try_get() {
        let mut map = BoolMap::new();
        map.put(7u32, false);
        assert_eq!(map.try_get(&7), Ok(false));
        assert_eq!(map.try_get(&8), Err(NotPresentError));
    }

    #[test]
    fn remove_key_if_absent() {
        let mut map = BoolMap::new();
        map.put("x", true);
        assert!(map.remove_key_if_absent("x", false));
        assert!(!map.contains_key("x"));
        // Now absent, so the caller-supplied default comes back.
        assert!(map.remove_key_if_absent("x", true));
    }

    #[test]
    fn get_if_absent_put_invokes_supplier_once() {
        let mut map = BoolMap::new();
        let mut calls = 0;

        let v = map.get_if_absent_put_with("k", || {
            calls += 1;
            true
        });
        assert!(v);
        assert_eq!(calls, 1);

        // Present now, so the supplier must not run again.
        let v = map.get_if_absent_put_with("k", || {
            calls += 1;
            false
        });
        assert!(v);
        assert_eq!(calls, 1);

        assert!(map.get_if_absent_put("k", false));
        assert!(!map.get_if_absent_put("k2", false));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn get_if_absent_put_with_key() {
        let mut map = BoolMap::new();
        let v = map.get_if_absent_put_with_key("even?", |k| k.len() % 2 == 0);
        assert!(!v);
        assert!(!map.get("even?"));
    }

    #[test]
    fn update_value() {
        let mut map = BoolMap::new();

        // Absent: f(initial) is stored and returned.
        assert!(map.update_value("n", false, |v| !v));
        assert!(map.get("n"));

        // Present: f(old) replaces the stored value.
        assert!(!map.update_value("n", false, |v| !v));
        assert!(!map.get("n"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn contains_value_scans() {
        let mut map = BoolMap::new();
        assert!(!map.contains_value(true));
        assert!(!map.contains_value(false));

        map.put(1, true);
        assert!(map.contains_value(true));
        assert!(!map.contains_value(false));

        map.put(2, false);
        assert!(map.contains_value(false));
    }

    #[test]
    fn put_all_and_extend() {
        let mut a = BoolMap::new();
        a.put("a", true);
        a.put("b", false);

        let mut b = BoolMap::new();
        b.put("b", true);
        b.put_all(&a);

        // put_all applies put per entry, so "b" was overwritten.
        assert_eq!(b.len(), 2);
        assert!(b.get("a"));
        assert!(!b.get("b"));

        b.extend([("c", true), ("c", false)]);
        assert_eq!(b.len(), 3);
        assert!(!b.get("c"));
    }

    #[test]
    fn from_map_copies() {
        let source: BoolMap<_> = [("a", true), ("b", false)].into_iter().collect();
        let copy = BoolMap::from_map(&source);
        assert_eq!(copy, source);
    }

    #[test]
    fn with_key_value_chaining() {
        let map = BoolMap::new()
            .with_key_value("a", true)
            .with_key_value("b", false)
            .without_key("a");
        assert_eq!(map.len(), 1);
        assert!(!map.get("b"));
    }

    #[test]
    fn select_and_reject() {
        let map: BoolMap<_> = (0..10).map(|i| (i, i % 2 == 0)).collect();

        let evens = map.select(|_, v| v);
        let odds = map.reject(|_, v| v);

        assert_eq!(evens.len(), 5);
        assert_eq!(odds.len(), 5);
        assert!(evens.get(&4));
        assert!(!evens.contains_key(&3));
        assert!(odds.contains_key(&3));
        // The receiver was not mutated.
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn to_immutable_is_a_snapshot() {
        let mut map = BoolMap::new();
        map.put("a", true);

        let snapshot = map.to_immutable();
        map.put("b", true);
        map.remove_key("a");

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("a"));
        assert!(!snapshot.contains_key("b"));
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut map: BoolMap<_> = (0..100).map(|i| (i, true)).collect();
        let capacity = map.capacity();

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert_eq!(map.sentinel_count(), 0);

        // The table is usable after clearing.
        map.put(42, true);
        assert!(map.get(&42));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn iteration_visits_each_entry_once() {
        let mut map = BoolMap::new();
        for i in 0..50 {
            map.put(i, i % 3 == 0);
        }

        let mut seen = HashSet::new();
        for (k, v) in map.iter() {
            assert!(seen.insert(*k), "key {k} visited twice");
            assert_eq!(v, k % 3 == 0);
        }
        assert_eq!(seen.len(), 50);

        assert_eq!(map.keys().count(), 50);
        assert_eq!(map.values().filter(|v| *v).count(), 17);

        let owned: Vec<(i32, bool)> = map.into_iter().collect();
        assert_eq!(owned.len(), 50);
    }

    #[test]
    fn size_tracks_distinct_keys() {
        let mut map = BoolMap::new();
        let mut live = HashSet::new();

        // A mixed put/remove sequence; len() must always equal the number of
        // distinct keys logically present.
        for i in 0..1000 {
            let key = i % 37;
            if i % 5 == 0 {
                map.remove_key(&key);
                live.remove(&key);
            } else {
                map.put(key, i % 2 == 0);
                live.insert(key);
            }
            assert_eq!(map.len(), live.len());
        }
    }

    #[test]
    fn growth_stress() {
        let mut map = BoolMap::new();
        for i in 0..10_000 {
            map.put(i, i % 2 == 0);
            assert!(
                map.data_count() <= map.capacity() / 2,
                "load factor ceiling exceeded at entry {i}: {} > {}",
                map.data_count(),
                map.capacity() / 2,
            );
        }
        assert_eq!(map.len(), 10_000);
        for i in 0..10_000 {
            assert_eq!(map.get(&i), i % 2 == 0, "key {i}");
        }
    }

    #[test]
    fn tombstones_are_reclaimed() {
        const N: i32 = 100;

        let mut map = BoolMap::new();
        for i in 0..N {
            map.put(i, true);
        }
        let grown_capacity = map.capacity();

        for i in 0..N {
            map.remove_key(&i);
            assert!(
                map.sentinel_count() <= map.capacity() / 4,
                "tombstone ceiling exceeded after removing {i}",
            );
        }
        assert!(map.is_empty());

        // Delete/insert churn must not grow the table: the new keys land in
        // reclaimed slots.
        for i in N..2 * N {
            map.put(i, false);
        }
        assert_eq!(map.len(), N as usize);
        assert_eq!(map.capacity(), grown_capacity);
    }

    #[test]
    fn tombstone_slots_are_reused_on_insert() {
        let mut map = BoolMap::with_capacity(16);
        for i in 0..10 {
            map.put(i, true);
        }
        map.remove_key(&3);
        let sentinels = map.sentinel_count();
        assert_eq!(sentinels, 1);

        // Re-inserting the removed key reuses its tombstone slot.
        map.put(3, false);
        assert_eq!(map.sentinel_count(), 0);
        assert!(!map.get(&3));
    }

    #[test]
    fn equality_and_hash_are_order_independent() {
        let forward: BoolMap<_> = [("a", true), ("b", false), ("c", true)].into_iter().collect();
        let backward: BoolMap<_> = [("c", true), ("b", false), ("a", true)].into_iter().collect();

        assert_eq!(forward, backward);
        assert_eq!(hash_of(&forward), hash_of(&backward));

        let smaller: BoolMap<_> = [("a", true), ("b", false)].into_iter().collect();
        assert_ne!(forward, smaller);

        let different_value: BoolMap<_> =
            [("a", true), ("b", true), ("c", true)].into_iter().collect();
        assert_ne!(forward, different_value);
    }

    #[test]
    fn debug_format() {
        let map: BoolMap<_> = [("a", true)].into_iter().collect();
        assert_eq!(format!("{map:?}"), r#"{"a": true}"#);
    }

    /// A missing-key concept from languages with nullable keys maps onto
    /// `Option<K>`: `None` is an ordinary key with its own slot and bit.
    #[test]
    fn option_keys_model_a_null_key() {
        let mut map = BoolMap::new();
        map.put(None, true);
        map.put(Some("a"), false);

        assert!(map.get(&None));
        assert!(!map.get(&Some("a")));
        assert_eq!(map.len(), 2);

        // Overwriting `None` behaves like any other key.
        map.put(None, false);
        assert!(!map.get(&None));
        assert_eq!(map.len(), 2);

        map.remove_key(&None);
        assert!(!map.contains_key(&None));
        assert!(!map.get(&None));
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&Some("a")));
    }

    #[test]
    fn default_and_explicit_capacities() {
        let map: BoolMap<u32> = BoolMap::new();
        assert_eq!(map.capacity(), 16);

        assert_eq!(BoolMap::<u32>::with_capacity(0).capacity(), 8);
        assert_eq!(BoolMap::<u32>::with_capacity(4).capacity(), 8);
        assert_eq!(BoolMap::<u32>::with_capacity(5).capacity(), 16);
        assert_eq!(BoolMap::<u32>::with_capacity(100).capacity(), 256);
    }

    #[test]
    fn table_capacity_is_a_power_of_two() {
        for n in 0..200 {
            let capacity = table_capacity_for(n);
            assert!(capacity.is_power_of_two());
            assert!(capacity >= 8);
            assert!(capacity >= n * 2);
        }
    }

    #[test]
    fn with_capacity_avoids_growth() {
        let mut map = BoolMap::with_capacity(1000);
        let capacity = map.capacity();
        for i in 0..1000 {
            map.put(i, true);
        }
        assert_eq!(map.capacity(), capacity);
    }

    /// All keys hash to the same bucket, forcing the probe sequence to walk
    /// collisions up to the load-factor ceiling.
    #[test]
    fn colliding_keys() {
        #[derive(PartialEq, Eq, Clone)]
        struct Colliding(u32);

        impl Hash for Colliding {
            fn hash<H: Hasher>(&self, state: &mut H) {
                state.write_u64(0);
            }
        }

        let mut map = BoolMap::new();
        for i in 0..500 {
            map.put(Colliding(i), i % 2 == 0);
        }
        assert_eq!(map.len(), 500);
        for i in 0..500 {
            assert_eq!(map.get(&Colliding(i)), i % 2 == 0, "key {i}");
        }

        for i in (0..500).step_by(2) {
            map.remove_key(&Colliding(i));
        }
        assert_eq!(map.len(), 250);
        for i in 0..500 {
            assert_eq!(map.contains_key(&Colliding(i)), i % 2 != 0, "key {i}");
        }
    }

    /// The displacement sequence `17 * n * (n + 1) / 2 mod capacity` must
    /// reach every slot of a power-of-two table within `2 * capacity`
    /// attempts; the probe loop's corruption bound relies on this.
    #[test]
    fn probe_sequence_covers_every_slot() {
        for exponent in 3..=12 {
            let capacity: usize = 1 << exponent;
            let mask = capacity - 1;

            let mut visited = HashSet::new();
            visited.insert(0usize);

            let mut index = 0usize;
            let mut step = PROBE_STEP;
            for _ in 0..2 * capacity {
                index = (index + step) & mask;
                step += PROBE_STEP;
                visited.insert(index);
            }

            assert_eq!(visited.len(), capacity, "capacity {capacity}");
        }
    }

    #[test]
    fn works_with_a_custom_hasher() {
        let mut map: BoolMap<String, ahash::RandomState> =
            BoolMap::builder().build_with_hasher(ahash::RandomState::default());
        for i in 0..100 {
            map.put(format!("key-{i}"), i % 2 == 0);
        }
        assert_eq!(map.len(), 100);
        assert!(map.get("key-42"));
        assert!(!map.get("key-43"));

        // Equal to a sibling map built with the std hasher.
        let std_map: BoolMap<String, RandomState> = map.iter().map(|(k, v)| (k.clone(), v)).collect();
        assert_eq!(std_map.len(), 100);
    }
}
