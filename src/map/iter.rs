use super::Slot;
use crate::common::bit_set::BitSet;

/// A borrowing iterator over the `(&key, value)` pairs of a `BoolMap`, in
/// current slot order.
pub struct Iter<'i, K> {
    slots: std::iter::Enumerate<std::slice::Iter<'i, Slot<K>>>,
    values: &'i BitSet,
}

impl<'i, K> Iter<'i, K> {
    pub(crate) fn new(keys: &'i [Slot<K>], values: &'i BitSet) -> Self {
        Self {
            slots: keys.iter().enumerate(),
            values,
        }
    }
}

impl<'i, K> Iterator for Iter<'i, K> {
    type Item = (&'i K, bool);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if let Slot::Occupied(key) = slot {
                return Some((key, self.values.get(index)));
            }
        }
        None
    }
}

/// A borrowing iterator over the keys of a `BoolMap`.
pub struct Keys<'i, K> {
    iter: Iter<'i, K>,
}

impl<'i, K> Keys<'i, K> {
    pub(crate) fn new(iter: Iter<'i, K>) -> Self {
        Self { iter }
    }
}

impl<'i, K> Iterator for Keys<'i, K> {
    type Item = &'i K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }
}

/// A borrowing iterator over the values of a `BoolMap`.
pub struct Values<'i, K> {
    iter: Iter<'i, K>,
}

impl<'i, K> Values<'i, K> {
    pub(crate) fn new(iter: Iter<'i, K>) -> Self {
        Self { iter }
    }
}

impl<'i, K> Iterator for Values<'i, K> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }
}

/// An owning iterator over the `(key, value)` pairs of a `BoolMap`.
pub struct IntoIter<K> {
    slots: std::iter::Enumerate<std::vec::IntoIter<Slot<K>>>,
    values: BitSet,
}

impl<K> IntoIter<K> {
    pub(crate) fn new(keys: Box<[Slot<K>]>, values: BitSet) -> Self {
        Self {
            slots: Vec::from(keys).into_iter().enumerate(),
            values,
        }
    }
}

impl<K> Iterator for IntoIter<K> {
    type Item = (K, bool);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, slot) in self.slots.by_ref() {
            if let Slot::Occupied(key) = slot {
                return Some((key, self.values.get(index)));
            }
        }
        None
    }
}
