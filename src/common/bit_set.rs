const WORD_BITS: usize = 64;

/// A fixed-length sequence of bits backed by a `u64` word array.
///
/// `BoolMap` keeps one bit per table slot here, indexed in lock-step with the
/// key slot array. Resizing happens only as part of a table rehash, where a
/// fresh `BitSet` is allocated together with the new key array.
#[derive(Clone, Default)]
pub(crate) struct BitSet {
    words: Box<[u64]>,
    len: usize,
}

impl BitSet {
    /// Creates a bit set of `len` bits, all zero.
    pub(crate) fn new(len: usize) -> Self {
        let n_words = (len + WORD_BITS - 1) / WORD_BITS;
        Self {
            words: vec![0; n_words].into_boxed_slice(),
            len,
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub(crate) fn get(&self, index: usize) -> bool {
        assert!(index < self.len, "bit index {index} out of range");
        self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Sets the bit at `index` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub(crate) fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.len, "bit index {index} out of range");
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            self.words[index / WORD_BITS] |= mask;
        } else {
            self.words[index / WORD_BITS] &= !mask;
        }
    }

    /// Clears every bit without changing the length.
    pub(crate) fn clear_all(&mut self) {
        for word in self.words.iter_mut() {
            *word = 0;
        }
    }
}
