//! Single-slot memoization owned by the caller.

/// Holds the last computed value with the key it was computed for.
///
/// Example:
/// let mut memo = Memo::default();
/// assert_eq!(*memo.get_or_compute(1u64, || 10), 10);
/// assert_eq!(*memo.get_or_compute(1u64, || 20), 10);
#[derive(Clone, Debug)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    computations: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    /// Cached value for `key`, running `compute` only when the key changed.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        let stale = !matches!(&self.slot, Some((k, _)) if *k == key);
        if stale {
            self.computations += 1;
            self.slot = None;
        }
        let (_, value) = self.slot.get_or_insert_with(|| (key, compute()));
        value
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// How many times a value has been computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
