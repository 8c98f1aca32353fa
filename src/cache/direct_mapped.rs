//! Direct-mapped operation cache.
//!
//! Every key maps to exactly one slot and a newer entry simply overwrites the
//! older one. Each slot is stamped with the epoch it was written in; clearing
//! starts a new epoch, so the whole cache is invalidated in O(1).

use std::collections::TryReserveError;

use crate::utils::MyHash;

struct Slot<K, V> {
    key: K,
    value: V,
    epoch: u64,
}

/// A fixed-size direct-mapped cache with `2^bits` slots.
///
/// ```ignore
/// let mut cache = DirectMappedCache::<(u64, u64), i32>::new(4).unwrap();
/// cache.insert((1, 2), 42);
/// assert_eq!(cache.get(&(1, 2)), Some(&42));
/// cache.clear();
/// assert_eq!(cache.get(&(1, 2)), None);
/// ```
pub struct DirectMappedCache<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    mask: u64,
    epoch: u64,
    hits: usize,
    misses: usize,
    faults: usize,
}

impl<K, V> DirectMappedCache<K, V> {
    pub fn new(bits: usize) -> Result<Self, TryReserveError> {
        assert!(bits <= 31, "Cache bits must be at most 31, got {}", bits);

        let capacity = 1usize << bits;
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            slots,
            mask: (capacity - 1) as u64,
            epoch: 0,
            hits: 0,
            misses: 0,
            faults: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Misses where the slot was taken by a different live key.
    pub fn faults(&self) -> usize {
        self.faults
    }

    pub fn clear(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

impl<K, V> DirectMappedCache<K, V>
where
    K: MyHash + Eq,
{
    fn slot_of(&self, key: &K) -> usize {
        (key.hash() & self.mask) as usize
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = self.slot_of(key);
        let live = self.slots[idx].as_ref().filter(|slot| slot.epoch == self.epoch);

        match live {
            Some(slot) if slot.key == *key => {
                self.hits += 1;
                Some(&slot.value)
            }
            Some(_) => {
                self.misses += 1;
                self.faults += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let idx = self.slot_of(&key);
        self.slots[idx] = Some(Slot {
            key,
            value,
            epoch: self.epoch,
        });
    }
}
