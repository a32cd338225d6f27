//! A single transactional layer

use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;
use siphasher::sip::SipHasher13;

type Hasher = BuildHasherDefault<SipHasher13>;

/// Key -> value assignments made by one layer
pub type LayerMap = HashMap<Bytes, Bytes, Hasher>;

/// Keys explicitly unset by one layer
pub type TombstoneSet = HashSet<Bytes, Hasher>;

/// Value -> net count change contributed by one layer
type DeltaMap = HashMap<Bytes, i64, Hasher>;

/// One layer of pending state
///
/// An overlay records what its transaction assigned, what it deleted, and how
/// those changes moved the number of keys holding each value. It never looks
/// at the layers beneath it: whenever the decrement rule needs the value a key
/// has below this layer, the caller passes it in as `below`.
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    /// Values assigned in this layer
    assigned: LayerMap,

    /// Keys unset in this layer, shadowing lower layers
    deleted: TombstoneSet,

    /// Net per-value count change contributed by this layer alone
    value_delta: DeltaMap,
}

impl Overlay {
    /// Create an empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty overlay with room for `capacity` assignments
    pub fn with_capacity(capacity: usize) -> Self {
        Overlay {
            assigned: HashMap::with_capacity_and_hasher(capacity, Hasher::default()),
            deleted: TombstoneSet::default(),
            value_delta: HashMap::with_capacity_and_hasher(capacity, Hasher::default()),
        }
    }

    /// Assign `value` to `key` in this layer
    ///
    /// `below` is the effective value of `key` in the layers under this one.
    pub fn set(&mut self, key: Bytes, value: Bytes, below: Option<&Bytes>) {
        self.decrease(&key, below);
        self.increase(&value);
        self.deleted.remove(&key);
        self.assigned.insert(key, value);
    }

    /// Unset `key` in this layer, shadowing any value below it
    pub fn unset(&mut self, key: Bytes, below: Option<&Bytes>) {
        self.decrease(&key, below);
        self.assigned.remove(&key);
        self.deleted.insert(key);
    }

    /// Unset `key` without leaving a tombstone
    ///
    /// Only valid on the bottom layer, where there is nothing to shadow.
    pub fn purge(&mut self, key: &Bytes, below: Option<&Bytes>) {
        self.decrease(key, below);
        self.assigned.remove(key);
        self.deleted.remove(key);
    }

    /// The value assigned to `key` by this layer alone
    pub fn get(&self, key: &Bytes) -> Option<&Bytes> {
        self.assigned.get(key)
    }

    /// Whether `key` was unset by this layer
    pub fn is_deleted(&self, key: &Bytes) -> bool {
        self.deleted.contains(key)
    }

    /// Assignments made by this layer
    pub fn assigned(&self) -> impl Iterator<Item = (&Bytes, &Bytes)> {
        self.assigned.iter()
    }

    /// Keys unset by this layer
    pub fn deleted_keys(&self) -> impl Iterator<Item = &Bytes> {
        self.deleted.iter()
    }

    /// Net change this layer contributes to the count of keys holding `value`
    pub fn count_of(&self, value: &Bytes) -> i64 {
        self.value_delta.get(value).copied().unwrap_or(0)
    }

    /// Number of keys assigned in this layer
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether the layer holds neither assignments nor tombstones
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty() && self.deleted.is_empty()
    }

    fn increase(&mut self, value: &Bytes) {
        self.adjust(value, 1);
    }

    /// Remove whatever `key` contributed to the counts as seen from this layer.
    ///
    /// A key assigned here cancels its own earlier increment. A key already
    /// unset here is absent from this layer up, so there is nothing to remove.
    /// Otherwise the value visible below is cancelled out by a negative delta.
    fn decrease(&mut self, key: &Bytes, below: Option<&Bytes>) {
        let previous = match self.assigned.get(key) {
            Some(own) => Some(own.clone()),
            None if self.deleted.contains(key) => None,
            None => below.cloned(),
        };

        if let Some(value) = previous {
            self.adjust(&value, -1);
        }
    }

    fn adjust(&mut self, value: &Bytes, by: i64) {
        let delta = self.value_delta.entry(value.clone()).or_insert(0);
        *delta += by;

        // Zeroed entries carry no information
        if *delta == 0 {
            self.value_delta.remove(value);
        }
    }
}
