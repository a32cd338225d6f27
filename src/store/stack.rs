//! Stack of overlays implementing nested transactions

use super::overlay::Overlay;
use bytes::Bytes;
use std::collections::HashSet;
use std::fmt;

/// Transaction engine
///
/// Layer 0 holds committed state and is never popped; every `begin` pushes a
/// new overlay on top of it. Reads scan from the top down, writes go to the
/// top layer, and the per-layer value deltas always sum to the true number of
/// keys holding each value, so counting costs one lookup per layer.
#[derive(Debug, Clone)]
pub struct TransactionStack {
    layers: Vec<Overlay>,
}

impl TransactionStack {
    /// Create a stack holding only an empty base layer
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a stack whose base layer has room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        TransactionStack {
            layers: vec![Overlay::with_capacity(capacity)],
        }
    }

    /// Assign `value` to `key` in the current transaction
    pub fn set(&mut self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        let key = key.into();
        let (top, lower) = self.split_top();
        let below = resolve(lower, &key).cloned();
        top.set(key, value.into(), below.as_ref());
    }

    /// Remove `key` in the current transaction
    pub fn unset(&mut self, key: impl Into<Bytes>) {
        let key = key.into();
        let (top, lower) = self.split_top();

        if lower.is_empty() {
            top.purge(&key, None);
        } else {
            let below = resolve(lower, &key).cloned();
            top.unset(key, below.as_ref());
        }
    }

    /// Effective value of `key`, or `None` when it is absent
    pub fn get(&self, key: &Bytes) -> Option<&Bytes> {
        resolve(&self.layers, key)
    }

    /// Number of keys whose effective value is `value`
    pub fn num_equal_to(&self, value: &Bytes) -> i64 {
        self.layers
            .iter()
            .rev()
            .map(|layer| layer.count_of(value))
            .sum()
    }

    /// Open a new (possibly nested) transaction
    pub fn begin(&mut self) {
        self.layers.push(Overlay::new());
    }

    /// Discard the innermost transaction
    pub fn rollback(&mut self) -> Result<(), TxError> {
        if !self.in_transaction() {
            return Err(TxError::NoTransaction);
        }

        self.layers.pop();
        Ok(())
    }

    /// Fold every open transaction into the committed state
    ///
    /// The net effect of all open layers is computed first, then the layers
    /// are dropped and the result is applied to the base alone, so the
    /// decrement rule only ever resolves against committed state.
    pub fn commit(&mut self) -> Result<(), TxError> {
        if !self.in_transaction() {
            return Err(TxError::NoTransaction);
        }

        let merged = self.merge_pending();
        self.layers.truncate(1);

        for (key, decision) in merged {
            match decision {
                Some(value) => self.set(key, value),
                None => self.unset(key),
            }
        }

        Ok(())
    }

    /// Number of layers, base included
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Whether at least one transaction is open
    pub fn in_transaction(&self) -> bool {
        self.layers.len() > 1
    }

    /// Get statistics about the stack
    pub fn stats(&self) -> StackStats {
        let pending_changes = self.layers[1..]
            .iter()
            .map(|layer| layer.len() + layer.deleted_keys().count())
            .sum();

        StackStats {
            depth: self.depth(),
            committed_keys: self.layers[0].len(),
            pending_changes,
        }
    }

    /// Collapse the open layers into one decision per key.
    ///
    /// Layers are visited newest first, so the first decision seen for a key
    /// is the one that survives. `None` means the key ends up unset.
    fn merge_pending(&self) -> Vec<(Bytes, Option<Bytes>)> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for layer in self.layers[1..].iter().rev() {
            for key in layer.deleted_keys() {
                if seen.insert(key.clone()) {
                    merged.push((key.clone(), None));
                }
            }

            for (key, value) in layer.assigned() {
                if seen.insert(key.clone()) {
                    merged.push((key.clone(), Some(value.clone())));
                }
            }
        }

        merged
    }

    fn split_top(&mut self) -> (&mut Overlay, &[Overlay]) {
        match self.layers.split_last_mut() {
            Some((top, lower)) => (top, lower),
            None => unreachable!("the base layer is never popped"),
        }
    }
}

impl Default for TransactionStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Effective value of `key` across `layers`, scanning from the last one down
fn resolve<'a>(layers: &'a [Overlay], key: &Bytes) -> Option<&'a Bytes> {
    for layer in layers.iter().rev() {
        if layer.is_deleted(key) {
            return None;
        }

        if let Some(value) = layer.get(key) {
            return Some(value);
        }
    }

    None
}

/// Statistics about the transaction stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackStats {
    pub depth: usize,
    pub committed_keys: usize,
    pub pending_changes: usize,
}

/// Transaction control errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxError {
    /// ROLLBACK or COMMIT issued with no open transaction
    NoTransaction,
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::NoTransaction => write!(f, "no transaction in progress"),
        }
    }
}

impl std::error::Error for TxError {}
