use std::collections::HashMap;

use chia_protocol::Bytes32;

/// The deadline bound(s) a bundle carries, as an "OR of two columns" rather
/// than a collapsed single scalar — height and seconds are different units,
/// and `mempool.py`'s `new_tx_block` query is itself an `OR` over the two
/// `assert_before_*` columns rather than a single comparison (spec.md §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryBound {
    Height(u32),
    Seconds(u64),
    Both(u32, u64),
}

impl ExpiryBound {
    #[must_use]
    pub fn from_options(before_height: Option<u32>, before_seconds: Option<u64>) -> Option<Self> {
        match (before_height, before_seconds) {
            (Some(h), Some(s)) => Some(ExpiryBound::Both(h, s)),
            (Some(h), None) => Some(ExpiryBound::Height(h)),
            (None, Some(s)) => Some(ExpiryBound::Seconds(s)),
            (None, None) => None,
        }
    }

    /// Whether this bound has passed given the current peak.
    #[must_use]
    pub fn expired_at(&self, height: u32, timestamp: u64) -> bool {
        match self {
            ExpiryBound::Height(h) => *h <= height,
            ExpiryBound::Seconds(s) => *s <= timestamp,
            ExpiryBound::Both(h, s) => *h <= height || *s <= timestamp,
        }
    }

    /// Whether this bound falls inside the near-expiry window ending at
    /// `(block_cutoff, time_cutoff)` (§4.4's "expires soon" check).
    #[must_use]
    pub fn within_window(&self, block_cutoff: u32, time_cutoff: u64) -> bool {
        match self {
            ExpiryBound::Height(h) => *h < block_cutoff,
            ExpiryBound::Seconds(s) => *s < time_cutoff,
            ExpiryBound::Both(h, s) => *h < block_cutoff || *s < time_cutoff,
        }
    }
}

/// Minimum-priority view over bundles carrying a near-future deadline
/// (component C, spec.md §4.3). A plain `HashMap` suffices: the index only
/// has to answer "which ids carry a bound, and what is it" — the ordering
/// by fee-per-cost for the near-expiry walk comes from the priority index
/// (A), joined against this index's membership test.
#[derive(Debug, Default, Clone)]
pub struct ExpiryIndex {
    bounds: HashMap<Bytes32, ExpiryBound>,
}

impl ExpiryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: Bytes32, bound: ExpiryBound) {
        self.bounds.insert(id, bound);
    }

    pub fn remove(&mut self, id: Bytes32) {
        self.bounds.remove(&id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: Bytes32) -> bool {
        self.bounds.contains_key(&id)
    }

    /// All ids whose deadline has passed at `(height, timestamp)` — feeds
    /// `new_peak`'s expiry pruning (§4.6).
    #[must_use]
    pub fn expired_as_of(&self, height: u32, timestamp: u64) -> Vec<Bytes32> {
        self.bounds
            .iter()
            .filter(|(_, bound)| bound.expired_at(height, timestamp))
            .map(|(id, _)| *id)
            .collect()
    }

    /// All ids whose deadline falls inside the near-expiry window — feeds
    /// §4.4's near-expiry pruning on admission. Cost/fee-rate ordering of
    /// this subset is the caller's job (join against the priority index).
    #[must_use]
    pub fn expiring_within(&self, block_cutoff: u32, time_cutoff: u64) -> Vec<Bytes32> {
        self.bounds
            .iter()
            .filter(|(_, bound)| bound.within_window(block_cutoff, time_cutoff))
            .map(|(id, _)| *id)
            .collect()
    }
}
