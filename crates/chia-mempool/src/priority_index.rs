use std::collections::BTreeSet;

use chia_protocol::Bytes32;

/// Sort key for the priority index (component A, spec.md §4.1): fee-per-cost
/// descending, admission sequence ascending as the tie-breaker (§3 invariant
/// 6). `fee_per_cost` is always finite and positive because `cost` is
/// checked to be `> 0` before a `BundleRecord` is ever constructed, so
/// `f64::total_cmp` never has to reason about NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityKey {
    pub fee_per_cost: f64,
    pub sequence: u64,
    pub id: Bytes32,
}

impl Eq for PriorityKey {}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // descending fee_per_cost, then ascending sequence
        other
            .fee_per_cost
            .total_cmp(&self.fee_per_cost)
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Fee-per-cost ordered view over resident bundle ids (component A).
/// Backed by a `BTreeSet` keyed by `(fee_per_cost desc, sequence asc)` — the
/// native-structures option spec.md §9 names as an alternative to the
/// source's SQL `tx` table and its `fee_per_cost DESC, seq ASC` index.
#[derive(Debug, Default, Clone)]
pub struct PriorityIndex {
    keys: BTreeSet<PriorityKey>,
}

impl PriorityIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: PriorityKey) {
        self.keys.insert(key);
    }

    pub fn remove(&mut self, key: &PriorityKey) {
        self.keys.remove(key);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Highest fee-per-cost first — the order block assembly (§4.6) walks.
    pub fn iter_descending(&self) -> impl Iterator<Item = &PriorityKey> {
        self.keys.iter()
    }

    /// Lowest fee-per-cost first — the order capacity eviction (§4.4) and
    /// `min_fee_rate_to_fit` (§4.4.3) walk.
    pub fn iter_ascending(&self) -> impl DoubleEndedIterator<Item = &PriorityKey> {
        self.keys.iter().rev()
    }

    /// Walks ids in descending fee-per-cost order (highest rate first),
    /// yielding each key alongside the cumulative cost of the
    /// strictly-higher-fee-rate entries that precede it — the exact shape
    /// `mempool.py`'s windowed `SUM(cost) OVER (ORDER BY fee_per_cost DESC,
    /// seq ASC)` query computes. Used directly by capacity eviction
    /// (highest-rate-first order) and reversed by near-expiry eviction
    /// (ascending order), per §4.4.
    #[must_use]
    pub fn cost_profile(&self, cost_of: impl Fn(Bytes32) -> u64) -> Vec<(PriorityKey, u64)> {
        self.cost_profile_subset(|_| true, cost_of)
    }

    /// Same as [`Self::cost_profile`], but the cumulative sum (and the
    /// entries yielded) are restricted to the ids `keep` accepts — the
    /// windowed `SUM(cost) OVER (...)` query scoped to a `WHERE`-filtered
    /// subset, as near-expiry eviction (§4.4) needs: cumulative cost of
    /// higher-rate *expiring* entries only, not the whole index.
    #[must_use]
    pub fn cost_profile_subset(
        &self,
        keep: impl Fn(Bytes32) -> bool,
        cost_of: impl Fn(Bytes32) -> u64,
    ) -> Vec<(PriorityKey, u64)> {
        let mut cumulative_from_top = 0u64;
        let mut profile: Vec<(PriorityKey, u64)> = Vec::new();
        for key in self.keys.iter() {
            if !keep(key.id) {
                continue;
            }
            profile.push((*key, cumulative_from_top));
            cumulative_from_top += cost_of(key.id);
        }
        profile
    }
}
