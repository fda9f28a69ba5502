use std::collections::HashMap;
use std::sync::Arc;

use chia_protocol::{Bytes32, SpendBundle};
use log::{debug, info};

use crate::coin_index::CoinIndex;
use crate::error::{MempoolError, Result};
use crate::expiry_index::{ExpiryBound, ExpiryIndex};
use crate::interfaces::FeeEstimator;
use crate::item::{BundleRecord, ConditionsSummary, FeeMempoolInfo, MempoolInfo, MempoolItemInfo};
use crate::priority_index::{PriorityIndex, PriorityKey};

/// Why a resident bundle was removed — re-exported at crate root alongside
/// this module for convenience.
pub use crate::item::RemoveReason;

/// Outcome of a successful [`Mempool::add`] call: the ids (and reasons)
/// evicted to make room, if any.
#[derive(Debug, Clone, Default)]
pub struct AddOutcome {
    pub removed: Vec<(Bytes32, RemoveReason)>,
}

/// The mempool store (component D, spec.md §4.4). Owns the bundle table by
/// value and maintains the priority/coin/expiry indices (A/B/C) as
/// non-owning satellite structures — the "single owning table + satellite
/// indices" resolution of the source's cyclic-ownership diamond (spec.md
/// §9).
pub struct Mempool {
    info: MempoolInfo,
    fee_estimator: Arc<dyn FeeEstimator>,
    items: HashMap<Bytes32, BundleRecord>,
    priority_index: PriorityIndex,
    coin_index: CoinIndex,
    expiry_index: ExpiryIndex,
    next_sequence: u64,
    total_cost: u64,
    total_fees: u64,
    peak_height: u32,
    peak_timestamp: u64,
}

impl Mempool {
    #[must_use]
    pub fn new(info: MempoolInfo, fee_estimator: Arc<dyn FeeEstimator>) -> Self {
        Self {
            info,
            fee_estimator,
            items: HashMap::new(),
            priority_index: PriorityIndex::new(),
            coin_index: CoinIndex::new(),
            expiry_index: ExpiryIndex::new(),
            next_sequence: 0,
            total_cost: 0,
            total_fees: 0,
            peak_height: 0,
            peak_timestamp: 0,
        }
    }

    #[must_use]
    pub fn info(&self) -> &MempoolInfo {
        &self.info
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn total_cost(&self) -> u64 {
        self.total_cost
    }

    #[must_use]
    pub fn total_fees(&self) -> u64 {
        self.total_fees
    }

    #[must_use]
    pub fn peak_height(&self) -> u32 {
        self.peak_height
    }

    #[must_use]
    pub fn peak_timestamp(&self) -> u64 {
        self.peak_timestamp
    }

    #[must_use]
    pub fn lookup(&self, id: Bytes32) -> Option<&BundleRecord> {
        self.items.get(&id)
    }

    #[must_use]
    pub fn lookup_by_coin_id(&self, coin_id: Bytes32) -> Vec<&BundleRecord> {
        self.coin_index
            .bundles_for_coin(coin_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    #[must_use]
    pub fn lookup_by_coin_ids(&self, coin_ids: &[Bytes32]) -> Vec<&BundleRecord> {
        self.coin_index
            .conflicts(coin_ids)
            .into_iter()
            .filter_map(|id| self.items.get(&id))
            .collect()
    }

    /// All resident bundles, descending fee-per-cost order — the order
    /// block assembly walks (§4.6).
    pub fn items_by_priority(&self) -> impl Iterator<Item = &BundleRecord> {
        self.priority_index
            .iter_descending()
            .filter_map(|key| self.items.get(&key.id))
    }

    #[must_use]
    pub fn all_item_ids(&self) -> Vec<Bytes32> {
        self.items.keys().copied().collect()
    }

    pub fn all_items(&self) -> impl Iterator<Item = &BundleRecord> {
        self.items.values()
    }

    #[must_use]
    pub fn at_full_capacity(&self, cost: u64) -> bool {
        self.total_cost + cost > self.info.max_size_in_cost
    }

    /// Minimum `fee_per_cost` a bundle with `cost` needs to fit, per spec.md
    /// §4.4.3: `0` if there's room, otherwise the first fee-per-cost
    /// encountered walking the priority index ascending that would free
    /// enough room.
    #[must_use]
    pub fn min_fee_rate_to_fit(&self, cost: u64) -> f64 {
        if !self.at_full_capacity(cost) {
            return 0.0;
        }
        let mut remaining = self.total_cost;
        for key in self.priority_index.iter_ascending() {
            let item_cost = self.items.get(&key.id).map_or(0, |r| r.cost);
            remaining -= item_cost;
            if remaining + cost <= self.info.max_size_in_cost {
                return key.fee_per_cost;
            }
        }
        // Every resident bundle evicted and it still wouldn't fit: no rate
        // is high enough on its own; report the highest possible priority.
        f64::INFINITY
    }

    /// Removes all advertised items, notifying the fee estimator for every
    /// removal unless `reason` is `BLOCK_INCLUSION` (§4.4.2) — mirrors
    /// `mempool.py::remove_from_pool`'s "snapshot removed rows, delete, then
    /// notify" ordering.
    pub fn remove(&mut self, ids: &[Bytes32], reason: RemoveReason) -> Vec<BundleRecord> {
        if ids.is_empty() {
            return Vec::new();
        }

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.items.remove(id) {
                let key = PriorityKey {
                    fee_per_cost: record.fee_per_cost(),
                    sequence: record.sequence,
                    id: record.id,
                };
                self.priority_index.remove(&key);
                self.coin_index
                    .remove_bundle(record.id, &record.conditions.spent_coin_ids());
                self.expiry_index.remove(record.id);
                self.total_cost -= record.cost;
                self.total_fees -= record.fee;
                removed.push(record);
            }
        }

        if reason != RemoveReason::BlockInclusion {
            let notify_info = FeeMempoolInfo {
                max_size_in_cost: self.info.max_size_in_cost,
                total_cost: self.total_cost,
                total_fees: self.total_fees,
                now: self.peak_timestamp,
            };
            for record in &removed {
                self.fee_estimator
                    .remove_mempool_item(notify_info, MempoolItemInfo::from(record));
            }
        }

        debug!(
            "removed {} item(s), reason={:?}, resident={}",
            removed.len(),
            reason,
            self.items.len()
        );

        removed
    }

    /// Drops every resident bundle whose deadline has passed at the new
    /// peak and advances the stored peak height/timestamp — the store-level
    /// half of `new_peak` (§4.6); `mempool.py::new_tx_block`'s equivalent.
    pub fn advance_peak(&mut self, height: u32, timestamp: u64) -> Vec<Bytes32> {
        let expired = self.expiry_index.expired_as_of(height, timestamp);
        self.remove(&expired, RemoveReason::Expired);
        self.peak_height = height;
        self.peak_timestamp = timestamp;
        expired
    }

    /// Admits a bundle, per spec.md §4.4. Returns the set of ids evicted to
    /// make room (conflict/near-expiry/capacity), or an error if admission
    /// is refused outright. Idempotent: admitting the same bundle id twice
    /// returns `Ok` with no further side effects the second time (§8
    /// round-trip property).
    #[allow(clippy::too_many_lines)]
    pub fn add(
        &mut self,
        spend_bundle: SpendBundle,
        conditions: ConditionsSummary,
        fee: u64,
        height_added: u32,
    ) -> Result<AddOutcome> {
        let id = spend_bundle.name();

        if self.items.contains_key(&id) {
            return Ok(AddOutcome::default());
        }

        if fee >= MempoolInfo::MEMPOOL_ITEM_FEE_LIMIT {
            return Err(MempoolError::InvalidBlockFeeAmount);
        }
        if conditions.cost == 0 {
            return Err(MempoolError::PoolShapeInvariant("bundle cost must be positive"));
        }
        if conditions.cost > self.info.max_block_clvm_cost {
            return Err(MempoolError::BlockCostExceedsMax);
        }

        let spent_coin_ids = conditions.spent_coin_ids();
        let fee_per_cost = fee as f64 / conditions.cost as f64;

        let mut removed_ids: Vec<(Bytes32, RemoveReason)> = Vec::new();

        // §4.4.1 replacement: any coin-id collision routes through the
        // conflict/replacement path instead of ordinary admission.
        let conflict_ids = self.coin_index.conflicts(&spent_coin_ids);
        if !conflict_ids.is_empty() {
            let conflicts: Vec<&BundleRecord> = conflict_ids
                .iter()
                .filter_map(|id| self.items.get(id))
                .collect();

            let conflict_coin_ids: std::collections::HashSet<Bytes32> = conflicts
                .iter()
                .flat_map(|r| r.conditions.spent_coin_ids())
                .collect();
            let incoming_coin_ids: std::collections::HashSet<Bytes32> =
                spent_coin_ids.iter().copied().collect();
            let is_superset = conflict_coin_ids.is_subset(&incoming_coin_ids);

            let conflicts_fee_sum: u64 = conflicts.iter().map(|r| r.fee).sum();
            let max_conflict_rate = conflicts
                .iter()
                .map(BundleRecord::fee_per_cost)
                .fold(f64::MIN, f64::max);

            let fee_ok = fee >= conflicts_fee_sum.saturating_add(self.info.min_fee_increment);
            let rate_ok = fee_per_cost > max_conflict_rate;

            if is_superset && fee_ok && rate_ok {
                let ids: Vec<Bytes32> = conflict_ids.into_iter().collect();
                for removed_id in &ids {
                    removed_ids.push((*removed_id, RemoveReason::Conflict));
                }
                self.remove(&ids, RemoveReason::Conflict);
            } else {
                return Err(MempoolError::MempoolConflict);
            }
        }

        // §4.4 near-expiry pruning, applied before capacity eviction.
        let own_bound =
            ExpiryBound::from_options(conditions.before_height_absolute, conditions.before_seconds_absolute);
        let block_cutoff = self.peak_height + self.info.near_expiry_block_window;
        let time_cutoff = self.peak_timestamp + self.info.near_expiry_seconds_window;
        let in_window = own_bound.is_some_and(|b| b.within_window(block_cutoff, time_cutoff));

        if in_window {
            let expiring_ids = self
                .expiry_index
                .expiring_within(block_cutoff, time_cutoff);
            let expiring_set: std::collections::HashSet<Bytes32> = expiring_ids.into_iter().collect();

            // Cumulative cost is scoped to the expiring subset only: a
            // higher-rate, non-expiring bundle sitting above an expiring one
            // in fee-per-cost order never counts against it.
            let profile = self.priority_index.cost_profile_subset(
                |id| expiring_set.contains(&id),
                |bundle_id| self.items.get(&bundle_id).map_or(0, |r| r.cost),
            );

            // `profile` is in descending fee-per-cost order; walk it in
            // reverse (ascending) as spec.md §4.4 requires.
            let mut to_evict = Vec::new();
            for (key, cumulative_from_top) in profile.into_iter().rev() {
                if cumulative_from_top + conditions.cost <= self.info.max_block_clvm_cost {
                    break;
                }
                if key.fee_per_cost > fee_per_cost {
                    return Err(MempoolError::InvalidFeeLowFee);
                }
                to_evict.push(key.id);
            }
            if !to_evict.is_empty() {
                for evicted_id in &to_evict {
                    removed_ids.push((*evicted_id, RemoveReason::Expired));
                }
                self.remove(&to_evict, RemoveReason::Expired);
            }
        }

        // §4.4 capacity eviction: evict strictly-lower-fee-rate bundles
        // (never equal-rate, per spec.md §9's resolved open question) until
        // the incoming bundle fits.
        if self.total_cost + conditions.cost > self.info.max_size_in_cost {
            let target = self.info.max_size_in_cost.saturating_sub(conditions.cost);
            let profile = self
                .priority_index
                .cost_profile(|bundle_id| self.items.get(&bundle_id).map_or(0, |r| r.cost));
            let mut to_evict = Vec::new();
            for (key, cumulative_from_top) in profile {
                let item_cost = self.items.get(&key.id).map_or(0, |r| r.cost);
                if cumulative_from_top + item_cost > target {
                    to_evict.push(key.id);
                }
            }
            for evicted_id in &to_evict {
                removed_ids.push((*evicted_id, RemoveReason::PoolFull));
            }
            self.remove(&to_evict, RemoveReason::PoolFull);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let record = BundleRecord {
            id,
            spend_bundle,
            cost: conditions.cost,
            fee,
            height_added,
            assert_height_absolute: Some(conditions.height_absolute),
            assert_before_height: conditions.before_height_absolute,
            assert_before_seconds: conditions.before_seconds_absolute,
            sequence,
            conditions,
        };

        self.priority_index.insert(PriorityKey {
            fee_per_cost: record.fee_per_cost(),
            sequence,
            id,
        });
        self.coin_index.insert_bundle(id, &spent_coin_ids);
        if let Some(bound) = own_bound {
            self.expiry_index.insert(id, bound);
        }
        self.total_cost += record.cost;
        self.total_fees += record.fee;

        let notify_info = FeeMempoolInfo {
            max_size_in_cost: self.info.max_size_in_cost,
            total_cost: self.total_cost,
            total_fees: self.total_fees,
            now: self.peak_timestamp,
        };
        self.fee_estimator
            .add_mempool_item(notify_info, MempoolItemInfo::from(&record));

        info!(
            "admitted {} cost={} fee={} fee_per_cost={:.4}, resident={}",
            hex_prefix(&id),
            record.cost,
            record.fee,
            record.fee_per_cost(),
            self.items.len() + 1
        );

        self.items.insert(id, record);

        Ok(AddOutcome { removed: removed_ids })
    }

    /// Test-only: inserts a fully-formed record without running admission
    /// checks, for constructing mempool states that admission's conflict
    /// rules would otherwise prevent (e.g. spec.md §8 scenario 7, whose
    /// three coexisting bundles model the store's state directly rather
    /// than a sequence of `add` calls).
    #[cfg(test)]
    fn insert_for_test(&mut self, mut record: BundleRecord) -> Bytes32 {
        record.sequence = self.next_sequence;
        self.next_sequence += 1;
        let id = record.id;
        self.priority_index.insert(PriorityKey {
            fee_per_cost: record.fee_per_cost(),
            sequence: record.sequence,
            id,
        });
        self.coin_index
            .insert_bundle(id, &record.conditions.spent_coin_ids());
        if let Some(bound) =
            ExpiryBound::from_options(record.conditions.before_height_absolute, record.conditions.before_seconds_absolute)
        {
            self.expiry_index.insert(id, bound);
        }
        self.total_cost += record.cost;
        self.total_fees += record.fee;
        self.items.insert(id, record);
        id
    }
}

fn hex_prefix(id: &Bytes32) -> String {
    let bytes: &[u8] = id.as_ref();
    bytes.iter().take(4).map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::PuzzleRunner;
    use crate::fee_estimate::NullFeeEstimator;
    use crate::item::SpendConditions;
    use chia_bls::G2Element;
    use chia_protocol::{Coin, CoinSpend, Program};

    fn h(byte: u8) -> Bytes32 {
        Bytes32::from([byte; 32])
    }

    fn make_bundle(
        coin_ids: &[Bytes32],
        cost: u64,
        fee: u64,
        before_height: Option<u32>,
        before_seconds: Option<u64>,
    ) -> (SpendBundle, ConditionsSummary) {
        let spends: Vec<SpendConditions> = coin_ids
            .iter()
            .map(|coin_id| SpendConditions {
                coin_id: *coin_id,
                parent_id: *coin_id,
                puzzle_hash: *coin_id,
                coin_amount: 1,
                height_relative: None,
                seconds_relative: None,
                before_height_relative: None,
                before_seconds_relative: None,
                birth_height: None,
                birth_seconds: None,
                create_coin: Vec::new(),
                flags: 0,
            })
            .collect();
        let coin_spends: Vec<CoinSpend> = coin_ids
            .iter()
            .map(|coin_id| {
                CoinSpend::new(
                    Coin::new(*coin_id, *coin_id, 1),
                    Program::new(vec![1_u8].into()),
                    Program::new(vec![1_u8, coin_id.as_ref()[0]].into()),
                )
            })
            .collect();
        let bundle = SpendBundle::new(coin_spends, G2Element::default());
        let conditions = ConditionsSummary {
            spends,
            reserve_fee: 0,
            height_absolute: 0,
            seconds_absolute: 0,
            before_height_absolute: before_height,
            before_seconds_absolute: before_seconds,
            cost,
        };
        (bundle, conditions)
    }

    fn new_mempool(max_size_in_cost: u64) -> Mempool {
        let info = MempoolInfo::new(max_size_in_cost, max_size_in_cost);
        Mempool::new(info, Arc::new(NullFeeEstimator))
    }

    #[test]
    fn fee_ordering() {
        let mut mempool = new_mempool(1_000_000);
        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None);
        let (b2, c2) = make_bundle(&[h(2)], 1000, 300, None, None);
        let (b3, c3) = make_bundle(&[h(3)], 1000, 200, None, None);
        let id1 = b1.name();
        let id2 = b2.name();
        let id3 = b3.name();

        mempool.add(b1, c1, 100, 0).unwrap();
        mempool.add(b2, c2, 300, 0).unwrap();
        mempool.add(b3, c3, 200, 0).unwrap();

        let order: Vec<Bytes32> = mempool.items_by_priority().map(|r| r.id).collect();
        assert_eq!(order, vec![id2, id3, id1]);
    }

    #[test]
    fn capacity_eviction_evicts_lowest_rate() {
        let mut mempool = new_mempool(2500);
        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None);
        let (b2, c2) = make_bundle(&[h(2)], 1000, 300, None, None);
        let (b3, c3) = make_bundle(&[h(3)], 1000, 200, None, None);
        let id1 = b1.name();
        let id2 = b2.name();
        let id3 = b3.name();

        mempool.add(b1, c1, 100, 0).unwrap();
        mempool.add(b2, c2, 300, 0).unwrap();
        let outcome = mempool.add(b3, c3, 200, 0).unwrap();

        assert_eq!(outcome.removed, vec![(id1, RemoveReason::PoolFull)]);
        assert_eq!(mempool.size(), 2);
        assert!(mempool.lookup(id1).is_none());
        assert!(mempool.lookup(id2).is_some());
        assert!(mempool.lookup(id3).is_some());
    }

    #[test]
    fn replacement_accepted_on_superset_and_fee_bump() {
        let mut mempool = new_mempool(1_000_000);
        let (b1, c1) = make_bundle(&[h(1), h(2)], 1000, 100, None, None);
        let id1 = b1.name();
        mempool.add(b1, c1, 100, 0).unwrap();

        let (b2, c2) = make_bundle(&[h(1), h(2), h(3)], 1000, 10_000_200, None, None);
        let id2 = b2.name();
        let outcome = mempool.add(b2, c2, 10_000_200, 0).unwrap();

        assert_eq!(outcome.removed, vec![(id1, RemoveReason::Conflict)]);
        assert!(mempool.lookup(id1).is_none());
        assert!(mempool.lookup(id2).is_some());
    }

    #[test]
    fn replacement_rejected_without_rate_improvement() {
        let mut mempool = new_mempool(1_000_000);
        let (b1, c1) = make_bundle(&[h(1)], 100, 100, None, None);
        mempool.add(b1, c1, 100, 0).unwrap();

        let (b2, c2) = make_bundle(&[h(1)], 10_000_200, 10_000_200, None, None);
        let err = mempool.add(b2, c2, 10_000_200, 0).unwrap_err();
        assert_eq!(err, MempoolError::MempoolConflict);
    }

    #[test]
    fn near_expiry_eviction_prefers_lower_rate() {
        let mut mempool = new_mempool(1_000_000);
        mempool.advance_peak(100, 1000);

        let (r1, rc1) = make_bundle(&[h(1)], 1_000_000, 500_000, Some(120), None);
        let id1 = r1.name();
        mempool.add(r1, rc1, 500_000, 100).unwrap();

        let (n, nc) = make_bundle(&[h(2)], 1, 1, Some(110), None);
        let id_n = n.name();
        let outcome = mempool.add(n, nc, 1, 100).unwrap();

        assert_eq!(outcome.removed, vec![(id1, RemoveReason::Expired)]);
        assert!(mempool.lookup(id1).is_none());
        assert!(mempool.lookup(id_n).is_some());
    }

    #[test]
    fn near_expiry_eviction_ignores_non_expiring_higher_rate_bundles() {
        // A non-expiring bundle sitting above an expiring one in fee-per-cost
        // order must not count against that expiring bundle's cumulative
        // cost: the near-expiry window is scoped to expiring entries only.
        let mut mempool = new_mempool(1_000_000);
        mempool.info.max_block_clvm_cost = 151;
        mempool.advance_peak(100, 1000);

        let (a, ca) = make_bundle(&[h(1)], 1000, 10_000, None, None);
        let id_a = a.name();
        mempool.add(a, ca, 10_000, 100).unwrap();

        let (b, cb) = make_bundle(&[h(2)], 100, 500, Some(110), None);
        let id_b = b.name();
        mempool.add(b, cb, 500, 100).unwrap();

        let (n, nc) = make_bundle(&[h(3)], 1, 100, Some(105), None);
        let id_n = n.name();
        let outcome = mempool.add(n, nc, 100, 100).unwrap();

        assert!(outcome.removed.is_empty());
        assert!(mempool.lookup(id_a).is_some());
        assert!(mempool.lookup(id_b).is_some());
        assert!(mempool.lookup(id_n).is_some());
    }

    #[test]
    fn bulk_removal_on_new_peak() {
        // spec.md §8 scenario 7: B1 spends {C1}, B2 spends {C2}, B3 spends
        // {C1, C2}. Constructed directly (bypassing admission's conflict
        // rules, which would never let these three coexist) to test the
        // bulk-removal-by-spent-coin behavior in isolation.
        let mut mempool = new_mempool(1_000_000);
        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None);
        let (b2, c2) = make_bundle(&[h(2)], 1000, 100, None, None);
        let (b3, c3) = make_bundle(&[h(1), h(2)], 1000, 100, None, None);
        let id1 = b1.name();
        let id2 = b2.name();
        let id3 = b3.name();

        mempool.insert_for_test(BundleRecord {
            id: id1,
            spend_bundle: b1,
            cost: c1.cost,
            fee: 100,
            height_added: 0,
            assert_height_absolute: Some(c1.height_absolute),
            assert_before_height: c1.before_height_absolute,
            assert_before_seconds: c1.before_seconds_absolute,
            sequence: 0,
            conditions: c1,
        });
        mempool.insert_for_test(BundleRecord {
            id: id2,
            spend_bundle: b2,
            cost: c2.cost,
            fee: 100,
            height_added: 0,
            assert_height_absolute: Some(c2.height_absolute),
            assert_before_height: c2.before_height_absolute,
            assert_before_seconds: c2.before_seconds_absolute,
            sequence: 0,
            conditions: c2,
        });
        mempool.insert_for_test(BundleRecord {
            id: id3,
            spend_bundle: b3,
            cost: c3.cost,
            fee: 100,
            height_added: 0,
            assert_height_absolute: Some(c3.height_absolute),
            assert_before_height: c3.before_height_absolute,
            assert_before_seconds: c3.before_seconds_absolute,
            sequence: 0,
            conditions: c3,
        });
        assert_eq!(mempool.size(), 3);

        let conflicting = mempool.lookup_by_coin_ids(&[h(1)]);
        let ids: std::collections::HashSet<Bytes32> = conflicting.iter().map(|r| r.id).collect();
        assert_eq!(ids, [id1, id3].into_iter().collect());

        mempool.remove(
            &ids.into_iter().collect::<Vec<_>>(),
            RemoveReason::BlockInclusion,
        );

        assert!(mempool.lookup(id1).is_none());
        assert!(mempool.lookup(id3).is_none());
        assert!(mempool.lookup(id2).is_some());
        assert_eq!(mempool.size(), 1);
    }

    #[test]
    fn min_fee_rate_to_fit_zero_when_room_available() {
        let mempool = new_mempool(1_000_000);
        assert_eq!(mempool.min_fee_rate_to_fit(1000), 0.0);
    }

    #[test]
    fn min_fee_rate_to_fit_walks_ascending_once_full() {
        // §4.4.3: at capacity, the first fee-per-cost encountered walking
        // ascending that frees enough room to fit `cost`.
        let mut mempool = new_mempool(2000);
        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None); // rate 0.1
        let (b2, c2) = make_bundle(&[h(2)], 1000, 300, None, None); // rate 0.3
        mempool.add(b1, c1, 100, 0).unwrap();
        mempool.add(b2, c2, 300, 0).unwrap();

        assert!(mempool.at_full_capacity(500));
        // Evicting the lowest-rate bundle (0.1, cost 1000) frees enough room
        // for a 500-cost newcomer (remaining 1000 + 500 <= 2000).
        assert_eq!(mempool.min_fee_rate_to_fit(500), 0.1);
    }

    #[test]
    fn add_is_idempotent() {
        let mut mempool = new_mempool(1_000_000);
        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None);
        let (b1_again, c1_again) = (b1.clone(), c1.clone());
        mempool.add(b1, c1, 100, 0).unwrap();
        let size_before = mempool.size();
        mempool.add(b1_again, c1_again, 100, 0).unwrap();
        assert_eq!(mempool.size(), size_before);
    }

    struct NoopPuzzleRunner;
    impl PuzzleRunner for NoopPuzzleRunner {
        fn run_for_cost_and_additions(
            &self,
            _coin_id: Bytes32,
            _puzzle_reveal: &Program,
            _solution: &Program,
            _max_cost: u64,
        ) -> Result<(u64, Vec<Coin>)> {
            Ok((0, Vec::new()))
        }
    }

    #[test]
    fn invariants_hold_after_mutations() {
        let mut mempool = new_mempool(5000);
        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None);
        let (b2, c2) = make_bundle(&[h(2)], 1000, 300, None, None);
        mempool.add(b1, c1, 100, 0).unwrap();
        mempool.add(b2, c2, 300, 0).unwrap();

        assert!(mempool.total_cost() <= mempool.info().max_size_in_cost);
        assert!(mempool.total_fees() < (1u64 << 63));
        for record in mempool.all_items() {
            for coin_id in record.conditions.spent_coin_ids() {
                assert!(mempool
                    .lookup_by_coin_id(coin_id)
                    .iter()
                    .any(|r| r.id == record.id));
            }
        }
        let _ = NoopPuzzleRunner;
    }

    #[test]
    fn fee_estimator_notified_on_add_and_remove_but_not_on_block_inclusion() {
        use crate::fee_estimate::CountingFeeEstimator;
        use std::sync::atomic::Ordering;

        let estimator = Arc::new(CountingFeeEstimator::default());
        let info = MempoolInfo::new(2000, 2000);
        let mut mempool = Mempool::new(info, estimator.clone());

        let (b1, c1) = make_bundle(&[h(1)], 1000, 100, None, None);
        let (b2, c2) = make_bundle(&[h(2)], 1000, 300, None, None);
        let id1 = b1.name();
        mempool.add(b1, c1, 100, 0).unwrap();
        mempool.add(b2, c2, 300, 0).unwrap();
        assert_eq!(estimator.added.load(Ordering::SeqCst), 2);

        mempool.remove(&[id1], RemoveReason::Conflict);
        assert_eq!(estimator.removed.load(Ordering::SeqCst), 1);

        let (b3, c3) = make_bundle(&[h(3)], 1000, 50, None, None);
        let id3 = b3.name();
        mempool.add(b3, c3, 50, 0).unwrap();
        mempool.remove(&[id3], RemoveReason::BlockInclusion);
        assert_eq!(estimator.removed.load(Ordering::SeqCst), 1);
    }
}
