use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chia_protocol::{Bytes32, Coin, SpendBundle};
use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::dedup::{find_duplicate_spends, non_dedup_additions, DedupState, PuzzleRunner};
use crate::error::MempoolError;
use crate::interfaces::{CoinLookup, CoinRecordExt, ConditionsEvaluator};
use crate::item::{ConditionsSummary, MempoolInfo};
use crate::mempool::{Mempool, RemoveReason};

/// Mirrors `chia/types/mempool_inclusion_status.py::MempoolInclusionStatus`:
/// the real return shape of [`MempoolManager::add_spend_bundle`] (spec.md
/// §4.6) — the retryable/permanent split is expressed in the type itself
/// (`Pending` vs `Failed`), not left to caller convention over a flat error
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Pending(PendingReason),
    Failed(MempoolError),
}

/// Why a bundle is pending rather than admitted — drives `new_peak`'s retry
/// pass (spec.md §4.6) without needing to re-invoke the conditions
/// evaluator, since the conditions don't change on retry, only chain state
/// does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    UnknownUnspent,
    MempoolConflict,
    TimeLockNotYetSatisfied(MempoolError),
}

/// A bundle that previously returned `Pending`, held for retry on the next
/// `new_peak` (spec.md §4.6's "pending cache", left unspecified in shape by
/// the distillation — new manager-level state, since `mempool.py` never
/// implements peak-triggered retry in the excerpt this spec is drawn from).
struct PendingBundle {
    spend_bundle: SpendBundle,
    conditions: ConditionsSummary,
    fee: u64,
    reason: PendingReason,
}

struct ManagerState {
    mempool: Mempool,
    pending: HashMap<Bytes32, PendingBundle>,
    peak_height: u32,
    peak_timestamp: u64,
    peak_header_hash: Option<Bytes32>,
}

struct ManagerInner {
    info: MempoolInfo,
    coin_lookup: Arc<dyn CoinLookup>,
    conditions_evaluator: Arc<dyn ConditionsEvaluator>,
    puzzle_runner: Arc<dyn PuzzleRunner>,
    state: RwLock<ManagerState>,
}

/// Top-level coordinator (component F, spec.md §4.6). A cheap-to-clone
/// handle (`Arc` inside), following `chia-client::Client`'s shape but using
/// an `RwLock` rather than a plain `Mutex` since `create_bundle_from_mempool`
/// is read-only and spec.md §5 calls for concurrent-reader semantics a
/// mutex can't express.
#[derive(Clone)]
pub struct MempoolManager(Arc<ManagerInner>);

impl MempoolManager {
    #[must_use]
    pub fn new(
        info: MempoolInfo,
        mempool: Mempool,
        coin_lookup: Arc<dyn CoinLookup>,
        conditions_evaluator: Arc<dyn ConditionsEvaluator>,
        puzzle_runner: Arc<dyn PuzzleRunner>,
    ) -> Self {
        Self(Arc::new(ManagerInner {
            info,
            coin_lookup,
            conditions_evaluator,
            puzzle_runner,
            state: RwLock::new(ManagerState {
                mempool,
                pending: HashMap::new(),
                peak_height: 0,
                peak_timestamp: 0,
                peak_header_hash: None,
            }),
        }))
    }

    /// Read-only snapshot accessors — may proceed concurrently with other
    /// readers (spec.md §5).
    pub async fn size(&self) -> usize {
        self.0.state.read().await.mempool.size()
    }

    pub async fn total_cost(&self) -> u64 {
        self.0.state.read().await.mempool.total_cost()
    }

    pub async fn total_fees(&self) -> u64 {
        self.0.state.read().await.mempool.total_fees()
    }

    /// `add_spend_bundle` (spec.md §4.6). Suspension points — the coin
    /// lookup and (if `conditions` isn't supplied) the conditions evaluator
    /// — happen before any lock is taken; only the conflict-check-then-admit
    /// sub-sequence runs under the write lock, per spec.md §5's "no
    /// suspension between conflict check and admission".
    pub async fn add_spend_bundle(
        &self,
        spend_bundle: SpendBundle,
        conditions: Option<ConditionsSummary>,
    ) -> (Option<u64>, Status) {
        let conditions = match conditions {
            Some(c) => c,
            None => {
                let max_cost = self.0.info.max_block_clvm_cost;
                match self
                    .0
                    .conditions_evaluator
                    .evaluate(&spend_bundle, max_cost)
                    .await
                {
                    Ok(c) => c,
                    Err(e) => return (None, Status::Failed(e)),
                }
            }
        };

        if conditions.cost > self.0.info.max_block_clvm_cost {
            return (Some(conditions.cost), Status::Failed(MempoolError::BlockCostExceedsMax));
        }

        let (peak_height, peak_timestamp) = {
            let state = self.0.state.read().await;
            (state.peak_height, state.peak_timestamp)
        };

        let cost = conditions.cost;
        let name = spend_bundle.name();

        let coin_ids: Vec<Bytes32> = spend_bundle
            .coin_spends
            .iter()
            .map(|cs| cs.coin.coin_id())
            .collect();

        let mut coin_records = HashMap::new();
        for coin_id in coin_ids {
            if coin_records.contains_key(&coin_id) {
                continue;
            }
            match self.0.coin_lookup.lookup(coin_id).await {
                Some(record) => {
                    if record.is_spent() {
                        let still_in_mempool = self
                            .0
                            .state
                            .read()
                            .await
                            .mempool
                            .lookup_by_coin_id(coin_id)
                            .into_iter()
                            .next()
                            .is_some();
                        if !still_in_mempool {
                            return (Some(cost), Status::Failed(MempoolError::DoubleSpend));
                        }
                    }
                    coin_records.insert(coin_id, record);
                }
                None => {
                    let reason = PendingReason::UnknownUnspent;
                    self.queue_pending(name, spend_bundle, conditions, None, reason)
                        .await;
                    return (Some(cost), Status::Pending(reason));
                }
            }
        }

        if let Err(e) = check_time_locks(&conditions, &coin_records, peak_height, peak_timestamp) {
            if e.is_retryable() {
                let reason = PendingReason::TimeLockNotYetSatisfied(e);
                self.queue_pending(name, spend_bundle, conditions, None, reason)
                    .await;
                return (Some(cost), Status::Pending(reason));
            }
            return (Some(cost), Status::Failed(e));
        }

        let fee = match compute_fee(&spend_bundle, &conditions) {
            Some(fee) => fee,
            None => return (Some(cost), Status::Failed(MempoolError::MintingCoin)),
        };

        if fee < conditions.reserve_fee {
            return (Some(cost), Status::Failed(MempoolError::ReserveFeeConditionFailed));
        }

        let mut state = self.0.state.write().await;
        match state
            .mempool
            .add(spend_bundle.clone(), conditions.clone(), fee, peak_height)
        {
            Ok(outcome) => {
                state.pending.remove(&name);
                info!(
                    "admitted spend bundle, evicted {} conflicting/expired/excess item(s)",
                    outcome.removed.len()
                );
                (Some(cost), Status::Success)
            }
            Err(MempoolError::MempoolConflict) => {
                let reason = PendingReason::MempoolConflict;
                debug!("queued pending bundle {name}, reason={reason:?}");
                state
                    .pending
                    .insert(name, PendingBundle { spend_bundle, conditions, fee, reason });
                (Some(cost), Status::Pending(reason))
            }
            Err(e) => {
                debug!("rejected spend bundle: {e}");
                (Some(cost), Status::Failed(e))
            }
        }
    }

    /// Queues a bundle that isn't admissible yet for retry on the next
    /// `new_peak` (spec.md §7's retryable statuses). `fee` is `None` when it
    /// couldn't be computed yet (coin records weren't available); the retry
    /// recomputes it.
    async fn queue_pending(
        &self,
        name: Bytes32,
        spend_bundle: SpendBundle,
        conditions: ConditionsSummary,
        fee: Option<u64>,
        reason: PendingReason,
    ) {
        debug!("queued pending bundle {name}, reason={reason:?}");
        let mut state = self.0.state.write().await;
        state.pending.insert(
            name,
            PendingBundle {
                spend_bundle,
                conditions,
                fee: fee.unwrap_or(0),
                reason,
            },
        );
    }

    /// `new_peak` (spec.md §4.6): removes bundles conflicting with
    /// `spent_coin_ids` or expired at the new peak, then re-attempts every
    /// previously-pending bundle. Drains fully before any subsequent
    /// `add_spend_bundle` observes the new peak (spec.md §5).
    pub async fn new_peak(
        &self,
        peak_header_hash: Bytes32,
        peak_height: u32,
        peak_timestamp: u64,
        spent_coin_ids: &[Bytes32],
    ) {
        let mut state = self.0.state.write().await;

        let is_reorg = match state.peak_header_hash {
            Some(prev) => prev != peak_header_hash && peak_height <= state.peak_height,
            None => false,
        };
        if is_reorg {
            warn!("reorg detected at height {peak_height}, flushing mempool");
            let all_ids = state.mempool.all_item_ids();
            state.mempool.remove(&all_ids, RemoveReason::BlockInclusion);
        }

        let conflicting: Vec<Bytes32> = state
            .mempool
            .lookup_by_coin_ids(spent_coin_ids)
            .iter()
            .map(|r| r.id)
            .collect();
        state.mempool.remove(&conflicting, RemoveReason::BlockInclusion);

        state.mempool.advance_peak(peak_height, peak_timestamp);
        state.peak_height = peak_height;
        state.peak_timestamp = peak_timestamp;
        state.peak_header_hash = Some(peak_header_hash);

        let pending: Vec<(Bytes32, PendingBundle)> = state.pending.drain().collect();
        drop(state);

        for (id, pending_bundle) in pending {
            debug!(
                "retrying pending bundle {id} (fee={}), was pending on {:?}",
                pending_bundle.fee, pending_bundle.reason
            );
            let (_, status) = self
                .add_spend_bundle(pending_bundle.spend_bundle, Some(pending_bundle.conditions))
                .await;
            debug!("retried pending bundle {id}: {status:?}");
        }
    }

    /// `create_bundle_from_mempool` (spec.md §4.6, §4.6's read-only note):
    /// read-only against the indices at the moment it begins — a single read
    /// lock for the whole walk, so concurrent admissions started after this
    /// call begins are not observed by it.
    pub async fn create_bundle_from_mempool(
        &self,
        peak_header_hash: Bytes32,
    ) -> Option<(SpendBundle, Vec<Coin>)> {
        let state = self.0.state.read().await;
        debug!("assembling block against peak {peak_header_hash}");

        let max_block_clvm_cost = self.0.info.max_block_clvm_cost;
        let max_block_reward = self.0.info.max_block_reward;

        let mut cost_accum = 0u64;
        let mut fee_accum = 0u64;
        let mut processed = 0usize;
        let mut additions: HashSet<Coin> = HashSet::new();
        let mut dedup_state: DedupState = HashMap::new();
        let mut coin_spends = Vec::new();
        let mut sigs = Vec::new();

        info!("assembling block, max cost: {max_block_clvm_cost}");

        for record in state.mempool.items_by_priority() {
            let outcome = match find_duplicate_spends(record, &mut dedup_state, self.0.puzzle_runner.as_ref()) {
                Ok(Some(outcome)) => outcome,
                Ok(None) => continue,
                Err(e) => {
                    debug!("skipping candidate during assembly: {e}");
                    continue;
                }
            };

            let effective_cost = record.cost.saturating_sub(outcome.saved_cost);
            if cost_accum + effective_cost > max_block_clvm_cost
                || fee_accum.saturating_add(record.fee) > max_block_reward
            {
                break;
            }

            for cs in &record.spend_bundle.coin_spends {
                if !outcome.dedup_spends.contains(&cs.coin.coin_id()) {
                    coin_spends.push(cs.clone());
                }
            }
            for coin in non_dedup_additions(record, &outcome.dedup_spends) {
                if !outcome.dedup_additions.contains(&coin) {
                    additions.insert(coin);
                }
            }
            sigs.push(record.spend_bundle.aggregated_signature.clone());
            cost_accum += effective_cost;
            fee_accum += record.fee;
            processed += 1;
        }

        if processed == 0 {
            return None;
        }

        info!(
            "assembled block: cost {cost_accum}/{max_block_clvm_cost} ({:.1}% full), {processed} bundle(s)",
            100.0 * cost_accum as f64 / max_block_clvm_cost as f64
        );

        let mut aggregated_signature = chia_bls::G2Element::default();
        for sig in &sigs {
            aggregated_signature.aggregate(sig);
        }
        let bundle = SpendBundle::new(coin_spends, aggregated_signature);
        Some((bundle, additions.into_iter().collect()))
    }
}

/// Fee is the positive difference between spent and created coin amounts
/// (GLOSSARY). Returns `None` if outputs would exceed inputs (minting).
fn compute_fee(spend_bundle: &SpendBundle, conditions: &ConditionsSummary) -> Option<u64> {
    let input_amount: u128 = spend_bundle
        .coin_spends
        .iter()
        .map(|cs| u128::from(cs.coin.amount))
        .sum();
    let output_amount: u128 = conditions
        .spends
        .iter()
        .flat_map(|s| s.create_coin.iter())
        .map(|(_, amount)| u128::from(*amount))
        .sum();
    if output_amount > input_amount {
        return None;
    }
    u64::try_from(input_amount - output_amount).ok()
}

/// Checks every time-lock condition in `conditions` against the peak and
/// the looked-up coin records (spec.md §4.6, §7). Grounded on
/// `mempool_check_conditions.py`'s per-condition checks and the modern
/// `mempool_check_time_locks` behavior the test suite exercises: height
/// floors/relatives that aren't yet satisfied are retryable, everything
/// else is permanent.
fn check_time_locks(
    conditions: &ConditionsSummary,
    coin_records: &HashMap<Bytes32, crate::interfaces::CoinRecord>,
    peak_height: u32,
    peak_timestamp: u64,
) -> Result<(), MempoolError> {
    if peak_height < conditions.height_absolute {
        return Err(MempoolError::AssertHeightAbsoluteFailedFuture);
    }
    if peak_timestamp < conditions.seconds_absolute {
        return Err(MempoolError::AssertSecondsAbsoluteFailed);
    }
    if let Some(before_height) = conditions.before_height_absolute {
        if peak_height >= before_height {
            return Err(MempoolError::AssertHeightAbsoluteFailed);
        }
    }
    if let Some(before_seconds) = conditions.before_seconds_absolute {
        if peak_timestamp >= before_seconds {
            return Err(MempoolError::AssertSecondsAbsoluteFailed);
        }
    }

    for spend in &conditions.spends {
        let Some(record) = coin_records.get(&spend.coin_id) else {
            continue;
        };
        if let Some(height_relative) = spend.height_relative {
            if peak_height < record.confirmed_block_index + height_relative {
                return Err(MempoolError::AssertHeightRelativeFailed);
            }
        }
        if let Some(seconds_relative) = spend.seconds_relative {
            if peak_timestamp < record.timestamp + seconds_relative {
                return Err(MempoolError::AssertSecondsRelativeFailed);
            }
        }
        if let Some(before_height_relative) = spend.before_height_relative {
            if peak_height >= record.confirmed_block_index + before_height_relative {
                return Err(MempoolError::AssertBeforeHeightRelativeFailed);
            }
        }
        if let Some(before_seconds_relative) = spend.before_seconds_relative {
            if peak_timestamp >= record.timestamp + before_seconds_relative {
                return Err(MempoolError::AssertBeforeSecondsRelativeFailed);
            }
        }
        if let Some(birth_height) = spend.birth_height {
            if birth_height != record.confirmed_block_index {
                return Err(MempoolError::AssertMyBirthHeightFailed);
            }
        }
        if let Some(birth_seconds) = spend.birth_seconds {
            if birth_seconds != record.timestamp {
                return Err(MempoolError::AssertMyBirthSecondsFailed);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee_estimate::NullFeeEstimator;
    use crate::interfaces::CoinRecord;
    use crate::item::SpendConditions;
    use async_trait::async_trait;
    use chia_bls::G2Element;
    use chia_protocol::{Coin, CoinSpend, Program};

    fn h(byte: u8) -> Bytes32 {
        Bytes32::from([byte; 32])
    }

    struct FixedCoinLookup(HashMap<Bytes32, CoinRecord>);

    #[async_trait]
    impl CoinLookup for FixedCoinLookup {
        async fn lookup(&self, coin_id: Bytes32) -> Option<CoinRecord> {
            self.0.get(&coin_id).copied()
        }
    }

    struct UnusedEvaluator;

    #[async_trait]
    impl ConditionsEvaluator for UnusedEvaluator {
        async fn evaluate(
            &self,
            _bundle: &SpendBundle,
            _max_cost: u64,
        ) -> crate::error::Result<ConditionsSummary> {
            unreachable!("test always supplies pre-computed conditions")
        }
    }

    struct NoopPuzzleRunner;
    impl PuzzleRunner for NoopPuzzleRunner {
        fn run_for_cost_and_additions(
            &self,
            _coin_id: Bytes32,
            _puzzle_reveal: &Program,
            _solution: &Program,
            _max_cost: u64,
        ) -> crate::error::Result<(u64, Vec<Coin>)> {
            Ok((0, Vec::new()))
        }
    }

    fn manager_with_coin(coin_id: Bytes32, confirmed_height: u32, timestamp: u64) -> MempoolManager {
        let info = MempoolInfo::new(1_000_000, 1_000_000);
        let mempool = Mempool::new(info, Arc::new(NullFeeEstimator));
        let mut coins = HashMap::new();
        coins.insert(
            coin_id,
            CoinRecord::new(Coin::new(coin_id, coin_id, 1000), confirmed_height, 0, false, timestamp),
        );
        MempoolManager::new(
            info,
            mempool,
            Arc::new(FixedCoinLookup(coins)),
            Arc::new(UnusedEvaluator),
            Arc::new(NoopPuzzleRunner),
        )
    }

    fn bundle_with_conditions(coin_id: Bytes32, spend: SpendConditions, cost: u64) -> (SpendBundle, ConditionsSummary) {
        let coin_spend = CoinSpend::new(
            Coin::new(coin_id, coin_id, 1000),
            Program::new(vec![1_u8].into()),
            Program::new(vec![1_u8].into()),
        );
        let bundle = SpendBundle::new(vec![coin_spend], G2Element::default());
        let conditions = ConditionsSummary {
            spends: vec![spend],
            reserve_fee: 0,
            height_absolute: 0,
            seconds_absolute: 0,
            before_height_absolute: None,
            before_seconds_absolute: None,
            cost,
        };
        (bundle, conditions)
    }

    #[tokio::test]
    async fn admits_bundle_with_no_time_locks() {
        let coin_id = h(1);
        let manager = manager_with_coin(coin_id, 10, 1000);
        let spend = SpendConditions {
            coin_id,
            parent_id: coin_id,
            puzzle_hash: coin_id,
            coin_amount: 1000,
            height_relative: None,
            seconds_relative: None,
            before_height_relative: None,
            before_seconds_relative: None,
            birth_height: None,
            birth_seconds: None,
            create_coin: vec![(h(2), 900)],
            flags: 0,
        };
        let (bundle, conditions) = bundle_with_conditions(coin_id, spend, 1000);
        let (cost, status) = manager.add_spend_bundle(bundle, Some(conditions)).await;
        assert_eq!(cost, Some(1000));
        assert_eq!(status, Status::Success);
        assert_eq!(manager.size().await, 1);
    }

    #[tokio::test]
    async fn pending_on_height_relative_not_satisfied() {
        let coin_id = h(1);
        let manager = manager_with_coin(coin_id, 10, 1000);
        let spend = SpendConditions {
            coin_id,
            parent_id: coin_id,
            puzzle_hash: coin_id,
            coin_amount: 1000,
            height_relative: Some(5),
            seconds_relative: None,
            before_height_relative: None,
            before_seconds_relative: None,
            birth_height: None,
            birth_seconds: None,
            create_coin: Vec::new(),
            flags: 0,
        };
        let (bundle, conditions) = bundle_with_conditions(coin_id, spend, 1000);
        let (_, status) = manager.add_spend_bundle(bundle, Some(conditions)).await;
        assert_eq!(
            status,
            Status::Pending(PendingReason::TimeLockNotYetSatisfied(
                MempoolError::AssertHeightRelativeFailed
            ))
        );
        assert_eq!(manager.size().await, 0);
    }

    #[tokio::test]
    async fn pending_retried_successfully_after_new_peak() {
        let coin_id = h(1);
        let manager = manager_with_coin(coin_id, 10, 1000);
        let spend = SpendConditions {
            coin_id,
            parent_id: coin_id,
            puzzle_hash: coin_id,
            coin_amount: 1000,
            height_relative: Some(1),
            seconds_relative: None,
            before_height_relative: None,
            before_seconds_relative: None,
            birth_height: None,
            birth_seconds: None,
            create_coin: Vec::new(),
            flags: 0,
        };
        let (bundle, conditions) = bundle_with_conditions(coin_id, spend, 1000);
        let (_, status) = manager.add_spend_bundle(bundle, Some(conditions)).await;
        assert!(matches!(status, Status::Pending(_)));

        manager.new_peak(h(200), 11, 2000, &[]).await;
        assert_eq!(manager.size().await, 1);
    }

    #[tokio::test]
    async fn assembles_block_from_highest_priority_bundle() {
        let coin_id = h(1);
        let manager = manager_with_coin(coin_id, 10, 1000);
        let spend = SpendConditions {
            coin_id,
            parent_id: coin_id,
            puzzle_hash: coin_id,
            coin_amount: 1000,
            height_relative: None,
            seconds_relative: None,
            before_height_relative: None,
            before_seconds_relative: None,
            birth_height: None,
            birth_seconds: None,
            create_coin: vec![(h(2), 900)],
            flags: 0,
        };
        let (bundle, conditions) = bundle_with_conditions(coin_id, spend, 1000);
        manager.add_spend_bundle(bundle, Some(conditions)).await;

        let (assembled, additions) = manager.create_bundle_from_mempool(h(99)).await.unwrap();
        assert_eq!(assembled.coin_spends.len(), 1);
        assert_eq!(additions.len(), 1);
        assert_eq!(additions[0].amount, 900);
    }

    #[tokio::test]
    async fn assembly_stops_at_max_block_reward() {
        // spec.md §4.6: assembly breaks once `fee_accum + bundle.fee >
        // max_block_reward`, independent of the cost ceiling.
        let coin_a = h(1);
        let coin_b = h(2);
        let info = MempoolInfo::new(1_000_000, 1_000_000).with_max_block_reward(150);
        let mempool = Mempool::new(info, Arc::new(NullFeeEstimator));
        let mut coins = HashMap::new();
        for (coin_id, height, ts) in [(coin_a, 10, 1000), (coin_b, 10, 1000)] {
            coins.insert(
                coin_id,
                CoinRecord::new(Coin::new(coin_id, coin_id, 1000), height, 0, false, ts),
            );
        }
        let manager = MempoolManager::new(
            info,
            mempool,
            Arc::new(FixedCoinLookup(coins)),
            Arc::new(UnusedEvaluator),
            Arc::new(NoopPuzzleRunner),
        );

        let spend_a = SpendConditions {
            coin_id: coin_a,
            parent_id: coin_a,
            puzzle_hash: coin_a,
            coin_amount: 1000,
            height_relative: None,
            seconds_relative: None,
            before_height_relative: None,
            before_seconds_relative: None,
            birth_height: None,
            birth_seconds: None,
            create_coin: vec![(h(3), 900)],
            flags: 0,
        };
        let (bundle_a, conditions_a) = bundle_with_conditions(coin_a, spend_a, 1000);
        manager.add_spend_bundle(bundle_a, Some(conditions_a)).await;

        let spend_b = SpendConditions {
            coin_id: coin_b,
            parent_id: coin_b,
            puzzle_hash: coin_b,
            coin_amount: 1000,
            height_relative: None,
            seconds_relative: None,
            before_height_relative: None,
            before_seconds_relative: None,
            birth_height: None,
            birth_seconds: None,
            create_coin: vec![(h(4), 900)],
            flags: 0,
        };
        let (bundle_b, conditions_b) = bundle_with_conditions(coin_b, spend_b, 1000);
        manager.add_spend_bundle(bundle_b, Some(conditions_b)).await;

        assert_eq!(manager.size().await, 2);
        assert_eq!(manager.total_fees().await, 200);

        let (assembled, _additions) = manager.create_bundle_from_mempool(h(99)).await.unwrap();
        // Both bundles carry fee=100; the second would push fee_accum to
        // 200 > 150, so only one is included.
        assert_eq!(assembled.coin_spends.len(), 1);
    }
}
