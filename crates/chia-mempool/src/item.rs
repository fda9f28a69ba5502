use chia_bls::G2Element;
use chia_protocol::{Bytes32, Coin, SpendBundle};

/// Flag bit set on a [`SpendConditions`] whose coin may be coalesced with an
/// identical spend of the same coin under the same solution during block
/// assembly (§4.5). Opaque to the core: set only by the external conditions
/// evaluator.
pub const ELIGIBLE_FOR_DEDUP: u32 = 1;

/// The per-spend slice of a conditions summary, trimmed from
/// `OwnedSpendConditions` down to the fields block assembly and time-lock
/// checking actually reason about. The agg-sig vectors and the CLVM
/// execution-cost bookkeeping fields belong to signature verification and
/// program evaluation, both out of scope for the mempool core (§1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendConditions {
    pub coin_id: Bytes32,
    pub parent_id: Bytes32,
    pub puzzle_hash: Bytes32,
    pub coin_amount: u64,
    pub height_relative: Option<u32>,
    pub seconds_relative: Option<u64>,
    pub before_height_relative: Option<u32>,
    pub before_seconds_relative: Option<u64>,
    pub birth_height: Option<u32>,
    pub birth_seconds: Option<u64>,
    pub create_coin: Vec<(Bytes32, u64)>,
    pub flags: u32,
}

impl SpendConditions {
    #[must_use]
    pub fn eligible_for_dedup(&self) -> bool {
        self.flags & ELIGIBLE_FOR_DEDUP != 0
    }
}

/// Trimmed `OwnedSpendBundleConditions`: the output of the external
/// conditions evaluator (§6), as the core needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionsSummary {
    pub spends: Vec<SpendConditions>,
    pub reserve_fee: u64,
    pub height_absolute: u32,
    pub seconds_absolute: u64,
    pub before_height_absolute: Option<u32>,
    pub before_seconds_absolute: Option<u64>,
    pub cost: u64,
}

impl ConditionsSummary {
    #[must_use]
    pub fn spent_coin_ids(&self) -> Vec<Bytes32> {
        self.spends.iter().map(|s| s.coin_id).collect()
    }
}

/// Why a resident bundle was removed (§3 lifecycle, §4.4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoveReason {
    Conflict,
    BlockInclusion,
    PoolFull,
    Expired,
}

/// One admitted transaction (§3 "Bundle record"). The "SQL row" fields
/// (`cost`, `fee`, the assert_* bounds, `fee_per_cost`, `sequence`) are the
/// ones the priority/expiry indices sort by; `spend_bundle`/`conditions`/
/// `height_added` are the heavier payload that `mempool.py` kept in a
/// separate `_items` dict specifically to avoid repeatedly (de)serializing
/// the `G2Element` aggregated signature.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleRecord {
    pub id: Bytes32,
    pub spend_bundle: SpendBundle,
    pub conditions: ConditionsSummary,
    pub cost: u64,
    pub fee: u64,
    pub height_added: u32,
    pub assert_height_absolute: Option<u32>,
    pub assert_before_height: Option<u32>,
    pub assert_before_seconds: Option<u64>,
    pub sequence: u64,
}

impl BundleRecord {
    #[must_use]
    pub fn fee_per_cost(&self) -> f64 {
        self.fee as f64 / self.cost as f64
    }

    #[must_use]
    pub fn name(&self) -> Bytes32 {
        self.id
    }

    #[must_use]
    pub fn aggregated_signature(&self) -> &G2Element {
        &self.spend_bundle.aggregated_signature
    }
}

/// `InternalMempoolItem`-equivalent item-info passed to the fee estimator
/// (§6), carrying only what the estimator needs about one bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MempoolItemInfo {
    pub cost: u64,
    pub fee: u64,
    pub height_added: u32,
}

impl From<&BundleRecord> for MempoolItemInfo {
    fn from(r: &BundleRecord) -> Self {
        MempoolItemInfo {
            cost: r.cost,
            fee: r.fee,
            height_added: r.height_added,
        }
    }
}

/// Mempool-wide snapshot passed to the fee estimator alongside each
/// `MempoolItemInfo` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeMempoolInfo {
    pub max_size_in_cost: u64,
    pub total_cost: u64,
    pub total_fees: u64,
    pub now: u64,
}

/// Mempool-wide, construction-time configuration (§3 "Mempool info", §6
/// Configuration). Immutable for the lifetime of a `Mempool`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MempoolInfo {
    pub max_size_in_cost: u64,
    pub max_block_clvm_cost: u64,
    pub min_replace_fee_per_cost_increase: u64,
    pub min_fee_increment: u64,
    pub near_expiry_block_window: u32,
    pub near_expiry_seconds_window: u64,
    /// `max_block_reward` (§4.6): the aggregate-fee ceiling block assembly
    /// stops at, distinct from the per-item `MEMPOOL_ITEM_FEE_LIMIT`. Left
    /// unconfigured (`u64::MAX`) by default since nothing in §6's
    /// Configuration list names a caller-supplied value for it.
    pub max_block_reward: u64,
}

impl MempoolInfo {
    /// `MIN_FEE_INCREMENT` default from spec.md §4.4.1 / §6.
    pub const DEFAULT_MIN_FEE_INCREMENT: u64 = 10_000_000;
    pub const DEFAULT_NEAR_EXPIRY_BLOCK_WINDOW: u32 = 48;
    pub const DEFAULT_NEAR_EXPIRY_SECONDS_WINDOW: u64 = 900;

    /// Fee ceiling (exclusive) imposed on a single bundle, so that the sum
    /// of fees across any finite resident set fits in 63 bits (§3 invariant
    /// 2, §6).
    pub const MEMPOOL_ITEM_FEE_LIMIT: u64 = 1 << 50;

    /// Builds a new configuration, enforcing `max_block_clvm_cost <=
    /// max_size_in_cost` (§3).
    ///
    /// # Panics
    /// Panics if `max_block_clvm_cost > max_size_in_cost`, or if either cost
    /// ceiling is zero — both are caller configuration errors, not runtime
    /// conditions the mempool can recover from.
    #[must_use]
    pub fn new(max_size_in_cost: u64, max_block_clvm_cost: u64) -> Self {
        assert!(max_size_in_cost > 0, "max_size_in_cost must be positive");
        assert!(
            max_block_clvm_cost > 0,
            "max_block_clvm_cost must be positive"
        );
        assert!(
            max_block_clvm_cost <= max_size_in_cost,
            "max_block_clvm_cost must not exceed max_size_in_cost"
        );
        Self {
            max_size_in_cost,
            max_block_clvm_cost,
            min_replace_fee_per_cost_increase: 0,
            min_fee_increment: Self::DEFAULT_MIN_FEE_INCREMENT,
            near_expiry_block_window: Self::DEFAULT_NEAR_EXPIRY_BLOCK_WINDOW,
            near_expiry_seconds_window: Self::DEFAULT_NEAR_EXPIRY_SECONDS_WINDOW,
            max_block_reward: u64::MAX,
        }
    }

    #[must_use]
    pub fn with_min_fee_increment(mut self, min_fee_increment: u64) -> Self {
        self.min_fee_increment = min_fee_increment;
        self
    }

    #[must_use]
    pub fn with_near_expiry_windows(mut self, blocks: u32, seconds: u64) -> Self {
        self.near_expiry_block_window = blocks;
        self.near_expiry_seconds_window = seconds;
        self
    }

    #[must_use]
    pub fn with_max_block_reward(mut self, max_block_reward: u64) -> Self {
        self.max_block_reward = max_block_reward;
        self
    }
}

#[must_use]
pub fn coin_additions(coin_id: Bytes32, create_coin: &[(Bytes32, u64)]) -> Vec<Coin> {
    create_coin
        .iter()
        .map(|(puzzle_hash, amount)| Coin {
            parent_coin_info: coin_id,
            puzzle_hash: *puzzle_hash,
            amount: *amount,
        })
        .collect()
}
