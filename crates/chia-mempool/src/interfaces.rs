use async_trait::async_trait;
use chia_protocol::{Bytes32, SpendBundle};

pub use chia_protocol::CoinRecord;

use crate::error::Result;
use crate::item::{ConditionsSummary, FeeMempoolInfo, MempoolItemInfo};

/// Helpers on the caller's unspent-coin database record (§6) the core
/// reasons about; the `py-bindings` inherent impl in `chia-protocol` carries
/// the same accessors but is compiled out since no crate here enables that
/// feature.
pub trait CoinRecordExt {
    fn coin_id(&self) -> Bytes32;
    fn is_spent(&self) -> bool;
}

impl CoinRecordExt for CoinRecord {
    fn coin_id(&self) -> Bytes32 {
        self.coin.coin_id()
    }

    fn is_spent(&self) -> bool {
        self.spent_block_index > 0
    }
}

/// Persistent chain state / unspent-coin database lookup (§6), out of scope
/// for the core itself. The core calls this at most once per unique coin id
/// per admission.
#[async_trait]
pub trait CoinLookup: Send + Sync {
    async fn lookup(&self, coin_id: Bytes32) -> Option<CoinRecord>;
}

/// Signature verification and program evaluation (§1 Out of scope),
/// reached through this narrow boundary: hand the bundle and a cost
/// ceiling, get back the conditions summary the rest of the core reasons
/// about opaquely.
#[async_trait]
pub trait ConditionsEvaluator: Send + Sync {
    async fn evaluate(&self, bundle: &SpendBundle, max_cost: u64) -> Result<ConditionsSummary>;
}

/// Fee-rate estimation model (§1 Out of scope, §6). The core notifies this
/// on every admission and removal; the estimator is expected to be
/// thread-safe, or the core must serialize calls to it (§5).
pub trait FeeEstimator: Send + Sync {
    fn add_mempool_item(&self, info: FeeMempoolInfo, item: MempoolItemInfo);
    fn remove_mempool_item(&self, info: FeeMempoolInfo, item: MempoolItemInfo);
}
