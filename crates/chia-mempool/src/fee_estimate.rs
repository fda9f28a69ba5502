use std::sync::atomic::{AtomicU64, Ordering};

use crate::interfaces::FeeEstimator;
use crate::item::{FeeMempoolInfo, MempoolItemInfo};

/// A no-op fee estimator, for tests and for callers that don't want fee-rate
/// estimation wired up — grounded on the corpus's general pattern of
/// shipping a trivial default (e.g. `Signature::default()` in the
/// `chia-protocol` `SpendBundle` tests).
#[derive(Debug, Default)]
pub struct NullFeeEstimator;

impl FeeEstimator for NullFeeEstimator {
    fn add_mempool_item(&self, _info: FeeMempoolInfo, _item: MempoolItemInfo) {}
    fn remove_mempool_item(&self, _info: FeeMempoolInfo, _item: MempoolItemInfo) {}
}

/// A trivial counting estimator used by the crate's own tests to assert
/// that admission/removal notifications fire the expected number of times.
#[derive(Debug, Default)]
pub struct CountingFeeEstimator {
    pub added: AtomicU64,
    pub removed: AtomicU64,
}

impl FeeEstimator for CountingFeeEstimator {
    fn add_mempool_item(&self, _info: FeeMempoolInfo, _item: MempoolItemInfo) {
        self.added.fetch_add(1, Ordering::SeqCst);
    }

    fn remove_mempool_item(&self, _info: FeeMempoolInfo, _item: MempoolItemInfo) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }
}
