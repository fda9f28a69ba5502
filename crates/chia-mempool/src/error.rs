use thiserror::Error;

/// Permanent and retryable failure kinds a bundle can be rejected with.
///
/// The retry/permanent split lives in [`crate::manager::Status`], not here:
/// this enum only names *why*, the status wrapper says whether a caller
/// should resubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MempoolError {
    #[error("INVALID_SPEND_BUNDLE")]
    InvalidSpendBundle,
    #[error("COIN_AMOUNT_NEGATIVE")]
    CoinAmountNegative,
    #[error("COIN_AMOUNT_EXCEEDS_MAXIMUM")]
    CoinAmountExceedsMaximum,
    #[error("DUPLICATE_OUTPUT")]
    DuplicateOutput,
    #[error("DOUBLE_SPEND")]
    DoubleSpend,
    #[error("MINTING_COIN")]
    MintingCoin,
    #[error("RESERVE_FEE_CONDITION_FAILED")]
    ReserveFeeConditionFailed,
    #[error("BLOCK_COST_EXCEEDS_MAX")]
    BlockCostExceedsMax,
    #[error("INVALID_FEE_LOW_FEE")]
    InvalidFeeLowFee,
    #[error("INVALID_BLOCK_FEE_AMOUNT")]
    InvalidBlockFeeAmount,
    #[error("ASSERT_MY_BIRTH_HEIGHT_FAILED")]
    AssertMyBirthHeightFailed,
    #[error("ASSERT_MY_BIRTH_SECONDS_FAILED")]
    AssertMyBirthSecondsFailed,
    #[error("ASSERT_HEIGHT_ABSOLUTE_FAILED")]
    AssertHeightAbsoluteFailed,
    #[error("ASSERT_SECONDS_ABSOLUTE_FAILED")]
    AssertSecondsAbsoluteFailed,
    #[error("ASSERT_SECONDS_RELATIVE_FAILED")]
    AssertSecondsRelativeFailed,
    #[error("ASSERT_BEFORE_HEIGHT_RELATIVE_FAILED")]
    AssertBeforeHeightRelativeFailed,
    #[error("ASSERT_BEFORE_SECONDS_RELATIVE_FAILED")]
    AssertBeforeSecondsRelativeFailed,

    // retryable
    #[error("UNKNOWN_UNSPENT")]
    UnknownUnspent,
    #[error("MEMPOOL_CONFLICT")]
    MempoolConflict,
    #[error("ASSERT_HEIGHT_RELATIVE_FAILED")]
    AssertHeightRelativeFailed,
    #[error("ASSERT_HEIGHT_ABSOLUTE_FAILED_FUTURE")]
    AssertHeightAbsoluteFailedFuture,

    /// An invariant (§8) was found violated after a mutation completed. This
    /// should never happen; it is returned rather than panicking so an
    /// embedding node can log-and-abort instead of unwinding through FFI.
    #[error("mempool invariant violated: {0}")]
    PoolShapeInvariant(&'static str),
}

impl MempoolError {
    /// Whether a bundle failing with this error may be resubmitted later
    /// (e.g. on the next peak update), per spec.md §7.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            MempoolError::UnknownUnspent
                | MempoolError::MempoolConflict
                | MempoolError::AssertHeightRelativeFailed
                | MempoolError::AssertHeightAbsoluteFailedFuture
        )
    }
}

pub type Result<T> = std::result::Result<T, MempoolError>;
