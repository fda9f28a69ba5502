use std::collections::HashMap;

use chia_protocol::{Bytes32, Coin, CoinSpend, Program};

use crate::error::{MempoolError, Result};
use crate::item::{coin_additions, BundleRecord};

/// A running, per-coin dedup entry: the solution the first occurrence spent
/// the coin with, plus its cost and additions once computed — a direct
/// transliteration of `mempool.py`'s `DedupCoinSpend`.
#[derive(Debug, Clone)]
pub struct DedupCoinSpend {
    pub solution: Program,
    pub cost: Option<u64>,
    pub additions: Vec<Coin>,
}

/// Caller-supplied puzzle re-execution, standing in for the CLVM
/// interpreter the core never embeds (program evaluation is out of scope,
/// §1). Grounded 1:1 on `run_for_cost_and_additions` in `mempool.py`: same
/// role, re-run a puzzle once to learn its isolated cost and `CREATE_COIN`
/// outputs, cached thereafter.
pub trait PuzzleRunner: Send + Sync {
    fn run_for_cost_and_additions(
        &self,
        coin_id: Bytes32,
        puzzle_reveal: &Program,
        solution: &Program,
        max_cost: u64,
    ) -> Result<(u64, Vec<Coin>)>;
}

/// State carried across candidates during one block-assembly walk (§4.5).
pub type DedupState = HashMap<Bytes32, DedupCoinSpend>;

/// Outcome of running the dedup planner against one candidate bundle.
pub struct DedupOutcome {
    /// Coin spends of this bundle to omit from the assembled block because
    /// an earlier candidate already contributed their effect.
    pub dedup_spends: Vec<Bytes32>,
    pub saved_cost: u64,
    pub dedup_additions: Vec<Coin>,
}

/// Runs the dedup planner (component E) against one candidate, per spec.md
/// §4.5. Returns `Ok(None)` if the candidate must be rejected outright
/// (flagged spend reused under a different solution) — the assembler skips
/// the candidate rather than aborting the block (§4.6/§7 propagation
/// policy).
pub fn find_duplicate_spends(
    record: &BundleRecord,
    state: &mut DedupState,
    puzzle_runner: &dyn PuzzleRunner,
) -> Result<Option<DedupOutcome>> {
    let mut saved_cost = 0u64;
    let mut dedup_spends = Vec::new();
    let mut dedup_additions = Vec::new();
    let mut new_entries: Vec<(Bytes32, DedupCoinSpend)> = Vec::new();

    for spend in &record.conditions.spends {
        if !spend.eligible_for_dedup() {
            continue;
        }
        let coin_id = spend.coin_id;
        let coin_spend = find_coin_spend(record, coin_id)
            .ok_or(MempoolError::PoolShapeInvariant("dedup spend missing from bundle"))?;

        match state.get(&coin_id) {
            None => {
                new_entries.push((
                    coin_id,
                    DedupCoinSpend {
                        solution: coin_spend.solution.clone(),
                        cost: None,
                        additions: Vec::new(),
                    },
                ));
            }
            Some(existing) if existing.solution != coin_spend.solution => {
                // Spending the same coin under two different solutions is
                // inconsistent: reject the whole candidate.
                return Ok(None);
            }
            Some(existing) if existing.cost.is_none() => {
                let (spend_cost, created_coins) = puzzle_runner.run_for_cost_and_additions(
                    coin_id,
                    &coin_spend.puzzle_reveal,
                    &coin_spend.solution,
                    record.cost,
                )?;
                saved_cost += spend_cost;
                dedup_additions.extend(created_coins.iter().copied());
                dedup_spends.push(coin_id);
                new_entries.push((
                    coin_id,
                    DedupCoinSpend {
                        solution: existing.solution.clone(),
                        cost: Some(spend_cost),
                        additions: created_coins,
                    },
                ));
            }
            Some(existing) => {
                let cached_cost = existing.cost.expect("checked Some above");
                saved_cost += cached_cost;
                dedup_additions.extend(existing.additions.iter().copied());
                dedup_spends.push(coin_id);
            }
        }
    }

    for (coin_id, entry) in new_entries {
        state.insert(coin_id, entry);
    }

    Ok(Some(DedupOutcome {
        dedup_spends,
        saved_cost,
        dedup_additions,
    }))
}

fn find_coin_spend(record: &BundleRecord, coin_id: Bytes32) -> Option<&CoinSpend> {
    record
        .spend_bundle
        .coin_spends
        .iter()
        .find(|cs| cs.coin.coin_id() == coin_id)
}

/// Re-derives the coin additions a spend produces straight from its
/// conditions summary, without re-running the puzzle — used for the
/// non-dedup spends of an included bundle during assembly (§4.5/§4.6).
#[must_use]
pub fn non_dedup_additions(record: &BundleRecord, dedup_spends: &[Bytes32]) -> Vec<Coin> {
    record
        .conditions
        .spends
        .iter()
        .filter(|s| !dedup_spends.contains(&s.coin_id))
        .flat_map(|s| coin_additions(s.coin_id, &s.create_coin))
        .collect()
}
