use std::collections::{HashMap, HashSet};

use chia_protocol::Bytes32;

/// Bag-style coin-id -> bundle-ids map (component B, spec.md §4.2), directly
/// modeling `mempool.py`'s `spends(coin_id, tx)` table and its
/// `spend_by_coin`/`spend_by_bundle` indices.
#[derive(Debug, Default, Clone)]
pub struct CoinIndex {
    by_coin: HashMap<Bytes32, HashSet<Bytes32>>,
}

impl CoinIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_bundle(&mut self, bundle_id: Bytes32, coin_ids: &[Bytes32]) {
        for coin_id in coin_ids {
            self.by_coin.entry(*coin_id).or_default().insert(bundle_id);
        }
    }

    pub fn remove_bundle(&mut self, bundle_id: Bytes32, coin_ids: &[Bytes32]) {
        for coin_id in coin_ids {
            if let Some(set) = self.by_coin.get_mut(coin_id) {
                set.remove(&bundle_id);
                if set.is_empty() {
                    self.by_coin.remove(coin_id);
                }
            }
        }
    }

    #[must_use]
    pub fn bundles_for_coin(&self, coin_id: Bytes32) -> Option<&HashSet<Bytes32>> {
        self.by_coin.get(&coin_id)
    }

    /// Union of bundle ids referencing any of `coin_ids` — the conflict
    /// query spec.md §4.2 requires.
    #[must_use]
    pub fn conflicts(&self, coin_ids: &[Bytes32]) -> HashSet<Bytes32> {
        let mut out = HashSet::new();
        for coin_id in coin_ids {
            if let Some(set) = self.by_coin.get(coin_id) {
                out.extend(set.iter().copied());
            }
        }
        out
    }
}
