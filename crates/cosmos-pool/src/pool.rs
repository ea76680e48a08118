// Copyright 2024 mempool-core developers.
// This file is part of mempool-core.

// mempool-core is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// mempool-core is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with mempool-core.  If not, see <http://www.gnu.org/licenses/>.

//! The Cosmos sub-pool: a priority-nonce mempool ordering non-EVM
//! transactions by effective gas price in the bond denom, built on the same
//! generic [`txpool::Pool`] engine the Ethereum sub-pool uses.
//!
//! There is no background reset thread here: unlike the EVM sub-pool, the
//! Cosmos sub-pool does not need to reclassify pending-vs-queued on every
//! chain head (there is no balance/nonce-gap concept for it in spec.md
//! 4.3). A sender's lowest-sequence transaction is always the only one
//! [`txpool::Pool::pending`] will yield for that sender in a given pass,
//! which already gives the "one sequence eligible at a time" guarantee
//! structurally, via [`txpool::AlwaysReady`].

use std::{collections::HashSet, fmt, sync::Arc, time::Instant};

use ethereum_types::H256;
use parking_lot::RwLock;
use txpool::{AlwaysReady, Pool};

use crate::{
    config::CosmosPoolConfig,
    error::Error,
    scoring::PriorityScoring,
    transaction::{priority_in_bond_denom, UnverifiedTransaction, VerifiedTransaction},
};

/// The Cosmos sub-pool.
pub struct CosmosPool {
    pool: RwLock<Pool<VerifiedTransaction, PriorityScoring>>,
    config: RwLock<CosmosPoolConfig>,
}

impl fmt::Debug for CosmosPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosPool").field("count", &self.count()).finish()
    }
}

impl CosmosPool {
    pub fn new(config: CosmosPoolConfig) -> Self {
        let options = txpool::Options { max_count: config.max_tx, ..txpool::Options::default() };
        CosmosPool {
            pool: RwLock::new(Pool::new(options, PriorityScoring)),
            config: RwLock::new(config),
        }
    }

    pub fn config(&self) -> CosmosPoolConfig {
        self.config.read().clone()
    }

    pub fn set_config(&self, config: CosmosPoolConfig) {
        *self.config.write() = config;
    }

    /// Verifies structural validity (positive gas limit) and computes
    /// priority using this pool's configured `bond_denom`.
    fn verify(&self, tx: UnverifiedTransaction, local: bool) -> Result<VerifiedTransaction, Error> {
        if tx.gas_limit <= 0 {
            return Err(Error::NonPositiveGasLimit);
        }
        let bond_denom = self.config.read().bond_denom.clone();
        let gas_limit = tx.gas_limit as u64;
        let priority = priority_in_bond_denom(&tx.fee, &bond_denom, gas_limit);
        Ok(VerifiedTransaction {
            hash: tx.hash,
            signer: tx.signer,
            sequence: tx.sequence,
            gas_limit,
            fee: tx.fee,
            priority,
            local,
            admitted_at: Instant::now(),
        })
    }

    /// Admits `tx` using the pool's default (configured bond-denom) priority
    /// function.
    pub fn insert(&self, tx: UnverifiedTransaction, local: bool) -> Result<(), Error> {
        self.insert_by(tx, local, None)
    }

    /// Admits `tx`, optionally overriding the priority function for this one
    /// call (`tx_priority_fn` in the coordinator's `cosmos_pool_config`).
    pub fn insert_by(
        &self,
        tx: UnverifiedTransaction,
        local: bool,
        priority_fn: Option<&dyn Fn(&[crate::types::Coin], u64) -> ethereum_types::U256>,
    ) -> Result<(), Error> {
        let mut verified = self.verify(tx, local)?;
        if let Some(priority_fn) = priority_fn {
            verified.priority = priority_fn(&verified.fee, verified.gas_limit);
        }
        match self.pool.write().import(verified) {
            Ok(_) => Ok(()),
            // already_known is not an error: the caller should see success.
            Err(txpool::Error::AlreadyImported(_)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Transactions in priority order, excluding `exclude` and anything
    /// below the configured `min_priority_value`. Per-sender sequence order
    /// is preserved structurally by the underlying pool.
    pub fn select(&self, exclude: &HashSet<H256>) -> Vec<Arc<VerifiedTransaction>> {
        self.select_by(exclude, |_| true)
    }

    /// Like [`CosmosPool::select`], additionally restricted by a caller
    /// predicate.
    pub fn select_by(
        &self,
        exclude: &HashSet<H256>,
        mut filter: impl FnMut(&VerifiedTransaction) -> bool,
    ) -> Vec<Arc<VerifiedTransaction>> {
        let min_priority = self.config.read().min_priority_value;
        self.pool
            .read()
            .pending(AlwaysReady)
            .filter(|tx| !exclude.contains(&tx.hash))
            .filter(|tx| tx.priority >= min_priority)
            .filter(|tx| filter(tx))
            .collect()
    }

    /// Total number of transactions stored.
    pub fn count(&self) -> usize {
        self.pool.read().len()
    }

    /// Removes a transaction by hash.
    pub fn remove(&self, hash: &H256) -> Option<Arc<VerifiedTransaction>> {
        self.pool.write().remove(hash)
    }

    /// Looks up a stored transaction by hash.
    pub fn get(&self, hash: &H256) -> Option<Arc<VerifiedTransaction>> {
        self.pool.read().get(hash)
    }

    /// All stored transactions grouped by sender, ascending by sequence.
    pub fn content(&self) -> Vec<(crate::types::Bech32Address, Vec<Arc<VerifiedTransaction>>)> {
        let pool = self.pool.read();
        pool.senders()
            .map(|sender| (sender.clone(), pool.by_sender(sender).cloned().collect()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ethereum_types::U256;

    use super::*;
    use crate::types::{Bech32Address, Coin};

    fn signer(n: u8) -> Bech32Address {
        Bech32Address::new("cosmos", vec![n; 20])
    }

    fn tx(hash: u64, signer: Bech32Address, sequence: u64, fee_amount: u64, gas_limit: i64) -> UnverifiedTransaction {
        UnverifiedTransaction {
            hash: H256::from_low_u64_be(hash),
            signer,
            sequence,
            gas_limit,
            fee: vec![Coin::new("stake", U256::from(fee_amount))],
        }
    }

    #[test]
    fn inserts_and_counts() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        assert!(pool.insert(tx(1, signer(1), 0, 1_000_000, 200_000), true).is_ok());
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn rejects_non_positive_gas_limit() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        let err = pool.insert(tx(1, signer(1), 0, 1_000_000, 0), true).unwrap_err();
        assert_eq!(err, Error::NonPositiveGasLimit);
    }

    #[test]
    fn unrecognized_denom_gets_zero_priority_but_is_accepted() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        let mut unrecognized = tx(1, signer(1), 0, 1_000_000, 200_000);
        unrecognized.fee = vec![Coin::new("uatom", U256::from(1_000_000u64))];
        assert!(pool.insert(unrecognized, true).is_ok());
        let stored = pool.get(&H256::from_low_u64_be(1)).unwrap();
        assert_eq!(stored.priority, U256::zero());
    }

    #[test]
    fn select_orders_by_priority_across_senders() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        // priority = fee / gas_limit: signer1 -> 5e9/200_000 = 25_000, signer2 -> 1e9/200_000 = 5_000
        pool.insert(tx(1, signer(1), 0, 5_000_000_000, 200_000), true).unwrap();
        pool.insert(tx(2, signer(2), 0, 1_000_000_000, 200_000), true).unwrap();

        let selected: Vec<H256> = pool.select(&HashSet::new()).iter().map(|t| t.hash).collect();
        assert_eq!(selected, vec![H256::from_low_u64_be(1), H256::from_low_u64_be(2)]);
    }

    #[test]
    fn strict_sequence_holds_back_later_sequence() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        pool.insert(tx(1, signer(1), 0, 1_000_000_000, 200_000), true).unwrap();
        pool.insert(tx(2, signer(1), 1, 50_000_000_000, 200_000), true).unwrap();

        // sequence 1 has far higher priority but must wait for sequence 0.
        let selected: Vec<H256> = pool.select(&HashSet::new()).iter().map(|t| t.hash).collect();
        assert_eq!(selected, vec![H256::from_low_u64_be(1), H256::from_low_u64_be(2)]);
    }

    #[test]
    fn exclude_hides_hash_from_selection() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        pool.insert(tx(1, signer(1), 0, 1_000_000_000, 200_000), true).unwrap();
        let mut exclude = HashSet::new();
        exclude.insert(H256::from_low_u64_be(1));
        assert!(pool.select(&exclude).is_empty());
    }

    #[test]
    fn inserting_the_same_hash_twice_is_a_no_op_success() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        assert!(pool.insert(tx(1, signer(1), 0, 1_000_000_000, 200_000), true).is_ok());
        assert!(pool.insert(tx(1, signer(1), 0, 1_000_000_000, 200_000), true).is_ok());
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn remove_clears_the_entry() {
        let pool = CosmosPool::new(CosmosPoolConfig::default());
        pool.insert(tx(1, signer(1), 0, 1_000_000_000, 200_000), true).unwrap();
        assert!(pool.remove(&H256::from_low_u64_be(1)).is_some());
        assert_eq!(pool.count(), 0);
    }
}
