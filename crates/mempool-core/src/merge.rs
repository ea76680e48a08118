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

//! Lazy pairwise merge of the EVM and Cosmos sub-pool iterators, ordered by
//! effective tip/priority. Ties favor the EVM side.

use std::{iter::Peekable, sync::Arc, vec};

use ethereum_types::U256;

use crate::envelope::Envelope;

/// Single-pass merge over the two sub-pools' already priority-ordered
/// pending sets.
///
/// Not restartable: once a step is taken it cannot be replayed. Both
/// underlying sequences are pre-materialized snapshots (taken when the
/// coordinator built this iterator), so this type holds no lock into
/// either sub-pool.
pub struct MergeIterator {
    evm: Peekable<vec::IntoIter<Arc<evm_pool::VerifiedTransaction>>>,
    cosmos: Peekable<vec::IntoIter<Arc<cosmos_pool::VerifiedTransaction>>>,
    base_fee: Option<U256>,
}

impl MergeIterator {
    pub(crate) fn new(
        evm: Vec<Arc<evm_pool::VerifiedTransaction>>,
        cosmos: Vec<Arc<cosmos_pool::VerifiedTransaction>>,
        base_fee: Option<U256>,
    ) -> Self {
        MergeIterator { evm: evm.into_iter().peekable(), cosmos: cosmos.into_iter().peekable(), base_fee }
    }
}

impl Iterator for MergeIterator {
    type Item = Envelope;

    fn next(&mut self) -> Option<Envelope> {
        let take_evm = match (self.evm.peek(), self.cosmos.peek()) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(ev), Some(cos)) => {
                let ev_tip = ev.fees.effective_tip(self.base_fee);
                let cos_priority = cos.priority;
                // Ties (and an unrepresentable/zero Cosmos priority) go to
                // the EVM side.
                cos_priority.is_zero() || ev_tip >= cos_priority
            }
        };

        if take_evm {
            self.evm.next().map(Envelope::Evm)
        } else {
            self.cosmos.next().map(Envelope::Cosmos)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use ethereum_types::{Address, H256};

    use super::*;
    use cosmos_pool::{Bech32Address, Coin};
    use evm_pool::FeeSchedule;

    fn evm_tx(hash: u64, gas_price: u64) -> Arc<evm_pool::VerifiedTransaction> {
        Arc::new(evm_pool::VerifiedTransaction {
            hash: H256::from_low_u64_be(hash),
            sender: Address::from_low_u64_be(1),
            nonce: 0,
            gas_limit: 21_000,
            fees: FeeSchedule::Legacy { gas_price: U256::from(gas_price) },
            value: U256::zero(),
            to: None,
            data_len: 0,
            local: true,
            admitted_at: Instant::now(),
        })
    }

    fn cosmos_tx(hash: u64, priority: u64) -> Arc<cosmos_pool::VerifiedTransaction> {
        Arc::new(cosmos_pool::VerifiedTransaction {
            hash: H256::from_low_u64_be(hash),
            signer: Bech32Address::new("cosmos", vec![1u8; 20]),
            sequence: 0,
            gas_limit: 200_000,
            fee: vec![Coin::new("stake", U256::from(priority) * U256::from(200_000u64))],
            priority: U256::from(priority),
            local: true,
            admitted_at: Instant::now(),
        })
    }

    #[test]
    fn higher_evm_tip_wins_fee_priority_merge() {
        // height=3, base_fee=0: cosmos fee=5e9, gas=200_000 -> priority 25_000.
        // evm gas_price=8e9, nonce=0 -> tip 8e9, which as an integer beats
        // 25_000, so EVM is served first.
        let iter = MergeIterator::new(vec![evm_tx(1, 8_000_000_000)], vec![cosmos_tx(2, 25_000)], Some(U256::zero()));
        let order: Vec<H256> = iter.map(|e| e.hash()).collect();
        assert_eq!(order, vec![H256::from_low_u64_be(1), H256::from_low_u64_be(2)]);
    }

    #[test]
    fn ties_favor_evm() {
        let iter = MergeIterator::new(vec![evm_tx(1, 100)], vec![cosmos_tx(2, 100)], Some(U256::zero()));
        let order: Vec<H256> = iter.map(|e| e.hash()).collect();
        assert_eq!(order[0], H256::from_low_u64_be(1));
    }

    #[test]
    fn zero_cosmos_priority_never_blocks_evm() {
        let iter = MergeIterator::new(vec![evm_tx(1, 0)], vec![cosmos_tx(2, 0)], Some(U256::zero()));
        let order: Vec<H256> = iter.map(|e| e.hash()).collect();
        assert_eq!(order[0], H256::from_low_u64_be(1));
    }

    #[test]
    fn single_sided_input_is_served_in_full() {
        let iter = MergeIterator::new(vec![], vec![cosmos_tx(1, 10), cosmos_tx(2, 5)], None);
        let order: Vec<H256> = iter.map(|e| e.hash()).collect();
        assert_eq!(order, vec![H256::from_low_u64_be(1), H256::from_low_u64_be(2)]);
    }
}
