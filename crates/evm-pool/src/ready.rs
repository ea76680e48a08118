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

use std::collections::HashMap;

use chain_view::ChainView;
use ethereum_types::{Address, H256, U256};
use txpool::{Readiness, Ready};

use crate::transaction::VerifiedTransaction;

/// Classifies pending-vs-queued by walking each sender's nonces in
/// ascending order and tracking the next expected nonce plus remaining
/// balance as it goes.
///
/// A transaction below the expected nonce is [`Readiness::Stale`] (it was
/// already included and should be dropped by the caller). A transaction at
/// the expected nonce but whose cost would exceed the remaining balance, or
/// strictly above the expected nonce, is [`Readiness::Future`] — stopping
/// the walk for that sender without discarding anything.
pub struct NonceContiguous<'a> {
    chain_view: &'a dyn ChainView,
    head: H256,
    next_nonce: HashMap<Address, u64>,
    remaining_balance: HashMap<Address, U256>,
}

impl<'a> NonceContiguous<'a> {
    pub fn new(chain_view: &'a dyn ChainView, head: H256) -> Self {
        NonceContiguous {
            chain_view,
            head,
            next_nonce: HashMap::new(),
            remaining_balance: HashMap::new(),
        }
    }

    fn expected_nonce(&mut self, sender: Address) -> u64 {
        if let Some(nonce) = self.next_nonce.get(&sender) {
            return *nonce;
        }
        let nonce = self
            .chain_view
            .nonce_at(self.head, &sender)
            .unwrap_or_default();
        self.next_nonce.insert(sender, nonce);
        nonce
    }

    fn balance_remaining(&mut self, sender: Address) -> U256 {
        if let Some(balance) = self.remaining_balance.get(&sender) {
            return *balance;
        }
        let balance = self
            .chain_view
            .balance_at(self.head, &sender)
            .unwrap_or_default();
        self.remaining_balance.insert(sender, balance);
        balance
    }
}

impl<'a> Ready<VerifiedTransaction> for NonceContiguous<'a> {
    fn is_ready(&mut self, tx: &VerifiedTransaction) -> Readiness {
        let expected = self.expected_nonce(tx.sender);
        if tx.nonce < expected {
            return Readiness::Stale;
        }
        if tx.nonce > expected {
            return Readiness::Future;
        }

        let balance = self.balance_remaining(tx.sender);
        let cost = tx.cost();
        if balance < cost {
            return Readiness::Future;
        }

        self.remaining_balance.insert(tx.sender, balance - cost);
        self.next_nonce.insert(tx.sender, expected + 1);
        Readiness::Ready
    }
}
