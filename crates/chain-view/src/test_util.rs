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

//! An in-memory [`ChainView`] fixture for use in other crates' unit tests.

use std::collections::HashMap;

use ethereum_types::{Address, H256, U256};
use parking_lot::RwLock;

use crate::{
    error::Error,
    header::{HeadChange, Header},
    view::ChainView,
};

struct State {
    header: Option<Header>,
    nonces: HashMap<Address, u64>,
    balances: HashMap<Address, U256>,
}

/// A hand-rolled, in-memory stand-in for a real `ChainView`.
///
/// Tests drive it directly: set the current header and per-account state
/// with the setters, then call `notify_new_block` to push a `HeadChange` to
/// anything holding a receiver from `subscribe_head_changes`.
pub struct TestChainView {
    state: RwLock<State>,
    sender: crossbeam_channel::Sender<HeadChange>,
    receiver: crossbeam_channel::Receiver<HeadChange>,
}

impl Default for TestChainView {
    fn default() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        TestChainView {
            state: RwLock::new(State {
                header: None,
                nonces: HashMap::new(),
                balances: HashMap::new(),
            }),
            sender,
            receiver,
        }
    }
}

impl TestChainView {
    /// Creates a fixture already past the "not ready" threshold, at the
    /// given height and base fee.
    pub fn at_height(number: u64, base_fee: Option<U256>) -> Self {
        let view = Self::default();
        view.set_header(Header {
            number,
            hash: H256::from_low_u64_be(number),
            parent_hash: H256::from_low_u64_be(number.saturating_sub(1)),
            base_fee,
            gas_limit: 30_000_000,
        });
        view
    }

    /// Overwrites the current header without emitting a `HeadChange`.
    pub fn set_header(&self, header: Header) {
        self.state.write().header = Some(header);
    }

    /// Sets an account's nonce as observed at the current head.
    pub fn set_nonce(&self, sender: Address, nonce: u64) {
        self.state.write().nonces.insert(sender, nonce);
    }

    /// Sets an account's balance as observed at the current head.
    pub fn set_balance(&self, sender: Address, balance: U256) {
        self.state.write().balances.insert(sender, balance);
    }
}

impl ChainView for TestChainView {
    fn current_header(&self) -> Result<Header, Error> {
        let guard = self.state.read();
        match guard.header {
            Some(header) if header.number >= 2 => Ok(header),
            _ => Err(Error::NotReady),
        }
    }

    fn nonce_at(&self, _head: H256, sender: &Address) -> Result<u64, Error> {
        self.current_header()?;
        Ok(self.state.read().nonces.get(sender).copied().unwrap_or(0))
    }

    fn balance_at(&self, _head: H256, sender: &Address) -> Result<U256, Error> {
        self.current_header()?;
        Ok(self
            .state
            .read()
            .balances
            .get(sender)
            .copied()
            .unwrap_or_default())
    }

    fn subscribe_head_changes(&self) -> crossbeam_channel::Receiver<HeadChange> {
        self.receiver.clone()
    }

    fn notify_new_block(&self, header: Header) {
        self.set_header(header);
        let _ = self.sender.send(HeadChange { header });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_before_height_two() {
        let view = TestChainView::default();
        view.set_header(Header {
            number: 1,
            hash: H256::from_low_u64_be(1),
            parent_hash: H256::zero(),
            base_fee: None,
            gas_limit: 30_000_000,
        });
        assert_eq!(view.current_header(), Err(Error::NotReady));
    }

    #[test]
    fn ready_at_height_two() {
        let view = TestChainView::at_height(2, Some(U256::from(1_000_000_000u64)));
        assert_eq!(view.current_header().unwrap().number, 2);
    }

    #[test]
    fn notify_new_block_is_observed_by_subscriber() {
        let view = TestChainView::at_height(2, None);
        let rx = view.subscribe_head_changes();
        view.notify_new_block(Header {
            number: 3,
            hash: H256::from_low_u64_be(3),
            parent_hash: H256::from_low_u64_be(2),
            base_fee: None,
            gas_limit: 30_000_000,
        });
        let change = rx.recv().unwrap();
        assert_eq!(change.header.number, 3);
    }
}
