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

use std::{cmp, time::Instant};

use ethereum_types::{Address, H256, U256};

/// The transaction's fee parameters, legacy or EIP-1559 dynamic-fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeSchedule {
    /// Pre-EIP-1559 transaction: a single gas price.
    Legacy { gas_price: U256 },
    /// EIP-1559 transaction: a fee cap and a tip cap.
    DynamicFee { fee_cap: U256, tip_cap: U256 },
}

impl FeeSchedule {
    /// `min(tip_cap, fee_cap - base_fee)` for dynamic-fee, `gas_price -
    /// base_fee` for legacy; both clamped at zero. `base_fee` absent means a
    /// pre-EIP-1559 chain, where legacy transactions pay their full price.
    pub fn effective_tip(&self, base_fee: Option<U256>) -> U256 {
        match (*self, base_fee) {
            (FeeSchedule::Legacy { gas_price }, Some(base_fee)) => {
                gas_price.saturating_sub(base_fee)
            }
            (FeeSchedule::Legacy { gas_price }, None) => gas_price,
            (FeeSchedule::DynamicFee { fee_cap, tip_cap }, base_fee) => {
                let base_fee = base_fee.unwrap_or_default();
                let headroom = fee_cap.saturating_sub(base_fee);
                cmp::min(tip_cap, headroom)
            }
        }
    }

    /// The maximum the sender is willing to pay per unit of gas.
    pub fn fee_cap(&self) -> U256 {
        match *self {
            FeeSchedule::Legacy { gas_price } => gas_price,
            FeeSchedule::DynamicFee { fee_cap, .. } => fee_cap,
        }
    }

    /// The maximum tip the sender is willing to pay the proposer.
    pub fn tip_cap(&self) -> U256 {
        match *self {
            FeeSchedule::Legacy { gas_price } => gas_price,
            FeeSchedule::DynamicFee { tip_cap, .. } => tip_cap,
        }
    }
}

/// An Ethereum transaction as received from the wire, not yet admitted.
///
/// Signature recovery itself is out of scope for this crate: `sender` is
/// expected to already carry the address recovered by the node's signing
/// layer, and `signature_valid` reflects whether that recovery succeeded.
/// A node wires its real ECDSA recovery in via [`crate::verifier::SignatureChecker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedTransaction {
    pub hash: H256,
    pub sender: Address,
    pub nonce: u64,
    pub gas_limit: u64,
    pub fees: FeeSchedule,
    pub value: U256,
    pub to: Option<Address>,
    pub data_len: usize,
    pub chain_id: Option<u64>,
    pub signature_valid: bool,
}

/// A transaction that has passed [`crate::verifier::Verifier`].
#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    pub hash: H256,
    pub sender: Address,
    pub nonce: u64,
    pub gas_limit: u64,
    pub fees: FeeSchedule,
    pub value: U256,
    pub to: Option<Address>,
    pub data_len: usize,
    /// Originates from this node (submitted via the local RPC, not gossip).
    pub local: bool,
    pub admitted_at: Instant,
}

impl VerifiedTransaction {
    /// `value + gas_limit * fee_cap`: the maximum this transaction alone
    /// could debit from the sender's balance.
    pub fn cost(&self) -> U256 {
        self.value
            .saturating_add(U256::from(self.gas_limit).saturating_mul(self.fees.fee_cap()))
    }
}

impl txpool::VerifiedTransaction for VerifiedTransaction {
    type Hash = H256;
    type Sender = Address;

    fn hash(&self) -> &H256 {
        &self.hash
    }

    fn sender(&self) -> &Address {
        &self.sender
    }

    fn ordinal(&self) -> u64 {
        self.nonce
    }

    fn mem_usage(&self) -> usize {
        // Fixed struct overhead plus the (approximate) wire payload.
        160 + self.data_len
    }
}
