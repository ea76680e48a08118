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

use std::time::Instant;

use ethereum_types::{H256, U256};

use crate::types::{Bech32Address, Coin};

/// A Cosmos SDK transaction as received off the wire, not yet admitted.
///
/// `gas_limit` is signed because the wire format does not guarantee a
/// sane value; [`crate::pool::CosmosPool::insert`] rejects anything that
/// is not strictly positive before it ever reaches a [`VerifiedTransaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedTransaction {
    pub hash: H256,
    pub signer: Bech32Address,
    pub sequence: u64,
    pub gas_limit: i64,
    pub fee: Vec<Coin>,
}

/// A transaction admitted into the Cosmos sub-pool.
///
/// `priority` is the effective fee-per-gas in the bond denomination,
/// computed once at insertion time against whatever bond denom was in
/// effect for that call — it is never recomputed later.
#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    pub hash: H256,
    pub signer: Bech32Address,
    pub sequence: u64,
    pub gas_limit: u64,
    pub fee: Vec<Coin>,
    pub priority: U256,
    pub local: bool,
    pub admitted_at: Instant,
}

impl txpool::VerifiedTransaction for VerifiedTransaction {
    type Hash = H256;
    type Sender = Bech32Address;

    fn hash(&self) -> &H256 {
        &self.hash
    }

    fn sender(&self) -> &Bech32Address {
        &self.signer
    }

    fn ordinal(&self) -> u64 {
        self.sequence
    }

    fn mem_usage(&self) -> usize {
        128 + self.fee.len() * 48
    }
}

/// `fee_amount_in(bond_denom) / gas_limit`, or zero if the fee list carries
/// no coin in `bond_denom` — an unrecognized fee denom is accepted, not
/// rejected, and simply sorts behind every recognized-denom transaction.
pub fn priority_in_bond_denom(fee: &[Coin], bond_denom: &str, gas_limit: u64) -> U256 {
    if gas_limit == 0 {
        return U256::zero();
    }
    let amount = fee
        .iter()
        .find(|coin| coin.denom == bond_denom)
        .map(|coin| coin.amount)
        .unwrap_or_default();
    amount / U256::from(gas_limit)
}
