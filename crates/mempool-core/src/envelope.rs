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

//! The common transaction envelope presented to the block builder: a
//! discriminated sum of the two sub-pools' verified transaction types, and
//! the structural routing rule applied to everything coming in.

use std::sync::Arc;

use ethereum_types::H256;

use crate::error::Error;

/// A transaction as handed to the block proposer by [`crate::merge::MergeIterator`].
#[derive(Debug, Clone)]
pub enum Envelope {
    /// An Ethereum transaction. Carries the originating hash so the
    /// proposer can correlate it back to the EVM sub-pool.
    Evm(Arc<evm_pool::VerifiedTransaction>),
    /// A Cosmos SDK transaction.
    Cosmos(Arc<cosmos_pool::VerifiedTransaction>),
}

impl Envelope {
    /// The transaction's hash, regardless of dialect.
    pub fn hash(&self) -> H256 {
        match self {
            Envelope::Evm(tx) => tx.hash,
            Envelope::Cosmos(tx) => tx.hash,
        }
    }

    /// Whether this envelope wraps an Ethereum transaction.
    pub fn is_evm(&self) -> bool {
        matches!(self, Envelope::Evm(_))
    }
}

/// One message within an incoming Cosmos SDK-style transaction envelope.
///
/// Everything other than a signed Ethereum transaction is structurally
/// opaque here: this crate only needs to tell an EVM message apart from
/// anything else to route it.
#[derive(Debug, Clone)]
pub enum Message {
    /// A signed Ethereum transaction, wrapped as a Cosmos SDK message
    /// (the `MsgEthereumTx` shape).
    Evm(evm_pool::UnverifiedTransaction),
    /// Any other Cosmos SDK message.
    Other,
}

/// An incoming transaction envelope, not yet admitted to either sub-pool.
///
/// Wire decoding into this shape is a collaborator's job (signing/ABI/proto
/// decoding is out of scope here); the coordinator only ever sees the
/// already-decoded result, but it is this type — not the decoder — that
/// applies the routing rule: exactly one message, and that message is a
/// signed Ethereum transaction, routes to the EVM sub-pool; everything else
/// routes to the Cosmos sub-pool.
#[derive(Debug, Clone)]
pub struct IncomingTransaction {
    pub hash: H256,
    pub signer: cosmos_pool::Bech32Address,
    pub sequence: u64,
    pub fee: Vec<cosmos_pool::Coin>,
    pub gas_limit: i64,
    pub messages: Vec<Message>,
    /// The envelope's raw wire bytes, as received. Carried only so
    /// [`crate::coordinator::Coordinator::insert`] can append a locally-
    /// originated EVM admission to its journal; never inspected otherwise.
    pub raw: Vec<u8>,
}

/// Where an [`IncomingTransaction`] belongs, once routed.
pub(crate) enum Route {
    Evm(evm_pool::UnverifiedTransaction),
    Cosmos(cosmos_pool::UnverifiedTransaction),
}

impl IncomingTransaction {
    /// Applies the structural routing rule. Does not inspect message
    /// contents beyond `Message::Evm` vs. everything else.
    pub(crate) fn route(self) -> Route {
        if self.messages.len() == 1 {
            if let Message::Evm(utx) = &self.messages[0] {
                return Route::Evm(utx.clone());
            }
        }
        Route::Cosmos(cosmos_pool::UnverifiedTransaction {
            hash: self.hash,
            signer: self.signer,
            sequence: self.sequence,
            gas_limit: self.gas_limit,
            fee: self.fee,
        })
    }

    /// Like [`IncomingTransaction::route`], but rejects anything other than
    /// a single Ethereum message instead of falling back to the Cosmos
    /// sub-pool. Used by [`crate::coordinator::Coordinator::insert_invalid_nonce`],
    /// which only ever re-queues nonce-gapped Ethereum transactions.
    pub(crate) fn route_evm_only(self) -> Result<evm_pool::UnverifiedTransaction, Error> {
        match self.messages.len() {
            0 => Err(Error::NoMessages),
            1 => match self.messages.into_iter().next() {
                Some(Message::Evm(utx)) => Ok(utx),
                _ => Err(Error::NotEvmMessage),
            },
            _ => Err(Error::MultiMessage),
        }
    }
}
