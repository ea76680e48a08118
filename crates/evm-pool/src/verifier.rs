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

//! Validates an [`UnverifiedTransaction`] before it is handed to the pool.
//!
//! Cheap, structural checks (size, chain id, intrinsic gas, signature) run
//! before anything that requires a [`ChainView`] read (nonce, balance),
//! mirroring the reference verifier's ordering by cost.

use std::{sync::Arc, time::Instant};

use chain_view::ChainView;
use ethereum_types::Address;

use crate::{
    config::LegacyPoolConfig,
    error::Error,
    transaction::{UnverifiedTransaction, VerifiedTransaction},
};

/// Recovers (or confirms) the sender of an [`UnverifiedTransaction`].
///
/// Real ECDSA signature recovery is out of scope for this crate; a node
/// wires in its own implementation. [`TrustedSender`] below is the
/// in-process default: it trusts the sender already attached to the wire
/// transaction and rejects only what the transport has already flagged as
/// unrecoverable via `signature_valid`.
pub trait SignatureChecker: Send + Sync {
    fn recover_sender(&self, tx: &UnverifiedTransaction) -> Result<Address, Error>;
}

/// Trusts the sender embedded in the transaction, subject to the
/// transport-level `signature_valid` flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustedSender;

impl SignatureChecker for TrustedSender {
    fn recover_sender(&self, tx: &UnverifiedTransaction) -> Result<Address, Error> {
        if tx.signature_valid {
            Ok(tx.sender)
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

/// The standard intrinsic gas cost of a plain value transfer, before any
/// calldata or contract-creation surcharge.
const TX_BASE_GAS: u64 = 21_000;
/// Additional gas charged when `to` is absent (contract creation).
const TX_CREATE_GAS: u64 = 32_000;
/// Gas charged per byte of calldata (upper-bound approximation; this crate
/// does not distinguish zero from non-zero bytes).
const TX_DATA_GAS_PER_BYTE: u64 = 16;

fn intrinsic_gas(data_len: usize, is_create: bool) -> u64 {
    TX_BASE_GAS
        + if is_create { TX_CREATE_GAS } else { 0 }
        + (data_len as u64).saturating_mul(TX_DATA_GAS_PER_BYTE)
}

/// Checks an [`UnverifiedTransaction`] against the configured policy and
/// the chain's current state, producing a [`VerifiedTransaction`] or the
/// reason it was rejected.
pub struct Verifier {
    chain_view: Arc<dyn ChainView>,
    signature_checker: Arc<dyn SignatureChecker>,
    config: LegacyPoolConfig,
}

impl Verifier {
    pub fn new(
        chain_view: Arc<dyn ChainView>,
        signature_checker: Arc<dyn SignatureChecker>,
        config: LegacyPoolConfig,
    ) -> Self {
        Verifier { chain_view, signature_checker, config }
    }

    pub fn config(&self) -> &LegacyPoolConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LegacyPoolConfig) {
        self.config = config;
    }

    /// Verifies `tx`, marking the result `local` as requested by the
    /// caller (affects eviction preference only, never admission).
    pub fn verify(&self, tx: UnverifiedTransaction, local: bool) -> Result<VerifiedTransaction, Error> {
        if tx.data_len > self.config.max_tx_data_bytes {
            return Err(Error::OversizedData);
        }

        if let (Some(required), Some(actual)) = (self.config.chain_id, tx.chain_id) {
            if required != actual {
                return Err(Error::ChainIdMismatch);
            }
        }

        let sender = self.signature_checker.recover_sender(&tx)?;
        if sender != tx.sender {
            return Err(Error::InvalidSignature);
        }

        let intrinsic = intrinsic_gas(tx.data_len, tx.to.is_none());
        if tx.gas_limit < intrinsic {
            return Err(Error::IntrinsicGasTooLow);
        }

        let header = self.chain_view.current_header()?;
        let current_nonce = self.chain_view.nonce_at(header.hash, &sender)?;
        if tx.nonce < current_nonce {
            return Err(Error::NonceLow);
        }

        let verified = VerifiedTransaction {
            hash: tx.hash,
            sender,
            nonce: tx.nonce,
            gas_limit: tx.gas_limit,
            fees: tx.fees,
            value: tx.value,
            to: tx.to,
            data_len: tx.data_len,
            local,
            admitted_at: Instant::now(),
        };

        let balance = self.chain_view.balance_at(header.hash, &sender)?;
        if balance < verified.cost() {
            return Err(Error::InsufficientBalance);
        }

        let effective_tip = verified.fees.effective_tip(header.base_fee);
        if effective_tip < self.config.minimum_effective_tip.into() {
            return Err(Error::FeeTooLow);
        }

        if tx.nonce > current_nonce {
            // Not an error: the queue admits it, just into the queued side.
            log::debug!(target: "evm_pool", "admitting {:x} with a nonce gap ({} > {})", tx.hash, tx.nonce, current_nonce);
        }

        Ok(verified)
    }
}
