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

//! The CheckTx gateway: runs a node's own admission pipeline ahead of
//! insertion, and re-routes a nonce-gapped result into the coordinator's
//! queued-acceptable path instead of dropping it on the floor.
//!
//! The gateway never swallows the admission pipeline's verdict: whatever
//! `pipeline.check` returns is handed back to the caller unchanged, so a
//! transaction that fails for a reason other than its own future nonce is
//! never gossiped further by the caller.

use crate::{coordinator::Coordinator, envelope::IncomingTransaction};

/// Why an admission pipeline rejected a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// The transaction's nonce/sequence is ahead of the account's current
    /// value; it may become valid once earlier transactions land.
    NonceGap,
    /// The transaction's nonce/sequence is behind the account's current
    /// value; it can never become valid as-is.
    NonceLow,
    /// Any other admission failure (insufficient funds, bad signature,
    /// oversized payload, and so on).
    Other(String),
}

/// The result of running a transaction through a node's admission pipeline.
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    pub gas_used: u64,
    pub error: Option<AdmissionError>,
}

impl AdmissionOutcome {
    pub fn accepted(gas_used: u64) -> Self {
        AdmissionOutcome { gas_used, error: None }
    }

    pub fn rejected(error: AdmissionError) -> Self {
        AdmissionOutcome { gas_used: 0, error: Some(error) }
    }

    pub fn is_accepted(&self) -> bool {
        self.error.is_none()
    }
}

/// A node's own stateful transaction check (ante-handler, EVM dry-run,
/// whatever the embedding application provides). Implemented by the
/// caller, not by this crate.
pub trait AdmissionPipeline {
    fn check(&self, tx: &IncomingTransaction) -> AdmissionOutcome;
}

/// Wraps a [`Coordinator`] with the CheckTx re-routing behavior.
pub struct CheckTxGateway<'a> {
    coordinator: &'a Coordinator,
}

impl<'a> CheckTxGateway<'a> {
    pub fn new(coordinator: &'a Coordinator) -> Self {
        CheckTxGateway { coordinator }
    }

    /// Runs `pipeline.check(&tx)`, and when the verdict is a nonce gap or a
    /// stale nonce, additionally queues `tx` into the coordinator via
    /// [`Coordinator::insert_invalid_nonce`] so it is not lost. The
    /// original verdict is always returned, regardless of whether the
    /// queueing attempt itself succeeds.
    pub fn check_tx(&self, tx: IncomingTransaction, pipeline: &dyn AdmissionPipeline) -> AdmissionOutcome {
        let outcome = pipeline.check(&tx);

        if matches!(outcome.error, Some(AdmissionError::NonceGap) | Some(AdmissionError::NonceLow)) {
            if let Err(err) = self.coordinator.insert_invalid_nonce(tx) {
                log::debug!(target: "checktx", "nonce-gapped transaction not queued: {err}");
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ethereum_types::{Address, H256, U256};

    use super::*;
    use crate::{config::CoordinatorConfig, coordinator::Broadcaster, envelope::Message};
    use chain_view::TestChainView;
    use cosmos_pool::Bech32Address;
    use evm_pool::{FeeSchedule, UnverifiedTransaction};

    struct NoopBroadcaster;
    impl Broadcaster for NoopBroadcaster {
        fn broadcast(&self, _txs: &[Arc<evm_pool::VerifiedTransaction>]) {}
    }

    fn addr(n: u8) -> Address {
        Address::from_low_u64_be(n as u64)
    }

    fn evm_tx(nonce: u64) -> IncomingTransaction {
        let hash = H256::from_low_u64_be(nonce + 1);
        IncomingTransaction {
            hash,
            signer: Bech32Address::new("cosmos", vec![1; 20]),
            sequence: nonce,
            fee: vec![],
            gas_limit: 21_000,
            messages: vec![Message::Evm(UnverifiedTransaction {
                hash,
                sender: addr(1),
                nonce,
                gas_limit: 21_000,
                fees: FeeSchedule::Legacy { gas_price: U256::from(10_000_000_000u64) },
                value: U256::zero(),
                to: Some(addr(2)),
                data_len: 0,
                chain_id: None,
                signature_valid: true,
            })],
            raw: nonce.to_be_bytes().to_vec(),
        }
    }

    struct AlwaysNonceGap;
    impl AdmissionPipeline for AlwaysNonceGap {
        fn check(&self, _tx: &IncomingTransaction) -> AdmissionOutcome {
            AdmissionOutcome::rejected(AdmissionError::NonceGap)
        }
    }

    #[test]
    fn nonce_gap_is_queued_but_verdict_is_preserved() {
        let chain_view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        chain_view.set_nonce(addr(1), 0);

        let coordinator = Coordinator::new(
            chain_view.clone(),
            CoordinatorConfig::default(),
            Arc::new(evm_pool::TrustedSender),
            Arc::new(NoopBroadcaster),
            None,
        );

        let gateway = CheckTxGateway::new(&coordinator);
        let outcome = gateway.check_tx(evm_tx(5), &AlwaysNonceGap);

        assert_eq!(outcome.error, Some(AdmissionError::NonceGap));
        assert!(coordinator.pool_content_from(addr(1)).queued.len() >= 1 || coordinator.count() >= 1);

        coordinator.close();
    }
}
