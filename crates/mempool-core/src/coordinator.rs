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

//! The unified coordinator: single entry point routing by message type,
//! mediating concurrency with one mutex around entry points.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use chain_view::ChainView;
use ethereum_types::{Address, H256};
use parking_lot::Mutex;

use crate::{
    config::CoordinatorConfig,
    envelope::{IncomingTransaction, Route},
    error::Error,
    journal::Journal,
    merge::MergeIterator,
    metrics::Metrics,
};

/// Invoked on each promotion with the list of newly-pending EVM
/// transactions. Modeled as a trait (rather than a bare closure) so it has
/// a name at the call site and can be `Arc`-shared with a real gossip
/// mempool implementation. Owned by the coordinator; invoked only from the
/// EVM sub-pool's own reset thread, outside that sub-pool's internal lock.
pub trait Broadcaster: Send + Sync {
    fn broadcast(&self, txs: &[Arc<evm_pool::VerifiedTransaction>]);
}

/// Outcome of probing a stored transaction against the node's ante-handler
/// before [`Coordinator::remove_evm`] decides whether to evict it now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnteOutcome {
    /// Still valid; leave it for the sub-pool's own promotion/demotion.
    Valid,
    /// Fails only with a nonce gap; leave it (it may become valid later).
    NonceGap,
    /// Fails only with an out-of-order sequence; leave it.
    InvalidSequence,
    /// Fails only because gas estimation could not complete; leave it.
    OutOfGas,
    /// Fails for any other reason; remove now.
    PermanentlyInvalid,
}

/// Probes whether a stored transaction should be evicted immediately.
pub trait AnteHandler: Send + Sync {
    fn check(&self, hash: &H256) -> AnteOutcome;
}

/// Read-only listing of one sender's EVM pending/queued entries, as
/// returned by [`Coordinator::pool_content`] / `pool_content_from`.
#[derive(Debug, Clone, Default)]
pub struct SenderContent {
    pub pending: Vec<Arc<evm_pool::VerifiedTransaction>>,
    pub queued: Vec<Arc<evm_pool::VerifiedTransaction>>,
}

/// Full pool content grouped by sender and state (`pool_content` in
/// spec.md's telemetry surface).
#[derive(Debug, Clone, Default)]
pub struct PoolContent {
    pub evm: HashMap<Address, SenderContent>,
    pub cosmos: HashMap<cosmos_pool::Bech32Address, Vec<Arc<cosmos_pool::VerifiedTransaction>>>,
}

/// One sender's payload-free summary, as returned by `pool_inspect`.
#[derive(Debug, Clone)]
pub struct InspectSummary {
    pub sender: String,
    pub pending: usize,
    pub queued: usize,
}

/// Single entry point for both transaction dialects.
///
/// Every public method other than the telemetry reads takes the
/// coordinator mutex for its duration, then releases it before any
/// long-running work (broadcast, encoding) happens — those run on the EVM
/// sub-pool's own reset thread, never while this mutex is held.
pub struct Coordinator {
    evm_pool: evm_pool::TransactionQueue,
    cosmos_pool: cosmos_pool::CosmosPool,
    chain_view: Arc<dyn ChainView>,
    config: CoordinatorConfig,
    entry_mutex: Mutex<()>,
    metrics: Option<Arc<Metrics>>,
    closed: AtomicBool,
    journal: Journal,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator").field("count", &self.count()).finish()
    }
}

impl Coordinator {
    /// Builds a coordinator and starts the EVM sub-pool's background reset
    /// thread. `registry`, if given, registers this coordinator's
    /// [`Metrics`].
    pub fn new(
        chain_view: Arc<dyn ChainView>,
        config: CoordinatorConfig,
        signature_checker: Arc<dyn evm_pool::SignatureChecker>,
        broadcaster: Arc<dyn Broadcaster>,
        registry: Option<&prometheus::Registry>,
    ) -> Self {
        let verifier = evm_pool::Verifier::new(
            chain_view.clone(),
            signature_checker,
            config.legacy_pool_config,
        );
        let metrics = registry.and_then(|r| Metrics::new(r).ok()).map(Arc::new);
        let metrics_for_broadcast = metrics.clone();
        let evm_pool = evm_pool::TransactionQueue::new(
            chain_view.clone(),
            verifier,
            config.legacy_pool_config,
            Box::new(move |txs: &[Arc<evm_pool::VerifiedTransaction>]| {
                if let Some(metrics) = &metrics_for_broadcast {
                    metrics.record_promotions(txs.len());
                }
                broadcaster.broadcast(txs)
            }),
        );
        let cosmos_pool = cosmos_pool::CosmosPool::new(config.cosmos_pool_config.clone());
        let journal = Journal::open(&config.journal_path, config.journal_disabled).unwrap_or_else(|err| {
            log::warn!(
                target: "mempool_core",
                "failed to open local-transaction journal at {}: {err}; continuing unjournaled",
                config.journal_path.display()
            );
            Journal::open(&config.journal_path, true).expect("opening a disabled journal never touches the filesystem")
        });

        Coordinator {
            evm_pool,
            cosmos_pool,
            chain_view,
            config,
            entry_mutex: Mutex::new(()),
            metrics,
            closed: AtomicBool::new(false),
            journal,
        }
    }

    /// Replays the local-transaction journal written by prior
    /// [`Coordinator::insert`] calls, decoding each raw entry with `decode`
    /// and re-admitting it via `insert`. Decoding raw bytes back into an
    /// [`IncomingTransaction`] is a collaborator's job, same as on the live
    /// admission path; a line `decode` can't make sense of is dropped.
    /// Intended to run once, synchronously, before a node starts serving
    /// traffic. Returns the number of transactions the journal held,
    /// whether or not each one was re-admitted successfully.
    pub fn replay_journal(&self, mut decode: impl FnMut(Vec<u8>) -> Option<IncomingTransaction>) -> usize {
        self.journal
            .replay(&self.config.journal_path, |raw| match decode(raw) {
                Some(tx) => {
                    if let Err(err) = self.insert(tx) {
                        log::warn!(target: "mempool_core", "journal replay: re-admission failed: {err}");
                    }
                }
                None => log::warn!(target: "mempool_core", "journal replay: entry did not decode, skipping"),
            })
            .unwrap_or_else(|err| {
                log::warn!(target: "mempool_core", "journal replay failed: {err}");
                0
            })
    }

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::Shutdown);
        }
        self.chain_view.current_header().map_err(|_| Error::NotReady)?;
        Ok(())
    }

    /// Routes `tx` to the matching sub-pool: exactly one message that is a
    /// signed Ethereum transaction goes to the EVM sub-pool (always as
    /// local, submitted via this node's own surface, not gossip-relayed);
    /// everything else goes to the Cosmos sub-pool.
    pub fn insert(&self, tx: IncomingTransaction) -> Result<(), Error> {
        let _guard = self.entry_mutex.lock();
        self.ensure_ready()?;

        let raw = tx.raw.clone();
        match tx.route() {
            Route::Evm(utx) => {
                let result = self
                    .evm_pool
                    .add(vec![utx], true)
                    .into_iter()
                    .next()
                    .expect("add() returns exactly one result per input transaction");
                self.record(&result, "evm");
                if result.is_ok() {
                    if let Err(err) = self.journal.append(&raw) {
                        log::warn!(target: "mempool_core", "journal append failed: {err}");
                    }
                }
                result.map_err(Error::from)
            }
            Route::Cosmos(utx) => {
                let result = self.cosmos_pool.insert(utx, true);
                self.record_cosmos(&result);
                result.map_err(Error::from)
            }
        }
    }

    /// Forwards a nonce-gapped Ethereum transaction into the EVM sub-pool
    /// as a non-local (queued-acceptable) addition. `tx` must carry exactly
    /// one message and it must be a signed Ethereum transaction; anything
    /// else is rejected with [`Error::NoMessages`], [`Error::MultiMessage`],
    /// or [`Error::NotEvmMessage`].
    pub fn insert_invalid_nonce(&self, tx: IncomingTransaction) -> Result<(), Error> {
        let _guard = self.entry_mutex.lock();
        self.ensure_ready()?;

        let utx = tx.route_evm_only()?;
        let result = self
            .evm_pool
            .add(vec![utx], false)
            .into_iter()
            .next()
            .expect("add() returns exactly one result per input transaction");
        self.record(&result, "evm");
        result.map_err(Error::from)
    }

    fn record(&self, result: &Result<(), evm_pool::Error>, pool: &'static str) {
        let Some(metrics) = &self.metrics else { return };
        match result {
            Ok(()) => metrics.record_insert(pool),
            Err(err) => metrics.record_reject(evm_error_kind(err)),
        }
    }

    fn record_cosmos(&self, result: &Result<(), cosmos_pool::Error>) {
        let Some(metrics) = &self.metrics else { return };
        match result {
            Ok(()) => metrics.record_insert("cosmos"),
            Err(err) => metrics.record_reject(cosmos_error_kind(err)),
        }
    }

    /// Captures the current base fee, builds the EVM pending iterator with
    /// the configured `min_tip` filter, and merges it with the Cosmos
    /// sub-pool's iterator (restricted by `exclude`).
    pub fn select(&self, exclude: HashSet<H256>) -> MergeIterator {
        let base_fee = self.chain_view.current_header().ok().and_then(|h| h.base_fee);
        let filter = evm_pool::PendingFilter {
            min_tip: self.config.min_tip,
            base_fee,
            only_plain_txs: true,
            only_blob_txs: false,
        };
        let evm_txs = self.evm_pool.pending(filter);
        let cosmos_txs = self.cosmos_pool.select(&exclude);
        MergeIterator::new(evm_txs, cosmos_txs, base_fee)
    }

    /// Advances [`Coordinator::select`] while `filter` returns `true`.
    pub fn select_by(
        &self,
        exclude: HashSet<H256>,
        mut filter: impl FnMut(&crate::envelope::Envelope) -> bool,
    ) -> Vec<crate::envelope::Envelope> {
        self.select(exclude).take_while(|envelope| filter(envelope)).collect()
    }

    /// Evicts an Ethereum transaction now only if `ante` reports it
    /// permanently invalid; otherwise leaves it for the sub-pool's own
    /// promotion/demotion to resolve.
    pub fn remove_evm(&self, hash: &H256, ante: &dyn AnteHandler) -> Option<Arc<evm_pool::VerifiedTransaction>> {
        match ante.check(hash) {
            AnteOutcome::PermanentlyInvalid => self.evm_pool.remove(hash, true, true),
            AnteOutcome::Valid | AnteOutcome::NonceGap | AnteOutcome::InvalidSequence | AnteOutcome::OutOfGas => None,
        }
    }

    /// Removes a Cosmos transaction unconditionally.
    pub fn remove_cosmos(&self, hash: &H256) -> Option<Arc<cosmos_pool::VerifiedTransaction>> {
        self.cosmos_pool.remove(hash)
    }

    /// Sum of both sub-pools' transaction counts.
    pub fn count(&self) -> usize {
        let status = self.evm_pool.stats();
        status.pending + status.queued + self.cosmos_pool.count()
    }

    /// Shuts down both sub-pools. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.evm_pool.close();
    }

    /// `{pending, queued}` EVM sub-pool occupancy, refreshed into
    /// [`Metrics`] as a side effect when metrics are configured.
    pub fn pool_status(&self) -> evm_pool::Status {
        let status = self.evm_pool.stats();
        if let Some(metrics) = &self.metrics {
            metrics.observe_status(status, self.cosmos_pool.count());
        }
        status
    }

    /// Full listing grouped by sender and state.
    pub fn pool_content(&self) -> PoolContent {
        let (pending, queued) = self.evm_pool.content();
        let mut evm: HashMap<Address, SenderContent> = HashMap::new();
        for tx in pending {
            evm.entry(tx.sender).or_default().pending.push(tx);
        }
        for tx in queued {
            evm.entry(tx.sender).or_default().queued.push(tx);
        }
        let cosmos = self.cosmos_pool.content().into_iter().collect();
        PoolContent { evm, cosmos }
    }

    /// `addr`'s listing only.
    pub fn pool_content_from(&self, addr: Address) -> SenderContent {
        self.pool_content().evm.remove(&addr).unwrap_or_default()
    }

    /// Payload-free per-sender summaries across both sub-pools.
    pub fn pool_inspect(&self) -> Vec<InspectSummary> {
        let content = self.pool_content();
        let mut summaries: Vec<InspectSummary> = content
            .evm
            .into_iter()
            .map(|(sender, entry)| InspectSummary {
                sender: format!("{sender:x}"),
                pending: entry.pending.len(),
                queued: entry.queued.len(),
            })
            .collect();
        summaries.extend(content.cosmos.into_iter().map(|(signer, txs)| InspectSummary {
            sender: signer.to_string(),
            pending: txs.len(),
            queued: 0,
        }));
        summaries
    }
}

fn evm_error_kind(err: &evm_pool::Error) -> &'static str {
    match err {
        evm_pool::Error::NonceLow => "nonce_low",
        evm_pool::Error::NonceGap => "nonce_gap",
        evm_pool::Error::ReplacementUnderpriced => "replacement_underpriced",
        evm_pool::Error::FeeTooLow => "fee_too_low",
        evm_pool::Error::IntrinsicGasTooLow => "intrinsic_gas_too_low",
        evm_pool::Error::InsufficientBalance => "insufficient_balance",
        evm_pool::Error::OversizedData => "oversized_data",
        evm_pool::Error::InvalidSignature => "invalid_signature",
        evm_pool::Error::ChainIdMismatch => "chain_id_mismatch",
        evm_pool::Error::PoolFullPerSender => "pool_full_per_sender",
        evm_pool::Error::PoolFullGlobal => "pool_full_global",
        evm_pool::Error::AlreadyKnown(_) => "already_known",
        evm_pool::Error::Shutdown => "shutdown",
        evm_pool::Error::ChainView(_) => "not_ready",
    }
}

fn cosmos_error_kind(err: &cosmos_pool::Error) -> &'static str {
    match err {
        cosmos_pool::Error::NonPositiveGasLimit => "non_positive_gas_limit",
        cosmos_pool::Error::AlreadyKnown(_) => "already_known",
        cosmos_pool::Error::ReplacementRejected => "replacement_underpriced",
        cosmos_pool::Error::PoolFull => "pool_full_global",
        cosmos_pool::Error::Shutdown => "shutdown",
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chain_view::TestChainView;
    use cosmos_pool::{Bech32Address, Coin};
    use ethereum_types::U256;
    use evm_pool::{FeeSchedule, UnverifiedTransaction as EvmUnverified};

    use super::*;
    use crate::envelope::Message;

    struct NoopBroadcaster;
    impl Broadcaster for NoopBroadcaster {
        fn broadcast(&self, _txs: &[Arc<evm_pool::VerifiedTransaction>]) {}
    }

    struct AlwaysValid;
    impl AnteHandler for AlwaysValid {
        fn check(&self, _hash: &H256) -> AnteOutcome {
            AnteOutcome::Valid
        }
    }

    struct AlwaysInvalid;
    impl AnteHandler for AlwaysInvalid {
        fn check(&self, _hash: &H256) -> AnteOutcome {
            AnteOutcome::PermanentlyInvalid
        }
    }

    fn evm_addr(n: u8) -> Address {
        Address::from_low_u64_be(n as u64)
    }

    fn signer(n: u8) -> Bech32Address {
        Bech32Address::new("cosmos", vec![n; 20])
    }

    fn evm_message(hash: u64, sender: Address, nonce: u64, gas_price: u64) -> EvmUnverified {
        EvmUnverified {
            hash: H256::from_low_u64_be(hash),
            sender,
            nonce,
            gas_limit: 21_000,
            fees: FeeSchedule::Legacy { gas_price: U256::from(gas_price) },
            value: U256::zero(),
            to: Some(evm_addr(9)),
            data_len: 0,
            chain_id: None,
            signature_valid: true,
        }
    }

    fn evm_envelope(hash: u64, sender: Address, nonce: u64, gas_price: u64) -> IncomingTransaction {
        IncomingTransaction {
            hash: H256::from_low_u64_be(hash),
            signer: signer(1),
            sequence: nonce,
            fee: vec![],
            gas_limit: 21_000,
            messages: vec![Message::Evm(evm_message(hash, sender, nonce, gas_price))],
            raw: hash.to_be_bytes().to_vec(),
        }
    }

    fn cosmos_envelope(hash: u64, who: Bech32Address, sequence: u64, fee_amount: u64) -> IncomingTransaction {
        IncomingTransaction {
            hash: H256::from_low_u64_be(hash),
            signer: who,
            sequence,
            fee: vec![Coin::new("stake", U256::from(fee_amount))],
            gas_limit: 200_000,
            messages: vec![Message::Other],
            raw: hash.to_be_bytes().to_vec(),
        }
    }

    fn new_coordinator(view: Arc<TestChainView>) -> Coordinator {
        Coordinator::new(
            view,
            CoordinatorConfig::default(),
            Arc::new(evm_pool::TrustedSender),
            Arc::new(NoopBroadcaster),
            None,
        )
    }

    #[test]
    fn not_ready_below_height_two_rejects_every_entry_point() {
        let view = Arc::new(TestChainView::default());
        view.set_header(chain_view::Header {
            number: 1,
            hash: H256::from_low_u64_be(1),
            parent_hash: H256::zero(),
            base_fee: None,
            gas_limit: 30_000_000,
        });
        let coordinator = new_coordinator(view);

        assert_eq!(
            coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)),
            Err(Error::NotReady)
        );
        assert_eq!(
            coordinator.insert_invalid_nonce(evm_envelope(2, evm_addr(1), 1, 1_000_000_000)),
            Err(Error::NotReady)
        );
    }

    #[test]
    fn single_evm_message_routes_to_evm_pool() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator = new_coordinator(view);

        assert!(coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)).is_ok());
        assert_eq!(coordinator.pool_status().pending, 1);
        assert_eq!(coordinator.count(), 1);

        coordinator.close();
    }

    #[test]
    fn non_evm_message_routes_to_cosmos_pool() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        let coordinator = new_coordinator(view);

        assert!(coordinator.insert(cosmos_envelope(1, signer(1), 0, 1_000_000_000)).is_ok());
        assert_eq!(coordinator.count(), 1);

        coordinator.close();
    }

    #[test]
    fn multi_message_envelope_also_routes_to_cosmos() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        let coordinator = new_coordinator(view);

        let mut tx = cosmos_envelope(1, signer(1), 0, 1_000_000_000);
        tx.messages.push(Message::Other);
        assert!(coordinator.insert(tx).is_ok());
        assert_eq!(coordinator.count(), 1);

        coordinator.close();
    }

    #[test]
    fn inserting_the_same_hash_twice_is_a_no_op_success() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator = new_coordinator(view);

        assert!(coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)).is_ok());
        assert!(coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)).is_ok());
        assert_eq!(coordinator.count(), 1);

        coordinator.close();
    }

    #[test]
    fn select_merges_both_sub_pools_by_priority() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator = new_coordinator(view);

        coordinator.insert(evm_envelope(1, evm_addr(1), 0, 8_000_000_000)).unwrap();
        coordinator.insert(cosmos_envelope(2, signer(1), 0, 5_000_000_000)).unwrap();

        let order: Vec<H256> = coordinator.select(HashSet::new()).map(|e| e.hash()).collect();
        assert_eq!(order, vec![H256::from_low_u64_be(1), H256::from_low_u64_be(2)]);

        coordinator.close();
    }

    #[test]
    fn insert_invalid_nonce_rejects_non_evm_shapes() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        let coordinator = new_coordinator(view);

        let mut no_messages = cosmos_envelope(1, signer(1), 0, 1_000_000_000);
        no_messages.messages.clear();
        assert_eq!(coordinator.insert_invalid_nonce(no_messages), Err(Error::NoMessages));

        let mut multi = cosmos_envelope(2, signer(1), 0, 1_000_000_000);
        multi.messages.push(Message::Other);
        assert_eq!(coordinator.insert_invalid_nonce(multi), Err(Error::MultiMessage));

        let cosmos_only = cosmos_envelope(3, signer(1), 0, 1_000_000_000);
        assert_eq!(coordinator.insert_invalid_nonce(cosmos_only), Err(Error::NotEvmMessage));

        coordinator.close();
    }

    #[test]
    fn insert_invalid_nonce_accepts_queued_gapped_evm_transaction() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator = new_coordinator(view);

        assert!(coordinator
            .insert_invalid_nonce(evm_envelope(1, evm_addr(1), 5, 1_000_000_000))
            .is_ok());
        assert_eq!(coordinator.pool_status().queued, 1);

        coordinator.close();
    }

    #[test]
    fn remove_evm_only_evicts_when_ante_handler_says_permanently_invalid() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator = new_coordinator(view);
        coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)).unwrap();

        let hash = H256::from_low_u64_be(1);
        assert!(coordinator.remove_evm(&hash, &AlwaysValid).is_none());
        assert_eq!(coordinator.count(), 1);

        assert!(coordinator.remove_evm(&hash, &AlwaysInvalid).is_some());
        assert_eq!(coordinator.count(), 0);

        coordinator.close();
    }

    #[test]
    fn close_is_idempotent() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        let coordinator = new_coordinator(view);
        coordinator.close();
        coordinator.close();

        assert_eq!(
            coordinator.insert(cosmos_envelope(1, signer(1), 0, 1_000_000_000)),
            Err(Error::Shutdown)
        );
    }

    #[test]
    fn locally_inserted_evm_transaction_is_journaled_and_replayed_on_restart() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("mempool-core-coordinator-journal-test-{:?}", std::thread::current().id()));
        let _ = std::fs::remove_file(&path);

        let mut config = CoordinatorConfig::default();
        config.journal_disabled = false;
        config.journal_path = path.clone();

        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator =
            Coordinator::new(view, config.clone(), Arc::new(evm_pool::TrustedSender), Arc::new(NoopBroadcaster), None);
        coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)).unwrap();
        coordinator.close();

        // A fresh coordinator, standing in for one built after a process
        // restart, starts with an empty pool...
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let restarted =
            Coordinator::new(view, config, Arc::new(evm_pool::TrustedSender), Arc::new(NoopBroadcaster), None);
        assert_eq!(restarted.count(), 0);

        // ...until the journal is replayed against a decoder.
        let replayed = restarted.replay_journal(|_raw| Some(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)));
        assert_eq!(replayed, 1);
        assert_eq!(restarted.count(), 1);

        restarted.close();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disabled_journal_replays_nothing() {
        let view = Arc::new(TestChainView::at_height(2, Some(U256::zero())));
        view.set_balance(evm_addr(1), U256::from(10u64).pow(U256::from(24)));
        let coordinator = new_coordinator(view);

        coordinator.insert(evm_envelope(1, evm_addr(1), 0, 1_000_000_000)).unwrap();
        let replayed = coordinator.replay_journal(|_raw| panic!("decode must never run when the journal is disabled"));
        assert_eq!(replayed, 0);

        coordinator.close();
    }
}
