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

//! The Ethereum sub-pool: a per-sender pending/queued state machine built
//! on top of the generic [`txpool::Pool`].
//!
//! Pending/queued classification is never stored directly; it is derived
//! on demand by running [`crate::ready::NonceContiguous`] over the pool's
//! stored transactions. This keeps `remove` and `reset` simple (storage
//! mutation only) at the cost of an O(senders) walk whenever the
//! classification is needed, which is cached between mutations.

use std::{
    collections::HashSet,
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use chain_view::{ChainView, Header};
use ethereum_types::{Address, H256, U256};
use parking_lot::{Mutex, RwLock};
use txpool::Pool;

use crate::{
    config::LegacyPoolConfig,
    error::Error,
    ready::NonceContiguous,
    scoring::EffectiveTipScoring,
    transaction::{UnverifiedTransaction, VerifiedTransaction},
    verifier::Verifier,
};

/// Pending/queued counts, as returned by [`TransactionQueue::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub pending: usize,
    pub queued: usize,
}

/// Filter applied when reading the pending set.
#[derive(Debug, Clone, Copy)]
pub struct PendingFilter {
    /// Minimum effective tip; lower-tip entries are hidden from the result.
    pub min_tip: U256,
    /// Base fee to score against. Defaults to the current head's base fee.
    pub base_fee: Option<U256>,
    /// Include ordinary (non-blob) transactions. Always `true` today: this
    /// pool has no EIP-4844 blob transaction type.
    pub only_plain_txs: bool,
    /// Include blob transactions. Always produces an empty result, since
    /// this pool has no blob transaction type.
    pub only_blob_txs: bool,
}

impl Default for PendingFilter {
    fn default() -> Self {
        PendingFilter {
            min_tip: U256::zero(),
            base_fee: None,
            only_plain_txs: true,
            only_blob_txs: false,
        }
    }
}

type BroadcastFn = dyn Fn(&[Arc<VerifiedTransaction>]) + Send + Sync;

struct Inner {
    pool: RwLock<Pool<VerifiedTransaction, EffectiveTipScoring>>,
    chain_view: Arc<dyn ChainView>,
    verifier: RwLock<Verifier>,
    config: RwLock<LegacyPoolConfig>,
    cached_pending: Mutex<Vec<Arc<VerifiedTransaction>>>,
    broadcast_fn: Box<BroadcastFn>,
    closed: AtomicBool,
    shutdown_tx: crossbeam_channel::Sender<()>,
    reset_thread: Mutex<Option<thread::JoinHandle<()>>>,
}

impl fmt::Debug for Inner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Inner")
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn classify(&self) -> (Vec<Arc<VerifiedTransaction>>, Vec<Arc<VerifiedTransaction>>) {
        let header = match self.chain_view.current_header() {
            Ok(header) => header,
            Err(_) => {
                // Not ready yet: nothing can be pending.
                let all = self.pool.read().all().cloned().collect();
                return (Vec::new(), all);
            }
        };
        let pool = self.pool.read();
        let ready = NonceContiguous::new(&*self.chain_view, header.hash);
        let pending: Vec<Arc<VerifiedTransaction>> = pool.pending(ready).collect();
        let pending_hashes: HashSet<H256> = pending.iter().map(|tx| tx.hash).collect();
        let queued = pool
            .all()
            .filter(|tx| !pending_hashes.contains(&tx.hash))
            .cloned()
            .collect();
        (pending, queued)
    }

    /// Recomputes the pending set, returning the entries that are newly
    /// pending since the last time this was called.
    fn refresh_pending(&self) -> Vec<Arc<VerifiedTransaction>> {
        let (pending, _) = self.classify();
        let mut cache = self.cached_pending.lock();
        let previous: HashSet<H256> = cache.iter().map(|tx| tx.hash).collect();
        let newly: Vec<Arc<VerifiedTransaction>> = pending
            .iter()
            .filter(|tx| !previous.contains(&tx.hash))
            .cloned()
            .collect();
        *cache = pending;
        newly
    }

    fn status(&self) -> Status {
        let (pending, queued) = self.classify();
        Status { pending: pending.len(), queued: queued.len() }
    }

    fn pick_victim(
        base_fee: Option<U256>,
        list: &[Arc<VerifiedTransaction>],
        incoming: H256,
    ) -> Option<H256> {
        list.iter()
            .filter(|tx| !tx.local || tx.hash == incoming)
            .min_by_key(|tx| tx.fees.effective_tip(base_fee))
            .map(|tx| tx.hash)
    }

    fn pick_sender_victim(
        list: &[Arc<VerifiedTransaction>],
        sender: Address,
        incoming: H256,
    ) -> Option<H256> {
        list.iter()
            .filter(|tx| tx.sender == sender && (!tx.local || tx.hash == incoming))
            .max_by_key(|tx| tx.nonce)
            .map(|tx| tx.hash)
    }

    /// Evicts entries beyond the configured slot counts, preferring
    /// non-local victims. Returns an error (without rolling back the
    /// import) only when the just-admitted transaction is itself the
    /// victim that had to be evicted to respect a limit.
    fn enforce_capacity(&self, sender: Address, incoming: H256) -> Result<(), Error> {
        let config = *self.config.read();
        let base_fee = self.pool.read().scoring().base_fee();

        loop {
            let (pending, queued) = self.classify();

            if pending.len() > config.pending_global_slots {
                if let Some(victim) = Self::pick_victim(base_fee, &pending, incoming) {
                    self.pool.write().remove(&victim);
                    if victim == incoming {
                        self.refresh_pending();
                        return Err(Error::PoolFullGlobal);
                    }
                    continue;
                }
            }
            if queued.len() > config.queue_global_slots {
                if let Some(victim) = Self::pick_victim(base_fee, &queued, incoming) {
                    self.pool.write().remove(&victim);
                    if victim == incoming {
                        self.refresh_pending();
                        return Err(Error::PoolFullGlobal);
                    }
                    continue;
                }
            }

            let sender_pending = pending.iter().filter(|tx| tx.sender == sender).count();
            if sender_pending > config.pending_per_sender_slots {
                if let Some(victim) = Self::pick_sender_victim(&pending, sender, incoming) {
                    self.pool.write().remove(&victim);
                    if victim == incoming {
                        self.refresh_pending();
                        return Err(Error::PoolFullPerSender);
                    }
                    continue;
                }
            }
            let sender_queued = queued.iter().filter(|tx| tx.sender == sender).count();
            if sender_queued > config.queue_per_sender_slots {
                if let Some(victim) = Self::pick_sender_victim(&queued, sender, incoming) {
                    self.pool.write().remove(&victim);
                    if victim == incoming {
                        self.refresh_pending();
                        return Err(Error::PoolFullPerSender);
                    }
                    continue;
                }
            }

            return Ok(());
        }
    }

    fn cull_expired_queued(&self) {
        let lifetime = Duration::from_secs(self.config.read().lifetime_for_queued_secs);
        if lifetime.is_zero() {
            return;
        }
        let (_, queued) = self.classify();
        let now = std::time::Instant::now();
        let mut pool = self.pool.write();
        for tx in queued {
            if !tx.local && now.saturating_duration_since(tx.admitted_at) > lifetime {
                pool.remove(&tx.hash);
            }
        }
    }

    fn apply_reset(&self, old_head: Header, new_head: Header) {
        if new_head.parent_hash != old_head.hash && new_head.hash != old_head.hash {
            log::warn!(
                target: "evm_pool",
                "head {} does not extend {} (parent {}); treating as linear catch-up under the instant-finality contract",
                new_head.number, old_head.number, new_head.parent_hash,
            );
        }

        let senders: Vec<Address> = self.pool.read().senders().cloned().collect();
        for sender in senders {
            let current_nonce = match self.chain_view.nonce_at(new_head.hash, &sender) {
                Ok(nonce) => nonce,
                Err(err) => {
                    log::warn!(target: "evm_pool", "reset: nonce read failed for {sender:?}: {err}");
                    continue;
                }
            };
            let included: Vec<H256> = self
                .pool
                .read()
                .by_sender(&sender)
                .filter(|tx| tx.nonce < current_nonce)
                .map(|tx| tx.hash)
                .collect();
            if !included.is_empty() {
                let mut pool = self.pool.write();
                for hash in &included {
                    pool.remove(hash);
                }
            }
        }

        if new_head.base_fee != old_head.base_fee {
            let bump = self.config.read().price_bump_pct;
            self.pool.write().set_scoring(EffectiveTipScoring::new(new_head.base_fee, bump));
        }

        self.cull_expired_queued();

        let newly = self.refresh_pending();
        if !newly.is_empty() {
            (self.broadcast_fn)(&newly);
        }
    }
}

fn run_reset_loop(inner: Arc<Inner>, shutdown_rx: crossbeam_channel::Receiver<()>) {
    let head_rx = inner.chain_view.subscribe_head_changes();
    let mut prev: Option<Header> = None;
    loop {
        crossbeam_channel::select! {
            recv(head_rx) -> msg => match msg {
                Ok(change) => {
                    if let Some(old) = prev {
                        inner.apply_reset(old, change.header);
                    }
                    prev = Some(change.header);
                }
                Err(_) => break,
            },
            recv(shutdown_rx) -> _ => break,
        }
    }
    log::debug!(target: "evm_pool", "evm-pool-reset thread exiting");
}

/// The Ethereum sub-pool. Cheap to clone: clones share the same underlying
/// pool and background thread.
#[derive(Clone)]
pub struct TransactionQueue(Arc<Inner>);

impl fmt::Debug for TransactionQueue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("TransactionQueue").field(&self.0).finish()
    }
}

impl TransactionQueue {
    /// Builds a new sub-pool and starts its dedicated reset thread, which
    /// drains `chain_view.subscribe_head_changes()` for the lifetime of the
    /// queue (until [`TransactionQueue::close`]).
    pub fn new(
        chain_view: Arc<dyn ChainView>,
        verifier: Verifier,
        config: LegacyPoolConfig,
        broadcast_fn: Box<BroadcastFn>,
    ) -> Self {
        let base_fee = chain_view.current_header().ok().and_then(|h| h.base_fee);
        let scoring = EffectiveTipScoring::new(base_fee, config.price_bump_pct);
        let options = txpool::Options {
            max_count: config.pending_global_slots + config.queue_global_slots,
            max_per_sender: config.pending_per_sender_slots + config.queue_per_sender_slots,
            ..txpool::Options::default()
        };

        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(0);
        let inner = Arc::new(Inner {
            pool: RwLock::new(Pool::new(options, scoring)),
            chain_view,
            verifier: RwLock::new(verifier),
            config: RwLock::new(config),
            cached_pending: Mutex::new(Vec::new()),
            broadcast_fn,
            closed: AtomicBool::new(false),
            shutdown_tx,
            reset_thread: Mutex::new(None),
        });

        let thread_inner = inner.clone();
        let handle = thread::Builder::new()
            .name("evm-pool-reset".into())
            .spawn(move || run_reset_loop(thread_inner, shutdown_rx))
            .expect("failed to spawn evm-pool-reset thread");
        *inner.reset_thread.lock() = Some(handle);

        TransactionQueue(inner)
    }

    /// Validates and admits `txs`. `local` marks transactions originating
    /// from this node, which receive relaxed capacity eviction.
    pub fn add(&self, txs: Vec<UnverifiedTransaction>, local: bool) -> Vec<Result<(), Error>> {
        if self.0.closed.load(Ordering::SeqCst) {
            return txs.iter().map(|_| Err(Error::Shutdown)).collect();
        }
        let results: Vec<Result<(), Error>> =
            txs.into_iter().map(|tx| self.add_one(tx, local)).collect();
        let newly = self.0.refresh_pending();
        if !newly.is_empty() {
            (self.0.broadcast_fn)(&newly);
        }
        results
    }

    fn add_one(&self, tx: UnverifiedTransaction, local: bool) -> Result<(), Error> {
        let verified = self.0.verifier.read().verify(tx, local)?;
        let sender = verified.sender;
        let hash = verified.hash;
        match self.0.pool.write().import(verified) {
            Ok(_) => self.0.enforce_capacity(sender, hash),
            // already_known is not an error: the caller should see success,
            // just as if this exact transaction had just been admitted.
            Err(txpool::Error::AlreadyImported(_)) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Pending transactions ordered by `(sender, ascending nonce)`,
    /// restricted to `filter`.
    pub fn pending(&self, filter: PendingFilter) -> Vec<Arc<VerifiedTransaction>> {
        if filter.only_blob_txs {
            return Vec::new();
        }
        let header = match self.0.chain_view.current_header() {
            Ok(header) => header,
            Err(_) => return Vec::new(),
        };
        let base_fee = filter.base_fee.or(header.base_fee);
        let (pending, _) = self.0.classify();
        pending
            .into_iter()
            .filter(|tx| tx.fees.effective_tip(base_fee) >= filter.min_tip)
            .collect()
    }

    /// Current `(pending_count, queued_count)`.
    pub fn stats(&self) -> Status {
        self.0.status()
    }

    /// Full `(pending, queued)` listing, for telemetry reads that need the
    /// transactions themselves rather than just their counts.
    pub fn content(&self) -> (Vec<Arc<VerifiedTransaction>>, Vec<Arc<VerifiedTransaction>>) {
        self.0.classify()
    }

    /// Removes a single transaction. `outofpool`/`unreserve` are recorded
    /// for diagnostics only; demotion of higher-nonce same-sender
    /// transactions follows automatically since classification is always
    /// derived, never cached across a mutation.
    pub fn remove(&self, hash: &H256, outofpool: bool, unreserve: bool) -> Option<Arc<VerifiedTransaction>> {
        let removed = self.0.pool.write().remove(hash);
        if removed.is_some() {
            log::debug!(target: "evm_pool", "removed {hash:x} (outofpool={outofpool}, unreserve={unreserve})");
            self.0.refresh_pending();
        }
        removed
    }

    /// Looks up a stored transaction by hash.
    pub fn get(&self, hash: &H256) -> Option<Arc<VerifiedTransaction>> {
        self.0.pool.read().get(hash)
    }

    /// Whether `hash` is currently stored, pending or queued.
    pub fn contains(&self, hash: &H256) -> bool {
        self.0.pool.read().contains(hash)
    }

    /// Applies a chain-head advance. Invoked internally by the reset
    /// thread for every subscribed [`chain_view::HeadChange`]; exposed
    /// publicly so tests and alternate event sources can drive it directly.
    pub fn reset(&self, old_head: Header, new_head: Header) {
        self.0.apply_reset(old_head, new_head);
    }

    /// Stops the reset thread and marks the queue unusable. Idempotent.
    pub fn close(&self) {
        if self.0.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.0.shutdown_tx.send(());
        if let Some(handle) = self.0.reset_thread.lock().take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use chain_view::TestChainView;
    use ethereum_types::{Address, U256};

    use super::*;
    use crate::{
        transaction::FeeSchedule,
        verifier::{TrustedSender, Verifier},
    };

    fn addr(n: u8) -> Address {
        Address::from_low_u64_be(n as u64)
    }

    fn tx(hash: u64, sender: Address, nonce: u64, gas_price: u64) -> UnverifiedTransaction {
        UnverifiedTransaction {
            hash: H256::from_low_u64_be(hash),
            sender,
            nonce,
            gas_limit: 21_000,
            fees: FeeSchedule::Legacy { gas_price: U256::from(gas_price) },
            value: U256::zero(),
            to: Some(addr(9)),
            data_len: 0,
            chain_id: None,
            signature_valid: true,
        }
    }

    fn new_queue(view: Arc<TestChainView>) -> (TransactionQueue, Arc<StdMutex<Vec<H256>>>) {
        let verifier = Verifier::new(view.clone(), Arc::new(TrustedSender), LegacyPoolConfig::default());
        let broadcasts = Arc::new(StdMutex::new(Vec::new()));
        let broadcasts_clone = broadcasts.clone();
        let queue = TransactionQueue::new(
            view,
            verifier,
            LegacyPoolConfig::default(),
            Box::new(move |txs: &[Arc<VerifiedTransaction>]| {
                broadcasts_clone.lock().unwrap().extend(txs.iter().map(|t| t.hash));
            }),
        );
        (queue, broadcasts)
    }

    #[test]
    fn simple_accept_is_pending() {
        let view = Arc::new(TestChainView::at_height(3, Some(U256::from(1_000_000_000u64))));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, _) = new_queue(view);

        let results = queue.add(vec![tx(1, sender, 0, 2_000_000_000)], true);
        assert!(results[0].is_ok());
        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
    }

    #[test]
    fn nonce_gap_then_fill() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, _) = new_queue(view);

        for nonce in [0u64, 2, 4, 6] {
            let r = queue.add(vec![tx(nonce + 1, sender, nonce, 1_000_000_000)], true);
            assert!(r[0].is_ok(), "nonce {nonce} rejected: {:?}", r[0]);
        }
        assert_eq!(queue.stats(), Status { pending: 1, queued: 3 });

        queue.add(vec![tx(100, sender, 1, 1_000_000_000)], true);
        assert_eq!(queue.stats(), Status { pending: 3, queued: 2 });
    }

    #[test]
    fn replacement_bump_enforced() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, _) = new_queue(view);

        assert!(queue.add(vec![tx(1, sender, 0, 1_000_000_000)], true)[0].is_ok());
        assert!(queue.add(vec![tx(2, sender, 0, 1_050_000_000)], true)[0].is_err());
        assert!(queue.add(vec![tx(3, sender, 0, 1_100_000_000)], true)[0].is_ok());
        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
        assert!(queue.get(&H256::from_low_u64_be(3)).is_some());
        assert!(queue.get(&H256::from_low_u64_be(1)).is_none());
    }

    #[test]
    fn head_advance_demotes_included_transactions() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, broadcasts) = new_queue(view.clone());

        for nonce in 0u64..3 {
            assert!(queue.add(vec![tx(nonce + 1, sender, nonce, 1_000_000_000)], true)[0].is_ok());
        }
        assert_eq!(queue.stats(), Status { pending: 3, queued: 0 });
        broadcasts.lock().unwrap().clear();

        let old_head = view.current_header().unwrap();
        view.set_nonce(sender, 2);
        let new_head = Header {
            number: old_head.number + 1,
            hash: H256::from_low_u64_be(old_head.number + 1),
            parent_hash: old_head.hash,
            base_fee: old_head.base_fee,
            gas_limit: old_head.gas_limit,
        };
        view.set_header(new_head);
        queue.reset(old_head, new_head);

        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
        assert!(broadcasts.lock().unwrap().is_empty());
    }

    #[test]
    fn head_advance_spanning_multiple_blocks_is_not_reinjected() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, broadcasts) = new_queue(view.clone());

        for nonce in 0u64..3 {
            assert!(queue.add(vec![tx(nonce + 1, sender, nonce, 1_000_000_000)], true)[0].is_ok());
        }
        assert_eq!(queue.stats(), Status { pending: 3, queued: 0 });
        broadcasts.lock().unwrap().clear();

        let old_head = view.current_header().unwrap();
        view.set_nonce(sender, 2);
        // old head is at height 3; new head jumps straight to height 6, with
        // a parent hash that matches neither the old head's hash nor any
        // intermediate block this queue ever saw a HeadChange for.
        let new_head = Header {
            number: old_head.number + 3,
            hash: H256::from_low_u64_be(old_head.number + 3),
            parent_hash: H256::from_low_u64_be(old_head.number + 2),
            base_fee: old_head.base_fee,
            gas_limit: old_head.gas_limit,
        };
        view.set_header(new_head);
        queue.reset(old_head, new_head);

        // included transactions (nonce < current_nonce) are dropped once,
        // not reinjected; no panic despite the parent-hash mismatch.
        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
        assert!(broadcasts.lock().unwrap().is_empty());

        queue.reset(new_head, new_head);
        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
    }

    #[test]
    fn reset_to_same_head_is_idempotent() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, broadcasts) = new_queue(view.clone());
        assert!(queue.add(vec![tx(1, sender, 0, 1_000_000_000)], true)[0].is_ok());
        broadcasts.lock().unwrap().clear();

        let head = view.current_header().unwrap();
        queue.reset(head, head);
        assert!(broadcasts.lock().unwrap().is_empty());
        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
    }

    #[test]
    fn inserting_the_same_hash_twice_is_a_no_op_success() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let sender = addr(1);
        view.set_balance(sender, U256::from(10u64).pow(U256::from(24)));
        let (queue, _) = new_queue(view);

        assert!(queue.add(vec![tx(1, sender, 0, 1_000_000_000)], true)[0].is_ok());
        assert!(queue.add(vec![tx(1, sender, 0, 1_000_000_000)], true)[0].is_ok());
        assert_eq!(queue.stats(), Status { pending: 1, queued: 0 });
    }

    #[test]
    fn close_is_idempotent_and_stops_the_thread() {
        let view = Arc::new(TestChainView::at_height(3, None));
        let (queue, _) = new_queue(view);
        queue.close();
        queue.close();
    }
}
