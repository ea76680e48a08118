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

//! The generic pool: per-sender ordered storage plus a priority merge
//! iterator over whatever a caller-supplied [`Ready`] judges includable.

use std::{
    cmp,
    collections::{BTreeMap, BinaryHeap, HashMap, VecDeque},
    fmt,
    hash::Hash,
    sync::Arc,
};

use crate::{
    error::Error,
    listener::{Listener, NoopListener},
    options::{LightStatus, Options},
    ready::{Ready, Readiness},
    scoring::{Choice, Scoring},
};

/// A transaction the generic pool can store and order.
///
/// The pool makes no assumption about the transaction's payload: it only
/// needs a stable hash, a sender, and an `ordinal` (the account nonce for
/// Ethereum, the account sequence for Cosmos) that places it among the
/// other transactions from the same sender.
pub trait VerifiedTransaction: fmt::Debug {
    /// Transaction hash type.
    type Hash: fmt::Debug + fmt::LowerHex + Eq + Clone + Hash;
    /// Transaction sender type.
    type Sender: fmt::Debug + Eq + Clone + Hash;

    /// Transaction hash.
    fn hash(&self) -> &Self::Hash;
    /// Transaction sender.
    fn sender(&self) -> &Self::Sender;
    /// Per-sender ordinal (nonce or sequence number).
    fn ordinal(&self) -> u64;
    /// Approximate memory footprint, used to enforce `max_mem_usage`.
    fn mem_usage(&self) -> usize;
}

#[derive(Debug)]
struct Entry<Score, Sender> {
    score: Score,
    sender: Sender,
    tie_breaker: u64,
}

impl<Score: PartialEq, Sender: PartialEq> PartialEq for Entry<Score, Sender> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.tie_breaker == other.tie_breaker
    }
}
impl<Score: Eq, Sender: Eq> Eq for Entry<Score, Sender> {}
impl<Score: Ord, Sender: Eq> PartialOrd for Entry<Score, Sender> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<Score: Ord, Sender: Eq> Ord for Entry<Score, Sender> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        // Ties go to whichever entry was queued first, for determinism.
        self.score
            .cmp(&other.score)
            .then_with(|| other.tie_breaker.cmp(&self.tie_breaker))
    }
}

/// Generic, scoring-parameterized transaction pool.
///
/// Stores every verified transaction it is given, grouped by sender and
/// ordered by `ordinal` within a sender. Readiness (is this transaction
/// includable right now?) and cross-sender priority are both pluggable, so
/// the same engine backs both the EVM sub-pool (nonce-contiguous, tip
/// ordered) and the Cosmos sub-pool (sequence-contiguous, gas-price
/// ordered).
#[derive(Debug)]
pub struct Pool<T, S, L = NoopListener>
where
    T: VerifiedTransaction,
    S: Scoring<T>,
{
    scoring: S,
    options: Options,
    senders: HashMap<T::Sender, BTreeMap<u64, Arc<T>>>,
    by_hash: HashMap<T::Hash, (T::Sender, u64)>,
    mem_usage: usize,
    listener: L,
}

impl<T, S> Pool<T, S, NoopListener>
where
    T: VerifiedTransaction,
    S: Scoring<T>,
{
    /// Creates a new pool with a no-op listener.
    pub fn new(options: Options, scoring: S) -> Self {
        Self::with_listener(options, scoring, NoopListener)
    }
}

impl<T, S, L> Pool<T, S, L>
where
    T: VerifiedTransaction,
    S: Scoring<T>,
    L: Listener<T>,
{
    /// Creates a new pool with an explicit listener.
    pub fn with_listener(options: Options, scoring: S, listener: L) -> Self {
        Pool {
            scoring,
            options,
            senders: HashMap::new(),
            by_hash: HashMap::new(),
            mem_usage: 0,
            listener,
        }
    }

    /// The scoring in effect.
    pub fn scoring(&self) -> &S {
        &self.scoring
    }

    /// Swaps the scoring (e.g. when the base fee of the head block changes).
    pub fn set_scoring(&mut self, scoring: S) {
        self.scoring = scoring;
    }

    /// The configured capacity limits.
    pub fn options(&self) -> Options {
        self.options
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Total number of transactions stored.
    pub fn len(&self) -> usize {
        self.by_hash.len()
    }

    /// Whether the pool holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.by_hash.is_empty()
    }

    /// Whether the pool is at or above its count/memory limits.
    pub fn is_full(&self) -> bool {
        self.len() >= self.options.max_count || self.mem_usage >= self.options.max_mem_usage
    }

    /// Number of transactions stored for `sender`.
    pub fn sender_count(&self, sender: &T::Sender) -> usize {
        self.senders.get(sender).map_or(0, BTreeMap::len)
    }

    /// Whether `sender` is at its per-sender slot limit.
    pub fn sender_is_full(&self, sender: &T::Sender) -> bool {
        self.sender_count(sender) >= self.options.max_per_sender
    }

    /// Looks up a transaction by hash.
    pub fn get(&self, hash: &T::Hash) -> Option<Arc<T>> {
        let (sender, ordinal) = self.by_hash.get(hash)?;
        self.senders.get(sender)?.get(ordinal).cloned()
    }

    /// Whether `hash` is already stored.
    pub fn contains(&self, hash: &T::Hash) -> bool {
        self.by_hash.contains_key(hash)
    }

    /// Transactions from `sender`, ascending by ordinal.
    pub fn by_sender(&self, sender: &T::Sender) -> impl Iterator<Item = &Arc<T>> {
        self.senders.get(sender).into_iter().flat_map(BTreeMap::values)
    }

    /// All senders with at least one stored transaction.
    pub fn senders(&self) -> impl Iterator<Item = &T::Sender> {
        self.senders.keys()
    }

    /// All stored transactions, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &Arc<T>> {
        self.senders.values().flat_map(BTreeMap::values)
    }

    /// The lowest-priority transaction currently stored, if any. Used to
    /// decide whether an incoming transaction should even be considered
    /// when the pool is full.
    pub fn worst_transaction(&self) -> Option<Arc<T>> {
        self.all()
            .min_by_key(|tx| self.scoring.priority(tx))
            .cloned()
    }

    /// Snapshot of pool occupancy.
    pub fn light_status(&self) -> LightStatus {
        LightStatus {
            transaction_count: self.len(),
            senders: self.senders.len(),
            mem_usage: self.mem_usage,
        }
    }

    /// Imports a verified transaction.
    ///
    /// Rejects an exact hash duplicate (`AlreadyImported`), a same-slot
    /// replacement the scoring function does not accept
    /// (`TooCheapToReplace`), and anything that would not even beat the
    /// current worst transaction in a full pool (`TooCheapToEnter`).
    pub fn import(&mut self, tx: T) -> Result<Arc<T>, Error<T::Hash>> {
        let hash = tx.hash().clone();
        if self.by_hash.contains_key(&hash) {
            return Err(Error::AlreadyImported(hash));
        }

        let incumbent = {
            let sender = tx.sender();
            let ordinal = tx.ordinal();
            self.senders
                .get(sender)
                .and_then(|q| q.get(&ordinal))
                .cloned()
        };

        if incumbent.is_none() && self.is_full() {
            if let Some(worst) = self.worst_transaction() {
                if self.scoring.priority(&tx) <= self.scoring.priority(&worst) {
                    return Err(Error::TooCheapToEnter(
                        hash,
                        format!("{:?}", self.scoring.priority(&worst)),
                    ));
                }
            }
        }

        if let Some(ref old) = incumbent {
            match self.scoring.choose(old, &tx) {
                Choice::RejectNew => {
                    return Err(Error::TooCheapToReplace(old.hash().clone(), hash));
                }
                Choice::ReplaceOld => {}
                Choice::Insert => unreachable!("an incumbent is occupying the slot"),
            }
        }

        let sender = tx.sender().clone();
        let ordinal = tx.ordinal();
        let tx = Arc::new(tx);

        if let Some(ref old) = incumbent {
            self.by_hash.remove(old.hash());
            self.mem_usage -= old.mem_usage();
        }

        self.senders
            .entry(sender.clone())
            .or_default()
            .insert(ordinal, tx.clone());
        self.by_hash.insert(hash, (sender, ordinal));
        self.mem_usage += tx.mem_usage();
        self.listener.added(&tx, incumbent.as_ref());

        Ok(tx)
    }

    /// Removes a transaction by hash, returning it if it was present.
    pub fn remove(&mut self, hash: &T::Hash) -> Option<Arc<T>> {
        let (sender, ordinal) = self.by_hash.remove(hash)?;
        let queue = self.senders.get_mut(&sender)?;
        let tx = queue.remove(&ordinal)?;
        self.mem_usage -= tx.mem_usage();
        if queue.is_empty() {
            self.senders.remove(&sender);
        }
        self.listener.removed(&tx);
        Some(tx)
    }

    /// Drops every stored transaction.
    pub fn clear(&mut self) {
        self.senders.clear();
        self.by_hash.clear();
        self.mem_usage = 0;
    }

    /// Builds a priority-ordered iterator over the transactions `ready`
    /// judges includable, merging across senders by `Scoring::priority`.
    ///
    /// For each sender, transactions are walked in ascending ordinal order;
    /// a `Readiness::Stale` transaction is skipped (and the walk continues),
    /// a `Readiness::Future` transaction stops the walk for that sender
    /// entirely (a gap, or anything past it, cannot be included yet).
    pub fn pending<R>(&self, ready: R) -> PendingIterator<T, S, R>
    where
        S: Clone,
        R: Ready<T>,
    {
        let mut cursors = HashMap::new();
        let mut heap = BinaryHeap::new();
        let mut ready = ready;
        let mut tie_breaker = 0u64;

        for (sender, queue) in &self.senders {
            let mut dq: VecDeque<Arc<T>> = queue.values().cloned().collect();
            if let Some(candidate) = prime(&mut dq, &mut ready) {
                heap.push(Entry {
                    score: self.scoring.priority(&candidate),
                    sender: sender.clone(),
                    tie_breaker,
                });
                tie_breaker += 1;
                cursors.insert(sender.clone(), dq);
            }
        }

        PendingIterator {
            scoring: self.scoring.clone(),
            cursors,
            heap,
            ready,
            tie_breaker,
        }
    }

    /// Cheaper variant of [`Pool::pending`] that does not order its output
    /// across senders — only within a sender (ascending ordinal).
    pub fn unordered_pending<R: Ready<T>>(&self, mut ready: R) -> Vec<Arc<T>> {
        let mut out = Vec::new();
        for queue in self.senders.values() {
            for tx in queue.values() {
                match ready.is_ready(tx) {
                    Readiness::Ready => out.push(tx.clone()),
                    Readiness::Stale => continue,
                    Readiness::Future => break,
                }
            }
        }
        out
    }
}

fn prime<T, R: Ready<T>>(cursor: &mut VecDeque<Arc<T>>, ready: &mut R) -> Option<Arc<T>> {
    loop {
        let front = cursor.front()?.clone();
        match ready.is_ready(&front) {
            Readiness::Ready => return Some(front),
            Readiness::Stale => {
                cursor.pop_front();
                continue;
            }
            Readiness::Future => return None,
        }
    }
}

/// Lazy, priority-ordered merge of the best ready transaction from each
/// sender. Single-pass: once dropped, the underlying snapshot is gone.
pub struct PendingIterator<T, S, R>
where
    T: VerifiedTransaction,
    S: Scoring<T>,
{
    scoring: S,
    cursors: HashMap<T::Sender, VecDeque<Arc<T>>>,
    heap: BinaryHeap<Entry<S::Score, T::Sender>>,
    ready: R,
    tie_breaker: u64,
}

impl<T, S, R> PendingIterator<T, S, R>
where
    T: VerifiedTransaction,
    S: Scoring<T>,
    R: Ready<T>,
{
    /// Reveals the best head-of-queue transaction without consuming it.
    pub fn peek(&self) -> Option<&Arc<T>> {
        let top = self.heap.peek()?;
        self.cursors.get(&top.sender).and_then(|q| q.front())
    }

    /// Abandons the rest of the current best sender's queue for this
    /// iteration (it will not be visited again).
    pub fn skip_sender(&mut self) {
        if let Some(top) = self.heap.pop() {
            self.cursors.remove(&top.sender);
        }
    }
}

impl<T, S, R> Iterator for PendingIterator<T, S, R>
where
    T: VerifiedTransaction,
    S: Scoring<T>,
    R: Ready<T>,
{
    type Item = Arc<T>;

    fn next(&mut self) -> Option<Arc<T>> {
        loop {
            let top = self.heap.pop()?;
            let cursor = match self.cursors.get_mut(&top.sender) {
                Some(c) => c,
                None => continue,
            };
            let tx = match cursor.pop_front() {
                Some(tx) => tx,
                None => continue,
            };
            if let Some(next) = prime(cursor, &mut self.ready) {
                self.heap.push(Entry {
                    score: self.scoring.priority(&next),
                    sender: top.sender,
                    tie_breaker: self.tie_breaker,
                });
                self.tie_breaker += 1;
            } else {
                self.cursors.remove(&top.sender);
            }
            return Some(tx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct TestTx {
        hash: u64,
        sender: &'static str,
        ordinal: u64,
        gas_price: u64,
    }

    impl VerifiedTransaction for TestTx {
        type Hash = u64;
        type Sender = &'static str;

        fn hash(&self) -> &u64 {
            &self.hash
        }
        fn sender(&self) -> &&'static str {
            &self.sender
        }
        fn ordinal(&self) -> u64 {
            self.ordinal
        }
        fn mem_usage(&self) -> usize {
            128
        }
    }

    #[derive(Debug, Clone, Default)]
    struct ByGasPrice;

    impl Scoring<TestTx> for ByGasPrice {
        type Score = u64;

        fn choose(&self, old: &TestTx, new: &TestTx) -> Choice {
            if new.gas_price > old.gas_price {
                Choice::ReplaceOld
            } else {
                Choice::RejectNew
            }
        }

        fn priority(&self, tx: &TestTx) -> u64 {
            tx.gas_price
        }
    }

    struct NextOrdinal(HashMap<&'static str, u64>);

    impl Ready<TestTx> for NextOrdinal {
        fn is_ready(&mut self, tx: &TestTx) -> Readiness {
            let expected = *self.0.get(tx.sender).unwrap_or(&0);
            if tx.ordinal < expected {
                Readiness::Stale
            } else if tx.ordinal == expected {
                self.0.insert(tx.sender, expected + 1);
                Readiness::Ready
            } else {
                Readiness::Future
            }
        }
    }

    fn tx(hash: u64, sender: &'static str, ordinal: u64, gas_price: u64) -> TestTx {
        TestTx { hash, sender, ordinal, gas_price }
    }

    #[test]
    fn imports_and_looks_up_by_hash() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        let inserted = pool.import(tx(1, "alice", 0, 10)).unwrap();
        assert_eq!(pool.get(&1), Some(inserted));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn rejects_exact_duplicate() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 10)).unwrap();
        let err = pool.import(tx(1, "alice", 0, 10)).unwrap_err();
        assert_eq!(err, Error::AlreadyImported(1));
    }

    #[test]
    fn replacement_bump_swaps_slot_occupant() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 10)).unwrap();
        pool.import(tx(2, "alice", 0, 20)).unwrap();
        assert_eq!(pool.len(), 1);
        assert!(pool.get(&1).is_none());
        assert!(pool.get(&2).is_some());
    }

    #[test]
    fn underpriced_replacement_is_rejected() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 10)).unwrap();
        let err = pool.import(tx(2, "alice", 0, 11)).unwrap_err();
        assert_eq!(err, Error::TooCheapToReplace(1, 2));
        assert!(pool.get(&1).is_some());
    }

    #[test]
    fn remove_clears_empty_sender_bucket() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 10)).unwrap();
        assert!(pool.remove(&1).is_some());
        assert_eq!(pool.senders().count(), 0);
        assert_eq!(pool.len(), 0);
    }

    #[test]
    fn pending_stops_at_ordinal_gap() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 10)).unwrap();
        pool.import(tx(2, "alice", 2, 10)).unwrap();

        let ready = NextOrdinal(HashMap::new());
        let pending: Vec<_> = pool.pending(ready).map(|t| t.hash).collect();
        assert_eq!(pending, vec![1]);
    }

    #[test]
    fn pending_merges_senders_by_priority() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 5)).unwrap();
        pool.import(tx(2, "bob", 0, 50)).unwrap();
        pool.import(tx(3, "alice", 1, 100)).unwrap();

        let ready = NextOrdinal(HashMap::new());
        let pending: Vec<_> = pool.pending(ready).map(|t| t.hash).collect();
        // bob (50) first, then alice#0 (5) must be served before alice#1 (100)
        // even though alice#1 has higher priority, because it is not yet ready.
        assert_eq!(pending, vec![2, 1, 3]);
    }

    #[test]
    fn skip_sender_abandons_rest_of_queue() {
        let mut pool = Pool::new(Options::default(), ByGasPrice);
        pool.import(tx(1, "alice", 0, 5)).unwrap();
        pool.import(tx(2, "alice", 1, 5)).unwrap();
        pool.import(tx(3, "bob", 0, 1)).unwrap();

        let ready = NextOrdinal(HashMap::new());
        let mut iter = pool.pending(ready);
        assert_eq!(iter.next().map(|t| t.hash), Some(1));
        iter.skip_sender();
        assert_eq!(iter.next().map(|t| t.hash), Some(3));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn too_cheap_to_enter_full_pool_is_rejected() {
        let options = Options { max_count: 1, max_per_sender: 16, max_mem_usage: usize::MAX };
        let mut pool = Pool::new(options, ByGasPrice);
        pool.import(tx(1, "alice", 0, 100)).unwrap();
        let err = pool.import(tx(2, "bob", 0, 1)).unwrap_err();
        assert!(matches!(err, Error::TooCheapToEnter(2, _)));
    }
}
