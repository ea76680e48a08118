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

//! Prometheus metrics for the coordinator, registered once at construction
//! and updated without taking the coordinator mutex.

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

/// Pending/queued gauges, insert/reject counters by error kind, and a
/// promotion counter, following the reference client's
/// `stats::PrometheusRegistry` convention of registering fixed-purpose
/// collectors into a caller-supplied [`Registry`].
pub struct Metrics {
    pub evm_pending: IntGauge,
    pub evm_queued: IntGauge,
    pub cosmos_count: IntGauge,
    pub inserts_total: IntCounterVec,
    pub rejects_total: IntCounterVec,
    pub promotions_total: IntCounter,
}

impl Metrics {
    /// Builds and registers every collector into `registry`. Fails only if
    /// a collector with a colliding name is already registered.
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        let evm_pending = IntGauge::new("mempool_evm_pending", "EVM sub-pool pending transaction count")?;
        let evm_queued = IntGauge::new("mempool_evm_queued", "EVM sub-pool queued transaction count")?;
        let cosmos_count = IntGauge::new("mempool_cosmos_count", "Cosmos sub-pool transaction count")?;
        let inserts_total = IntCounterVec::new(
            Opts::new("mempool_inserts_total", "Accepted insertions by sub-pool"),
            &["pool"],
        )?;
        let rejects_total = IntCounterVec::new(
            Opts::new("mempool_rejects_total", "Rejected insertions by error kind"),
            &["kind"],
        )?;
        let promotions_total =
            IntCounter::new("mempool_promotions_total", "EVM transactions promoted queued -> pending")?;

        registry.register(Box::new(evm_pending.clone()))?;
        registry.register(Box::new(evm_queued.clone()))?;
        registry.register(Box::new(cosmos_count.clone()))?;
        registry.register(Box::new(inserts_total.clone()))?;
        registry.register(Box::new(rejects_total.clone()))?;
        registry.register(Box::new(promotions_total.clone()))?;

        Ok(Metrics { evm_pending, evm_queued, cosmos_count, inserts_total, rejects_total, promotions_total })
    }

    pub fn observe_status(&self, evm: evm_pool::Status, cosmos_count: usize) {
        self.evm_pending.set(evm.pending as i64);
        self.evm_queued.set(evm.queued as i64);
        self.cosmos_count.set(cosmos_count as i64);
    }

    pub fn record_insert(&self, pool: &str) {
        self.inserts_total.with_label_values(&[pool]).inc();
    }

    pub fn record_reject(&self, kind: &str) {
        self.rejects_total.with_label_values(&[kind]).inc();
    }

    pub fn record_promotions(&self, count: usize) {
        self.promotions_total.inc_by(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_without_name_collisions() {
        let registry = Registry::new();
        let metrics = Metrics::new(&registry).unwrap();
        metrics.observe_status(evm_pool::Status { pending: 2, queued: 1 }, 3);
        assert_eq!(metrics.evm_pending.get(), 2);
        assert_eq!(metrics.cosmos_count.get(), 3);
    }
}
