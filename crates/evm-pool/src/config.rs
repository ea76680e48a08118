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

use serde::{Deserialize, Serialize};

/// Configuration for the Ethereum sub-pool.
///
/// Every field is `#[serde(default)]`-able so an embedding node can load a
/// partial TOML/JSON document and fall back to these defaults for the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyPoolConfig {
    /// Minimum percentage a replacement's tip_cap and fee_cap must each
    /// exceed the incumbent's by, e.g. `10` for the default 10% bump.
    pub price_bump_pct: u32,
    /// Maximum number of pending transactions held across all senders.
    pub pending_global_slots: usize,
    /// Maximum number of pending transactions held per sender.
    pub pending_per_sender_slots: usize,
    /// Maximum number of queued transactions held across all senders.
    pub queue_global_slots: usize,
    /// Maximum number of queued transactions held per sender.
    pub queue_per_sender_slots: usize,
    /// Seconds a queued (non-local) transaction may sit before it becomes
    /// eligible for lifetime-based eviction.
    pub lifetime_for_queued_secs: u64,
    /// Maximum transaction payload size, in bytes, before `oversized_data`.
    pub max_tx_data_bytes: usize,
    /// Required EIP-155 chain id. `None` accepts any (or pre-EIP-155,
    /// unsigned-chain-id) transaction.
    pub chain_id: Option<u64>,
    /// Hard floor below which a transaction's effective tip is rejected
    /// outright with `fee_too_low`, independent of `min_tip`-based
    /// selection filtering at read time.
    pub minimum_effective_tip: u64,
}

impl Default for LegacyPoolConfig {
    fn default() -> Self {
        LegacyPoolConfig {
            price_bump_pct: 10,
            pending_global_slots: 4096,
            pending_per_sender_slots: 16,
            queue_global_slots: 1024,
            queue_per_sender_slots: 64,
            lifetime_for_queued_secs: 3 * 60 * 60,
            max_tx_data_bytes: 128 * 1024,
            chain_id: None,
            minimum_effective_tip: 0,
        }
    }
}
