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

use ethereum_types::U256;
use serde::{Deserialize, Serialize};

/// Configuration for the Cosmos sub-pool.
///
/// `bond_denom` is read fresh out of this config on every `insert`/`select_by`
/// call rather than cached globally (see the Open Questions in `DESIGN.md`):
/// a deliberate choice to avoid a hidden global singleton for a chain
/// parameter, matching the re-architecture note in the design notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosPoolConfig {
    /// Denomination the priority function reads the fee amount in.
    pub bond_denom: String,
    /// Transactions with priority below this are hidden from selection.
    pub min_priority_value: U256,
    /// Maximum number of transactions held across all senders.
    pub max_tx: usize,
}

impl Default for CosmosPoolConfig {
    fn default() -> Self {
        CosmosPoolConfig {
            bond_denom: "stake".to_string(),
            min_priority_value: U256::zero(),
            max_tx: 5_000,
        }
    }
}
