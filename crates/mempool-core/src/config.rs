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

use std::path::PathBuf;

use ethereum_types::U256;
use serde::{Deserialize, Serialize};

/// Top-level coordinator configuration.
///
/// Chain parameters (decimals, denoms, chain id) are passed explicitly here
/// rather than read from a hidden global singleton, per the re-architecture
/// note about consolidating process-wide configuration into an explicit
/// value passed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Upper bound used by the block-builder for proposal size. Not
    /// enforced by the coordinator itself (it has no byte-size notion of a
    /// transaction); exposed for callers that budget proposals by gas.
    pub block_gas_limit: u64,
    /// Transactions with effective tip below this are hidden from
    /// `select`/`select_by`.
    pub min_tip: U256,
    /// Ethereum sub-pool configuration.
    pub legacy_pool_config: evm_pool::LegacyPoolConfig,
    /// Cosmos sub-pool configuration.
    pub cosmos_pool_config: cosmos_pool::CosmosPoolConfig,
    /// Disables the optional local-transaction journal.
    pub journal_disabled: bool,
    /// Where the local-transaction journal is kept. Ignored when
    /// `journal_disabled` is set.
    pub journal_path: PathBuf,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        CoordinatorConfig {
            block_gas_limit: 100_000_000,
            min_tip: U256::zero(),
            legacy_pool_config: evm_pool::LegacyPoolConfig::default(),
            cosmos_pool_config: cosmos_pool::CosmosPoolConfig::default(),
            journal_disabled: true,
            journal_path: PathBuf::from("mempool-local.journal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_document_fills_in_defaults() {
        let parsed: CoordinatorConfig =
            serde_json::from_str(r#"{"block_gas_limit": 50000000}"#).unwrap();
        assert_eq!(parsed.block_gas_limit, 50_000_000);
        assert_eq!(parsed.min_tip, U256::zero());
        assert_eq!(parsed.journal_disabled, true);
    }

    #[test]
    fn round_trips_through_json() {
        let config = CoordinatorConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: CoordinatorConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
