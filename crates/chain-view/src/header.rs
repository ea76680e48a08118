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

use ethereum_types::{H256, U256};

/// A minimal, stable view of a finalized block header.
///
/// Carries only what the sub-pools need: enough to compute effective tips
/// and to detect whether a new head is a simple linear advance over the
/// previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Block height.
    pub number: u64,
    /// Block hash.
    pub hash: H256,
    /// Parent block hash.
    pub parent_hash: H256,
    /// EIP-1559 base fee, absent on chains/blocks that do not set one.
    pub base_fee: Option<U256>,
    /// Block gas limit from consensus params.
    pub gas_limit: u64,
}

/// A single "head changed" notification.
///
/// Exactly one of these is emitted per committed block; the instant-finality
/// contract means a consumer never needs to reconcile a discarded branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadChange {
    /// The newly finalized header.
    pub header: Header,
}
