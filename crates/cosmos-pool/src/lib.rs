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

//! The Cosmos SDK transaction sub-pool: a priority-nonce mempool ordering
//! non-EVM transactions by effective gas price in the bond denom, built on
//! top of [`txpool`]'s generic scoring/readiness engine.

mod config;
mod error;
mod pool;
mod scoring;
mod transaction;
mod types;

pub use config::CosmosPoolConfig;
pub use error::Error;
pub use pool::CosmosPool;
pub use scoring::PriorityScoring;
pub use transaction::{priority_in_bond_denom, UnverifiedTransaction, VerifiedTransaction};
pub use types::{Bech32Address, Coin};
