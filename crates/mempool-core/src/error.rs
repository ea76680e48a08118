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

use std::{error, fmt};

/// Failure surfaced at the coordinator boundary.
///
/// Wraps the sub-pool error types with `From` conversions so callers see
/// one error type regardless of which sub-pool ultimately rejected the
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Block height is below 2; no coordinator operation succeeds yet.
    NotReady,
    /// An incoming transaction carried no messages.
    NoMessages,
    /// An incoming transaction carried more than one message (only
    /// single-message Ethereum envelopes route to the EVM sub-pool).
    MultiMessage,
    /// `insert_invalid_nonce` was called with a non-Ethereum payload.
    NotEvmMessage,
    /// The EVM sub-pool rejected the transaction.
    Evm(evm_pool::Error),
    /// The Cosmos sub-pool rejected the transaction.
    Cosmos(cosmos_pool::Error),
    /// Operation attempted after [`crate::Coordinator::close`].
    Shutdown,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotReady => write!(f, "mempool not ready: awaiting block height 2"),
            Error::NoMessages => write!(f, "transaction carries no messages"),
            Error::MultiMessage => write!(f, "transaction carries more than one message"),
            Error::NotEvmMessage => write!(f, "transaction is not a single Ethereum message"),
            Error::Evm(err) => write!(f, "evm pool: {err}"),
            Error::Cosmos(err) => write!(f, "cosmos pool: {err}"),
            Error::Shutdown => write!(f, "coordinator is shut down"),
        }
    }
}

impl error::Error for Error {}

impl From<evm_pool::Error> for Error {
    fn from(err: evm_pool::Error) -> Self {
        Error::Evm(err)
    }
}

impl From<cosmos_pool::Error> for Error {
    fn from(err: cosmos_pool::Error) -> Self {
        Error::Cosmos(err)
    }
}
