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

use std::fmt;

use ethereum_types::H256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `gas_limit` was zero or negative on the wire.
    NonPositiveGasLimit,
    /// A transaction with this hash is already pooled.
    AlreadyKnown(H256),
    /// A replacement was offered but did not beat the incumbent's priority.
    ReplacementRejected,
    /// The pool is full and this transaction did not outrank the worst entry.
    PoolFull,
    /// The pool has been closed and no longer accepts transactions.
    Shutdown,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonPositiveGasLimit => write!(f, "gas limit must be a positive integer"),
            Error::AlreadyKnown(hash) => write!(f, "transaction {:x} already known", hash),
            Error::ReplacementRejected => {
                write!(f, "replacement transaction does not outrank the incumbent")
            }
            Error::PoolFull => write!(f, "pool is full"),
            Error::Shutdown => write!(f, "pool is shut down"),
        }
    }
}

impl std::error::Error for Error {}

impl From<txpool::Error<H256>> for Error {
    fn from(err: txpool::Error<H256>) -> Self {
        match err {
            txpool::Error::AlreadyImported(hash) => Error::AlreadyKnown(hash),
            txpool::Error::TooCheapToEnter(_, _) => Error::PoolFull,
            txpool::Error::TooCheapToReplace(_, _) => Error::ReplacementRejected,
        }
    }
}
