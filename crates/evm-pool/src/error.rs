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

use ethereum_types::H256;

/// Failure admitting or otherwise operating on an Ethereum transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `nonce < current_nonce(sender)`.
    NonceLow,
    /// A nonce gap above the sender's contiguous run. Not fatal: the
    /// transaction is accepted into the queued side.
    NonceGap,
    /// A same-(sender, nonce) replacement did not clear the configured bump.
    ReplacementUnderpriced,
    /// Effective tip below the pool's configured minimum.
    FeeTooLow,
    /// `gas_limit` below the computed intrinsic gas cost.
    IntrinsicGasTooLow,
    /// The sender's balance cannot cover this transaction's own cost.
    InsufficientBalance,
    /// Transaction payload exceeds the configured size limit.
    OversizedData,
    /// Signature did not recover to the claimed sender.
    InvalidSignature,
    /// `chain_id` does not match the configured chain.
    ChainIdMismatch,
    /// The sender already has `pending_per_sender_slots` /
    /// `queue_per_sender_slots` transactions and none were evictable.
    PoolFullPerSender,
    /// The pool already has `pending_global_slots` / `queue_global_slots`
    /// transactions and none were evictable.
    PoolFullGlobal,
    /// A transaction with this hash is already known. Not an error
    /// condition for the caller; callers should treat this as success.
    AlreadyKnown(H256),
    /// Operation attempted after [`crate::TransactionQueue::close`].
    Shutdown,
    /// The underlying chain view could not be read (e.g. not yet past
    /// block height 2).
    ChainView(chain_view::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NonceLow => write!(f, "nonce too low"),
            Error::NonceGap => write!(f, "nonce gap above the contiguous pending run"),
            Error::ReplacementUnderpriced => write!(f, "replacement transaction underpriced"),
            Error::FeeTooLow => write!(f, "effective tip below the configured minimum"),
            Error::IntrinsicGasTooLow => write!(f, "gas limit below intrinsic gas cost"),
            Error::InsufficientBalance => write!(f, "sender balance cannot cover transaction cost"),
            Error::OversizedData => write!(f, "transaction data exceeds the size limit"),
            Error::InvalidSignature => write!(f, "signature does not recover to the sender"),
            Error::ChainIdMismatch => write!(f, "chain id does not match"),
            Error::PoolFullPerSender => write!(f, "sender's pool slots are full"),
            Error::PoolFullGlobal => write!(f, "pool is full"),
            Error::AlreadyKnown(hash) => write!(f, "[{hash:x}] already known"),
            Error::Shutdown => write!(f, "pool is shut down"),
            Error::ChainView(err) => write!(f, "chain view: {err}"),
        }
    }
}

impl error::Error for Error {}

impl From<chain_view::Error> for Error {
    fn from(err: chain_view::Error) -> Self {
        Error::ChainView(err)
    }
}

impl From<txpool::Error<H256>> for Error {
    fn from(err: txpool::Error<H256>) -> Self {
        match err {
            txpool::Error::AlreadyImported(hash) => Error::AlreadyKnown(hash),
            txpool::Error::TooCheapToEnter(..) => Error::PoolFullGlobal,
            txpool::Error::TooCheapToReplace(..) => Error::ReplacementUnderpriced,
        }
    }
}
