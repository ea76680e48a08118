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

use ethereum_types::{Address, H256, U256};

use crate::{error::Error, header::Header};

/// Read-only facade over the block-producing chain's latest finalized state.
///
/// Sub-pools depend on this trait, not on the execution engine directly, so
/// that the pool crates never link against consensus or execution code.
/// Every read is a snapshot: callers may ask about a block already served
/// without contending with locks the execution engine itself holds.
pub trait ChainView: Send + Sync {
    /// The latest finalized header. Fails with [`Error::NotReady`] before
    /// block height 2.
    fn current_header(&self) -> Result<Header, Error>;

    /// Post-block account nonce as of `head`.
    fn nonce_at(&self, head: H256, sender: &Address) -> Result<u64, Error>;

    /// Post-block account balance, in the denomination that pays EVM gas,
    /// as of `head`.
    fn balance_at(&self, head: H256, sender: &Address) -> Result<U256, Error>;

    /// A channel yielding one [`HeadChange`] per committed block, in commit
    /// order, with no gaps.
    fn subscribe_head_changes(&self) -> crossbeam_channel::Receiver<crate::header::HeadChange>;

    /// Explicit trigger used by the block-subscription bridge when the
    /// consensus engine emits a header-finalized event. Implementations
    /// push the corresponding [`HeadChange`] to every subscriber.
    fn notify_new_block(&self, header: Header);
}
