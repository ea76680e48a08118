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

//! Read-only facade over the block-producing chain's latest finalized state.
//!
//! Kept deliberately small so the pool crates depend on four read methods
//! and one event stream instead of linking against the execution engine.

mod error;
mod header;
mod view;

#[cfg(any(test, feature = "test-utils"))]
mod test_util;

pub use error::Error;
pub use header::{HeadChange, Header};
pub use view::ChainView;

#[cfg(any(test, feature = "test-utils"))]
pub use test_util::TestChainView;
