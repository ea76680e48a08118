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

//! Generic, transaction-agnostic scoring/readiness transaction pool engine.
//!
//! This crate knows nothing about Ethereum or Cosmos. It stores whatever
//! implements [`pool::VerifiedTransaction`], orders senders against each
//! other with a caller-supplied [`Scoring`], and decides per-transaction
//! includability with a caller-supplied [`Ready`]. The chain-specific pools
//! live one layer up and supply both.

mod error;
mod listener;
mod options;
mod pool;
mod ready;
mod scoring;

pub use error::{Error, Result};
pub use listener::{Listener, NoopListener};
pub use options::{LightStatus, Options};
pub use pool::{PendingIterator, Pool, VerifiedTransaction};
pub use ready::{AlwaysReady, Ready, Readiness};
pub use scoring::{Choice, Scoring};
