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

//! The Ethereum (EIP-1559-aware) transaction sub-pool.
//!
//! Built on top of [`txpool`]'s generic scoring/readiness engine: this crate
//! supplies the Ethereum-specific [`VerifiedTransaction`], the effective-tip
//! [`Scoring`](scoring::EffectiveTipScoring), the nonce/balance
//! [`Ready`](ready::NonceContiguous) walk, and [`TransactionQueue`], which
//! wires those together with a [`chain_view::ChainView`] and a background
//! thread that reorganizes the pool on every chain-head event.

mod config;
mod error;
mod queue;
mod ready;
mod scoring;
mod transaction;
mod verifier;

pub use config::LegacyPoolConfig;
pub use error::Error;
pub use queue::{PendingFilter, Status, TransactionQueue};
pub use ready::NonceContiguous;
pub use scoring::EffectiveTipScoring;
pub use transaction::{FeeSchedule, UnverifiedTransaction, VerifiedTransaction};
pub use verifier::{SignatureChecker, TrustedSender, Verifier};
