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

//! Unified application-side transaction mempool, serving both Ethereum-style
//! and Cosmos SDK-style transactions from one coordinator.
//!
//! [`Coordinator`] routes each incoming transaction to [`evm_pool`] or
//! [`cosmos_pool`] by shape, merges both sub-pools' priority-ordered pending
//! sets through [`merge::MergeIterator`] for the block builder, and exposes
//! the read-side telemetry a node's RPC/ABCI query surface needs.
//! [`checktx::CheckTxGateway`] additionally re-routes nonce-gapped
//! transactions into the coordinator's queued-acceptable path instead of
//! letting an application's own admission check drop them.

mod checktx;
mod config;
mod coordinator;
mod envelope;
mod error;
mod journal;
mod merge;
mod metrics;

pub use checktx::{AdmissionError, AdmissionOutcome, AdmissionPipeline, CheckTxGateway};
pub use config::CoordinatorConfig;
pub use coordinator::{AnteHandler, AnteOutcome, Broadcaster, Coordinator, InspectSummary, PoolContent, SenderContent};
pub use envelope::{Envelope, IncomingTransaction, Message};
pub use error::Error;
pub use journal::Journal;
pub use merge::MergeIterator;
pub use metrics::Metrics;
