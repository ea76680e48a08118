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

/// Outcome of comparing an incoming transaction against the incumbent
/// occupying the same `(sender, ordinal)` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Keep the incumbent, drop the new transaction.
    RejectNew,
    /// Drop the incumbent, keep the new transaction.
    ReplaceOld,
    /// There was no incumbent; insert normally.
    Insert,
}

/// Pluggable transaction ordering.
///
/// Ordering *within* a sender's own queue is not this trait's concern: the
/// pool stores each sender's transactions in a `BTreeMap` keyed by
/// `ordinal()`, so same-sender order is structural, not scored. A `Scoring`
/// implementation instead defines:
///  - `choose`, which decides whether an incoming transaction replaces the
///    incumbent occupying the same `(sender, ordinal)` slot;
///  - `priority`, the cross-sender ordering that decides what order the
///    pending iterator serves distinct senders' best transactions in.
pub trait Scoring<T>: fmt::Debug {
    /// Priority type. Higher is better.
    type Score: Ord + Copy + fmt::Debug + Default;

    /// Decides whether `new` should replace `old` when they occupy the same
    /// `(sender, ordinal)` slot.
    fn choose(&self, old: &T, new: &T) -> Choice;

    /// Computes the cross-sender priority of a transaction.
    fn priority(&self, tx: &T) -> Self::Score;
}
