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

use std::sync::Arc;

/// Observes transactions entering and leaving a [`crate::Pool`].
///
/// Kept deliberately thin: the pool invokes this synchronously while holding
/// its own lock, so implementations must be cheap (counters, journaling) and
/// must not themselves call back into the pool. Anything that needs to run
/// outside the lock (broadcasting a promoted transaction, say) belongs one
/// layer up, in the sub-pool that owns the `Pool`.
pub trait Listener<T> {
    /// Called after `tx` was inserted, with `old` set if it replaced an
    /// incumbent at the same `(sender, ordinal)` slot.
    fn added(&mut self, tx: &Arc<T>, old: Option<&Arc<T>>);

    /// Called after `tx` was removed from the pool.
    fn removed(&mut self, tx: &Arc<T>);
}

/// A [`Listener`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl<T> Listener<T> for NoopListener {
    fn added(&mut self, _tx: &Arc<T>, _old: Option<&Arc<T>>) {}
    fn removed(&mut self, _tx: &Arc<T>) {}
}
