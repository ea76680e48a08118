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

/// Pool capacity limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Maximum number of transactions held by the whole pool.
    pub max_count: usize,
    /// Maximum number of transactions held per sender.
    pub max_per_sender: usize,
    /// Maximum cumulative memory usage (bytes) of the whole pool.
    pub max_mem_usage: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_count: 8_192,
            max_per_sender: 16,
            max_mem_usage: 256 * 1024 * 1024,
        }
    }
}

/// Lightweight, allocation-free snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LightStatus {
    /// Number of transactions currently stored.
    pub transaction_count: usize,
    /// Number of distinct senders currently represented.
    pub senders: usize,
    /// Cumulative `mem_usage()` of all stored transactions.
    pub mem_usage: usize,
}
