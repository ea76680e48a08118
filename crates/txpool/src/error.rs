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

use std::{error, fmt, result};

/// Generic transaction pool error.
///
/// Generic over the transaction hash type so that callers are not forced to
/// box or stringify hashes just to report a pool-level failure.
#[derive(Debug)]
pub enum Error<Hash: fmt::Debug + fmt::LowerHex> {
    /// A transaction with this hash is already present in the pool.
    AlreadyImported(Hash),
    /// The transaction's priority is too low to enter a full pool.
    TooCheapToEnter(Hash, String),
    /// The transaction does not out-bid the incumbent occupying the same
    /// (sender, ordinal) slot.
    TooCheapToReplace(Hash, Hash),
}

/// Generic transaction pool result.
pub type Result<T, H> = result::Result<T, Error<H>>;

impl<H: fmt::Debug + fmt::LowerHex> fmt::Display for Error<H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::AlreadyImported(h) => write!(f, "[{h:?}] already imported"),
            Error::TooCheapToEnter(hash, min_score) => write!(
                f,
                "[{hash:x}] too cheap to enter the pool. Min score: {min_score}"
            ),
            Error::TooCheapToReplace(old_hash, hash) => {
                write!(f, "[{hash:x}] too cheap to replace: {old_hash:x}")
            }
        }
    }
}

impl<H: fmt::Debug + fmt::LowerHex> error::Error for Error<H> {}

#[cfg(test)]
impl<H: fmt::Debug + fmt::LowerHex + PartialEq> PartialEq for Error<H> {
    fn eq(&self, other: &Self) -> bool {
        use Error::*;
        match (self, other) {
            (AlreadyImported(h1), AlreadyImported(h2)) => h1 == h2,
            (TooCheapToEnter(h1, s1), TooCheapToEnter(h2, s2)) => h1 == h2 && s1 == s2,
            (TooCheapToReplace(o1, n1), TooCheapToReplace(o2, n2)) => o1 == o2 && n1 == n2,
            _ => false,
        }
    }
}
