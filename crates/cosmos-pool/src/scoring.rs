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

use ethereum_types::U256;
use txpool::{Choice, Scoring};

use crate::transaction::VerifiedTransaction;

/// Orders Cosmos transactions by their effective gas price in the bond
/// denom, computed once at insertion time and stored on the transaction
/// itself (`VerifiedTransaction::priority`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityScoring;

impl Scoring<VerifiedTransaction> for PriorityScoring {
    type Score = U256;

    fn choose(&self, old: &VerifiedTransaction, new: &VerifiedTransaction) -> Choice {
        if new.priority > old.priority {
            Choice::ReplaceOld
        } else {
            Choice::RejectNew
        }
    }

    fn priority(&self, tx: &VerifiedTransaction) -> U256 {
        tx.priority
    }
}
