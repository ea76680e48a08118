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

/// Orders Ethereum transactions by effective tip at a fixed base fee.
///
/// A fresh instance is swapped in via [`txpool::Pool::set_scoring`] whenever
/// the head's base fee changes, since `priority` closes over `base_fee`.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveTipScoring {
    base_fee: Option<U256>,
    /// Minimum percentage (e.g. 10 for 10%) a replacement's tip_cap and
    /// fee_cap must each exceed the incumbent's by.
    price_bump_pct: u32,
}

impl EffectiveTipScoring {
    pub fn new(base_fee: Option<U256>, price_bump_pct: u32) -> Self {
        EffectiveTipScoring { base_fee, price_bump_pct }
    }

    pub fn base_fee(&self) -> Option<U256> {
        self.base_fee
    }

    fn clears_bump(&self, old: U256, new: U256) -> bool {
        // new >= old * (100 + bump) / 100, computed to avoid overflow on
        // realistic gas price magnitudes (U256 headroom is enormous).
        new.saturating_mul(U256::from(100))
            >= old.saturating_mul(U256::from(100 + self.price_bump_pct))
    }
}

impl Scoring<VerifiedTransaction> for EffectiveTipScoring {
    type Score = U256;

    fn choose(&self, old: &VerifiedTransaction, new: &VerifiedTransaction) -> Choice {
        let tip_ok = self.clears_bump(old.fees.tip_cap(), new.fees.tip_cap());
        let fee_cap_ok = self.clears_bump(old.fees.fee_cap(), new.fees.fee_cap());
        if tip_ok && fee_cap_ok {
            Choice::ReplaceOld
        } else {
            Choice::RejectNew
        }
    }

    fn priority(&self, tx: &VerifiedTransaction) -> U256 {
        tx.fees.effective_tip(self.base_fee)
    }
}
