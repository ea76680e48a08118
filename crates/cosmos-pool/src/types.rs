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

//! Cosmos SDK address and coin types, kept deliberately small: this crate
//! does not need an account keeper or a bank module, only something hashable
//! to key the pool by sender and a `(denom, amount)` pair to compare fees.

use std::fmt;

use bech32::{self, FromBase32, ToBase32, Variant};
use ethereum_types::U256;

/// A bech32-encoded account address, e.g. `cosmos1...`.
///
/// Stored pre-decoded (human-readable prefix plus raw bytes) so sender
/// comparisons never re-run bech32 decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bech32Address {
    pub hrp: String,
    pub bytes: Vec<u8>,
}

impl Bech32Address {
    pub fn new(hrp: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Bech32Address { hrp: hrp.into(), bytes: bytes.into() }
    }

    /// Parses a bech32 string such as `cosmos1...` into its prefix and raw
    /// bytes, rejecting anything that is not valid bech32.
    pub fn parse(address: &str) -> Result<Self, bech32::Error> {
        let (hrp, data, _variant) = bech32::decode(address)?;
        let bytes: Vec<u8> = Vec::from_base32(&data)?;
        Ok(Bech32Address { hrp, bytes })
    }
}

impl fmt::Display for Bech32Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match bech32::encode(&self.hrp, self.bytes.to_base32(), Variant::Bech32) {
            Ok(encoded) => write!(f, "{encoded}"),
            Err(_) => write!(f, "<invalid bech32 address>"),
        }
    }
}

/// A single denomination/amount pair, as carried in a `Tx`'s fee field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: U256,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Coin { denom: denom.into(), amount }
    }
}
