use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{BasisPoints, ErrorKind};

/// 20-byte account address
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccountId(pub [u8; 20]);

/// 20-byte address of a fungible token contract
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TokenId(pub [u8; 20]);

fn fmt_hex(bytes: &[u8; 20], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("0x")?;
    bytes.iter().try_for_each(|byte| write!(f, "{byte:02x}"))
}

/// Address with `tag` in the first byte and `index` big-endian in the last eight.
const fn derived_address(tag: u8, index: u64) -> [u8; 20] {
    let mut bytes = [0u8; 20];
    bytes[0] = tag;
    let index_bytes = index.to_be_bytes();
    let mut i = 0;
    while i < 8 {
        bytes[12 + i] = index_bytes[i];
        i += 1;
    }
    bytes
}

impl AccountId {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Deterministic address, used for derived accounts like pools
    pub const fn derived(tag: u8, index: u64) -> Self {
        Self(derived_address(tag, index))
    }
}

impl TokenId {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn derived(tag: u8, index: u64) -> Self {
        Self(derived_address(tag, index))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hex(&self.0, f)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_hex(&self.0, f)
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({self})")
    }
}

/// Identity of a pool: a token pair in canonical order plus the swap fee of its tier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PoolId {
    token0: TokenId,
    token1: TokenId,
    fee: BasisPoints,
}

impl PoolId {
    /// Orders tokens canonically.
    ///
    /// Returns:
    ///  - the pool id
    ///  - `true` if tokens were swapped to get canonical order
    pub fn try_from_pair(
        (token_a, token_b): (TokenId, TokenId),
        fee: BasisPoints,
    ) -> Result<(Self, bool), ErrorKind> {
        match token_a.cmp(&token_b) {
            std::cmp::Ordering::Equal => Err(ErrorKind::IdenticalTokens),
            std::cmp::Ordering::Less => Ok((
                Self {
                    token0: token_a,
                    token1: token_b,
                    fee,
                },
                false,
            )),
            std::cmp::Ordering::Greater => Ok((
                Self {
                    token0: token_b,
                    token1: token_a,
                    fee,
                },
                true,
            )),
        }
    }

    pub const fn token0(&self) -> &TokenId {
        &self.token0
    }

    pub const fn token1(&self) -> &TokenId {
        &self.token1
    }

    pub const fn fee(&self) -> BasisPoints {
        self.fee
    }

    pub const fn token(&self, is_token0: bool) -> &TokenId {
        if is_token0 {
            &self.token0
        } else {
            &self.token1
        }
    }
}
