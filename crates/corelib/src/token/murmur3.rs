//! Murmur3 token implementation (Cassandra-compatible signed positions).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::token::traits::{Token, TokenError};

/// Murmur3 token: a signed 64-bit ring position in `-2^63 ..= 2^63 - 1`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Murmur3Token(pub i64);

impl Token for Murmur3Token {
    fn offset_to(&self, other: &Self) -> i64 {
        // Subtract in u64 so the wrap is defined, then reinterpret.
        (other.0 as u64).wrapping_sub(self.0 as u64) as i64
    }

    fn distance_to(&self, other: &Self) -> u64 {
        (other.0 as u64).wrapping_sub(self.0 as u64)
    }
}

impl From<i64> for Murmur3Token {
    fn from(value: i64) -> Self {
        Murmur3Token(value)
    }
}

impl FromStr for Murmur3Token {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Murmur3Token)
            .map_err(|_| TokenError::InvalidText(s.to_string()))
    }
}

impl fmt::Display for Murmur3Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
