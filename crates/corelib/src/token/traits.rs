//! Core token trait definitions.

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

/// Number of distinct positions on a 64-bit ring (2^64).
///
/// Does not fit in `u64`, so widths that may cover the whole ring are `u128`.
pub const RING_SIZE: u128 = 1 << 64;

/// Errors that can occur when parsing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Text that is not a signed 64-bit integer.
    #[error("invalid token text: {0:?}")]
    InvalidText(String),
}

/// Minimal token trait for the ring.
///
/// Tokens are immutable, comparable positions. Implementations must be
/// thread-safe and cheap to copy, compare and hash.
pub trait Token: Copy + Ord + Hash + Send + Sync + Debug + 'static {
    /// Signed wraparound offset from `self` to `other`.
    ///
    /// Equal to `((other - self + 2^63) mod 2^64) - 2^63`: short hops across
    /// the `max -> min` boundary come out small and positive.
    fn offset_to(&self, other: &Self) -> i64;
    /// Clockwise distance from `self` to `other` on the ring.
    ///
    /// Same bits as [`Token::offset_to`], read as unsigned. Zero when the
    /// tokens are equal.
    fn distance_to(&self, other: &Self) -> u64;
}
