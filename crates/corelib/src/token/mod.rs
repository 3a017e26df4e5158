//! Token abstraction module.
//!
//! Tokens represent positions on the ring. The ring reported by a
//! Murmur3-partitioned cluster uses signed 64-bit positions, so the only
//! concrete token is [`Murmur3Token`].

pub mod murmur3;
pub mod traits;

pub use murmur3::Murmur3Token;
pub use traits::{Token, TokenError, RING_SIZE};
