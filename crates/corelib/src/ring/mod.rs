//! Token ring implementation.
//!
//! The ring holds every (token, node) pair in token order. Trials never mutate
//! it: each one asks for a [`RingView`] with a set of nodes removed.

pub mod ring;
pub mod view;

pub use ring::{RingBuilder, TokenRing};
pub use view::RingView;
