//! Core library for the vnode decommission planner.
//!
//! This crate provides the ring model the planner simulates against:
//! - Signed 64-bit Murmur3 tokens and wraparound-safe ring distances
//! - Node records, merged per address and grouped by datacenter/rack
//! - The token-ordered ring and reduced views with nodes removed

pub mod error;
pub mod node;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use error::{Error, Result};
pub use node::{Node, NodeId, NodeRecord, RackKey};
pub use ring::{RingBuilder, RingView, TokenRing};
pub use token::{Murmur3Token, Token, TokenError, RING_SIZE};
pub use topology::{RackGroup, Topology};
pub use vnode::VirtualNode;
