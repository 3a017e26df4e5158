//! Node abstractions for the ring.
//!
//! Input arrives as [`NodeRecord`]s, one or more per address. The topology
//! merges them into [`Node`]s and assigns each a compact [`NodeId`] that is
//! cheap to compare and hash.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::token::Murmur3Token;

/// Compact identifier for a node in the ring.
///
/// Ids are assigned in ascending address order, so sorting by id is sorting
/// by address.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Datacenter and rack pair identifying a failure domain.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct RackKey {
    pub datacenter: String,
    pub rack: String,
}

impl RackKey {
    pub fn new(datacenter: impl Into<String>, rack: impl Into<String>) -> Self {
        Self {
            datacenter: datacenter.into(),
            rack: rack.into(),
        }
    }
}

impl fmt::Display for RackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.datacenter, self.rack)
    }
}

/// A raw node record as reported by the ring status.
///
/// The same address usually appears once per token; records for one address
/// are merged with [`NodeRecord::merge`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub address: String,
    pub datacenter: String,
    pub rack: String,
    pub tokens: Vec<Murmur3Token>,
}

impl NodeRecord {
    pub fn new(
        address: impl Into<String>,
        datacenter: impl Into<String>,
        rack: impl Into<String>,
        tokens: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            address: address.into(),
            datacenter: datacenter.into(),
            rack: rack.into(),
            tokens: tokens.into_iter().map(Murmur3Token).collect(),
        }
    }

    pub fn rack_key(&self) -> RackKey {
        RackKey::new(self.datacenter.clone(), self.rack.clone())
    }

    /// Merge another record for the same address into this one.
    ///
    /// # Errors
    ///
    /// [`Error::InconsistentNodeRecord`] if the address, datacenter or rack
    /// differ. `self` is left untouched in that case.
    pub fn merge(&mut self, other: NodeRecord) -> Result<()> {
        if self.address != other.address
            || self.datacenter != other.datacenter
            || self.rack != other.rack
        {
            return Err(Error::InconsistentNodeRecord {
                address: self.address.clone(),
                existing: self.rack_key().to_string(),
                incoming: format!("{} ({})", other.rack_key(), other.address),
            });
        }
        self.tokens.extend(other.tokens);
        Ok(())
    }
}

/// Logical node participating in the ring.
///
/// Tokens are sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Address the node was reported under.
    pub address: String,
    pub datacenter: String,
    pub rack: String,
    pub tokens: Vec<Murmur3Token>,
}

impl Node {
    pub fn rack_key(&self) -> RackKey {
        RackKey::new(self.datacenter.clone(), self.rack.clone())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Node {} address: {}, dc: {}, rack: {}, tokens: {}]",
            self.id,
            self.address,
            self.datacenter,
            self.rack,
            self.tokens.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_concatenates_tokens() {
        let mut a = NodeRecord::new("10.0.0.1", "DC1", "R1", [10]);
        a.merge(NodeRecord::new("10.0.0.1", "DC1", "R1", [-5, 20]))
            .unwrap();
        assert_eq!(
            a.tokens,
            vec![Murmur3Token(10), Murmur3Token(-5), Murmur3Token(20)]
        );
    }

    #[test]
    fn test_merge_rejects_rack_mismatch() {
        let mut a = NodeRecord::new("10.0.0.1", "DC1", "R1", [10]);
        let err = a
            .merge(NodeRecord::new("10.0.0.1", "DC1", "R2", [20]))
            .unwrap_err();
        assert!(matches!(err, Error::InconsistentNodeRecord { ref address, .. } if address == "10.0.0.1"));
        assert_eq!(a.tokens, vec![Murmur3Token(10)]);
    }

    #[test]
    fn test_merge_rejects_datacenter_mismatch() {
        let mut a = NodeRecord::new("10.0.0.1", "DC1", "R1", [10]);
        assert!(a
            .merge(NodeRecord::new("10.0.0.1", "DC2", "R1", [20]))
            .is_err());
    }

    #[test]
    fn test_rack_key_display() {
        assert_eq!(RackKey::new("DC1", "RAC1").to_string(), "DC1:RAC1");
    }
}
