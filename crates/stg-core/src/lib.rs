#![deny(missing_docs)]
#![doc = "Core traits and data types shared by the STG analysis crates."]

use std::iter::ExactSizeIterator;

use serde::{Deserialize, Serialize};

pub mod errors;
mod value;

pub use errors::{ErrorInfo, StgError};
pub use value::AttrValue;

/// Identifier for a node within an [`AttributedDigraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u64 {
        self.0
    }

    /// Returns the identifier as a dense index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index as u64)
    }
}

/// Read-only contract for directed graphs whose nodes carry labelled attributes.
///
/// Iteration order is part of the contract: implementations must yield nodes
/// and edges in a stable order so downstream aggregation is deterministic.
pub trait AttributedDigraph {
    /// Returns the number of nodes.
    fn node_count(&self) -> usize;

    /// Returns the number of edges.
    fn edge_count(&self) -> usize;

    /// Returns an iterator over all node identifiers in insertion order.
    fn node_ids(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_>;

    /// Returns an iterator over all `(source, target)` pairs in insertion order.
    fn edge_pairs(&self) -> Box<dyn Iterator<Item = (NodeId, NodeId)> + '_>;

    /// Returns the label of the provided node.
    fn node_label(&self, node: NodeId) -> Result<&AttrValue, StgError>;

    /// Returns the named attribute of the provided node, if present.
    fn node_attribute(&self, node: NodeId, name: &str) -> Result<Option<&AttrValue>, StgError>;

    /// Returns the attribute names carried by the provided node, in stored order.
    fn attribute_names(&self, node: NodeId) -> Result<Vec<&str>, StgError>;

    /// Returns the named attribute or a [`StgError::MissingAttribute`] error.
    fn require_attribute(&self, node: NodeId, name: &str) -> Result<&AttrValue, StgError> {
        match self.node_attribute(node, name)? {
            Some(value) => Ok(value),
            None => Err(StgError::MissingAttribute(
                ErrorInfo::new("missing-attribute", "node lacks the requested attribute")
                    .with_context("node", self.node_label(node)?.to_string())
                    .with_context("attribute", name),
            )),
        }
    }
}
