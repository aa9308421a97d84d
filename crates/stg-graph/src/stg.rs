use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use stg_core::{AttrValue, AttributedDigraph, ErrorInfo, NodeId, StgError};

/// Ordered attribute map attached to nodes and edges.
pub type Attributes = IndexMap<String, AttrValue>;

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    label: AttrValue,
    attributes: Attributes,
    successors: IndexSet<NodeId>,
    predecessors: IndexSet<NodeId>,
}

impl NodeRecord {
    fn new(label: AttrValue, attributes: Attributes) -> Self {
        Self {
            label,
            attributes,
            successors: IndexSet::new(),
            predecessors: IndexSet::new(),
        }
    }
}

/// Directed transition between two states.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEdge {
    source: NodeId,
    target: NodeId,
    attributes: Attributes,
}

impl StateEdge {
    /// Returns the source state of the transition.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the target state of the transition.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the attributes attached to the transition.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns whether the transition starts and ends at the same state.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Directed state-transition graph with labelled, attributed nodes.
///
/// At most one edge exists per ordered pair of states; self-loops are
/// allowed. Nodes and edges keep their insertion order.
#[derive(Debug, Clone, Default)]
pub struct StateTransitionGraph {
    nodes: Vec<NodeRecord>,
    edges: Vec<StateEdge>,
    labels: HashMap<AttrValue, NodeId>,
    edge_lookup: HashMap<(NodeId, NodeId), usize>,
}

impl StateTransitionGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a state with the given label and attributes.
    pub fn add_node<L, I, K>(&mut self, label: L, attributes: I) -> Result<NodeId, StgError>
    where
        L: Into<AttrValue>,
        I: IntoIterator<Item = (K, AttrValue)>,
        K: Into<String>,
    {
        let label = label.into();
        if self.labels.contains_key(&label) {
            return Err(graph_error("duplicate-node", "node label already exists")
                .with_context("node", &label));
        }
        let attributes: Attributes = attributes
            .into_iter()
            .map(|(key, value)| (key.into(), value))
            .collect();
        let id = NodeId::from(self.nodes.len());
        self.labels.insert(label.clone(), id);
        self.nodes.push(NodeRecord::new(label, attributes));
        Ok(id)
    }

    /// Adds a transition, returning `false` when it already existed.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<bool, StgError> {
        self.node(source)?;
        self.node(target)?;
        if self.edge_lookup.contains_key(&(source, target)) {
            return Ok(false);
        }
        self.edge_lookup.insert((source, target), self.edges.len());
        self.edges.push(StateEdge {
            source,
            target,
            attributes: Attributes::new(),
        });
        self.node_mut(source)?.successors.insert(target);
        self.node_mut(target)?.predecessors.insert(source);
        Ok(true)
    }

    /// Adds a transition between two labelled states.
    pub fn add_edge_by_label(
        &mut self,
        source: &AttrValue,
        target: &AttrValue,
    ) -> Result<bool, StgError> {
        let source = self.require_node_id(source)?;
        let target = self.require_node_id(target)?;
        self.add_edge(source, target)
    }

    /// Sets (or replaces) an attribute on an existing node.
    pub fn set_node_attribute(
        &mut self,
        node: NodeId,
        name: impl Into<String>,
        value: AttrValue,
    ) -> Result<(), StgError> {
        self.node_mut(node)?.attributes.insert(name.into(), value);
        Ok(())
    }

    /// Removes an attribute from a node, preserving the order of the rest.
    pub fn remove_node_attribute(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<AttrValue>, StgError> {
        Ok(self.node_mut(node)?.attributes.shift_remove(name))
    }

    /// Sets (or replaces) an attribute on an existing transition.
    pub fn set_edge_attribute(
        &mut self,
        source: NodeId,
        target: NodeId,
        name: impl Into<String>,
        value: AttrValue,
    ) -> Result<(), StgError> {
        let index = self.edge_lookup.get(&(source, target)).copied().ok_or_else(|| {
            graph_error("unknown-edge", "edge does not exist")
                .with_context("source", source.as_raw())
                .with_context("target", target.as_raw())
        })?;
        self.edges[index].attributes.insert(name.into(), value);
        Ok(())
    }

    /// Looks up a node by label.
    pub fn node_id(&self, label: &AttrValue) -> Option<NodeId> {
        self.labels.get(label).copied()
    }

    /// Looks up a node by label, failing when it does not exist.
    pub fn require_node_id(&self, label: &AttrValue) -> Result<NodeId, StgError> {
        self.node_id(label).ok_or_else(|| {
            graph_error("unknown-node", "node does not exist").with_context("node", label)
        })
    }

    /// Returns the label of a node.
    pub fn label(&self, node: NodeId) -> Result<&AttrValue, StgError> {
        Ok(&self.node(node)?.label)
    }

    /// Returns every attribute of a node.
    pub fn attributes(&self, node: NodeId) -> Result<&Attributes, StgError> {
        Ok(&self.node(node)?.attributes)
    }

    /// Returns a single attribute of a node, if present.
    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<&AttrValue>, StgError> {
        Ok(self.node(node)?.attributes.get(name))
    }

    /// Returns the direct successors of a node in insertion order.
    pub fn successors(&self, node: NodeId) -> Result<Vec<NodeId>, StgError> {
        Ok(self.node(node)?.successors.iter().copied().collect())
    }

    /// Returns the direct predecessors of a node in insertion order.
    pub fn predecessors(&self, node: NodeId) -> Result<Vec<NodeId>, StgError> {
        Ok(self.node(node)?.predecessors.iter().copied().collect())
    }

    /// Returns the outbound degree of a node.
    pub fn out_degree(&self, node: NodeId) -> Result<usize, StgError> {
        Ok(self.node(node)?.successors.len())
    }

    /// Returns the inbound degree of a node.
    pub fn in_degree(&self, node: NodeId) -> Result<usize, StgError> {
        Ok(self.node(node)?.predecessors.len())
    }

    /// Returns whether a transition from `source` to `target` exists.
    pub fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edge_lookup.contains_key(&(source, target))
    }

    /// Returns all node identifiers in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::from)
    }

    /// Returns all transitions in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &StateEdge> + '_ {
        self.edges.iter()
    }

    /// Returns the number of states.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of transitions.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no states.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&NodeRecord, StgError> {
        self.nodes.get(id.index()).ok_or_else(|| {
            graph_error("unknown-node", "node does not exist").with_context("node", id.as_raw())
        })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, StgError> {
        self.nodes.get_mut(id.index()).ok_or_else(|| {
            graph_error("unknown-node", "node does not exist").with_context("node", id.as_raw())
        })
    }
}

impl AttributedDigraph for StateTransitionGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn node_ids(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_> {
        Box::new(self.nodes())
    }

    fn edge_pairs(&self) -> Box<dyn Iterator<Item = (NodeId, NodeId)> + '_> {
        Box::new(self.edges.iter().map(|edge| (edge.source, edge.target)))
    }

    fn node_label(&self, node: NodeId) -> Result<&AttrValue, StgError> {
        self.label(node)
    }

    fn node_attribute(&self, node: NodeId, name: &str) -> Result<Option<&AttrValue>, StgError> {
        self.attribute(node, name)
    }

    fn attribute_names(&self, node: NodeId) -> Result<Vec<&str>, StgError> {
        Ok(self
            .node(node)?
            .attributes
            .keys()
            .map(String::as_str)
            .collect())
    }
}

pub(crate) fn graph_error(code: impl Into<String>, message: impl Into<String>) -> StgError {
    StgError::Graph(ErrorInfo::new(code, message))
}
