//! Adapters between [`StateTransitionGraph`] and `petgraph` directed graphs.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use stg_core::{AttrValue, AttributedDigraph, ErrorInfo, NodeId, StgError};

use crate::stg::{Attributes, StateTransitionGraph};

/// Node weight used on the petgraph side of the adapter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateNode {
    /// Original label; `None` for graphs built without labels.
    pub name: Option<AttrValue>,
    /// Node attributes in stored order.
    pub attributes: Attributes,
}

/// Edge weight used on the petgraph side of the adapter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateEdgeData {
    /// Edge attributes in stored order.
    pub attributes: Attributes,
}

/// petgraph representation of a state-transition graph.
pub type PetStg = DiGraph<StateNode, StateEdgeData>;

/// Copies a graph into petgraph form, keeping labels as node names.
///
/// Node indices follow the insertion order of `graph`.
pub fn to_petgraph(graph: &StateTransitionGraph) -> Result<PetStg, StgError> {
    let mut pet = PetStg::with_capacity(graph.node_count(), graph.edge_count());
    for node in graph.nodes() {
        pet.add_node(StateNode {
            name: Some(graph.label(node)?.clone()),
            attributes: graph.attributes(node)?.clone(),
        });
    }
    for edge in graph.edges() {
        pet.add_edge(
            NodeIndex::new(edge.source().index()),
            NodeIndex::new(edge.target().index()),
            StateEdgeData {
                attributes: edge.attributes().clone(),
            },
        );
    }
    Ok(pet)
}

/// Rebuilds a [`StateTransitionGraph`] from petgraph form.
///
/// Nodes are relabelled by [`StateNode::name`] only when every node carries
/// one; otherwise each node is labelled by its integer index. Parallel edges
/// collapse, with later attributes overwriting earlier ones.
pub fn from_petgraph(pet: &PetStg) -> Result<StateTransitionGraph, StgError> {
    let labels = petgraph_labels(pet);
    let mut graph = StateTransitionGraph::new();
    for (index, label) in pet.node_indices().zip(labels) {
        graph
            .add_node(label, pet[index].attributes.clone())
            .map_err(|err| err.with_context("petgraph_index", index.index()))?;
    }
    for edge in pet.edge_references() {
        let source = NodeId::from(edge.source().index());
        let target = NodeId::from(edge.target().index());
        graph.add_edge(source, target)?;
        for (name, value) in &edge.weight().attributes {
            graph.set_edge_attribute(source, target, name.clone(), value.clone())?;
        }
    }
    Ok(graph)
}

/// Borrowed [`AttributedDigraph`] view over a [`PetStg`], so petgraph
/// graphs can be aggregated without conversion.
#[derive(Debug, Clone)]
pub struct PetStgView<'a> {
    graph: &'a PetStg,
    labels: Vec<AttrValue>,
}

impl<'a> PetStgView<'a> {
    /// Wraps `graph`, labelling nodes the same way as [`from_petgraph`].
    pub fn new(graph: &'a PetStg) -> Self {
        Self {
            graph,
            labels: petgraph_labels(graph),
        }
    }

    fn weight(&self, node: NodeId) -> Result<&'a StateNode, StgError> {
        self.graph
            .node_weight(NodeIndex::new(node.index()))
            .ok_or_else(|| unknown(node))
    }
}

impl AttributedDigraph for PetStgView<'_> {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn node_ids(&self) -> Box<dyn ExactSizeIterator<Item = NodeId> + '_> {
        Box::new((0..self.graph.node_count()).map(NodeId::from))
    }

    fn edge_pairs(&self) -> Box<dyn Iterator<Item = (NodeId, NodeId)> + '_> {
        Box::new(self.graph.edge_references().map(|edge| {
            (
                NodeId::from(edge.source().index()),
                NodeId::from(edge.target().index()),
            )
        }))
    }

    fn node_label(&self, node: NodeId) -> Result<&AttrValue, StgError> {
        self.labels.get(node.index()).ok_or_else(|| unknown(node))
    }

    fn node_attribute(&self, node: NodeId, name: &str) -> Result<Option<&AttrValue>, StgError> {
        Ok(self.weight(node)?.attributes.get(name))
    }

    fn attribute_names(&self, node: NodeId) -> Result<Vec<&str>, StgError> {
        Ok(self
            .weight(node)?
            .attributes
            .keys()
            .map(String::as_str)
            .collect())
    }
}

fn petgraph_labels(pet: &PetStg) -> Vec<AttrValue> {
    let named = pet.node_indices().all(|index| pet[index].name.is_some());
    pet.node_indices()
        .map(|index| match (&pet[index].name, named) {
            (Some(name), true) => name.clone(),
            _ => AttrValue::Int(index.index() as i64),
        })
        .collect()
}

fn unknown(node: NodeId) -> StgError {
    StgError::Graph(
        ErrorInfo::new("unknown-node", "petgraph node does not exist")
            .with_context("node", node.as_raw().to_string()),
    )
}
