use indexmap::IndexSet;
use stg_core::{NodeId, StgError};

use crate::stg::StateTransitionGraph;

/// Returns every node adjacent to `node` in either direction.
///
/// Successors come first, then predecessors not already listed.
pub fn all_neighbours(graph: &StateTransitionGraph, node: NodeId) -> Result<Vec<NodeId>, StgError> {
    let mut neighbours: IndexSet<NodeId> = graph.successors(node)?.into_iter().collect();
    neighbours.extend(graph.predecessors(node)?);
    Ok(neighbours.into_iter().collect())
}
