use stg_core::{AttrValue, ErrorInfo, StgError};

use crate::stg::StateTransitionGraph;

/// Builds a chain of `states` states with transitions in both directions and
/// nested block clusters.
///
/// Level `cluster-0` places every state in its own cluster; level
/// `cluster-k` groups consecutive runs of `branching^k` states. Levels are
/// stored finest first, `cluster-0` through `cluster-{levels}`.
pub fn hierarchical_chain(
    states: usize,
    branching: usize,
    levels: usize,
) -> Result<StateTransitionGraph, StgError> {
    if branching < 2 {
        return Err(StgError::Graph(
            ErrorInfo::new("invalid-branching", "branching factor must be at least two")
                .with_context("branching", branching.to_string()),
        ));
    }
    let mut graph = StateTransitionGraph::new();
    let mut previous = None;
    for state in 0..states {
        let mut block = 1usize;
        let mut attributes = Vec::with_capacity(levels + 1);
        for level in 0..=levels {
            attributes.push((
                format!("cluster-{level}"),
                AttrValue::Int((state / block) as i64),
            ));
            block = block.saturating_mul(branching);
        }
        let node = graph.add_node(format!("s{state}"), attributes)?;
        if let Some(prev) = previous {
            graph.add_edge(prev, node)?;
            graph.add_edge(node, prev)?;
        }
        previous = Some(node);
    }
    Ok(graph)
}
