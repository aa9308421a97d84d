//! Quotient graph construction keyed by a node attribute.

use std::collections::HashMap;

use stg_core::{AttributedDigraph, ErrorInfo, StgError};
use tracing::debug;

use crate::quotient::{Directedness, QuotientGraph};

/// Collapses `graph` into the quotient graph induced by `attribute_name`.
///
/// Every node must carry the attribute; the first node without it aborts
/// with [`StgError::MissingAttribute`]. Edges between states that share a
/// value are dropped, and repeated cluster pairs collapse into one edge.
pub fn aggregate_by_attribute<G>(
    graph: &G,
    attribute_name: &str,
    directedness: Directedness,
) -> Result<QuotientGraph, StgError>
where
    G: AttributedDigraph + ?Sized,
{
    let mut quotient = QuotientGraph::new(attribute_name);
    let mut node_to_supernode = HashMap::with_capacity(graph.node_count());
    let mut cluster_sizes: Vec<usize> = Vec::new();

    for node in graph.node_ids() {
        let value = graph.require_attribute(node, attribute_name)?;
        let supernode = quotient.ensure_supernode(value);
        if supernode == cluster_sizes.len() {
            cluster_sizes.push(0);
        }
        cluster_sizes[supernode] += 1;
        node_to_supernode.insert(node, supernode);
    }

    for (supernode, size) in cluster_sizes.iter().enumerate() {
        quotient.set_cluster_size(supernode, *size);
    }

    for (source, target) in graph.edge_pairs() {
        let (Some(super_source), Some(super_target)) = (
            node_to_supernode.get(&source),
            node_to_supernode.get(&target),
        ) else {
            return Err(StgError::Graph(
                ErrorInfo::new("unknown-node", "edge references an unknown node")
                    .with_context("source", source.as_raw().to_string())
                    .with_context("target", target.as_raw().to_string()),
            ));
        };
        quotient.insert_edge(*super_source, *super_target);
    }

    debug!(
        attribute = attribute_name,
        supernodes = quotient.node_count(),
        edges = quotient.edge_count(),
        "aggregated graph"
    );

    Ok(match directedness {
        Directedness::Directed => quotient,
        Directedness::Undirected => quotient.into_undirected(),
    })
}

/// Builds one quotient graph per attribute name, in the order given.
pub fn aggregate_levels<G, S>(
    graph: &G,
    attribute_names: &[S],
    directedness: Directedness,
) -> Result<Vec<QuotientGraph>, StgError>
where
    G: AttributedDigraph + ?Sized,
    S: AsRef<str>,
{
    attribute_names
        .iter()
        .map(|name| aggregate_by_attribute(graph, name.as_ref(), directedness))
        .collect()
}
