//! Discovery of hierarchy-level attributes on state-transition graphs.

use stg_core::{AttributedDigraph, ErrorInfo, StgError};

use crate::config::SchemaCheck;

/// Prefix shared by every hierarchy-level attribute.
pub const LEVEL_PREFIX: &str = "cluster-";

/// Returns the hierarchy-level attribute names of `graph`, in stored order.
///
/// Names are read from the first node. In [`SchemaCheck::Strict`] mode every
/// other node must carry the same names in the same order.
pub fn discover_levels<G>(graph: &G, check: SchemaCheck) -> Result<Vec<String>, StgError>
where
    G: AttributedDigraph + ?Sized,
{
    let mut nodes = graph.node_ids();
    let Some(representative) = nodes.next() else {
        return Ok(Vec::new());
    };
    let levels = level_names(graph, representative)?;
    if check == SchemaCheck::Strict {
        for node in nodes {
            let names = level_names(graph, node)?;
            if names != levels {
                return Err(StgError::Graph(
                    ErrorInfo::new(
                        "inconsistent-levels",
                        "node hierarchy levels differ from the first node",
                    )
                    .with_context("node", graph.node_label(node)?.to_string())
                    .with_context("expected", levels.join(","))
                    .with_context("found", names.join(",")),
                ));
            }
        }
    }
    Ok(levels)
}

fn level_names<G>(graph: &G, node: stg_core::NodeId) -> Result<Vec<String>, StgError>
where
    G: AttributedDigraph + ?Sized,
{
    Ok(graph
        .attribute_names(node)?
        .into_iter()
        .filter(|name| name.starts_with(LEVEL_PREFIX))
        .map(str::to_owned)
        .collect())
}
