//! Skill availability metric over per-level quotient graphs.

use serde::{Deserialize, Serialize};
use stg_graph::QuotientGraph;

/// Weighted out-degree contribution of one hierarchy level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSkills {
    /// Level attribute the quotient graph was built from.
    pub attribute: String,
    /// Number of clusters at this level.
    pub clusters: usize,
    /// Sum over clusters of `out_degree * cluster_size`.
    pub weighted_out_degree: usize,
}

/// Sum over all supernodes of `out_degree * cluster_size`.
///
/// Each outbound quotient edge is one skill available from every member
/// state of the cluster.
pub fn weighted_out_degree(quotient: &QuotientGraph) -> usize {
    quotient
        .supernodes()
        .map(|node| node.out_degree * node.cluster_size)
        .sum()
}

/// Returns the per-level breakdown of the skill metric.
pub fn skills_per_level(quotients: &[QuotientGraph]) -> Vec<LevelSkills> {
    quotients
        .iter()
        .map(|quotient| LevelSkills {
            attribute: quotient.attribute().to_owned(),
            clusters: quotient.node_count(),
            weighted_out_degree: weighted_out_degree(quotient),
        })
        .collect()
}

/// Average number of skills available per state across the given levels.
///
/// Returns `0.0` for an empty state space.
pub fn available_skills(quotients: &[QuotientGraph], num_states: usize) -> f64 {
    if num_states == 0 {
        return 0.0;
    }
    let total: usize = quotients.iter().map(weighted_out_degree).sum();
    total as f64 / num_states as f64
}
