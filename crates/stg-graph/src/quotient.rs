use std::collections::BTreeSet;

use indexmap::IndexMap;
use stg_core::AttrValue;

/// Whether a quotient graph keeps edge direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directedness {
    /// Keep `(A, B)` and `(B, A)` as distinct edges.
    #[default]
    Directed,
    /// Merge opposite-direction edges into a single undirected edge.
    Undirected,
}

#[derive(Debug, Clone)]
pub(crate) struct SupernodeRecord {
    value: AttrValue,
    cluster_size: usize,
    out_edges: BTreeSet<usize>,
    in_edges: BTreeSet<usize>,
}

/// Read-only view of a single quotient node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Supernode<'a> {
    /// Attribute value shared by every member state.
    pub value: &'a AttrValue,
    /// Number of original states mapped onto this node.
    pub cluster_size: usize,
    /// Outbound degree (total degree for undirected graphs).
    pub out_degree: usize,
}

/// Coarsened graph whose nodes are the distinct values of one node attribute.
///
/// Nodes keep first-seen order. Edges are unweighted and never self-loops.
/// For undirected graphs each edge is stored once under both endpoints'
/// adjacency, so `out_degree` reports the number of distinct neighbours.
#[derive(Debug, Clone)]
pub struct QuotientGraph {
    attribute: String,
    directedness: Directedness,
    supernodes: Vec<SupernodeRecord>,
    lookup: IndexMap<AttrValue, usize>,
    edge_count: usize,
}

impl QuotientGraph {
    pub(crate) fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_owned(),
            directedness: Directedness::Directed,
            supernodes: Vec::new(),
            lookup: IndexMap::new(),
            edge_count: 0,
        }
    }

    /// Returns the supernode index for a value, creating it with size zero.
    pub(crate) fn ensure_supernode(&mut self, value: &AttrValue) -> usize {
        if let Some(index) = self.lookup.get(value) {
            return *index;
        }
        let index = self.supernodes.len();
        self.supernodes.push(SupernodeRecord {
            value: value.clone(),
            cluster_size: 0,
            out_edges: BTreeSet::new(),
            in_edges: BTreeSet::new(),
        });
        self.lookup.insert(value.clone(), index);
        index
    }

    pub(crate) fn set_cluster_size(&mut self, index: usize, size: usize) {
        if let Some(record) = self.supernodes.get_mut(index) {
            record.cluster_size = size;
        }
    }

    /// Inserts a directed edge between two distinct supernodes; repeats are no-ops.
    pub(crate) fn insert_edge(&mut self, source: usize, target: usize) {
        if source == target {
            return;
        }
        if self.supernodes[source].out_edges.insert(target) {
            self.supernodes[target].in_edges.insert(source);
            self.edge_count += 1;
        }
    }

    /// Merges opposite-direction edges, turning adjacency into neighbour sets.
    pub(crate) fn into_undirected(mut self) -> Self {
        let pairs: Vec<(usize, usize)> = self
            .supernodes
            .iter()
            .enumerate()
            .flat_map(|(source, record)| {
                record
                    .out_edges
                    .iter()
                    .map(move |target| (source.min(*target), source.max(*target)))
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        for record in &mut self.supernodes {
            record.out_edges.clear();
            record.in_edges.clear();
        }
        for (a, b) in &pairs {
            self.supernodes[*a].out_edges.insert(*b);
            self.supernodes[*a].in_edges.insert(*b);
            self.supernodes[*b].out_edges.insert(*a);
            self.supernodes[*b].in_edges.insert(*a);
        }
        self.edge_count = pairs.len();
        self.directedness = Directedness::Undirected;
        self
    }

    /// Returns the attribute the graph was aggregated on.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns whether edges keep their direction.
    pub fn is_directed(&self) -> bool {
        self.directedness == Directedness::Directed
    }

    /// Returns the directedness of the graph.
    pub fn directedness(&self) -> Directedness {
        self.directedness
    }

    /// Returns the number of supernodes.
    pub fn node_count(&self) -> usize {
        self.supernodes.len()
    }

    /// Returns the number of edges (each undirected edge counts once).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns whether a supernode exists for the value.
    pub fn contains(&self, value: &AttrValue) -> bool {
        self.lookup.contains_key(value)
    }

    /// Returns the cluster size of the supernode for `value`.
    pub fn cluster_size(&self, value: &AttrValue) -> Option<usize> {
        self.record(value).map(|record| record.cluster_size)
    }

    /// Returns the outbound degree of the supernode (degree when undirected).
    pub fn out_degree(&self, value: &AttrValue) -> Option<usize> {
        self.record(value).map(|record| record.out_edges.len())
    }

    /// Returns the inbound degree of the supernode (degree when undirected).
    pub fn in_degree(&self, value: &AttrValue) -> Option<usize> {
        self.record(value).map(|record| record.in_edges.len())
    }

    /// Returns the number of distinct neighbours of the supernode.
    pub fn degree(&self, value: &AttrValue) -> Option<usize> {
        self.record(value).map(|record| match self.directedness {
            Directedness::Directed => record.out_edges.union(&record.in_edges).count(),
            Directedness::Undirected => record.out_edges.len(),
        })
    }

    /// Returns the values reachable through a single outbound edge.
    pub fn successors(&self, value: &AttrValue) -> Option<Vec<&AttrValue>> {
        self.record(value).map(|record| {
            record
                .out_edges
                .iter()
                .map(|index| &self.supernodes[*index].value)
                .collect()
        })
    }

    /// Returns whether an edge `a -> b` exists (`{a, b}` when undirected).
    pub fn has_edge(&self, a: &AttrValue, b: &AttrValue) -> bool {
        match (self.lookup.get(a), self.lookup.get(b)) {
            (Some(source), Some(target)) => self.supernodes[*source].out_edges.contains(target),
            _ => false,
        }
    }

    /// Returns every supernode in first-seen order.
    pub fn supernodes(&self) -> impl ExactSizeIterator<Item = Supernode<'_>> + '_ {
        self.supernodes.iter().map(|record| Supernode {
            value: &record.value,
            cluster_size: record.cluster_size,
            out_degree: record.out_edges.len(),
        })
    }

    /// Returns every edge; undirected edges are yielded once, lower index first.
    pub fn edges(&self) -> Vec<(&AttrValue, &AttrValue)> {
        let mut edges = Vec::with_capacity(self.edge_count);
        for (source, record) in self.supernodes.iter().enumerate() {
            for target in &record.out_edges {
                if self.directedness == Directedness::Undirected && *target < source {
                    continue;
                }
                edges.push((&record.value, &self.supernodes[*target].value));
            }
        }
        edges
    }

    /// Returns the sum of all cluster sizes.
    pub fn total_size(&self) -> usize {
        self.supernodes.iter().map(|record| record.cluster_size).sum()
    }

    fn record(&self, value: &AttrValue) -> Option<&SupernodeRecord> {
        self.lookup
            .get(value)
            .and_then(|index| self.supernodes.get(*index))
    }
}
