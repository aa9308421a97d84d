#![deny(missing_docs)]

//! In-memory state-transition graphs, their file formats, and quotient-graph
//! aggregation keyed by node attributes.

pub mod aggregate;
mod generators;
mod gexf;
pub mod interop;
mod neighbours;
mod quotient;
mod serialization;
mod stg;

pub use aggregate::{aggregate_by_attribute, aggregate_levels};
pub use generators::hierarchical_chain;
pub use gexf::{graph_from_gexf, graph_to_gexf};
pub use interop::{from_petgraph, to_petgraph, PetStg, PetStgView, StateEdgeData, StateNode};
pub use neighbours::all_neighbours;
pub use quotient::{Directedness, QuotientGraph, Supernode};
pub use serialization::{
    graph_from_json, graph_to_json, read_graph_file, write_graph_file,
};
pub use stg::{Attributes, StateEdge, StateTransitionGraph};
