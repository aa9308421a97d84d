use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use stg_core::{AttrValue, ErrorInfo, StgError};

use crate::gexf::{graph_from_gexf, graph_to_gexf};
use crate::stg::{Attributes, StateTransitionGraph};

/// Serializes the graph to a JSON string.
pub fn graph_to_json(graph: &StateTransitionGraph) -> Result<String, StgError> {
    let serializable = SerializableGraph::from_graph(graph)?;
    serde_json::to_string_pretty(&serializable)
        .map_err(|err| StgError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores a graph from a JSON string.
pub fn graph_from_json(json: &str) -> Result<StateTransitionGraph, StgError> {
    let serializable: SerializableGraph = serde_json::from_str(json).map_err(|err| {
        StgError::Deserialization(ErrorInfo::new("deserialize-json", err.to_string()))
    })?;
    serializable.into_graph()
}

/// Reads a graph file, choosing the decoder from the file extension.
pub fn read_graph_file(path: &Path) -> Result<StateTransitionGraph, StgError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let decode: fn(&str) -> Result<StateTransitionGraph, StgError> = match extension.as_str() {
        "gexf" => graph_from_gexf,
        "json" => graph_from_json,
        _ => {
            return Err(StgError::Deserialization(
                ErrorInfo::new("unsupported-format", "no decoder for this graph file extension")
                    .with_context("path", path.display().to_string())
                    .with_hint("use .gexf or .json graph files"),
            ))
        }
    };
    let contents = fs::read_to_string(path).map_err(|err| StgError::io("read-graph", &err, path))?;
    decode(&contents).map_err(|err| err.with_context("path", path.display()))
}

/// Writes a graph file, choosing the encoder from the file extension.
pub fn write_graph_file(path: &Path, graph: &StateTransitionGraph) -> Result<(), StgError> {
    let contents = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => graph_to_json(graph)?,
        _ => graph_to_gexf(graph)?,
    };
    fs::write(path, contents).map_err(|err| StgError::io("write-graph", &err, path))
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableGraph {
    nodes: Vec<SerializableNode>,
    edges: Vec<SerializableEdge>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableNode {
    id: AttrValue,
    #[serde(default)]
    attributes: Attributes,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableEdge {
    source: AttrValue,
    target: AttrValue,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    attributes: Attributes,
}

impl SerializableGraph {
    fn from_graph(graph: &StateTransitionGraph) -> Result<Self, StgError> {
        let nodes = graph
            .nodes()
            .map(|node| {
                Ok(SerializableNode {
                    id: graph.label(node)?.clone(),
                    attributes: graph.attributes(node)?.clone(),
                })
            })
            .collect::<Result<Vec<_>, StgError>>()?;
        let edges = graph
            .edges()
            .map(|edge| {
                Ok(SerializableEdge {
                    source: graph.label(edge.source())?.clone(),
                    target: graph.label(edge.target())?.clone(),
                    attributes: edge.attributes().clone(),
                })
            })
            .collect::<Result<Vec<_>, StgError>>()?;
        Ok(Self { nodes, edges })
    }

    fn into_graph(self) -> Result<StateTransitionGraph, StgError> {
        let mut graph = StateTransitionGraph::new();
        for node in self.nodes {
            graph.add_node(node.id, node.attributes)?;
        }
        for edge in self.edges {
            let source = graph.require_node_id(&edge.source)?;
            let target = graph.require_node_id(&edge.target)?;
            graph.add_edge(source, target)?;
            for (name, value) in edge.attributes {
                graph.set_edge_attribute(source, target, name, value)?;
            }
        }
        Ok(graph)
    }
}
