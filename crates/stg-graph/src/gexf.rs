//! Reader and writer for the directed subset of GEXF 1.2 used by STG files.

use std::collections::HashMap;
use std::fmt::Write as _;

use indexmap::IndexMap;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use stg_core::{AttrValue, ErrorInfo, StgError};

use crate::stg::{Attributes, StateTransitionGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AttrClass {
    Node,
    Edge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrKind {
    Integer,
    Float,
    Boolean,
    Text,
}

impl AttrKind {
    fn from_gexf(name: &str) -> Self {
        match name {
            "integer" | "long" | "short" | "byte" => AttrKind::Integer,
            "float" | "double" => AttrKind::Float,
            "boolean" => AttrKind::Boolean,
            _ => AttrKind::Text,
        }
    }

    fn parse(self, raw: &str) -> Option<AttrValue> {
        match self {
            AttrKind::Integer => raw.trim().parse::<i64>().ok().map(AttrValue::Int),
            AttrKind::Float => raw.trim().parse::<f64>().ok().map(AttrValue::Float),
            AttrKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(AttrValue::Bool(true)),
                "false" | "0" => Some(AttrValue::Bool(false)),
                _ => None,
            },
            AttrKind::Text => Some(AttrValue::Str(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
struct AttrDecl {
    title: String,
    kind: AttrKind,
    default: Option<String>,
}

#[derive(Debug)]
struct PendingNode {
    id: String,
    label: Option<String>,
    values: Attributes,
}

#[derive(Debug)]
struct PendingEdge {
    source: String,
    target: String,
    values: Attributes,
}

#[derive(Debug, Default)]
struct GexfParser {
    graph: StateTransitionGraph,
    declarations: HashMap<AttrClass, IndexMap<String, AttrDecl>>,
    attributes_class: Option<AttrClass>,
    declaring: Option<(AttrClass, String)>,
    in_default: bool,
    node: Option<PendingNode>,
    edge: Option<PendingEdge>,
    saw_graph: bool,
    depth: usize,
}

/// Parses a GEXF document into a [`StateTransitionGraph`].
pub fn graph_from_gexf(xml: &str) -> Result<StateTransitionGraph, StgError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut parser = GexfParser::default();
    loop {
        let event = reader.read_event().map_err(|err| {
            decode_error("gexf-xml", err.to_string())
                .with_context("position", reader.buffer_position())
        })?;
        match event {
            Event::Start(element) => {
                parser.depth += 1;
                parser.open(&element, false)?
            }
            Event::Empty(element) => parser.open(&element, true)?,
            Event::End(element) => {
                parser.depth = parser.depth.saturating_sub(1);
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                parser.close(&name)?;
            }
            Event::Text(text) => {
                if parser.in_default {
                    let value = text
                        .unescape()
                        .map_err(|err| decode_error("gexf-xml", err.to_string()))?;
                    parser.set_default(value.into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if parser.depth != 0 {
        return Err(decode_error("gexf-truncated", "document ended inside an open element")
            .with_context("open_elements", parser.depth));
    }
    if !parser.saw_graph {
        return Err(decode_error("gexf-missing-graph", "document has no <graph> element"));
    }
    Ok(parser.graph)
}

impl GexfParser {
    fn open(&mut self, element: &BytesStart<'_>, empty: bool) -> Result<(), StgError> {
        let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
        let attrs = xml_attributes(element)?;
        match name.as_str() {
            "graph" => {
                self.saw_graph = true;
                if let Some(kind) = attrs.get("defaultedgetype") {
                    if kind != "directed" {
                        return Err(decode_error(
                            "undirected-graph",
                            "only directed GEXF graphs are supported",
                        )
                        .with_context("defaultedgetype", kind));
                    }
                }
            }
            "attributes" => {
                let class = match attrs.get("class").map(String::as_str) {
                    Some("edge") => AttrClass::Edge,
                    _ => AttrClass::Node,
                };
                self.attributes_class = (!empty).then_some(class);
            }
            "attribute" => {
                let class = self.attributes_class.ok_or_else(|| {
                    decode_error("gexf-attribute", "<attribute> outside <attributes>")
                })?;
                let id = required(&attrs, "id", "attribute")?;
                let title = attrs.get("title").cloned().unwrap_or_else(|| id.clone());
                let kind = AttrKind::from_gexf(attrs.get("type").map_or("string", String::as_str));
                self.declarations.entry(class).or_default().insert(
                    id.clone(),
                    AttrDecl {
                        title,
                        kind,
                        default: None,
                    },
                );
                if !empty {
                    self.declaring = Some((class, id));
                }
            }
            "default" => self.in_default = !empty && self.declaring.is_some(),
            "node" => {
                let id = required(&attrs, "id", "node")?;
                self.node = Some(PendingNode {
                    id,
                    label: attrs.get("label").cloned(),
                    values: Attributes::new(),
                });
                if empty {
                    self.finish_node()?;
                }
            }
            "edge" => {
                let source = required(&attrs, "source", "edge")?;
                let target = required(&attrs, "target", "edge")?;
                let mut values = Attributes::new();
                if let Some(raw) = attrs.get("weight") {
                    let weight = AttrKind::Float.parse(raw).ok_or_else(|| {
                        decode_error("gexf-value", "edge weight is not a number")
                            .with_context("value", raw)
                    })?;
                    values.insert("weight".to_owned(), weight);
                }
                if let Some(kind) = attrs.get("type") {
                    if kind == "undirected" {
                        return Err(decode_error(
                            "undirected-graph",
                            "undirected edges are not supported",
                        )
                        .with_context("source", &source)
                        .with_context("target", &target));
                    }
                }
                self.edge = Some(PendingEdge {
                    source,
                    target,
                    values,
                });
                if empty {
                    self.finish_edge()?;
                }
            }
            "attvalue" => self.attvalue(&attrs)?,
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), StgError> {
        match name {
            "attributes" => self.attributes_class = None,
            "attribute" => self.declaring = None,
            "default" => self.in_default = false,
            "node" => self.finish_node()?,
            "edge" => self.finish_edge()?,
            _ => {}
        }
        Ok(())
    }

    fn set_default(&mut self, value: String) {
        if let Some((class, id)) = &self.declaring {
            if let Some(decl) = self
                .declarations
                .get_mut(class)
                .and_then(|decls| decls.get_mut(id))
            {
                decl.default = Some(value);
            }
        }
    }

    fn attvalue(&mut self, attrs: &HashMap<String, String>) -> Result<(), StgError> {
        let class = if self.edge.is_some() {
            AttrClass::Edge
        } else if self.node.is_some() {
            AttrClass::Node
        } else {
            return Err(decode_error(
                "gexf-attvalue",
                "<attvalue> outside of a node or edge",
            ));
        };
        let key = required(attrs, "for", "attvalue")?;
        let raw = required(attrs, "value", "attvalue")?;
        let decl = self
            .declarations
            .get(&class)
            .and_then(|decls| decls.get(&key))
            .ok_or_else(|| {
                decode_error("gexf-unknown-attribute", "attvalue references an undeclared attribute")
                    .with_context("for", &key)
            })?;
        let value = decl.kind.parse(&raw).ok_or_else(|| {
            decode_error("gexf-value", "attribute value does not match its declared type")
                .with_context("attribute", &decl.title)
                .with_context("value", &raw)
        })?;
        let title = decl.title.clone();
        let target = match class {
            AttrClass::Edge => self.edge.as_mut().map(|edge| &mut edge.values),
            AttrClass::Node => self.node.as_mut().map(|node| &mut node.values),
        };
        if let Some(values) = target {
            values.insert(title, value);
        }
        Ok(())
    }

    fn apply_defaults(&self, class: AttrClass, values: &mut Attributes) -> Result<(), StgError> {
        let Some(decls) = self.declarations.get(&class) else {
            return Ok(());
        };
        for decl in decls.values() {
            if values.contains_key(&decl.title) {
                continue;
            }
            if let Some(raw) = &decl.default {
                let value = decl.kind.parse(raw).ok_or_else(|| {
                    decode_error("gexf-value", "default value does not match its declared type")
                        .with_context("attribute", &decl.title)
                        .with_context("value", raw)
                })?;
                values.insert(decl.title.clone(), value);
            }
        }
        Ok(())
    }

    fn finish_node(&mut self) -> Result<(), StgError> {
        let Some(mut node) = self.node.take() else {
            return Ok(());
        };
        self.apply_defaults(AttrClass::Node, &mut node.values)?;
        if let Some(label) = node.label {
            node.values.insert("label".to_owned(), AttrValue::Str(label));
        }
        self.graph
            .add_node(AttrValue::Str(node.id.clone()), node.values)
            .map_err(|err| {
                decode_error("gexf-duplicate-node", err.info().message.clone())
                    .with_context("node", &node.id)
            })?;
        Ok(())
    }

    fn finish_edge(&mut self) -> Result<(), StgError> {
        let Some(mut edge) = self.edge.take() else {
            return Ok(());
        };
        self.apply_defaults(AttrClass::Edge, &mut edge.values)?;
        let endpoint = |label: &str| {
            self.graph.node_id(&AttrValue::from(label)).ok_or_else(|| {
                decode_error("gexf-unknown-node", "edge references an undeclared node")
                    .with_context("node", label)
            })
        };
        let source = endpoint(&edge.source)?;
        let target = endpoint(&edge.target)?;
        self.graph.add_edge(source, target)?;
        for (name, value) in edge.values {
            self.graph.set_edge_attribute(source, target, name, value)?;
        }
        Ok(())
    }
}

fn xml_attributes(element: &BytesStart<'_>) -> Result<HashMap<String, String>, StgError> {
    let mut attrs = HashMap::new();
    for attr in element.attributes() {
        let attr = attr.map_err(|err| decode_error("gexf-xml", err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| decode_error("gexf-xml", err.to_string()))?;
        attrs.insert(key, value.into_owned());
    }
    Ok(attrs)
}

fn required(
    attrs: &HashMap<String, String>,
    key: &str,
    element: &str,
) -> Result<String, StgError> {
    attrs.get(key).cloned().ok_or_else(|| {
        decode_error("gexf-missing-field", "element lacks a required attribute")
            .with_context("element", element)
            .with_context("field", key)
    })
}

fn decode_error(code: &str, message: impl Into<String>) -> StgError {
    StgError::Deserialization(ErrorInfo::new(code, message))
}

/// Serialises a graph into a GEXF 1.2 document.
///
/// Node labels become GEXF ids; a string `label` attribute is written as the
/// node label. Attribute types are inferred from the first value seen and
/// fall back to `string` when a name carries mixed types.
pub fn graph_to_gexf(graph: &StateTransitionGraph) -> Result<String, StgError> {
    let node_decls = declare(graph.nodes().map(|node| graph.attributes(node)), true)?;
    let edge_decls = declare(
        graph.edges().map(|edge| Ok(edge.attributes())),
        false,
    )?;

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<gexf xmlns=\"http://www.gexf.net/1.2draft\" version=\"1.2\">\n");
    out.push_str("  <graph defaultedgetype=\"directed\" mode=\"static\">\n");
    write_declarations(&mut out, "node", &node_decls);
    write_declarations(&mut out, "edge", &edge_decls);

    out.push_str("    <nodes>\n");
    for node in graph.nodes() {
        let id = graph.label(node)?.to_string();
        let attributes = graph.attributes(node)?;
        let _ = write!(out, "      <node id=\"{}\"", escape(&id));
        if let Some(AttrValue::Str(label)) = attributes.get("label") {
            let _ = write!(out, " label=\"{}\"", escape(label));
        }
        write_attvalues(&mut out, attributes, &node_decls, "node");
    }
    out.push_str("    </nodes>\n");

    out.push_str("    <edges>\n");
    for (index, edge) in graph.edges().enumerate() {
        let source = graph.label(edge.source())?.to_string();
        let target = graph.label(edge.target())?.to_string();
        let _ = write!(
            out,
            "      <edge id=\"{index}\" source=\"{}\" target=\"{}\"",
            escape(&source),
            escape(&target)
        );
        if let Some(AttrValue::Float(weight)) = edge.attributes().get("weight") {
            let _ = write!(out, " weight=\"{weight}\"");
        }
        write_attvalues(&mut out, edge.attributes(), &edge_decls, "edge");
    }
    out.push_str("    </edges>\n");
    out.push_str("  </graph>\n</gexf>\n");
    Ok(out)
}

fn declare<'a, I>(maps: I, is_node: bool) -> Result<IndexMap<String, &'static str>, StgError>
where
    I: Iterator<Item = Result<&'a Attributes, StgError>>,
{
    let mut decls: IndexMap<String, &'static str> = IndexMap::new();
    for attributes in maps {
        for (name, value) in attributes? {
            let reserved = if is_node {
                name == "label" && matches!(value, AttrValue::Str(_))
            } else {
                name == "weight" && matches!(value, AttrValue::Float(_))
            };
            if reserved {
                continue;
            }
            let kind = value.type_name();
            decls
                .entry(name.clone())
                .and_modify(|existing| {
                    if *existing != kind {
                        *existing = "string";
                    }
                })
                .or_insert(kind);
        }
    }
    Ok(decls)
}

fn write_declarations(out: &mut String, class: &str, decls: &IndexMap<String, &'static str>) {
    if decls.is_empty() {
        return;
    }
    let _ = writeln!(out, "    <attributes class=\"{class}\" mode=\"static\">");
    for (index, (title, kind)) in decls.iter().enumerate() {
        let _ = writeln!(
            out,
            "      <attribute id=\"{index}\" title=\"{}\" type=\"{kind}\" />",
            escape(title)
        );
    }
    out.push_str("    </attributes>\n");
}

fn write_attvalues(
    out: &mut String,
    attributes: &Attributes,
    decls: &IndexMap<String, &'static str>,
    element: &str,
) {
    let values: Vec<(usize, &AttrValue)> = attributes
        .iter()
        .filter_map(|(name, value)| decls.get_index_of(name).map(|index| (index, value)))
        .collect();
    if values.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push_str(">\n        <attvalues>\n");
    for (index, value) in values {
        let raw = value.to_string();
        let _ = writeln!(
            out,
            "          <attvalue for=\"{index}\" value=\"{}\" />",
            escape(&raw)
        );
    }
    let _ = writeln!(out, "        </attvalues>\n      </{element}>");
}
