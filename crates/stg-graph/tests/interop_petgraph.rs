use stg_core::AttrValue;
use stg_graph::{from_petgraph, hierarchical_chain, to_petgraph, PetStg, StateNode};

#[test]
fn named_petgraph_nodes_keep_their_labels() {
    let graph = hierarchical_chain(6, 3, 1).unwrap();
    let pet = to_petgraph(&graph).unwrap();
    assert_eq!(pet.node_count(), 6);
    assert_eq!(pet.edge_count(), 10);

    let restored = from_petgraph(&pet).unwrap();
    for node in graph.nodes() {
        let label = graph.label(node).unwrap();
        let twin = restored.node_id(label).unwrap();
        assert_eq!(restored.attributes(twin).unwrap(), graph.attributes(node).unwrap());
        assert_eq!(restored.successors(twin).unwrap(), graph.successors(node).unwrap());
    }
}

#[test]
fn partially_named_graphs_fall_back_to_indices() {
    let mut pet = PetStg::new();
    let a = pet.add_node(StateNode {
        name: Some(AttrValue::from("a")),
        ..StateNode::default()
    });
    let b = pet.add_node(StateNode::default());
    pet.add_edge(a, b, Default::default());
    pet.add_edge(a, b, Default::default());

    let graph = from_petgraph(&pet).unwrap();
    assert!(graph.node_id(&AttrValue::from("a")).is_none());
    let first = graph.node_id(&AttrValue::Int(0)).unwrap();
    let second = graph.node_id(&AttrValue::Int(1)).unwrap();
    assert!(graph.has_edge(first, second));
    assert_eq!(graph.edge_count(), 1);
}
