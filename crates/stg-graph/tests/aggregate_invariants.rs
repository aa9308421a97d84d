use std::collections::BTreeSet;

use proptest::prelude::*;
use stg_core::{AttrValue, StgError};
use stg_graph::{
    aggregate_by_attribute, aggregate_levels, hierarchical_chain, to_petgraph, Directedness,
    PetStgView, StateTransitionGraph,
};

fn build(assignment: &[i64], edges: &[(usize, usize)]) -> StateTransitionGraph {
    let mut graph = StateTransitionGraph::new();
    for (index, cluster) in assignment.iter().enumerate() {
        graph
            .add_node(
                format!("s{index}"),
                [("cluster-0", AttrValue::Int(*cluster))],
            )
            .unwrap();
    }
    let ids: Vec<_> = graph.nodes().collect();
    for (source, target) in edges {
        graph.add_edge(ids[*source], ids[*target]).unwrap();
    }
    graph
}

fn four_state_example() -> StateTransitionGraph {
    build(&[0, 0, 1, 1], &[(0, 1), (1, 2), (2, 3)])
}

fn arb_graph() -> impl Strategy<Value = (Vec<i64>, Vec<(usize, usize)>)> {
    (1usize..24, 1i64..6).prop_flat_map(|(nodes, clusters)| {
        (
            prop::collection::vec(0..clusters, nodes),
            prop::collection::vec((0..nodes, 0..nodes), 0..60),
        )
    })
}

proptest! {
    #[test]
    fn cluster_sizes_sum_to_node_count((assignment, edges) in arb_graph()) {
        let graph = build(&assignment, &edges);
        let quotient = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
        prop_assert_eq!(quotient.total_size(), graph.node_count());
    }

    #[test]
    fn quotient_never_has_self_loops((assignment, edges) in arb_graph()) {
        let graph = build(&assignment, &edges);
        for directedness in [Directedness::Directed, Directedness::Undirected] {
            let quotient = aggregate_by_attribute(&graph, "cluster-0", directedness).unwrap();
            for (a, b) in quotient.edges() {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn supernodes_are_exactly_the_attribute_image((assignment, edges) in arb_graph()) {
        let graph = build(&assignment, &edges);
        let quotient = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
        let expected: BTreeSet<AttrValue> = assignment.iter().map(|c| AttrValue::Int(*c)).collect();
        let actual: BTreeSet<AttrValue> = quotient.supernodes().map(|node| node.value.clone()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert_eq!(quotient.node_count(), quotient.supernodes().len());
    }

    #[test]
    fn undirected_edges_mirror_directed_pairs((assignment, edges) in arb_graph()) {
        let graph = build(&assignment, &edges);
        let directed = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
        let undirected = aggregate_by_attribute(&graph, "cluster-0", Directedness::Undirected).unwrap();
        prop_assert!(!undirected.is_directed());
        let values: Vec<AttrValue> = directed.supernodes().map(|node| node.value.clone()).collect();
        for a in &values {
            for b in &values {
                let expected = directed.has_edge(a, b) || directed.has_edge(b, a);
                prop_assert_eq!(undirected.has_edge(a, b), expected);
                prop_assert_eq!(undirected.has_edge(a, b), undirected.has_edge(b, a));
            }
        }
    }
}

#[test]
fn four_state_example_matches_hand_computation() {
    let graph = four_state_example();
    let quotient = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
    let zero = AttrValue::Int(0);
    let one = AttrValue::Int(1);
    assert_eq!(quotient.node_count(), 2);
    assert_eq!(quotient.cluster_size(&zero), Some(2));
    assert_eq!(quotient.cluster_size(&one), Some(2));
    assert_eq!(quotient.edge_count(), 1);
    assert!(quotient.has_edge(&zero, &one));
    assert!(!quotient.has_edge(&one, &zero));
    assert_eq!(quotient.out_degree(&zero), Some(1));
    assert_eq!(quotient.out_degree(&one), Some(0));
    assert_eq!(quotient.attribute(), "cluster-0");
}

#[test]
fn repeated_cluster_pairs_collapse_to_one_edge() {
    // s0 and s1 share cluster 0; both lead into cluster 1.
    let graph = build(&[0, 0, 1], &[(0, 2), (1, 2), (2, 0), (2, 1)]);
    let quotient = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
    assert_eq!(quotient.edge_count(), 2);
    assert_eq!(quotient.out_degree(&AttrValue::Int(0)), Some(1));
    assert_eq!(quotient.out_degree(&AttrValue::Int(1)), Some(1));

    let undirected =
        aggregate_by_attribute(&graph, "cluster-0", Directedness::Undirected).unwrap();
    assert_eq!(undirected.edge_count(), 1);
    assert_eq!(undirected.edges().len(), 1);
    assert_eq!(undirected.degree(&AttrValue::Int(0)), Some(1));
}

#[test]
fn input_self_loops_are_discarded() {
    let graph = build(&[0, 1], &[(0, 0), (1, 1), (0, 1)]);
    let quotient = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
    assert_eq!(quotient.edges(), vec![(&AttrValue::Int(0), &AttrValue::Int(1))]);
}

#[test]
fn supernodes_keep_first_seen_order() {
    let graph = build(&[2, 0, 2, 1], &[]);
    let quotient = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
    let order: Vec<_> = quotient.supernodes().map(|node| node.value.clone()).collect();
    assert_eq!(order, vec![AttrValue::Int(2), AttrValue::Int(0), AttrValue::Int(1)]);
}

#[test]
fn missing_attribute_is_an_error() {
    let mut graph = four_state_example();
    let last = graph.nodes().last().unwrap();
    graph.remove_node_attribute(last, "cluster-0").unwrap();
    let err = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap_err();
    match err {
        StgError::MissingAttribute(info) => {
            assert_eq!(info.code, "missing-attribute");
            assert_eq!(info.context.get("node"), Some(&"s3".to_string()));
            assert_eq!(info.context.get("attribute"), Some(&"cluster-0".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn aggregation_leaves_input_untouched() {
    let graph = four_state_example();
    let before = stg_graph::graph_to_json(&graph).unwrap();
    aggregate_by_attribute(&graph, "cluster-0", Directedness::Undirected).unwrap();
    assert_eq!(stg_graph::graph_to_json(&graph).unwrap(), before);
}

#[test]
fn string_valued_clusters_are_supported() {
    let mut graph = StateTransitionGraph::new();
    let a = graph.add_node("a", [("room", AttrValue::from("hall"))]).unwrap();
    let b = graph.add_node("b", [("room", AttrValue::from("kitchen"))]).unwrap();
    graph.add_edge(a, b).unwrap();
    let quotient = aggregate_by_attribute(&graph, "room", Directedness::Directed).unwrap();
    assert!(quotient.has_edge(&AttrValue::from("hall"), &AttrValue::from("kitchen")));
}

#[test]
fn levels_aggregate_in_requested_order() {
    let graph = hierarchical_chain(8, 2, 3).unwrap();
    let names = ["cluster-0", "cluster-1", "cluster-2", "cluster-3"];
    let quotients = aggregate_levels(&graph, &names, Directedness::Directed).unwrap();
    let counts: Vec<usize> = quotients.iter().map(|q| q.node_count()).collect();
    assert_eq!(counts, vec![8, 4, 2, 1]);
    // Chains of blocks keep one edge in each direction between neighbours.
    let edges: Vec<usize> = quotients.iter().map(|q| q.edge_count()).collect();
    assert_eq!(edges, vec![14, 6, 2, 0]);
}

#[test]
fn petgraph_view_aggregates_like_the_native_graph() {
    let graph = four_state_example();
    let pet = to_petgraph(&graph).unwrap();
    let view = PetStgView::new(&pet);
    let native = aggregate_by_attribute(&graph, "cluster-0", Directedness::Directed).unwrap();
    let viewed = aggregate_by_attribute(&view, "cluster-0", Directedness::Directed).unwrap();
    assert_eq!(native.edges(), viewed.edges());
    assert_eq!(native.total_size(), viewed.total_size());
}
