use stg_core::{AttrValue, StgError};
use stg_graph::{aggregate_levels, hierarchical_chain, Directedness, StateTransitionGraph};
use stg_scaling::{
    available_skills, discover_levels, process_graph, skills_per_level, ScalingConfig,
    ScalingPoint, ScalingSeries, SchemaCheck,
};

fn no_attributes() -> Vec<(String, AttrValue)> {
    Vec::new()
}

#[test]
fn levels_follow_attribute_order_and_prefix() {
    let mut graph = StateTransitionGraph::new();
    graph
        .add_node(
            "s0",
            [
                ("cluster-1", AttrValue::Int(0)),
                ("reward", AttrValue::Float(1.0)),
                ("cluster-0", AttrValue::Int(0)),
                ("clustering", AttrValue::Bool(true)),
            ],
        )
        .unwrap();
    let levels = discover_levels(&graph, SchemaCheck::Sample).unwrap();
    assert_eq!(levels, vec!["cluster-1", "cluster-0"]);
}

#[test]
fn empty_graph_has_no_levels() {
    let graph = StateTransitionGraph::new();
    assert!(discover_levels(&graph, SchemaCheck::Strict).unwrap().is_empty());
}

#[test]
fn strict_schema_rejects_divergent_nodes() {
    let mut graph = StateTransitionGraph::new();
    graph
        .add_node("s0", [("cluster-0", AttrValue::Int(0)), ("cluster-1", AttrValue::Int(0))])
        .unwrap();
    graph.add_node("s1", [("cluster-0", AttrValue::Int(1))]).unwrap();

    assert_eq!(
        discover_levels(&graph, SchemaCheck::Sample).unwrap(),
        vec!["cluster-0", "cluster-1"]
    );
    match discover_levels(&graph, SchemaCheck::Strict).unwrap_err() {
        StgError::Graph(info) => {
            assert_eq!(info.code, "inconsistent-levels");
            assert_eq!(info.context.get("node").map(String::as_str), Some("s1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn per_level_breakdown_on_chain() {
    let graph = hierarchical_chain(8, 2, 3).unwrap();
    let levels = discover_levels(&graph, SchemaCheck::Strict).unwrap();
    let quotients = aggregate_levels(&graph, &levels, Directedness::Directed).unwrap();
    let breakdown: Vec<_> = skills_per_level(&quotients)
        .into_iter()
        .map(|level| (level.attribute, level.clusters, level.weighted_out_degree))
        .collect();
    assert_eq!(
        breakdown,
        vec![
            ("cluster-0".to_owned(), 8, 14),
            ("cluster-1".to_owned(), 4, 12),
            ("cluster-2".to_owned(), 2, 8),
            ("cluster-3".to_owned(), 1, 0),
        ]
    );
    assert!((available_skills(&quotients, 8) - 34.0 / 8.0).abs() < 1e-12);
    assert_eq!(available_skills(&quotients, 0), 0.0);
}

#[test]
fn levels_to_skip_drops_the_finest_levels() {
    let graph = hierarchical_chain(8, 2, 3).unwrap();
    let mut config = ScalingConfig::default();
    let expected = [(0, 34.0), (1, 20.0), (2, 8.0), (4, 0.0), (10, 0.0)];
    for (skip, total) in expected {
        config.levels_to_skip = skip;
        let point = process_graph(&graph, &config).unwrap();
        assert_eq!(point.num_states, 8);
        assert!((point.avg_skills - total / 8.0).abs() < 1e-12, "skip {skip}");
    }
}

#[test]
fn graph_without_levels_offers_no_skills() {
    let mut graph = StateTransitionGraph::new();
    let a = graph.add_node("a", no_attributes()).unwrap();
    let b = graph.add_node("b", no_attributes()).unwrap();
    graph.add_edge(a, b).unwrap();
    let point = process_graph(&graph, &ScalingConfig::default()).unwrap();
    assert_eq!(point, ScalingPoint::new(2, 0.0));
}

#[test]
fn empty_graph_is_rejected() {
    let graph = StateTransitionGraph::new();
    match process_graph(&graph, &ScalingConfig::default()).unwrap_err() {
        StgError::Graph(info) => assert_eq!(info.code, "empty-stg"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn sorting_keeps_ties_in_insertion_order() {
    let mut series: ScalingSeries = [
        ScalingPoint::new(50, 1.2),
        ScalingPoint::new(10, 3.4),
        ScalingPoint::new(10, 2.1),
    ]
    .into_iter()
    .collect();
    series.sort_by_size();
    assert_eq!(series.unzip(), (vec![10, 10, 50], vec![3.4, 2.1, 1.2]));
}
