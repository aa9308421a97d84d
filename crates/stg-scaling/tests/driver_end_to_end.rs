use std::fs;

use stg_core::{AttrValue, StgError};
use stg_graph::{hierarchical_chain, write_graph_file, StateTransitionGraph};
use stg_scaling::{
    process_graph, read_results, run_scaling, ScalingConfig, ScalingWarning, SkillAvailability,
    DATA_FILE_NAME, PLOT_FILE_NAME,
};
use tempfile::tempdir;

fn four_state_example() -> StateTransitionGraph {
    let mut graph = StateTransitionGraph::new();
    for (label, cluster) in [("s0", 0), ("s1", 0), ("s2", 1), ("s3", 1)] {
        graph
            .add_node(label, [("cluster-0", AttrValue::Int(cluster))])
            .unwrap();
    }
    for (source, target) in [("s0", "s1"), ("s1", "s2"), ("s2", "s3")] {
        graph
            .add_edge_by_label(&AttrValue::from(source), &AttrValue::from(target))
            .unwrap();
    }
    graph
}

#[test]
fn four_state_example_yields_half_a_skill_per_state() {
    let dir = tempdir().unwrap();
    write_graph_file(&dir.path().join("example.gexf"), &four_state_example()).unwrap();
    let config = ScalingConfig {
        levels_to_skip: 0,
        ..ScalingConfig::for_dir(dir.path())
    };

    let report = run_scaling(&config).unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.processed.len(), 1);

    let results = read_results(&dir.path().join(DATA_FILE_NAME)).unwrap();
    assert_eq!(results.stg_sizes, vec![4]);
    assert_eq!(results.available_skills, vec![0.5]);
    let pdf = fs::read(dir.path().join(PLOT_FILE_NAME)).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
}

#[test]
fn points_are_sorted_by_state_count() {
    let dir = tempdir().unwrap();
    write_graph_file(&dir.path().join("a_large.gexf"), &hierarchical_chain(32, 2, 3).unwrap())
        .unwrap();
    write_graph_file(&dir.path().join("b_small.gexf"), &hierarchical_chain(8, 2, 3).unwrap())
        .unwrap();
    write_graph_file(&dir.path().join("c_medium.gexf"), &hierarchical_chain(16, 2, 3).unwrap())
        .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let report = run_scaling(&ScalingConfig::for_dir(dir.path())).unwrap();
    let names: Vec<_> = report
        .processed
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_large.gexf", "b_small.gexf", "c_medium.gexf"]);

    let (sizes, skills) = report.series.unzip();
    assert_eq!(sizes, vec![8, 16, 32]);
    // chain(8, 2, 3) without cluster-0: (12 + 8 + 0) / 8
    assert!((skills[0] - 2.5).abs() < 1e-12);

    let written = read_results(&report.data_path).unwrap();
    assert_eq!(written, SkillAvailability::from(&report.series));
}

#[test]
fn empty_directory_writes_empty_outputs() {
    let dir = tempdir().unwrap();
    let report = run_scaling(&ScalingConfig::for_dir(dir.path())).unwrap();
    assert_eq!(
        report.warnings,
        vec![ScalingWarning::EmptyResult {
            results_dir: dir.path().to_path_buf()
        }]
    );
    let json = fs::read_to_string(dir.path().join(DATA_FILE_NAME)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"STG Sizes": [], "Available Skills": []})
    );
    assert!(dir.path().join(PLOT_FILE_NAME).exists());
}

#[test]
fn missing_level_attribute_aborts_the_batch() {
    let dir = tempdir().unwrap();
    let mut graph = four_state_example();
    let s0 = graph.node_id(&AttrValue::from("s0")).unwrap();
    graph
        .set_node_attribute(s0, "cluster-1", AttrValue::Int(0))
        .unwrap();
    write_graph_file(&dir.path().join("broken.gexf"), &graph).unwrap();

    let err = run_scaling(&ScalingConfig::for_dir(dir.path())).unwrap_err();
    match err {
        StgError::MissingAttribute(info) => {
            assert_eq!(info.code, "missing-attribute");
            assert_eq!(info.context.get("attribute").map(String::as_str), Some("cluster-1"));
            assert!(info.context.contains_key("path"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join(DATA_FILE_NAME).exists());
    assert!(!dir.path().join(PLOT_FILE_NAME).exists());
}

#[test]
fn json_graphs_are_processed_when_selected() {
    let dir = tempdir().unwrap();
    write_graph_file(&dir.path().join("example.json"), &four_state_example()).unwrap();
    write_graph_file(&dir.path().join("other.gexf"), &hierarchical_chain(8, 2, 2).unwrap())
        .unwrap();
    let config = ScalingConfig {
        levels_to_skip: 0,
        graph_extension: "json".to_owned(),
        ..ScalingConfig::for_dir(dir.path())
    };
    let report = run_scaling(&config).unwrap();
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.series.unzip(), (vec![4], vec![0.5]));
}

#[test]
fn unsupported_extension_is_a_decode_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("graph.txt"), "s0 -> s1").unwrap();
    let config = ScalingConfig {
        graph_extension: "txt".to_owned(),
        ..ScalingConfig::for_dir(dir.path())
    };
    match run_scaling(&config).unwrap_err() {
        StgError::Deserialization(info) => assert_eq!(info.code, "unsupported-format"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_results_directory_is_an_io_error() {
    let dir = tempdir().unwrap();
    let config = ScalingConfig::for_dir(dir.path().join("absent"));
    match run_scaling(&config).unwrap_err() {
        StgError::Io(info) => assert_eq!(info.code, "list-results"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn skipped_level_must_still_be_present_on_every_state() {
    let mut graph = StateTransitionGraph::new();
    graph
        .add_node("s0", [("cluster-0", AttrValue::Int(0)), ("cluster-1", AttrValue::Int(0))])
        .unwrap();
    graph.add_node("s1", [("cluster-1", AttrValue::Int(1))]).unwrap();
    graph
        .add_edge_by_label(&AttrValue::from("s0"), &AttrValue::from("s1"))
        .unwrap();

    match process_graph(&graph, &ScalingConfig::default()).unwrap_err() {
        StgError::MissingAttribute(info) => {
            assert_eq!(info.context.get("attribute").map(String::as_str), Some("cluster-0"));
            assert_eq!(info.context.get("node").map(String::as_str), Some("s1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let dir = tempdir().unwrap();
    write_graph_file(&dir.path().join("partial.gexf"), &graph).unwrap();
    assert!(matches!(
        run_scaling(&ScalingConfig::for_dir(dir.path())).unwrap_err(),
        StgError::MissingAttribute(_)
    ));
}

#[cfg(unix)]
#[test]
fn symlinked_graph_files_are_processed() {
    let store = tempdir().unwrap();
    let target = store.path().join("example.gexf");
    write_graph_file(&target, &four_state_example()).unwrap();

    let dir = tempdir().unwrap();
    std::os::unix::fs::symlink(&target, dir.path().join("linked.gexf")).unwrap();
    let config = ScalingConfig {
        levels_to_skip: 0,
        ..ScalingConfig::for_dir(dir.path())
    };
    let report = run_scaling(&config).unwrap();
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.series.unzip(), (vec![4], vec![0.5]));
}
