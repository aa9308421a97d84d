//! Batch entry point: graph files in, scaling plot and JSON document out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stg_core::{AttributedDigraph, ErrorInfo, StgError};
use stg_graph::{aggregate_levels, read_graph_file, Directedness};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ScalingConfig;
use crate::figures::{render_scaling_pdf, write_figure};
use crate::levels::discover_levels;
use crate::metric::{available_skills, skills_per_level};
use crate::points::{ScalingPoint, ScalingSeries};
use crate::serde_io::{write_results, SkillAvailability};

/// Non-fatal conditions observed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingWarning {
    /// No graph file was found, so the outputs hold no points.
    EmptyResult {
        /// Directory that was scanned.
        results_dir: PathBuf,
    },
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingReport {
    /// Points sorted by state count.
    pub series: ScalingSeries,
    /// Graph files in processing order.
    pub processed: Vec<PathBuf>,
    /// Location of the rendered plot.
    pub plot_path: PathBuf,
    /// Location of the JSON document.
    pub data_path: PathBuf,
    /// Non-fatal conditions.
    pub warnings: Vec<ScalingWarning>,
}

/// Processes every graph file in the results directory and writes the plot
/// and the JSON document next to them.
///
/// The first failing file aborts the run before any output is written.
pub fn run_scaling(config: &ScalingConfig) -> Result<ScalingReport, StgError> {
    info!("Processing STGs...");
    let files = list_graph_files(config)?;
    let mut series = ScalingSeries::new();
    for path in &files {
        info!(file = %display_name(path), "processing");
        series.push(process_file(path, config)?);
    }

    let mut warnings = Vec::new();
    if series.is_empty() {
        warn!(
            results_dir = %config.results_dir.display(),
            "no state-transition graphs found; writing empty outputs"
        );
        warnings.push(ScalingWarning::EmptyResult {
            results_dir: config.results_dir.clone(),
        });
    }
    series.sort_by_size();

    info!("Saving results...");
    let plot_path = config.plot_path();
    let data_path = config.data_path();
    write_figure(&plot_path, &render_scaling_pdf(&series, &config.figure))?;
    write_results(&data_path, &SkillAvailability::from(&series))?;

    Ok(ScalingReport {
        series,
        processed: files,
        plot_path,
        data_path,
        warnings,
    })
}

/// Reads one graph file and computes its scaling point.
pub fn process_file(path: &Path, config: &ScalingConfig) -> Result<ScalingPoint, StgError> {
    let graph = read_graph_file(path)?;
    process_graph(&graph, config).map_err(|err| err.with_context("path", path.display()))
}

/// Computes the scaling point of an in-memory graph.
pub fn process_graph<G>(graph: &G, config: &ScalingConfig) -> Result<ScalingPoint, StgError>
where
    G: AttributedDigraph + ?Sized,
{
    let num_states = graph.node_count();
    if num_states == 0 {
        return Err(StgError::Graph(
            ErrorInfo::new("empty-stg", "state-transition graph has no states")
                .with_hint("every analysed graph needs at least one state"),
        ));
    }

    let levels = discover_levels(graph, config.schema_check)?;
    let mut quotients = aggregate_levels(graph, &levels, Directedness::Directed)?;
    // skipped levels are still aggregated so every node must carry them
    let quotients = quotients.split_off(config.levels_to_skip.min(quotients.len()));
    for level in skills_per_level(&quotients) {
        debug!(
            attribute = %level.attribute,
            clusters = level.clusters,
            weighted_out_degree = level.weighted_out_degree,
            "level breakdown"
        );
    }

    Ok(ScalingPoint::new(
        num_states,
        available_skills(&quotients, num_states),
    ))
}

/// Lists the graph files directly inside the results directory, sorted by
/// file name.
pub fn list_graph_files(config: &ScalingConfig) -> Result<Vec<PathBuf>, StgError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(&config.results_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            StgError::Io(
                ErrorInfo::new("list-results", err.to_string())
                    .with_context("path", config.results_dir.display().to_string()),
            )
        })?;
        if entry.file_type().is_file() && config.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
