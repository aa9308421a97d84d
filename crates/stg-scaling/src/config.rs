use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::figures::FigureConfig;

/// Directory scanned for graphs and receiving the outputs by default.
pub const DEFAULT_RESULTS_DIR: &str = "./Training Results/Scaling STGs/";
/// File name of the rendered scaling plot.
pub const PLOT_FILE_NAME: &str = "skill availability scaling.pdf";
/// File name of the persisted scaling points.
pub const DATA_FILE_NAME: &str = "skill availability.json";

/// How the hierarchy-level schema of each graph is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaCheck {
    /// Read level names from the first node and trust every node to match.
    #[default]
    Sample,
    /// Require every node to carry exactly the same level names.
    Strict,
}

/// Options controlling a scaling analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    /// Directory holding the input graphs; outputs are written next to them.
    pub results_dir: PathBuf,
    /// Number of finest hierarchy levels excluded from the metric.
    pub levels_to_skip: usize,
    /// Extension (without the dot) of the graph files to process.
    pub graph_extension: String,
    /// Level schema discovery mode.
    #[serde(default)]
    pub schema_check: SchemaCheck,
    /// Styling of the rendered plot.
    #[serde(default)]
    pub figure: FigureConfig,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            levels_to_skip: 1,
            graph_extension: "gexf".to_owned(),
            schema_check: SchemaCheck::default(),
            figure: FigureConfig::default(),
        }
    }
}

impl ScalingConfig {
    /// Returns a default configuration rooted at `results_dir`.
    pub fn for_dir(results_dir: impl AsRef<Path>) -> Self {
        Self {
            results_dir: results_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Path of the rendered plot.
    pub fn plot_path(&self) -> PathBuf {
        self.results_dir.join(PLOT_FILE_NAME)
    }

    /// Path of the persisted points.
    pub fn data_path(&self) -> PathBuf {
        self.results_dir.join(DATA_FILE_NAME)
    }

    /// Returns whether `path` has the configured graph extension.
    pub fn matches_extension(&self, path: &Path) -> bool {
        let wanted = self.graph_extension.trim_start_matches('.');
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == wanted)
    }
}
