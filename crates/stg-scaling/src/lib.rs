#![deny(missing_docs)]

//! Skill availability scaling analysis: how many skills a hierarchy offers
//! per state as state-transition graphs grow.

mod config;
pub mod driver;
pub mod figures;
pub mod levels;
pub mod metric;
mod points;
#[path = "serde.rs"]
pub mod serde_io;

pub use config::{
    ScalingConfig, SchemaCheck, DATA_FILE_NAME, DEFAULT_RESULTS_DIR, PLOT_FILE_NAME,
};
pub use driver::{
    list_graph_files, process_file, process_graph, run_scaling, ScalingReport, ScalingWarning,
};
pub use figures::{render_scaling_pdf, write_figure, FigureConfig};
pub use levels::{discover_levels, LEVEL_PREFIX};
pub use metric::{available_skills, skills_per_level, weighted_out_degree, LevelSkills};
pub use points::{ScalingPoint, ScalingSeries};
pub use serde_io::{from_json, read_results, to_json, write_results, SkillAvailability};
