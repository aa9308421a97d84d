use std::error::Error;

use stg_scaling::{run_scaling, ScalingConfig};
use tracing::{error, info, Level};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = ScalingConfig::default();
    let report = run_scaling(&config).map_err(|err| {
        error!(results_dir = %config.results_dir.display(), "scaling analysis failed: {err}");
        err
    })?;

    info!(
        graphs = report.processed.len(),
        warnings = report.warnings.len(),
        plot = %report.plot_path.display(),
        data = %report.data_path.display(),
        "done"
    );
    Ok(())
}
