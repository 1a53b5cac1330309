//! Run the default verification scenario and write its report.
//!
//! The report goes to `HOTEL_REPORT_DIR`, or `target/hotel-report` if unset. Charts are rendered
//! with gnuplot when `HOTEL_REPORT_CHARTS` is set.

use std::path::PathBuf;

use hotel_ops_sim::{Reporter, ReporterConfig, ScenarioConfig, ScenarioRunner};
use tracing::{error, Level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let output_dir = std::env::var_os("HOTEL_REPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/hotel-report"));
    let render_charts = std::env::var_os("HOTEL_REPORT_CHARTS").is_some();

    let config = ScenarioConfig::builder().name("one day, default hotel").build();
    let outcome = ScenarioRunner::new(config.clone())
        .run()
        .inspect_err(|e| error!(error = %e, "scenario failed"))?;

    let reporter = Reporter::new(
        &outcome,
        &config,
        ReporterConfig {
            output_dir,
            templates_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"),
            render_charts,
        },
    );
    reporter.report()?;

    Ok(())
}
