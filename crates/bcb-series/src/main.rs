mod bootstrap;

use anyhow::{bail, Result};
use series_core::settings::Settings;
use series_runtime::orchestrator::BatchOrchestrator;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("bcb-series v{} starting", env!("CARGO_PKG_VERSION"));

    let jobs = settings.jobs()?;
    let total = jobs.len();
    tracing::info!(
        "Extracting {} report(s) from {} into {}",
        total,
        settings.input_dir.display(),
        settings.output_dir.display()
    );

    let reports = BatchOrchestrator::new(jobs).run_all().await;

    let mut failed = 0usize;
    for report in &reports {
        match &report.outcome {
            Ok(summary) => tracing::info!(
                "{}: {} rows, {} series -> {}",
                summary.report,
                summary.rows,
                summary.series.len(),
                summary.output.display()
            ),
            Err(e) => {
                failed += 1;
                tracing::error!("{}: failed ({}): {}", report.report, report.output.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {total} reports failed");
    }

    tracing::info!("All {} reports written", total);
    Ok(())
}
