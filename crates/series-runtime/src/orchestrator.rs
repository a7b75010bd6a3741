//! Batch orchestration of report jobs.
//!
//! Each [`ReportJob`] runs on tokio's blocking pool; a [`JobReport`] is sent
//! through an `mpsc` channel as soon as its job finishes. Jobs share no state,
//! so one failure never affects the others.

use std::path::PathBuf;

use series_core::error::ExtractError;
use series_core::layouts::ReportJob;
use series_data::pipeline::{run_job, RunSummary};
use tokio::sync::mpsc;

// ── Public types ──────────────────────────────────────────────────────────────

/// Outcome of one report job.
#[derive(Debug)]
pub struct JobReport {
    /// Position of the job in the batch.
    pub index: usize,
    /// Layout name.
    pub report: String,
    /// Intended output path.
    pub output: PathBuf,
    pub outcome: Result<RunSummary, ExtractError>,
}

impl JobReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

// ── BatchOrchestrator ─────────────────────────────────────────────────────────

/// Runs a fixed set of report jobs in parallel.
pub struct BatchOrchestrator {
    jobs: Vec<ReportJob>,
}

impl BatchOrchestrator {
    pub fn new(jobs: Vec<ReportJob>) -> Self {
        Self { jobs }
    }

    /// Number of jobs in the batch.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Start every job.
    ///
    /// Returns the receiving end of the report channel. Every job runs to
    /// completion and reports once; the channel closes after the last report.
    pub fn start(self) -> mpsc::Receiver<JobReport> {
        let capacity = self.jobs.len().max(1);
        let (tx, rx) = mpsc::channel(capacity);

        for (index, job) in self.jobs.into_iter().enumerate() {
            let tx = tx.clone();
            tokio::spawn(async move {
                let report = job.layout.name.clone();
                let output = job.output.clone();
                tracing::debug!("starting job {} ({})", index, report);

                let outcome = match tokio::task::spawn_blocking(move || run_job(&job)).await {
                    Ok(result) => result,
                    Err(e) => Err(ExtractError::Other(anyhow::anyhow!(
                        "job {report} did not complete: {e}"
                    ))),
                };

                let job_report = JobReport {
                    index,
                    report,
                    output,
                    outcome,
                };
                if let Err(e) = tx.send(job_report).await {
                    tracing::warn!(error = %e, "failed to send job report; receiver dropped");
                }
            });
        }

        rx
    }

    /// Run the whole batch and collect every report, in job order.
    pub async fn run_all(self) -> Vec<JobReport> {
        let mut rx = self.start();
        let mut reports = Vec::new();
        while let Some(report) = rx.recv().await {
            reports.push(report);
        }
        reports.sort_by_key(|r| r.index);
        reports
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use series_core::layouts::ReportLayout;
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::time::Duration;

    // ── helpers ───────────────────────────────────────────────────────────────

    fn layout(name: &str) -> ReportLayout {
        ReportLayout {
            name: name.to_string(),
            source_file: format!("{name}.csv"),
            output_file: format!("{name}_clean.csv"),
            sheet: None,
            start_row: 1,
            year_col: 0,
            month_col: 0,
            value_cols: vec![1],
            header_spans: Vec::new(),
            title_overrides: BTreeMap::from([(1, "Valor".to_string())]),
        }
    }

    fn write_grid(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(format!("{name}.csv")), content).unwrap();
    }

    // ── construction ──────────────────────────────────────────────────────────

    #[test]
    fn test_orchestrator_creation() {
        let tmp = tempfile::TempDir::new().unwrap();
        let jobs = vec![ReportJob::in_dirs(layout("a"), tmp.path(), tmp.path())];
        let orch = BatchOrchestrator::new(jobs);
        assert_eq!(orch.len(), 1);
        assert!(!orch.is_empty());
    }

    // ── async: run_all ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_run_all_reports_every_job() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_grid(tmp.path(), "a", "2020\nENE,1\nFEB,2\n");
        write_grid(tmp.path(), "b", "2021\nENE,5\n");
        let out = tmp.path().join("clean");

        let jobs = vec![
            ReportJob::in_dirs(layout("a"), tmp.path(), &out),
            ReportJob::in_dirs(layout("b"), tmp.path(), &out),
        ];
        let reports = BatchOrchestrator::new(jobs).run_all().await;

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(JobReport::is_ok));
        assert_eq!(reports[0].report, "a");
        assert_eq!(reports[1].report, "b");

        let summary = reports[0].outcome.as_ref().unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.series, vec!["Valor"]);
        assert!(out.join("a_clean.csv").exists());
        assert!(out.join("b_clean.csv").exists());
    }

    #[tokio::test]
    async fn test_failing_job_does_not_stop_others() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_grid(tmp.path(), "good", "2020\nENE,1\n");
        write_grid(tmp.path(), "empty", "nada\n");

        let jobs = vec![
            ReportJob::in_dirs(layout("missing"), tmp.path(), tmp.path()),
            ReportJob::in_dirs(layout("empty"), tmp.path(), tmp.path()),
            ReportJob::in_dirs(layout("good"), tmp.path(), tmp.path()),
        ];
        let reports = BatchOrchestrator::new(jobs).run_all().await;

        assert_eq!(reports.len(), 3);
        assert!(matches!(reports[0].outcome, Err(ExtractError::FileRead { .. })));
        assert!(matches!(
            reports[1].outcome,
            Err(ExtractError::NoSeriesExtracted(ref r)) if r == "empty"
        ));
        assert!(reports[2].is_ok());
        assert!(!tmp.path().join("empty_clean.csv").exists());
    }

    #[tokio::test]
    async fn test_empty_batch_closes_channel() {
        let mut rx = BatchOrchestrator::new(Vec::new()).start();
        let next = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for channel close");
        assert!(next.is_none());
    }

    // ── async: streaming ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_start_streams_reports() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_grid(tmp.path(), "a", "2020\nDIC,9\n");

        let jobs = vec![ReportJob::in_dirs(layout("a"), tmp.path(), tmp.path())];
        let mut rx = BatchOrchestrator::new(jobs).start();

        let report = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for report")
            .expect("channel closed before report");

        assert_eq!(report.report, "a");
        assert_eq!(report.output, tmp.path().join("a_clean.csv"));
        assert!(report.is_ok());

        let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for channel close");
        assert!(closed.is_none());
    }
}
