use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use enrich_client::{ClientSettings, JobOrchestrator, ProgressObserver};
use enrich_core::{apply_overrides, ProgressEvent};
use enrich_logging::{enrich_info, enrich_warn};
use tokio_util::sync::CancellationToken;

use crate::cli::{Command, DownloadArgs, JobArgs, RunArgs};
use crate::render::{format_candidates, format_jobs, format_status, TerminalProgress};

pub async fn dispatch(command: Command, settings: ClientSettings, output_dir: &Path) -> Result<()> {
    let mut orchestrator =
        JobOrchestrator::new(settings).context("failed to build the HTTP client")?;
    match command {
        Command::Run(args) => run(&mut orchestrator, args, output_dir).await,
        Command::Status(JobArgs { job_id }) => {
            let report = orchestrator
                .status(&job_id)
                .await
                .with_context(|| format!("failed to fetch status of {job_id}"))?;
            println!("{}", format_status(&job_id, &report));
            Ok(())
        }
        Command::Jobs => {
            let jobs = orchestrator.list_jobs().await.context("failed to list jobs")?;
            println!("{}", format_jobs(&jobs));
            Ok(())
        }
        Command::Delete(JobArgs { job_id }) => {
            orchestrator
                .delete_job(&job_id)
                .await
                .with_context(|| format!("failed to delete {job_id}"))?;
            println!("deleted {job_id}");
            Ok(())
        }
        Command::Download(DownloadArgs { job_id, filename }) => {
            let saved = orchestrator
                .download_job(&job_id, &filename, output_dir)
                .await
                .with_context(|| format!("failed to download {job_id}"))?;
            println!("saved {} ({} bytes)", saved.path.display(), saved.bytes);
            Ok(())
        }
    }
}

async fn run(orchestrator: &mut JobOrchestrator, args: RunArgs, output_dir: &Path) -> Result<()> {
    let candidates = orchestrator
        .upload(&args.file)
        .await
        .with_context(|| format!("failed to upload {}", args.file.display()))?
        .to_vec();
    if let Some(job) = orchestrator.session().job() {
        println!("uploaded {} ({} rows), job {}", job.source_filename, job.row_count, job.id);
    }
    println!("{}", format_candidates(&candidates));

    let choices = apply_overrides(&candidates, &args.mappings)?;
    let submission = orchestrator
        .submit(&choices)
        .await
        .context("failed to start enrichment")?;
    for dropped in &submission.dropped_duplicates {
        println!(
            "ignored {:?}: {} is already mapped",
            dropped.source_column, dropped.target_column
        );
    }

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                enrich_warn!("Interrupted, cancelling tracking");
                cancel.cancel();
            }
        }
    });

    let observers: Vec<Arc<dyn ProgressObserver>> = vec![Arc::new(TerminalProgress::stdout())];
    let outcome = orchestrator.track(&observers, cancel).await;
    ctrl_c.abort();

    match outcome.context("failed to track the job")? {
        ProgressEvent::Completed { .. } => {
            let saved = orchestrator
                .download_result(output_dir)
                .await
                .context("failed to download the result")?;
            enrich_info!("Result saved path={:?} bytes={}", saved.path, saved.bytes);
            println!("saved {} ({} bytes)", saved.path.display(), saved.bytes);
            Ok(())
        }
        ProgressEvent::Failed { error_message } => bail!("enrichment failed: {error_message}"),
        ProgressEvent::Progress { .. } => bail!("tracking ended without a result"),
    }
}
