use std::io::{self, Write};
use std::sync::Mutex;

use enrich_client::ProgressObserver;
use enrich_core::{JobSummary, MappingCandidate, ProgressEvent, StatusReport};

const BAR_WIDTH: usize = 30;

/// Prints tracker events, one line per event.
pub struct TerminalProgress<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalProgress<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> ProgressObserver for TerminalProgress<W> {
    fn on_event(&self, event: &ProgressEvent) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        let _ = writeln!(out, "{}", format_event(event));
        let _ = out.flush();
    }
}

pub fn format_event(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Progress {
            processed,
            total,
            percent,
            message,
        } => {
            let filled = BAR_WIDTH * usize::from(*percent) / 100;
            let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
            match message {
                Some(message) => format!("[{bar}] {percent:>3}% {processed}/{total} {message}"),
                None => format!("[{bar}] {percent:>3}% {processed}/{total}"),
            }
        }
        ProgressEvent::Completed { download_ref } => format!("done, result at {download_ref}"),
        ProgressEvent::Failed { error_message } => format!("failed: {error_message}"),
    }
}

/// Column table shown after upload: source column, suggested target, label.
pub fn format_candidates(candidates: &[MappingCandidate]) -> String {
    let width = candidates
        .iter()
        .map(|c| c.source_column.chars().count())
        .max()
        .unwrap_or(0);
    candidates
        .iter()
        .map(|c| {
            format!(
                "  {:<width$}  -> {:<12} {}",
                c.source_column,
                c.default_target.key(),
                c.default_target.entry().display_label,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_status(job_id: &str, report: &StatusReport) -> String {
    let mut line = format!(
        "{job_id}: {:?} {}/{}",
        report.status, report.progress, report.total
    );
    if let Some(percentage) = report.percentage {
        line.push_str(&format!(" ({percentage}%)"));
    }
    if let Some(message) = report.message.as_deref().filter(|m| !m.is_empty()) {
        line.push_str(&format!(" {message}"));
    }
    if let Some(error) = report.error.as_deref() {
        line.push_str(&format!(" error: {error}"));
    }
    line
}

pub fn format_jobs(jobs: &[JobSummary]) -> String {
    if jobs.is_empty() {
        return "no jobs".to_string();
    }
    jobs.iter()
        .map(|job| {
            format!(
                "{}  {:<10} {}  {}",
                job.job_id,
                format!("{:?}", job.status).to_lowercase(),
                job.uploaded_at.as_deref().unwrap_or("-"),
                job.filename,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
