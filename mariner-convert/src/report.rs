use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use crate::classify::FileKind;
use crate::error::ConvertError;
use crate::pipeline::PlannedFile;

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Copied,
    Converted,
    /// Dry run: would be written to the destination.
    Planned,
    /// Classified but produced no output.
    Skipped,
    /// Unclassified; not an error.
    Ignored,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the input root, or the walked path for walk failures.
    pub source: PathBuf,
    /// `None` when the file could not even be listed.
    pub kind: Option<FileKind>,
    pub status: FileStatus,
    pub destination: Option<PathBuf>,
    pub detail: Option<String>,
}

impl FileReport {
    pub fn planned(planned: &PlannedFile) -> Self {
        let status = if planned.destination.is_some() {
            FileStatus::Planned
        } else {
            FileStatus::Ignored
        };
        Self::from_planned(planned, status, None)
    }

    pub fn done(planned: &PlannedFile, status: FileStatus, detail: Option<String>) -> Self {
        Self::from_planned(planned, status, detail)
    }

    pub fn skipped(planned: &PlannedFile, status: FileStatus, reason: String) -> Self {
        Self {
            destination: None,
            ..Self::from_planned(planned, status, Some(reason))
        }
    }

    pub fn failed(planned: &PlannedFile, error: &ConvertError) -> Self {
        Self::from_planned(planned, FileStatus::Failed, Some(error.to_string()))
    }

    pub fn walk_failure(error: &ConvertError) -> Self {
        let source = match error {
            ConvertError::Walk { path, .. }
            | ConvertError::Read { path, .. }
            | ConvertError::Parse { path, .. }
            | ConvertError::Write { path, .. } => PathBuf::from(path),
        };
        Self {
            source,
            kind: None,
            status: FileStatus::Failed,
            destination: None,
            detail: Some(error.to_string()),
        }
    }

    fn from_planned(planned: &PlannedFile, status: FileStatus, detail: Option<String>) -> Self {
        Self {
            source: planned.candidate.relative_path.clone(),
            kind: Some(planned.kind),
            status,
            destination: planned.destination.clone(),
            detail,
        }
    }
}

/// Totals per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub copied: usize,
    pub converted: usize,
    pub planned: usize,
    pub skipped: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Outcome of a whole run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub files: Vec<FileReport>,
}

impl ConversionReport {
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary::default();
        for file in &self.files {
            let slot = match file.status {
                FileStatus::Copied => &mut summary.copied,
                FileStatus::Converted => &mut summary.converted,
                FileStatus::Planned => &mut summary.planned,
                FileStatus::Skipped => &mut summary.skipped,
                FileStatus::Ignored => &mut summary.ignored,
                FileStatus::Failed => &mut summary.failed,
            };
            *slot += 1;
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|f| f.status == FileStatus::Failed)
    }

    /// Count of files per classified kind.
    pub fn kind_counts(&self) -> Vec<(FileKind, usize)> {
        FileKind::ALL
            .iter()
            .map(|kind| {
                let count = self
                    .files
                    .iter()
                    .filter(|f| f.kind == Some(*kind))
                    .count();
                (*kind, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Render the summary line.
pub fn render_summary(summary: ReportSummary) -> String {
    format!(
        "convert_summary copied={} converted={} planned={} skipped={} ignored={} failed={}",
        summary.copied,
        summary.converted,
        summary.planned,
        summary.skipped,
        summary.ignored,
        summary.failed
    )
}

/// Render per-file lines plus the summary for terminal output.
pub fn render_text(report: &ConversionReport) -> String {
    let mut out = Vec::new();

    for file in &report.files {
        let kind = file.kind.map(FileKind::as_str).unwrap_or("-");
        let mut line = format!(
            "{:<9} {kind} {}",
            status_label(file.status),
            file.source.display()
        );
        if let Some(destination) = &file.destination {
            line.push_str(&format!(" -> {}", destination.display()));
        }
        if let Some(detail) = &file.detail {
            line.push_str(&format!(" ({detail})"));
        }
        let colored = match file.status {
            FileStatus::Copied | FileStatus::Converted => line.green().to_string(),
            FileStatus::Planned => line.cyan().to_string(),
            FileStatus::Skipped => line.yellow().to_string(),
            FileStatus::Ignored => line.dimmed().to_string(),
            FileStatus::Failed => line.red().to_string(),
        };
        out.push(colored);
    }

    let kinds: Vec<String> = report
        .kind_counts()
        .into_iter()
        .map(|(kind, count)| format!("{kind}={count}"))
        .collect();
    if !kinds.is_empty() {
        out.push(format!("kinds {}", kinds.join(" ")));
    }
    out.push(render_summary(report.summary()).cyan().to_string());
    out.join("\n")
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Copied => "COPIED",
        FileStatus::Converted => "CONVERTED",
        FileStatus::Planned => "PLANNED",
        FileStatus::Skipped => "SKIPPED",
        FileStatus::Ignored => "IGNORED",
        FileStatus::Failed => "FAILED",
    }
}
