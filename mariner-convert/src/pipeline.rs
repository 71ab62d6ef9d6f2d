//! Settings tree conversion: discover, classify, transform, write.
//!
//! Every candidate is handled on its own. A parse or filesystem failure is
//! recorded in the [`ConversionReport`] and the run moves on to the next file,
//! unless [`ConvertOptions::strict`] is set, in which case the first failure is
//! returned as the error of the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use xml_settings_core::{parse_document, write_atomic_with_permissions, write_file, XmlDocument};

use crate::classify::{classify, CandidateFile, FileKind};
use crate::discover::discover;
use crate::error::ConvertError;
use crate::job::{ConversionJob, ConvertOptions};
use crate::query_mappings::QueryMappings;
use crate::report::{ConversionReport, FileReport, FileStatus};
use crate::transform::{collection_setting, dbwatcher_list, dbwatcher_source};

/// A classified candidate and where its output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub candidate: CandidateFile,
    pub kind: FileKind,
    /// `None` for files that produce no output.
    pub destination: Option<PathBuf>,
}

/// Result of converting one file that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Copied,
    Converted(String),
    Skipped(String),
}

/// Classify a candidate and compute its mirrored output path.
pub fn plan_file(job: &ConversionJob, candidate: CandidateFile) -> PlannedFile {
    let kind = classify(&candidate);
    let destination = destination_for(&job.output_root, &candidate, kind);
    PlannedFile {
        candidate,
        kind,
        destination,
    }
}

/// Output path for a candidate of `kind` under `output_root`.
///
/// Mirrors the relative path; dbwatcher source files get an upper-cased stem.
pub fn destination_for(
    output_root: &Path,
    candidate: &CandidateFile,
    kind: FileKind,
) -> Option<PathBuf> {
    match kind {
        FileKind::Unclassified => None,
        FileKind::DbwatcherSource => {
            let mirrored = output_root.join(&candidate.relative_path);
            Some(mirrored.with_file_name(dbwatcher_source::output_file_name(&candidate.name)))
        }
        _ => Some(output_root.join(&candidate.relative_path)),
    }
}

/// Convert every settings file under `job.input_root` into `job.output_root`.
///
/// Returns `Err` only in strict mode; otherwise failures are listed in the report.
pub fn convert(
    job: &ConversionJob,
    options: ConvertOptions,
    mappings: &QueryMappings,
) -> Result<ConversionReport, ConvertError> {
    let discovery = discover(&job.input_root);
    let mut report = ConversionReport::default();

    for error in discovery.errors {
        if options.strict {
            return Err(error);
        }
        warn!("{error}");
        report.files.push(FileReport::walk_failure(&error));
    }

    info!(
        "Converting {} settings file(s) from {} to {}",
        discovery.candidates.len(),
        job.input_root.display(),
        job.output_root.display()
    );

    for candidate in discovery.candidates {
        let planned = plan_file(job, candidate);

        if options.dry_run {
            report.files.push(FileReport::planned(&planned));
            continue;
        }

        match convert_file(job, options, mappings, &planned) {
            Ok(Outcome::Copied) => {
                report
                    .files
                    .push(FileReport::done(&planned, FileStatus::Copied, None));
            }
            Ok(Outcome::Converted(detail)) => {
                report
                    .files
                    .push(FileReport::done(&planned, FileStatus::Converted, Some(detail)));
            }
            Ok(Outcome::Skipped(reason)) => {
                let status = if planned.kind == FileKind::Unclassified {
                    FileStatus::Ignored
                } else {
                    FileStatus::Skipped
                };
                report.files.push(FileReport::skipped(&planned, status, reason));
            }
            Err(error) => {
                if options.strict {
                    return Err(error);
                }
                warn!("{error}");
                report.files.push(FileReport::failed(&planned, &error));
            }
        }
    }

    Ok(report)
}

fn convert_file(
    job: &ConversionJob,
    options: ConvertOptions,
    mappings: &QueryMappings,
    planned: &PlannedFile,
) -> Result<Outcome, ConvertError> {
    let Some(destination) = planned.destination.as_deref() else {
        debug!(
            "Ignoring unclassified file {}",
            planned.candidate.relative_path.display()
        );
        return Ok(Outcome::Skipped("unclassified".to_string()));
    };
    let source = planned.candidate.absolute_path.as_path();

    match planned.kind {
        FileKind::DbwatcherList if options.uppercase_list_ids => {
            let mut doc = read_document(source)?;
            let changed = dbwatcher_list::uppercase_element_ids(&mut doc.root);
            save_document(&doc, destination)?;
            info!("Converted dbwatcher list: {}", destination.display());
            Ok(Outcome::Converted(format!("ids_uppercased={changed}")))
        }
        FileKind::CollectionList | FileKind::ProfileSetting | FileKind::DbwatcherList => {
            copy_file(source, destination)?;
            info!("Copied: {}", destination.display());
            Ok(Outcome::Copied)
        }
        FileKind::CollectionSetting => {
            let mut doc = read_document(source)?;
            let Some(change) = collection_setting::apply(&mut doc.root, &job.homes) else {
                warn!(
                    "No {} element in {}; nothing written",
                    collection_setting::ELEMENT,
                    source.display()
                );
                return Ok(Outcome::Skipped(format!(
                    "no {} element",
                    collection_setting::ELEMENT
                )));
            };
            save_document(&doc, destination)?;
            info!("Converted collection setting: {}", destination.display());
            Ok(Outcome::Converted(format!(
                "type={} base_directory_rewritten={}",
                change.collection_type,
                change.base_directory.is_some()
            )))
        }
        FileKind::DbwatcherSource => {
            let mut doc = read_document(source)?;
            let change = dbwatcher_source::apply(&mut doc.root, mappings);
            save_document(&doc, destination)?;
            info!("Converted dbwatcher source: {}", destination.display());
            Ok(Outcome::Converted(format!(
                "id={} wrappers=[{}] removed={}",
                change.id.as_deref().unwrap_or("-"),
                change.wrappers.join(","),
                change.removed
            )))
        }
        FileKind::Unclassified => Ok(Outcome::Skipped("unclassified".to_string())),
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, ConvertError> {
    fs::read(path).map_err(|source| ConvertError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn read_document(path: &Path) -> Result<XmlDocument, ConvertError> {
    let bytes = read_bytes(path)?;
    parse_document(&bytes).map_err(|source| ConvertError::Parse {
        path: path.display().to_string(),
        source,
    })
}

fn save_document(doc: &XmlDocument, destination: &Path) -> Result<(), ConvertError> {
    write_file(doc, destination).map_err(|source| ConvertError::Write {
        path: destination.display().to_string(),
        source,
    })
}

/// Byte-for-byte copy that keeps the source file's permissions.
fn copy_file(source: &Path, destination: &Path) -> Result<(), ConvertError> {
    let bytes = read_bytes(source)?;
    let permissions = fs::metadata(source)
        .map_err(|io| ConvertError::Read {
            path: source.display().to_string(),
            source: io,
        })?
        .permissions();
    write_atomic_with_permissions(destination, &bytes, permissions).map_err(|source| {
        ConvertError::Write {
            path: destination.display().to_string(),
            source,
        }
    })
}
