//! Batch pipeline: fetch every job concurrently → derive documents → write files.
//!
//! This module provides the orchestration behind all static-site exports. For one
//! [`ExportConfig`] it:
//!   - Issues one GET per job against the CMS, all at once, and waits for every
//!     request to settle (no admission limit; job tables are small)
//!   - Derives output documents per job according to its [`RenderKind`]
//!   - Optionally empties the output directory, then writes every document
//!   - Returns an [`ExportReport`] of written files and dropped jobs
//!
//! # Error Handling
//! A job whose fetch or render fails is logged and left out of the output; its
//! siblings are unaffected. Filesystem failures are terminal for the run and are
//! returned as [`ExportError`]. Writes are not transactional: a failure midway
//! leaves a partially written directory.
//!
//! # Navigation
//! - Main entrypoint: [`run_export`]
//! - Per-job derivation: [`derive_documents`]

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::{ExportConfig, ExportJob, RenderKind};
use crate::contract::{ContentApi, ContentItem, SnackEnvelope};
use crate::error::{ExportError, RenderError};
use crate::fetch::with_page_limit;
use crate::render::{
    count_filename, date_stamp, quiz_count, render_article, render_category_digest,
    render_main_content, RenderedDocument,
};

/// Outcome of one export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FailedJob>,
}

/// A job or document that was dropped from the output, with the logged reason.
#[derive(Debug, Clone)]
pub struct FailedJob {
    pub name: String,
    pub reason: String,
}

pub async fn run_export<A>(
    api: &A,
    config: &ExportConfig,
    today: NaiveDate,
) -> Result<ExportReport, ExportError>
where
    A: ContentApi + ?Sized,
{
    info!(
        jobs = config.jobs.len(),
        output_dir = %config.output_dir.display(),
        "[EXPORT] Starting export run"
    );
    let stamp = date_stamp(today);

    let fetches = config.jobs.iter().map(|job| async move {
        let url = with_page_limit(&config.base_url, &job.path, config.page_limit);
        let result = api.get_json(&url).await;
        (job, result)
    });
    let settled = join_all(fetches).await;

    let mut report = ExportReport::default();
    let mut documents: Vec<RenderedDocument> = Vec::new();

    for (job, result) in settled {
        let derived = match result {
            Ok(body) => derive_documents(job, body, &stamp).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match derived {
            Ok(docs) => {
                debug!(job = %job.name, documents = docs.len(), "[EXPORT] Job derived");
                documents.extend(docs);
            }
            Err(reason) => {
                warn!(job = %job.name, path = %job.path, reason = %reason, "[EXPORT] Error fetching data, job dropped");
                report.failed.push(FailedJob {
                    name: job.name.clone(),
                    reason,
                });
            }
        }
    }

    prepare_output_dir(&config.output_dir, config.clear_before_write)?;

    let mut seen = HashSet::new();
    for document in documents {
        if !is_plain_filename(&document.filename) {
            warn!(filename = %document.filename, "[EXPORT] Refusing to write outside the output directory");
            report.failed.push(FailedJob {
                name: document.filename,
                reason: "filename is not a plain file name".to_owned(),
            });
            continue;
        }
        if !seen.insert(document.filename.clone()) {
            warn!(filename = %document.filename, "[EXPORT] Duplicate output filename, keeping the first document");
            report.failed.push(FailedJob {
                name: document.filename,
                reason: "duplicate output filename".to_owned(),
            });
            continue;
        }

        let path = config.output_dir.join(&document.filename);
        fs::write(&path, document.content.as_bytes()).map_err(|e| {
            error!(error = ?e, path = %path.display(), "[EXPORT][ERROR] Failed to write output file");
            ExportError::Write {
                path: path.clone(),
                source: e,
            }
        })?;
        info!(path = %path.display(), "[EXPORT] Written to file");
        report.written.push(path);
    }

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "[EXPORT] Export run complete"
    );
    Ok(report)
}

/// Derive the output documents for one successfully fetched job.
pub fn derive_documents(
    job: &ExportJob,
    body: Value,
    stamp: &str,
) -> Result<Vec<RenderedDocument>, RenderError> {
    match job.render {
        RenderKind::Json => Ok(vec![passthrough(&job.name, &body)?]),
        RenderKind::Quizzes => {
            let count = quiz_count(&body)?;
            Ok(vec![
                passthrough(&job.name, &body)?,
                passthrough(&count_filename(&job.name), &count)?,
            ])
        }
        RenderKind::CategoryDigest => {
            let envelopes: Vec<SnackEnvelope> = parse_list(body)?;
            match render_category_digest(&envelopes, stamp) {
                Some(doc) => Ok(vec![doc]),
                None => {
                    warn!(job = %job.name, "[EXPORT] Category has no snacks, nothing to render");
                    Ok(Vec::new())
                }
            }
        }
        RenderKind::Articles => {
            let items: Vec<ContentItem> = parse_list(body)?;
            Ok(items.iter().map(|i| render_article(i, stamp)).collect())
        }
        RenderKind::MainContent => {
            let items: Vec<ContentItem> = parse_list(body)?;
            Ok(items.iter().map(|i| render_main_content(i, stamp)).collect())
        }
    }
}

fn passthrough(filename: &str, body: &Value) -> Result<RenderedDocument, RenderError> {
    let content = serde_json::to_string(body).map_err(|e| RenderError::Shape(e.to_string()))?;
    Ok(RenderedDocument {
        filename: filename.to_owned(),
        content,
    })
}

fn parse_list<T>(body: Value) -> Result<Vec<T>, RenderError>
where
    T: serde::de::DeserializeOwned,
{
    if !body.is_array() {
        return Err(RenderError::NotAnArray(crate::render::json_kind(&body)));
    }
    serde_json::from_value(body).map_err(|e| RenderError::Shape(e.to_string()))
}

/// True when `name` is a single normal path component.
fn is_plain_filename(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Make sure `dir` exists; with `clear`, remove everything inside it first.
pub fn prepare_output_dir(dir: &Path, clear: bool) -> Result<(), ExportError> {
    let io_err = |source| ExportError::OutputDir {
        path: dir.to_path_buf(),
        source,
    };

    if clear && dir.exists() {
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let removed = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| {
                error!(error = ?e, path = %path.display(), "[EXPORT][ERROR] Failed to clear output entry");
                io_err(e)
            })?;
        }
        debug!(path = %dir.display(), "[EXPORT] Cleared output directory");
    }

    fs::create_dir_all(dir).map_err(|e| {
        error!(error = ?e, path = %dir.display(), "[EXPORT][ERROR] Failed to create output directory");
        io_err(e)
    })
}
