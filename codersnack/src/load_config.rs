/// `load_config` module: loads a static YAML config, injects secrets from the
/// environment, and adapts it into the core crate's `ExportConfig` and
/// `ReminderConfig`.
///
/// # Responsibilities
/// - Parse the user-supplied YAML file into type-safe structs
/// - Expand `preset:` names into the core crate's built-in job tables
/// - Read `EMAIL_API_KEY` from the environment; it never lives in the file
///
/// # Errors
/// Every failure is an `anyhow::Error` with enough context to act on, surfaced at
/// the CLI boundary.
use anyhow::{bail, Result};
use codersnack_core::config::{ExportConfig, ExportJob, ReminderConfig, DEFAULT_PAGE_LIMIT};
use codersnack_core::presets;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Environment variable holding the mail provider API key.
pub const EMAIL_API_KEY_VAR: &str = "EMAIL_API_KEY";

#[derive(Debug)]
pub struct CliConfig {
    pub exports: Vec<ExportConfig>,
    pub reminder: Option<ReminderConfig>,
    /// Mail provider key, injected from the environment.
    pub email_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentApiSection {
    pub base_url: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: Option<u32>,
}

fn default_page_limit() -> Option<u32> {
    Some(DEFAULT_PAGE_LIMIT)
}

#[derive(Debug, Deserialize)]
pub struct ExportSection {
    pub output_dir: PathBuf,
    #[serde(default)]
    pub clear_before_write: bool,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub jobs: Vec<ExportJob>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    content_api: Option<ContentApiSection>,
    #[serde(default)]
    exports: Vec<ExportSection>,
    #[serde(default)]
    reminder: Option<ReminderConfig>,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let exports = match (&raw.content_api, raw.exports.is_empty()) {
        (_, true) => Vec::new(),
        (None, false) => {
            error!("exports configured without a content_api section");
            bail!("Config declares exports but no content_api.base_url");
        }
        (Some(api), false) => raw
            .exports
            .into_iter()
            .map(|section| export_config(api, section))
            .collect::<Result<Vec<_>>>()?,
    };

    let email_api_key = match std::env::var(EMAIL_API_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => {
            info!("{EMAIL_API_KEY_VAR} found in env");
            Some(key)
        }
        _ => {
            info!("{EMAIL_API_KEY_VAR} not set, reminder sending unavailable");
            None
        }
    };

    for export in &exports {
        export.trace_loaded();
    }
    if let Some(reminder) = &raw.reminder {
        reminder.trace_loaded();
    }

    Ok(CliConfig {
        exports,
        reminder: raw.reminder,
        email_api_key,
    })
}

fn export_config(api: &ContentApiSection, section: ExportSection) -> Result<ExportConfig> {
    let jobs = match (section.preset.as_deref(), section.jobs.is_empty()) {
        (Some(_), false) => {
            bail!(
                "Export {:?} sets both `preset` and `jobs`; pick one",
                section.output_dir
            );
        }
        (Some(name), true) => match presets::by_name(name) {
            Some(jobs) => {
                info!(preset = %name, jobs = jobs.len(), "Expanded export preset");
                jobs
            }
            None => {
                error!(preset = %name, "Unknown export preset in config");
                bail!("Unsupported export preset: {name}");
            }
        },
        (None, false) => section.jobs,
        (None, true) => {
            bail!("Export {:?} has neither `preset` nor `jobs`", section.output_dir);
        }
    };

    Ok(ExportConfig {
        base_url: api.base_url.clone(),
        page_limit: api.page_limit,
        output_dir: section.output_dir,
        clear_before_write: section.clear_before_write,
        jobs,
    })
}
