use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Default `_limit` override sent with every CMS listing query.
pub const DEFAULT_PAGE_LIMIT: u32 = 10_000;

/// Category used by the reminder when the trigger names none.
pub const DEFAULT_CATEGORY: &str = "reactjs";

/// What an export job derives from its fetched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    /// Write the response body as-is to `<name>`.
    Json,
    /// Like `Json`, plus a sibling `{"count": n}` file.
    Quizzes,
    /// One Markdown digest post listing every snack of a category.
    CategoryDigest,
    /// One Markdown article post per snack.
    Articles,
    /// One Markdown main-content post per snack.
    MainContent,
}

/// One (output name, source query) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    /// Output filename for JSON jobs, a label for Markdown jobs.
    pub name: String,
    /// Path and query below the CMS base URL.
    pub path: String,
    pub render: RenderKind,
}

impl ExportJob {
    pub fn new(name: impl Into<String>, path: impl Into<String>, render: RenderKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            render,
        }
    }
}

/// A batch export: where to fetch from, where to write, and which jobs to run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub base_url: String,
    #[serde(default = "default_page_limit")]
    pub page_limit: Option<u32>,
    pub output_dir: PathBuf,
    /// Empty `output_dir` before writing. Off unless asked for.
    #[serde(default)]
    pub clear_before_write: bool,
    pub jobs: Vec<ExportJob>,
}

fn default_page_limit() -> Option<u32> {
    Some(DEFAULT_PAGE_LIMIT)
}

impl ExportConfig {
    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.base_url,
            output_dir = %self.output_dir.display(),
            clear_before_write = self.clear_before_write,
            jobs_count = self.jobs.len(),
            "Loaded ExportConfig"
        );
        debug!(?self, "ExportConfig loaded (full debug)");
    }
}

/// Where the random snack comes from and who gets the reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Random-snack function URL, without query string.
    pub endpoint: String,
    #[serde(default = "default_category")]
    pub default_category: String,
    pub to: String,
    pub from: String,
    pub template_id: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

fn default_sender_name() -> String {
    "Codersnack Snippet Reminder - daily CRON".to_owned()
}

impl ReminderConfig {
    pub fn trace_loaded(&self) {
        info!(
            endpoint = %self.endpoint,
            default_category = %self.default_category,
            template_id = %self.template_id,
            "Loaded ReminderConfig"
        );
    }
}
