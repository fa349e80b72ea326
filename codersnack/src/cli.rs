///
/// This module implements the CLI interface for codersnack: command parsing,
/// config loading and wiring the concrete HTTP and mail clients into the core
/// pipelines.
///
/// All business logic (data model, rendering, export and reminder pipelines) lives
/// in the [`codersnack-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: run the `codersnack` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`codersnack-core`]: ../../codersnack_core/
use crate::load_config::{load_config, EMAIL_API_KEY_VAR};
use crate::mailer::SendGridMailer;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use codersnack_core::export::run_export;
use codersnack_core::fetch::HttpContentApi;
use codersnack_core::reminder::{handle_raw_reminder, handle_reminder, ReminderRequest};
use std::path::PathBuf;

/// CLI for codersnack: export CMS content for the static site and send reminders.
#[derive(Parser)]
#[clap(
    name = "codersnack",
    version,
    about = "Export codersnack CMS content to JSON/Markdown and send the daily snack reminder"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every export declared in the config file
    Export {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Only run the export writing to this output directory
        #[clap(long)]
        only: Option<PathBuf>,
    },
    /// Mail one random snack and print the JSON response
    Remind {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Category key; the configured default is used when omitted
        #[clap(long)]
        category: Option<String>,
        /// Send the snack as plain-text JSON under this literal subject instead of the template
        #[clap(long, value_name = "SUBJECT")]
        raw: Option<String>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Export { config, only } => {
            let config = load_config(config)?;
            let selected: Vec<_> = config
                .exports
                .iter()
                .filter(|e| only.as_ref().map_or(true, |dir| &e.output_dir == dir))
                .collect();
            if selected.is_empty() {
                anyhow::bail!("No export matches the given config/--only selection");
            }

            let api = HttpContentApi::new();
            let today = Local::now().date_naive();
            for export in selected {
                tracing::info!(command = "export", output_dir = %export.output_dir.display(), "Starting export");
                let report = run_export(&api, export, today)
                    .await
                    .with_context(|| format!("Export to {:?} failed", export.output_dir))?;
                for failed in &report.failed {
                    tracing::warn!(job = %failed.name, reason = %failed.reason, "Export job skipped");
                }
                tracing::info!(
                    command = "export",
                    written = report.written.len(),
                    failed = report.failed.len(),
                    "Export complete"
                );
            }
            Ok(())
        }
        Commands::Remind {
            config,
            category,
            raw,
        } => {
            let config = load_config(config)?;
            let reminder = config
                .reminder
                .context("Config has no `reminder` section")?;
            let api_key = config
                .email_api_key
                .with_context(|| format!("{EMAIL_API_KEY_VAR} environment variable not set"))?;

            let api = HttpContentApi::new();
            let mailer = SendGridMailer::new(api_key);
            let request = match category {
                Some(category) => ReminderRequest::for_category(category),
                None => ReminderRequest::default(),
            };

            let response = match raw {
                Some(subject) => {
                    handle_raw_reminder(&api, &mailer, &reminder, &request, &subject).await
                }
                None => handle_reminder(&api, &mailer, &reminder, &request).await,
            };
            println!("{}", serde_json::to_string_pretty(&response)?);

            if response.is_success() {
                tracing::info!(command = "remind", status = response.status_code, "Reminder sent");
                Ok(())
            } else {
                tracing::error!(command = "remind", status = response.status_code, "Reminder failed");
                anyhow::bail!("Reminder failed with status {}", response.status_code)
            }
        }
    }
}
