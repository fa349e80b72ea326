//! Error types for codersnack-core.
//!
//! Messages are meant for log lines and response bodies. None of them carry
//! credentials.

use std::path::PathBuf;

/// Failure to obtain a JSON document from the content API.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not the JSON shape we expected.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Category keys are interpolated into URLs and must stay URL-safe.
    #[error("invalid category key {0:?}")]
    InvalidCategory(String),
}

/// Failure reported by the mail dispatch collaborator.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(String),

    /// The provider rejected the message (bad credentials, invalid template, ...).
    #[error("mail provider rejected message with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A fetched document could not be turned into an output file.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("expected a JSON array, got {0}")]
    NotAnArray(&'static str),

    #[error("unexpected item shape: {0}")]
    Shape(String),
}

/// Terminal failures of an export run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
