#![doc = "codersnack-core: core logic library for codersnack."]

//! This crate contains the data model, collaborator traits and pipelines for
//! exporting codersnack CMS content into static-site files, and the handler
//! behind the daily reminder email.
//! Concrete transports that need secrets (the mail provider) live in the CLI crate.
//!
//! # Usage
//! Add this as a dependency for all shared export, rendering and reminder code.

pub mod config;
pub mod contract;
pub mod error;
pub mod export;
pub mod fetch;
pub mod presets;
pub mod reminder;
pub mod render;
