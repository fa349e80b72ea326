pub mod cli;
pub mod load_config;
pub mod mailer;

pub use cli::{run, Cli, Commands};
