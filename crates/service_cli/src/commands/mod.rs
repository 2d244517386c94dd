//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod point;
pub mod simulate;

/// Output format shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// Pretty-printed JSON document.
    Json,
}
