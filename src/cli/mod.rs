//! CLI entrypoints
//!
//! - `serve`: run the HTTP API
//! - `plan`: interactive trip planner with a refinement loop

pub mod plan;
pub mod serve;

use clap::{Parser, Subcommand};

/// Travel planning assistant for trips within India
#[derive(Parser)]
#[command(name = "travelai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Plan a trip interactively in the terminal
    Plan,
}
