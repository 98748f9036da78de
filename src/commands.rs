//! CLI command definitions
//!
//! Defines the clap commands for the test runner CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::testing::ScenarioKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Run lifecycle scenarios against the bookstore API
    Run {
        /// Scenarios to run, in order (default: all)
        #[arg(value_enum)]
        scenarios: Vec<ScenarioKind>,

        #[command(flatten)]
        target: TargetArgs,

        /// Seed for generated titles, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Run the selected scenarios concurrently
        #[arg(long)]
        parallel: bool,

        /// Write a JSON report of the results to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// List available scenarios and their steps
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the configured credentials are exchanged for a token
    Login {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Where to point the run and who to log in as
#[derive(Args, Debug, Default)]
pub struct TargetArgs {
    /// Config file (default: platform config dir, bookstore-api-tests/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the bookstore API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Login email
    #[arg(long)]
    pub email: Option<String>,

    /// Login password
    #[arg(long)]
    pub password: Option<String>,
}
