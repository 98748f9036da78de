//! Bookstore API end-to-end tests
//!
//! Runs ordered, stateful lifecycle scenarios against a live bookstore
//! REST service and reports pass/fail per scenario.

use bookstore_tests::common::logging;
use bookstore_tests::{cli, commands::Commands};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bookstore-tests", about = "End-to-end tests for the bookstore REST API")]
#[command(version, long_about = None)]
struct Cli {
    /// Verbose output (per-step context, HTTP exchanges in the log)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    match cli::dispatch(cli.command, cli.verbose).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
