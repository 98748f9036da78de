//! CLI command handling
//!
//! Dispatches CLI commands to the scenario runner and formats output.

use std::path::Path;

use colored::Colorize;

use crate::auth::authenticate;
use crate::commands::{Commands, TargetArgs};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::http::ApiClient;
use crate::testing::{RunSettings, ScenarioKind, TestResult};

/// Dispatch a CLI command
///
/// Returns `Ok(false)` when the command ran but something under test failed.
pub async fn dispatch(command: Commands, verbose: bool) -> Result<bool> {
    match command {
        Commands::Run {
            scenarios,
            target,
            seed,
            parallel,
            report,
        } => {
            let settings = RunSettings {
                config: load_config(target)?,
                seed,
                verbose,
                parallel,
            };
            let kinds = select(scenarios);

            tracing::info!(
                base_url = %settings.config.api.base_url,
                scenarios = kinds.len(),
                parallel,
                "Starting run"
            );

            let results = run_all(&kinds, &settings).await?;
            print_summary(&results);

            if let Some(path) = report {
                write_report(&path, &results)?;
                println!("Report written to {}", path.display());
            }

            Ok(results.iter().all(|r| r.passed))
        }

        Commands::List { json } => {
            let settings = RunSettings::new(Config::load()?);
            let outlines: Vec<_> = ScenarioKind::all()
                .iter()
                .map(|kind| kind.outline(&settings))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&outlines)?);
            } else {
                for outline in &outlines {
                    println!("{}", outline.name.white().bold());
                    println!("  {}", outline.description.dimmed());
                    for (i, step) in outline.steps.iter().enumerate() {
                        println!("  {:>2}. {}", i + 1, step);
                    }
                    println!();
                }
            }
            Ok(true)
        }

        Commands::Login { target } => {
            let config = load_config(target)?;
            let api = ApiClient::from_config(&config)?;

            match authenticate(&api, &config.api.login_path, &config.credentials).await {
                Ok(token) => {
                    println!(
                        "{} Authenticated as {} at {} ({} character token)",
                        "✓".green(),
                        config.credentials.email,
                        api.base_url(),
                        token.len()
                    );
                    Ok(true)
                }
                Err(e @ Error::Setup(_)) => {
                    println!("{} {}", "✗".red(), e);
                    Ok(false)
                }
                Err(e) => Err(e),
            }
        }
    }
}

/// Load the config file named on the command line, or the default one, then apply flags
fn load_config(target: TargetArgs) -> Result<Config> {
    let config = match &target.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.with_overrides(target.base_url, target.email, target.password)
}

/// Requested scenarios in order with repeats removed; all when none were named
fn select(requested: Vec<ScenarioKind>) -> Vec<ScenarioKind> {
    if requested.is_empty() {
        return ScenarioKind::all().to_vec();
    }
    let mut kinds = Vec::with_capacity(requested.len());
    for kind in requested {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

async fn run_all(kinds: &[ScenarioKind], settings: &RunSettings) -> Result<Vec<TestResult>> {
    if settings.parallel {
        let runs = kinds.iter().map(|kind| kind.run(settings));
        return futures_util::future::join_all(runs)
            .await
            .into_iter()
            .collect();
    }

    let mut results = Vec::with_capacity(kinds.len());
    for kind in kinds {
        results.push(kind.run(settings).await?);
    }
    Ok(results)
}

fn print_summary(results: &[TestResult]) {
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    println!("{}", "Summary:".cyan().bold());
    for result in results {
        if result.passed {
            println!(
                "  {} {} ({}/{} steps, {} ms)",
                "✓".green(),
                result.name,
                result.steps_run,
                result.steps_total,
                result.duration_ms
            );
        } else {
            let step = result.failed_step.as_deref().unwrap_or("unknown");
            println!(
                "  {} {} failed at step {} ({}) after reaching '{}'",
                "✗".red(),
                result.name,
                result.steps_run,
                step,
                result.reached
            );
            if let Some(error) = &result.error {
                for line in error.lines() {
                    println!("      {}", line.red());
                }
            }
        }
    }

    let line = format!("{} passed, {} failed", passed, failed);
    if failed == 0 {
        println!("\n{}", line.green().bold());
    } else {
        println!("\n{}", line.red().bold());
    }
}

fn write_report(path: &Path, results: &[TestResult]) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_all() {
        assert_eq!(select(vec![]), vec![ScenarioKind::Category, ScenarioKind::Book]);
    }

    #[test]
    fn test_select_keeps_order_and_drops_repeats() {
        assert_eq!(
            select(vec![ScenarioKind::Book, ScenarioKind::Category, ScenarioKind::Book]),
            vec![ScenarioKind::Book, ScenarioKind::Category]
        );
    }

    #[test]
    fn test_load_config_applies_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"http://file.example.test\"\n").unwrap();

        let config = load_config(TargetArgs {
            config: Some(path),
            base_url: None,
            email: Some("flag@example.com".into()),
            password: None,
        })
        .unwrap();
        assert_eq!(config.api.base_url, "http://file.example.test");
        assert_eq!(config.credentials.email, "flag@example.com");
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_report_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_report(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "unexpected error: {err}");
        assert!(err.to_string().starts_with("IO error:"));
    }
}
