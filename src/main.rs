//! propsteps CLI - run scenario scripts against the generic step library

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use propsteps::config::WorldConfig;
use propsteps::error::{FixSuggestion, StepError};
use propsteps::script::{run_script, ScenarioReport, Script, StepOutcome};
use propsteps::steps::StepRegistry;

/// Config file picked up from the working directory when present
const DEFAULT_CONFIG: &str = "propsteps.toml";

#[derive(Parser)]
#[command(name = "propsteps")]
#[command(about = "propsteps - generic BDD steps: references, calls, tables and jobs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario script
    Run {
        /// Path to the script file
        file: PathBuf,

        /// World config (TOML); defaults to ./propsteps.toml if present
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List supported step phrases
    List,
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { file, config } => run(&file, config.as_deref()).await,
        Commands::List => {
            list_phrases();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            if let Some(suggestion) = e.downcast_ref::<StepError>().and_then(|s| s.fix_suggestion()) {
                eprintln!("  {} {}", "Fix:".yellow(), suggestion);
            }
            std::process::exit(1);
        }
    }
}

/// Returns whether every scenario passed
async fn run(file: &Path, config: Option<&Path>) -> anyhow::Result<bool> {
    let config = load_config(config)?;

    let source = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;
    let script = Script::parse(&source)?;

    let reports = run_script(&script, &config).await;
    for report in &reports {
        print_report(report);
    }

    let failed = reports.iter().filter(|r| !r.passed()).count();
    let summary = format!(
        "{} scenarios ({} passed, {} failed)",
        reports.len(),
        reports.len() - failed,
        failed
    );
    if failed == 0 {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }

    Ok(failed == 0)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<WorldConfig> {
    let config = match path {
        Some(path) => WorldConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => WorldConfig::load(DEFAULT_CONFIG)?,
        None => WorldConfig::default().with_env_overrides()?,
    };
    Ok(config)
}

fn print_report(report: &ScenarioReport) {
    let name = if report.name.is_empty() {
        "(unnamed)"
    } else {
        report.name.as_str()
    };
    println!("{} {}", "Scenario:".cyan().bold(), name);

    for step in &report.steps {
        match &step.outcome {
            StepOutcome::Passed => println!("  {} {}", "✓".green(), step.text),
            StepOutcome::Skipped => println!("  {} {}", "-".dimmed(), step.text.dimmed()),
            StepOutcome::Failed {
                message,
                suggestion,
            } => {
                println!("  {} {} {}", "✗".red(), step.text, format!("(line {})", step.line).dimmed());
                for line in message.lines() {
                    println!("      {}", line.red());
                }
                if let Some(suggestion) = suggestion {
                    println!("      {} {}", "Fix:".yellow(), suggestion);
                }
            }
        }
    }
    println!();
}

fn list_phrases() {
    for def in StepRegistry::global().steps() {
        let marker = if def.takes_table { " + table" } else { "" };
        println!("{}{}", def.phrase, marker.dimmed());
    }
}
