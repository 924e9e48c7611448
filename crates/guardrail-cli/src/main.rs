use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use guardrail_analysis::{Analyzer, Rule};
use guardrail_core::config::discover_config;
use guardrail_core::GuardrailConfig;
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser)]
#[command(name = "guardrail")]
#[command(about = "Reachability linter for PHP call graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a source tree against the configured rules
    Check {
        /// Path to analyze
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Configuration file (default lookup: guardrail.config.toml, then
        /// guardrail.toml in the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Evaluate only the named rules (repeatable)
        #[arg(short, long = "rule")]
        rules: Vec<String>,

        /// Memory limit hint, e.g. 512M. Accepted for command-line
        /// compatibility; analysis memory is bounded by input size.
        #[arg(long)]
        memory_limit: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "console")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Console,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::from(1),
        Ok(false) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<bool> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check {
            path,
            config,
            rules,
            memory_limit,
            format,
        } => check(path, config, rules, memory_limit, format),
    }
}

fn check(
    path: PathBuf,
    config: Option<PathBuf>,
    rules: Vec<String>,
    memory_limit: Option<String>,
    format: OutputFormat,
) -> Result<bool> {
    if let Some(limit) = memory_limit {
        tracing::debug!(limit = %limit, "memory limit hint accepted");
    }

    let config_path = match config {
        Some(path) => path,
        None => discover_config(&std::env::current_dir()?)?,
    };
    let config = GuardrailConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let config = if rules.is_empty() {
        config
    } else {
        config.filter_rules(&rules)?
    };

    let compiled = Rule::from_configs(&config.rules)?;
    let report = Analyzer::new(config.scan)
        .analyze_path(&path, &compiled)
        .with_context(|| format!("analyzing {}", path.display()))?;

    match format {
        OutputFormat::Console => {
            let use_color = std::io::stdout().is_terminal();
            print!("{}", report::render_console(&report, use_color));
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report.has_violations())
}
