// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcagbot CLI - WCAG checklist auditor
//!
//! Part of the gitbot-fleet ecosystem.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wcagbot::config::{default_config_path, load_config, write_default_config, Config};
use wcagbot::finding::WcagLevel;
use wcagbot::normalize::{normalize, ReportContext};
use wcagbot::prompts::{judge_all, plan, ResponseDir};
use wcagbot::report::{generate_report, render_rows, OutputFormat, RowFormat};
use wcagbot::{audit_file, scanner};

/// WCAG checklist auditor for gitbot-fleet
#[derive(Parser)]
#[command(name = "wcagbot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rule checklists on a file or directory
    Check {
        /// HTML file or directory to audit
        path: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: FormatArg,

        /// Only report findings up to this conformance level
        #[arg(long)]
        level: Option<LevelArg>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the suppressed judgment payloads for a file
    Extract {
        /// HTML file to audit
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the judgment requests that would be sent for a file
    Plan {
        /// HTML file to audit
        file: PathBuf,

        /// Include the three checklist summary prompts
        #[arg(long)]
        include_summaries: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Build the unified report for a file
    Report {
        /// HTML file to audit
        file: PathBuf,

        /// Directory of recorded judgment responses (`<prompt_name>.json`)
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Label for the judge in `reported_by`
        #[arg(long)]
        model: Option<String>,

        /// Include the three checklist summary prompts
        #[arg(long)]
        include_summaries: bool,

        /// Report date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Row format
        #[arg(long, default_value = "csv")]
        format: RowFormatArg,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Where to write it
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Findings output format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI
    Sarif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Sarif => OutputFormat::Sarif,
        }
    }
}

/// WCAG conformance level CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LevelArg {
    /// Level A only
    A,
    /// Levels A and AA
    Aa,
    /// All levels
    Aaa,
}

impl From<LevelArg> for WcagLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::A => WcagLevel::A,
            LevelArg::Aa => WcagLevel::AA,
            LevelArg::Aaa => WcagLevel::AAA,
        }
    }
}

/// Report row format CLI argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum RowFormatArg {
    /// Comma-separated values with a header row
    Csv,
    /// JSON document with schema version
    Json,
}

impl From<RowFormatArg> for RowFormat {
    fn from(arg: RowFormatArg) -> Self {
        match arg {
            RowFormatArg::Csv => RowFormat::Csv,
            RowFormatArg::Json => RowFormat::Json,
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("wcagbot=debug")
    } else {
        EnvFilter::try_new(format!("wcagbot={}", level))
            .unwrap_or_else(|_| EnvFilter::new("wcagbot=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?;
    init_logging(cli.verbose, &config.log.level);

    match cli.command {
        Commands::Check {
            path,
            format,
            level,
            output,
        } => {
            let mut results = scanner::scan_path(&path, &config)?;
            if let Some(level) = level {
                let max_level = WcagLevel::from(level);
                results = results.iter().map(|r| r.limited_to(max_level)).collect();
            }
            let report = generate_report(&results, format.into());
            write_output(&report, output.as_deref())?;

            if results.iter().any(|r| r.findings.has_errors()) {
                std::process::exit(1);
            }
        }

        Commands::Extract { file, output } => {
            let result = audit_file(&file, &config)?;
            let json = serde_json::to_string_pretty(&result.payloads)?;
            write_output(&json, output.as_deref())?;
        }

        Commands::Plan { file, include_summaries, output } => {
            let result = audit_file(&file, &config)?;
            let plan = plan(
                &result.payloads,
                include_summaries || config.judgment.include_summaries,
            );
            let json = serde_json::to_string_pretty(&plan)?;
            write_output(&json, output.as_deref())?;
        }

        Commands::Report {
            file,
            responses,
            model,
            include_summaries,
            date,
            format,
            output,
        } => {
            let rows = build_report(
                &file,
                &config,
                responses.as_deref(),
                model,
                include_summaries,
                date,
            )?;
            let rendered = render_rows(&rows, format.into())?;
            write_output(&rendered, output.as_deref())?;
        }

        Commands::InitConfig { path } => {
            let path = path.unwrap_or_else(default_config_path);
            write_default_config(&path)?;
            eprintln!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Audit, replay recorded judgments and normalize into rows
fn build_report(
    file: &Path,
    config: &Config,
    responses: Option<&Path>,
    model: Option<String>,
    include_summaries: bool,
    date: Option<NaiveDate>,
) -> anyhow::Result<Vec<wcagbot::ReportRow>> {
    let result = audit_file(file, config)?;

    let judgments = match responses {
        Some(dir) => {
            let plan = plan(
                &result.payloads,
                include_summaries || config.judgment.include_summaries,
            );
            info!(prompts = plan.requests.len(), dir = %dir.display(), "Replaying judgment responses");
            judge_all(&ResponseDir::new(dir), &plan.requests)
        }
        None => Vec::new(),
    };

    let ctx = ReportContext::new(
        result.page_title.clone(),
        date.unwrap_or_else(|| chrono::Local::now().date_naive()),
        model.unwrap_or_else(|| config.judgment.model_label.clone()),
        &config.report,
    );
    Ok(normalize(&result.findings.findings, &judgments, &ctx))
}

/// Write output to file or stdout
fn write_output(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            std::fs::write(p, content)?;
            eprintln!("Report written to {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
