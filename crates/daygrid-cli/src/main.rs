//! daygrid CLI - Day-Granularity Timeline Generator
//!
//! Command-line interface for building calendar-grid spreadsheets from a
//! timeline configuration.

mod diagnostics;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use daygrid_core::{DiagnosticEmitter, Renderer, TimelineConfig};
use daygrid_layout::{build_timeline, Timeline};
use daygrid_render::{ExcelRenderer, TextRenderer};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use diagnostics::{DiagnosticConfig, ExitCode, JsonEmitter, TerminalEmitter};

/// Name written by `init`
const STARTER_CONFIG: &str = "daygrid.toml";

#[derive(Parser)]
#[command(name = "daygrid")]
#[command(author, version, about = "Day-granularity timeline generator", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the timeline and write the workbook
    Generate {
        /// Config file (built-in sample schedule if omitted)
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Output file, overriding the config's `output`
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Validate a config and report diagnostics without writing
    Check {
        /// Config file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Print a text rendering of the timeline
    Preview {
        /// Config file (built-in sample schedule if omitted)
        #[arg(value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Number of day columns to show
        #[arg(short, long, default_value_t = 62)]
        days: usize,

        /// Width of the task name column
        #[arg(long, default_value_t = 24)]
        name_width: usize,
    },

    /// Write a starter config file
    Init {
        /// Directory to create the config in
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

/// Diagnostic reporting options shared by `generate` and `check`
#[derive(Args)]
struct ReportArgs {
    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Machine-readable run summary for `--format json`
#[derive(Serialize)]
struct JsonReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    written: bool,
    tasks: usize,
    placed: usize,
    days: usize,
    diagnostics: serde_json::Value,
}

fn main() -> process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::for_error(&err).into()
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Some(Commands::Generate {
            config,
            output,
            report,
        }) => cmd_generate(config.as_deref(), output, &report),
        Some(Commands::Check { config, report }) => cmd_check(&config, &report),
        Some(Commands::Preview {
            config,
            days,
            name_width,
        }) => cmd_preview(config.as_deref(), days, name_width),
        Some(Commands::Init { output }) => cmd_init(&output),
        None => {
            println!("daygrid - Day-Granularity Timeline Generator");
            println!("Run with --help for usage information");
            Ok(ExitCode::Success)
        }
    }
}

/// Load the config file, or fall back to the built-in sample schedule
fn load_config(path: Option<&Path>) -> Result<TimelineConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            Ok(TimelineConfig::load(path)?)
        }
        None => {
            info!("no config given, using the built-in sample schedule");
            Ok(TimelineConfig::default())
        }
    }
}

/// Print diagnostics and compute the exit code they imply
///
/// Text diagnostics go straight to stderr. JSON diagnostics are collected
/// and handed back so the caller can print them with the run summary.
fn report_diagnostics(timeline: &Timeline, args: &ReportArgs) -> (ExitCode, Option<JsonEmitter>) {
    let config = DiagnosticConfig {
        strict: args.strict,
        quiet: args.quiet,
    };

    match args.format {
        OutputFormat::Text => {
            let mut emitter = TerminalEmitter::new(io::stderr(), config);
            for diagnostic in &timeline.diagnostics {
                emitter.emit(diagnostic.clone());
            }
            (emitter.exit_code(), None)
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(config);
            for diagnostic in &timeline.diagnostics {
                emitter.emit(diagnostic.clone());
            }
            (emitter.exit_code(), Some(emitter))
        }
    }
}

fn print_json_report(
    emitter: &JsonEmitter,
    timeline: &Timeline,
    output: Option<&Path>,
    written: bool,
) -> Result<()> {
    let report = JsonReport {
        output: output.map(|p| p.display().to_string()),
        written,
        tasks: timeline.outcomes.len(),
        placed: timeline.placed_count(),
        days: timeline.index.len(),
        diagnostics: emitter.to_json_value(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_generate(
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    args: &ReportArgs,
) -> Result<ExitCode> {
    let mut config = load_config(config_path)?;
    if let Some(output) = output {
        config.output = output;
    }

    let timeline = build_timeline(&config)?;
    let (code, json) = report_diagnostics(&timeline, args);

    if !code.is_success() {
        if let Some(emitter) = &json {
            print_json_report(emitter, &timeline, Some(&config.output), false)?;
        } else {
            eprintln!(
                "error: not writing '{}' due to previous errors",
                config.output.display()
            );
        }
        return Ok(code);
    }

    info!(path = %config.output.display(), "saving workbook");
    ExcelRenderer::new().save(&timeline.grid, &config.output)?;

    match &json {
        Some(emitter) => print_json_report(emitter, &timeline, Some(&config.output), true)?,
        None => println!("Wrote {}", config.output.display()),
    }
    Ok(code)
}

fn cmd_check(config_path: &Path, args: &ReportArgs) -> Result<ExitCode> {
    let config = load_config(Some(config_path))?;
    let timeline = build_timeline(&config)?;
    let (code, json) = report_diagnostics(&timeline, args);

    match &json {
        Some(emitter) => print_json_report(emitter, &timeline, None, false)?,
        None if code.is_success() && !args.quiet => {
            println!(
                "{}: ok ({} of {} bars placed)",
                config_path.display(),
                timeline.placed_count(),
                timeline.outcomes.len()
            );
        }
        None => {}
    }
    Ok(code)
}

fn cmd_preview(config_path: Option<&Path>, days: usize, name_width: usize) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let timeline = build_timeline(&config)?;

    let mut emitter = TerminalEmitter::new(io::stderr(), DiagnosticConfig::default());
    for diagnostic in timeline.warnings() {
        emitter.emit(diagnostic.clone());
    }

    let text = TextRenderer::new()
        .name_width(name_width)
        .max_days(days)
        .render(&timeline.grid)?;
    print!("{text}");
    Ok(ExitCode::Success)
}

fn cmd_init(dir: &Path) -> Result<ExitCode> {
    let path = dir.join(STARTER_CONFIG);
    if path.exists() {
        bail!("'{}' already exists, not overwriting", path.display());
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create directory '{}'", dir.display()))?;
    let text = TimelineConfig::default().to_toml_string()?;
    fs::write(&path, text).with_context(|| format!("cannot write '{}'", path.display()))?;

    println!("Created: {}", path.display());
    println!("Edit the tasks, then run: daygrid generate {}", path.display());
    Ok(ExitCode::Success)
}
