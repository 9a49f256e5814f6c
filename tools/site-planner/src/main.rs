//! Site Planner - command-line host for the site configuration compute engine
//!
//! Reads requested battery counts, runs the engine against the configured catalog and
//! width cap, and prints the derived counts, totals and packed layout.

mod input;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use common::{load_config, logging, PlannerConfig};
use errors::PlannerError;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "site-planner")]
#[command(about = "Battery-storage site planner: derived counts, totals and layout")]
#[command(long_about = "Battery-storage site planner: derived counts, totals and layout

Commands:
  compute     Compute counts, totals and a packed layout for requested devices
  catalog     Show the device catalog
  config      Show the effective configuration

Examples:
  site-planner compute --counts '{\"Megapack\": 3}'
  echo '{\"counts\": {\"MegapackXL\": 2}}' | site-planner compute --format table
  site-planner -c site.yaml catalog --format table

Environment overrides use the SITE_PLANNER_ prefix, e.g. SITE_PLANNER_MAX_WIDTH_FT=80.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file (.yaml, .yml, .toml or .json)
    #[arg(short = 'c', long = "config", global = true, env = "SITE_PLANNER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute counts, totals and layout
    Compute {
        /// Counts as JSON, either bare or wrapped in {"counts": ...}
        #[arg(long)]
        counts: Option<String>,

        /// Read the request from a file instead of stdin
        #[arg(short, long, conflicts_with = "counts")]
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Show the device catalog
    Catalog {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Show the effective configuration as YAML
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

impl Commands {
    /// Format for command output and for errors reported on its behalf
    fn output_format(&self) -> OutputFormat {
        match self {
            Self::Compute { format, .. } | Self::Catalog { format } => *format,
            Self::Config => OutputFormat::Table,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let format = cli.command.output_format();

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return report(&e, format),
    };
    if cli.verbose {
        config.log.level = "debug".to_string();
    }
    if let Err(e) = logging::init_with_config(&config.log) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast::<PlannerError>() {
            Ok(planner_error) => report(&planner_error, format),
            Err(other) => {
                error!("{:#}", other);
                eprintln!("{} {:#}", "Error:".red().bold(), other);
                ExitCode::FAILURE
            },
        },
    }
}

fn run(command: Commands, config: &PlannerConfig) -> Result<()> {
    match command {
        Commands::Compute {
            counts,
            file,
            format,
        } => {
            let engine = config.build_engine()?;
            let body = input::read_request(counts.as_deref(), file.as_deref())?;
            let raw_counts = input::extract_counts(body);
            debug!("Compute request: {}", raw_counts);

            let result = engine.compute_all(&raw_counts).map_err(PlannerError::from)?;
            info!(
                units = result.layout.placements.len(),
                site_area_sq_ft = result.layout.site_area_sq_ft,
                "Compute finished"
            );

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Table => print!("{}", output::render_result(&result)?),
            }
        },
        Commands::Catalog { format } => match format {
            OutputFormat::Json => {
                let body = json!({ "catalog": &config.catalog });
                println!("{}", serde_json::to_string_pretty(&body)?);
            },
            OutputFormat::Table => {
                print!(
                    "{}",
                    output::render_catalog(&config.catalog, config.max_width_ft)?
                );
            },
        },
        Commands::Config => print!("{}", config.to_yaml()?),
    }
    Ok(())
}

/// Print a planner error the way an API caller would see it and pick the exit code
fn report(err: &PlannerError, format: OutputFormat) -> ExitCode {
    let info = err.to_error_info();
    if err.log_level() == tracing::Level::ERROR {
        error!(code = err.error_code(), "{}", err);
    } else {
        info!(code = err.error_code(), "{}", err);
    }

    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(&info) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("{}", info.message),
        },
        OutputFormat::Table => {
            eprintln!("{} {}", "Error:".red().bold(), info.message);
            for (field, messages) in &info.field_errors {
                for message in messages {
                    eprintln!("  {}: {}", field.yellow(), message);
                }
            }
        },
    }

    if info.code < 500 {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}
