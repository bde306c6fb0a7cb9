//! archfee - Architectural/engineering budget and fee estimator

mod cli;

use anyhow::{bail, Context, Result};
use archfee_core::{
    export_fee_lines_to_csv, export_hours_to_csv, export_result_to_json, resolve_data,
    validate_input, CalcNotes, Calculator, CostDataSource, EmbeddedSource, JsonFileSource,
    ResolvedData,
};
use archfee_types::ProjectInput;
use clap::{Parser, Subcommand};
use cli::Style;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "archfee",
    version,
    about = "Architectural/engineering budget and fee estimator",
    long_about = "Estimates construction budgets, discipline splits and design fees for\n\
                  architectural projects.\n\
                  \n\
                  Two fee methods are computed side by side:\n\
                    • Top-down: market fee curve over each discipline's budget\n\
                    • Bottom-up: planned hours × blended rate\n\
                  and compared by a variance check.\n\
                  \n\
                  Examples:\n\
                    archfee report project.json             # Everything\n\
                    archfee budget project.toml             # Budget + discipline split\n\
                    archfee fees project.json --format json # Top-down fee lines as JSON\n\
                    archfee hours --total-hours 1100        # Phase/role split only\n\
                    archfee export project.json --csv out/fees.csv --json out/result.json\n\
                  \n\
                  Environment Variables:\n\
                    ARCHFEE_CONFIG                   # Config file (default: ~/.config/archfee/config.toml)\n\
                    ARCHFEE_DATA                     # JSON cost dataset (default: embedded tables)\n\
                    ARCHFEE_FORMAT                   # Output format: json|table\n\
                    ARCHFEE_NO_COLOR                 # Disable ANSI colors\n\
                    RUST_LOG                         # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (TOML)
    #[arg(long, env = "ARCHFEE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Cost dataset file (JSON); embedded tables when absent
    #[arg(long, env = "ARCHFEE_DATA", global = true)]
    data: Option<PathBuf>,

    /// Output format (json|table)
    #[arg(long, env = "ARCHFEE_FORMAT", value_parser = ["json", "table"], global = true)]
    format: Option<String>,

    /// Disable ANSI colors
    #[arg(long, env = "ARCHFEE_NO_COLOR", global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Construction budget and discipline split
    Budget {
        /// Project input file (JSON or TOML)
        input: PathBuf,
    },
    /// Top-down fee lines
    Fees {
        input: PathBuf,
    },
    /// Phase and role hours
    Hours {
        /// Project input file; hours come from the bottom-up model
        input: Option<PathBuf>,
        /// Distribute this many hours instead of computing them
        #[arg(long, conflicts_with = "input")]
        total_hours: Option<f64>,
        /// Project duration for the phase months column
        #[arg(long)]
        months: Option<f64>,
    },
    /// Rate-comparison scenarios
    Scenarios {
        input: PathBuf,
    },
    /// Validate input and show variance warnings
    Check {
        input: PathBuf,
    },
    /// Full report
    Report {
        input: PathBuf,
    },
    /// Write results to files
    Export {
        input: PathBuf,
        /// Fee lines as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Phase × role hours as CSV
        #[arg(long)]
        hours_csv: Option<PathBuf>,
        /// Full result as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli::load_config(cli.config.as_deref())?;
    let calculator = Calculator::new(config);
    let style = Style {
        format: match cli.format.as_deref() {
            Some(f) => cli::parse_format(f)?,
            None => cli::OutputFormat::Table,
        },
        no_color: cli.no_color,
    };
    let data_path = cli.data.as_deref();

    match cli.command {
        Command::Budget { input } => {
            let (input, data) = prepare(&input, data_path).await?;
            let mut notes = CalcNotes::new();
            let stage = calculator.compute_budget(&input, &data, &mut notes);
            println!(
                "{}",
                cli::format_budget(&stage.budget, &stage.disciplines, style)
            );
        }
        Command::Fees { input } => {
            let (input, data) = prepare(&input, data_path).await?;
            let result = calculator.calculate(&input, &data);
            println!("{}", cli::format_fees(&result.top_down, style));
        }
        Command::Hours {
            input,
            total_hours,
            months,
        } => {
            let distribution = match (input, total_hours) {
                (Some(path), _) => {
                    let (input, data) = prepare(&path, data_path).await?;
                    let result = calculator.calculate(&input, &data);
                    match months {
                        Some(m) => calculator
                            .compute_hours_distribution(result.hours.total_hours_planned, Some(m)),
                        None => result.hours,
                    }
                }
                (None, Some(hours)) => {
                    if !hours.is_finite() || hours < 0.0 {
                        bail!("--total-hours must be a non-negative number");
                    }
                    calculator.compute_hours_distribution(hours.round(), months)
                }
                (None, None) => bail!("Provide an input file or --total-hours"),
            };
            println!("{}", cli::format_hours(&distribution, style));
        }
        Command::Scenarios { input } => {
            let (input, data) = prepare(&input, data_path).await?;
            let result = calculator.calculate(&input, &data);
            println!("{}", cli::format_scenarios(&result.scenarios, style));
        }
        Command::Check { input } => {
            let (input, data) = prepare(&input, data_path).await?;
            let validation = validate_input(&input).err().map(|e| e.to_string());
            let result = calculator.calculate(&input, &data);
            println!(
                "{}",
                cli::format_check(&result.variance, &result.notes, validation.as_deref(), style)
            );
            if validation.is_some() {
                bail!("Input validation failed");
            }
        }
        Command::Report { input } => {
            let (input, data) = prepare(&input, data_path).await?;
            let result = calculator.calculate(&input, &data);
            println!("{}", cli::format_report(&result, style));
        }
        Command::Export {
            input,
            csv,
            hours_csv,
            json,
        } => {
            if csv.is_none() && hours_csv.is_none() && json.is_none() {
                bail!("Nothing to export: pass --csv, --hours-csv and/or --json");
            }

            let (input, data) = prepare(&input, data_path).await?;
            let result = calculator.calculate(&input, &data);

            if let Some(path) = csv {
                export_fee_lines_to_csv(&result.top_down.lines, &path)?;
                println!("✓ Fee lines exported to {}", path.display());
            }
            if let Some(path) = hours_csv {
                export_hours_to_csv(&result.hours, &path)?;
                println!("✓ Hours exported to {}", path.display());
            }
            if let Some(path) = json {
                export_result_to_json(&result, &path)?;
                println!("✓ Result exported to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Load the input and resolve its cost data
async fn prepare(input_path: &Path, data_path: Option<&Path>) -> Result<(ProjectInput, ResolvedData)> {
    let input = cli::load_input(input_path)?;
    let source = open_source(data_path).await?;
    let data = resolve_data(source.as_ref(), &input).await;

    tracing::debug!(
        building_type = %data.building_type,
        origin = ?data.origin,
        "Resolved cost data"
    );
    Ok((input, data))
}

async fn open_source(data_path: Option<&Path>) -> Result<Box<dyn CostDataSource>> {
    match data_path {
        Some(path) => {
            let source = JsonFileSource::load(path)
                .await
                .with_context(|| format!("Failed to load cost dataset: {}", path.display()))?;
            Ok(Box::new(source))
        }
        None => Ok(Box::new(EmbeddedSource)),
    }
}
