use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use armp::app::{FileSource, IngestSession, View};
use armp::config::{Config, OutputFormat};
use armp::constants::REQUIRED_COLUMNS;
use armp::domain::FindingSet;
use armp::pipeline::parser::SheetFormat;
use armp::report::{
    compute_dashboard_stats, compute_leaderboard, compute_listing, render_leaderboard,
    render_listing,
};
use armp::IngestOptions;

#[derive(Parser)]
#[command(name = "armp")]
#[command(about = "Audit findings ingestion and reporting")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest one spreadsheet and print its views
    Ingest {
        /// Workbook (xlsx, xls, ods, ...) or CSV file
        file: PathBuf,
        /// View to print
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
        /// Output format
        #[arg(long, value_enum)]
        output: Option<OutputFormat>,
        /// Worksheet name (defaults to the first sheet)
        #[arg(long)]
        sheet: Option<String>,
        /// Input format
        #[arg(long, value_enum)]
        format: Option<SheetFormat>,
        /// Config file (defaults to $ARMP_CONFIG, then armp.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the columns every sheet must contain
    Columns,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Dashboard,
    Findings,
    Leaderboard,
    All,
}

impl ViewArg {
    fn views(self) -> Vec<View> {
        match self {
            ViewArg::Dashboard => vec![View::Dashboard],
            ViewArg::Findings => vec![View::Findings],
            ViewArg::Leaderboard => vec![View::Leaderboard],
            ViewArg::All => View::ALL.to_vec(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            file,
            view,
            output,
            sheet,
            format,
            config,
        } => {
            let config = Config::load(config.as_deref()).context("failed to load configuration")?;
            armp::logging::init_logging(&config.logging).context("failed to initialize logging")?;

            // CLI flags beat the config file
            let views = match view {
                Some(v) => v.views(),
                None => config
                    .output
                    .view
                    .map(|v| vec![v])
                    .unwrap_or_else(|| View::ALL.to_vec()),
            };
            let output = output.unwrap_or(config.output.format);
            let options = IngestOptions {
                file_name: String::new(),
                format: format.unwrap_or(config.ingest.format),
                sheet: sheet.or(config.ingest.sheet),
            };

            let session = IngestSession::new(options);
            if let Some(first) = views.first() {
                session.set_view(*first);
            }

            info!(file = %file.display(), "ingesting");
            match session.upload(&FileSource::new(&file)).await {
                Ok(findings) => {
                    print_views(&findings, &views, output)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!(kind = e.kind(), "ingestion failed: {}", e);
                    match output {
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::to_string_pretty(&json!({
                                "error": { "kind": e.kind(), "message": e.to_string() }
                            }))?
                        ),
                        OutputFormat::Human => eprintln!("❌ {}", e),
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Columns => {
            println!("Required columns:");
            for column in REQUIRED_COLUMNS {
                println!("   {}", column);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("armp {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_views(findings: &FindingSet, views: &[View], output: OutputFormat) -> anyhow::Result<()> {
    match output {
        OutputFormat::Json => {
            let mut doc = serde_json::Map::new();
            for view in views {
                let value = match view {
                    View::Dashboard => serde_json::to_value(compute_dashboard_stats(findings))?,
                    View::Findings => serde_json::to_value(compute_listing(findings))?,
                    View::Leaderboard => serde_json::to_value(compute_leaderboard(findings))?,
                };
                doc.insert(format!("{:?}", view).to_lowercase(), value);
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        OutputFormat::Human => {
            println!("✅ Loaded {} findings\n", findings.len());
            for view in views {
                println!("📊 {}", view.title());
                match view {
                    View::Dashboard => println!("{}", compute_dashboard_stats(findings)),
                    View::Findings => print!("{}", render_listing(&compute_listing(findings))),
                    View::Leaderboard => {
                        print!("{}", render_leaderboard(&compute_leaderboard(findings)))
                    }
                }
                println!();
            }
        }
    }
    Ok(())
}
